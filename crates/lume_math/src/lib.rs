// Re-export glam for convenience
pub use glam::*;

// Lume math types
mod plane;
mod ray;
pub use plane::Plane;
pub use ray::Ray;
