//! AI systems (FixedUpdate tick)

pub mod catch;
pub mod controller;
pub mod integrate;

// Re-export all systems
pub use catch::*;
pub use controller::*;
pub use integrate::*;
