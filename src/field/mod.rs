//! Grid of bobbing movers driven by sine + coherent-noise motion.

mod mover;
mod system;

// Re-export public types
pub use mover::{Mover, MoverId};
pub use system::MotionField;
