//! Gridsong library - a grid of bobbing movers sonified column by column

pub mod audio;
pub mod camera;
pub mod cli;
pub mod error;
pub mod field;
pub mod gate;
pub mod noise;
pub mod params;
pub mod rendering;
pub mod scene;
pub mod scheduler;
pub mod walker;
