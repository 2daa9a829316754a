pub mod color;
pub use color::{Color, Palette, SENTINEL};

pub mod choice;
pub use choice::{legend, validate, Choice, LegendEntry};

pub mod error;
pub use error::*;

pub mod generate;
pub use generate::{generate, render, Artwork, Grid, GridConfig};

pub mod file;
pub use file::Preset;

pub mod page;

pub mod server;
