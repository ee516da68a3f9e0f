pub mod color;
pub mod error;
pub mod palette;
pub mod patch;
pub mod persist;
pub mod rom;
pub mod swatch;

pub use error::{PaletteError, Result};
