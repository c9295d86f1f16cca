//! Image collaborator for the game: decode, resize, and annotate photos.

mod raster;
pub use raster::*;

pub mod draw;
pub use draw::Canvas;
