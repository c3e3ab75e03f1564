//! Word-cloud layout and color schemes.
//!
//! A cloud is pure geometry: frequencies, font sizes, spiral placement and
//! gradient colors for a fixed 500×400 canvas.  Rasterization is left to
//! egui's text painter — the UI draws each [`PlacedWord`] at its computed
//! position.  Everything here is deterministic, so the same word list
//! always yields the same picture.

pub mod layout;
pub mod palette;

pub use layout::{PlacedWord, WordCloud, CLOUD_HEIGHT, CLOUD_WIDTH};
pub use palette::{scheme_for, ColorScheme, Rgb};
