//! High-shelf brightening DSP engine.
//!
//! Adds sparkle to a mono buffer by re-adding an amplified Butterworth
//! high-pass of the signal, then soft-clipping and peak-normalizing.
//!
//! Single entry point: `render_brighten(input_audio, sample_rate, params) -> output_audio`

pub mod chain;
pub mod error;
pub mod filters;
pub mod params;

pub use chain::{downmix_mono, render_brighten};
pub use error::BrightenError;
pub use params::BrightenParams;
