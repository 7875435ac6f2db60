//! Overtone analysis DSP engine.
//!
//! Estimates the power spectrum of a mono buffer (Welch's method), reduces
//! it to band-energy shares (bass / formant / configurable overtones band),
//! and estimates the fundamental frequency.
//!
//! All functions are pure; file I/O lives with the caller.

pub mod bands;
pub mod error;
pub mod psd;
pub mod summary;

pub use bands::{band_energy, estimate_fundamental, summarize_bands};
pub use error::AnalysisError;
pub use psd::{welch_psd, PowerSpectrum};
pub use summary::{AnalysisSummary, BandRow};
