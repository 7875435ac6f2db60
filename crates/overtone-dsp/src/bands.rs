//! Band-energy summaries and fundamental estimation over a power spectrum.

use crate::error::AnalysisError;
use crate::psd::PowerSpectrum;
use crate::summary::BandRow;

/// Everything below this is treated as rumble and excluded from totals.
const TOTAL_FLOOR_HZ: f64 = 20.0;

/// Fundamental search range in Hz.
const FUNDAMENTAL_LO_HZ: f64 = 60.0;
const FUNDAMENTAL_HI_HZ: f64 = 300.0;

/// Trapezoidal integral of power over bins with `lo_hz <= f < hi_hz`.
///
/// Returns 0.0 when fewer than two bins fall inside the band.
pub fn band_energy(spectrum: &PowerSpectrum, lo_hz: f64, hi_hz: f64) -> f64 {
    let lo = spectrum.freqs.partition_point(|&f| f < lo_hz);
    let hi = spectrum.freqs.partition_point(|&f| f < hi_hz);
    trapezoid(&spectrum.freqs[lo..hi], &spectrum.power[lo..hi])
}

fn trapezoid(f: &[f64], p: &[f64]) -> f64 {
    let mut acc = 0.0;
    for i in 1..f.len() {
        acc += 0.5 * (p[i] + p[i - 1]) * (f[i] - f[i - 1]);
    }
    acc
}

/// Summarize band energies: Bass 60-250 Hz, Formant 400-1500 Hz, and the
/// configurable "air" overtones band.
///
/// Returns the band rows and the total power over 20 Hz and up (floored
/// at 1e-12 so shares of silence stay finite).
pub fn summarize_bands(
    spectrum: &PowerSpectrum,
    air_lo_hz: f64,
    air_hi_hz: f64,
) -> Result<(Vec<BandRow>, f64), AnalysisError> {
    if !(air_lo_hz > 0.0 && air_lo_hz < air_hi_hz) || !air_hi_hz.is_finite() {
        return Err(AnalysisError::InvalidConfiguration(format!(
            "air band {}-{} Hz must satisfy 0 < low < high",
            air_lo_hz, air_hi_hz
        )));
    }

    let lo = spectrum.freqs.partition_point(|&f| f < TOTAL_FLOOR_HZ);
    let mut total = trapezoid(&spectrum.freqs[lo..], &spectrum.power[lo..]);
    if total <= 0.0 {
        total = 1e-12;
    }

    let bands = [
        ("Bass 60-250 Hz".to_string(), 60.0, 250.0),
        ("Formant 400-1500 Hz".to_string(), 400.0, 1500.0),
        (overtones_label(air_lo_hz, air_hi_hz), air_lo_hz, air_hi_hz),
    ];

    let rows = bands
        .into_iter()
        .map(|(band, lo_hz, hi_hz)| {
            let energy = band_energy(spectrum, lo_hz, hi_hz);
            BandRow {
                band,
                lo_hz,
                hi_hz,
                energy,
                pct: 100.0 * energy / total,
            }
        })
        .collect();

    Ok((rows, total))
}

fn overtones_label(air_lo_hz: f64, air_hi_hz: f64) -> String {
    if air_lo_hz >= 1000.0 {
        format!(
            "Overtones {}-{} kHz",
            (air_lo_hz / 1000.0) as i64,
            (air_hi_hz / 1000.0) as i64
        )
    } else {
        format!(
            "Overtones {}-{} kHz",
            air_lo_hz as i64,
            (air_hi_hz / 1000.0) as i64
        )
    }
}

/// Frequency of the strongest bin between 60 and 300 Hz, or `None` when
/// the range holds no bins or no energy.
pub fn estimate_fundamental(spectrum: &PowerSpectrum) -> Option<f64> {
    let lo = spectrum.freqs.partition_point(|&f| f < FUNDAMENTAL_LO_HZ);
    let hi = spectrum.freqs.partition_point(|&f| f <= FUNDAMENTAL_HI_HZ);
    if lo >= hi {
        return None;
    }
    let mut best = lo;
    let mut best_p = 0.0_f64;
    for i in lo..hi {
        if spectrum.power[i] > best_p {
            best_p = spectrum.power[i];
            best = i;
        }
    }
    if best_p <= 0.0 {
        return None;
    }
    Some(spectrum.freqs[best])
}
