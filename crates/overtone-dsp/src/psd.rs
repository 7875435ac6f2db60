//! Welch power-spectral-density estimation.
//!
//! Core loop: segment -> constant detrend -> Hann window -> real FFT ->
//! accumulate periodograms -> average. One-sided power-spectrum scaling:
//! bin values are squared amplitudes, so a full-scale sine lands at 0.5
//! in its bin.

use num_complex::Complex;
use realfft::RealFftPlanner;

use crate::error::AnalysisError;

/// Segment length bounds. Long inputs cap at 8192 samples per segment;
/// inputs shorter than 256 samples use a single input-length segment.
const MIN_SEGMENT: usize = 256;
const MAX_SEGMENT: usize = 8192;

/// One-sided power spectrum with its frequency axis.
///
/// Invariant: `freqs` and `power` have equal length and `freqs` ascends
/// from 0 Hz to Nyquist.
#[derive(Debug, Clone)]
pub struct PowerSpectrum {
    pub freqs: Vec<f64>,
    pub power: Vec<f64>,
}

/// Estimate the one-sided power spectrum of a mono buffer.
///
/// Welch's method: periodic Hann window, 50% overlap, per-segment mean
/// removal. The global mean is subtracted up front so DC leakage does not
/// swamp the low bins.
pub fn welch_psd(audio: &[f64], sample_rate: u32) -> Result<PowerSpectrum, AnalysisError> {
    if audio.is_empty() {
        return Err(AnalysisError::InvalidInput("empty input buffer".into()));
    }
    if audio.len() < 2 {
        return Err(AnalysisError::InvalidInput(
            "input must contain at least 2 samples".into(),
        ));
    }
    if !audio.iter().all(|x| x.is_finite()) {
        return Err(AnalysisError::InvalidInput(
            "input contains non-finite samples".into(),
        ));
    }
    if sample_rate == 0 {
        return Err(AnalysisError::InvalidInput(
            "sample rate must be positive".into(),
        ));
    }

    let mean = audio.iter().sum::<f64>() / audio.len() as f64;
    let signal: Vec<f64> = audio.iter().map(|&s| s - mean).collect();

    let mut nperseg = signal.len().min(MAX_SEGMENT);
    if nperseg < MIN_SEGMENT {
        nperseg = MIN_SEGMENT.min(signal.len());
    }
    let noverlap = nperseg / 2;
    let step = nperseg - noverlap;
    let n_bins = nperseg / 2 + 1;
    let n_frames = (signal.len() - nperseg) / step + 1;

    let window = hann_window(nperseg);
    let win_sum: f64 = window.iter().sum();
    let scale = 1.0 / (win_sum * win_sum);

    let mut planner = RealFftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(nperseg);

    let mut fft_input = vec![0.0_f64; nperseg];
    let mut spectrum = vec![Complex::new(0.0, 0.0); n_bins];
    let mut acc = vec![0.0_f64; n_bins];

    for fi in 0..n_frames {
        let start = fi * step;
        let segment = &signal[start..start + nperseg];
        let seg_mean = segment.iter().sum::<f64>() / nperseg as f64;
        for j in 0..nperseg {
            fft_input[j] = (segment[j] - seg_mean) * window[j];
        }

        fft.process(&mut fft_input, &mut spectrum).unwrap();

        for (a, c) in acc.iter_mut().zip(spectrum.iter()) {
            *a += c.norm_sqr();
        }
    }

    let mut power: Vec<f64> = acc
        .iter()
        .map(|&p| p * scale / n_frames as f64)
        .collect();

    // One-sided doubling, except DC and (for even segment lengths) Nyquist
    let hi = if nperseg % 2 == 0 {
        n_bins - 1
    } else {
        n_bins
    };
    for p in power[1..hi].iter_mut() {
        *p *= 2.0;
    }

    let freqs = (0..n_bins)
        .map(|k| k as f64 * sample_rate as f64 / nperseg as f64)
        .collect();

    Ok(PowerSpectrum { freqs, power })
}

fn hann_window(size: usize) -> Vec<f64> {
    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * std::f64::consts::PI * i as f64 / size as f64).cos()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1 Hz bins: 8192 samples at 8192 Hz fill exactly one max-size segment
    const SR: u32 = 8192;

    fn sine(freq: f64, amp: f64, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| amp * (2.0 * std::f64::consts::PI * freq * i as f64 / SR as f64).sin())
            .collect()
    }

    #[test]
    fn test_peak_at_sine_frequency() {
        let audio = sine(1000.0, 0.5, 4 * SR as usize);
        let ps = welch_psd(&audio, SR).unwrap();
        let (peak_idx, _) = ps
            .power
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .unwrap();
        assert!(
            (ps.freqs[peak_idx] - 1000.0).abs() <= 1.0,
            "peak at {} Hz",
            ps.freqs[peak_idx]
        );
    }

    #[test]
    fn test_spectrum_scaling_bin_centered_sine() {
        // Power-spectrum scaling: a sine of amplitude A at a bin center
        // carries A^2 / 2 in its bin.
        let amp = 0.5;
        let audio = sine(1000.0, amp, 4 * SR as usize);
        let ps = welch_psd(&audio, SR).unwrap();
        let expected = amp * amp / 2.0;
        let got = ps.power[1000];
        assert!(
            (got - expected).abs() < 0.1 * expected,
            "bin power {} vs expected {}",
            got,
            expected
        );
    }

    #[test]
    fn test_bin_layout() {
        let audio = sine(440.0, 0.5, 4 * SR as usize);
        let ps = welch_psd(&audio, SR).unwrap();
        assert_eq!(ps.freqs.len(), ps.power.len());
        assert_eq!(ps.freqs.len(), MAX_SEGMENT / 2 + 1);
        assert_eq!(ps.freqs[0], 0.0);
        assert_eq!(*ps.freqs.last().unwrap(), SR as f64 / 2.0);
        assert!(ps.freqs.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_short_input_shrinks_segment() {
        let audio = sine(50.0, 0.5, 100);
        let ps = welch_psd(&audio, SR).unwrap();
        assert_eq!(ps.freqs.len(), 100 / 2 + 1);
    }

    #[test]
    fn test_constant_signal_has_no_power() {
        let audio = vec![0.7_f64; SR as usize];
        let ps = welch_psd(&audio, SR).unwrap();
        let total: f64 = ps.power.iter().sum();
        assert!(total < 1e-12, "residual power: {}", total);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            welch_psd(&[], SR),
            Err(AnalysisError::InvalidInput(_))
        ));
        assert!(matches!(
            welch_psd(&[0.0, f64::NAN], SR),
            Err(AnalysisError::InvalidInput(_))
        ));
        assert!(matches!(
            welch_psd(&[0.0, 0.1], 0),
            Err(AnalysisError::InvalidInput(_))
        ));
    }
}
