//! Render entry point for the brightening engine.
//!
//! Signal chain:
//!     Input (mono) -> Butterworth high-pass -> blend add -> tanh soft clip
//!                  -> peak normalize
//!
//! The high-pass output is added back onto the dry signal, which
//! reconstructs a high-shelf boost from high-frequency content only.

use crate::error::BrightenError;
use crate::filters::apply_highpass;
use crate::params::BrightenParams;

/// Peak-normalization guard. Keeps an all-zero buffer at zero instead of
/// dividing by zero.
const PEAK_EPSILON: f64 = 1e-12;

/// Collapse interleaved multi-channel audio to mono by averaging each frame.
pub fn downmix_mono(interleaved: &[f64], channels: usize) -> Result<Vec<f64>, BrightenError> {
    if channels == 0 {
        return Err(BrightenError::InvalidInput(
            "channel count must be positive".into(),
        ));
    }
    if interleaved.is_empty() {
        return Err(BrightenError::InvalidInput("empty input buffer".into()));
    }
    if interleaved.len() % channels != 0 {
        return Err(BrightenError::InvalidInput(format!(
            "{} samples do not divide into {} channels",
            interleaved.len(),
            channels
        )));
    }
    if channels == 1 {
        return Ok(interleaved.to_vec());
    }

    let n_frames = interleaved.len() / channels;
    let mut mono = Vec::with_capacity(n_frames);
    for frame in interleaved.chunks_exact(channels) {
        mono.push(frame.iter().sum::<f64>() / channels as f64);
    }
    Ok(mono)
}

/// Brighten a mono buffer.
///
/// This is the main entry point. The output has the same length as the
/// input and a peak absolute value of at most 1.0. Applying the chain
/// twice brightens further; the transform is deliberately not idempotent.
pub fn render_brighten(
    input_audio: &[f64],
    sample_rate: u32,
    params: &BrightenParams,
) -> Result<Vec<f64>, BrightenError> {
    if input_audio.is_empty() {
        return Err(BrightenError::InvalidInput("empty input buffer".into()));
    }
    if !input_audio.iter().all(|x| x.is_finite()) {
        return Err(BrightenError::InvalidInput(
            "input contains non-finite samples".into(),
        ));
    }
    params.validate(sample_rate)?;

    let highpassed = apply_highpass(input_audio, sample_rate, params);

    // High-shelf boost: re-add amplified high-frequency content
    let mut out: Vec<f64> = input_audio
        .iter()
        .zip(highpassed.iter())
        .map(|(&dry, &hp)| dry + params.blend * hp)
        .collect();

    // Soft clip
    for s in out.iter_mut() {
        *s = (params.drive * *s).tanh();
    }

    // Peak normalize
    let peak = out.iter().map(|x| x.abs()).fold(0.0_f64, f64::max);
    let scale = 1.0 / (peak + PEAK_EPSILON);
    for s in out.iter_mut() {
        *s *= scale;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: u32 = 44100;

    fn sine(freq: f64, amp: f64, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| amp * (2.0 * std::f64::consts::PI * freq * i as f64 / SR as f64).sin())
            .collect()
    }

    /// Amplitude of the `freq` component via projection onto sin/cos.
    fn component_amplitude(audio: &[f64], freq: f64) -> f64 {
        let n = audio.len() as f64;
        let (mut s, mut c) = (0.0_f64, 0.0_f64);
        for (i, &x) in audio.iter().enumerate() {
            let phase = 2.0 * std::f64::consts::PI * freq * i as f64 / SR as f64;
            s += x * phase.sin();
            c += x * phase.cos();
        }
        2.0 * (s * s + c * c).sqrt() / n
    }

    #[test]
    fn test_output_length_matches_input() {
        let audio = sine(440.0, 0.5, 4096);
        let out = render_brighten(&audio, SR, &BrightenParams::default()).unwrap();
        assert_eq!(out.len(), audio.len());
    }

    #[test]
    fn test_peak_at_most_one() {
        let audio = sine(6000.0, 0.9, SR as usize);
        let out = render_brighten(&audio, SR, &BrightenParams::default()).unwrap();
        let peak = out.iter().map(|x| x.abs()).fold(0.0_f64, f64::max);
        assert!(peak <= 1.0 + 1e-9, "peak: {}", peak);
    }

    #[test]
    fn test_silence_stays_silence() {
        // 1 second of silence at 44100 Hz must come back as silence,
        // with no NaN from the normalization step.
        let audio = vec![0.0_f64; SR as usize];
        let out = render_brighten(&audio, SR, &BrightenParams::default()).unwrap();
        assert_eq!(out.len(), SR as usize);
        assert!(out.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_empty_input_rejected() {
        let err = render_brighten(&[], SR, &BrightenParams::default()).unwrap_err();
        assert!(matches!(err, BrightenError::InvalidInput(_)));
    }

    #[test]
    fn test_non_finite_input_rejected() {
        let mut audio = sine(440.0, 0.5, 1024);
        audio[100] = f64::NAN;
        let err = render_brighten(&audio, SR, &BrightenParams::default()).unwrap_err();
        assert!(matches!(err, BrightenError::InvalidInput(_)));

        audio[100] = f64::INFINITY;
        let err = render_brighten(&audio, SR, &BrightenParams::default()).unwrap_err();
        assert!(matches!(err, BrightenError::InvalidInput(_)));
    }

    #[test]
    fn test_corner_above_nyquist_rejected() {
        let mut params = BrightenParams::default();
        params.corner_hz = 30000.0;
        let audio = sine(440.0, 0.5, 1024);
        let err = render_brighten(&audio, SR, &params).unwrap_err();
        assert!(matches!(err, BrightenError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_low_sine_passes_nearly_unchanged() {
        // Well below the corner the high-pass contributes almost nothing,
        // and at small amplitude the soft clip is essentially linear, so
        // the output is the input scaled to unit peak.
        let audio = sine(200.0, 0.1, SR as usize);
        let out = render_brighten(&audio, SR, &BrightenParams::default()).unwrap();

        let in_peak = audio.iter().map(|x| x.abs()).fold(0.0_f64, f64::max);
        let err_rms: f64 = {
            let sum: f64 = audio
                .iter()
                .zip(out.iter())
                .map(|(&a, &b)| {
                    let d = a / in_peak - b;
                    d * d
                })
                .sum();
            (sum / audio.len() as f64).sqrt()
        };
        assert!(err_rms < 0.03, "rms deviation: {}", err_rms);
    }

    #[test]
    fn test_high_sine_boosted_more_than_low() {
        // Same amplitude in, compare the peak right before normalization.
        let params = BrightenParams::default();
        let pre_norm_peak = |freq: f64| {
            let audio = sine(freq, 0.1, SR as usize);
            let hp = apply_highpass(&audio, SR, &params);
            audio
                .iter()
                .zip(hp.iter())
                .map(|(&dry, &h)| (params.drive * (dry + params.blend * h)).tanh().abs())
                .fold(0.0_f64, f64::max)
        };
        let low = pre_norm_peak(200.0);
        let high = pre_norm_peak(8000.0);
        assert!(
            high / low > 2.0,
            "high peak {} should dominate low peak {}",
            high,
            low
        );
    }

    #[test]
    fn test_brightening_shifts_spectral_balance() {
        // Two equal tones in, the one above the corner comes out louder.
        let n = SR as usize;
        let audio: Vec<f64> = sine(200.0, 0.05, n)
            .iter()
            .zip(sine(8000.0, 0.05, n).iter())
            .map(|(&a, &b)| a + b)
            .collect();
        let out = render_brighten(&audio, SR, &BrightenParams::default()).unwrap();

        let ratio_in = component_amplitude(&audio, 8000.0) / component_amplitude(&audio, 200.0);
        let ratio_out = component_amplitude(&out, 8000.0) / component_amplitude(&out, 200.0);
        assert!(
            ratio_out > 2.0 * ratio_in,
            "in ratio {} out ratio {}",
            ratio_in,
            ratio_out
        );
    }

    #[test]
    fn test_not_idempotent() {
        // Applying twice brightens further; expected, not a bug.
        let n = SR as usize;
        let audio: Vec<f64> = sine(200.0, 0.3, n)
            .iter()
            .zip(sine(8000.0, 0.1, n).iter())
            .map(|(&a, &b)| a + b)
            .collect();
        let once = render_brighten(&audio, SR, &BrightenParams::default()).unwrap();
        let twice = render_brighten(&once, SR, &BrightenParams::default()).unwrap();
        let max_diff = once
            .iter()
            .zip(twice.iter())
            .map(|(&a, &b)| (a - b).abs())
            .fold(0.0_f64, f64::max);
        assert!(max_diff > 0.01, "max diff: {}", max_diff);
    }

    #[test]
    fn test_downmix_stereo_average() {
        let interleaved = [1.0, 0.0, 0.5, 0.5, -1.0, 1.0];
        let mono = downmix_mono(&interleaved, 2).unwrap();
        assert_eq!(mono, vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_downmix_mono_passthrough() {
        let audio = [0.1, 0.2, 0.3];
        assert_eq!(downmix_mono(&audio, 1).unwrap(), audio.to_vec());
    }

    #[test]
    fn test_downmix_rejects_partial_frames() {
        let err = downmix_mono(&[1.0, 2.0, 3.0], 2).unwrap_err();
        assert!(matches!(err, BrightenError::InvalidInput(_)));
        let err = downmix_mono(&[], 2).unwrap_err();
        assert!(matches!(err, BrightenError::InvalidInput(_)));
        let err = downmix_mono(&[1.0], 0).unwrap_err();
        assert!(matches!(err, BrightenError::InvalidInput(_)));
    }
}
