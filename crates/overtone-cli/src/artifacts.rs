//! Analysis artifacts: spectrum CSV and summary JSON read/write.
//!
//! Artifact names derive from the analyzed file: `voice.wav` produces
//! `voice_spectrum.csv` and `voice_summary.json` beside it. The readers
//! tolerate malformed CSV rows so hand-edited or truncated artifacts
//! still compare.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use overtone_dsp::{AnalysisSummary, PowerSpectrum};

/// `<stem>_spectrum.csv` next to the input file.
pub fn spectrum_csv_path(input: &Path) -> PathBuf {
    artifact_path(input, "_spectrum.csv")
}

/// `<stem>_summary.json` next to the input file.
pub fn summary_json_path(input: &Path) -> PathBuf {
    artifact_path(input, "_summary.json")
}

fn artifact_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{stem}{suffix}"))
}

/// Display label for a comparison input: file stem minus the artifact suffix.
pub fn label_for(path: &Path, suffix: &str) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    stem.strip_suffix(suffix).unwrap_or(&stem).to_string()
}

pub fn write_spectrum_csv(path: &Path, spectrum: &PowerSpectrum) -> io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    write_spectrum_csv_to(&mut w, spectrum)?;
    w.flush()
}

fn write_spectrum_csv_to<W: Write>(w: &mut W, spectrum: &PowerSpectrum) -> io::Result<()> {
    writeln!(w, "freq_hz,power")?;
    for (f, p) in spectrum.freqs.iter().zip(spectrum.power.iter()) {
        writeln!(w, "{},{}", f, p)?;
    }
    Ok(())
}

pub fn read_spectrum_csv(path: &Path) -> io::Result<PowerSpectrum> {
    read_spectrum_csv_from(BufReader::new(File::open(path)?))
}

fn read_spectrum_csv_from<R: BufRead>(r: R) -> io::Result<PowerSpectrum> {
    let mut freqs = Vec::new();
    let mut power = Vec::new();
    for (i, line) in r.lines().enumerate() {
        let line = line?;
        if i == 0 {
            // header
            continue;
        }
        let mut fields = line.splitn(3, ',');
        let f = fields.next().unwrap_or("");
        let p = fields.next().unwrap_or("");
        // Malformed rows are skipped rather than failing the whole file
        if let (Ok(f), Ok(p)) = (f.trim().parse::<f64>(), p.trim().parse::<f64>()) {
            freqs.push(f);
            power.push(p);
        }
    }
    Ok(PowerSpectrum { freqs, power })
}

pub fn write_summary_json(path: &Path, summary: &AnalysisSummary) -> io::Result<()> {
    let json = summary
        .to_json()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(path, json)
}

pub fn read_summary_json(path: &Path) -> io::Result<AnalysisSummary> {
    let json = fs::read_to_string(path)?;
    AnalysisSummary::from_json(&json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Extract (bass, formant, overtones) percentages from a summary, matched
/// by band-label prefix so the configurable air-band label still resolves.
pub fn band_percentages(summary: &AnalysisSummary) -> (Option<f64>, Option<f64>, Option<f64>) {
    let mut bass = None;
    let mut formant = None;
    let mut overtones = None;
    for row in &summary.bands {
        if row.band.contains("Bass") {
            bass = Some(row.pct);
        } else if row.band.contains("Formant") {
            formant = Some(row.pct);
        } else if row.band.contains("Overtones") {
            overtones = Some(row.pct);
        }
    }
    (bass, formant, overtones)
}
