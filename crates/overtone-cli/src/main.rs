//! CLI for the overtone toolkit.
//!
//! Subcommands: `brighten` renders a high-shelf-boosted copy of a WAV,
//! `analyze` prints and optionally persists a band-energy report,
//! `compare-spectra` / `compare-bands` combine previously saved artifacts
//! into side-by-side comparison tables.

mod artifacts;
mod wav;

use std::error::Error;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use brighten_dsp::{downmix_mono, render_brighten, BrightenParams};
use clap::{Parser, Subcommand};
use overtone_dsp::{estimate_fundamental, summarize_bands, welch_psd, AnalysisSummary};

#[derive(Parser)]
#[command(name = "overtone", about = "Overtone analysis and brightening toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a brightened (high-shelf boosted) copy of a WAV file
    Brighten {
        /// Input WAV file
        input: PathBuf,

        /// Output WAV file (mono, 32-bit float)
        output: PathBuf,

        /// Sparse JSON preset with brighten parameters
        #[arg(long)]
        preset: Option<PathBuf>,

        /// High-pass corner frequency in Hz (overrides preset)
        #[arg(long)]
        corner_hz: Option<f64>,

        /// Butterworth filter order (overrides preset)
        #[arg(long)]
        order: Option<i32>,

        /// High-pass blend gain (overrides preset)
        #[arg(long)]
        blend: Option<f64>,

        /// Soft-clip drive (overrides preset)
        #[arg(long)]
        drive: Option<f64>,
    },

    /// Analyze the overtone content of a WAV file
    Analyze {
        /// Input WAV file
        wav: PathBuf,

        /// Also write <stem>_spectrum.csv and <stem>_summary.json
        #[arg(long)]
        save: bool,

        /// Overtones band low edge in Hz
        #[arg(long, default_value_t = 2000.0)]
        air_low: f64,

        /// Overtones band high edge in Hz
        #[arg(long, default_value_t = 8000.0)]
        air_high: f64,

        /// Decimal places for printed percentages
        #[arg(long, default_value_t = 2)]
        decimals: u32,
    },

    /// Combine saved spectrum CSVs into one comparison CSV
    CompareSpectra {
        /// Spectrum CSV files produced by `analyze --save`
        inputs: Vec<PathBuf>,

        /// Combined output CSV
        #[arg(long, default_value = "docs/real_comparison.csv")]
        out: PathBuf,
    },

    /// Compare saved band summaries side by side
    CompareBands {
        /// Summary JSON files produced by `analyze --save`
        inputs: Vec<PathBuf>,

        /// Comparison output CSV
        #[arg(long, default_value = "docs/band_comparison.csv")]
        out: PathBuf,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Brighten {
            input,
            output,
            preset,
            corner_hz,
            order,
            blend,
            drive,
        } => cmd_brighten(&input, &output, preset.as_deref(), corner_hz, order, blend, drive),
        Command::Analyze {
            wav,
            save,
            air_low,
            air_high,
            decimals,
        } => cmd_analyze(&wav, save, air_low, air_high, decimals),
        Command::CompareSpectra { inputs, out } => cmd_compare_spectra(&inputs, &out),
        Command::CompareBands { inputs, out } => cmd_compare_bands(&inputs, &out),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn cmd_brighten(
    input: &Path,
    output: &Path,
    preset: Option<&Path>,
    corner_hz: Option<f64>,
    order: Option<i32>,
    blend: Option<f64>,
    drive: Option<f64>,
) -> Result<(), Box<dyn Error>> {
    let contents = wav::read_wav(input)?;
    log::info!(
        "input: {} ch, {} Hz, {}-bit, {} samples/ch",
        contents.channels,
        contents.sample_rate,
        contents.bits_per_sample,
        contents.samples.len() / contents.channels.max(1)
    );

    let mut params = match preset {
        Some(path) => BrightenParams::from_json(&fs::read_to_string(path)?)?,
        None => BrightenParams::default(),
    };
    if let Some(v) = corner_hz {
        params.corner_hz = v;
    }
    if let Some(v) = order {
        params.order = v;
    }
    if let Some(v) = blend {
        params.blend = v;
    }
    if let Some(v) = drive {
        params.drive = v;
    }

    let mono = downmix_mono(&contents.samples, contents.channels)?;
    let brightened = render_brighten(&mono, contents.sample_rate, &params)?;
    wav::write_wav_mono(output, &brightened, contents.sample_rate)?;

    println!("Saved {} at {} Hz", output.display(), contents.sample_rate);
    Ok(())
}

fn cmd_analyze(
    input: &Path,
    save: bool,
    air_low: f64,
    air_high: f64,
    decimals: u32,
) -> Result<(), Box<dyn Error>> {
    let contents = wav::read_wav(input)?;
    let mono = downmix_mono(&contents.samples, contents.channels)?;
    let duration = mono.len() as f64 / contents.sample_rate as f64;

    let spectrum = welch_psd(&mono, contents.sample_rate)?;
    let (bands, total) = summarize_bands(&spectrum, air_low, air_high)?;
    let fundamental = estimate_fundamental(&spectrum);

    let file_name = input
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string());

    println!();
    println!("=== Overtone Analyzer ===");
    println!("File: {file_name}");
    println!(
        "Duration: {:.2} s   Sample Rate: {} Hz",
        duration, contents.sample_rate
    );
    match fundamental {
        Some(f0) => println!("Estimated peak fundamental (60-300 Hz): {f0:.1} Hz"),
        None => println!("Estimated peak fundamental: n/a"),
    }
    for b in &bands {
        println!("- {}: {:.prec$}%", b.band, b.pct, prec = decimals as usize);
    }

    if save {
        let csv_path = artifacts::spectrum_csv_path(input);
        let json_path = artifacts::summary_json_path(input);
        artifacts::write_spectrum_csv(&csv_path, &spectrum)?;
        let summary = AnalysisSummary {
            file: file_name,
            sample_rate: contents.sample_rate,
            duration_sec: duration,
            estimated_fundamental_hz: fundamental,
            bands,
            total_power: total,
            air_band_hz: [air_low, air_high],
            decimals,
        };
        artifacts::write_summary_json(&json_path, &summary)?;
        println!();
        println!("Saved: {}, {}", csv_path.display(), json_path.display());
    }
    Ok(())
}

fn cmd_compare_spectra(inputs: &[PathBuf], out: &Path) -> Result<(), Box<dyn Error>> {
    if inputs.is_empty() {
        return Err("no spectrum CSVs given".into());
    }

    let mut loaded = Vec::new();
    for path in inputs {
        if !path.exists() {
            log::warn!("skip: {} not found", path.display());
            continue;
        }
        let spectrum = artifacts::read_spectrum_csv(path)?;
        if spectrum.freqs.is_empty() {
            log::warn!("skip: {} contains no usable rows", path.display());
            continue;
        }
        loaded.push((artifacts::label_for(path, "_spectrum"), spectrum));
    }
    if loaded.is_empty() {
        return Err("no spectrum CSVs found; run `overtone analyze --save` first".into());
    }

    ensure_parent_dir(out)?;
    let mut w = BufWriter::new(File::create(out)?);
    writeln!(w, "file,freq_hz,power_db")?;
    for (label, spectrum) in &loaded {
        for (f, p) in spectrum.freqs.iter().zip(spectrum.power.iter()) {
            writeln!(w, "{},{},{}", label, f, to_db(*p))?;
        }
    }
    w.flush()?;

    for (label, spectrum) in &loaded {
        println!(
            "{}: {} bins, {:.0}-{:.0} Hz",
            label,
            spectrum.freqs.len(),
            spectrum.freqs.first().unwrap(),
            spectrum.freqs.last().unwrap()
        );
    }
    println!("Saved {}", out.display());
    Ok(())
}

fn cmd_compare_bands(inputs: &[PathBuf], out: &Path) -> Result<(), Box<dyn Error>> {
    if inputs.is_empty() {
        return Err("no summary JSONs given".into());
    }

    let mut rows = Vec::new();
    for path in inputs {
        if !path.exists() {
            log::warn!("skip: {} not found", path.display());
            continue;
        }
        let summary = match artifacts::read_summary_json(path) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("skip: {}: {}", path.display(), e);
                continue;
            }
        };
        let (bass, formant, overtones) = artifacts::band_percentages(&summary);
        rows.push((
            artifacts::label_for(path, "_summary"),
            bass.unwrap_or(0.0),
            formant.unwrap_or(0.0),
            overtones.unwrap_or(0.0),
        ));
    }
    if rows.is_empty() {
        return Err("no summary JSONs found; run `overtone analyze --save` first".into());
    }

    ensure_parent_dir(out)?;
    let mut w = BufWriter::new(File::create(out)?);
    writeln!(w, "file,bass_pct,formant_pct,overtones_pct")?;
    for (label, bass, formant, overtones) in &rows {
        writeln!(w, "{},{},{},{}", label, bass, formant, overtones)?;
    }
    w.flush()?;

    println!(
        "{:<28} {:>10} {:>10} {:>10}",
        "File", "Bass", "Formant", "Overtones"
    );
    for (label, bass, formant, overtones) in &rows {
        println!(
            "{:<28} {:>9.2}% {:>9.2}% {:>9.2}%",
            label, bass, formant, overtones
        );
    }
    println!("Saved {}", out.display());
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }
    Ok(())
}

fn to_db(power: f64) -> f64 {
    10.0 * power.max(1e-20).log10()
}
