//! waveguide-field: CLI tool for evaluating and rendering waveguide field patterns

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use waveguide_field::render::{render_image, write_ppm};
use waveguide_field::report::render_report;
use waveguide_field::{compute_grid, LengthUnit, Mode, WaveParameters, DEFAULT_GRID_SIZE};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// Nested JSON arrays, non-finite cells as null
    Json,
    /// Binary frame (marker, size, f32 samples)
    Bin,
    /// Colour-mapped PPM image
    Ppm,
    /// Text summary of dispersion and field range
    Report,
}

#[derive(Parser, Debug)]
#[command(name = "waveguide-field")]
#[command(about = "Evaluate guided-wave field patterns for TEM, TE10, TE20 and TM11 modes")]
#[command(version)]
struct Args {
    /// Propagation mode (tem, te10, te20, tm11; te and tm are accepted aliases)
    #[arg(short, long, default_value = "te10")]
    mode: String,

    /// Frequency in GHz
    #[arg(short, long, default_value = "10")]
    frequency: f64,

    /// Field amplitude
    #[arg(long, default_value = "1")]
    amplitude: f64,

    /// Waveguide width (broad wall, or coax radius for TEM)
    #[arg(long, default_value = "2")]
    width: f64,

    /// Waveguide height
    #[arg(long, default_value = "1")]
    height: f64,

    /// Length unit for width and height (m, cm, mm)
    #[arg(long, default_value = "cm")]
    length_unit: String,

    /// Time in seconds
    #[arg(short, long, default_value = "0")]
    time: f64,

    /// Samples per side
    #[arg(short, long, default_value_t = DEFAULT_GRID_SIZE)]
    grid_size: usize,

    /// Output format
    #[arg(long, value_enum, default_value = "report")]
    format: Format,

    /// Pixels per sample for PPM output
    #[arg(long, default_value = "4")]
    cell_px: usize,

    /// Output file (stdout for json and report when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn parse_unit(s: &str) -> Result<LengthUnit> {
    match s.to_lowercase().as_str() {
        "m" | "meter" | "meters" => Ok(LengthUnit::Meter),
        "cm" | "centimeter" | "centimeters" => Ok(LengthUnit::Centimeter),
        "mm" | "millimeter" | "millimeters" => Ok(LengthUnit::Millimeter),
        _ => anyhow::bail!("Unknown unit: {}. Use: m, cm, or mm", s),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // Geometry is evaluated in cm
    let to_cm = parse_unit(&args.length_unit)?.scale_to(&LengthUnit::Centimeter);
    let mode: Mode = args.mode.parse()?;

    let params = WaveParameters {
        mode,
        frequency_ghz: args.frequency,
        amplitude: args.amplitude,
        width_cm: args.width * to_cm,
        height_cm: args.height * to_cm,
        time: args.time,
        grid_size: args.grid_size,
    };

    let grid = compute_grid(&params).context("Field evaluation failed")?;
    if grid.is_evanescent() {
        info!("{} does not propagate at {} GHz in this guide", mode, params.frequency_ghz);
    }

    match args.format {
        Format::Json => {
            let json = serde_json::to_string(&grid)?;
            emit_text(&args.output, &json)?;
        }
        Format::Report => {
            let report = render_report(&params, Some(&grid))?;
            emit_text(&args.output, &report)?;
        }
        Format::Bin => {
            let path = args.output.as_ref().context("--output is required for bin format")?;
            fs::write(path, grid.to_binary())
                .with_context(|| format!("Failed to write output file: {:?}", path))?;
            eprintln!("Wrote field frame: {:?}", path);
        }
        Format::Ppm => {
            let path = args.output.as_ref().context("--output is required for ppm format")?;
            let image = render_image(&grid, args.cell_px);
            write_ppm(&image, path)
                .with_context(|| format!("Failed to write output file: {:?}", path))?;
        }
    }

    Ok(())
}

fn emit_text(output: &Option<PathBuf>, text: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, text)
                .with_context(|| format!("Failed to write output file: {:?}", path))?;
            eprintln!("Wrote: {:?}", path);
        }
        None => println!("{}", text),
    }
    Ok(())
}
