//! trackclean CLI - clean and compact GPS tracks
//!
//! Usage:
//!   trackclean-cli process <input> [--config <file>] [--output <file>]
//!   trackclean-cli info [--config <file>]
//!
//! Input is a GPX file or a JSON array of points. Output format follows the
//! output file extension (`.json` for JSON, anything else for GPX).

use clap::{Parser, Subcommand};
use gpx::{read, Gpx};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use trackclean::{
    Algorithm, CompressionStats, Datum, GeoPoint, PipelineConfig, TrajectoryPipeline,
};

#[derive(Parser)]
#[command(name = "trackclean-cli")]
#[command(about = "Clean, reproject and simplify GPS tracks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose debug output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline on a track
    Process {
        /// GPX file or JSON array of points
        input: PathBuf,

        /// Pipeline configuration (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output file (.json or .gpx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Simplification algorithm (e.g. DOUGLAS_PEUCKER, VISVALINGAM)
        #[arg(short, long)]
        algorithm: Option<String>,

        /// Simplification tolerance in meters
        #[arg(short, long)]
        tolerance: Option<f64>,

        /// Enable the noise filter
        #[arg(long)]
        filter: bool,

        /// Datum transform as SOURCE:TARGET (e.g. WGS84:GCJ02)
        #[arg(long)]
        transform: Option<String>,

        /// Print the full processing report
        #[arg(short, long)]
        summary: bool,
    },

    /// Show the pipeline configuration and supported algorithms
    Info {
        /// Pipeline configuration (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format(|buf, record| writeln!(buf, "[{:5}] {}", record.level(), record.args()))
        .init();

    let outcome = match cli.command {
        Commands::Process {
            input,
            config,
            output,
            algorithm,
            tolerance,
            filter,
            transform,
            summary,
        } => load_config(config.as_deref())
            .and_then(|cfg| {
                apply_overrides(cfg, algorithm, tolerance, filter, transform.as_deref())
            })
            .and_then(|cfg| run_process(&input, output.as_deref(), cfg, summary)),
        Commands::Info { config } => load_config(config.as_deref()).and_then(run_info),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig, String> {
    match path {
        Some(path) => PipelineConfig::from_json_file(path)
            .map_err(|e| format!("{}: {}", path.display(), e)),
        None => Ok(PipelineConfig::default()),
    }
}

/// Apply command line flags on top of the loaded configuration
fn apply_overrides(
    mut config: PipelineConfig,
    algorithm: Option<String>,
    tolerance: Option<f64>,
    filter: bool,
    transform: Option<&str>,
) -> Result<PipelineConfig, String> {
    if let Some(algorithm) = algorithm {
        config.simplify.algorithm = algorithm;
    }
    if let Some(tolerance) = tolerance {
        config.simplify.tolerance = tolerance;
    }
    if filter {
        config.filter.enabled = true;
    }
    if let Some(pair) = transform {
        let (source, target) = pair
            .split_once(':')
            .ok_or_else(|| format!("expected SOURCE:TARGET, got '{}'", pair))?;
        config.transform.enabled = true;
        config.transform.source = source.to_string();
        config.transform.target = target.to_string();
    }
    Ok(config)
}

fn run_process(
    input: &Path,
    output: Option<&Path>,
    config: PipelineConfig,
    print_summary: bool,
) -> Result<(), String> {
    println!("\n{}", "=".repeat(60));
    println!("Processing: {}", input.display());
    println!("{}", "=".repeat(60));

    let points = load_points(input)?;
    println!("Loaded {} points", points.len());

    let pipeline = TrajectoryPipeline::new(config).map_err(|e| e.to_string())?;
    let result = pipeline.process_with_result(&points);

    let stats = CompressionStats::compute(&points, &result.points);
    println!("{}", stats);

    if print_summary {
        println!("\n{}", result);
    }

    if let Some(output) = output {
        let name = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("track");
        if is_json(output) {
            write_json_file(output, &result.points)?;
        } else {
            write_gpx_file(output, &result.points, name)?;
        }
        println!("Wrote {} points to {}", result.points.len(), output.display());
    }

    Ok(())
}

fn run_info(config: PipelineConfig) -> Result<(), String> {
    let pipeline = TrajectoryPipeline::new(config).map_err(|e| e.to_string())?;
    println!("{}", pipeline.pipeline_info());
    println!(
        "\nDatum tokens: {}",
        Datum::ALL.map(|d| d.as_str()).join(", ")
    );
    println!(
        "Algorithm names are case-insensitive: {}",
        Algorithm::ALL.map(|a| a.as_str()).join(", ")
    );
    Ok(())
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("json"))
}

fn load_points(path: &Path) -> Result<Vec<GeoPoint>, String> {
    let points = if is_json(path) {
        let file = File::open(path).map_err(|e| e.to_string())?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| e.to_string())?
    } else {
        parse_gpx_file(path)?
    };

    if points.is_empty() {
        return Err("No track points found".to_string());
    }
    Ok(points)
}

/// Extract every track point of a GPX file, in file order
fn parse_gpx_file(path: &Path) -> Result<Vec<GeoPoint>, String> {
    let file = File::open(path).map_err(|e| e.to_string())?;
    let gpx: Gpx = read(BufReader::new(file)).map_err(|e| e.to_string())?;

    let mut points = Vec::new();
    for track in &gpx.tracks {
        for segment in &track.segments {
            for pt in &segment.points {
                let position = pt.point();
                let timestamp = match &pt.time {
                    Some(time) => parse_gpx_time(time)?,
                    None => 0,
                };

                let mut point = GeoPoint::new(position.y(), position.x(), timestamp);
                point.altitude = pt.elevation;
                points.push(point);
            }
        }
    }
    Ok(points)
}

/// Milliseconds since the epoch for a GPX timestamp
fn parse_gpx_time(time: &gpx::Time) -> Result<i64, String> {
    let iso = time.format().map_err(|e| e.to_string())?;
    let parsed = OffsetDateTime::parse(&iso, &Rfc3339).map_err(|e| e.to_string())?;
    Ok((parsed.unix_timestamp_nanos() / 1_000_000) as i64)
}

fn write_json_file(path: &Path, points: &[GeoPoint]) -> Result<(), String> {
    let file = File::create(path).map_err(|e| e.to_string())?;
    serde_json::to_writer_pretty(BufWriter::new(file), points).map_err(|e| e.to_string())
}

/// Write GPS points to a GPX file
fn write_gpx_file(path: &Path, points: &[GeoPoint], name: &str) -> Result<(), String> {
    let file = File::create(path).map_err(|e| e.to_string())?;
    let mut writer = BufWriter::new(file);
    write_gpx(&mut writer, points, name).map_err(|e| e.to_string())
}

fn write_gpx<W: Write>(writer: &mut W, points: &[GeoPoint], name: &str) -> std::io::Result<()> {
    writeln!(writer, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        writer,
        r#"<gpx version="1.1" creator="trackclean-cli" xmlns="http://www.topografix.com/GPX/1/1">"#
    )?;
    writeln!(writer, "  <trk>")?;
    writeln!(writer, "    <name>{}</name>", escape_xml(name))?;
    writeln!(writer, "    <trkseg>")?;

    for point in points {
        write!(
            writer,
            r#"      <trkpt lat="{:.7}" lon="{:.7}">"#,
            point.latitude, point.longitude
        )?;
        if let Some(altitude) = point.altitude {
            write!(writer, "<ele>{:.1}</ele>", altitude)?;
        }
        if let Some(time) = format_timestamp(point.timestamp) {
            write!(writer, "<time>{}</time>", time)?;
        }
        writeln!(writer, "</trkpt>")?;
    }

    writeln!(writer, "    </trkseg>")?;
    writeln!(writer, "  </trk>")?;
    writeln!(writer, "</gpx>")?;
    writer.flush()
}

/// RFC 3339 time for a millisecond timestamp; `None` for the 0 placeholder
fn format_timestamp(timestamp_ms: i64) -> Option<String> {
    if timestamp_ms == 0 {
        return None;
    }
    OffsetDateTime::from_unix_timestamp_nanos(timestamp_ms as i128 * 1_000_000)
        .ok()?
        .format(&Rfc3339)
        .ok()
}

/// Escape XML special characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
