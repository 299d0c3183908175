// This is free and unencumbered software released into the public domain.

#[cfg(not(feature = "std"))]
compile_error!("camera-preview-geometry requires the 'std' feature");

use asimov_module::SysexitsError::{self, *};
use camera_preview::{
    cli,
    shared::{
        AspectRatio, Dimensions, PreviewError, PreviewGeometry, Rotation, SensorOrientation,
        SizeCandidates, SizePolicy, TransformMode, resolve_preview_geometry,
    },
};
use clap::Parser;
use clientele::StandardOptions;
use dogma::Named;
use serde_json::json;
use std::error::Error as StdError;

/// Resolves the preview output size and surface transform for a camera.
#[derive(Debug, Parser)]
struct Options {
    #[clap(flatten)]
    flags: StandardOptions,

    /// Supported output sizes in sensor-native order, e.g. 4000x3000,1920x1080
    #[arg(long, value_parser = parse_candidates)]
    candidates: SizeCandidates,

    /// Surface size in pixels
    #[arg(long, value_parser = parse_dimensions, default_value = "1080x1920")]
    viewport: Dimensions,

    /// Display rotation in degrees (0, 90, 180, 270)
    #[arg(long, value_parser = parse_rotation, default_value = "0")]
    display_rotation: Rotation,

    /// Sensor mounting angle in degrees (0, 90, 180, 270)
    #[arg(long, value_parser = parse_sensor_orientation, default_value = "90")]
    sensor_orientation: SensorOrientation,

    /// Cap the preview output and pick the smallest covering size under it
    #[arg(long, value_parser = parse_dimensions, conflicts_with = "aspect")]
    max_size: Option<Dimensions>,

    /// Match a fixed 4:3 or 16:9 preview frame instead of the whole viewport
    #[arg(long, value_parser = parse_aspect)]
    aspect: Option<AspectRatio>,

    #[arg(long, value_enum, default_value = "unified")]
    transform: TransformArg,

    #[arg(
        value_name = "FORMAT",
        short = 'o',
        long = "output",
        value_enum,
        default_value = "text"
    )]
    output: OutputFormat,
}

#[derive(Debug, Clone, clap::ValueEnum)]
enum TransformArg {
    Unified,
    Legacy,
}

impl From<TransformArg> for TransformMode {
    fn from(arg: TransformArg) -> Self {
        match arg {
            TransformArg::Unified => TransformMode::Unified,
            TransformArg::Legacy => TransformMode::Legacy,
        }
    }
}

#[derive(Debug, Clone, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Jsonl,
}

pub fn main() -> Result<SysexitsError, Box<dyn StdError>> {
    asimov_module::dotenv().ok();
    let args = asimov_module::args_os()?;
    let options = Options::parse_from(args);

    if options.flags.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(EX_OK);
    }

    if options.flags.license {
        print!("{}", include_str!("../../UNLICENSE"));
        return Ok(EX_OK);
    }

    #[cfg(feature = "tracing")]
    asimov_module::init_tracing_subscriber(&options.flags).expect("failed to initialize logging");

    let exit_code = match run_geometry(&options) {
        Ok(()) => EX_OK,
        Err(err) => cli::handle_error(&err, &options.flags),
    };

    Ok(exit_code)
}

fn run_geometry(options: &Options) -> Result<(), PreviewError> {
    let policy = match (options.max_size, options.aspect) {
        (Some(max), _) => SizePolicy::Bounded { max },
        (None, Some(ratio)) => SizePolicy::FixedAspect(ratio),
        (None, None) => SizePolicy::ClosestAspect,
    };
    let mode = TransformMode::from(options.transform.clone());

    cli::info_user(
        &options.flags,
        &format!(
            "resolving {} candidates for a {} viewport at {} degrees",
            options.candidates.len(),
            options.viewport,
            options.display_rotation
        ),
    );

    let geometry = resolve_preview_geometry(
        &options.candidates,
        options.sensor_orientation,
        options.viewport,
        options.display_rotation,
        policy,
        mode,
    );

    if let SizePolicy::Bounded { max } = policy {
        let cap = if geometry.sensor_rotated { max.transposed() } else { max };
        if !geometry.buffer_size.fits_within(&cap) {
            cli::warn_user(
                &options.flags,
                "no candidate fits under the size cap, using the first one",
            );
        }
    }

    match options.output {
        OutputFormat::Text => print_text(&geometry, &policy, &mode),
        OutputFormat::Jsonl => print_jsonl(&geometry, &policy, &mode),
    }

    Ok(())
}

fn print_text(g: &PreviewGeometry, policy: &SizePolicy, mode: &TransformMode) {
    let m = &g.transform;
    let (tx, ty) = m.translation();
    println!("policy: {}", policy.name());
    println!("sensor rotated: {}", g.sensor_rotated);
    println!("buffer size: {}", g.buffer_size);
    println!("transform ({}): {:?}", mode.name(), m.to_array());
    println!("  rotation: {:.1} deg", m.rotation_degrees());
    println!("  scale: {:.4} x {:.4}", m.axis_scale_x(), m.axis_scale_y());
    println!("  translation: {:.1}, {:.1}", tx, ty);
}

fn print_jsonl(g: &PreviewGeometry, policy: &SizePolicy, mode: &TransformMode) {
    let m = &g.transform;
    let (tx, ty) = m.translation();
    println!(
        "{}",
        json!({
            "policy": policy.name(),
            "viewport": { "width": g.viewport.width(), "height": g.viewport.height() },
            "rotation": g.rotation.degrees(),
            "sensor_rotated": g.sensor_rotated,
            "buffer_size": { "width": g.buffer_size.width(), "height": g.buffer_size.height() },
            "transform": {
                "mode": mode.name(),
                "matrix": m.to_array(),
                "rotation_degrees": m.rotation_degrees(),
                "scale": [m.axis_scale_x(), m.axis_scale_y()],
                "translation": [tx, ty],
            },
        })
    );
}

fn parse_dimensions(s: &str) -> Result<Dimensions, String> {
    s.parse().map_err(|e: PreviewError| e.to_string())
}

fn parse_candidates(s: &str) -> Result<SizeCandidates, String> {
    s.parse().map_err(|e: PreviewError| e.to_string())
}

fn parse_aspect(s: &str) -> Result<AspectRatio, String> {
    s.parse().map_err(|e: PreviewError| e.to_string())
}

fn parse_rotation(s: &str) -> Result<Rotation, String> {
    let degrees: i32 = s.trim().parse().map_err(|_| format!("not a number: {s}"))?;
    Rotation::from_degrees(degrees).map_err(|e| e.to_string())
}

fn parse_sensor_orientation(s: &str) -> Result<SensorOrientation, String> {
    let degrees: i32 = s.trim().parse().map_err(|_| format!("not a number: {s}"))?;
    SensorOrientation::new(degrees).map_err(|e| e.to_string())
}
