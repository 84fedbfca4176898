use clap::{Parser, Subcommand};
use imgfit::config::{self, ToolConfig};
use imgfit::editor::EditorSession;
use imgfit::encode::{CompressParams, EncodeBackend, ResizeParams, RustBackend, SizeEstimator};
use imgfit::geometry::Preset;
use imgfit::output::{self, AnalysisReport, ResolvedAction};
use imgfit::params::{Dimension, OutputFormat, Quality, ResizePreset, locked_counterpart};
use imgfit::target;
use std::path::{Path, PathBuf};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "imgfit")]
#[command(about = "Crop, resize, and compress images toward a target size")]
#[command(long_about = "\
Crop, resize, and compress images toward a target size

Crop regions can be given explicitly or via quick presets; resize accepts
pixel, centimeter, or inch dimensions as well as named presets; compress
takes either a fixed quality or a target file size. Target sizes accept
suffixed values ('2mb', '200kb') — a bare number means KB.

Run 'imgfit gen-config' to generate a documented imgfit.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Directory to read imgfit.toml from
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

/// Shared flags for commands that encode an output file.
#[derive(clap::Args, Clone)]
struct OutputArgs {
    /// Output path (defaults to a name derived from the operation)
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Output format: jpeg, png, or webp (default from config)
    #[arg(long, short)]
    format: Option<OutputFormat>,
}

/// Quick-crop presets mirrored from the editor.
#[derive(Clone, Copy, clap::ValueEnum)]
enum CropPresetArg {
    Square,
    Widescreen,
    Standard,
    Full,
}

impl From<CropPresetArg> for Preset {
    fn from(p: CropPresetArg) -> Self {
        match p {
            CropPresetArg::Square => Preset::Square,
            CropPresetArg::Widescreen => Preset::Widescreen,
            CropPresetArg::Standard => Preset::Standard,
            CropPresetArg::Full => Preset::Full,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Show image dimensions and file size
    Info {
        image: PathBuf,
    },
    /// Cut a rectangle out of an image
    Crop {
        image: PathBuf,

        /// Region origin and size in source pixels (coerced into bounds)
        #[arg(long, default_value_t = 0.0)]
        x: f64,
        #[arg(long, default_value_t = 0.0)]
        y: f64,
        #[arg(long)]
        width: Option<f64>,
        #[arg(long)]
        height: Option<f64>,

        /// Quick-crop preset (overrides explicit region values)
        #[arg(long, value_enum)]
        preset: Option<CropPresetArg>,

        /// Encoding quality 1-100 (default from config)
        #[arg(long, short)]
        quality: Option<u32>,

        #[command(flatten)]
        out: OutputArgs,
    },
    /// Resample an image to new dimensions
    Resize {
        image: PathBuf,

        /// Width with optional unit suffix: 800, 800px, 20cm, 8.5in
        #[arg(long)]
        width: Option<String>,
        /// Height with optional unit suffix
        #[arg(long)]
        height: Option<String>,

        /// Named output size (overrides width/height)
        #[arg(long, value_enum)]
        preset: Option<ResizePreset>,

        /// Keep the source aspect ratio, deriving the missing edge
        #[arg(long)]
        lock_ratio: bool,

        /// Grow the image until the encoded size reaches this target
        /// ('1mb', '500kb', bare number = KB)
        #[arg(long)]
        target: Option<String>,

        #[command(flatten)]
        out: OutputArgs,
    },
    /// Re-encode an image at lower quality, dimensions unchanged
    Compress {
        image: PathBuf,

        /// Encoding quality 1-100 (default from config)
        #[arg(long, short, conflicts_with = "target")]
        quality: Option<u32>,

        /// Shrink until the encoded size fits this target
        /// ('2mb', '200kb', bare number = KB)
        #[arg(long)]
        target: Option<String>,

        #[command(flatten)]
        out: OutputArgs,
    },
    /// Report what it would take to meet a target size
    Analyze {
        image: PathBuf,

        /// Target file size ('2mb', '200kb', bare number = KB)
        #[arg(long)]
        target: String,

        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock imgfit.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config_dir)?;
    let backend = RustBackend::new();

    match cli.command {
        Command::Info { image } => {
            let dims = backend.identify(&image)?;
            let file_size = std::fs::metadata(&image)?.len();
            output::print_info(&image.display().to_string(), dims, file_size);
        }
        Command::Crop {
            image,
            x,
            y,
            width,
            height,
            preset,
            quality,
            out,
        } => {
            run_crop(&backend, &cfg, &image, x, y, width, height, preset, quality, out)?;
        }
        Command::Resize {
            image,
            width,
            height,
            preset,
            lock_ratio,
            target,
            out,
        } => {
            run_resize(
                &backend, &cfg, &image, width, height, preset, lock_ratio, target, out,
            )?;
        }
        Command::Compress {
            image,
            quality,
            target,
            out,
        } => {
            run_compress(&backend, &cfg, &image, quality, target, out)?;
        }
        Command::Analyze {
            image,
            target,
            json,
        } => {
            run_analyze(&backend, &cfg, &image, &target, json)?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn resolve_format(out: &OutputArgs, cfg: &ToolConfig) -> OutputFormat {
    out.format.unwrap_or(cfg.output.format)
}

/// Default output path next to the source: `<prefix>_<detail>.<ext>`.
fn default_output(source: &Path, prefix: &str, detail: &str, format: OutputFormat) -> PathBuf {
    let name = format!("{}_{}.{}", prefix, detail, format.extension());
    source.with_file_name(name)
}

#[allow(clippy::too_many_arguments)]
fn run_crop(
    backend: &dyn EncodeBackend,
    cfg: &ToolConfig,
    image: &Path,
    x: f64,
    y: f64,
    width: Option<f64>,
    height: Option<f64>,
    preset: Option<CropPresetArg>,
    quality: Option<u32>,
    out: OutputArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let dims = backend.identify(image)?;
    let original_bytes = std::fs::metadata(image)?.len();

    let viewport = (dims.width as f64, dims.height as f64);
    let mut session = EditorSession::new(dims.width, dims.height, viewport, cfg.editor.clone());
    match preset {
        Some(p) => session.apply_preset(p.into()),
        None => session.set_box(
            x,
            y,
            width.unwrap_or(dims.width as f64),
            height.unwrap_or(dims.height as f64),
        ),
    }

    let format = resolve_format(&out, cfg);
    let quality = quality.map(Quality::new).unwrap_or(cfg.output.quality());
    let (pw, ph) = session.crop_box().pixel_size();
    let output_path = out
        .output
        .unwrap_or_else(|| default_output(image, "cropped", &format!("{}x{}", pw, ph), format));

    let output_bytes = session.apply_crop(backend, image, &output_path, format, quality)?;
    output::print_report(output::format_crop_report(
        &image.display().to_string(),
        &output_path.display().to_string(),
        (&session.crop_box()).into(),
        original_bytes,
        output_bytes,
    ));
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_resize(
    backend: &dyn EncodeBackend,
    cfg: &ToolConfig,
    image: &Path,
    width: Option<String>,
    height: Option<String>,
    preset: Option<ResizePreset>,
    lock_ratio: bool,
    target: Option<String>,
    out: OutputArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let dims = backend.identify(image)?;
    let original_bytes = std::fs::metadata(image)?.len();
    let format = resolve_format(&out, cfg);

    let (target_w, target_h, quality) = if let Some(spec) = target.as_deref() {
        let Some(target_bytes) = target::parse_target_size(spec) else {
            return Err(format!("unusable target size: {spec}").into());
        };
        let estimator = SizeEstimator::open(image, format)?;
        let resolution = target::find_scale(target_bytes, dims.width, dims.height, &cfg.search, |s| {
            estimator.at_scale(s)
        })?;
        if !resolution.met_target {
            log::warn!(
                "target {} not reachable within the scale ceiling; best effort {}x{}",
                target_bytes,
                resolution.width,
                resolution.height
            );
        }
        // Growing toward a minimum size: quality stays at full
        (resolution.width, resolution.height, Quality::new(100))
    } else if let Some(p) = preset {
        let (w, h) = p.dimensions((dims.width, dims.height));
        (w, h, cfg.output.quality())
    } else {
        let w = width
            .as_deref()
            .map(|s| s.parse::<Dimension>().map(|d| d.pixels()))
            .transpose()?;
        let h = height
            .as_deref()
            .map(|s| s.parse::<Dimension>().map(|d| d.pixels()))
            .transpose()?;
        let (w, h) = match (w, h) {
            (Some(w), Some(_)) if lock_ratio => {
                (w, locked_counterpart(w, dims.width, dims.height))
            }
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => (w, locked_counterpart(w, dims.width, dims.height)),
            (None, Some(h)) => (locked_counterpart(h, dims.height, dims.width), h),
            (None, None) => {
                return Err("resize needs --width, --height, --preset, or --target".into());
            }
        };
        (w.max(1), h.max(1), cfg.output.quality())
    };

    let output_path = out.output.unwrap_or_else(|| {
        default_output(image, "resized", &format!("{}x{}", target_w, target_h), format)
    });
    let output_bytes = backend.resize(&ResizeParams {
        source: image.to_path_buf(),
        output: output_path.clone(),
        width: target_w,
        height: target_h,
        format,
        quality,
    })?;

    output::print_report(output::format_resize_report(
        &image.display().to_string(),
        &output_path.display().to_string(),
        target_w,
        target_h,
        original_bytes,
        output_bytes,
    ));
    Ok(())
}

fn run_compress(
    backend: &dyn EncodeBackend,
    cfg: &ToolConfig,
    image: &Path,
    quality: Option<u32>,
    target: Option<String>,
    out: OutputArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let original_bytes = std::fs::metadata(image)?.len();
    let format = resolve_format(&out, cfg);

    let quality = if let Some(spec) = target.as_deref() {
        let Some(target_bytes) = target::parse_target_size(spec) else {
            return Err(format!("unusable target size: {spec}").into());
        };
        let estimator = SizeEstimator::open(image, format)?;
        let resolution = target::find_quality(target_bytes, |q| estimator.at_quality(q))?;
        if !resolution.met_target {
            log::warn!(
                "target {} not reachable; quality 1 still yields {} bytes",
                target_bytes,
                resolution.estimated_bytes
            );
        }
        resolution.quality
    } else {
        quality.map(Quality::new).unwrap_or(cfg.output.quality())
    };

    let stem = image
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let output_path = out
        .output
        .unwrap_or_else(|| default_output(image, "compressed", &stem, format));

    let output_bytes = backend.compress(&CompressParams {
        source: image.to_path_buf(),
        output: output_path.clone(),
        format,
        quality,
    })?;

    output::print_report(output::format_compress_report(
        &image.display().to_string(),
        &output_path.display().to_string(),
        quality.value(),
        original_bytes,
        output_bytes,
    ));
    Ok(())
}

fn run_analyze(
    backend: &dyn EncodeBackend,
    cfg: &ToolConfig,
    image: &Path,
    target: &str,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(target_bytes) = target::parse_target_size(target) else {
        return Err(format!("unusable target size: {target}").into());
    };
    let dims = backend.identify(image)?;
    let file_size = std::fs::metadata(image)?.len();

    let estimator = SizeEstimator::open(image, cfg.output.format)?;
    let resolution = if file_size > target_bytes {
        let r = target::find_quality(target_bytes, |q| estimator.at_quality(q))?;
        ResolvedAction::from_quality(&r)
    } else if file_size < target_bytes {
        let r = target::find_scale(target_bytes, dims.width, dims.height, &cfg.search, |s| {
            estimator.at_scale(s)
        })?;
        ResolvedAction::from_scale(&r)
    } else {
        ResolvedAction::Keep {
            estimated_bytes: file_size,
        }
    };

    let report = AnalysisReport {
        source: image.display().to_string(),
        width: dims.width,
        height: dims.height,
        file_size,
        target_bytes,
        resolution,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        output::print_analysis(&report);
    }
    Ok(())
}
