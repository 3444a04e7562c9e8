// Command-line shell over the transcoding library.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use image_transcoder_lib::{
    BatchEvent, BatchRequest, ExportSettings, ImageFormat, JobConfig, estimate_sizes, human_size,
    start_batch,
};

#[derive(Parser)]
#[command(name = "image-transcoder", version, about = "Batch image transcoding to PNG, JPEG and WebP")]
struct Cli {
    /// Log pipeline details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a folder's images in place, retiring the originals
    Convert(ConvertArgs),
    /// Export images into an output folder in one or more formats
    Export(ExportArgs),
    /// Print the estimated encoded size of one image per format
    Estimate(EstimateArgs),
}

#[derive(Args)]
struct ConvertArgs {
    /// Folder holding the originals
    folder: PathBuf,
    /// Format to convert to
    #[arg(long, default_value = "webp")]
    target: ImageFormat,
    /// Extension of the originals
    #[arg(long, default_value = "png")]
    source_ext: String,
    /// Delete originals instead of moving them to <folder>_<EXT>
    #[arg(long)]
    no_backup: bool,
    /// Re-encode even if the output already exists
    #[arg(long)]
    overwrite: bool,
    /// Drop transparency and encode lossy at quality 90
    #[arg(long)]
    no_alpha: bool,
    #[arg(long, default_value_t = 0)]
    max_width: u32,
    #[arg(long, default_value_t = 0)]
    max_height: u32,
}

#[derive(Args)]
struct EncodeArgs {
    /// JSON file with export settings; flags below override it
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Target format (repeatable); defaults to PNG
    #[arg(short, long = "format")]
    formats: Vec<ImageFormat>,
    /// Percentage scale, 1-100
    #[arg(long)]
    resize: Option<u32>,
    #[arg(long)]
    max_width: Option<u32>,
    #[arg(long)]
    max_height: Option<u32>,
    #[arg(long)]
    jpeg_quality: Option<u8>,
    #[arg(long)]
    webp_lossless: bool,
    #[arg(long)]
    webp_quality: Option<u8>,
    #[arg(long)]
    no_png_optimize: bool,
    /// Force opaque RGB output
    #[arg(long)]
    drop_alpha: bool,
}

impl EncodeArgs {
    fn export_settings(&self) -> Result<ExportSettings> {
        let mut settings = match &self.settings {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("reading settings file {}", path.display()))?;
                serde_json::from_str::<ExportSettings>(&raw)
                    .with_context(|| format!("parsing settings file {}", path.display()))?
            }
            None => ExportSettings { formats: Vec::new(), ..ExportSettings::default() },
        };

        if !self.formats.is_empty() {
            settings.formats = self.formats.clone();
        }
        if let Some(percent) = self.resize {
            settings.resize_percent = percent;
        }
        if let Some(max_width) = self.max_width {
            settings.max_width = max_width;
        }
        if let Some(max_height) = self.max_height {
            settings.max_height = max_height;
        }
        if let Some(quality) = self.jpeg_quality {
            settings.jpeg_quality = quality;
        }
        if let Some(quality) = self.webp_quality {
            settings.webp_quality = quality;
        }
        settings.webp_lossless |= self.webp_lossless;
        settings.drop_alpha |= self.drop_alpha;
        if self.no_png_optimize {
            settings.png_optimize = false;
        }

        Ok(settings.normalized())
    }
}

#[derive(Args)]
struct ExportArgs {
    /// Existing folder the outputs are written to
    output_dir: PathBuf,
    /// Source images
    #[arg(required = true)]
    sources: Vec<PathBuf>,
    #[command(flatten)]
    encode: EncodeArgs,
}

#[derive(Args)]
struct EstimateArgs {
    image: PathBuf,
    #[command(flatten)]
    encode: EncodeArgs,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns `Ok(false)` when the batch finished with failed items.
async fn run(command: Command) -> Result<bool> {
    let request = match command {
        Command::Convert(args) => BatchRequest::InPlace(JobConfig {
            folder: args.folder,
            keep_backup: !args.no_backup,
            overwrite: args.overwrite,
            no_alpha: args.no_alpha,
            source_extension: args.source_ext,
            target: args.target,
            max_width: args.max_width,
            max_height: args.max_height,
        }),
        Command::Export(args) => BatchRequest::Export {
            sources: args.sources,
            output_dir: args.output_dir,
            settings: args.encode.export_settings()?,
        },
        Command::Estimate(args) => {
            let settings = args.encode.export_settings()?;
            let sizes = estimate_sizes(args.image.clone(), settings)
                .await
                .with_context(|| format!("estimating {}", args.image.display()))?;
            for (format, size) in sizes {
                println!("{format:<5} {}", human_size(size as u64));
            }
            return Ok(true);
        }
    };

    let mut handle = start_batch(request).context("batch could not start")?;

    let cancel = handle.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Stopping...");
            cancel.cancel();
        }
    });

    while let Some(event) = handle.next_event().await {
        match event {
            BatchEvent::Started { total } => debug!("{total} item(s) queued"),
            BatchEvent::Progress(update) => {
                debug!("[{}/{}] {}%", update.completed, update.total, update.percentage());
            }
            BatchEvent::Log(line) => println!("{line}"),
            BatchEvent::Complete(_) => break,
        }
    }

    let report = handle.wait().await.context("batch failed")?;
    println!();
    println!("{}", report.summary());
    if report.bytes_written > 0 {
        println!("Wrote {}", human_size(report.bytes_written));
    }
    for failure in report.failures() {
        if let image_transcoder_lib::Outcome::Failed { error } = &failure.outcome {
            println!("  {} → {}: {}", failure.source.display(), failure.format, error);
        }
    }

    Ok(!report.has_failures())
}
