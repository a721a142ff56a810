use clap::{Parser, Subcommand};
use panoprep::codec::{Blob, EncodedImage, ImageSource};
use panoprep::config::{self, PipelineConfig};
use panoprep::imaging::{ImagePipeline, RustBackend};
use panoprep::{output, validate};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Where to put an encoded result.
#[derive(clap::Args, Clone)]
struct OutputArgs {
    /// Write the JPEG here instead of printing the data-URI
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Parser)]
#[command(name = "panoprep")]
#[command(version)]
#[command(about = "Normalize panorama uploads: validate, cap, resize, thumbnail")]
#[command(long_about = "\
Normalize panorama uploads: validate, cap, resize, thumbnail

Inputs are image files, or text files holding a data-URI
(data:image/jpeg;base64,...). Outputs are JPEG.

Accepted uploads are image/jpeg with even sides and width = 2 x height.

Set RUST_LOG=debug to trace each decode/draw/encode step.

Run 'panoprep gen-config' to print a documented panoprep.toml.")]
struct Cli {
    /// Config file (missing file = defaults)
    #[arg(long, default_value = "panoprep.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check type and 2:1 dimensions of an upload
    Check { file: PathBuf },
    /// Print the natural size of an image
    Dimensions { file: PathBuf },
    /// Redraw within the size cap and re-encode
    Load {
        file: PathBuf,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Stretch-resize to an exact size
    Resize {
        file: PathBuf,
        #[arg(long)]
        width: u32,
        #[arg(long)]
        height: u32,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Square cover-crop thumbnail
    Thumbnail {
        file: PathBuf,
        /// Side in pixels (default from config)
        #[arg(long)]
        size: Option<u32>,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Print a stock panoprep.toml with all options documented
    GenConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::GenConfig => print!("{}", config::stock_config_toml()),
        command => {
            let config = PipelineConfig::load(&cli.config)?;
            let pipeline = ImagePipeline::new(RustBackend::new(), config);
            run(&pipeline, command).await?;
        }
    }

    Ok(())
}

async fn run(
    pipeline: &ImagePipeline<RustBackend>,
    command: Command,
) -> Result<(), Box<dyn std::error::Error>> {
    let slice_size = pipeline.config().codec.slice_size;
    match command {
        Command::Check { file } => {
            let source = read_source(&file)?;
            let report = validate::check_upload(pipeline, &source).await;
            for line in output::format_check(&file, &report) {
                println!("{}", line);
            }
            if !report.is_valid() {
                std::process::exit(1);
            }
        }
        Command::Dimensions { file } => {
            let source = read_source(&file)?;
            let dims = pipeline.get_image_dimension(&source).await;
            println!("{}", output::format_dimensions(dims));
        }
        Command::Load { file, out } => {
            let loaded = pipeline.load_base64(&read_source(&file)?).await?;
            for line in output::format_loaded(&loaded) {
                eprintln!("{}", line);
            }
            emit("normalized", loaded.image_base64, &out, slice_size)?;
        }
        Command::Resize {
            file,
            width,
            height,
            out,
        } => {
            let encoded = pipeline
                .resize_image(&read_source(&file)?, width, height)
                .await?;
            emit("resized", encoded, &out, slice_size)?;
        }
        Command::Thumbnail { file, size, out } => {
            let source = read_source(&file)?;
            let encoded = match size {
                Some(size) => pipeline.get_thumbnail_sized(&source, size).await?,
                None => pipeline.get_thumbnail(&source).await?,
            };
            emit("thumbnail", encoded, &out, slice_size)?;
        }
        Command::GenConfig => print!("{}", config::stock_config_toml()),
    }

    Ok(())
}

/// Read a file as a blob, or as a data-URI if it holds one.
fn read_source(path: &Path) -> std::io::Result<ImageSource> {
    let bytes = std::fs::read(path)?;
    if bytes.get(..5).is_some_and(|scheme| scheme.eq_ignore_ascii_case(b"data:")) {
        if let Ok(text) = String::from_utf8(bytes.clone()) {
            return Ok(ImageSource::DataUrl(text.trim().to_string()));
        }
    }
    Ok(ImageSource::Blob(Blob::sniffed(bytes)))
}

fn emit(
    label: &str,
    encoded: EncodedImage,
    out: &OutputArgs,
    slice_size: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    match &out.output {
        Some(path) => {
            let blob = encoded.to_blob(slice_size)?;
            std::fs::write(path, &blob.bytes)?;
            println!("{}", output::format_written(label, path, blob.len()));
        }
        None => println!("{}", encoded.into_string()),
    }
    Ok(())
}
