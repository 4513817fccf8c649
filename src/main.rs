use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use stitchstrip::output::{CheckResult, ImageLabel};
use stitchstrip::source::{decode_file, is_supported_image, supported_input_extensions};
use stitchstrip::{
    Compositor, LayoutMode, LoadedImage, RasterSurface, RenderOutcome, Session, SharedContainer,
    Size, Surface, config, output,
};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stitchstrip")]
#[command(about = "Stitch images side by side or stacked into one canvas")]
#[command(long_about = "\
Stitch images side by side or stacked into one canvas

Every image is scaled to the container's height (horizontal) or width
(vertical), keeping its aspect ratio, and packed with no gaps in the order
given on the command line.

Settings come from stitchstrip.toml in --config-dir (optional); flags
override it. Run 'stitchstrip gen-config' for a documented config file.

Logging goes to stderr and is controlled by RUST_LOG (default: warn).")]
#[command(version = env!("STITCHSTRIP_BUILD"))]
struct Cli {
    /// Directory containing stitchstrip.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct LayoutArgs {
    /// Images in draw order
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// Layout mode (overrides config)
    #[arg(long)]
    mode: Option<LayoutMode>,

    /// Container client size as WIDTHxHEIGHT (overrides config)
    #[arg(long)]
    container: Option<Size>,

    /// Resize the container after the initial layout; repeatable
    #[arg(long = "resize", value_name = "WIDTHxHEIGHT")]
    resizes: Vec<Size>,

    /// Switch to the other layout mode after all resizes
    #[arg(long)]
    switch_mode: bool,

    /// Print layouts as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Load images and print the resulting layout after each step
    Layout(LayoutArgs),
    /// Report which inputs decode and their intrinsic sizes
    Check {
        /// Images to check
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },
    /// Print a stock stitchstrip.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Layout(args) => {
            let mut config = config::load_config(&cli.config_dir)?;
            if let Some(mode) = args.mode {
                config.layout.mode = mode;
            }
            if let Some(size) = args.container {
                config.container.width = size.width;
                config.container.height = size.height;
            }
            config.validate()?;
            warn_unrecognised(&args.images);
            run_layout(&config, &args)?;
        }
        Command::Check { images } => {
            let config = config::load_config(&cli.config_dir)?;
            init_thread_pool(&config.processing);
            warn_unrecognised(&images);
            let results: Vec<(String, CheckResult)> = images
                .par_iter()
                .map(|path| {
                    let result = match decode_file(path) {
                        Ok(image) => CheckResult::Ok(image.intrinsic_size()),
                        Err(e) => CheckResult::Failed(e.to_string()),
                    };
                    (display_name(path), result)
                })
                .collect();
            output::print_check(&results);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// One step's output in `--json` mode.
#[derive(serde::Serialize)]
struct JsonStep<'a> {
    step: &'a str,
    surface: Size,
    #[serde(skip_serializing_if = "Option::is_none")]
    layout: Option<&'a stitchstrip::compositing::Layout>,
}

fn run_layout(
    config: &config::StitchConfig,
    args: &LayoutArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    init_thread_pool(&config.processing);

    let host = SharedContainer::new(config.container.size());
    let surface = RasterSurface::with_style(
        config.container.size(),
        config.surface.background,
        config.surface.filter,
    );
    let compositor = Compositor::with_mode(host.clone(), surface, config.layout.mode)
        .with_max_pixels(config.surface.max_pixels);
    let mut session = Session::new(compositor, config.initial_slots);
    let mut free_slots = session.slot_ids().into_iter();

    // Decoding is the only slow part; do it in parallel, then load in order.
    let decoded: Vec<_> = args.images.par_iter().map(|p| decode_file(p)).collect();
    let mut labels = Vec::new();
    for (path, result) in args.images.iter().zip(decoded) {
        let image: LoadedImage = match result {
            Ok(image) => image,
            Err(e) => {
                warn!("skipping {}: {}", path.display(), e);
                continue;
            }
        };
        labels.push(ImageLabel {
            name: display_name(path),
            size: image.intrinsic_size(),
        });
        let slot = free_slots.next().unwrap_or_else(|| session.add_slot());
        session.load(slot, image)?;
    }

    let mut json_steps = Vec::new();
    let mut report = |step: &str, outcome: &RenderOutcome, surface: Size| {
        if args.json {
            let layout = match outcome {
                RenderOutcome::Drawn(layout) | RenderOutcome::TooLarge(layout) => {
                    Some(layout.clone())
                }
                _ => None,
            };
            json_steps.push((step.to_string(), surface, layout));
        } else {
            output::print_outcome(step, outcome, surface, &labels);
        }
    };

    // Each load already rendered; the last one is the initial layout.
    let initial = session.last_outcome();
    report("Initial layout", &initial, surface_size(&session));

    for size in &args.resizes {
        host.set_client_size(*size);
        let step = format!("After resize to {size}");
        let outcome = session.poll_resize().unwrap_or(RenderOutcome::Unchanged);
        report(&step, &outcome, surface_size(&session));
    }

    if args.switch_mode {
        let mode = session.layout_mode().toggled();
        let outcome = session.set_layout_mode(mode);
        report(&format!("After switching to {mode}"), &outcome, surface_size(&session));
    }

    if args.json {
        let steps: Vec<JsonStep> = json_steps
            .iter()
            .map(|(step, surface, layout)| JsonStep {
                step: step.as_str(),
                surface: *surface,
                layout: layout.as_ref(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&steps)?);
    }

    Ok(())
}

fn surface_size(session: &Session<SharedContainer, RasterSurface>) -> Size {
    session.with_compositor(|c| c.surface().size())
}

/// Decoding sniffs the format from contents, so an odd extension is only
/// worth a warning.
fn warn_unrecognised(paths: &[PathBuf]) {
    for path in paths.iter().filter(|p| !is_supported_image(p)) {
        warn!(
            "{} does not have a recognised image extension ({}); decoding by content",
            path.display(),
            supported_input_extensions().join(", ")
        );
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
