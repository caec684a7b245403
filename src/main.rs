use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{info, LevelFilter};
use spheretrace::{
    camera::Camera,
    config::{Overrides, SceneFile},
    render::{progress_bar, render},
    scenes,
    vec3::Float,
};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
        }
    }
}

#[derive(Parser)]
#[command(name = "spheretrace", version, about = "Path traces scenes made of spheres")]
struct Cli {
    /// Set logging level (overrides RUST_LOG)
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a built-in scene or a JSON scene file
    Render {
        /// Built-in scene name (see `list`)
        #[arg(short, long, conflicts_with = "file")]
        scene: Option<String>,
        /// JSON scene file
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Output image; `.ppm` is written as plain-text PPM, other extensions by format
        #[arg(short, long, default_value = "out.png")]
        output: PathBuf,
        /// Worker threads (defaults to one per core)
        #[arg(long)]
        threads: Option<usize>,
        /// Hide the progress bar
        #[arg(short, long)]
        quiet: bool,
        #[command(flatten)]
        overrides: OverrideArgs,
    },

    /// List the built-in scenes
    List,

    /// Write a built-in scene to a JSON scene file
    Export {
        scene: String,
        output: PathBuf,
    },
}

#[derive(Args)]
struct OverrideArgs {
    #[arg(long)]
    width: Option<u32>,
    #[arg(long)]
    height: Option<u32>,
    #[arg(long)]
    samples: Option<u32>,
    #[arg(long)]
    max_depth: Option<u32>,
    #[arg(long)]
    gamma: Option<Float>,
    #[arg(long)]
    seed: Option<u64>,
}

impl From<OverrideArgs> for Overrides {
    fn from(args: OverrideArgs) -> Self {
        Overrides {
            width: args.width,
            height: args.height,
            samples_per_pixel: args.samples,
            max_depth: args.max_depth,
            gamma: args.gamma,
            seed: args.seed,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(level) = cli.log_level {
        logger.filter_level(level.into());
    }
    logger.init();

    match cli.command {
        Commands::Render {
            scene,
            file,
            output,
            threads,
            quiet,
            overrides,
        } => {
            let mut scene_file = match file {
                Some(path) => SceneFile::load(&path)
                    .with_context(|| format!("loading scene file {}", path.display()))?,
                None => scenes::by_name(scene.as_deref().unwrap_or("three_spheres"))?,
            };
            Overrides::from(overrides).apply(&mut scene_file);

            if let Some(threads) = threads {
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build_global()
                    .context("configuring worker threads")?;
            }

            let camera = Camera::new(&scene_file.camera)?;
            let progress = if quiet {
                indicatif::ProgressBar::hidden()
            } else {
                progress_bar(camera.image_height(), "Rendering")?
            };
            let start = std::time::Instant::now();
            let image = render(&camera, &scene_file.scene, &scene_file.render, progress)?;
            info!("render finished in {:.2}s", start.elapsed().as_secs_f64());

            image
                .save(&output)
                .with_context(|| format!("writing {}", output.display()))?;
        }
        Commands::List => {
            for name in scenes::SCENE_NAMES {
                println!("{name}");
            }
        }
        Commands::Export { scene, output } => {
            scenes::by_name(&scene)?
                .save(&output)
                .with_context(|| format!("writing {}", output.display()))?;
            info!("exported {scene} to {}", output.display());
        }
    }
    Ok(())
}
