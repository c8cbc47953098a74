//! Command-line front end: render scene files to PNG
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use whitted::config::{LoadedScene, SceneFile};
use whitted::render::{render_frame_with_progress, ImageBuffer};

#[derive(Parser)]
#[command(name = "whitted")]
#[command(about = "Whitted-style ray tracer for sphere and cube scenes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Overrides for the scene's render settings
#[derive(clap::Args, Default)]
struct RenderArgs {
    /// Image width in pixels
    #[arg(long)]
    width: Option<u32>,
    /// Image height in pixels
    #[arg(long)]
    height: Option<u32>,
    /// Maximum recursion depth for reflected and refracted rays
    #[arg(long)]
    max_depth: Option<u32>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a single frame
    Render {
        /// YAML scene file
        scene: PathBuf,
        /// Output image (format from extension)
        #[arg(short, long, default_value = "output.png")]
        output: PathBuf,
        #[command(flatten)]
        args: RenderArgs,
    },
    /// Render a sequence of frames, moving the camera between each
    Orbit {
        /// YAML scene file
        scene: PathBuf,
        /// Directory the frames are written to
        #[arg(short, long, default_value = "frames")]
        output: PathBuf,
        /// Number of frames
        #[arg(long, default_value_t = 36)]
        frames: u32,
        /// Horizontal rotation input per frame (scaled by the camera's rotation speed)
        #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
        step: f64,
        /// Vertical rotation input per frame
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        pitch: f64,
        /// Distance moved toward the target per frame
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        dolly: f64,
        #[command(flatten)]
        args: RenderArgs,
    },
    /// Print a summary of a scene file
    Info {
        /// YAML scene file
        scene: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            scene,
            output,
            args,
        } => {
            let loaded = load(&scene, &args)?;
            render_to(&loaded, &output)?;
        }
        Commands::Orbit {
            scene,
            output,
            frames,
            step,
            pitch,
            dolly,
            args,
        } => {
            let mut loaded = load(&scene, &args)?;
            fs::create_dir_all(&output)
                .with_context(|| format!("creating {}", output.display()))?;
            for frame in 0..frames {
                render_to(&loaded, &output.join(format!("frame_{frame:04}.png")))?;
                loaded.camera.rotate(step, pitch);
                loaded.camera.move_by(dolly);
            }
        }
        Commands::Info { scene } => {
            let loaded = load(&scene, &RenderArgs::default())?;
            print_summary(&loaded);
        }
    }

    Ok(())
}

fn load(path: &Path, args: &RenderArgs) -> Result<LoadedScene> {
    let mut file =
        SceneFile::from_path(path).with_context(|| format!("loading {}", path.display()))?;
    if let Some(width) = args.width {
        file.render.width = width;
    }
    if let Some(height) = args.height {
        file.render.height = height;
    }
    if let Some(max_depth) = args.max_depth {
        file.render.max_depth = max_depth;
    }
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    file.build(base_dir)
        .with_context(|| format!("building {}", path.display()))
}

fn render_to(loaded: &LoadedScene, output: &Path) -> Result<()> {
    let settings = &loaded.settings;
    let tracer = loaded.tracer();

    let bar = ProgressBar::new(settings.height as u64);
    bar.set_style(
        ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len} rows ({eta})")?
            .progress_chars("=> "),
    );
    bar.set_message(output.display().to_string());

    let mut image = ImageBuffer::for_settings(settings);
    let stats = render_frame_with_progress(&tracer, &loaded.camera, settings, &mut image, &bar);
    bar.finish_and_clear();

    image
        .save(output)
        .with_context(|| format!("writing {}", output.display()))?;
    info!(
        "wrote {} ({} primary, {} secondary, {} shadow rays)",
        output.display(),
        stats.primary_rays,
        stats.secondary_rays,
        stats.shadow_rays
    );
    Ok(())
}

fn print_summary(loaded: &LoadedScene) {
    let s = &loaded.settings;
    let c = &loaded.camera;
    println!("Image: {}x{}, fov {} deg, max depth {}", s.width, s.height, s.fov_deg, s.max_depth);
    println!(
        "Camera: position {:?}, target {:?}, up {:?}",
        c.position.as_slice(),
        c.target.as_slice(),
        c.up.as_slice()
    );
    println!(
        "Light: position {:?}, intensity {}, color {:?}",
        loaded.light.position.as_slice(),
        loaded.light.intensity,
        loaded.light.color.as_slice()
    );
    println!("Shadows: {:?}", loaded.shadow_mode);
    let spheres = loaded
        .scene
        .objects()
        .iter()
        .filter(|o| matches!(o, whitted::objects::Primitive::Sphere(_)))
        .count();
    println!(
        "Objects: {} ({} spheres, {} cubes)",
        loaded.scene.len(),
        spheres,
        loaded.scene.len() - spheres
    );
}
