use anyhow::Context;
use clap::{Parser, Subcommand};
use seascape_driver::{ManualClock, RenderLoop};
use seascape_render::{CpuRenderer, OrbitCamera};
use seascape_scene::{BlockFont, Material, Scene, SceneConfig};
use seascape_shading::mix_strength;
use seascape_tools::SceneInspector;
use seascape_waves::{big_wave, displacement, small_waves};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "seascape-cli", about = "Headless seascape tooling")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scene config (YAML). Defaults to the stock scene.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and the stock scene layout
    Info,
    /// Evaluate displacement and shading at one point
    Sample {
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        x: f32,
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        z: f32,
        /// Time in seconds
        #[arg(long, default_value = "0")]
        t: f32,
        /// Use the text material instead of the water one
        #[arg(long)]
        text: bool,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Run the render loop headless against the CPU renderer
    Simulate {
        #[arg(short, long, default_value = "1000")]
        frames: u64,
        /// Simulated frame rate of the deterministic clock
        #[arg(long, default_value = "60")]
        fps: f32,
        /// Water plane segments per side. Defaults to the config's value.
        #[arg(short, long)]
        resolution: Option<u32>,
        /// Print every Nth frame
        #[arg(long, default_value = "100")]
        every: u64,
        /// Print one JSON object per reported frame
        #[arg(long)]
        json: bool,
    },
    /// Print the effective scene config as YAML
    Config,
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<SceneConfig> {
    match path {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(SceneConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Info => {
            println!("seascape-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", seascape_render::crate_info());
            let scene = Scene::from_config(&config, &BlockFont);
            println!("{}", SceneInspector::summary(&scene));
            for name in SceneInspector::list_objects(&scene) {
                if let Some(info) = SceneInspector::inspect_object(&scene, name) {
                    println!("  {info}");
                }
            }
        }
        Commands::Sample {
            x,
            z,
            t,
            text,
            json,
        } => {
            let material = if text {
                config.text.material
            } else {
                config.water
            };
            let mut m = Material::new(material.waves, material.colors);
            m.time = t;

            let big = big_wave(x, z, t, &m.waves);
            let small = small_waves(x, z, t, &m.waves);
            let e = displacement(x, z, t, &m.waves);
            let strength = mix_strength(e, &m.colors);
            let color = m.color_for(e);

            if json {
                let out = serde_json::json!({
                    "x": x,
                    "z": z,
                    "t": t,
                    "big_wave": big,
                    "small_waves": small,
                    "elevation": e,
                    "mix_strength": strength,
                    "color": color.to_hex(),
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("point:       ({x}, {z}) at t={t}");
                println!("big wave:    {big:+.6}");
                println!("small waves: {small:+.6}");
                println!("elevation:   {e:+.6}");
                println!("mix:         {strength:.6}");
                println!("color:       {color}");
            }
        }
        Commands::Simulate {
            frames,
            fps,
            resolution,
            every,
            json,
        } => {
            anyhow::ensure!(fps > 0.0, "fps must be positive, got {fps}");
            let config = config.with_resolution(resolution)?;
            let resolution = config.plane.resolution;

            let mut scene = Scene::from_config(&config, &BlockFont);
            let mut camera = OrbitCamera::from_config(&config.camera);
            let mut renderer = CpuRenderer::new();
            let mut render_loop = RenderLoop::new(ManualClock::at_fps(fps));
            tracing::info!(frames, fps, resolution, "simulating");

            let every = every.max(1);
            let mut last_time = f32::NEG_INFINITY;
            let mut monotonic = true;
            let mut report = Ok(());
            let completed = render_loop.run_headless(
                frames,
                &mut scene,
                &mut camera,
                &mut renderer,
                |info, stats| {
                    monotonic &= info.time >= last_time;
                    last_time = info.time;
                    let last = info.frame + 1 == frames;
                    if report.is_err() || !(info.frame % every == 0 || last) {
                        return;
                    }
                    if json {
                        match serde_json::to_string(&stats) {
                            Ok(line) => println!("{line}"),
                            Err(e) => report = Err(e),
                        }
                    } else {
                        println!("{stats}");
                    }
                },
            )?;
            report?;

            if !json {
                println!(
                    "completed {completed} frames, final t={:.3}s, time monotonic: {}",
                    render_loop.time(),
                    if monotonic { "OK" } else { "VIOLATED" }
                );
            }
            anyhow::ensure!(monotonic, "time went backwards during simulation");
        }
        Commands::Config => {
            print!("{}", config.to_yaml()?);
        }
    }

    Ok(())
}
