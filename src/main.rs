//! objmgr - run object manager scripts against a scene

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use objmgr::lua::ScriptHost;
use objmgr::world::Scene;
use objmgr::{Config, ObjectManager, Report};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Map object manager script runner
#[derive(Parser, Debug)]
#[command(
    name = "objmgr",
    version,
    about = "Hide and restore map objects in a scene with Lua scripts"
)]
struct Args {
    /// Scene file (TOML) describing classes and objects
    #[arg(short, long)]
    scene: PathBuf,

    /// Lua scripts to run in order (can be specified multiple times)
    #[arg(long = "script")]
    scripts: Vec<PathBuf>,

    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Drop links to objects that no longer exist before reporting
    #[arg(long)]
    sweep: bool,

    /// Restore every hidden object before shutting down
    #[arg(long)]
    restore: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load(args.config.as_deref()).context("failed to load configuration")?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.as_str().into()),
        )
        .with(
            config
                .log_json
                .then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)),
        )
        .with(
            (!config.log_json)
                .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
        )
        .init();

    let scene = Scene::from_file(&args.scene)?;
    let (classes, world) = scene.instantiate()?;
    info!(
        objects = world.len(),
        classes = classes.len(),
        scene = %args.scene.display(),
        "loaded scene"
    );

    let manager = ObjectManager::with_classes(config, classes);
    // Lua errors are not Send, so carry them into anyhow as text
    let host = ScriptHost::with_memory_world(manager, world)
        .map_err(|e| anyhow::anyhow!("Failed to create script host: {}", e))?;
    for script in &args.scripts {
        host.run_file(script)
            .map_err(|e| anyhow::anyhow!("Script {} failed: {}", script.display(), e))?;
    }

    let (mut manager, mut world) = host
        .into_parts()
        .map_err(|e| anyhow::anyhow!("Failed to release session: {}", e))?;
    if args.sweep {
        manager.sweep_stale_links(&world);
    }
    if args.restore {
        let update = manager.config().update_path_graph;
        manager.unhide_all_map_objects(&mut world, update);
    }

    let report = Report::capture(&manager, &world);
    println!("{}", serde_json::to_string_pretty(&report)?);

    manager.shutdown();
    Ok(())
}
