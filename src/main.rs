//! Vantage - zone-driven third-person camera director
//!
//! Headless demo runner: loads camera settings and a demo scene, walks the
//! player through it and prints one JSON camera record per frame.
//!
//! Usage: `vantage [demo.toml] [--settings camera.toml]`

mod demo;
mod occupancy;
mod walker;

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use vantage_camera::CameraSettings;

use crate::demo::{Demo, DemoFile};

const DEFAULT_DEMO: &str = include_str!("../scenes/courtyard.toml");

/// Command line options
#[derive(Debug, Default)]
struct Options {
    demo: Option<PathBuf>,
    settings: Option<PathBuf>,
}

impl Options {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut options = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--settings" => {
                    let path = args.next().context("--settings needs a path")?;
                    options.settings = Some(PathBuf::from(path));
                }
                flag if flag.starts_with("--") => bail!("Unknown option '{}'", flag),
                path => {
                    if options.demo.is_some() {
                        bail!("Only one demo file may be given");
                    }
                    options.demo = Some(PathBuf::from(path));
                }
            }
        }

        Ok(options)
    }
}

fn main() -> Result<()> {
    // Initialize logging; RUST_LOG overrides the default level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;

    let options = Options::parse(std::env::args().skip(1))?;

    let settings = match &options.settings {
        Some(path) => CameraSettings::load_from(path)
            .with_context(|| format!("Failed to load camera settings from {:?}", path))?,
        None => CameraSettings::load(),
    };

    let demo_file = match &options.demo {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read demo file {:?}", path))?;
            info!("Loaded demo from {:?}", path);
            DemoFile::from_toml_str(&content)?
        }
        None => {
            info!("No demo file given, running the built-in courtyard");
            DemoFile::from_toml_str(DEFAULT_DEMO)?
        }
    };

    let mut demo = Demo::new(demo_file, settings)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    demo.run(|record| {
        serde_json::to_writer(&mut out, record).context("Failed to encode frame")?;
        writeln!(out).context("Failed to write frame")?;
        Ok(())
    })?;
    out.flush().context("Failed to flush output")?;

    let director = demo.director();
    info!(
        "Final camera at {:?} with {} zone(s) occupied",
        director.current_camera_transform().position,
        director.registry().len()
    );

    Ok(())
}
