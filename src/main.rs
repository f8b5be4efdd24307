use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use schemkit::{init_logging, AssetLoader, Config, Diagram, DirAssetSource, MemoryAssetSource};

const DEFAULT_OUTPUT: &str = "circuit-design.svg";

/// Usage: `schemkit [layout.json] [output.svg]`
///
/// Loads the layout (if given) onto a fresh canvas and writes the rendered
/// scene as SVG.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_logging()?;

    let mut args = std::env::args().skip(1);
    let layout = args.next().map(PathBuf::from);
    let output = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    let config = load_config()?;
    let loader = Arc::new(asset_loader(&config.assets.directory));
    let mut diagram = Diagram::from_config(&config, loader)?;

    if let Some(layout) = layout {
        let placed = diagram
            .load_from_file(&layout)
            .await
            .with_context(|| format!("Failed to import {}", layout.display()))?;
        tracing::info!("Loaded {} components from {}", placed, layout.display());
    }

    std::fs::write(&output, diagram.to_svg())
        .with_context(|| format!("Failed to write {}", output.display()))?;
    tracing::info!("Wrote {}", output.display());

    Ok(())
}

fn load_config() -> anyhow::Result<Config> {
    match Config::default_path() {
        Ok(path) => Ok(Config::load_or_default(&path)?),
        Err(e) => {
            tracing::warn!("Using default config: {}", e);
            Ok(Config::default())
        }
    }
}

fn asset_loader(dir: &Path) -> AssetLoader {
    if dir.is_dir() {
        tracing::info!("Loading symbols from {}", dir.display());
        AssetLoader::new(DirAssetSource::new(dir))
    } else {
        tracing::info!("No asset directory at {}, using built-in symbols", dir.display());
        AssetLoader::new(MemoryAssetSource::with_builtin_symbols())
    }
}
