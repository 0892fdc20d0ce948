//! CLI command implementations

pub mod inspect;
pub mod json_output;
pub mod locate;
pub mod outfit;
pub mod play;
pub mod preview;
pub mod recolor;
pub mod replace;
pub mod validate;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use appview_preview::{DirectoryBackend, PreviewConfig, PreviewService};
use appview_sprite::{OutfitColors, Rgb};
use clap::Args;

/// Options shared by every command that reads an asset directory.
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Root of the asset directory
    pub assets: String,
    /// Optional preview config file (JSON)
    pub config: Option<String>,
}

impl Workspace {
    pub fn new(assets: impl Into<String>, config: Option<String>) -> Self {
        Self {
            assets: assets.into(),
            config,
        }
    }

    /// Loads the preview config, falling back to defaults.
    pub fn load_config(&self) -> Result<PreviewConfig> {
        match &self.config {
            Some(path) => PreviewConfig::from_json_file(Path::new(path))
                .with_context(|| format!("Failed to load config file: {}", path)),
            None => Ok(PreviewConfig::default()),
        }
    }

    pub fn backend(&self) -> DirectoryBackend {
        DirectoryBackend::new(&self.assets)
    }

    /// Preview service over the asset directory.
    pub fn service(&self) -> Result<PreviewService> {
        let config = self.load_config()?;
        PreviewService::new(Arc::new(self.backend()), config)
            .context("Failed to create preview service")
    }
}

/// Outfit zone colors given on the command line; unset zones stay white.
#[derive(Debug, Clone, Default, Args)]
pub struct ColorArgs {
    /// Head color (#rrggbb)
    #[arg(long)]
    pub head: Option<Rgb>,

    /// Body color (#rrggbb)
    #[arg(long)]
    pub body: Option<Rgb>,

    /// Legs color (#rrggbb)
    #[arg(long)]
    pub legs: Option<Rgb>,

    /// Feet color (#rrggbb)
    #[arg(long)]
    pub feet: Option<Rgb>,
}

impl ColorArgs {
    pub fn colors(&self) -> OutfitColors {
        let base = OutfitColors::default();
        OutfitColors {
            head: self.head.unwrap_or(base.head),
            body: self.body.unwrap_or(base.body),
            legs: self.legs.unwrap_or(base.legs),
            feet: self.feet.unwrap_or(base.feet),
        }
    }
}

/// Runtime for commands that talk to the preview service.
pub(crate) fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")
}
