//! Outfit command implementation
//!
//! Renders one tinted outfit frame: a chosen frame group, direction, mount,
//! phase and addon rows, with the four color zones applied.

use anyhow::{anyhow, Context, Result};
use appview_model::Category;
use appview_preview::sequence::resolve_direction;
use appview_preview::OutfitFrameRequest;
use appview_sprite::png::{write_rgba, PngConfig};
use appview_sprite::OutfitColors;
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

use super::{runtime, Workspace};

/// Frame selection of the outfit command.
#[derive(Debug, Clone, Default)]
pub struct OutfitOptions {
    pub group: usize,
    /// Facing; the preview direction of the group when unset
    pub direction: Option<u32>,
    pub mount: u32,
    pub phase: u32,
    /// Addon rows in paint order; the bare outfit when empty
    pub addons: Vec<u32>,
    pub scale: u32,
}

/// Run the outfit command
///
/// # Returns
/// Exit code: 0 success, 1 when no sprite of the frame could be drawn
pub fn run(
    workspace: &Workspace,
    id: u32,
    options: &OutfitOptions,
    colors: &OutfitColors,
    out_path: &str,
) -> Result<ExitCode> {
    let service = workspace.service()?;
    let rt = runtime()?;

    let frame = rt.block_on(async {
        let item = service.appearance(Category::Outfits, id).await?;
        let info = item
            .sprite_info(options.group)
            .ok_or_else(|| anyhow!("outfit #{} has no frame group {}", id, options.group))?;

        let direction = options.direction.unwrap_or_else(|| resolve_direction(info));
        let mut request = OutfitFrameRequest::new(options.group, direction)
            .with_mount(options.mount)
            .with_phase(options.phase);
        if !options.addons.is_empty() {
            request = request.with_addons(options.addons.clone());
        }

        let frame = service.outfit_frame(id, &request, colors).await?;
        service.shutdown();
        anyhow::Ok(frame)
    })?;

    let Some(frame) = frame else {
        println!(
            "{} outfit #{} group {} has nothing to draw",
            "WARN".yellow().bold(),
            id,
            options.group
        );
        return Ok(ExitCode::from(1));
    };

    let frame = frame.scale_nearest(options.scale);
    write_rgba(&frame, Path::new(out_path), &PngConfig::default())
        .with_context(|| format!("Failed to write {}", out_path))?;

    println!(
        "{} outfit #{} -> {} ({}x{})",
        "Rendered:".cyan().bold(),
        id,
        out_path,
        frame.width,
        frame.height
    );
    Ok(ExitCode::SUCCESS)
}
