//! Replace command implementation
//!
//! Rewrites sprite slots of a frame group, saves the document and drops the
//! cached previews of the appearance.

use anyhow::{anyhow, Result};
use appview_model::{Category, SpriteReplacement};
use colored::Colorize;
use std::process::ExitCode;

use super::json_output::ReplaceOutput;
use super::{runtime, Workspace};

/// Parses `local_index=sprite_id`.
pub fn parse_replacement(s: &str) -> Result<SpriteReplacement, String> {
    let (local, sprite) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid replacement '{}' (expected slot=sprite_id)", s))?;
    let local_index = local
        .trim()
        .parse()
        .map_err(|e| format!("invalid slot in '{}': {}", s, e))?;
    let new_sprite_id = sprite
        .trim()
        .parse()
        .map_err(|e| format!("invalid sprite id in '{}': {}", s, e))?;
    Ok(SpriteReplacement {
        local_index,
        new_sprite_id,
    })
}

/// Run the replace command
///
/// Replacements are all-or-nothing: if any slot is out of range nothing is
/// written.
pub fn run(
    workspace: &Workspace,
    category: Category,
    id: u32,
    group: usize,
    replacements: Vec<SpriteReplacement>,
    json_output: bool,
) -> Result<ExitCode> {
    let service = workspace.service()?;
    let rt = runtime()?;

    let output = rt.block_on(async {
        let sprite_ids = |item: &appview_model::AppearanceItem| {
            item.sprite_info(group)
                .map(|info| info.sprite_ids.clone())
                .ok_or_else(|| anyhow!("{} #{} has no frame group {} with sprites", category, id, group))
        };

        let before = sprite_ids(&service.appearance(category, id).await?)?;
        service
            .replace_sprites_and_save(category, id, group, replacements)
            .await?;
        let after = sprite_ids(&service.appearance(category, id).await?)?;
        service.shutdown();

        anyhow::Ok(ReplaceOutput {
            category,
            id,
            group,
            before,
            after,
        })
    })?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!(
        "{} {} #{} group {}",
        "Replaced:".cyan().bold(),
        category,
        id,
        group
    );
    for (slot, (old, new)) in output.before.iter().zip(&output.after).enumerate() {
        if old != new {
            println!("  slot {}: {} {} {}", slot, old, "->".green(), new);
        }
    }
    println!("{} {}", "Saved:".dimmed(), workspace.assets);
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_replacement() {
        assert_eq!(
            parse_replacement("3 = 1042"),
            Ok(SpriteReplacement {
                local_index: 3,
                new_sprite_id: 1042,
            })
        );
        assert!(parse_replacement("3").is_err());
        assert!(parse_replacement("x=1").is_err());
        assert!(parse_replacement("1=-4").is_err());
    }
}
