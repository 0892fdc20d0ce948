//! Inspect command implementation
//!
//! Prints the frame groups of an appearance with their offsets, pattern
//! dimensions and loop settings.

use anyhow::{Context, Result};
use appview_model::{AppearanceItem, Category};
use appview_preview::{select_frame_group, AssetBackend, LoopConfig, PreviewConfig};
use appview_sprite::{compute_offsets, total_sprite_count};
use colored::Colorize;
use std::process::ExitCode;

use super::json_output::{GroupSummary, InspectOutput};
use super::Workspace;

/// Run the inspect command
///
/// # Returns
/// Exit code: 0 success, 1 when a frame group is inconsistent
pub fn run(workspace: &Workspace, category: Category, id: u32, json_output: bool) -> Result<ExitCode> {
    let config = workspace.load_config()?;
    let item = workspace
        .backend()
        .appearance_details(category, id)
        .with_context(|| format!("Failed to load {} #{}", category, id))?;

    let summary = summarize(category, &item, &config);
    let consistent = summary.groups.iter().all(|g| g.consistent);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    Ok(if consistent {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

/// Builds the inspect report of an appearance.
pub fn summarize(category: Category, item: &AppearanceItem, config: &PreviewConfig) -> InspectOutput {
    let offsets = compute_offsets(item);
    let groups = item
        .frame_groups
        .iter()
        .zip(&offsets)
        .enumerate()
        .map(|(index, (group, &offset))| {
            let info = group.sprite_info.as_ref();
            GroupSummary {
                index,
                offset,
                sprite_count: group.sprite_count(),
                fixed_frame_group: group.fixed_frame_group,
                dims: info.map(|info| {
                    let d = info.dims();
                    [d.layers, d.width, d.height, d.depth, d.frames]
                }),
                animated: group.is_animated(),
                loop_type: info
                    .filter(|info| info.is_animated())
                    .map(|info| info.loop_type().to_string()),
                loop_count: info
                    .and_then(|info| info.animation.as_ref())
                    .and_then(|a| a.loop_count),
                interval_ms: info.filter(|info| info.is_animated()).map(|info| {
                    LoopConfig::from_sprite_info(info, config).interval.as_millis() as u64
                }),
                consistent: info.is_none_or(|info| info.has_consistent_sprite_count()),
            }
        })
        .collect();

    InspectOutput {
        category,
        id: item.id,
        name: item.display_name(),
        description: item.description.clone(),
        total_sprites: total_sprite_count(item),
        preview_group: select_frame_group(category, item),
        groups,
    }
}

fn print_summary(summary: &InspectOutput) {
    println!(
        "{} {} #{} {}",
        "Appearance:".cyan().bold(),
        summary.category,
        summary.id,
        summary.name.bold()
    );
    if let Some(description) = &summary.description {
        println!("  {}", description.dimmed());
    }
    println!(
        "{} {} group(s), {} sprite(s)",
        "Frame groups:".dimmed(),
        summary.groups.len(),
        summary.total_sprites
    );

    for group in &summary.groups {
        let marker = if summary.preview_group == Some(group.index) {
            "*".green().to_string()
        } else {
            " ".to_string()
        };
        println!(
            "  {}[{}] offset {}, {} sprite(s)",
            marker, group.index, group.offset, group.sprite_count
        );

        let Some([layers, width, height, depth, frames]) = group.dims else {
            println!("      {}", "no sprite info".dimmed());
            continue;
        };
        println!(
            "      layers {}, directions {}, addons {}, mounts {}, phases {}",
            layers, width, height, depth, frames
        );
        if let (Some(loop_type), Some(interval)) = (&group.loop_type, group.interval_ms) {
            let count = group
                .loop_count
                .map(|n| format!(" x{}", n))
                .unwrap_or_default();
            println!("      loop {}{} every {}ms", loop_type, count, interval);
        }
        if !group.consistent {
            println!(
                "      {} sprite count does not match the pattern dimensions",
                "!!".red()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use appview_model::{FrameGroup, LoopType, SpriteAnimation, SpriteInfo};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_summarize_outfit() {
        let item = AppearanceItem::new(128)
            .with_name("Citizen")
            .with_group(FrameGroup::new(SpriteInfo::new(vec![1, 2]).with_pattern(2, 1, 1)))
            .with_group(FrameGroup::default())
            .with_group(FrameGroup::new(
                SpriteInfo::new(vec![3, 4, 5])
                    .with_animation(SpriteAnimation::uniform(3, 120, 120).with_loop_type(LoopType::PingPong)),
            ));

        let summary = summarize(Category::Outfits, &item, &PreviewConfig::default());
        assert_eq!(summary.total_sprites, 5);
        assert_eq!(summary.preview_group, Some(2));

        let offsets: Vec<usize> = summary.groups.iter().map(|g| g.offset).collect();
        assert_eq!(offsets, vec![0, 2, 2]);
        assert_eq!(summary.groups[0].dims, Some([1, 2, 1, 1, 1]));
        assert_eq!(summary.groups[1].dims, None);

        let animated = &summary.groups[2];
        assert_eq!(animated.loop_type.as_deref(), Some("ping-pong"));
        assert_eq!(animated.interval_ms, Some(120));
        assert!(animated.consistent);
    }

    #[test]
    fn test_summarize_flags_inconsistent_group() {
        let item = AppearanceItem::new(5).with_group(FrameGroup::new(
            SpriteInfo::new(vec![1, 2, 3]).with_pattern(2, 1, 1),
        ));
        let summary = summarize(Category::Objects, &item, &PreviewConfig::default());
        assert!(!summary.groups[0].consistent);
        assert_eq!(summary.name, "#5");
    }
}
