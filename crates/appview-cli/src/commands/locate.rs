//! Locate command implementation
//!
//! Maps between aggregated sprite indices and `(group, coordinate)` pairs.

use anyhow::{anyhow, bail, Context, Result};
use appview_model::{AppearanceItem, Category};
use appview_preview::AssetBackend;
use appview_sprite::aggregate::aggregated_index;
use appview_sprite::codec::{decompose, sprite_index};
use appview_sprite::{compute_offsets, map_aggregated_index, SpriteCoord};
use colored::Colorize;
use std::process::ExitCode;

use super::json_output::LocateOutput;
use super::Workspace;

/// What to look up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocateQuery {
    /// An index into the aggregated sprite list
    Aggregated(usize),
    /// A coordinate inside one frame group
    Coord { group: usize, coord: SpriteCoord },
}

/// Parses `layer,x,y,z,phase`.
pub fn parse_coord(s: &str) -> Result<SpriteCoord, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<u32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid coordinate '{}': {}", s, e))?;
    match parts.as_slice() {
        &[layer, x, y, z, phase] => Ok(SpriteCoord::new(layer, x, y, z, phase)),
        _ => Err(format!(
            "invalid coordinate '{}' (expected layer,x,y,z,phase)",
            s
        )),
    }
}

/// Run the locate command
pub fn run(
    workspace: &Workspace,
    category: Category,
    id: u32,
    query: LocateQuery,
    json_output: bool,
) -> Result<ExitCode> {
    let item = workspace
        .backend()
        .appearance_details(category, id)
        .with_context(|| format!("Failed to load {} #{}", category, id))?;

    let location = locate(&item, query)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&location)?);
    } else {
        let [layer, x, y, z, phase] = location.coord;
        println!(
            "{} {} #{} index {}",
            "Sprite:".cyan().bold(),
            category,
            id,
            location.aggregated_index
        );
        println!(
            "  group {}, local index {}",
            location.group_index, location.local_index
        );
        println!(
            "  layer {}, direction {}, addon {}, mount {}, phase {}",
            layer, x, y, z, phase
        );
        match location.sprite_id {
            Some(sprite_id) => println!("  sprite id {}", sprite_id.to_string().bold()),
            None => println!("  {}", "no sprite id at this slot".yellow()),
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Resolves a query against an appearance.
pub fn locate(item: &AppearanceItem, query: LocateQuery) -> Result<LocateOutput> {
    let offsets = compute_offsets(item);

    let (group_index, local_index) = match query {
        LocateQuery::Aggregated(index) => {
            let mapping = map_aggregated_index(item, index, &offsets)
                .ok_or_else(|| anyhow!("index {} is outside every frame group", index))?;
            (mapping.group_index, mapping.local_index)
        }
        LocateQuery::Coord { group, coord } => {
            let info = item
                .sprite_info(group)
                .ok_or_else(|| anyhow!("frame group {} has no sprite info", group))?;
            (group, sprite_index(info, coord))
        }
    };

    let info = item
        .sprite_info(group_index)
        .ok_or_else(|| anyhow!("frame group {} has no sprite info", group_index))?;
    if local_index >= info.expected_sprite_count() {
        bail!(
            "local index {} is outside frame group {} ({} sprites)",
            local_index,
            group_index,
            info.expected_sprite_count()
        );
    }
    let aggregated = aggregated_index(&offsets, group_index, local_index)
        .ok_or_else(|| anyhow!("frame group {} does not exist", group_index))?;
    let coord = decompose(info, local_index);

    Ok(LocateOutput {
        aggregated_index: aggregated,
        group_index,
        local_index,
        coord: [coord.layer, coord.x, coord.y, coord.z, coord.phase],
        sprite_id: info.sprite_ids.get(local_index).copied(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use appview_model::{FrameGroup, SpriteAnimation, SpriteInfo};
    use pretty_assertions::assert_eq;

    /// Idle: 2 layers x 4 directions; walking: 2 layers x 4 directions x 2 phases.
    fn outfit() -> AppearanceItem {
        AppearanceItem::new(128)
            .with_group(FrameGroup::new(
                SpriteInfo::new((100..108).collect())
                    .with_layers(2)
                    .with_pattern(4, 1, 1),
            ))
            .with_group(FrameGroup::new(
                SpriteInfo::new((200..216).collect())
                    .with_layers(2)
                    .with_pattern(4, 1, 1)
                    .with_animation(SpriteAnimation::uniform(2, 100, 100)),
            ))
    }

    #[test]
    fn test_parse_coord() {
        assert_eq!(parse_coord("1, 2,0,0,3"), Ok(SpriteCoord::new(1, 2, 0, 0, 3)));
        assert!(parse_coord("1,2,3").is_err());
        assert!(parse_coord("a,b,c,d,e").is_err());
    }

    #[test]
    fn test_locate_aggregated_index() {
        let location = locate(&outfit(), LocateQuery::Aggregated(13)).unwrap();
        assert_eq!(
            location,
            LocateOutput {
                aggregated_index: 13,
                group_index: 1,
                local_index: 5,
                coord: [1, 2, 0, 0, 0],
                sprite_id: Some(205),
            }
        );
    }

    #[test]
    fn test_locate_coord_matches_aggregated_lookup() {
        let coord = SpriteCoord::new(1, 2, 0, 0, 1);
        let location = locate(&outfit(), LocateQuery::Coord { group: 1, coord }).unwrap();
        assert_eq!(location.local_index, 13);
        assert_eq!(location.aggregated_index, 21);

        let back = locate(&outfit(), LocateQuery::Aggregated(21)).unwrap();
        assert_eq!(back, location);
    }

    #[test]
    fn test_locate_out_of_range() {
        assert!(locate(&outfit(), LocateQuery::Aggregated(24)).is_err());
        let coord = SpriteCoord::new(0, 9, 0, 0, 0);
        assert!(locate(&outfit(), LocateQuery::Coord { group: 0, coord }).is_err());
        assert!(locate(&outfit(), LocateQuery::Coord { group: 5, coord }).is_err());
    }
}
