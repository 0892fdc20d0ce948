//! Aggregated sprite space of one appearance.
//!
//! The backend serves an appearance's sprites as one flat list: every frame
//! group's block, concatenated in group order. This module maps between that
//! flat index and `(group, local index)`.

use appview_model::AppearanceItem;

/// Location of an aggregated index inside a frame group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupMapping {
    pub group_index: usize,
    pub local_index: usize,
}

/// Start offset of each frame group in the aggregated space.
///
/// `offsets[i]` is the sum of the sprite counts of groups `0..i`; groups
/// without sprite info count as zero.
pub fn compute_offsets(item: &AppearanceItem) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(item.frame_groups.len());
    let mut offset = 0;
    for group in &item.frame_groups {
        offsets.push(offset);
        offset += group.sprite_count();
    }
    offsets
}

/// Total number of slots in the aggregated space.
pub fn total_sprite_count(item: &AppearanceItem) -> usize {
    item.frame_groups.iter().map(|g| g.sprite_count()).sum()
}

/// Finds the group whose bracket `[offset, offset + count)` holds
/// `aggregated_index`.
///
/// Returns `None` when no bracket matches. Brackets never overlap, so the
/// first match is the only one; empty groups never match.
pub fn map_aggregated_index(
    item: &AppearanceItem,
    aggregated_index: usize,
    offsets: &[usize],
) -> Option<GroupMapping> {
    item.frame_groups
        .iter()
        .zip(offsets)
        .enumerate()
        .find_map(|(group_index, (group, &base))| {
            let size = group.sprite_count();
            (aggregated_index >= base && aggregated_index < base + size).then(|| GroupMapping {
                group_index,
                local_index: aggregated_index - base,
            })
        })
}

/// Aggregated index of a group-local slot.
///
/// Returns `None` when the group does not exist.
pub fn aggregated_index(offsets: &[usize], group_index: usize, local_index: usize) -> Option<usize> {
    offsets.get(group_index).map(|base| base + local_index)
}
