//! End-to-end tests of the sprite pipeline: locate sprites in an appearance,
//! decode them from PNG, compose and recolor, and encode the result.

use appview_model::{AppearanceItem, FrameGroup, SpriteAnimation, SpriteInfo};
use appview_sprite::aggregate::{aggregated_index, compute_offsets, map_aggregated_index};
use appview_sprite::codec::{decompose, sprite_index, SpriteCoord};
use appview_sprite::png::{read_png, write_rgba, write_rgba_to_vec_with_hash};
use appview_sprite::{
    compose_layers, compose_outfit, decode_png, ImageSurface, OutfitColors, OutfitLayer,
    PngConfig, Rgb, RgbaImage,
};
use pretty_assertions::assert_eq;

fn outfit() -> AppearanceItem {
    // group 0: idle, 1 phase; group 1: walking, 2 layers x 4 directions x 2 addons x 3 phases
    let idle = SpriteInfo::new((0..8).collect())
        .with_layers(2)
        .with_pattern(4, 1, 1);
    let walking = SpriteInfo::new((100..148).collect())
        .with_layers(2)
        .with_pattern(4, 2, 1)
        .with_animation(SpriteAnimation::uniform(3, 120, 120));
    AppearanceItem::new(128)
        .with_name("Citizen")
        .with_group(FrameGroup::new(idle))
        .with_group(FrameGroup::new(walking))
}

// ============================================================================
// Indexing
// ============================================================================

#[test]
fn test_walking_sprite_is_found_through_aggregated_space() {
    let item = outfit();
    let offsets = compute_offsets(&item);
    assert_eq!(offsets, vec![0, 8]);

    let info = item.sprite_info(1).unwrap();
    let coord = SpriteCoord::new(0, 2, 1, 0, 2);
    let local = sprite_index(info, coord);
    let flat = aggregated_index(&offsets, 1, local).unwrap();

    let mapping = map_aggregated_index(&item, flat, &offsets).unwrap();
    assert_eq!(mapping.group_index, 1);
    assert_eq!(decompose(info, mapping.local_index), coord);
    assert_eq!(info.sprite_ids[local], 100 + local as u32);
}

// ============================================================================
// Pixels
// ============================================================================

#[test]
fn test_png_files_compose_and_recolor() {
    let dir = tempfile::tempdir().unwrap();

    let base = RgbaImage::filled(4, 4, [100, 100, 100, 255]);
    let mut template = RgbaImage::new(4, 4);
    for x in 0..4 {
        template.set(x, 0, [255, 255, 0, 255]);
        template.set(x, 3, [0, 0, 255, 255]);
    }
    let base_path = dir.path().join("base.png");
    let template_path = dir.path().join("template.png");
    write_rgba(&base, &base_path, &PngConfig::default()).unwrap();
    write_rgba(&template, &template_path, &PngConfig::default()).unwrap();

    let base = read_png(&base_path).unwrap();
    let template = read_png(&template_path).unwrap();
    let colors = OutfitColors {
        head: Rgb::new(50, 150, 250),
        feet: Rgb::new(0, 0, 0),
        ..OutfitColors::default()
    };

    let frame = compose_outfit(&[OutfitLayer::tinted(&base, &template)], &colors).unwrap();
    assert_eq!(frame.get(1, 0), [75, 125, 175, 255]);
    assert_eq!(frame.get(1, 1), [100, 100, 100, 255]);
    assert_eq!(frame.get(1, 3), [50, 50, 50, 255]);
}

#[test]
fn test_composed_frame_encodes_deterministically() {
    let body = RgbaImage::filled(8, 8, [20, 40, 60, 255]);
    let mut hat = RgbaImage::new(8, 4);
    hat.set(3, 1, [250, 0, 0, 255]);

    let frame = compose_layers(&[&body, &hat]).unwrap();
    let encoded = frame.encode_png().unwrap();
    let (again, hash) = write_rgba_to_vec_with_hash(&frame, &PngConfig::default()).unwrap();
    assert_eq!(encoded, again);
    assert_eq!(hash.len(), 64);

    let decoded = decode_png(&encoded).unwrap();
    assert_eq!(decoded.get(3, 1), [250, 0, 0, 255]);
    assert_eq!(decoded.get(3, 5), [20, 40, 60, 255]);
}
