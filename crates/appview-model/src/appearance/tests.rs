//! Tests for appearance types.

use super::*;

mod document_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn outfit_document_from_json() {
        let json = r#"
        {
          "id": 128,
          "name": "Citizen",
          "frame_groups": [
            {
              "fixed_frame_group": 0,
              "id": 0,
              "sprite_info": {
                "pattern_width": 4,
                "pattern_height": 1,
                "pattern_depth": 1,
                "layers": 2,
                "sprite_ids": [1, 2, 3, 4, 5, 6, 7, 8],
                "bounding_square": 32
              }
            },
            {
              "fixed_frame_group": 1,
              "id": 1,
              "sprite_info": {
                "pattern_width": 4,
                "layers": 1,
                "sprite_ids": [10, 11, 12, 13, 14, 15, 16, 17],
                "animation": {
                  "loop_type": 0,
                  "phases": [
                    { "duration_min": 100, "duration_max": 100 },
                    { "duration_min": 100, "duration_max": 100 }
                  ]
                }
              }
            }
          ]
        }
        "#;

        let item = AppearanceItem::from_json(json).unwrap();
        assert_eq!(item.id, 128);
        assert_eq!(item.display_name(), "Citizen");
        assert_eq!(item.frame_groups.len(), 2);

        let idle = item.sprite_info(0).unwrap();
        assert_eq!(idle.layers, 2);
        assert_eq!(idle.frame_count(), 1);
        assert!(idle.has_consistent_sprite_count());

        let walking = item.sprite_info(1).unwrap();
        assert_eq!(walking.pattern_height, 1);
        assert_eq!(walking.frame_count(), 2);
        assert_eq!(walking.loop_type(), LoopType::Infinite);
        assert!(walking.has_consistent_sprite_count());
    }

    #[test]
    fn null_dimensions_default_to_one() {
        let json = r#"{ "pattern_width": null, "pattern_layers": 2, "sprite_ids": [1, 2] }"#;
        let info: SpriteInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.pattern_width, 1);
        assert_eq!(info.layers, 2);
        assert!(info.has_consistent_sprite_count());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let json = r#"{ "id": 7, "flags": { "clip": true }, "frame_groups": [] }"#;
        let item = AppearanceItem::from_json(json).unwrap();
        assert_eq!(item.id, 7);
        assert_eq!(item.display_name(), "#7");
    }

    #[test]
    fn document_roundtrip() {
        let item = AppearanceItem::new(9)
            .with_name("Torch")
            .with_group(FrameGroup::new(
                SpriteInfo::new(vec![4, 5, 6])
                    .with_animation(SpriteAnimation::uniform(3, 150, 200).with_loop_type(LoopType::PingPong)),
            ));

        let json = item.to_json_pretty().unwrap();
        let parsed = AppearanceItem::from_json(&json).unwrap();
        assert_eq!(parsed, item);
        assert!(json.contains("\"loop_type\": -1"));
    }
}

mod frame_count_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn animation_phases_win_over_pattern_frames() {
        let info = SpriteInfo::new(vec![0; 4])
            .with_pattern_frames(2)
            .with_animation(SpriteAnimation::uniform(4, 100, 100));
        assert_eq!(info.frame_count(), 4);
    }

    #[test]
    fn empty_animation_falls_back_to_pattern_frames() {
        let info = SpriteInfo::new(vec![0; 3])
            .with_pattern_frames(3)
            .with_animation(SpriteAnimation::default());
        assert_eq!(info.frame_count(), 3);
    }

    #[test]
    fn defaults_to_single_frame() {
        let info = SpriteInfo::new(vec![1]);
        assert_eq!(info.frame_count(), 1);
        assert!(!info.is_animated());

        let zero = SpriteInfo::new(vec![1]).with_pattern_frames(0);
        assert_eq!(zero.frame_count(), 1);
    }

    #[test]
    fn group_without_sprite_info_counts_zero() {
        let group = FrameGroup::default();
        assert_eq!(group.sprite_count(), 0);
        assert_eq!(group.frame_count(), 0);
        assert!(!group.is_animated());
    }
}

mod loop_type_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn raw_values() {
        assert_eq!(LoopType::from(0), LoopType::Infinite);
        assert_eq!(LoopType::from(-1), LoopType::PingPong);
        assert_eq!(LoopType::from(1), LoopType::Finite);
        assert_eq!(LoopType::from(5), LoopType::Infinite);
        assert_eq!(i32::from(LoopType::PingPong), -1);
    }

    #[test]
    fn missing_animation_is_infinite() {
        assert_eq!(SpriteInfo::new(vec![]).loop_type(), LoopType::Infinite);
    }
}

mod dims_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn zero_radices_are_raised_to_one() {
        let dims = PatternDims::new(0, 4, 0, 1, 0);
        assert_eq!(dims.layers, 1);
        assert_eq!(dims.height, 1);
        assert_eq!(dims.frames, 1);
        assert_eq!(dims.sprite_count(), 4);
    }

    #[test]
    fn expected_sprite_count_multiplies_all_axes() {
        let info = SpriteInfo::new(vec![0; 2 * 4 * 3 * 2 * 2])
            .with_layers(2)
            .with_pattern(4, 3, 2)
            .with_pattern_frames(2);
        assert_eq!(info.expected_sprite_count(), 96);
        assert!(info.has_consistent_sprite_count());
    }
}
