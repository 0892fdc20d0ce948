//! Recolor command implementation
//!
//! Tints a base sprite PNG with a color template PNG.

use anyhow::{Context, Result};
use appview_sprite::png::{read_png, write_rgba, PngConfig};
use appview_sprite::{recolor, OutfitColors};
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

/// Run the recolor command
///
/// # Arguments
/// * `base_path` - Base sprite PNG
/// * `template_path` - Color template PNG of the same sprite
/// * `out_path` - Output PNG
pub fn run(
    base_path: &str,
    template_path: &str,
    colors: &OutfitColors,
    out_path: &str,
) -> Result<ExitCode> {
    let base = read_png(Path::new(base_path))
        .with_context(|| format!("Failed to read base sprite: {}", base_path))?;
    let template = read_png(Path::new(template_path))
        .with_context(|| format!("Failed to read color template: {}", template_path))?;

    if (base.width, base.height) != (template.width, template.height) {
        log::warn!(
            "template is {}x{} but base is {}x{}, only the overlap is tinted",
            template.width,
            template.height,
            base.width,
            base.height
        );
    }

    let tinted = recolor(&base, &template, colors);
    write_rgba(&tinted, Path::new(out_path), &PngConfig::default())
        .with_context(|| format!("Failed to write {}", out_path))?;

    println!(
        "{} {} (head {}, body {}, legs {}, feet {})",
        "Recolored:".cyan().bold(),
        out_path,
        colors.head,
        colors.body,
        colors.legs,
        colors.feet
    );
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use appview_sprite::{Rgb, RgbaImage};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_recolor_files() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("base.png");
        let template = dir.path().join("template.png");
        let out = dir.path().join("out.png");

        write_rgba(
            &RgbaImage::filled(2, 2, [100, 100, 100, 255]),
            &base,
            &PngConfig::default(),
        )
        .unwrap();
        let mut mask = RgbaImage::new(2, 2);
        mask.set(0, 0, [255, 0, 0, 255]);
        write_rgba(&mask, &template, &PngConfig::default()).unwrap();

        let colors = OutfitColors {
            body: Rgb::new(50, 150, 250),
            ..OutfitColors::default()
        };
        run(
            base.to_str().unwrap(),
            template.to_str().unwrap(),
            &colors,
            out.to_str().unwrap(),
        )
        .unwrap();

        let tinted = read_png(&out).unwrap();
        assert_eq!(tinted.get(0, 0), [75, 125, 175, 255]);
        assert_eq!(tinted.get(1, 1), [100, 100, 100, 255]);
    }

    #[test]
    fn test_missing_base_is_an_error() {
        let err = run("missing.png", "missing.png", &OutfitColors::default(), "out.png").unwrap_err();
        assert!(err.to_string().contains("base sprite"));
    }
}
