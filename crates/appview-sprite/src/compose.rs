//! Paint-order layer composition.

use crate::color::OutfitColors;
use crate::image::{ImageSurface, RgbaImage};
use crate::recolor::recolor_in_place;

/// Draws `images` at the origin of `surface`, in order.
pub fn compose_layers_onto<S: ImageSurface + ?Sized>(surface: &mut S, images: &[&RgbaImage]) {
    for image in images {
        surface.draw(image, 0, 0);
    }
}

/// Composes images into a new surface sized to the largest input.
///
/// Later images are painted over earlier ones with source-over compositing.
/// Returns `None` when there is nothing to compose.
pub fn compose_layers(images: &[&RgbaImage]) -> Option<RgbaImage> {
    if images.is_empty() {
        return None;
    }
    let width = images.iter().map(|i| i.width).max().unwrap_or(0);
    let height = images.iter().map(|i| i.height).max().unwrap_or(0);

    let mut canvas = RgbaImage::new(width, height);
    compose_layers_onto(&mut canvas, images);
    Some(canvas)
}

/// One addon of an outfit frame: its base sprite and optional color template.
#[derive(Debug, Clone, Copy)]
pub struct OutfitLayer<'a> {
    pub sprite: &'a RgbaImage,
    pub template: Option<&'a RgbaImage>,
}

impl<'a> OutfitLayer<'a> {
    /// Layer without a template.
    pub fn plain(sprite: &'a RgbaImage) -> Self {
        Self {
            sprite,
            template: None,
        }
    }

    /// Layer tinted by a template.
    pub fn tinted(sprite: &'a RgbaImage, template: &'a RgbaImage) -> Self {
        Self {
            sprite,
            template: Some(template),
        }
    }
}

/// Composes outfit layers, tinting after each templated layer is drawn.
///
/// The canvas takes the size of the first layer's sprite. A template recolors
/// everything painted so far, not only its own layer.
pub fn compose_outfit(layers: &[OutfitLayer<'_>], colors: &OutfitColors) -> Option<RgbaImage> {
    let first = layers.first()?;
    let mut canvas = RgbaImage::new(first.sprite.width, first.sprite.height);

    for layer in layers {
        canvas.draw(layer.sprite, 0, 0);
        if let Some(template) = layer.template {
            recolor_in_place(&mut canvas, template, colors);
        }
    }
    Some(canvas)
}
