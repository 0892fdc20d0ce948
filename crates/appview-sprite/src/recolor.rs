//! Color-zone recoloring of outfit sprites.
//!
//! Outfit sprites come with a template layer whose pixels mark body zones by
//! color. Wherever the template marks a zone, the base pixel is averaged
//! 50/50 with the zone's target color. Alpha is never changed.

use crate::color::{ColorZone, OutfitColors};
use crate::image::RgbaImage;

/// Averages a base channel with a target channel, rounding half up.
#[inline]
fn average(base: u8, target: u8) -> u8 {
    ((base as u16 + target as u16 + 1) / 2) as u8
}

/// Recolors `base` in place using `template`.
///
/// Only the area covered by both images is visited. Template pixels with
/// alpha 0 or an unclassified color leave the base untouched.
pub fn recolor_in_place(base: &mut RgbaImage, template: &RgbaImage, colors: &OutfitColors) {
    let width = base.width.min(template.width);
    let height = base.height.min(template.height);

    for y in 0..height {
        for x in 0..width {
            let [tr, tg, tb, ta] = template.get(x, y);
            if ta == 0 {
                continue;
            }
            let Some(zone) = ColorZone::classify(tr, tg, tb) else {
                continue;
            };
            let target = colors.zone(zone);
            let [r, g, b, a] = base.get(x, y);
            base.set(
                x,
                y,
                [
                    average(r, target.r),
                    average(g, target.g),
                    average(b, target.b),
                    a,
                ],
            );
        }
    }
}

/// Returns a recolored copy of `base`.
pub fn recolor(base: &RgbaImage, template: &RgbaImage, colors: &OutfitColors) -> RgbaImage {
    let mut out = base.clone();
    recolor_in_place(&mut out, template, colors);
    out
}
