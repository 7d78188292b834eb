//! Local placeholder wallpaper synthesis.
//!
//! Terminal fallback of the image generation chain: when every remote
//! provider fails, a PNG is rendered from the prompt alone. Output is a
//! pure function of `(prompt, dimensions)`; all "random" placement is
//! drawn from an RNG seeded with a SHA-256 of the prompt.

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};

use crate::error::CoreError;
use crate::palette::{palette_for_prompt, themes_for_prompt, Palette, Rgb, Theme};
use crate::types::Dimensions;

/// MIME type of the rendered placeholder.
pub const PLACEHOLDER_MIME: &str = "image/png";

const STAR_COUNT: usize = 150;
const SQUARE_COUNT: usize = 25;
const SQUARE_HALF_SIDE: f32 = 50.0;
const WAVE_COUNT: u32 = 8;
const WAVE_AMPLITUDE: f32 = 50.0;
const WAVE_THICKNESS: i64 = 3;
const WHITE: Rgb = [0xff, 0xff, 0xff];
const BLACK: Rgb = [0x00, 0x00, 0x00];

/// Render a placeholder wallpaper for `prompt` and return PNG bytes.
pub fn render_placeholder(prompt: &str, dims: Dimensions) -> Result<Vec<u8>, CoreError> {
    if dims.width == 0 || dims.height == 0 {
        return Err(CoreError::Validation(format!(
            "Placeholder dimensions must be non-zero, got {}x{}",
            dims.width, dims.height
        )));
    }

    let mut rng = StdRng::seed_from_u64(prompt_seed(prompt));
    let mut img = RgbaImage::new(dims.width, dims.height);

    paint_gradient(&mut img, &palette_for_prompt(prompt));
    for theme in themes_for_prompt(prompt) {
        match theme {
            Theme::Starfield => paint_stars(&mut img, &mut rng),
            Theme::Geometric => paint_squares(&mut img, &mut rng),
            Theme::Waves => paint_waves(&mut img),
        }
    }
    // "AI generated" badge.
    fill_rect(&mut img, 20, 20, 200, 60, BLACK, 0.7);

    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .map_err(|e| CoreError::Internal(format!("PNG encoding failed: {e}")))?;
    Ok(buf.into_inner())
}

fn prompt_seed(prompt: &str) -> u64 {
    let digest = Sha256::digest(prompt.as_bytes());
    let mut seed = [0u8; 8];
    seed.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed)
}

// ---------------------------------------------------------------------------
// Painting primitives
// ---------------------------------------------------------------------------

/// Diagonal gradient from the top-left to the bottom-right corner.
fn paint_gradient(img: &mut RgbaImage, palette: &Palette) {
    let (w, h) = (img.width() as f32, img.height() as f32);
    let norm = w * w + h * h;
    let segments = (palette.len() - 1) as f32;

    for (x, y, px) in img.enumerate_pixels_mut() {
        let t = ((x as f32 * w + y as f32 * h) / norm).clamp(0.0, 1.0);
        let scaled = t * segments;
        let idx = (scaled.floor() as usize).min(palette.len() - 2);
        let local = scaled - idx as f32;
        let [r, g, b] = lerp(palette[idx], palette[idx + 1], local);
        *px = Rgba([r, g, b, 0xff]);
    }
}

fn paint_stars(img: &mut RgbaImage, rng: &mut StdRng) {
    for _ in 0..STAR_COUNT {
        let cx = rng.random_range(0.0..img.width() as f32);
        let cy = rng.random_range(0.0..img.height() as f32);
        let radius = rng.random_range(1.0f32..5.0);
        let alpha = rng.random_range(0.2f32..1.0);
        fill_circle(img, cx, cy, radius, WHITE, alpha);
    }
}

fn paint_squares(img: &mut RgbaImage, rng: &mut StdRng) {
    for _ in 0..SQUARE_COUNT {
        let cx = rng.random_range(0.0..img.width() as f32);
        let cy = rng.random_range(0.0..img.height() as f32);
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let alpha = rng.random_range(0.1f32..0.4);
        fill_rotated_square(img, cx, cy, angle, WHITE, alpha);
    }
}

fn paint_waves(img: &mut RgbaImage) {
    let height = img.height() as i64;
    for i in 0..WAVE_COUNT {
        let base = 200.0 + i as f32 * 100.0;
        let alpha = 0.4 - i as f32 * 0.04;
        for x in 0..img.width() {
            let y = (base + (x as f32 * 0.01 + i as f32).sin() * WAVE_AMPLITUDE) as i64;
            for dy in 0..WAVE_THICKNESS {
                let py = y + dy - WAVE_THICKNESS / 2;
                if (0..height).contains(&py) {
                    blend(img.get_pixel_mut(x, py as u32), WHITE, alpha);
                }
            }
        }
    }
}

fn fill_rect(img: &mut RgbaImage, x0: u32, y0: u32, w: u32, h: u32, color: Rgb, alpha: f32) {
    let x1 = x0.saturating_add(w).min(img.width());
    let y1 = y0.saturating_add(h).min(img.height());
    for y in y0.min(y1)..y1 {
        for x in x0.min(x1)..x1 {
            blend(img.get_pixel_mut(x, y), color, alpha);
        }
    }
}

fn fill_circle(img: &mut RgbaImage, cx: f32, cy: f32, radius: f32, color: Rgb, alpha: f32) {
    let r2 = radius * radius;
    for (x, y) in clipped_box(img, cx, cy, radius.ceil()) {
        let (dx, dy) = (x as f32 - cx, y as f32 - cy);
        if dx * dx + dy * dy <= r2 {
            blend(img.get_pixel_mut(x, y), color, alpha);
        }
    }
}

fn fill_rotated_square(img: &mut RgbaImage, cx: f32, cy: f32, angle: f32, color: Rgb, alpha: f32) {
    let (sin, cos) = angle.sin_cos();
    let reach = (SQUARE_HALF_SIDE * std::f32::consts::SQRT_2).ceil();
    for (x, y) in clipped_box(img, cx, cy, reach) {
        let (dx, dy) = (x as f32 - cx, y as f32 - cy);
        // Rotate the sample point into the square's frame.
        let u = dx * cos + dy * sin;
        let v = -dx * sin + dy * cos;
        if u.abs() <= SQUARE_HALF_SIDE && v.abs() <= SQUARE_HALF_SIDE {
            blend(img.get_pixel_mut(x, y), color, alpha);
        }
    }
}

/// Pixel coordinates of the square of half-size `reach` around
/// `(cx, cy)`, clipped to the image.
fn clipped_box(img: &RgbaImage, cx: f32, cy: f32, reach: f32) -> impl Iterator<Item = (u32, u32)> {
    let x0 = (cx - reach).floor().max(0.0) as u32;
    let y0 = (cy - reach).floor().max(0.0) as u32;
    let x1 = ((cx + reach).ceil().max(0.0) as u32).min(img.width());
    let y1 = ((cy + reach).ceil().max(0.0) as u32).min(img.height());
    (y0..y1).flat_map(move |y| (x0..x1).map(move |x| (x, y)))
}

fn blend(px: &mut Rgba<u8>, color: Rgb, alpha: f32) {
    let a = alpha.clamp(0.0, 1.0);
    for c in 0..3 {
        let mixed = px.0[c] as f32 * (1.0 - a) + color[c] as f32 * a;
        px.0[c] = mixed.round() as u8;
    }
}

fn lerp(a: Rgb, b: Rgb, t: f32) -> Rgb {
    let mut out = [0u8; 3];
    for c in 0..3 {
        out[c] = (a[c] as f32 + (b[c] as f32 - a[c] as f32) * t).round() as u8;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const SMALL: Dimensions = Dimensions {
        width: 240,
        height: 160,
    };

    #[test]
    fn renders_decodable_png_of_requested_size() {
        let bytes = render_placeholder("Space nebula with colorful stars", SMALL).unwrap();
        let img = image::load_from_memory_with_format(&bytes, ImageFormat::Png).unwrap();
        assert_eq!(img.width(), 240);
        assert_eq!(img.height(), 160);
    }

    #[test]
    fn same_prompt_same_bytes() {
        let a = render_placeholder("abstract ocean waves", SMALL).unwrap();
        let b = render_placeholder("abstract ocean waves", SMALL).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_palettes_differ() {
        let fire = render_placeholder("fire", SMALL).unwrap();
        let ice = render_placeholder("ice", SMALL).unwrap();
        assert_ne!(fire, ice);
    }

    #[test]
    fn gradient_starts_at_first_stop() {
        // Badge covers (20,20)-(220,80); sample outside it.
        let bytes = render_placeholder("forest", SMALL).unwrap();
        let img = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(img.get_pixel(0, 0).0[..3], [0x22, 0x88, 0x33]);
        assert_eq!(img.get_pixel(239, 159).0[..3], [0x88, 0xdd, 0x88]);
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let dims = Dimensions {
            width: 0,
            height: 10,
        };
        assert_matches!(render_placeholder("x", dims), Err(CoreError::Validation(_)));
    }
}
