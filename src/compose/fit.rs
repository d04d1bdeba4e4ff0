//! Fit policies: how one source image fills one monitor region.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use super::FitMode;

const FILTER: FilterType = FilterType::Lanczos3;

/// Render `src` into a `width`×`height` region over an opaque `background`.
pub fn render(
    src: &RgbaImage,
    width: u32,
    height: u32,
    mode: FitMode,
    background: Rgba<u8>,
) -> RgbaImage {
    let mut region = RgbaImage::from_pixel(width, height, opaque(background));

    match mode {
        FitMode::Stretch => {
            let scaled = scale(src, width, height);
            blit(&mut region, &scaled, 0, 0);
        }
        FitMode::Center => {
            let dx = (i64::from(width) - i64::from(src.width())) / 2;
            let dy = (i64::from(height) - i64::from(src.height())) / 2;
            blit(&mut region, src, dx, dy);
        }
        FitMode::Fill => {
            let (scaled_w, scaled_h) = cover_size(src.dimensions(), (width, height));
            let scaled = scale(src, scaled_w, scaled_h);
            let crop_x = (scaled_w - width) / 2;
            let crop_y = (scaled_h - height) / 2;
            let cropped = imageops::crop_imm(&scaled, crop_x, crop_y, width, height).to_image();
            blit(&mut region, &cropped, 0, 0);
        }
        FitMode::Tile => {
            let (sw, sh) = src.dimensions();
            for (x, y, px) in region.enumerate_pixels_mut() {
                over(px, src.get_pixel(x % sw, y % sh));
            }
        }
    }

    region
}

/// Smallest aspect-preserving size that covers `target` entirely.
///
/// Integer ceiling keeps the result at least as large as the target on both
/// axes, so the center crop never runs out of pixels.
pub fn cover_size((src_w, src_h): (u32, u32), (w, h): (u32, u32)) -> (u32, u32) {
    let (sw, sh) = (u64::from(src_w), u64::from(src_h));
    let (tw, th) = (u64::from(w), u64::from(h));

    if tw * sh >= th * sw {
        let scaled_h = (sh * tw).div_ceil(sw).max(th);
        (w, clamp_u32(scaled_h))
    } else {
        let scaled_w = (sw * th).div_ceil(sh).max(tw);
        (clamp_u32(scaled_w), h)
    }
}

fn clamp_u32(v: u64) -> u32 {
    u32::try_from(v).unwrap_or(u32::MAX)
}

fn scale(src: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if src.dimensions() == (width, height) {
        return src.clone();
    }
    imageops::resize(src, width, height, FILTER)
}

fn opaque(mut color: Rgba<u8>) -> Rgba<u8> {
    color[3] = 255;
    color
}

/// Composite `src` over `dst` at a signed offset, clipping to `dst`.
fn blit(dst: &mut RgbaImage, src: &RgbaImage, dx: i64, dy: i64) {
    let (dw, dh) = (i64::from(dst.width()), i64::from(dst.height()));
    let (sw, sh) = (i64::from(src.width()), i64::from(src.height()));

    let x0 = dx.max(0);
    let y0 = dy.max(0);
    let x1 = (dx + sw).min(dw);
    let y1 = (dy + sh).min(dh);

    for y in y0..y1 {
        for x in x0..x1 {
            // In range by construction of the clip window.
            let s = src.get_pixel((x - dx) as u32, (y - dy) as u32);
            over(dst.get_pixel_mut(x as u32, y as u32), s);
        }
    }
}

/// Straight-alpha "over" onto an opaque destination.
fn over(dst: &mut Rgba<u8>, src: &Rgba<u8>) {
    let a = u32::from(src[3]);
    match a {
        255 => *dst = *src,
        0 => {}
        _ => {
            for c in 0..3 {
                let blended = (u32::from(src[c]) * a + u32::from(dst[c]) * (255 - a) + 127) / 255;
                dst[c] = blended as u8;
            }
            dst[3] = 255;
        }
    }
}
