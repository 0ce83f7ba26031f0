use image::{GrayImage, RgbaImage};

use crate::foundation::error::{TesseraError, TesseraResult};
use crate::foundation::math::mul_div255;

/// Premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Source-over for premultiplied pixels.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    let sa = src[3];
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }
    let inv = 255u16 - u16::from(sa);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255(u16::from(dst[i]), inv));
    }
    out
}

/// Convert a straight-alpha pixel to premultiplied.
pub fn premultiply(px: [u8; 4]) -> PremulRgba8 {
    let a = u16::from(px[3]);
    [
        mul_div255(u16::from(px[0]), a),
        mul_div255(u16::from(px[1]), a),
        mul_div255(u16::from(px[2]), a),
        px[3],
    ]
}

/// Convert a premultiplied pixel back to straight alpha.
pub fn unpremultiply(px: PremulRgba8) -> [u8; 4] {
    let a = u32::from(px[3]);
    if a == 0 {
        return [0, 0, 0, 0];
    }
    if a == 255 {
        return px;
    }
    let un = |c: u8| -> u8 { ((u32::from(c) * 255 + a / 2) / a).min(255) as u8 };
    [un(px[0]), un(px[1]), un(px[2]), px[3]]
}

/// Visible part of a `src_w x src_h` raster placed at `origin` on a `canvas_w x canvas_h`
/// canvas, as source coordinates `(x_start, y_start, x_end, y_end)`.
fn clip_window(canvas: (u32, u32), src: (u32, u32), origin: (i64, i64)) -> Option<[i64; 4]> {
    let (ox, oy) = origin;
    let x_start = (-ox).max(0);
    let y_start = (-oy).max(0);
    let x_end = i64::from(src.0).min(i64::from(canvas.0) - ox);
    let y_end = i64::from(src.1).min(i64::from(canvas.1) - oy);
    (x_start < x_end && y_start < y_end).then_some([x_start, y_start, x_end, y_end])
}

/// Composite straight-alpha `src`, scaled by `mask` coverage, over `canvas` with its top-left
/// corner at `origin`. Pixels landing outside the canvas are skipped.
pub fn blend_masked(
    canvas: &mut RgbaImage,
    src: &RgbaImage,
    mask: &GrayImage,
    origin: (i64, i64),
) -> TesseraResult<()> {
    if src.dimensions() != mask.dimensions() {
        return Err(TesseraError::render(format!(
            "mask {:?} does not match content {:?}",
            mask.dimensions(),
            src.dimensions()
        )));
    }
    let Some([x_start, y_start, x_end, y_end]) =
        clip_window(canvas.dimensions(), src.dimensions(), origin)
    else {
        return Ok(());
    };

    let (ox, oy) = origin;
    for sy in y_start..y_end {
        for sx in x_start..x_end {
            let (sxu, syu) = (sx as u32, sy as u32);
            let m = mask.get_pixel(sxu, syu).0[0];
            if m == 0 {
                continue;
            }
            let mut s = premultiply(src.get_pixel(sxu, syu).0);
            if m != 255 {
                for c in &mut s {
                    *c = mul_div255(u16::from(*c), u16::from(m));
                }
            }
            let d = canvas.get_pixel_mut((sx + ox) as u32, (sy + oy) as u32);
            d.0 = unpremultiply(over(premultiply(d.0), s));
        }
    }
    Ok(())
}

/// Composite a `width x height` premultiplied RGBA8 layer over `canvas` with its top-left
/// corner at `origin`, clipped like [`blend_masked`].
pub fn blend_premul(
    canvas: &mut RgbaImage,
    layer: &[u8],
    (width, height): (u32, u32),
    origin: (i64, i64),
) -> TesseraResult<()> {
    if layer.len() as u64 != u64::from(width) * u64::from(height) * 4 {
        return Err(TesseraError::render(format!(
            "premultiplied layer of {} bytes does not match {width}x{height}",
            layer.len()
        )));
    }
    let Some([x_start, y_start, x_end, y_end]) =
        clip_window(canvas.dimensions(), (width, height), origin)
    else {
        return Ok(());
    };

    let (ox, oy) = origin;
    let stride = width as usize * 4;
    for sy in y_start..y_end {
        let row = &layer[sy as usize * stride..][..stride];
        for sx in x_start..x_end {
            let i = sx as usize * 4;
            let s = [row[i], row[i + 1], row[i + 2], row[i + 3]];
            if s[3] == 0 {
                continue;
            }
            let d = canvas.get_pixel_mut((sx + ox) as u32, (sy + oy) as u32);
            d.0 = unpremultiply(over(premultiply(d.0), s));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/raster/blend.rs"]
mod tests;
