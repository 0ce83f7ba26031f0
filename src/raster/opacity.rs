use std::borrow::Cow;

use image::RgbaImage;

/// Opacity at or above this value leaves a raster untouched.
pub const OPACITY_IDENTITY: f64 = 0.9999;

/// Scale the alpha channel of `img` by `opacity`.
///
/// At [`OPACITY_IDENTITY`] and above the input is returned borrowed. Otherwise every alpha
/// becomes `floor(alpha * opacity)`, saturated into `0..=255`; color channels are kept.
/// Out-of-range opacity is not validated.
pub fn apply_opacity(img: &RgbaImage, opacity: f64) -> Cow<'_, RgbaImage> {
    if opacity >= OPACITY_IDENTITY {
        return Cow::Borrowed(img);
    }

    let mut out = img.clone();
    for px in out.pixels_mut() {
        px.0[3] = (f64::from(px.0[3]) * opacity).floor() as u8;
    }
    Cow::Owned(out)
}

#[cfg(test)]
#[path = "../../tests/unit/raster/opacity.rs"]
mod tests;
