/// Multiply two 8-bit quantities and divide by 255 with rounding.
pub(crate) fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

/// Clamp an anchor fraction: values outside `[0, 1]` (and NaN) collapse to 0.
pub(crate) fn clamp_anchor(v: f64) -> f64 {
    if (0.0..=1.0).contains(&v) { v } else { 0.0 }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
