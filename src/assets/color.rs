use crate::foundation::error::{TesseraError, TesseraResult};

/// Parse `#RRGGBB` (the `#` is optional) into straight RGBA8 with full alpha.
pub fn parse_hex_rgb(s: &str) -> TesseraResult<[u8; 4]> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);
    if s.len() != 6 || !s.is_ascii() {
        return Err(TesseraError::validation(format!(
            "hex color must be #RRGGBB, got \"{s}\""
        )));
    }

    fn hex_byte(pair: &str) -> TesseraResult<u8> {
        u8::from_str_radix(pair, 16)
            .map_err(|_| TesseraError::validation(format!("invalid hex byte \"{pair}\"")))
    }

    Ok([
        hex_byte(&s[0..2])?,
        hex_byte(&s[2..4])?,
        hex_byte(&s[4..6])?,
        255,
    ])
}

/// Text fill color: the parsed hex value, or opaque black when empty or malformed.
pub fn text_color(s: &str) -> [u8; 4] {
    if s.trim().is_empty() {
        return [0, 0, 0, 255];
    }
    match parse_hex_rgb(s) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("{e}; using black");
            [0, 0, 0, 255]
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/color.rs"]
mod tests;
