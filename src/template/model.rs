use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{TesseraError, TesseraResult};

/// Slot id -> input value (an image path for image slots, literal text for text slots).
pub type Inputs = BTreeMap<String, String>;

/// How source content is mapped onto a slot's box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResizeMode {
    /// Stretch to the exact box size; aspect ratio is not preserved.
    Fill,
    /// Scale to fit inside the box; aspect preserved, never cropped.
    #[default]
    Fit,
    /// Scale to cover the box, then center-crop to the exact box size.
    Cover,
}

impl From<String> for ResizeMode {
    fn from(s: String) -> Self {
        match s.as_str() {
            "fill" => Self::Fill,
            "cover" => Self::Cover,
            _ => Self::Fit,
        }
    }
}

impl From<ResizeMode> for String {
    fn from(m: ResizeMode) -> Self {
        match m {
            ResizeMode::Fill => "fill",
            ResizeMode::Fit => "fit",
            ResizeMode::Cover => "cover",
        }
        .to_string()
    }
}

/// Coverage shape applied to image slots.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MaskKind {
    /// No mask requested: fully opaque coverage.
    #[default]
    None,
    /// Disk inscribed in the content box.
    Circle,
    /// Rounded rectangle spanning the content box.
    Rounded,
    /// Plain rectangle spanning the content box (any other keyword).
    Rect,
}

impl From<String> for MaskKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "" => Self::None,
            "circle" => Self::Circle,
            "rounded" => Self::Rounded,
            _ => Self::Rect,
        }
    }
}

impl From<MaskKind> for String {
    fn from(m: MaskKind) -> Self {
        match m {
            MaskKind::None => "",
            MaskKind::Circle => "circle",
            MaskKind::Rounded => "rounded",
            MaskKind::Rect => "rect",
        }
        .to_string()
    }
}

/// Explicit font source selector (case-insensitive in JSON).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FontSource {
    /// No explicit source; automatic discovery only.
    #[default]
    Auto,
    /// `font_path` on the filesystem.
    File,
    /// `font_name` looked up in the system font directories.
    System,
    /// `font_url` fetched over HTTP(S).
    Url,
    /// Reserved keyword; behaves like [`FontSource::Auto`].
    Embedded,
}

impl From<String> for FontSource {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "file" => Self::File,
            "system" => Self::System,
            "url" => Self::Url,
            "embedded" => Self::Embedded,
            _ => Self::Auto,
        }
    }
}

impl From<FontSource> for String {
    fn from(s: FontSource) -> Self {
        match s {
            FontSource::Auto => "",
            FontSource::File => "file",
            FontSource::System => "system",
            FontSource::Url => "url",
            FontSource::Embedded => "embedded",
        }
        .to_string()
    }
}

/// Horizontal text alignment keyword.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AlignX {
    /// Left edge at the anchor point.
    #[default]
    Left,
    /// Centered on the anchor point (`center` or `centre`).
    Center,
    /// Right edge at the anchor point.
    Right,
}

impl AlignX {
    /// Anchor fraction along the text width.
    pub fn fraction(self) -> f64 {
        match self {
            Self::Left => 0.0,
            Self::Center => 0.5,
            Self::Right => 1.0,
        }
    }
}

impl From<String> for AlignX {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "center" | "centre" => Self::Center,
            "right" => Self::Right,
            _ => Self::Left,
        }
    }
}

impl From<AlignX> for String {
    fn from(a: AlignX) -> Self {
        match a {
            AlignX::Left => "left",
            AlignX::Center => "center",
            AlignX::Right => "right",
        }
        .to_string()
    }
}

/// Vertical text alignment keyword.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AlignY {
    /// Top edge at the anchor point.
    #[default]
    Top,
    /// Centered on the anchor point (`middle` or `center`).
    Middle,
    /// Bottom edge at the anchor point.
    Bottom,
}

impl AlignY {
    /// Anchor fraction along the text height.
    pub fn fraction(self) -> f64 {
        match self {
            Self::Top => 0.0,
            Self::Middle => 0.5,
            Self::Bottom => 1.0,
        }
    }
}

impl From<String> for AlignY {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "middle" | "center" => Self::Middle,
            "bottom" => Self::Bottom,
            _ => Self::Top,
        }
    }
}

impl From<AlignY> for String {
    fn from(a: AlignY) -> Self {
        match a {
            AlignY::Top => "top",
            AlignY::Middle => "middle",
            AlignY::Bottom => "bottom",
        }
        .to_string()
    }
}

/// Font resolution and styling options of a text slot.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextOptions {
    /// Filesystem path of a font file.
    pub font_path: String,
    /// System font name, e.g. `DejaVuSans`.
    pub font_name: String,
    /// Explicit source selector.
    pub font_source: FontSource,
    /// URL to download a font from.
    pub font_url: String,
    /// Font size in pixels.
    pub font_size: f64,
    /// `#RRGGBB`; empty means black.
    pub color: String,
    /// Horizontal alignment.
    pub align_x: AlignX,
    /// Vertical alignment.
    pub align_y: AlignY,
    /// Enable word wrapping (requires a positive `max_width`).
    pub wrap: bool,
    /// Wrap width in pixels.
    pub max_width: i32,
}

fn default_opacity() -> f64 {
    1.0
}

/// A rectangular placement region of a template.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    /// Identifier matched against the inputs mapping.
    pub id: String,
    /// Box left edge in canvas pixels.
    #[serde(default)]
    pub x: i32,
    /// Box top edge in canvas pixels.
    #[serde(default)]
    pub y: i32,
    /// Box width in canvas pixels.
    #[serde(default)]
    pub width: i32,
    /// Box height in canvas pixels.
    #[serde(default)]
    pub height: i32,
    /// Mask shape.
    #[serde(default)]
    pub mask: MaskKind,
    /// Corner radius for [`MaskKind::Rounded`]; `<= 0` selects the default.
    #[serde(default)]
    pub radius: f64,
    /// Horizontal anchor fraction (0..1); anything else acts as 0.
    #[serde(default)]
    pub anchor_x: f64,
    /// Vertical anchor fraction (0..1); anything else acts as 0.
    #[serde(default)]
    pub anchor_y: f64,
    /// Resize policy.
    #[serde(default)]
    pub mode: ResizeMode,
    /// Alpha multiplier; `>= 0.9999` leaves content untouched.
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// Text slot instead of image slot.
    #[serde(default)]
    pub is_text: bool,
    /// Text options (text slots only).
    #[serde(default)]
    pub text_opts: TextOptions,
}

impl Slot {
    /// Construct an image slot with default options for the given box.
    pub fn image(id: impl Into<String>, x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            width,
            height,
            mask: MaskKind::None,
            radius: 0.0,
            anchor_x: 0.0,
            anchor_y: 0.0,
            mode: ResizeMode::Fit,
            opacity: 1.0,
            is_text: false,
            text_opts: TextOptions::default(),
        }
    }

    /// Construct a text slot with the given options for the given box.
    pub fn text(
        id: impl Into<String>,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        text_opts: TextOptions,
    ) -> Self {
        Self {
            is_text: true,
            text_opts,
            ..Self::image(id, x, y, width, height)
        }
    }
}

/// Output canvas overrides.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSpec {
    /// Canvas width; together with `height`, `> 0` stretches the base image.
    pub width: i32,
    /// Canvas height.
    pub height: i32,
    /// Encoding keyword (`png`, `jpg`, `gif`, `tiff`, `bmp`); empty derives from the path.
    pub format: String,
}

/// Declarative template: a base image plus an ordered list of slots.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// Path of the base image.
    pub template_image: String,
    /// Output canvas overrides.
    #[serde(default)]
    pub output: OutputSpec,
    /// Slots in painter's order.
    #[serde(default)]
    pub slots: Vec<Slot>,
}

impl Template {
    /// Parse a template from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> TesseraResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| TesseraError::validation(format!("parse template JSON: {e}")))
    }

    /// Parse a template from a JSON string.
    pub fn from_json_str(s: &str) -> TesseraResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| TesseraError::validation(format!("parse template JSON: {e}")))
    }

    /// Parse a template from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> TesseraResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            TesseraError::validation(format!("open template JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }
}

/// Parse an inputs mapping from a JSON string.
pub fn parse_inputs_str(s: &str) -> TesseraResult<Inputs> {
    serde_json::from_str(s).map_err(|e| TesseraError::validation(format!("parse inputs JSON: {e}")))
}

/// Parse an inputs mapping from a JSON file on disk.
pub fn parse_inputs_path(path: impl AsRef<Path>) -> TesseraResult<Inputs> {
    let path = path.as_ref();
    let f = File::open(path).map_err(|e| {
        TesseraError::validation(format!("open inputs JSON '{}': {e}", path.display()))
    })?;
    serde_json::from_reader(BufReader::new(f))
        .map_err(|e| TesseraError::validation(format!("parse inputs JSON: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/template/model.rs"]
mod tests;
