//! Tessera composes images from declarative templates.
//!
//! A [`Template`] names a base image and an ordered list of rectangular slots. Each slot is
//! filled from an [`Inputs`] mapping with either an image (resized, faded, masked, and
//! anchored into its box) or a line of text (drawn with a font resolved through a fallback
//! chain). Slots are composited in template order with source-over blending.
//!
//! # Pipeline
//!
//! 1. **Parse**: template and inputs JSON into [`Template`] and [`Inputs`]
//! 2. **Prepare**: load the base image, optionally stretched to the output size
//! 3. **Composite**: every slot with an input is drawn onto the canvas; per-slot problems
//!    become [`SlotWarning`]s instead of errors
//! 4. **Encode**: PNG, JPEG, GIF, TIFF, or BMP via [`save_image`]
//!
//! Only an unreadable template, inputs document, or base image (or a failed save) is fatal.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod compose;
mod config;
mod foundation;
mod layout;
mod raster;
mod template;
mod text;

pub use assets::color::{parse_hex_rgb, text_color};
pub use assets::decode::{decode_image, load_image, output_format_for, save_image};
pub use compose::driver::{
    RenderOutput, prepare_canvas, render_template, render_to_file, render_with,
};
pub use compose::slot::{FsImageLoader, ImageLoader, SlotCompositor, composite_image};
pub use compose::warning::SlotWarning;
pub use config::{ENV_FONT_DIR, ENV_FONT_FILE, RenderConfig};
pub use foundation::error::{TesseraError, TesseraResult};
pub use layout::placement::{Placement, resolve as resolve_placement};
pub use raster::blend::{blend_masked, blend_premul};
pub use raster::mask::{DEFAULT_ROUNDED_FRACTION, MaskShape, make_mask};
pub use raster::opacity::{OPACITY_IDENTITY, apply_opacity};
pub use raster::resample::resize;
pub use template::model::{
    AlignX, AlignY, FontSource, Inputs, MaskKind, OutputSpec, ResizeMode, Slot, Template,
    TextOptions, parse_inputs_path, parse_inputs_str,
};
pub use text::fonts::{
    EMBEDDED_FONT, FaceCheck, FontBytes, FontChain, FontIo, FontOrigin, FontResolver,
    FontdbCheck, ResolvedFont, StdFontIo, embedded_font,
};
pub use text::layout::{
    DEFAULT_FONT_SIZE_PX, TextAnchor, TextBrushRgba8, TextLayoutEngine, TextPainter,
    WRAP_LINE_SPACING, text_anchor,
};
