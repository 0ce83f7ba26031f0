use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::*;
use crate::foundation::error::TesseraError;
use crate::template::model::{FontSource, MaskKind, ResizeMode, TextOptions};
use crate::text::fonts::{EMBEDDED_FONT, FaceCheck, FontBytes};

const BG: [u8; 4] = [0, 0, 0, 255];
const RED: [u8; 4] = [255, 0, 0, 255];

struct MemImages(HashMap<String, RgbaImage>);

impl ImageLoader for MemImages {
    fn load(&self, reference: &str) -> TesseraResult<RgbaImage> {
        self.0
            .get(reference)
            .cloned()
            .ok_or_else(|| TesseraError::decode(format!("no image '{reference}'")))
    }
}

/// Fails every file read; serves the embedded face for `url` only.
struct NoFonts {
    url: Option<&'static str>,
}

impl FontIo for NoFonts {
    fn read_file(&self, path: &Path) -> TesseraResult<Vec<u8>> {
        Err(TesseraError::font(format!("no file {}", path.display())))
    }

    fn fetch_url(&self, url: &str) -> TesseraResult<Vec<u8>> {
        match self.url {
            Some(served) if served == url => Ok(EMBEDDED_FONT.to_vec()),
            _ => Err(TesseraError::font(format!("no url {url}"))),
        }
    }
}

struct AcceptAll;

impl FaceCheck for AcceptAll {
    fn is_loadable(&self, _bytes: &FontBytes) -> bool {
        true
    }
}

fn assert_close(got: [u8; 4], want: [u8; 4]) {
    let near = got.iter().zip(want).all(|(&g, w)| g.abs_diff(w) <= 1);
    assert!(near, "got {got:?}, want {want:?}");
}

fn canvas() -> RgbaImage {
    RgbaImage::from_pixel(1024, 600, image::Rgba(BG))
}

fn compositor(images: &[(&str, RgbaImage)]) -> SlotCompositor {
    let map = images
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();
    SlotCompositor::new(&RenderConfig::default())
        .with_image_loader(Box::new(MemImages(map)))
        .with_font_io(Box::new(NoFonts { url: None }))
}

fn white_text(source: FontSource) -> TextOptions {
    TextOptions {
        font_source: source,
        font_size: 32.0,
        color: "#FFFFFF".to_string(),
        ..TextOptions::default()
    }
}

fn has_ink(canvas: &RgbaImage) -> bool {
    canvas.pixels().any(|p| p.0[0] > 128)
}

#[test]
fn fit_square_source_into_wide_box() {
    let mut canvas = canvas();
    let slot = Slot::image("photo", 100, 100, 200, 150);
    let src = RgbaImage::from_pixel(100, 100, image::Rgba(RED));

    let p = composite_image(&mut canvas, &slot, &src).unwrap();
    assert_eq!((p.width, p.height), (150, 150));
    assert_eq!(p.dest_rect(), (100, 100, 250, 250));

    assert_close(canvas.get_pixel(100, 100).0, RED);
    assert_close(canvas.get_pixel(249, 249).0, RED);
    assert_eq!(canvas.get_pixel(250, 150).0, BG);
    assert_eq!(canvas.get_pixel(99, 100).0, BG);
}

#[test]
fn missing_input_leaves_canvas_untouched() {
    let mut canvas = canvas();
    let before = canvas.clone();
    let mut comp = compositor(&[]);
    let warning = comp.composite_slot(&mut canvas, &Slot::image("absent", 0, 0, 10, 10), None);
    assert!(warning.is_none());
    assert_eq!(canvas, before);
}

#[test]
fn unreadable_image_is_a_warning_not_an_error() {
    let mut canvas = canvas();
    let before = canvas.clone();
    let mut comp = compositor(&[]);
    let slot = Slot::image("logo", 0, 0, 10, 10);
    let warning = comp
        .composite_slot(&mut canvas, &slot, Some("missing.png"))
        .unwrap();
    assert!(matches!(warning, SlotWarning::ImageLoad { .. }));
    assert_eq!(warning.slot_id(), "logo");
    assert_eq!(canvas, before);
}

#[test]
fn later_slots_draw_over_earlier_ones() {
    let blue = [0, 0, 255, 255];
    let mut canvas = canvas();
    let mut comp = compositor(&[
        ("red", RgbaImage::from_pixel(10, 10, image::Rgba(RED))),
        ("blue", RgbaImage::from_pixel(10, 10, image::Rgba(blue))),
    ]);
    let a = Slot::image("a", 0, 0, 20, 20);
    let b = Slot::image("b", 10, 10, 20, 20);
    assert!(comp.composite_slot(&mut canvas, &a, Some("red")).is_none());
    assert!(comp.composite_slot(&mut canvas, &b, Some("blue")).is_none());

    assert_eq!(canvas.get_pixel(5, 5).0, RED);
    assert_eq!(canvas.get_pixel(15, 15).0, blue);
}

#[test]
fn cover_circle_with_opacity_and_center_anchor() {
    let mut canvas = canvas();
    let slot = Slot {
        mode: ResizeMode::Cover,
        mask: MaskKind::Circle,
        opacity: 0.5,
        anchor_x: 0.5,
        anchor_y: 0.5,
        ..Slot::image("avatar", 500, 300, 100, 100)
    };
    let src = RgbaImage::from_pixel(300, 200, image::Rgba([255, 255, 255, 255]));
    let p = composite_image(&mut canvas, &slot, &src).unwrap();

    assert_eq!(p.dest_rect(), (450, 250, 550, 350));
    // Half-transparent white over black at the disk center; corners keep the background.
    assert_close(canvas.get_pixel(500, 300).0, [127, 127, 127, 255]);
    assert_eq!(canvas.get_pixel(450, 250).0, BG);
    assert_eq!(canvas.get_pixel(549, 349).0, BG);
}

#[test]
fn slot_partly_off_canvas_is_clipped() {
    let mut canvas = RgbaImage::from_pixel(20, 20, image::Rgba(BG));
    let slot = Slot {
        mode: ResizeMode::Fill,
        ..Slot::image("edge", 15, -5, 10, 10)
    };
    let src = RgbaImage::from_pixel(4, 4, image::Rgba(RED));
    composite_image(&mut canvas, &slot, &src).unwrap();
    assert_close(canvas.get_pixel(19, 0).0, RED);
    assert_close(canvas.get_pixel(19, 4).0, RED);
    assert_eq!(canvas.get_pixel(19, 5).0, BG);
    assert_eq!(canvas.get_pixel(14, 0).0, BG);
}

#[test]
fn text_without_any_font_uses_builtin_face() {
    let mut canvas = canvas();
    let mut comp = compositor(&[]);
    let slot = Slot::text("title", 0, 0, 180, 80, white_text(FontSource::Auto));
    let warning = comp
        .composite_slot(&mut canvas, &slot, Some("Hello"))
        .unwrap();
    assert_eq!(
        warning,
        SlotWarning::FontFallback {
            slot: "title".to_string()
        }
    );
    assert!(has_ink(&canvas));
}

#[test]
fn explicit_url_font_draws_without_warning() {
    let mut canvas = canvas();
    let url = "https://fonts.test/face.ttf";
    let mut comp = compositor(&[]).with_font_io(Box::new(NoFonts { url: Some(url) }));
    let slot = Slot::text(
        "title",
        20,
        20,
        300,
        80,
        TextOptions {
            font_url: url.to_string(),
            ..white_text(FontSource::Url)
        },
    );
    assert_eq!(comp.composite_slot(&mut canvas, &slot, Some("Hello")), None);
    assert!(has_ink(&canvas));
}

#[test]
fn explicit_system_font_draws_without_warning() {
    let dir = std::env::temp_dir().join(format!("tessera-sysfonts-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("MyFace.ttf"), EMBEDDED_FONT).unwrap();
    let cfg = RenderConfig {
        system_font_dirs: vec![PathBuf::from("/nonexistent-fonts"), dir.clone()],
        ..RenderConfig::default()
    };

    let mut canvas = canvas();
    let mut comp = SlotCompositor::new(&cfg);
    let slot = Slot::text(
        "title",
        20,
        20,
        300,
        80,
        TextOptions {
            font_name: "MyFace".to_string(),
            ..white_text(FontSource::System)
        },
    );
    let warning = comp.composite_slot(&mut canvas, &slot, Some("Hello"));
    let _ = std::fs::remove_dir_all(&dir);
    assert_eq!(warning, None);
    assert!(has_ink(&canvas));
}

#[test]
fn unusable_font_bytes_report_text_render_warning() {
    let mut canvas = canvas();
    let fonts = FontChain::with_check(&RenderConfig::default(), Box::new(AcceptAll))
        .with_builtin(Arc::new(b"not a font".to_vec()));
    let mut comp = compositor(&[]).with_font_chain(fonts);
    let slot = Slot::text("title", 0, 0, 180, 80, TextOptions::default());
    let warning = comp
        .composite_slot(&mut canvas, &slot, Some("Hello"))
        .unwrap();
    assert!(matches!(warning, SlotWarning::TextRender { .. }));
}
