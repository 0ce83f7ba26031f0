use super::*;

fn checker(w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_fn(w, h, |x, y| {
        if (x + y) % 2 == 0 {
            image::Rgba([255, 0, 0, 255])
        } else {
            image::Rgba([0, 0, 255, 200])
        }
    })
}

#[test]
fn zero_target_or_source_is_borrowed_noop() {
    let src = checker(10, 10);
    assert!(matches!(resize(&src, 0, 5, ResizeMode::Fill), Cow::Borrowed(_)));
    assert!(matches!(resize(&src, 5, 0, ResizeMode::Cover), Cow::Borrowed(_)));

    let empty = RgbaImage::new(0, 4);
    let out = resize(&empty, 10, 10, ResizeMode::Fit);
    assert!(matches!(out, Cow::Borrowed(_)));
    assert_eq!(out.dimensions(), (0, 4));
}

#[test]
fn fill_and_cover_match_target_exactly() {
    let src = checker(37, 91);
    for mode in [ResizeMode::Fill, ResizeMode::Cover] {
        for (tw, th) in [(10, 10), (200, 150), (3, 77), (91, 37)] {
            let out = resize(&src, tw, th, mode);
            assert_eq!(out.dimensions(), (tw, th), "{mode:?} {tw}x{th}");
        }
    }
}

#[test]
fn fit_stays_inside_and_preserves_aspect() {
    let src = checker(300, 100);
    let out = resize(&src, 200, 150, ResizeMode::Fit);
    assert_eq!(out.dimensions(), (200, 66));

    let src = checker(100, 100);
    let out = resize(&src, 200, 150, ResizeMode::Fit);
    assert_eq!(out.dimensions(), (150, 150));
}

#[test]
fn cover_center_crops() {
    // Left half red, right half blue; covering a tall box keeps the center columns only.
    let src = RgbaImage::from_fn(40, 10, |x, _| {
        if x < 20 {
            image::Rgba([255, 0, 0, 255])
        } else {
            image::Rgba([0, 0, 255, 255])
        }
    });
    let out = resize(&src, 10, 10, ResizeMode::Cover);
    assert_eq!(out.dimensions(), (10, 10));
    assert_eq!(out.get_pixel(0, 5).0, [255, 0, 0, 255]);
    assert_eq!(out.get_pixel(9, 5).0, [0, 0, 255, 255]);
}

#[test]
fn resize_is_deterministic() {
    let src = checker(23, 17);
    for mode in [ResizeMode::Fill, ResizeMode::Fit, ResizeMode::Cover] {
        let a = resize(&src, 64, 40, mode).into_owned();
        let b = resize(&src, 64, 40, mode).into_owned();
        assert_eq!(a, b);
    }
}

#[test]
fn fit_collapsing_axis_yields_empty_raster() {
    let src = checker(1000, 1);
    let out = resize(&src, 10, 10, ResizeMode::Fit);
    assert_eq!(out.dimensions(), (10, 0));
}
