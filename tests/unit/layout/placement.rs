use super::*;

#[test]
fn default_anchor_is_top_left() {
    let slot = Slot::image("a", 100, 100, 200, 150);
    let p = resolve(&slot, 150, 150);
    assert_eq!(p.dest_rect(), (100, 100, 250, 250));
}

#[test]
fn center_anchor_offsets_by_half_content() {
    let slot = Slot {
        anchor_x: 0.5,
        anchor_y: 1.0,
        ..Slot::image("a", 100, 100, 200, 150)
    };
    let p = resolve(&slot, 51, 40);
    // round(25.5) = 26
    assert_eq!((p.origin_x, p.origin_y), (74, 60));
}

#[test]
fn out_of_range_anchor_clamps_to_zero() {
    let slot = Slot {
        anchor_x: 1.5,
        anchor_y: -0.25,
        ..Slot::image("a", 10, 20, 5, 5)
    };
    let p = resolve(&slot, 30, 30);
    assert_eq!((p.origin_x, p.origin_y), (10, 20));
}

#[test]
fn destination_may_leave_canvas() {
    let slot = Slot {
        anchor_x: 1.0,
        ..Slot::image("a", 0, -5, 5, 5)
    };
    let p = resolve(&slot, 30, 10);
    assert_eq!(p.dest_rect(), (-30, -5, 0, 5));
}
