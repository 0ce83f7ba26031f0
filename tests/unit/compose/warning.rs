use super::*;

#[test]
fn messages_name_the_slot() {
    let w = SlotWarning::ImageLoad {
        slot: "avatar".to_string(),
        reason: "no such file".to_string(),
    };
    assert_eq!(
        w.to_string(),
        "failed to load image for slot avatar: no such file"
    );

    let w = SlotWarning::FontFallback {
        slot: "title".to_string(),
    };
    assert!(w.to_string().contains("used builtin font"));
}

#[test]
fn slot_id_covers_every_variant() {
    let id = "s".to_string();
    let all = [
        SlotWarning::ImageLoad {
            slot: id.clone(),
            reason: String::new(),
        },
        SlotWarning::ImageComposite {
            slot: id.clone(),
            reason: String::new(),
        },
        SlotWarning::FontFallback { slot: id.clone() },
        SlotWarning::TextRender {
            slot: id.clone(),
            reason: String::new(),
        },
    ];
    assert!(all.iter().all(|w| w.slot_id() == "s"));
}
