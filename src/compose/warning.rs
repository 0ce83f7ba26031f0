/// Non-fatal, per-slot problem reported while rendering. The slot is skipped or degraded and
/// rendering continues with the next slot.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum SlotWarning {
    /// The slot's image could not be read or decoded.
    #[error("failed to load image for slot {slot}: {reason}")]
    ImageLoad {
        /// Slot id.
        slot: String,
        /// Loader error message.
        reason: String,
    },

    /// Rasterizing or blending the slot's image failed.
    #[error("failed to composite image for slot {slot}: {reason}")]
    ImageComposite {
        /// Slot id.
        slot: String,
        /// Compositing error message.
        reason: String,
    },

    /// Text was drawn with the builtin fallback face.
    #[error("slot {slot}: no requested font could be loaded, used builtin font")]
    FontFallback {
        /// Slot id.
        slot: String,
    },

    /// Text layout or painting failed.
    #[error("failed to draw text for slot {slot}: {reason}")]
    TextRender {
        /// Slot id.
        slot: String,
        /// Layout or paint error message.
        reason: String,
    },
}

impl SlotWarning {
    /// Id of the slot the warning belongs to.
    pub fn slot_id(&self) -> &str {
        match self {
            Self::ImageLoad { slot, .. }
            | Self::ImageComposite { slot, .. }
            | Self::FontFallback { slot }
            | Self::TextRender { slot, .. } => slot,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/warning.rs"]
mod tests;
