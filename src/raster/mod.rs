//! Pixel operations on straight-alpha RGBA8 rasters.
//!
//! Everything here is deterministic: the same inputs produce byte-identical outputs.

pub(crate) mod blend;
pub(crate) mod mask;
pub(crate) mod opacity;
pub(crate) mod resample;
