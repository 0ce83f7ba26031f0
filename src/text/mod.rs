//! Font resolution and text painting.

pub(crate) mod fonts;
pub(crate) mod layout;
