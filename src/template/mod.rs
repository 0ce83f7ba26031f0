//! Template and inputs documents.

pub(crate) mod model;
