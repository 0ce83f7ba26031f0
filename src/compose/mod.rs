//! Slot compositing and the template render driver.

pub(crate) mod driver;
pub(crate) mod slot;
pub(crate) mod warning;
