//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`layout`]: Screen areas for the header, panes, divider and footer
//! - [`viewport`]: Scroll position and visible range management
//! - [`style`]: Light and dark palettes

pub mod layout;
pub mod style;
pub mod viewport;

mod overlays;
mod render;
mod status;

pub use render::{line_number_width, render};

#[cfg(test)]
mod tests;
