//! Life expectancy per country, re-expressed relative to a baseline year
//! chosen with a draggable slider.
//!
//! The data layer ([`data`], [`scale`], [`slider`]) has no UI dependency.
//! [`render`] keeps a retained scene that [`ui`] paints with egui and
//! [`render::svg`] exports.

pub mod app;
pub mod color;
pub mod data;
pub mod layout;
pub mod render;
pub mod scale;
pub mod slider;
pub mod state;
pub mod ui;
