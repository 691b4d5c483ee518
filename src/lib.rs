//! Photovoltaic I–V curve analysis.
//!
//! [`data`] holds the analysis core: tracer exports are parsed into
//! [`data::model::Sample`]s, analysed into [`data::model::Curve`]s and kept in
//! a [`data::session::Session`]. [`report`] turns a session into a
//! serializable draft for document renderers; [`app`] and [`ui`] are the egui
//! viewer.

pub mod app;
pub mod color;
pub mod data;
pub mod report;
pub mod state;
pub mod ui;
