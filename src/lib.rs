//! Multi-graph plotting sessions over tabular data.
//!
//! A [`session::GraphSession`] holds any number of graphs over one loaded
//! [`data::Workbook`]. Each graph is configured through undoable operations
//! and renders to renderer-agnostic trace and layout descriptors.

pub mod config;
pub mod data;
pub mod error;
pub mod plot3d;
pub mod processing;
pub mod render;
pub mod session;
pub mod state;

pub use config::SessionConfig;
pub use session::GraphSession;
