pub mod dataset;
pub mod example;
pub mod loader;

pub use dataset::{Cell, Row, Sheet, Workbook};
