mod controls;
mod details;
mod panels;

pub use details::{NodeDetailPanel, PropertiesPanel};
