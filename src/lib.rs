pub mod document;
pub mod graph;
pub mod gui;
pub mod logging;
pub mod settings;
