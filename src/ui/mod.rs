//! User interface overlay: imgui platform glue and the configuration panel

pub mod manager;
pub mod panel;

pub use manager::UiManager;
pub use panel::ControlPanel;
