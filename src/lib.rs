pub mod app;
pub mod binding;
pub mod camera;
pub mod cli;
pub mod config;
pub mod debounce;
pub mod logging;
pub mod palette;
pub mod palette_control;
pub mod palette_controller;
pub mod panel;
pub mod playground;
pub mod registry;
pub mod remote;
pub mod schema;
pub mod snapshot;
pub mod url_params;
pub mod value;
