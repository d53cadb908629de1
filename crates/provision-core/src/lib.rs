pub mod config;
pub mod fetch;
pub mod logging;
pub mod patch;
pub mod prototxt;
pub mod setup;
pub mod url_model;
