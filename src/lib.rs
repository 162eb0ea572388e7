pub mod api;
pub mod app;
pub mod application;
pub mod domain;
pub mod engine;
pub mod info_app;
pub mod ui;
pub mod utils;
