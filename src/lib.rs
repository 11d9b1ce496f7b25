pub mod app;
pub mod backend;
pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod logging;
pub mod session;
pub mod theme;
pub mod view;
