pub mod api;
pub mod app;
pub mod bootstrap;
pub mod calendar;
pub mod cli;
pub mod config;
pub mod logging;
pub mod login;
pub mod panel;
pub mod runtime;
pub mod session_store;
pub mod time_utils;
pub mod types;
pub mod ui;
