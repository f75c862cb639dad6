pub mod cli;
pub mod config;
pub mod db;
pub mod display;
pub mod models;
pub mod offline;
pub mod proxy;
pub mod schedule;
pub mod server;
pub mod tui;
pub mod utils;
