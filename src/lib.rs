pub mod commands;
pub mod config;
pub mod models;
pub mod replicate;
pub mod reply;
