pub mod commands;
pub mod config_loader;
pub mod walk;
