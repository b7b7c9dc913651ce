pub mod commands;
pub mod config;
pub mod project;
pub mod transpiler;
