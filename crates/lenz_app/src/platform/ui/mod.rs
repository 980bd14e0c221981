pub mod catalog;
pub mod commands;
pub mod render;
