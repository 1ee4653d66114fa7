//! DDD Catalog CLI library - command implementations and output rendering

pub mod commands;
pub mod render;
