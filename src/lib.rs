pub mod assets;
pub mod config;
pub mod core;
pub mod format;
pub mod graphics;
pub mod scene;
