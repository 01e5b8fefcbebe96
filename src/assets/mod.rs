//! Loaders for the files the viewer reads from disk.

pub mod image;
pub mod mtl;
pub mod obj;
pub mod shader;
pub mod utils;
