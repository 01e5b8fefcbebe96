pub mod camera;
pub mod engine;
pub mod gameloop;
pub mod input;
pub mod window;
