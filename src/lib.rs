pub mod canvas;
pub mod config;
pub mod food;
pub mod game;
pub mod grid;
pub mod input;
pub mod renderer;
pub mod scheduler;
pub mod snake;
pub mod surface;
pub mod terminal_runtime;
