#[macro_use]
extern crate tracing;

pub mod buffer;
pub mod monitor;
pub mod screen;
pub mod stack;
pub mod utils;
pub mod window;
pub mod workspace;

pub use screen::{Screen, ScreenData};
