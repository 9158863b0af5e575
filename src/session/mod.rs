pub mod controller;
pub mod input;
pub mod recorder;
pub mod target;
