// Library target shared by the binary, integration tests and benchmarks.
pub mod app;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod generator;
pub mod session;
pub mod terminal;
pub mod ui;
