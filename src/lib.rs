pub mod engine;
pub mod errors;
pub mod logging;
pub mod persistence;
pub mod sequence;
pub mod session;
pub mod settings;
pub mod single;
pub mod sound;
pub mod ui;
