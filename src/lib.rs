//! Daily sustainability tracking: score lifestyle inputs on five elements,
//! estimate footprint and tree sequestration, and keep a dated log.

pub mod config;
pub mod history;
pub mod inputs;
pub mod logging;
pub mod output;
pub mod radar;
pub mod scoring;
