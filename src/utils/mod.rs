//! Utility Module
//!
//! - [`time`]: frame timing for the app loop

pub mod time;

pub use time::Timer;
