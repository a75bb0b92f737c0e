//! Core building blocks shared by every subsystem:
//! - [`Handle`]: typed generational reference with a 32-bit wire form
//! - [`SlotPool`]: fixed-capacity registry issuing those handles
//! - [`Color`]: RGB color used by sprites, texts and clears

pub mod color;
pub mod handle;
pub mod pool;

pub use color::Color;
pub use handle::{Handle, MAX_HANDLE_INDEX};
pub use pool::{MAX_POOL_CAPACITY, PoolExhausted, SlotPool};
