//! Configuration types
//!
//! Board-agnostic configuration structures for the gantry axes. With the
//! `toml` feature a [`GantryConfig`] can be loaded from a TOML document.

pub mod axis;
pub mod hardware;

pub use axis::*;
pub use hardware::*;
