//! Hardware glue for Puckbot stepper axes
//!
//! Concrete implementations of the traits defined in puckbot-core:
//!
//! - Step/direction output over `embedded-hal` pins
//! - A monotonic clock backed by `std::time::Instant` (`std`)
//! - A polling thread that keeps an axis stepping (`std`)

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]

#[cfg(feature = "std")]
pub mod clock;
#[cfg(feature = "std")]
pub mod runner;
pub mod stepper;
