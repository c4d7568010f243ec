//! Common types used across the application.

pub mod money;

pub use money::{fixed, format_magnitude, format_usd};
