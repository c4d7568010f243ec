//! Core budget logic for CivicSpend.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Storage and text generation are reached through traits implemented elsewhere.
//!
//! # Modules
//!
//! - `budget` - Line-item types, CSV normalization, and the department query gateway
//! - `insight` - Prompt construction and the text-generation seam
//! - `report` - Presentation table with usage shares

pub mod budget;
pub mod insight;
pub mod report;
