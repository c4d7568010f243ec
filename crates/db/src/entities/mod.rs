//! `SeaORM` entities.

pub mod municipal_budget;
