//! Repository layer: one module per table group, all SQL lives here
//!
//! Functions take `&mut SqliteConnection` so they run equally on a pooled
//! connection or inside a row's transaction (`&mut *tx`).

pub mod aliases;
pub mod catalog;
pub mod measurements;
pub mod samples;
pub mod wells;
