// Reconciliation services
//
// Alias resolution, merge policies and the per-table upserts shared by
// every campaign import.

pub mod aliases;
pub mod merge;
pub mod upsert;
