//! Runtime mapping metadata.
//!
//! Types in `model` are the *static* descriptions of result types emitted by
//! `#[derive(Entity)]` (or written by hand). They carry no behaviour beyond
//! lookups; the mapping registry turns them into column bindings.
//!
//! In general:
//! - derive code declares *what exists*
//! - `mapping` decides *what binds*
pub mod entity;
pub mod field;
