//! Pipeline stages for turning detected PDF tables into records.
//!
//! Each submodule implements exactly one transformation step. All of them
//! except [`input`] are pure functions over values, with no I/O and no
//! shared state, so each is testable in isolation.
//!
//! ## Data Flow
//!
//! ```text
//!                        ┌─▶ flat ─────────────────────────────────▶ FlatOutput
//! input ──▶ TableSource ─┤
//! (path/URL)  (pages)    └─▶ build ──▶ consolidate ──▶ normalize ──▶ NormalizedOutput
//!                           (classify)
//! ```
//!
//! 1. [`input`]: canonicalise the user-supplied path, URL or bytes to a local
//!    detector dump
//! 2. [`classify`]: map header cells to column roles, de-duplicate names
//! 3. [`build`]: one record set per table
//! 4. [`consolidate`]: union of all record sets, first-seen column order
//! 5. [`normalize`]: canonical columns, typed dates and amounts
//! 6. [`flat`]: the alternative, header-agnostic path

pub mod build;
pub mod classify;
pub mod consolidate;
pub mod flat;
pub mod input;
pub mod normalize;
