//! Cleaning and opponent enrichment for esports match-result exports.
//!
//! The raw data arrives as one loosely-typed CSV table with one row per
//! game, side and position. [`clean`] runs it through a fixed chain of pure
//! transformations and returns a per-team or per-player dataset with
//! canonical types, consistent game groups and enriched opponent columns,
//! ready for downstream analytics.

pub mod clean;
pub mod error;
pub mod filter;
pub mod ingest;
pub mod normalize;
pub mod opponent;
pub mod schema;
pub mod table;

pub use clean::{CleanOptions, clean};
pub use error::CleanError;
pub use opponent::PairingMode;
pub use schema::Granularity;
pub use table::{Cell, Table};
