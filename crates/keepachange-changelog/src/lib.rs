//! keepachange Changelog - fragment merging for Keep-a-Changelog files
//!
//! This crate provides the changelog document model, the round-trip
//! parser/writer, change-fragment loading and aggregation, and the
//! next-version heuristic.

pub mod entries;
pub mod parser;
pub mod types;
pub mod update;
pub mod version;
pub mod writer;

pub use entries::{aggregate, ChangeEntry};
pub use parser::{parse_file, parse_str};
pub use types::{AggregatedChanges, Change, ChangelogDocument, Version, VersionLink};
pub use update::{ChangelogUpdater, UpdateOutcome};
pub use version::compute_next_version;
pub use writer::ChangelogWriter;
