//! Batch packing
//!
//! Splits an ordered list of issues into size-bounded request batches.

mod pack;

pub use pack::{filter_submittable, pack_into_batches, summarize, BatchLimits, BatchSummary};
