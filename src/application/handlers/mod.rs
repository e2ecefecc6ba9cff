//! Use-case handlers orchestrating the domain and the ports.
//!
//! - `ProcessBatchHandler` - sequential, fail-fast pipeline over the
//!   extraction collaborator
//! - `RecalculateHandler` - single-field edits with live recomputation
//! - `ManualEntryHandler` - operator-keyed facts without extraction

mod manual_entry;
mod process_batch;
mod recalculate;

pub use manual_entry::{ManualEntryCommand, ManualEntryError, ManualEntryHandler};
pub use process_batch::{
    BatchError, BatchObserver, BatchOutcome, BatchProgress, NoopObserver, ProcessBatchCommand,
    ProcessBatchHandler,
};
pub use recalculate::{FieldEdit, RecalculateHandler};
