//! Durable checkpoint of completed work
//!
//! The checkpoint records which targets finished (done or failed) and is
//! rewritten after every chunk of targets, always AFTER the corresponding
//! output flush. A crash between flush and save only re-processes the
//! chunk, which the fingerprint deduplication makes safe.

mod store;

pub use store::{Checkpoint, CheckpointError, CheckpointStore};
