// crates/cabin_algo/src/lib.rs
#![forbid(unsafe_code)]

//! Algorithm layer of the cabin draw. Pure, synchronous, in-memory; depends
//! only on `cabin_core`. Callers own locking and persistence.

pub mod audit;
pub mod draw;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod order;
pub mod shuffle;
pub mod summary;
pub mod waitlist;

// Convenience re-exports (pipeline imports these from crate root)
pub use audit::{AuditEvent, AuditRecorder, AuditSink, NullAudit};
pub use draw::{run_draw, DrawOutcome};
pub use engine::{run_snake_draft, DraftOutcome, SkipReason, TurnOutcome, TurnRecord};
pub use error::{DraftError, LedgerError};
pub use ledger::{SlotLedger, MAX_ALLOCATIONS_PER_PARTICIPANT};
pub use order::{build_draft_order, DraftOrder, Round, Turn};
pub use shuffle::shuffle_by_priority;
pub use summary::{summarize, DrawStatistics};
pub use waitlist::{pick_winner, WaitlistDraw};
