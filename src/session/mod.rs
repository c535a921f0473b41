//! Search sessions
//!
//! One session per log server. A session discovers a merchant's log files,
//! fans them out to a worker pool, and collects numbered results.

pub mod coordinator;
pub mod errors;
pub mod events;
pub mod manager;
pub mod registry;
pub mod types;
pub mod work_queue;
pub mod worker;

pub use coordinator::SessionCoordinator;
pub use errors::{ItemError, SessionError};
pub use events::{SessionEvent, SessionEvents};
pub use manager::SessionSetManager;
pub use registry::{HitDraft, ResultRegistry};
pub use types::{Origin, SearchHit, SessionFailure, SessionStatus, WorkItem};
pub use work_queue::WorkQueue;
pub use worker::WorkerReport;
