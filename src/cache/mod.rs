//! Write-once local cache of raw log bodies
//!
//! Entries live at `<cache_root>/<merchant_id>/<filename>` and are never
//! rewritten or evicted by the engine.

mod errors;
mod store;

pub use errors::{CacheError, CacheResult};
pub use store::LogCache;
