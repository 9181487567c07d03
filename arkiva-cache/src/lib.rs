//! Summary cache with explicit generation accounting.
//!
//! Entries are addressed only by [`Fingerprint`](arkiva_core::Fingerprint),
//! so a new document version is a new key and never an in-place
//! invalidation. Expired entries are swept lazily on read; there is no
//! background task.
//!
//! # Generation accounting
//!
//! Every reservation consumes one generation credit for its fingerprint.
//! Counts are kept in a ledger that outlives the summary text, so a
//! fingerprint's count never goes down within a session even after its
//! entry expires. [`GenerationPolicy`] caps the count; callers must check
//! [`CacheStore::quota_exhausted`] before calling [`CacheStore::reserve`].
//!
//! # Example
//!
//! ```ignore
//! let mut store = CacheStore::new();
//! let policy = GenerationPolicy::default().with_max_generations(2);
//!
//! match store.get(&fp, now) {
//!     Some(entry) if entry.has_summary() => show(entry.summary),
//!     _ if store.quota_exhausted(&fp, &policy) => show_error(QUOTA_EXCEEDED_MESSAGE),
//!     _ => {
//!         store.reserve(&fp, now, policy.ttl);
//!         // ... later, when the backend answers
//!         store.commit(&fp, summary, later, policy.ttl);
//!     }
//! }
//! ```

pub mod policy;
pub mod stats;
pub mod store;

pub use policy::GenerationPolicy;
pub use stats::CacheStats;
pub use store::{CacheEntry, CacheStore};
