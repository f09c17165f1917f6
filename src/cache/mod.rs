//! Cache Module
//!
//! Namespaced memcache-style operations with CAS, expiration and counters.

mod expiration;
mod identifiable;
mod key;
mod policy;
mod service;
mod stats;
mod value;


// Re-export public types
pub use expiration::{Expiration, Lifespan};
pub use identifiable::{CasValues, IdentifiableValue};
pub use key::{validate_namespace, KeyCodec, NamespacedKey, RequestContext};
pub use policy::SetPolicy;
pub use service::{CacheService, DEFAULT_INCREMENT_RETRIES};
pub use stats::CacheStats;
pub use value::CacheValue;

// == Public Constants ==
/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB
