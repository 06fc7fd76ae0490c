//! Containers with a deterministic hasher.
use fnv::FnvBuildHasher;

/// [`std::collections::HashMap`] that defaults to a deterministic hasher.
pub(crate) type HashMap<K, V, Hasher = FnvBuildHasher> = std::collections::HashMap<K, V, Hasher>;
