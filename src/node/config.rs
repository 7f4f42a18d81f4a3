use crate::common::{DEFAULT_CLOSEST_COUNT, ID_BITS};

/// Routing table slots a store fans out to, starting at the key's bucket.
pub const DEFAULT_STORE_FAN_OUT: usize = ID_BITS / 8;
/// Hop bound on store propagation.
pub const DEFAULT_MAX_STORE_DEPTH: usize = ID_BITS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Node Configurations
pub struct Config {
    /// Number of consecutive routing table slots (wrapping) a successful
    /// store is forwarded to.
    ///
    /// Defaults to [DEFAULT_STORE_FAN_OUT]
    pub store_fan_out: usize,
    /// Number of closest neighbors whose local stores a retrieval inspects
    /// after a local miss.
    ///
    /// Defaults to [DEFAULT_CLOSEST_COUNT]
    pub retrieve_candidates: usize,
    /// Maximum number of hops a store is forwarded across.
    ///
    /// Propagation also never visits the same node twice within one store,
    /// so this only matters for very long chains.
    ///
    /// Defaults to [DEFAULT_MAX_STORE_DEPTH]
    pub max_store_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_fan_out: DEFAULT_STORE_FAN_OUT,
            retrieve_candidates: DEFAULT_CLOSEST_COUNT,
            max_store_depth: DEFAULT_MAX_STORE_DEPTH,
        }
    }
}
