//! Custom validation functions shared across configuration modules.

use std::collections::HashSet;

use validator::ValidationError;

use crate::monitor::WorkerPoolConfig;

/// The thread pattern must carry at least one non-whitespace character;
/// an empty pattern would classify every thread as a worker.
pub fn validate_thread_pattern(pattern: &str) -> Result<(), ValidationError> {
    if pattern.trim().is_empty() {
        return Err(ValidationError::new("empty_thread_pattern"));
    }
    Ok(())
}

/// Pool descriptors must have unique, non-empty names and a nonzero size
/// so the detailed report is unambiguous.
pub fn validate_pools(pools: &[WorkerPoolConfig]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for pool in pools {
        if pool.name.trim().is_empty() {
            return Err(ValidationError::new("empty_pool_name"));
        }
        if pool.size == 0 {
            return Err(ValidationError::new("zero_pool_size"));
        }
        if !seen.insert(pool.name.as_str()) {
            return Err(ValidationError::new("duplicate_pool_name"));
        }
    }
    Ok(())
}
