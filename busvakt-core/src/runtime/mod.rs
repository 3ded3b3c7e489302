//! Best-effort host runtime sampling.
//!
//! Thread classification matches thread names against a configured substring
//! pattern (the dispatch collaborator's naming convention). This is an
//! accepted approximation: it can under/over-count if the collaborator
//! renames its pools. The [`RuntimeIntrospect`] seam lets a dispatcher that
//! can tag its threads supply an exact implementation instead.

pub mod proc;

pub use proc::ProcIntrospect;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde::Serialize;

use crate::error::SampleError;

/// One host thread as seen by the introspection facility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadInfo {
    pub id: u64,
    pub name: String,
    pub cpu_time_ns: u64,
}

/// Host memory figures in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryFigures {
    pub used_bytes: u64,
    pub total_bytes: u64,
    pub max_bytes: u64,
}

/// Static descriptor of a collaborator-owned worker pool, reported in the
/// detailed dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolSpec {
    pub name: String,
    pub size: usize,
}

/// Point-in-time runtime sample, created fresh on every tick and discarded
/// after reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuntimeSample {
    /// Threads whose name matched the configured pattern.
    pub worker_threads: u64,
    /// Cumulative CPU time of the matched threads.
    pub worker_cpu_time_ns: u64,
    pub used_memory_bytes: u64,
    pub total_memory_bytes: u64,
    pub max_memory_bytes: u64,
    pub local_consumers: usize,
    pub remote_consumers: usize,
}

/// Read-only host introspection supplied by the collaborator environment.
pub trait RuntimeIntrospect: Send + Sync {
    fn threads(&self) -> Result<Vec<ThreadInfo>, SampleError>;
    fn memory(&self) -> Result<MemoryFigures, SampleError>;
}

/// Reads host thread and memory state on demand.
///
/// Consumer counts are explicit registrations from the owning runtime rather
/// than estimates derived from introspection.
pub struct RuntimeSampler {
    introspect: Arc<dyn RuntimeIntrospect>,
    thread_pattern: String,
    local_consumers: AtomicUsize,
    remote_consumers: AtomicUsize,
}

impl RuntimeSampler {
    /// Sampler backed by `/proc` introspection of the current process.
    pub fn new(thread_pattern: impl Into<String>) -> Self {
        Self::with_introspect(thread_pattern, Arc::new(ProcIntrospect))
    }

    pub fn with_introspect(
        thread_pattern: impl Into<String>,
        introspect: Arc<dyn RuntimeIntrospect>,
    ) -> Self {
        Self {
            introspect,
            thread_pattern: thread_pattern.into(),
            local_consumers: AtomicUsize::new(0),
            remote_consumers: AtomicUsize::new(0),
        }
    }

    pub fn thread_pattern(&self) -> &str {
        &self.thread_pattern
    }

    pub fn register_local_consumer(&self) {
        self.local_consumers.fetch_add(1, Ordering::Relaxed);
    }

    pub fn deregister_local_consumer(&self) {
        let _ = self
            .local_consumers
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |count| {
                Some(count.saturating_sub(1))
            });
    }

    pub fn register_remote_consumer(&self) {
        self.remote_consumers.fetch_add(1, Ordering::Relaxed);
    }

    pub fn deregister_remote_consumer(&self) {
        let _ = self
            .remote_consumers
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |count| {
                Some(count.saturating_sub(1))
            });
    }

    /// Takes a fresh sample. A collaborator-side introspection failure is
    /// returned to the caller, which skips the current report cycle.
    pub fn sample(&self) -> Result<RuntimeSample, SampleError> {
        let threads = self.introspect.threads()?;
        let memory = self.introspect.memory()?;

        let mut worker_threads = 0u64;
        let mut worker_cpu_time_ns = 0u64;
        for thread in &threads {
            if thread.name.contains(&self.thread_pattern) {
                worker_threads += 1;
                worker_cpu_time_ns = worker_cpu_time_ns.saturating_add(thread.cpu_time_ns);
            }
        }

        Ok(RuntimeSample {
            worker_threads,
            worker_cpu_time_ns,
            used_memory_bytes: memory.used_bytes,
            total_memory_bytes: memory.total_bytes,
            max_memory_bytes: memory.max_bytes,
            local_consumers: self.local_consumers.load(Ordering::Relaxed),
            remote_consumers: self.remote_consumers.load(Ordering::Relaxed),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeIntrospect {
        threads: Vec<ThreadInfo>,
    }

    impl RuntimeIntrospect for FakeIntrospect {
        fn threads(&self) -> Result<Vec<ThreadInfo>, SampleError> {
            Ok(self.threads.clone())
        }

        fn memory(&self) -> Result<MemoryFigures, SampleError> {
            Ok(MemoryFigures {
                used_bytes: 64 << 20,
                total_bytes: 512 << 20,
                max_bytes: 512 << 20,
            })
        }
    }

    struct BrokenIntrospect;

    impl RuntimeIntrospect for BrokenIntrospect {
        fn threads(&self) -> Result<Vec<ThreadInfo>, SampleError> {
            Err(SampleError::Unavailable("introspection down".into()))
        }

        fn memory(&self) -> Result<MemoryFigures, SampleError> {
            Err(SampleError::Unavailable("introspection down".into()))
        }
    }

    fn thread(id: u64, name: &str, cpu_time_ns: u64) -> ThreadInfo {
        ThreadInfo {
            id,
            name: name.to_string(),
            cpu_time_ns,
        }
    }

    #[test]
    fn counts_only_threads_matching_the_pattern() {
        let introspect = FakeIntrospect {
            threads: vec![
                thread(1, "main", 5),
                thread(2, "custom-pool-thread-0", 100),
                thread(3, "custom-pool-thread-1", 200),
                thread(4, "tokio-runtime-worker", 50),
            ],
        };
        let sampler = RuntimeSampler::with_introspect("custom-pool", Arc::new(introspect));

        let sample = sampler.sample().unwrap();
        assert_eq!(sample.worker_threads, 2);
        assert_eq!(sample.worker_cpu_time_ns, 300);
    }

    #[test]
    fn no_matches_yields_zero_counts() {
        let introspect = FakeIntrospect {
            threads: vec![thread(1, "main", 5)],
        };
        let sampler = RuntimeSampler::with_introspect("custom-pool", Arc::new(introspect));

        let sample = sampler.sample().unwrap();
        assert_eq!(sample.worker_threads, 0);
        assert_eq!(sample.worker_cpu_time_ns, 0);
    }

    #[test]
    fn consumer_registration_is_explicit() {
        let sampler = RuntimeSampler::with_introspect(
            "worker",
            Arc::new(FakeIntrospect { threads: vec![] }),
        );
        sampler.register_local_consumer();
        sampler.register_local_consumer();
        sampler.register_remote_consumer();
        sampler.deregister_local_consumer();

        let sample = sampler.sample().unwrap();
        assert_eq!(sample.local_consumers, 1);
        assert_eq!(sample.remote_consumers, 1);
    }

    #[test]
    fn deregister_never_underflows() {
        let sampler = RuntimeSampler::with_introspect(
            "worker",
            Arc::new(FakeIntrospect { threads: vec![] }),
        );
        sampler.deregister_local_consumer();

        let sample = sampler.sample().unwrap();
        assert_eq!(sample.local_consumers, 0);
    }

    #[test]
    fn introspection_failure_propagates_to_caller() {
        let sampler = RuntimeSampler::with_introspect("worker", Arc::new(BrokenIntrospect));
        assert!(matches!(
            sampler.sample(),
            Err(SampleError::Unavailable(_))
        ));
    }
}
