//! `/proc`-backed introspection of the current process.

#[cfg(target_os = "linux")]
use std::fs;

use crate::error::SampleError;
use crate::runtime::{MemoryFigures, RuntimeIntrospect, ThreadInfo};

/// Reads thread and memory state from `/proc/self`. Linux only; other
/// targets report [`SampleError::Unsupported`], which the scheduler treats
/// as a degraded cycle.
#[derive(Debug, Default)]
pub struct ProcIntrospect;

impl RuntimeIntrospect for ProcIntrospect {
    fn threads(&self) -> Result<Vec<ThreadInfo>, SampleError> {
        #[cfg(target_os = "linux")]
        {
            read_tasks()
        }
        #[cfg(not(target_os = "linux"))]
        {
            Err(SampleError::Unsupported("thread introspection requires /proc"))
        }
    }

    fn memory(&self) -> Result<MemoryFigures, SampleError> {
        #[cfg(target_os = "linux")]
        {
            read_memory()
        }
        #[cfg(not(target_os = "linux"))]
        {
            Err(SampleError::Unsupported("memory introspection requires /proc"))
        }
    }
}

#[cfg(target_os = "linux")]
fn read_tasks() -> Result<Vec<ThreadInfo>, SampleError> {
    let mut threads = Vec::new();
    for entry in fs::read_dir("/proc/self/task")? {
        let entry = entry?;
        let id: u64 = match entry.file_name().to_string_lossy().parse() {
            Ok(id) => id,
            Err(_) => continue,
        };

        // A thread can exit between the directory scan and these reads;
        // skip it rather than failing the whole sample.
        let path = entry.path();
        let name = match fs::read_to_string(path.join("comm")) {
            Ok(name) => name.trim().to_string(),
            Err(_) => continue,
        };

        // schedstat field 1 is cumulative runtime in nanoseconds.
        let cpu_time_ns = fs::read_to_string(path.join("schedstat"))
            .ok()
            .and_then(|stat| {
                stat.split_whitespace()
                    .next()
                    .and_then(|v| v.parse::<u64>().ok())
            })
            .unwrap_or(0);

        threads.push(ThreadInfo {
            id,
            name,
            cpu_time_ns,
        });
    }
    Ok(threads)
}

#[cfg(target_os = "linux")]
fn read_memory() -> Result<MemoryFigures, SampleError> {
    let used_bytes = resident_bytes()?;
    let total_bytes = meminfo_total()?;
    let max_bytes = cgroup_memory_max().unwrap_or(total_bytes);
    Ok(MemoryFigures {
        used_bytes,
        total_bytes,
        max_bytes,
    })
}

/// Resident set size of the current process.
#[cfg(target_os = "linux")]
fn resident_bytes() -> Result<u64, SampleError> {
    let statm = fs::read_to_string("/proc/self/statm")?;
    let resident: u64 = statm
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| SampleError::Unavailable("/proc/self/statm resident field".into()))?
        .parse()
        .map_err(|_| SampleError::Unavailable("/proc/self/statm parse".into()))?;

    let page_size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if page_size <= 0 {
        return Err(SampleError::Unsupported("sysconf(_SC_PAGESIZE)"));
    }
    Ok(resident * page_size as u64)
}

#[cfg(target_os = "linux")]
fn meminfo_total() -> Result<u64, SampleError> {
    let meminfo = fs::read_to_string("/proc/meminfo")?;
    for line in meminfo.lines() {
        if let Some(rest) = line.strip_prefix("MemTotal:") {
            let kib: u64 = rest
                .split_whitespace()
                .next()
                .ok_or_else(|| SampleError::Unavailable("MemTotal field".into()))?
                .parse()
                .map_err(|_| SampleError::Unavailable("MemTotal parse".into()))?;
            return Ok(kib * 1024);
        }
    }
    Err(SampleError::Unavailable("MemTotal missing from /proc/meminfo".into()))
}

/// Cgroup v2 memory limit, when one applies. "max" (no limit) parses as
/// `None` and callers fall back to the host total.
#[cfg(target_os = "linux")]
fn cgroup_memory_max() -> Option<u64> {
    fs::read_to_string("/sys/fs/cgroup/memory.max")
        .ok()?
        .trim()
        .parse()
        .ok()
}

#[cfg(all(test, target_os = "linux"))]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn lists_the_current_process_threads() {
        let threads = read_tasks().unwrap();
        assert!(!threads.is_empty());
    }

    #[test]
    fn sees_a_named_spawned_thread() {
        let (ready_tx, ready_rx) = mpsc::channel();
        let (done_tx, done_rx) = mpsc::channel::<()>();

        let handle = std::thread::Builder::new()
            .name("bv-probe-0".into())
            .spawn(move || {
                ready_tx.send(()).unwrap();
                // Hold the thread alive until the scan is done.
                let _ = done_rx.recv();
            })
            .unwrap();

        ready_rx.recv().unwrap();
        let threads = read_tasks().unwrap();
        assert!(threads.iter().any(|t| t.name.contains("bv-probe")));

        done_tx.send(()).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn memory_figures_are_plausible() {
        let memory = read_memory().unwrap();
        assert!(memory.used_bytes > 0);
        assert!(memory.total_bytes > 0);
        assert!(memory.max_bytes > 0);
    }
}
