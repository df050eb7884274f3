// System probe backed by sysinfo
// reason: sysinfo for cross-platform CPU, memory and disk readings
use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use sysinfo::{Disks, System, MINIMUM_CPU_UPDATE_INTERVAL};
use tracing::debug;

use toolkit_core::port::system_probe::{SystemMetrics, SystemProbe};

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Host resource probe
///
/// CPU usage is a delta between two refreshes, so the first sample
/// primes the counters and waits one update interval.
pub struct SysinfoProbe {
    system: Arc<Mutex<System>>,
    primed: AtomicBool,
}

impl SysinfoProbe {
    pub fn new() -> Self {
        Self {
            system: Arc::new(Mutex::new(System::new())),
            primed: AtomicBool::new(false),
        }
    }

    fn with_system<T>(&self, f: impl FnOnce(&mut System) -> T) -> T {
        // A poisoned lock still holds a usable System
        let mut sys = self
            .system
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut sys)
    }
}

impl Default for SysinfoProbe {
    fn default() -> Self {
        Self::new()
    }
}

/// Used and total bytes of the root filesystem, or the first disk when "/"
/// is not mounted
fn disk_usage_bytes() -> (u64, u64) {
    let disks = Disks::new_with_refreshed_list();
    let disk = disks
        .iter()
        .find(|d| d.mount_point() == Path::new("/"))
        .or_else(|| disks.iter().next());

    match disk {
        Some(disk) => {
            let total = disk.total_space();
            let used = total.saturating_sub(disk.available_space());
            (used, total)
        }
        None => (0, 0),
    }
}

#[async_trait]
impl SystemProbe for SysinfoProbe {
    async fn get_metrics(&self) -> SystemMetrics {
        if !self.primed.swap(true, Ordering::SeqCst) {
            self.with_system(|sys| sys.refresh_cpu());
            tokio::time::sleep(MINIMUM_CPU_UPDATE_INTERVAL).await;
        }

        let (cpu_usage_percent, memory_used_mb, memory_total_mb) = self.with_system(|sys| {
            sys.refresh_cpu();
            sys.refresh_memory();
            (
                sys.global_cpu_info().cpu_usage(),
                sys.used_memory() / BYTES_PER_MB,
                sys.total_memory() / BYTES_PER_MB,
            )
        });

        let (disk_used_bytes, disk_total_bytes) = disk_usage_bytes();

        debug!(
            cpu = %cpu_usage_percent,
            mem_used_mb = %memory_used_mb,
            mem_total_mb = %memory_total_mb,
            disk_used_bytes = %disk_used_bytes,
            disk_total_bytes = %disk_total_bytes,
            "System metrics collected"
        );

        SystemMetrics {
            cpu_usage_percent,
            memory_used_mb,
            memory_total_mb,
            disk_used_bytes,
            disk_total_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_metrics() {
        let probe = SysinfoProbe::new();
        let metrics = probe.get_metrics().await;

        assert!(metrics.cpu_usage_percent >= 0.0);
        assert!(metrics.cpu_usage_percent <= 100.0);
        assert!(metrics.memory_total_mb > 0);
        assert!(metrics.memory_used_mb <= metrics.memory_total_mb);
        assert!(metrics.disk_used_bytes <= metrics.disk_total_bytes);
    }

    #[tokio::test]
    async fn test_repeated_samples_stay_in_range() {
        let probe = SysinfoProbe::new();

        for _ in 0..3 {
            let metrics = probe.get_metrics().await;
            assert!((0.0..=100.0).contains(&metrics.memory_usage_percent()));
            assert!((0.0..=100.0).contains(&metrics.disk_usage_percent()));
        }
    }
}
