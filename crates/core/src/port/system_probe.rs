// System resource monitoring port
use async_trait::async_trait;
use serde::Serialize;

pub const BYTES_PER_GB: u64 = 1024 * 1024 * 1024;

/// System resource metrics
///
/// Disk figures are raw byte counts; gigabytes are for display only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemMetrics {
    pub cpu_usage_percent: f32,
    pub memory_used_mb: u64,
    pub memory_total_mb: u64,
    pub disk_used_bytes: u64,
    pub disk_total_bytes: u64,
}

impl SystemMetrics {
    pub fn memory_usage_percent(&self) -> f32 {
        percent(self.memory_used_mb, self.memory_total_mb)
    }

    pub fn disk_usage_percent(&self) -> f32 {
        percent(self.disk_used_bytes, self.disk_total_bytes)
    }

    pub fn disk_used_gb(&self) -> f64 {
        self.disk_used_bytes as f64 / BYTES_PER_GB as f64
    }

    pub fn disk_total_gb(&self) -> f64 {
        self.disk_total_bytes as f64 / BYTES_PER_GB as f64
    }
}

fn percent(used: u64, total: u64) -> f32 {
    if total == 0 {
        0.0
    } else {
        (used as f64 / total as f64 * 100.0) as f32
    }
}

/// System probe port for resource monitoring
///
/// Used by the real-time monitor and monitoring reports
#[async_trait]
pub trait SystemProbe: Send + Sync {
    /// Get current system metrics
    ///
    /// # Returns
    /// SystemMetrics with CPU, memory and disk usage
    ///
    /// # Example
    /// ```text
    /// let metrics = probe.get_metrics().await;
    /// if metrics.cpu_usage_percent > thresholds.cpu {
    ///     println!("CPU alert");
    /// }
    /// ```
    async fn get_metrics(&self) -> SystemMetrics;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};
    /// Mock SystemProbe for testing
    #[derive(Clone)]
    pub struct MockSystemProbe {
        metrics: Arc<Mutex<SystemMetrics>>,
        samples: Arc<Mutex<usize>>,
    }
    impl MockSystemProbe {
        pub fn new(cpu_usage_percent: f32) -> Self {
            Self {
                metrics: Arc::new(Mutex::new(SystemMetrics {
                    cpu_usage_percent,
                    memory_used_mb: 1024,
                    memory_total_mb: 2048,
                    disk_used_bytes: 100 * BYTES_PER_GB,
                    disk_total_bytes: 500 * BYTES_PER_GB,
                })),
                samples: Arc::new(Mutex::new(0)),
            }
        }
        pub fn set_metrics(&self, metrics: SystemMetrics) {
            *self.metrics.lock().unwrap_or_else(|e| e.into_inner()) = metrics;
        }
        pub fn sample_count(&self) -> usize {
            *self.samples.lock().unwrap_or_else(|e| e.into_inner())
        }
    }
    #[async_trait]
    impl SystemProbe for MockSystemProbe {
        async fn get_metrics(&self) -> SystemMetrics {
            *self.samples.lock().unwrap_or_else(|e| e.into_inner()) += 1;
            self.metrics.lock().unwrap_or_else(|e| e.into_inner()).clone()
        }
    }
}
