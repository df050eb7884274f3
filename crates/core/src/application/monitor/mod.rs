// Monitor - real-time resource sampling with threshold alerts

mod stop;

pub use stop::{stop_channel, StopHandle, StopSignal};

use super::constants::MONITORING_REPORT_PREFIX;
use crate::domain::AlertThresholds;
use crate::error::Result;
use crate::port::{ArtifactStore, SystemMetrics, SystemProbe, TimeProvider};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Resource an alert is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Cpu,
    Memory,
    Disk,
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resource::Cpu => write!(f, "CPU"),
            Resource::Memory => write!(f, "Memory"),
            Resource::Disk => write!(f, "Disk"),
        }
    }
}

/// Usage above a configured threshold
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub resource: Resource,
    pub usage_percent: f32,
    pub threshold_percent: f32,
}

impl std::fmt::Display for Alert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} usage {:.1}% exceeds threshold {:.0}%",
            self.resource, self.usage_percent, self.threshold_percent
        )
    }
}

/// Compare metrics against thresholds; usage strictly above a threshold alerts
pub fn evaluate_alerts(thresholds: &AlertThresholds, metrics: &SystemMetrics) -> Vec<Alert> {
    [
        (Resource::Cpu, metrics.cpu_usage_percent, thresholds.cpu),
        (Resource::Memory, metrics.memory_usage_percent(), thresholds.memory),
        (Resource::Disk, metrics.disk_usage_percent(), thresholds.disk),
    ]
    .into_iter()
    .filter(|(_, usage, threshold)| usage > threshold)
    .map(|(resource, usage_percent, threshold_percent)| Alert {
        resource,
        usage_percent,
        threshold_percent,
    })
    .collect()
}

/// One monitor iteration
#[derive(Debug, Clone)]
pub struct MonitorSample {
    pub taken_at: String,
    pub metrics: SystemMetrics,
    pub alerts: Vec<Alert>,
}

/// Monitor
pub struct Monitor {
    system_probe: Arc<dyn SystemProbe>,
    artifact_store: Arc<dyn ArtifactStore>,
    time_provider: Arc<dyn TimeProvider>,
}

impl Monitor {
    pub fn new(
        system_probe: Arc<dyn SystemProbe>,
        artifact_store: Arc<dyn ArtifactStore>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            system_probe,
            artifact_store,
            time_provider,
        }
    }

    /// Take one sample and evaluate alerts
    pub async fn sample(&self, thresholds: &AlertThresholds) -> MonitorSample {
        let metrics = self.system_probe.get_metrics().await;
        let alerts = evaluate_alerts(thresholds, &metrics);
        for alert in &alerts {
            warn!(
                resource = %alert.resource,
                usage_percent = alert.usage_percent,
                threshold_percent = alert.threshold_percent,
                "Resource threshold exceeded"
            );
        }

        MonitorSample {
            taken_at: self.time_provider.now().format("%Y-%m-%d %H:%M:%S").to_string(),
            metrics,
            alerts,
        }
    }

    /// Sample every `interval` until `stop` fires
    ///
    /// Cooperative single loop; the interrupt is observed while sleeping.
    ///
    /// # Returns
    /// Number of samples taken
    pub async fn run<F>(
        &self,
        thresholds: &AlertThresholds,
        interval: Duration,
        mut stop: StopSignal,
        mut on_sample: F,
    ) -> usize
    where
        F: FnMut(&MonitorSample) + Send,
    {
        info!(interval_secs = interval.as_secs_f64(), "Real-time monitor started");
        let mut samples = 0;

        loop {
            if stop.is_stopped() {
                break;
            }

            let sample = self.sample(thresholds).await;
            samples += 1;
            on_sample(&sample);

            tokio::select! {
                _ = sleep(interval) => {},
                _ = stop.stopped() => {
                    info!("Monitor interrupted");
                    break;
                }
            }
        }

        info!(samples, "Real-time monitor stopped");
        samples
    }

    /// Save one snapshot as `monitoring_report_{stamp}.json`
    pub async fn write_report(
        &self,
        thresholds: &AlertThresholds,
    ) -> Result<(PathBuf, MonitorSample)> {
        let sample = self.sample(thresholds).await;
        let body = json!({
            "generated": sample.taken_at,
            "metrics": {
                "cpu_usage_percent": sample.metrics.cpu_usage_percent,
                "memory_used_mb": sample.metrics.memory_used_mb,
                "memory_total_mb": sample.metrics.memory_total_mb,
                "memory_usage_percent": sample.metrics.memory_usage_percent(),
                "disk_used_bytes": sample.metrics.disk_used_bytes,
                "disk_total_bytes": sample.metrics.disk_total_bytes,
                "disk_usage_percent": sample.metrics.disk_usage_percent(),
            },
            "thresholds": thresholds,
            "alerts": sample.alerts,
        });

        let stamp = self.time_provider.artifact_stamp();
        let path = self
            .artifact_store
            .save_json(MONITORING_REPORT_PREFIX, &stamp, &body)
            .await?;

        info!(alerts = sample.alerts.len(), path = %path.display(), "Monitoring report saved");
        Ok((path, sample))
    }
}
