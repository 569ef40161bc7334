// file: src/utils/health.rs
// description: health checks for the tools and config files a pipeline needs
// reference: backs the `check` command

use colored::Colorize;
use serde::{Deserialize, Serialize};

/// A failing tool or tap config means the pipeline cannot run. A config
/// that exists but is not a JSON object only degrades it, since the tap
/// is the one that interprets the file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    fn icon(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "✓",
            HealthStatus::Degraded => "⚠",
            HealthStatus::Unhealthy => "✗",
        }
    }

    fn paint(&self, line: String) -> String {
        match self {
            HealthStatus::Healthy => line.green().to_string(),
            HealthStatus::Degraded => line.yellow().to_string(),
            HealthStatus::Unhealthy => line.red().to_string(),
        }
    }
}

/// One line of `check` output: a tool, config file or directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheck {
    pub component: String,
    pub status: HealthStatus,
    pub message: Option<String>,
}

impl HealthCheck {
    pub fn healthy(component: &str, message: Option<String>) -> Self {
        Self {
            component: component.to_string(),
            status: HealthStatus::Healthy,
            message,
        }
    }

    pub fn degraded(component: &str, message: String) -> Self {
        Self {
            component: component.to_string(),
            status: HealthStatus::Degraded,
            message: Some(message),
        }
    }

    pub fn unhealthy(component: &str, message: String) -> Self {
        Self {
            component: component.to_string(),
            status: HealthStatus::Unhealthy,
            message: Some(message),
        }
    }

    pub fn is_unhealthy(&self) -> bool {
        self.status == HealthStatus::Unhealthy
    }
}

/// Readiness of the tap, selector and target setup, worst check wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub overall_status: HealthStatus,
    pub checks: Vec<HealthCheck>,
    pub checked_at: String,
    pub version: String,
}

impl HealthReport {
    pub fn new(checks: Vec<HealthCheck>, version: String) -> Self {
        let overall_status = [HealthStatus::Unhealthy, HealthStatus::Degraded]
            .into_iter()
            .find(|status| checks.iter().any(|c| &c.status == status))
            .unwrap_or(HealthStatus::Healthy);

        Self {
            overall_status,
            checks,
            checked_at: chrono::Utc::now()
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string(),
            version,
        }
    }

    /// Degraded still counts as runnable.
    pub fn is_healthy(&self) -> bool {
        self.overall_status != HealthStatus::Unhealthy
    }

    pub fn format(&self) -> String {
        let mut output = format!(
            "{} singer_pipeline {} ({:?}) checked at {}\n\n",
            self.overall_status.icon(),
            self.version,
            self.overall_status,
            self.checked_at
        );

        for check in &self.checks {
            let line = format!("{} {:<18}", check.status.icon(), check.component);
            let detail = check.message.as_deref().unwrap_or("");
            output.push_str(&check.status.paint(line));
            output.push_str(&format!(" {}\n", detail));
        }

        output
    }
}
