//! Refund Core Configuration
//!
//! Runtime settings for the refund lifecycle. Supports loading from
//! environment variables with the REFUND_ prefix.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::batch::BatchConfig;
use crate::sla::SlaConfig;

/// Refund core configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefundConfig {
    /// Urgency thresholds
    #[serde(default)]
    pub sla: SlaConfig,
    /// Deadline for a single gateway refund call, in seconds; an elapsed
    /// deadline is treated as gateway failure
    #[serde(default = "default_gateway_timeout")]
    pub gateway_timeout_secs: u64,
    /// Batch remediation settings
    #[serde(default)]
    pub batch: BatchConfig,
}

fn default_gateway_timeout() -> u64 {
    30
}

impl Default for RefundConfig {
    fn default() -> Self {
        Self {
            sla: SlaConfig::default(),
            gateway_timeout_secs: 30,
            batch: BatchConfig::default(),
        }
    }
}

impl RefundConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - REFUND_GATEWAY_TIMEOUT_SECS: gateway call deadline in seconds
    ///
    /// SLA and batch settings are read from their respective env vars; see
    /// [`SlaConfig::from_env`] and [`BatchConfig::from_env`].
    pub fn from_env() -> Self {
        Self {
            sla: SlaConfig::from_env(),
            gateway_timeout_secs: env::var("REFUND_GATEWAY_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_gateway_timeout),
            batch: BatchConfig::from_env(),
        }
    }

    /// Gateway call deadline as a [`Duration`]
    pub fn gateway_timeout(&self) -> Duration {
        Duration::from_secs(self.gateway_timeout_secs)
    }
}
