//! Refund service builder

use std::sync::Arc;

use crate::config::RefundConfig;
use crate::error::{RefundError, RefundResult};
use crate::gateway::RefundGateway;
use crate::ledger::AuditLedger;
use crate::store::BookingStore;

use super::RefundService;

/// Builder for [`RefundService`]
///
/// The store, ledger, and gateway are required; the configuration falls
/// back to defaults when not provided.
pub struct RefundServiceBuilder {
    store: Option<Arc<dyn BookingStore>>,
    ledger: Option<Arc<dyn AuditLedger>>,
    gateway: Option<Arc<dyn RefundGateway>>,
    config: Option<RefundConfig>,
}

impl RefundServiceBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            store: None,
            ledger: None,
            gateway: None,
            config: None,
        }
    }

    /// Set the booking record store
    pub fn store(mut self, store: Arc<dyn BookingStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the audit ledger
    pub fn ledger(mut self, ledger: Arc<dyn AuditLedger>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    /// Set the refund gateway client
    pub fn gateway(mut self, gateway: Arc<dyn RefundGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// Set the configuration
    pub fn config(mut self, config: RefundConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the service
    pub fn build(self) -> RefundResult<RefundService> {
        let store = self
            .store
            .ok_or_else(|| RefundError::Configuration("booking store is required".to_string()))?;
        let ledger = self
            .ledger
            .ok_or_else(|| RefundError::Configuration("audit ledger is required".to_string()))?;
        let gateway = self
            .gateway
            .ok_or_else(|| RefundError::Configuration("refund gateway is required".to_string()))?;
        let config = self.config.unwrap_or_default();

        Ok(RefundService::new(store, ledger, gateway, config))
    }
}

impl Default for RefundServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
