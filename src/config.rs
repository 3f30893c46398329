use std::time::Duration;

/// Default upper bound for a single gateway authorization.
pub const DEFAULT_GATEWAY_TIMEOUT: Duration = Duration::from_secs(10);

/// Runtime settings for the [`Ledger`](crate::application::ledger::Ledger).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// How long to wait for the gateway before treating a payment as declined.
    pub gateway_timeout: Duration,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            gateway_timeout: DEFAULT_GATEWAY_TIMEOUT,
        }
    }
}

impl LedgerConfig {
    pub fn with_gateway_timeout(mut self, timeout: Duration) -> Self {
        self.gateway_timeout = timeout;
        self
    }
}
