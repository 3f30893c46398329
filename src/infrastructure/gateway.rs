use crate::domain::money::Amount;
use crate::domain::payment::{Authorization, CardCredentials};
use crate::domain::ports::PaymentGateway;
use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// CVC that makes the simulated gateway decline.
pub const DECLINING_CVC: &str = "999";

/// A stand-in gateway for demos and tests.
///
/// Approves every request unless the CVC is [`DECLINING_CVC`]. Reference tokens
/// look like `sim_<32 hex digits>`. An optional latency simulates a slow network.
#[derive(Debug, Clone, Default)]
pub struct SimulatedGateway {
    latency: Duration,
}

impl SimulatedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn authorize(
        &self,
        amount: Amount,
        credentials: &CardCredentials,
    ) -> Result<Authorization> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if credentials.cvc == DECLINING_CVC {
            debug!(amount = %amount.value(), "simulated gateway declined");
            return Ok(Authorization::declined());
        }

        let reference = format!("sim_{}", Uuid::new_v4().simple());
        debug!(amount = %amount.value(), reference = %reference, "simulated gateway approved");
        Ok(Authorization::approved(reference))
    }
}
