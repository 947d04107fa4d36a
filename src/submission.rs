//! Simulated swap backend: random latency, random success.

use crate::config::SubmissionConfig;
use crate::errors::Result;
use crate::models::{SubmitOutcome, SwapForm};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info};

pub const FAILURE_MESSAGE: &str = "Swap failed. Please try again later.";

pub struct SubmissionSimulator {
    config: SubmissionConfig,
    rng: Mutex<StdRng>,
}

impl SubmissionSimulator {
    pub fn new(config: SubmissionConfig) -> Result<Self> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Deterministic simulator for tests and reproducible demos.
    pub fn with_seed(config: SubmissionConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: SubmissionConfig, rng: StdRng) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng: Mutex::new(rng),
        })
    }

    /// Draw the delay and the verdict for one attempt.
    fn roll(&self) -> (Duration, bool) {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        let min = self.config.min_delay.as_millis() as u64;
        let max = self.config.max_delay.as_millis() as u64;
        let delay = Duration::from_millis(rng.gen_range(min..=max));
        let success = rng.gen_bool(self.config.success_rate);
        (delay, success)
    }

    /// Wait out the simulated latency, then report success or failure.
    pub async fn submit(&self, form: &SwapForm) -> SubmitOutcome {
        let (delay, success) = self.roll();
        debug!(delay_ms = delay.as_millis() as u64, "[SWAP] simulating submission");
        tokio::time::sleep(delay).await;

        let outcome = if success {
            SubmitOutcome {
                success: true,
                message: success_message(form),
            }
        } else {
            SubmitOutcome {
                success: false,
                message: FAILURE_MESSAGE.to_string(),
            }
        };
        info!(success = outcome.success, detail = %outcome.message, "[SWAP] submission settled");
        outcome
    }
}

/// `Successfully swapped 2 ETH for 6000 USD`
pub fn success_message(form: &SwapForm) -> String {
    let from = form.from_token.as_ref().map(|t| t.symbol.as_str()).unwrap_or_default();
    let to = form.to_token.as_ref().map(|t| t.symbol.as_str()).unwrap_or_default();
    format!(
        "Successfully swapped {} {} for {} {}",
        form.from_amount, from, form.to_amount, to
    )
}
