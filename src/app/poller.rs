//! Settlement polling.
//!
//! Mutations return the new balance synchronously, but the history feed
//! behind them is eventually consistent. Instead of a fixed post-mutation
//! delay, [`WalletService::wait_for_transaction`] re-fetches the history
//! with bounded exponential backoff until the transaction reaches a
//! terminal status or the attempts are exhausted.

use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, instrument};

use crate::domain::{ActionResult, Transaction};

use super::service::WalletService;

/// Backoff schedule for settlement polling
#[derive(Debug, Clone)]
pub struct SettlementConfig {
    /// Number of history fetches before giving up
    pub max_attempts: u32,
    /// Delay before the second fetch; doubles each round
    pub initial_delay: Duration,
    /// Ceiling for the per-round delay
    pub max_delay: Duration,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            max_attempts: 6,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
        }
    }
}

impl WalletService {
    /// Poll the history until `transaction_id` reports a terminal status.
    ///
    /// `shutdown` cancels the wait when flipped to `true`, so a caller
    /// abandoning the flow (navigation, teardown) does not leave a poller
    /// running against a stale view. Transient fetch errors are retried;
    /// a 401 aborts immediately with the session cleared.
    #[instrument(skip(self, config, shutdown))]
    pub async fn wait_for_transaction(
        &self,
        transaction_id: &str,
        config: &SettlementConfig,
        mut shutdown: Option<watch::Receiver<bool>>,
    ) -> ActionResult<Transaction> {
        if is_cancelled(shutdown.as_ref()) {
            return ActionResult::failure("Operação cancelada");
        }

        let mut delay = config.initial_delay;

        for attempt in 1..=config.max_attempts {
            match self.api().history(self.token().as_ref()).await {
                Ok(transactions) => {
                    let found = transactions
                        .into_iter()
                        .find(|tx| tx.id == transaction_id && tx.status.is_terminal());
                    if let Some(tx) = found {
                        debug!(attempt, status = %tx.status, "Transaction settled");
                        return ActionResult::ok(tx);
                    }
                    debug!(attempt, "Transaction not settled yet");
                }
                Err(err) if err.is_unauthorized() => {
                    return self.fail_from(err, "Não autorizado");
                }
                Err(err) => {
                    debug!(attempt, error = %err, "History fetch failed, retrying");
                }
            }

            if attempt < config.max_attempts {
                if !sleep_or_cancel(delay, shutdown.as_mut()).await {
                    return ActionResult::failure("Operação cancelada");
                }
                delay = (delay * 2).min(config.max_delay);
            }
        }

        ActionResult::failure("Tempo esgotado aguardando confirmação da transação")
    }
}

fn is_cancelled(shutdown: Option<&watch::Receiver<bool>>) -> bool {
    shutdown.is_some_and(|rx| *rx.borrow())
}

/// Sleep for `delay`, waking early on cancellation. Returns `false` when
/// cancelled.
async fn sleep_or_cancel(delay: Duration, shutdown: Option<&mut watch::Receiver<bool>>) -> bool {
    let Some(rx) = shutdown else {
        tokio::time::sleep(delay).await;
        return true;
    };

    let sleep = tokio::time::sleep(delay);
    tokio::pin!(sleep);

    loop {
        tokio::select! {
            _ = &mut sleep => return true,
            changed = rx.changed() => {
                match changed {
                    Ok(()) if *rx.borrow() => return false,
                    // Spurious wake or sender gone: keep sleeping
                    Ok(()) => {}
                    Err(_) => {
                        sleep.await;
                        return true;
                    }
                }
            }
        }
    }
}
