//! Polls the mirror until a submitted transaction is durably indexed.

use std::sync::Arc;
use std::time::Duration;

use keyrotate_types::{ClientError, RotationError, RotationResult, TransactionId, TransactionInfo};
use tracing::{debug, info, warn};

use crate::client::MirrorClient;
use crate::clock::{sleep_or_cancel, CancellationToken, Clock};

pub const MIRROR_MAX_ATTEMPTS: u32 = 60;
pub const MIRROR_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug)]
enum ConfirmationState {
    Polling { attempts_left: u32 },
    Found(TransactionInfo),
    NotFoundExhausted,
    Failed(ClientError),
}

pub struct MirrorConfirmer {
    client: Arc<dyn MirrorClient>,
    clock: Arc<dyn Clock>,
    max_attempts: u32,
    interval: Duration,
}

impl MirrorConfirmer {
    pub fn new(client: Arc<dyn MirrorClient>, clock: Arc<dyn Clock>) -> Self {
        Self {
            client,
            clock,
            max_attempts: MIRROR_MAX_ATTEMPTS,
            interval: MIRROR_POLL_INTERVAL,
        }
    }

    pub fn with_policy(mut self, max_attempts: u32, interval: Duration) -> Self {
        self.max_attempts = max_attempts;
        self.interval = interval;
        self
    }

    /// Only a 404 is retried. Any other failure ends polling on the spot, and
    /// running out of attempts yields [`RotationError::MirrorNotFoundTimeout`].
    pub async fn await_mirror_info(
        &self,
        transaction_id: &TransactionId,
        cancel: &CancellationToken,
    ) -> RotationResult<TransactionInfo> {
        let mut state = ConfirmationState::Polling {
            attempts_left: self.max_attempts,
        };

        loop {
            state = match state {
                ConfirmationState::Polling { attempts_left: 0 } => {
                    ConfirmationState::NotFoundExhausted
                }
                ConfirmationState::Polling { attempts_left } => {
                    if cancel.is_cancelled() {
                        return Err(RotationError::Cancelled(
                            "polling the mirror".to_string(),
                        ));
                    }
                    let attempt = self.max_attempts - attempts_left + 1;
                    debug!(
                        "Mirror lookup {}/{} for {}",
                        attempt, self.max_attempts, transaction_id
                    );
                    match self.client.get_transaction(transaction_id).await {
                        Ok(info) => ConfirmationState::Found(info),
                        Err(e) if e.is_not_found() => {
                            let remaining = attempts_left - 1;
                            if remaining > 0 {
                                sleep_or_cancel(
                                    self.clock.as_ref(),
                                    self.interval,
                                    cancel,
                                    "polling the mirror",
                                )
                                .await?;
                            }
                            ConfirmationState::Polling {
                                attempts_left: remaining,
                            }
                        }
                        Err(e) => ConfirmationState::Failed(e),
                    }
                }
                ConfirmationState::Found(info) => {
                    info!(
                        "Mirror confirmed {} with result {}",
                        transaction_id, info.result
                    );
                    return Ok(info);
                }
                ConfirmationState::NotFoundExhausted => {
                    warn!(
                        "{} not on the mirror after {} attempts",
                        transaction_id, self.max_attempts
                    );
                    return Err(RotationError::MirrorNotFoundTimeout {
                        transaction_id: transaction_id.to_string(),
                        attempts: self.max_attempts,
                    });
                }
                ConfirmationState::Failed(e) => {
                    warn!("Mirror lookup for {} failed: {}", transaction_id, e);
                    return Err(e.into());
                }
            };
        }
    }
}
