use std::sync::Arc;
use std::time::Duration;

use keyrotate_types::{RotationResult, TransactionId, TransactionReceipt};
use tracing::{debug, info};

use crate::client::PrimaryClient;
use crate::clock::{sleep_or_cancel, CancellationToken, Clock};

/// Seconds past the valid start before the network is asked for a receipt.
pub const RECEIPT_MARGIN_SECONDS: u64 = 5;

/// Waits out a transaction's valid start, then fetches its receipt once.
pub struct ReceiptWaiter {
    client: Arc<dyn PrimaryClient>,
    clock: Arc<dyn Clock>,
    margin: Duration,
}

impl ReceiptWaiter {
    pub fn new(client: Arc<dyn PrimaryClient>, clock: Arc<dyn Clock>) -> Self {
        Self {
            client,
            clock,
            margin: Duration::from_secs(RECEIPT_MARGIN_SECONDS),
        }
    }

    pub fn with_margin(mut self, margin: Duration) -> Self {
        self.margin = margin;
        self
    }

    /// Time still to wait before querying; zero once the window has passed.
    pub fn receipt_delay(&self, transaction_id: &TransactionId) -> Duration {
        let start_millis = transaction_id.valid_start.as_unix_millis();
        let margin_millis = i64::try_from(self.margin.as_millis()).unwrap_or(i64::MAX);
        let delay = start_millis
            .saturating_sub(self.clock.now_millis())
            .saturating_add(margin_millis);
        if delay > 0 {
            Duration::from_millis(delay as u64)
        } else {
            Duration::ZERO
        }
    }

    /// A missing receipt is reported as-is; this never polls.
    pub async fn await_receipt(
        &self,
        transaction_id: &TransactionId,
        cancel: &CancellationToken,
    ) -> RotationResult<TransactionReceipt> {
        let delay = self.receipt_delay(transaction_id);
        if !delay.is_zero() {
            debug!("Waiting {:?} before asking for the receipt of {}", delay, transaction_id);
            sleep_or_cancel(self.clock.as_ref(), delay, cancel, "waiting for the receipt").await?;
        }

        let receipt = self.client.get_transaction_receipt(transaction_id).await?;
        info!("Receipt for {}: status {}", transaction_id, receipt.status);
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{cancellation_pair, ManualClock};
    use crate::testing::FakePrimary;
    use keyrotate_types::{AccountId, ClientError, ResponseCode, RotationError, Timestamp};

    const NOW: u64 = 1_700_000_000_000;

    fn id_starting_at(millis: i64) -> TransactionId {
        TransactionId::new(AccountId::new(0, 0, 9), Timestamp::from_unix_millis(millis))
    }

    fn waiter(primary: &Arc<FakePrimary>, clock: &ManualClock) -> ReceiptWaiter {
        ReceiptWaiter::new(primary.clone(), Arc::new(clock.clone()))
    }

    #[tokio::test]
    async fn immediate_start_waits_for_the_margin() {
        let primary = Arc::new(FakePrimary::default());
        let clock = ManualClock::at_unix_millis(NOW);
        let id = id_starting_at(NOW as i64);

        let receipt = waiter(&primary, &clock)
            .await_receipt(&id, &CancellationToken::never())
            .await
            .unwrap();

        assert!(receipt.is_success());
        assert_eq!(clock.sleeps(), vec![Duration::from_secs(5)]);
        assert_eq!(primary.receipt_queries(), vec![id]);
    }

    #[tokio::test]
    async fn delayed_start_waits_past_valid_start() {
        let primary = Arc::new(FakePrimary::default());
        let clock = ManualClock::at_unix_millis(NOW);
        let id = id_starting_at(NOW as i64 + 30_000);

        waiter(&primary, &clock)
            .await_receipt(&id, &CancellationToken::never())
            .await
            .unwrap();
        assert_eq!(clock.total_slept(), Duration::from_secs(35));
    }

    #[tokio::test]
    async fn past_window_queries_without_sleeping() {
        let primary = Arc::new(FakePrimary::default());
        let clock = ManualClock::at_unix_millis(NOW);
        let id = id_starting_at(NOW as i64 - 60_000);

        waiter(&primary, &clock)
            .await_receipt(&id, &CancellationToken::never())
            .await
            .unwrap();
        assert!(clock.sleeps().is_empty());
        assert_eq!(primary.receipt_queries().len(), 1);
    }

    #[tokio::test]
    async fn failure_status_and_errors_surface_unchanged() {
        let primary = Arc::new(FakePrimary::default());
        let clock = ManualClock::at_unix_millis(NOW);
        let id = id_starting_at(NOW as i64);
        primary.set_receipt(Ok(TransactionReceipt {
            status: ResponseCode::InvalidSignature as i32,
            account_id: None,
        }));
        let receipt = waiter(&primary, &clock)
            .await_receipt(&id, &CancellationToken::never())
            .await
            .unwrap();
        assert!(!receipt.is_success());

        primary.set_receipt(Err(ClientError::not_found("no receipt")));
        let err = waiter(&primary, &clock)
            .await_receipt(&id, &CancellationToken::never())
            .await
            .unwrap_err();
        assert!(matches!(err, RotationError::Transport(e) if e.is_not_found()));
        assert_eq!(primary.receipt_queries().len(), 2);
    }

    #[test]
    fn far_future_start_does_not_overflow() {
        let primary = Arc::new(FakePrimary::default());
        let clock = ManualClock::at_unix_millis(NOW);
        let id = TransactionId::new(AccountId::new(0, 0, 9), Timestamp::new(i64::MAX / 10, 0));

        let delay = waiter(&primary, &clock).receipt_delay(&id);
        assert!(delay > Duration::from_secs(1_000_000_000));
    }

    #[tokio::test]
    async fn cancelled_before_query() {
        let primary = Arc::new(FakePrimary::default());
        let clock = ManualClock::at_unix_millis(NOW);
        let (handle, token) = cancellation_pair();
        handle.cancel();

        let err = waiter(&primary, &clock)
            .await_receipt(&id_starting_at(NOW as i64), &token)
            .await
            .unwrap_err();
        assert!(matches!(err, RotationError::Cancelled(_)));
        assert!(primary.receipt_queries().is_empty());
    }
}
