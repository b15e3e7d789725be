//! End-to-end key rotation: build, check, submit, receipt, mirror.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use keyrotate_types::{
    AccountInfo, Key, RotationError, RotationResult, SignaturePair, TransactionId,
    TransactionInfo, TransactionReceipt,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::account::lookup_account_info;
use crate::builder::{
    create_key_rotation_transaction, decode_key_update, PreparedTransaction, RotationParams,
};
use crate::client::{MirrorClient, PrimaryClient};
use crate::clock::{CancellationToken, Clock, SystemClock};
use crate::config::{ClientConfig, NetworkConfig};
use crate::confirm::{MirrorConfirmer, MIRROR_MAX_ATTEMPTS, MIRROR_POLL_INTERVAL};
use crate::receipt::{ReceiptWaiter, RECEIPT_MARGIN_SECONDS};
use crate::signature_match::has_signature_match;
use crate::submit::submit_transaction;

/// Timing policy for the waits after submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationSettings {
    pub receipt_margin: Duration,
    pub mirror_max_attempts: u32,
    pub mirror_interval: Duration,
}

impl Default for RotationSettings {
    fn default() -> Self {
        Self {
            receipt_margin: Duration::from_secs(RECEIPT_MARGIN_SECONDS),
            mirror_max_attempts: MIRROR_MAX_ATTEMPTS,
            mirror_interval: MIRROR_POLL_INTERVAL,
        }
    }
}

impl From<&ClientConfig> for RotationSettings {
    fn from(config: &ClientConfig) -> Self {
        Self {
            receipt_margin: Duration::from_secs(config.receipt.margin_seconds),
            mirror_max_attempts: config.mirror.max_attempts,
            mirror_interval: Duration::from_secs(config.mirror.interval_seconds),
        }
    }
}

/// Everything learned about a rotation once it is durably recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct RotationOutcome {
    pub transaction_id: TransactionId,
    pub receipt: TransactionReceipt,
    pub transaction_info: TransactionInfo,
}

/// Drives rotations against one network.
///
/// Holds no per-rotation state: each call works on the transaction id and
/// bytes it is given, so independent rotations can share one instance.
pub struct KeyRotator {
    config: Arc<NetworkConfig>,
    primary: Arc<dyn PrimaryClient>,
    mirror: Arc<dyn MirrorClient>,
    clock: Arc<dyn Clock>,
    rng: Mutex<StdRng>,
    settings: RotationSettings,
}

impl KeyRotator {
    pub fn new(
        config: Arc<NetworkConfig>,
        primary: Arc<dyn PrimaryClient>,
        mirror: Arc<dyn MirrorClient>,
    ) -> Self {
        Self {
            config,
            primary,
            mirror,
            clock: Arc::new(SystemClock),
            rng: Mutex::new(StdRng::from_entropy()),
            settings: RotationSettings::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    pub fn with_settings(mut self, settings: RotationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub async fn lookup_account(&self, account: &str) -> RotationResult<AccountInfo> {
        lookup_account_info(self.mirror.as_ref(), account).await
    }

    /// Builds the unsigned transaction for `params` through a random node.
    pub fn prepare(&self, params: &RotationParams) -> RotationResult<PreparedTransaction> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        create_key_rotation_transaction(params, &self.config.nodes, self.clock.as_ref(), &mut *rng)
    }

    /// Confirms the collected signatures satisfy both the endorsement being
    /// replaced and the one replacing it.
    pub fn check_authorization(
        &self,
        current: &Key,
        new_endorsement: &Key,
        signatures: &[SignaturePair],
    ) -> RotationResult<()> {
        if !has_signature_match(current, signatures) {
            return Err(RotationError::Unauthorized(
                "signatures do not satisfy the current endorsement".to_string(),
            ));
        }
        if !has_signature_match(new_endorsement, signatures) {
            return Err(RotationError::Unauthorized(
                "signatures do not satisfy the new endorsement".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn submit(
        &self,
        body_bytes: &[u8],
        signatures: &[SignaturePair],
    ) -> RotationResult<TransactionId> {
        submit_transaction(self.primary.as_ref(), body_bytes, signatures).await
    }

    pub async fn await_receipt(
        &self,
        transaction_id: &TransactionId,
        cancel: &CancellationToken,
    ) -> RotationResult<TransactionReceipt> {
        ReceiptWaiter::new(self.primary.clone(), self.clock.clone())
            .with_margin(self.settings.receipt_margin)
            .await_receipt(transaction_id, cancel)
            .await
    }

    pub async fn await_mirror_info(
        &self,
        transaction_id: &TransactionId,
        cancel: &CancellationToken,
    ) -> RotationResult<TransactionInfo> {
        MirrorConfirmer::new(self.mirror.clone(), self.clock.clone())
            .with_policy(self.settings.mirror_max_attempts, self.settings.mirror_interval)
            .await_mirror_info(transaction_id, cancel)
            .await
    }

    /// Submits signed bytes and follows them to a mirror record.
    ///
    /// The body must update `params.account_id` to `params.new_endorsement`.
    /// When `current` is given the signatures are checked against it and the
    /// key the body installs before anything is sent.
    pub async fn complete(
        &self,
        params: &RotationParams,
        current: Option<&Key>,
        body_bytes: &[u8],
        signatures: &[SignaturePair],
        cancel: &CancellationToken,
    ) -> RotationResult<RotationOutcome> {
        let update = decode_key_update(body_bytes)?;
        if update.account_id != params.account_id {
            return Err(RotationError::InvalidTransaction(format!(
                "body updates account {}, not {}",
                update.account_id, params.account_id
            )));
        }
        if update.new_endorsement != params.new_endorsement {
            return Err(RotationError::InvalidTransaction(format!(
                "body installs a different key than the one given for {}",
                params.account_id
            )));
        }
        if let Some(current) = current {
            self.check_authorization(current, &update.new_endorsement, signatures)?;
        }

        let transaction_id = self.submit(body_bytes, signatures).await?;
        if transaction_id.account_id != params.account_id {
            warn!(
                "Submitted {} is paid by {}, not the rotated account {}",
                transaction_id, transaction_id.account_id, params.account_id
            );
        }

        let receipt = self.await_receipt(&transaction_id, cancel).await?;
        if !receipt.is_success() {
            warn!(
                "Receipt for {} reports status {}",
                transaction_id, receipt.status
            );
        }
        let transaction_info = self.await_mirror_info(&transaction_id, cancel).await?;

        info!(
            "Rotation {} recorded: {}",
            transaction_id,
            self.config.transaction_url(&transaction_id)
        );
        Ok(RotationOutcome {
            transaction_id,
            receipt,
            transaction_info,
        })
    }
}
