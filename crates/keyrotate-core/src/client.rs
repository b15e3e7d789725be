//! Network collaborators the rotation workflow talks to.
//!
//! Implementations live in `keyrotate-sync`; tests substitute in-memory fakes.

use async_trait::async_trait;
use keyrotate_types::{
    AccountId, ClientError, MirrorAccount, NetworkInfo, TransactionId, TransactionInfo,
    TransactionReceipt,
};

/// The primary network entry point: accepts signed transactions and reports
/// their immediate outcome.
#[async_trait]
pub trait PrimaryClient: Send + Sync {
    /// Delivers an encoded `SignedTransaction`. Called at most once per
    /// transaction id.
    async fn submit_transaction(&self, signed_transaction: &[u8]) -> Result<(), ClientError>;

    async fn get_transaction_receipt(
        &self,
        transaction_id: &TransactionId,
    ) -> Result<TransactionReceipt, ClientError>;
}

/// The eventually consistent mirror index.
#[async_trait]
pub trait MirrorClient: Send + Sync {
    /// Fails with [`ClientError::NotFound`] until the transaction is indexed.
    async fn get_transaction(
        &self,
        transaction_id: &TransactionId,
    ) -> Result<TransactionInfo, ClientError>;

    /// `Ok(None)` when the mirror has no record of the account.
    async fn get_account_info(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<MirrorAccount>, ClientError>;
}

/// Source of the network description used to bootstrap configuration.
#[async_trait]
pub trait NetworkInfoSource: Send + Sync {
    async fn get_info(&self) -> Result<NetworkInfo, ClientError>;
}
