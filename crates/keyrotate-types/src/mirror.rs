//! Records served by the mirror node's REST API.

use serde::{Deserialize, Serialize};

use crate::entity::AccountId;
use crate::error::{RotationError, RotationResult};
use crate::key::Key;

/// Durable record of a processed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInfo {
    pub transaction_id: String,
    pub consensus_timestamp: String,
    /// Transaction type, e.g. `CRYPTOUPDATEACCOUNT`
    #[serde(default)]
    pub name: String,
    /// Final status, e.g. `SUCCESS` or `INVALID_SIGNATURE`
    pub result: String,
    #[serde(default)]
    pub node: Option<String>,
    #[serde(default)]
    pub entity_id: Option<String>,
    #[serde(default)]
    pub charged_tx_fee: u64,
    #[serde(default)]
    pub max_fee: Option<String>,
    #[serde(default)]
    pub memo_base64: Option<String>,
    #[serde(default)]
    pub transaction_hash: Option<String>,
    #[serde(default)]
    pub valid_start_timestamp: Option<String>,
    #[serde(default)]
    pub valid_duration_seconds: Option<String>,
    #[serde(default)]
    pub scheduled: bool,
}

impl TransactionInfo {
    pub fn is_success(&self) -> bool {
        self.result == "SUCCESS"
    }
}

/// Envelope of `GET /api/v1/transactions/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MirrorTransactions {
    #[serde(default)]
    pub transactions: Vec<TransactionInfo>,
}

/// Key as rendered by the mirror: a hex string plus a type tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorKey {
    #[serde(rename = "_type")]
    pub key_type: String,
    pub key: String,
}

impl MirrorKey {
    /// Decodes the mirror rendering. Complex keys (lists, thresholds) arrive as
    /// `ProtobufEncoded` hex of the wire `Key`.
    pub fn to_key(&self) -> RotationResult<Key> {
        let bytes = hex::decode(self.key.trim())
            .map_err(|e| RotationError::InvalidKey(format!("key is not hex: {e}")))?;
        match self.key_type.as_str() {
            "ED25519" => Ok(Key::ed25519(bytes)),
            "ECDSA_SECP256K1" => Ok(Key::ecdsa_secp256k1(bytes)),
            "ProtobufEncoded" => Key::from_protobuf_bytes(&bytes),
            other => Err(RotationError::InvalidKey(format!(
                "unsupported mirror key type {other}"
            ))),
        }
    }
}

/// Subset of `GET /api/v1/accounts/{id}` needed to resolve authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorAccount {
    pub account: String,
    #[serde(default)]
    pub key: Option<MirrorKey>,
    #[serde(default)]
    pub deleted: bool,
}

/// An account together with the key structure currently authorizing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInfo {
    pub account_id: AccountId,
    pub endorsements: Key,
}

impl TryFrom<&MirrorAccount> for AccountInfo {
    type Error = RotationError;

    fn try_from(record: &MirrorAccount) -> RotationResult<Self> {
        let account_id: AccountId = record.account.parse()?;
        let key = record.key.as_ref().ok_or_else(|| {
            RotationError::InvalidKey(format!("account {account_id} has no key"))
        })?;
        Ok(Self {
            account_id,
            endorsements: key.to_key()?,
        })
    }
}
