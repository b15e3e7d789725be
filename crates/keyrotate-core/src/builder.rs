//! Construction of the key-update transaction body that signers sign.

use keyrotate_types::proto::{self, transaction_body};
use keyrotate_types::{
    AccountId, ChannelInfo, Key, RotationError, RotationResult, Timestamp, TransactionId,
};
use prost::Message;
use rand::Rng;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::config::select_random_gossip_node;

/// Fee offered for every rotation, in tinybars.
pub const TRANSACTION_FEE_TINYBARS: u64 = 500_000_000;

pub const TRANSACTION_VALID_DURATION_SECONDS: i64 = 180;

/// What the account holder asked for. Immutable once a build starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationParams {
    pub account_id: AccountId,
    pub new_endorsement: Key,
    /// Seconds from now until the transaction becomes valid. Zero submits
    /// immediately; negative values are passed through unchecked.
    pub start_delay_seconds: i64,
}

/// A built, unsigned transaction. `body_bytes` are exactly what gets signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedTransaction {
    pub transaction_id: TransactionId,
    pub node_account_id: AccountId,
    pub body_bytes: Vec<u8>,
}

/// `now + delay_seconds` at millisecond resolution.
pub fn create_timestamp_from_now(clock: &dyn Clock, delay_seconds: i64) -> Timestamp {
    let millis = clock
        .now_millis()
        .saturating_add(delay_seconds.saturating_mul(1_000));
    Timestamp::from_unix_millis(millis)
}

pub fn create_key_rotation_transaction<R: Rng>(
    params: &RotationParams,
    nodes: &[ChannelInfo],
    clock: &dyn Clock,
    rng: &mut R,
) -> RotationResult<PreparedTransaction> {
    let node_account_id = select_random_gossip_node(nodes, rng)?;
    let valid_start = create_timestamp_from_now(clock, params.start_delay_seconds);
    let transaction_id = TransactionId::new(params.account_id, valid_start);

    let body = proto::TransactionBody {
        transaction_id: Some(transaction_id.to_proto()),
        node_account_id: Some(node_account_id.to_proto()),
        transaction_fee: TRANSACTION_FEE_TINYBARS,
        transaction_valid_duration: Some(proto::Duration {
            seconds: TRANSACTION_VALID_DURATION_SECONDS,
        }),
        generate_record: false,
        memo: String::new(),
        data: Some(transaction_body::Data::CryptoUpdateAccount(
            proto::CryptoUpdateTransactionBody {
                account_id_to_update: Some(params.account_id.to_proto()),
                key: Some(params.new_endorsement.to_proto()),
            },
        )),
    };
    let body_bytes = body.encode_to_vec();

    info!(
        "Built key rotation {} for account {} via node {}",
        transaction_id, params.account_id, node_account_id
    );
    debug!("Transaction body is {} bytes", body_bytes.len());

    Ok(PreparedTransaction {
        transaction_id,
        node_account_id,
        body_bytes,
    })
}

/// The account update a body actually carries, as opposed to what the caller
/// believes it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyUpdate {
    pub account_id: AccountId,
    pub new_endorsement: Key,
}

fn decode_body(body_bytes: &[u8]) -> RotationResult<proto::TransactionBody> {
    proto::TransactionBody::decode(body_bytes)
        .map_err(|e| RotationError::InvalidTransaction(format!("body bytes do not decode: {e}")))
}

/// Recovers the transaction id carried by encoded body bytes.
pub fn decode_transaction_id(body_bytes: &[u8]) -> RotationResult<TransactionId> {
    let body = decode_body(body_bytes)?;
    let id = body.transaction_id.as_ref().ok_or_else(|| {
        RotationError::InvalidTransaction("body carries no transaction id".to_string())
    })?;
    TransactionId::from_proto(id)
}

/// Recovers the account and key a body installs. Bodies that are not an
/// account update are rejected.
pub fn decode_key_update(body_bytes: &[u8]) -> RotationResult<KeyUpdate> {
    let body = decode_body(body_bytes)?;
    let update = match body.data {
        Some(transaction_body::Data::CryptoUpdateAccount(update)) => update,
        None => {
            return Err(RotationError::InvalidTransaction(
                "body carries no account update".to_string(),
            ))
        }
    };
    let account = update.account_id_to_update.as_ref().ok_or_else(|| {
        RotationError::InvalidTransaction("account update names no account".to_string())
    })?;
    let key = update.key.as_ref().ok_or_else(|| {
        RotationError::InvalidTransaction("account update installs no key".to_string())
    })?;
    let account_id = AccountId::from_proto(account)
        .map_err(|e| RotationError::InvalidTransaction(e.to_string()))?;
    Ok(KeyUpdate {
        account_id,
        new_endorsement: Key::from_proto(key)?,
    })
}
