//! Shared types for ledger key rotation: the protobuf wire schema, account and
//! transaction identifiers, authority trees, collected signatures, mirror
//! records and the error taxonomy used across the workspace.

pub mod entity;
pub mod error;
pub mod key;
pub mod mirror;
pub mod network;
pub mod proto;
pub mod signature;

pub use entity::{is_entity_id, AccountId, Timestamp, TransactionId};
pub use error::{ClientError, RotationError, RotationResult};
pub use key::{ContractKey, Key, KeyAlgorithm};
pub use mirror::{AccountInfo, MirrorAccount, MirrorKey, MirrorTransactions, TransactionInfo};
pub use network::{ChannelInfo, NetworkInfo};
pub use proto::{ResponseCode, TransactionReceipt};
pub use signature::{pairs_from_signature_map_bytes, signature_map, Signature, SignaturePair};
