pub mod account;
pub mod builder;
pub mod client;
pub mod clock;
pub mod config;
pub mod confirm;
pub mod receipt;
pub mod rotation;
pub mod signature_match;
pub mod submit;

#[cfg(test)]
pub(crate) mod testing;

pub use account::lookup_account_info;
pub use builder::{
    create_key_rotation_transaction, create_timestamp_from_now, decode_key_update,
    decode_transaction_id, KeyUpdate, PreparedTransaction, RotationParams, TRANSACTION_FEE_TINYBARS,
    TRANSACTION_VALID_DURATION_SECONDS,
};
pub use client::{MirrorClient, NetworkInfoSource, PrimaryClient};
pub use clock::{cancellation_pair, CancelHandle, CancellationToken, Clock, ManualClock, SystemClock};
pub use config::{
    guess_network, load_network_config, ClientConfig, ConfigGate, KnownNetwork, NetworkConfig,
};
pub use confirm::{MirrorConfirmer, MIRROR_MAX_ATTEMPTS, MIRROR_POLL_INTERVAL};
pub use receipt::{ReceiptWaiter, RECEIPT_MARGIN_SECONDS};
pub use rotation::{KeyRotator, RotationOutcome, RotationSettings};
pub use signature_match::has_signature_match;
pub use submit::submit_transaction;
