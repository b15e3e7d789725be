//! Protobuf messages for the subset of the ledger API used by a key rotation.
//!
//! Field numbers and scalar types follow the ledger's published schema so the
//! encodings produced here are byte-identical to those of any other client.
//! Unknown fields in decoded messages (for example the many receipt fields we
//! never read) are skipped by `prost`.

/// Ledger account identifier.
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct AccountId {
    #[prost(int64, tag = "1")]
    pub shard_num: i64,
    #[prost(int64, tag = "2")]
    pub realm_num: i64,
    #[prost(oneof = "account_id::Account", tags = "3, 4")]
    pub account: ::core::option::Option<account_id::Account>,
}

pub mod account_id {
    #[derive(Clone, PartialEq, Eq, Hash, ::prost::Oneof)]
    pub enum Account {
        #[prost(int64, tag = "3")]
        AccountNum(i64),
        #[prost(bytes = "vec", tag = "4")]
        Alias(::prost::alloc::vec::Vec<u8>),
    }
}

/// Smart contract identifier, only ever seen here as part of a `Key`.
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct ContractId {
    #[prost(int64, tag = "1")]
    pub shard_num: i64,
    #[prost(int64, tag = "2")]
    pub realm_num: i64,
    #[prost(oneof = "contract_id::Contract", tags = "3, 4")]
    pub contract: ::core::option::Option<contract_id::Contract>,
}

pub mod contract_id {
    #[derive(Clone, PartialEq, Eq, Hash, ::prost::Oneof)]
    pub enum Contract {
        #[prost(int64, tag = "3")]
        ContractNum(i64),
        #[prost(bytes = "vec", tag = "4")]
        EvmAddress(::prost::alloc::vec::Vec<u8>),
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, ::prost::Message)]
pub struct Timestamp {
    #[prost(int64, tag = "1")]
    pub seconds: i64,
    #[prost(int32, tag = "2")]
    pub nanos: i32,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, ::prost::Message)]
pub struct Duration {
    #[prost(int64, tag = "1")]
    pub seconds: i64,
}

#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct TransactionId {
    #[prost(message, optional, tag = "1")]
    pub transaction_valid_start: ::core::option::Option<Timestamp>,
    #[prost(message, optional, tag = "2")]
    pub account_id: ::core::option::Option<AccountId>,
    #[prost(bool, tag = "3")]
    pub scheduled: bool,
    #[prost(int32, tag = "4")]
    pub nonce: i32,
}

/// A key, or a tree of keys, authorizing an entity.
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct Key {
    #[prost(oneof = "key::Key", tags = "1, 2, 3, 4, 5, 6, 7, 8")]
    pub key: ::core::option::Option<key::Key>,
}

pub mod key {
    #[derive(Clone, PartialEq, Eq, Hash, ::prost::Oneof)]
    pub enum Key {
        #[prost(message, tag = "1")]
        ContractId(super::ContractId),
        #[prost(bytes = "vec", tag = "2")]
        Ed25519(::prost::alloc::vec::Vec<u8>),
        #[prost(bytes = "vec", tag = "3")]
        Rsa3072(::prost::alloc::vec::Vec<u8>),
        #[prost(bytes = "vec", tag = "4")]
        Ecdsa384(::prost::alloc::vec::Vec<u8>),
        #[prost(message, tag = "5")]
        ThresholdKey(super::ThresholdKey),
        #[prost(message, tag = "6")]
        KeyList(super::KeyList),
        #[prost(bytes = "vec", tag = "7")]
        EcdsaSecp256k1(::prost::alloc::vec::Vec<u8>),
        #[prost(message, tag = "8")]
        DelegatableContractId(super::ContractId),
    }
}

#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct ThresholdKey {
    #[prost(uint32, tag = "1")]
    pub threshold: u32,
    #[prost(message, optional, tag = "2")]
    pub keys: ::core::option::Option<KeyList>,
}

#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct KeyList {
    #[prost(message, repeated, tag = "1")]
    pub keys: ::prost::alloc::vec::Vec<Key>,
}

#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct SignaturePair {
    #[prost(bytes = "vec", tag = "1")]
    pub pub_key_prefix: ::prost::alloc::vec::Vec<u8>,
    #[prost(oneof = "signature_pair::Signature", tags = "2, 3, 4, 5, 6")]
    pub signature: ::core::option::Option<signature_pair::Signature>,
}

pub mod signature_pair {
    #[derive(Clone, PartialEq, Eq, Hash, ::prost::Oneof)]
    pub enum Signature {
        #[prost(bytes = "vec", tag = "2")]
        Contract(::prost::alloc::vec::Vec<u8>),
        #[prost(bytes = "vec", tag = "3")]
        Ed25519(::prost::alloc::vec::Vec<u8>),
        #[prost(bytes = "vec", tag = "4")]
        Rsa3072(::prost::alloc::vec::Vec<u8>),
        #[prost(bytes = "vec", tag = "5")]
        Ecdsa384(::prost::alloc::vec::Vec<u8>),
        #[prost(bytes = "vec", tag = "6")]
        EcdsaSecp256k1(::prost::alloc::vec::Vec<u8>),
    }
}

#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct SignatureMap {
    #[prost(message, repeated, tag = "1")]
    pub sig_pair: ::prost::alloc::vec::Vec<SignaturePair>,
}

/// Envelope delivered to the network: the exact body bytes that were signed
/// plus the collected signatures.
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct SignedTransaction {
    #[prost(bytes = "vec", tag = "1")]
    pub body_bytes: ::prost::alloc::vec::Vec<u8>,
    #[prost(message, optional, tag = "2")]
    pub sig_map: ::core::option::Option<SignatureMap>,
}

#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct CryptoUpdateTransactionBody {
    #[prost(message, optional, tag = "2")]
    pub account_id_to_update: ::core::option::Option<AccountId>,
    #[prost(message, optional, tag = "3")]
    pub key: ::core::option::Option<Key>,
}

#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct TransactionBody {
    #[prost(message, optional, tag = "1")]
    pub transaction_id: ::core::option::Option<TransactionId>,
    #[prost(message, optional, tag = "2")]
    pub node_account_id: ::core::option::Option<AccountId>,
    #[prost(uint64, tag = "3")]
    pub transaction_fee: u64,
    #[prost(message, optional, tag = "4")]
    pub transaction_valid_duration: ::core::option::Option<Duration>,
    #[prost(bool, tag = "5")]
    pub generate_record: bool,
    #[prost(string, tag = "6")]
    pub memo: ::prost::alloc::string::String,
    #[prost(oneof = "transaction_body::Data", tags = "15")]
    pub data: ::core::option::Option<transaction_body::Data>,
}

pub mod transaction_body {
    #[derive(Clone, PartialEq, Eq, Hash, ::prost::Oneof)]
    pub enum Data {
        #[prost(message, tag = "15")]
        CryptoUpdateAccount(super::CryptoUpdateTransactionBody),
    }
}

/// Outcome reported by the primary network for a submitted transaction.
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct TransactionReceipt {
    #[prost(enumeration = "ResponseCode", tag = "1")]
    pub status: i32,
    #[prost(message, optional, tag = "2")]
    pub account_id: ::core::option::Option<AccountId>,
}

impl TransactionReceipt {
    /// Whether the network reached consensus and applied the transaction.
    pub fn is_success(&self) -> bool {
        self.status == ResponseCode::Success as i32
    }
}

/// Leading entries of the ledger's response code enumeration.
///
/// Codes outside this range still decode; the raw value stays available in
/// `TransactionReceipt::status`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum ResponseCode {
    Ok = 0,
    InvalidTransaction = 1,
    PayerAccountNotFound = 2,
    InvalidNodeAccount = 3,
    TransactionExpired = 4,
    InvalidTransactionStart = 5,
    InvalidTransactionDuration = 6,
    InvalidSignature = 7,
    MemoTooLong = 8,
    InsufficientTxFee = 9,
    InsufficientPayerBalance = 10,
    DuplicateTransaction = 11,
    Busy = 12,
    NotSupported = 13,
    InvalidFileId = 14,
    InvalidAccountId = 15,
    InvalidContractId = 16,
    InvalidTransactionId = 17,
    ReceiptNotFound = 18,
    RecordNotFound = 19,
    InvalidSolidityId = 20,
    Unknown = 21,
    Success = 22,
    FailInvalid = 23,
    FailFee = 24,
    FailBalance = 25,
    KeyRequired = 26,
    BadEncoding = 27,
}
