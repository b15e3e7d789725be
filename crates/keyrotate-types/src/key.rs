//! Authority trees.
//!
//! A [`Key`] is the structure that authorizes an account: a single public key,
//! a list of keys that must all sign, or a threshold over child keys. Trees are
//! received from the network and never self-referential.

use prost::Message;
use serde::{Deserialize, Serialize};

use crate::error::{RotationError, RotationResult};
use crate::proto;

/// Public key algorithms a leaf key can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KeyAlgorithm {
    Ed25519,
    EcdsaSecp256k1,
    Rsa3072,
    Ecdsa384,
}

/// A contract standing in as a key. Contracts authorize through execution,
/// never through a collected signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContractKey {
    pub delegatable: bool,
    pub contract_id: proto::ContractId,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Leaf {
        algorithm: KeyAlgorithm,
        public_key: Vec<u8>,
    },
    KeyList(Vec<Key>),
    Threshold {
        threshold: u32,
        keys: Vec<Key>,
    },
    Contract(ContractKey),
}

impl Key {
    pub fn ed25519(public_key: impl Into<Vec<u8>>) -> Self {
        Key::Leaf {
            algorithm: KeyAlgorithm::Ed25519,
            public_key: public_key.into(),
        }
    }

    pub fn ecdsa_secp256k1(public_key: impl Into<Vec<u8>>) -> Self {
        Key::Leaf {
            algorithm: KeyAlgorithm::EcdsaSecp256k1,
            public_key: public_key.into(),
        }
    }

    pub fn threshold(threshold: u32, keys: Vec<Key>) -> Self {
        Key::Threshold { threshold, keys }
    }

    pub fn to_proto(&self) -> proto::Key {
        use proto::key::Key as Kind;

        let kind = match self {
            Key::Leaf {
                algorithm,
                public_key,
            } => {
                let bytes = public_key.clone();
                match algorithm {
                    KeyAlgorithm::Ed25519 => Kind::Ed25519(bytes),
                    KeyAlgorithm::EcdsaSecp256k1 => Kind::EcdsaSecp256k1(bytes),
                    KeyAlgorithm::Rsa3072 => Kind::Rsa3072(bytes),
                    KeyAlgorithm::Ecdsa384 => Kind::Ecdsa384(bytes),
                }
            }
            Key::KeyList(keys) => Kind::KeyList(to_proto_list(keys)),
            Key::Threshold { threshold, keys } => Kind::ThresholdKey(proto::ThresholdKey {
                threshold: *threshold,
                keys: Some(to_proto_list(keys)),
            }),
            Key::Contract(contract) if contract.delegatable => {
                Kind::DelegatableContractId(contract.contract_id.clone())
            }
            Key::Contract(contract) => Kind::ContractId(contract.contract_id.clone()),
        };
        proto::Key { key: Some(kind) }
    }

    /// Converts a wire key. An empty key (no variant set) anywhere in the tree
    /// is rejected; a threshold key without a key list has no children.
    pub fn from_proto(key: &proto::Key) -> RotationResult<Self> {
        use proto::key::Key as Kind;

        let kind = key
            .key
            .as_ref()
            .ok_or_else(|| RotationError::InvalidKey("key has no variant set".to_string()))?;
        Ok(match kind {
            Kind::Ed25519(bytes) => leaf(KeyAlgorithm::Ed25519, bytes),
            Kind::EcdsaSecp256k1(bytes) => leaf(KeyAlgorithm::EcdsaSecp256k1, bytes),
            Kind::Rsa3072(bytes) => leaf(KeyAlgorithm::Rsa3072, bytes),
            Kind::Ecdsa384(bytes) => leaf(KeyAlgorithm::Ecdsa384, bytes),
            Kind::KeyList(list) => Key::KeyList(from_proto_list(&list.keys)?),
            Kind::ThresholdKey(threshold) => Key::Threshold {
                threshold: threshold.threshold,
                keys: match &threshold.keys {
                    Some(list) => from_proto_list(&list.keys)?,
                    None => Vec::new(),
                },
            },
            Kind::ContractId(id) => Key::Contract(ContractKey {
                delegatable: false,
                contract_id: id.clone(),
            }),
            Kind::DelegatableContractId(id) => Key::Contract(ContractKey {
                delegatable: true,
                contract_id: id.clone(),
            }),
        })
    }

    pub fn to_protobuf_bytes(&self) -> Vec<u8> {
        self.to_proto().encode_to_vec()
    }

    pub fn from_protobuf_bytes(bytes: &[u8]) -> RotationResult<Self> {
        let key = proto::Key::decode(bytes)
            .map_err(|e| RotationError::InvalidKey(format!("undecodable key: {e}")))?;
        Self::from_proto(&key)
    }

    /// Number of leaf public keys in the tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            Key::Leaf { .. } => 1,
            Key::KeyList(keys) | Key::Threshold { keys, .. } => {
                keys.iter().map(Key::leaf_count).sum()
            }
            Key::Contract(_) => 0,
        }
    }
}

fn leaf(algorithm: KeyAlgorithm, bytes: &[u8]) -> Key {
    Key::Leaf {
        algorithm,
        public_key: bytes.to_vec(),
    }
}

fn to_proto_list(keys: &[Key]) -> proto::KeyList {
    proto::KeyList {
        keys: keys.iter().map(Key::to_proto).collect(),
    }
}

fn from_proto_list(keys: &[proto::Key]) -> RotationResult<Vec<Key>> {
    keys.iter().map(Key::from_proto).collect()
}
