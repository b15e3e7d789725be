use prost::Message;

use crate::error::{RotationError, RotationResult};
use crate::key::KeyAlgorithm;
use crate::proto;

/// Signature bytes tagged with the scheme that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Signature {
    Contract(Vec<u8>),
    Ed25519(Vec<u8>),
    Rsa3072(Vec<u8>),
    Ecdsa384(Vec<u8>),
    EcdsaSecp256k1(Vec<u8>),
}

impl Signature {
    /// Key algorithm this signature can satisfy. Contract signatures satisfy none.
    pub fn algorithm(&self) -> Option<KeyAlgorithm> {
        match self {
            Signature::Contract(_) => None,
            Signature::Ed25519(_) => Some(KeyAlgorithm::Ed25519),
            Signature::Rsa3072(_) => Some(KeyAlgorithm::Rsa3072),
            Signature::Ecdsa384(_) => Some(KeyAlgorithm::Ecdsa384),
            Signature::EcdsaSecp256k1(_) => Some(KeyAlgorithm::EcdsaSecp256k1),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            Signature::Contract(b)
            | Signature::Ed25519(b)
            | Signature::Rsa3072(b)
            | Signature::Ecdsa384(b)
            | Signature::EcdsaSecp256k1(b) => b,
        }
    }
}

/// One collected signature, addressed by a (possibly truncated) prefix of the
/// signer's public key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignaturePair {
    pub pub_key_prefix: Vec<u8>,
    pub signature: Option<Signature>,
}

impl SignaturePair {
    pub fn new(pub_key_prefix: impl Into<Vec<u8>>, signature: Signature) -> Self {
        Self {
            pub_key_prefix: pub_key_prefix.into(),
            signature: Some(signature),
        }
    }

    pub fn to_proto(&self) -> proto::SignaturePair {
        use proto::signature_pair::Signature as Wire;

        proto::SignaturePair {
            pub_key_prefix: self.pub_key_prefix.clone(),
            signature: self.signature.as_ref().map(|sig| match sig {
                Signature::Contract(b) => Wire::Contract(b.clone()),
                Signature::Ed25519(b) => Wire::Ed25519(b.clone()),
                Signature::Rsa3072(b) => Wire::Rsa3072(b.clone()),
                Signature::Ecdsa384(b) => Wire::Ecdsa384(b.clone()),
                Signature::EcdsaSecp256k1(b) => Wire::EcdsaSecp256k1(b.clone()),
            }),
        }
    }

    pub fn from_proto(pair: &proto::SignaturePair) -> Self {
        use proto::signature_pair::Signature as Wire;

        Self {
            pub_key_prefix: pair.pub_key_prefix.clone(),
            signature: pair.signature.as_ref().map(|sig| match sig {
                Wire::Contract(b) => Signature::Contract(b.clone()),
                Wire::Ed25519(b) => Signature::Ed25519(b.clone()),
                Wire::Rsa3072(b) => Signature::Rsa3072(b.clone()),
                Wire::Ecdsa384(b) => Signature::Ecdsa384(b.clone()),
                Wire::EcdsaSecp256k1(b) => Signature::EcdsaSecp256k1(b.clone()),
            }),
        }
    }
}

/// Builds the wire signature map, preserving the order pairs were collected in.
pub fn signature_map(pairs: &[SignaturePair]) -> proto::SignatureMap {
    proto::SignatureMap {
        sig_pair: pairs.iter().map(SignaturePair::to_proto).collect(),
    }
}

/// Decodes a protobuf `SignatureMap`, the form external signers hand back.
pub fn pairs_from_signature_map_bytes(bytes: &[u8]) -> RotationResult<Vec<SignaturePair>> {
    let map = proto::SignatureMap::decode(bytes)
        .map_err(|e| RotationError::InvalidTransaction(format!("undecodable signature map: {e}")))?;
    Ok(map.sig_pair.iter().map(SignaturePair::from_proto).collect())
}
