//! Input files and output rendering for the `keyrotate` binary.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use keyrotate_types::{Key, KeyAlgorithm, Signature, SignaturePair};
use serde::Deserialize;

/// JSON description of an endorsement, e.g.
/// `{"threshold": {"threshold": 2, "keys": [{"ed25519": "ab.."}, {"ed25519": "cd.."}]}}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeySpec {
    Ed25519(String),
    EcdsaSecp256k1(String),
    KeyList(Vec<KeySpec>),
    Threshold { threshold: u32, keys: Vec<KeySpec> },
    /// Hex of a protobuf `Key`, as the mirror reports complex keys.
    Protobuf(String),
}

impl KeySpec {
    pub fn to_key(&self) -> Result<Key> {
        Ok(match self {
            KeySpec::Ed25519(hex_key) => Key::ed25519(decode_hex(hex_key, "ed25519 key")?),
            KeySpec::EcdsaSecp256k1(hex_key) => {
                Key::ecdsa_secp256k1(decode_hex(hex_key, "secp256k1 key")?)
            }
            KeySpec::KeyList(keys) => {
                Key::KeyList(keys.iter().map(KeySpec::to_key).collect::<Result<_>>()?)
            }
            KeySpec::Threshold { threshold, keys } => Key::threshold(
                *threshold,
                keys.iter().map(KeySpec::to_key).collect::<Result<_>>()?,
            ),
            KeySpec::Protobuf(hex_key) => {
                Key::from_protobuf_bytes(&decode_hex(hex_key, "protobuf key")?)?
            }
        })
    }
}

/// One collected signature as produced by an external signer.
#[derive(Debug, Clone, Deserialize)]
pub struct SignatureSpec {
    pub public_key_prefix: String,
    pub algorithm: KeyAlgorithm,
    pub signature: String,
}

impl SignatureSpec {
    pub fn to_pair(&self) -> Result<SignaturePair> {
        let bytes = decode_hex(&self.signature, "signature")?;
        let signature = match self.algorithm {
            KeyAlgorithm::Ed25519 => Signature::Ed25519(bytes),
            KeyAlgorithm::EcdsaSecp256k1 => Signature::EcdsaSecp256k1(bytes),
            KeyAlgorithm::Rsa3072 => Signature::Rsa3072(bytes),
            KeyAlgorithm::Ecdsa384 => Signature::Ecdsa384(bytes),
        };
        Ok(SignaturePair::new(
            decode_hex(&self.public_key_prefix, "public key prefix")?,
            signature,
        ))
    }
}

pub fn load_key(path: &Path) -> Result<Key> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read key file {}", path.display()))?;
    let spec: KeySpec = serde_json::from_str(&content).context("Failed to parse key JSON")?;
    spec.to_key()
}

pub fn load_signatures(path: &Path) -> Result<Vec<SignaturePair>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read signatures file {}", path.display()))?;
    let specs: Vec<SignatureSpec> =
        serde_json::from_str(&content).context("Failed to parse signatures JSON")?;
    specs.iter().map(SignatureSpec::to_pair).collect()
}

/// Reads hex encoded transaction body bytes.
pub fn load_body(path: &Path) -> Result<Vec<u8>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read body file {}", path.display()))?;
    decode_hex(&content, "transaction body")
}

/// Indented, one key per line.
pub fn render_key(key: &Key) -> String {
    let mut out = String::new();
    render_into(key, 0, &mut out);
    out
}

fn render_into(key: &Key, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    match key {
        Key::Leaf {
            algorithm,
            public_key,
        } => out.push_str(&format!(
            "{}{:?} {}\n",
            indent,
            algorithm,
            hex::encode(public_key)
        )),
        Key::KeyList(keys) => {
            out.push_str(&format!("{}all of {}:\n", indent, keys.len()));
            for child in keys {
                render_into(child, depth + 1, out);
            }
        }
        Key::Threshold { threshold, keys } => {
            out.push_str(&format!("{}{} of {}:\n", indent, threshold, keys.len()));
            for child in keys {
                render_into(child, depth + 1, out);
            }
        }
        Key::Contract(contract) => out.push_str(&format!(
            "{}contract{} {:?}\n",
            indent,
            if contract.delegatable { " (delegatable)" } else { "" },
            contract.contract_id
        )),
    }
}

fn decode_hex(value: &str, what: &str) -> Result<Vec<u8>> {
    let trimmed = value.trim();
    let trimmed = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    hex::decode(trimmed).map_err(|e| anyhow!("Invalid hex in {}: {}", what, e))
}
