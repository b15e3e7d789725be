//! Decides whether a set of collected signatures satisfies an authority tree.

use keyrotate_types::{Key, Signature, SignaturePair};

/// Evaluates `key` against `signatures`.
///
/// * A leaf is satisfied by any signature of the same algorithm whose public
///   key prefix is a byte prefix of the leaf's public key.
/// * A key list needs every child satisfied; an empty list is satisfied.
/// * A threshold key counts satisfied children in order and succeeds as soon
///   as the count reaches the threshold. The count is only compared after a
///   child succeeds, so a threshold key with no children is never satisfied
///   and a threshold of zero still needs one satisfied child.
/// * Contract keys are never satisfied by signatures.
pub fn has_signature_match(key: &Key, signatures: &[SignaturePair]) -> bool {
    match key {
        Key::Leaf {
            algorithm,
            public_key,
        } => signatures.iter().any(|pair| {
            pair.signature.as_ref().and_then(Signature::algorithm) == Some(*algorithm)
                && public_key.starts_with(&pair.pub_key_prefix)
        }),
        Key::Threshold { threshold, keys } => {
            let mut count = 0u32;
            for child in keys {
                if has_signature_match(child, signatures) {
                    count += 1;
                    if count >= *threshold {
                        return true;
                    }
                }
            }
            false
        }
        Key::KeyList(keys) => keys
            .iter()
            .all(|child| has_signature_match(child, signatures)),
        Key::Contract(_) => false,
    }
}
