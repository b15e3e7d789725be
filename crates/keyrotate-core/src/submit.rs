use keyrotate_types::proto;
use keyrotate_types::{signature_map, RotationResult, SignaturePair, TransactionId};
use prost::Message;
use tracing::info;

use crate::builder::decode_transaction_id;
use crate::client::PrimaryClient;

/// Wraps signed body bytes into a `SignedTransaction` and delivers it once.
///
/// The body is decoded first so corrupted or unrelated bytes never reach the
/// network. Delivery is never retried: a second submission of the same
/// transaction id is a separate network event.
pub async fn submit_transaction(
    client: &dyn PrimaryClient,
    body_bytes: &[u8],
    signatures: &[SignaturePair],
) -> RotationResult<TransactionId> {
    let transaction_id = decode_transaction_id(body_bytes)?;

    let envelope = proto::SignedTransaction {
        body_bytes: body_bytes.to_vec(),
        sig_map: Some(signature_map(signatures)),
    };

    info!(
        "Submitting {} with {} signatures",
        transaction_id,
        signatures.len()
    );
    client.submit_transaction(&envelope.encode_to_vec()).await?;
    Ok(transaction_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakePrimary;
    use keyrotate_types::{AccountId, ClientError, RotationError, Signature, Timestamp};

    fn body() -> (TransactionId, Vec<u8>) {
        let id = TransactionId::new(AccountId::new(0, 0, 77), Timestamp::new(1_700_000_000, 0));
        let body = proto::TransactionBody {
            transaction_id: Some(id.to_proto()),
            transaction_fee: 10,
            ..Default::default()
        };
        (id, body.encode_to_vec())
    }

    #[tokio::test]
    async fn delivers_envelope_exactly_once() {
        let primary = FakePrimary::default();
        let (id, bytes) = body();
        let sigs = vec![SignaturePair::new(vec![1, 2], Signature::Ed25519(vec![9; 64]))];

        let submitted = submit_transaction(&primary, &bytes, &sigs).await.unwrap();
        assert_eq!(submitted, id);

        let delivered = primary.submitted();
        assert_eq!(delivered.len(), 1);
        let envelope = proto::SignedTransaction::decode(delivered[0].as_slice()).unwrap();
        assert_eq!(envelope.body_bytes, bytes);
        assert_eq!(envelope.sig_map, Some(signature_map(&sigs)));
    }

    #[tokio::test]
    async fn rejects_bytes_without_transaction_id() {
        let primary = FakePrimary::default();
        let err = submit_transaction(&primary, b"\xff\xff", &[]).await.unwrap_err();
        assert!(matches!(err, RotationError::InvalidTransaction(_)));
        assert!(primary.submitted().is_empty());
    }

    #[tokio::test]
    async fn delivery_failure_is_not_retried() {
        let primary = FakePrimary::default();
        primary.fail_submissions(ClientError::Network("reset".into()));
        let (_, bytes) = body();
        let err = submit_transaction(&primary, &bytes, &[]).await.unwrap_err();
        assert!(matches!(err, RotationError::Transport(ClientError::Network(_))));
        assert_eq!(primary.submitted().len(), 1);
    }
}
