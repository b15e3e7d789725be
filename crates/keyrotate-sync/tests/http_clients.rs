use std::sync::Arc;
use std::time::Duration;

use keyrotate_core::{
    lookup_account_info, CancellationToken, ConfigGate, KnownNetwork, ManualClock,
    MirrorConfirmer, NetworkInfoSource, PrimaryClient,
};
use keyrotate_sync::{http_client, HashpoolClient, MirrorRestClient};
use keyrotate_types::proto::{SignedTransaction, TransactionBody};
use keyrotate_types::{
    AccountId, ClientError, Key, ResponseCode, RotationError, Timestamp, TransactionId,
    TransactionReceipt,
};
use mockito::Server;
use prost::Message;
use serde_json::json;

fn tx_id() -> TransactionId {
    TransactionId::new(AccountId::new(0, 0, 1234), Timestamp::new(1_700_000_000, 5_000_000))
}

const TX_PATH: &str = "/api/v1/transactions/0.0.1234-1700000000-005000000";

fn client() -> reqwest::Client {
    http_client(Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_network_info_bootstraps_config() {
    let mut server = Server::new_async().await;
    let info = server
        .mock("GET", "/info")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "mirror_node": "https://testnet.mirrornode.hedera.com",
                "channels": [
                    {"account": "0.0.3", "address": "34.94.106.61:50211"},
                    {"account": "0.0.4", "address": "35.237.119.55:50211"}
                ]
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let hashpool = HashpoolClient::new(client(), &format!("{}/", server.url()));
    let gate = ConfigGate::new();
    let config = gate.ensure(&hashpool, hashpool.base_url()).await.unwrap();
    let again = gate.ensure(&hashpool, hashpool.base_url()).await.unwrap();

    assert!(Arc::ptr_eq(&config, &again));
    assert_eq!(config.network, KnownNetwork::Testnet);
    assert_eq!(config.nodes.len(), 2);
    assert_eq!(config.hashpool_endpoint, server.url());
    info.assert_async().await;
}

#[tokio::test]
async fn test_info_server_error_is_status() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/info")
        .with_status(502)
        .with_body("upstream down")
        .create_async()
        .await;

    let hashpool = HashpoolClient::new(client(), &server.url());
    let err = hashpool.get_info().await.unwrap_err();
    assert_eq!(
        err,
        ClientError::Status {
            status: 502,
            message: "upstream down".to_string()
        }
    );
}

#[tokio::test]
async fn test_submit_posts_signed_bytes() {
    let mut server = Server::new_async().await;
    let envelope = SignedTransaction {
        body_bytes: TransactionBody {
            transaction_id: Some(tx_id().to_proto()),
            ..Default::default()
        }
        .encode_to_vec(),
        sig_map: None,
    }
    .encode_to_vec();

    let submit = server
        .mock("POST", "/transactions")
        .match_header("content-type", "application/octet-stream")
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let hashpool = HashpoolClient::new(client(), &server.url());
    hashpool.submit_transaction(&envelope).await.unwrap();
    submit.assert_async().await;
}

#[tokio::test]
async fn test_receipt_is_decoded_from_protobuf() {
    let mut server = Server::new_async().await;
    let receipt = TransactionReceipt {
        status: ResponseCode::Success as i32,
        account_id: None,
    };
    let _m = server
        .mock("GET", "/transactions/0.0.1234-1700000000-005000000/receipt")
        .with_status(200)
        .with_body(receipt.encode_to_vec())
        .create_async()
        .await;

    let hashpool = HashpoolClient::new(client(), &server.url());
    let fetched = hashpool.get_transaction_receipt(&tx_id()).await.unwrap();
    assert!(fetched.is_success());
}

#[tokio::test]
async fn test_mirror_transaction_lookup() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", TX_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "transactions": [{
                    "transaction_id": "0.0.1234-1700000000-005000000",
                    "consensus_timestamp": "1700000006.000000001",
                    "name": "CRYPTOUPDATEACCOUNT",
                    "result": "SUCCESS",
                    "charged_tx_fee": 84000
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let mirror = MirrorRestClient::new(client(), &server.url());
    let info = keyrotate_core::MirrorClient::get_transaction(&mirror, &tx_id())
        .await
        .unwrap();
    assert!(info.is_success());
    assert_eq!(info.name, "CRYPTOUPDATEACCOUNT");
}

#[tokio::test]
async fn test_empty_mirror_listing_is_not_found() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", TX_PATH)
        .with_status(200)
        .with_body(r#"{"transactions":[]}"#)
        .create_async()
        .await;

    let mirror = MirrorRestClient::new(client(), &server.url());
    let err = keyrotate_core::MirrorClient::get_transaction(&mirror, &tx_id())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_confirmer_polls_until_budget_runs_out() {
    let mut server = Server::new_async().await;
    let lagging = server
        .mock("GET", TX_PATH)
        .with_status(404)
        .with_body(r#"{"_status":{"messages":[{"message":"Not found"}]}}"#)
        .expect(3)
        .create_async()
        .await;

    let clock = ManualClock::at_unix_millis(0);
    let confirmer = MirrorConfirmer::new(
        Arc::new(MirrorRestClient::new(client(), &server.url())),
        Arc::new(clock.clone()),
    )
    .with_policy(3, Duration::from_secs(1));

    let err = confirmer
        .await_mirror_info(&tx_id(), &CancellationToken::never())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RotationError::MirrorNotFoundTimeout { attempts: 3, .. }
    ));
    assert_eq!(clock.total_slept(), Duration::from_secs(2));
    lagging.assert_async().await;
}

#[tokio::test]
async fn test_confirmer_stops_on_server_error() {
    let mut server = Server::new_async().await;
    let failing = server
        .mock("GET", TX_PATH)
        .with_status(500)
        .expect(1)
        .create_async()
        .await;

    let clock = ManualClock::at_unix_millis(0);
    let confirmer = MirrorConfirmer::new(
        Arc::new(MirrorRestClient::new(client(), &server.url())),
        Arc::new(clock.clone()),
    );

    let err = confirmer
        .await_mirror_info(&tx_id(), &CancellationToken::never())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RotationError::Transport(ClientError::Status { status: 500, .. })
    ));
    assert!(clock.sleeps().is_empty());
    failing.assert_async().await;
}

#[tokio::test]
async fn test_account_lookup_decodes_mirror_key() {
    let mut server = Server::new_async().await;
    let endorsement = Key::threshold(
        2,
        vec![
            Key::ed25519(vec![0x11; 32]),
            Key::ed25519(vec![0x22; 32]),
            Key::ecdsa_secp256k1(vec![0x03; 33]),
        ],
    );
    let _found = server
        .mock("GET", "/api/v1/accounts/0.0.1234")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "account": "0.0.1234",
                "deleted": false,
                "key": {
                    "_type": "ProtobufEncoded",
                    "key": hex::encode(endorsement.to_protobuf_bytes())
                }
            })
            .to_string(),
        )
        .create_async()
        .await;
    let _missing = server
        .mock("GET", "/api/v1/accounts/0.0.4321")
        .with_status(404)
        .create_async()
        .await;

    let mirror = MirrorRestClient::new(client(), &server.url());
    let info = lookup_account_info(&mirror, "0.0.1234").await.unwrap();
    assert_eq!(info.endorsements, endorsement);

    let err = lookup_account_info(&mirror, "0.0.4321").await.unwrap_err();
    assert!(matches!(err, RotationError::AccountNotFound(_)));
}
