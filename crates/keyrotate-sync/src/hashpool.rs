use async_trait::async_trait;
use keyrotate_core::{NetworkInfoSource, PrimaryClient};
use keyrotate_types::{ClientError, NetworkInfo, TransactionId, TransactionReceipt};
use prost::Message;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client as HttpClient;
use tracing::debug;

use crate::error::{check_status, map_reqwest_error};
use crate::trim_base_url;

/// Client for the hashpool proxy, which relays to the primary network.
///
/// * `GET  /info` - mirror endpoint and gossip nodes
/// * `POST /transactions` - protobuf `SignedTransaction` bytes
/// * `GET  /transactions/{id}/receipt` - protobuf `TransactionReceipt` bytes
#[derive(Debug, Clone)]
pub struct HashpoolClient {
    client: HttpClient,
    base_url: String,
}

impl HashpoolClient {
    pub fn new(client: HttpClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: trim_base_url(base_url),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl NetworkInfoSource for HashpoolClient {
    async fn get_info(&self) -> Result<NetworkInfo, ClientError> {
        let url = format!("{}/info", self.base_url);
        debug!("GET {}", url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        check_status(response)
            .await?
            .json::<NetworkInfo>()
            .await
            .map_err(map_reqwest_error)
    }
}

#[async_trait]
impl PrimaryClient for HashpoolClient {
    async fn submit_transaction(&self, signed_transaction: &[u8]) -> Result<(), ClientError> {
        let url = format!("{}/transactions", self.base_url);
        debug!("POST {} ({} bytes)", url, signed_transaction.len());
        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(signed_transaction.to_vec())
            .send()
            .await
            .map_err(map_reqwest_error)?;
        check_status(response).await?;
        Ok(())
    }

    async fn get_transaction_receipt(
        &self,
        transaction_id: &TransactionId,
    ) -> Result<TransactionReceipt, ClientError> {
        let url = format!("{}/transactions/{}/receipt", self.base_url, transaction_id);
        debug!("GET {}", url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let bytes = check_status(response)
            .await?
            .bytes()
            .await
            .map_err(map_reqwest_error)?;
        TransactionReceipt::decode(bytes.as_ref())
            .map_err(|e| ClientError::Decode(format!("receipt: {}", e)))
    }
}
