use async_trait::async_trait;
use keyrotate_core::MirrorClient;
use keyrotate_types::{
    AccountId, ClientError, MirrorAccount, MirrorTransactions, TransactionId, TransactionInfo,
};
use reqwest::Client as HttpClient;
use tracing::debug;

use crate::error::{check_status, map_reqwest_error};
use crate::trim_base_url;

/// Client for the mirror node REST API (`/api/v1`).
#[derive(Debug, Clone)]
pub struct MirrorRestClient {
    client: HttpClient,
    base_url: String,
}

impl MirrorRestClient {
    pub fn new(client: HttpClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: trim_base_url(base_url),
        }
    }
}

#[async_trait]
impl MirrorClient for MirrorRestClient {
    async fn get_transaction(
        &self,
        transaction_id: &TransactionId,
    ) -> Result<TransactionInfo, ClientError> {
        let url = format!("{}/api/v1/transactions/{}", self.base_url, transaction_id);
        debug!("GET {}", url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let envelope = check_status(response)
            .await?
            .json::<MirrorTransactions>()
            .await
            .map_err(map_reqwest_error)?;

        // Scheduled and child records share the id; the first entry is the
        // submitted transaction itself.
        envelope
            .transactions
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::not_found(format!("no record for {}", transaction_id)))
    }

    async fn get_account_info(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<MirrorAccount>, ClientError> {
        let url = format!("{}/api/v1/accounts/{}", self.base_url, account_id);
        debug!("GET {}", url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        match check_status(response).await {
            Ok(response) => response
                .json::<MirrorAccount>()
                .await
                .map(Some)
                .map_err(map_reqwest_error),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}
