//! In-memory collaborators for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use keyrotate_types::{
    AccountId, ClientError, MirrorAccount, ResponseCode, TransactionId, TransactionInfo,
    TransactionReceipt,
};

use crate::client::{MirrorClient, PrimaryClient};

#[derive(Default)]
pub struct FakePrimary {
    submitted: Mutex<Vec<Vec<u8>>>,
    submit_error: Mutex<Option<ClientError>>,
    receipt: Mutex<Option<Result<TransactionReceipt, ClientError>>>,
    receipt_queries: Mutex<Vec<TransactionId>>,
}

impl FakePrimary {
    pub fn submitted(&self) -> Vec<Vec<u8>> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn fail_submissions(&self, error: ClientError) {
        *self.submit_error.lock().unwrap() = Some(error);
    }

    pub fn set_receipt(&self, receipt: Result<TransactionReceipt, ClientError>) {
        *self.receipt.lock().unwrap() = Some(receipt);
    }

    pub fn receipt_queries(&self) -> Vec<TransactionId> {
        self.receipt_queries.lock().unwrap().clone()
    }
}

pub fn success_receipt() -> TransactionReceipt {
    TransactionReceipt {
        status: ResponseCode::Success as i32,
        account_id: None,
    }
}

#[async_trait]
impl PrimaryClient for FakePrimary {
    async fn submit_transaction(&self, signed_transaction: &[u8]) -> Result<(), ClientError> {
        self.submitted.lock().unwrap().push(signed_transaction.to_vec());
        match self.submit_error.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn get_transaction_receipt(
        &self,
        transaction_id: &TransactionId,
    ) -> Result<TransactionReceipt, ClientError> {
        self.receipt_queries.lock().unwrap().push(*transaction_id);
        self.receipt
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Ok(success_receipt()))
    }
}

/// Mirror that replays scripted responses, then answers 404 forever.
#[derive(Default)]
pub struct FakeMirror {
    responses: Mutex<VecDeque<Result<TransactionInfo, ClientError>>>,
    transaction_queries: Mutex<u32>,
    accounts: Mutex<HashMap<AccountId, Result<Option<MirrorAccount>, ClientError>>>,
}

impl FakeMirror {
    pub fn not_found_then(misses: u32, info: TransactionInfo) -> Self {
        let mirror = Self::default();
        for _ in 0..misses {
            mirror.push(Err(ClientError::not_found("transaction not indexed")));
        }
        mirror.push(Ok(info));
        mirror
    }

    pub fn push(&self, response: Result<TransactionInfo, ClientError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn set_account(&self, id: AccountId, record: Result<Option<MirrorAccount>, ClientError>) {
        self.accounts.lock().unwrap().insert(id, record);
    }

    pub fn transaction_queries(&self) -> u32 {
        *self.transaction_queries.lock().unwrap()
    }
}

pub fn transaction_info(transaction_id: &TransactionId) -> TransactionInfo {
    TransactionInfo {
        transaction_id: transaction_id.to_string(),
        consensus_timestamp: "1700000005.000000001".to_string(),
        name: "CRYPTOUPDATEACCOUNT".to_string(),
        result: "SUCCESS".to_string(),
        node: Some("0.0.3".to_string()),
        entity_id: Some(transaction_id.account_id.to_string()),
        charged_tx_fee: 84_000,
        max_fee: Some("500000000".to_string()),
        memo_base64: Some(String::new()),
        transaction_hash: None,
        valid_start_timestamp: None,
        valid_duration_seconds: Some("180".to_string()),
        scheduled: false,
    }
}

#[async_trait]
impl MirrorClient for FakeMirror {
    async fn get_transaction(
        &self,
        _transaction_id: &TransactionId,
    ) -> Result<TransactionInfo, ClientError> {
        *self.transaction_queries.lock().unwrap() += 1;
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::not_found("transaction not indexed")))
    }

    async fn get_account_info(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<MirrorAccount>, ClientError> {
        self.accounts
            .lock()
            .unwrap()
            .get(account_id)
            .cloned()
            .unwrap_or(Ok(None))
    }
}
