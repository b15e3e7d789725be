use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RotationError, RotationResult};
use crate::proto;

/// A `shard.realm.num` account address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId {
    pub shard: i64,
    pub realm: i64,
    pub num: i64,
}

impl AccountId {
    pub const fn new(shard: i64, realm: i64, num: i64) -> Self {
        Self { shard, realm, num }
    }

    pub fn to_proto(&self) -> proto::AccountId {
        proto::AccountId {
            shard_num: self.shard,
            realm_num: self.realm,
            account: Some(proto::account_id::Account::AccountNum(self.num)),
        }
    }

    /// Alias-addressed accounts have no numeric form and are rejected.
    pub fn from_proto(id: &proto::AccountId) -> RotationResult<Self> {
        match id.account {
            Some(proto::account_id::Account::AccountNum(num)) => {
                Ok(Self::new(id.shard_num, id.realm_num, num))
            }
            Some(proto::account_id::Account::Alias(_)) => Err(RotationError::InvalidAccount(
                "alias account ids are not supported".to_string(),
            )),
            None => Err(RotationError::InvalidAccount(
                "account id has no account number".to_string(),
            )),
        }
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}

impl FromStr for AccountId {
    type Err = RotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RotationError::InvalidAccount(s.to_string());
        let mut parts = s.trim().split('.');
        let mut next = || -> RotationResult<i64> {
            let part = parts.next().ok_or_else(invalid)?;
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            part.parse::<i64>().map_err(|_| invalid())
        };
        let shard = next()?;
        let realm = next()?;
        let num = next()?;
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Self::new(shard, realm, num))
    }
}

/// Whether `value` is a well formed `shard.realm.num` entity id.
pub fn is_entity_id(value: &str) -> bool {
    value.parse::<AccountId>().is_ok()
}

/// Seconds and nanoseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: i32,
}

impl Timestamp {
    pub const fn new(seconds: i64, nanos: i32) -> Self {
        Self { seconds, nanos }
    }

    /// Splits a millisecond instant the way the network's own clients do,
    /// so the sub-second part always carries whole milliseconds.
    pub fn from_unix_millis(millis: i64) -> Self {
        Self {
            seconds: millis.div_euclid(1_000),
            nanos: (millis.rem_euclid(1_000) * 1_000_000) as i32,
        }
    }

    /// Saturates at the `i64` bounds; decoded bodies may carry any seconds.
    pub fn as_unix_millis(&self) -> i64 {
        self.seconds
            .saturating_mul(1_000)
            .saturating_add(i64::from(self.nanos) / 1_000_000)
    }

    pub fn to_proto(&self) -> proto::Timestamp {
        proto::Timestamp {
            seconds: self.seconds,
            nanos: self.nanos,
        }
    }

    pub fn from_proto(ts: &proto::Timestamp) -> Self {
        Self::new(ts.seconds, ts.nanos)
    }
}

/// Identifies one submission attempt: the paying account plus the instant
/// from which the transaction becomes valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId {
    pub account_id: AccountId,
    pub valid_start: Timestamp,
}

impl TransactionId {
    pub fn new(account_id: AccountId, valid_start: Timestamp) -> Self {
        Self {
            account_id,
            valid_start,
        }
    }

    pub fn to_proto(&self) -> proto::TransactionId {
        proto::TransactionId {
            transaction_valid_start: Some(self.valid_start.to_proto()),
            account_id: Some(self.account_id.to_proto()),
            scheduled: false,
            nonce: 0,
        }
    }

    pub fn from_proto(id: &proto::TransactionId) -> RotationResult<Self> {
        let account = id.account_id.as_ref().ok_or_else(|| {
            RotationError::InvalidTransaction("transaction id has no payer account".to_string())
        })?;
        let start = id.transaction_valid_start.as_ref().ok_or_else(|| {
            RotationError::InvalidTransaction("transaction id has no valid start".to_string())
        })?;
        let account_id = AccountId::from_proto(account)
            .map_err(|e| RotationError::InvalidTransaction(e.to_string()))?;
        Ok(Self::new(account_id, Timestamp::from_proto(start)))
    }
}

/// Mirror node form: `0.0.1234-1700000000-000000123`.
impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{:09}",
            self.account_id, self.valid_start.seconds, self.valid_start.nanos
        )
    }
}

impl FromStr for TransactionId {
    type Err = RotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RotationError::InvalidTransaction(format!("malformed transaction id: {s}"));
        let mut parts = s.trim().splitn(3, '-');
        let account = parts.next().ok_or_else(invalid)?;
        let seconds = parts.next().ok_or_else(invalid)?;
        let nanos = parts.next().ok_or_else(invalid)?;
        let account_id = account.parse::<AccountId>().map_err(|_| invalid())?;
        let seconds = seconds.parse::<i64>().map_err(|_| invalid())?;
        let nanos = nanos.parse::<i32>().map_err(|_| invalid())?;
        if !(0..1_000_000_000).contains(&nanos) {
            return Err(invalid());
        }
        Ok(Self::new(account_id, Timestamp::new(seconds, nanos)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_entity_ids() {
        let id: AccountId = "0.0.1234".parse().unwrap();
        assert_eq!(id, AccountId::new(0, 0, 1234));
        assert_eq!(id.to_string(), "0.0.1234");
        assert!(is_entity_id(" 1.2.3 "));
    }

    #[test]
    fn rejects_malformed_entity_ids() {
        for bad in ["", "0.0", "0.0.1.2", "0.0.x", "0..1", "-1.0.1", "0.0.+1"] {
            assert!(!is_entity_id(bad), "{bad} should be rejected");
        }
        assert!(matches!(
            "abc".parse::<AccountId>(),
            Err(RotationError::InvalidAccount(_))
        ));
    }

    #[test]
    fn timestamp_millis_split() {
        let ts = Timestamp::from_unix_millis(1_700_000_000_123);
        assert_eq!(ts, Timestamp::new(1_700_000_000, 123_000_000));
        assert_eq!(ts.as_unix_millis(), 1_700_000_000_123);

        let before_epoch = Timestamp::from_unix_millis(-1);
        assert_eq!(before_epoch, Timestamp::new(-1, 999_000_000));
    }

    #[test]
    fn far_future_millis_saturate() {
        assert_eq!(Timestamp::new(i64::MAX / 10, 0).as_unix_millis(), i64::MAX);
        assert_eq!(Timestamp::new(i64::MIN / 10, 0).as_unix_millis(), i64::MIN);
    }

    #[test]
    fn transaction_id_text_form() {
        let id = TransactionId::new(AccountId::new(0, 0, 42), Timestamp::new(1_700_000_000, 5));
        let text = id.to_string();
        assert_eq!(text, "0.0.42-1700000000-000000005");
        assert_eq!(text.parse::<TransactionId>().unwrap(), id);
    }

    #[test]
    fn transaction_id_requires_payer_and_start() {
        let missing_start = proto::TransactionId {
            account_id: Some(AccountId::new(0, 0, 2).to_proto()),
            ..Default::default()
        };
        assert!(matches!(
            TransactionId::from_proto(&missing_start),
            Err(RotationError::InvalidTransaction(_))
        ));
    }
}
