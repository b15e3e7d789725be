use keyrotate_types::{is_entity_id, AccountId, AccountInfo, RotationError, RotationResult};
use tracing::debug;

use crate::client::MirrorClient;

/// Resolves an account's current endorsement from the mirror.
pub async fn lookup_account_info(
    mirror: &dyn MirrorClient,
    account: &str,
) -> RotationResult<AccountInfo> {
    if !is_entity_id(account) {
        return Err(RotationError::InvalidAccount(account.to_string()));
    }
    let account_id: AccountId = account.parse()?;

    debug!("Looking up account {} on the mirror", account_id);
    let record = match mirror.get_account_info(&account_id).await {
        Ok(Some(record)) => record,
        Ok(None) => return Err(RotationError::AccountNotFound(account_id.to_string())),
        Err(e) if e.is_not_found() => {
            return Err(RotationError::AccountNotFound(account_id.to_string()))
        }
        Err(e) => return Err(e.into()),
    };
    if record.deleted {
        debug!("Account {} is deleted", account_id);
        return Err(RotationError::AccountNotFound(account_id.to_string()));
    }

    let info = AccountInfo::try_from(&record)?;
    debug!(
        "Account {} is endorsed by {} key(s)",
        info.account_id,
        info.endorsements.leaf_count()
    );
    Ok(info)
}
