use serde::{Deserialize, Serialize};

use crate::entity::AccountId;
use crate::error::RotationResult;

/// A gossip node the primary network proxy can forward transactions through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelInfo {
    /// Node account, `shard.realm.num`
    pub account: String,
    /// Node address as reported by the proxy
    #[serde(default)]
    pub address: String,
}

impl ChannelInfo {
    pub fn account_id(&self) -> RotationResult<AccountId> {
        self.account.parse()
    }
}

/// Response of the primary network proxy's `/info` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInfo {
    /// Base url of the mirror node paired with this proxy
    pub mirror_node: String,
    /// Gossip nodes currently reachable through the proxy
    #[serde(default)]
    pub channels: Vec<ChannelInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_info_payload() {
        let info: NetworkInfo = serde_json::from_str(
            r#"{
                "mirror_node": "https://testnet.mirrornode.hedera.com",
                "channels": [
                    {"account": "0.0.3", "address": "34.94.106.61:50211"},
                    {"account": "0.0.4"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(info.channels.len(), 2);
        assert_eq!(info.channels[1].address, "");
        assert_eq!(info.channels[0].account_id().unwrap(), AccountId::new(0, 0, 3));
    }
}
