//! Static network descriptor handed to the wallet's "add network" call.

use serde::{Deserialize, Serialize};

/// Native currency of a network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl Default for NativeCurrency {
    fn default() -> Self {
        Self {
            name: "Sepolia Ether".to_string(),
            symbol: "ETH".to_string(),
            decimals: 18,
        }
    }
}

/// Network the dashboard expects the wallet to be on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDescriptor {
    /// EIP-155 chain id.
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,

    /// Display name.
    #[serde(default = "default_chain_name")]
    pub name: String,

    #[serde(default)]
    pub native_currency: NativeCurrency,

    /// JSON-RPC endpoints.
    #[serde(default = "default_rpc_urls")]
    pub rpc_urls: Vec<String>,

    /// Block explorer URLs.
    #[serde(default)]
    pub block_explorer_urls: Vec<String>,
}

fn default_chain_id() -> u64 {
    11_155_111
}

fn default_chain_name() -> String {
    "Sepolia".to_string()
}

fn default_rpc_urls() -> Vec<String> {
    vec!["https://rpc.sepolia.org".to_string()]
}

impl Default for NetworkDescriptor {
    fn default() -> Self {
        Self {
            chain_id: default_chain_id(),
            name: default_chain_name(),
            native_currency: NativeCurrency::default(),
            rpc_urls: default_rpc_urls(),
            block_explorer_urls: Vec::new(),
        }
    }
}

impl NetworkDescriptor {
    /// Chain id in the `0x`-prefixed hex form wallets expect.
    pub fn chain_id_hex(&self) -> String {
        format!("{:#x}", self.chain_id)
    }

    /// Parameters for `wallet_addEthereumChain`.
    pub fn add_chain_params(&self) -> serde_json::Value {
        serde_json::json!({
            "chainId": self.chain_id_hex(),
            "chainName": self.name,
            "nativeCurrency": {
                "name": self.native_currency.name,
                "symbol": self.native_currency.symbol,
                "decimals": self.native_currency.decimals,
            },
            "rpcUrls": self.rpc_urls,
            "blockExplorerUrls": self.block_explorer_urls,
        })
    }
}

impl std::fmt::Display for NetworkDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.chain_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_id_hex() {
        let network = NetworkDescriptor::default();
        assert_eq!(network.chain_id_hex(), "0xaa36a7");
    }

    #[test]
    fn test_add_chain_params() {
        let network = NetworkDescriptor {
            chain_id: 31337,
            name: "Anvil".to_string(),
            native_currency: NativeCurrency {
                name: "Ether".to_string(),
                symbol: "ETH".to_string(),
                decimals: 18,
            },
            rpc_urls: vec!["http://127.0.0.1:8545".to_string()],
            block_explorer_urls: vec![],
        };

        let params = network.add_chain_params();
        assert_eq!(params["chainId"], "0x7a69");
        assert_eq!(params["chainName"], "Anvil");
        assert_eq!(params["nativeCurrency"]["decimals"], 18);
        assert_eq!(params["rpcUrls"][0], "http://127.0.0.1:8545");
    }
}
