//! Network definition types

use serde::{Deserialize, Serialize};

/// An EVM network the wallet can be asked to add or switch to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDefinition {
    pub name: String,
    pub chain_id: u64,
    pub rpc_endpoints: Vec<String>,
    pub explorer: Option<String>,
    pub native_currency: NativeCurrency,
    pub testnet: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// `wallet_addEthereumChain` parameter object (EIP-3085)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddChainParams {
    /// Hex-encoded chain id with `0x` prefix
    pub chain_id: String,
    pub chain_name: String,
    pub rpc_urls: Vec<String>,
    pub native_currency: NativeCurrency,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub block_explorer_urls: Vec<String>,
}

impl NetworkDefinition {
    /// Hex chain id as wallets expect it
    pub fn chain_id_hex(&self) -> String {
        format!("0x{:x}", self.chain_id)
    }

    /// Build the EIP-3085 parameters for registering this network with a wallet
    pub fn to_add_chain_params(&self) -> AddChainParams {
        AddChainParams {
            chain_id: self.chain_id_hex(),
            chain_name: self.name.clone(),
            rpc_urls: self.rpc_endpoints.clone(),
            native_currency: self.native_currency.clone(),
            block_explorer_urls: self.explorer.iter().cloned().collect(),
        }
    }

    /// Primary RPC endpoint, if any
    pub fn primary_rpc(&self) -> Option<&str> {
        self.rpc_endpoints.first().map(String::as_str)
    }

    /// Short instructions for configuring this network by hand
    pub fn setup_message(&self) -> String {
        format!(
            "You can add {name} to your wallet with these settings:\n\
             - Network Name: {name}\n\
             - RPC URL: {rpc}\n\
             - Chain ID: {chain_id}\n\
             - Currency Symbol: {symbol}\n\
             - Block Explorer: {explorer}",
            name = self.name,
            rpc = self.primary_rpc().unwrap_or("-"),
            chain_id = self.chain_id,
            symbol = self.native_currency.symbol,
            explorer = self.explorer.as_deref().unwrap_or("-"),
        )
    }
}
