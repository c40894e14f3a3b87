//! Registry of EVM networks the rewards client knows how to add to a wallet

use decleanup_contracts_trait::{NativeCurrency, NetworkDefinition};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Look up a network by its registry key (e.g. `"celo"`, `"celo-sepolia"`)
pub fn get_network(name: &str) -> Option<&'static NetworkDefinition> {
    NETWORKS.get(name)
}

/// Look up a network by chain id
pub fn get_network_by_chain_id(chain_id: u64) -> Option<&'static NetworkDefinition> {
    NETWORKS.values().find(|n| n.chain_id == chain_id)
}

pub fn list_networks() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = NETWORKS.keys().map(|s| s.as_str()).collect();
    names.sort_unstable();
    names
}

fn celo_currency(name: &str) -> NativeCurrency {
    NativeCurrency {
        name: name.to_string(),
        symbol: "CELO".to_string(),
        decimals: 18,
    }
}

fn ether(name: &str) -> NativeCurrency {
    NativeCurrency {
        name: name.to_string(),
        symbol: "ETH".to_string(),
        decimals: 18,
    }
}

static NETWORKS: Lazy<HashMap<String, NetworkDefinition>> = Lazy::new(|| {
    let mut networks = HashMap::new();

    // Celo Mainnet
    networks.insert("celo".to_string(), NetworkDefinition {
        name: "Celo".to_string(),
        chain_id: 42220,
        rpc_endpoints: vec![
            "https://forno.celo.org".to_string(),
            "https://rpc.ankr.com/celo".to_string(),
        ],
        explorer: Some("https://celoscan.io".to_string()),
        native_currency: celo_currency("Celo"),
        testnet: false,
    });

    // Celo Sepolia Testnet
    networks.insert("celo-sepolia".to_string(), NetworkDefinition {
        name: "Celo Sepolia".to_string(),
        chain_id: 11142220,
        rpc_endpoints: vec![
            "https://forno.celo-sepolia.celo-testnet.org".to_string(),
        ],
        explorer: Some("https://celo-sepolia.blockscout.com".to_string()),
        native_currency: celo_currency("Celo Sepolia CELO"),
        testnet: true,
    });

    // Celo Alfajores Testnet (deprecated, commonly left configured in wallets)
    networks.insert("celo-alfajores".to_string(), NetworkDefinition {
        name: "Celo Alfajores".to_string(),
        chain_id: 44787,
        rpc_endpoints: vec![
            "https://alfajores-forno.celo-testnet.org".to_string(),
        ],
        explorer: Some("https://alfajores.celoscan.io".to_string()),
        native_currency: celo_currency("Alfajores CELO"),
        testnet: true,
    });

    // Arbitrum One
    networks.insert("arbitrum".to_string(), NetworkDefinition {
        name: "Arbitrum One".to_string(),
        chain_id: 42161,
        rpc_endpoints: vec![
            "https://arb1.arbitrum.io/rpc".to_string(),
            "https://rpc.ankr.com/arbitrum".to_string(),
        ],
        explorer: Some("https://arbiscan.io".to_string()),
        native_currency: ether("Arbitrum Ether"),
        testnet: false,
    });

    // Arbitrum Sepolia
    networks.insert("arbitrum-sepolia".to_string(), NetworkDefinition {
        name: "Arbitrum Sepolia".to_string(),
        chain_id: 421614,
        rpc_endpoints: vec![
            "https://sepolia-rollup.arbitrum.io/rpc".to_string(),
        ],
        explorer: Some("https://sepolia.arbiscan.io".to_string()),
        native_currency: ether("Arbitrum Sepolia Ether"),
        testnet: true,
    });

    // Ethereum Mainnet (only known so it can be recognized as the wrong chain)
    networks.insert("mainnet".to_string(), NetworkDefinition {
        name: "Ethereum Mainnet".to_string(),
        chain_id: 1,
        rpc_endpoints: vec![
            "https://eth.llamarpc.com".to_string(),
        ],
        explorer: Some("https://etherscan.io".to_string()),
        native_currency: ether("Ether"),
        testnet: false,
    });

    // Local hardhat node
    networks.insert("hardhat".to_string(), NetworkDefinition {
        name: "Hardhat".to_string(),
        chain_id: 1337,
        rpc_endpoints: vec![
            "http://127.0.0.1:8545".to_string(),
        ],
        explorer: None,
        native_currency: ether("Ether"),
        testnet: true,
    });

    networks
});
