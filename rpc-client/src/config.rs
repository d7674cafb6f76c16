use {
    crate::{
        abi::{parse_address, Selector},
        error::{ClientError, Result},
    },
    serde::{Deserialize, Serialize},
    std::{fs::File, path::Path, time::Duration},
    vesting_ledger::Address,
};

/// Default JSON-RPC request timeout: 30 seconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

pub const DEFAULT_JSON_RPC_URL: &str = "http://127.0.0.1:8545";

pub const DEFAULT_BLOCK_TAG: &str = "latest";

/// Function selectors for the remote read queries.
///
/// Each entry is either a signature (hashed to its selector) or a raw
/// `0x`-prefixed 4-byte selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub summary: String,
    pub schedule_count: String,
    pub schedule: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            summary: "getBeneficiarySummary(address)".to_string(),
            schedule_count: "getVestingSchedulesCountByBeneficiary(address)".to_string(),
            schedule: "getVestingSchedule(bytes32)".to_string(),
        }
    }
}

/// Resolved selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selectors {
    pub summary: Selector,
    pub schedule_count: Selector,
    pub schedule: Selector,
}

impl SelectorConfig {
    pub fn resolve(&self) -> Result<Selectors> {
        Ok(Selectors {
            summary: self.summary.parse()?,
            schedule_count: self.schedule_count.parse()?,
            schedule: self.schedule.parse()?,
        })
    }
}

/// Connection settings for [`crate::VestingRpcClient`].
///
/// Loaded from YAML; every field is optional in the file except
/// `contract_address`, which [`ClientConfig::validate`] requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub json_rpc_url: String,
    pub contract_address: String,
    pub timeout_ms: u64,
    pub block_tag: String,
    pub selectors: SelectorConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            json_rpc_url: DEFAULT_JSON_RPC_URL.to_string(),
            contract_address: String::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            block_tag: DEFAULT_BLOCK_TAG.to_string(),
            selectors: SelectorConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Read a YAML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| ClientError::Config(format!("{}: {e}", path.display())))?;
        serde_yaml::from_reader(file)
            .map_err(|e| ClientError::Config(format!("{}: {e}", path.display())))
    }

    /// Write the configuration as YAML, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::Config(format!("{}: {e}", parent.display())))?;
        }
        let file = File::create(path)
            .map_err(|e| ClientError::Config(format!("{}: {e}", path.display())))?;
        serde_yaml::to_writer(file, self)
            .map_err(|e| ClientError::Config(format!("{}: {e}", path.display())))
    }

    /// Check every field without touching the network.
    pub fn validate(&self) -> Result<()> {
        let url = self.json_rpc_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "json_rpc_url must be an http(s) URL, got {:?}",
                self.json_rpc_url
            )));
        }
        if self.timeout_ms == 0 {
            return Err(ClientError::Config("timeout_ms must be > 0".to_string()));
        }
        if self.block_tag.trim().is_empty() {
            return Err(ClientError::Config("block_tag must not be empty".to_string()));
        }
        self.contract()?;
        self.selectors.resolve()?;
        Ok(())
    }

    pub fn contract(&self) -> Result<Address> {
        if self.contract_address.trim().is_empty() {
            return Err(ClientError::Config(
                "contract_address is not set".to_string(),
            ));
        }
        parse_address(&self.contract_address)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
