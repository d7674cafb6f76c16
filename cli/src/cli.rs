use {
    crate::vesting::{process_schedule_id, process_vesting_command, VestingCliCommand},
    clap::ArgMatches,
    log::debug,
    serde::Serialize,
    std::fmt,
    thiserror::Error,
    vesting_ledger::VestingError,
    vesting_rpc_client::{ClientConfig, ClientError, VestingRpcClient},
};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Bad parameter: {0}")]
    BadParameter(String),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Ledger(#[from] VestingError),
    #[error("Failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

pub type ProcessResult = Result<String, CliError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Display,
    Json,
    JsonCompact,
}

impl OutputFormat {
    pub fn from_matches(matches: &ArgMatches<'_>) -> Self {
        match matches.value_of("output_format") {
            Some("json") => OutputFormat::Json,
            Some("json-compact") => OutputFormat::JsonCompact,
            _ => OutputFormat::Display,
        }
    }

    pub fn formatted_string<T: Serialize + fmt::Display>(&self, item: &T) -> ProcessResult {
        match self {
            OutputFormat::Display => Ok(item.to_string()),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(item)?),
            OutputFormat::JsonCompact => Ok(serde_json::to_string(item)?),
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum CliCommand {
    Vesting(VestingCliCommand),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CliConfig {
    pub output_format: OutputFormat,
    pub client: ClientConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Display,
            client: ClientConfig::default(),
        }
    }
}

/// Build the effective configuration: the `--config` file (or defaults),
/// then command-line overrides.
pub fn parse_config(matches: &ArgMatches<'_>) -> Result<CliConfig, CliError> {
    let mut client = match matches.value_of("config_file") {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::default(),
    };
    if let Some(url) = matches.value_of("json_rpc_url") {
        client.json_rpc_url = url.to_string();
    }
    if let Some(contract) = matches.value_of("contract") {
        client.contract_address = contract.to_string();
    }
    if let Some(timeout_ms) = matches.value_of("timeout_ms") {
        client.timeout_ms = timeout_ms
            .parse()
            .map_err(|_| CliError::BadParameter(format!("invalid timeout: {timeout_ms}")))?;
    }
    debug!("using JSON RPC URL {}", client.json_rpc_url);

    Ok(CliConfig {
        output_format: OutputFormat::from_matches(matches),
        client,
    })
}

/// Run `command`. Offline commands never open a connection.
pub fn process_command(config: &CliConfig, command: &CliCommand) -> ProcessResult {
    match command {
        CliCommand::Vesting(VestingCliCommand::ScheduleId { beneficiary, index }) => {
            process_schedule_id(config, beneficiary, *index)
        }
        CliCommand::Vesting(command) => {
            let client = VestingRpcClient::new(&config.client)?;
            process_vesting_command(&client, config, command)
        }
    }
}
