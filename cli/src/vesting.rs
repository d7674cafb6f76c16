use {
    crate::cli::{CliCommand, CliConfig, CliError, ProcessResult},
    clap::{App, AppSettings, Arg, ArgMatches, SubCommand},
    serde::{Deserialize, Serialize},
    std::{
        fmt,
        time::{SystemTime, UNIX_EPOCH},
    },
    vesting_ledger::{
        aggregation, calculator, Address, BeneficiarySummary, CategorySummary, ScheduleId,
        VestingSchedule, VestingStore,
    },
    vesting_rpc_client::{mirror_beneficiary, RpcSender, VestingRpcClient},
};

// ── CLI Command Enum Variants ───────────────────────────────────────
#[derive(Debug, PartialEq, Eq)]
pub enum VestingCliCommand {
    Summary {
        beneficiary: Address,
    },
    Schedules {
        beneficiary: Address,
        now: Option<u64>,
    },
    ScheduleId {
        beneficiary: Address,
        index: u64,
    },
}

// ── Output Structs ──────────────────────────────────────────────────
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CliBeneficiarySummary {
    pub beneficiary: Address,
    #[serde(flatten)]
    pub summary: BeneficiarySummary,
}

impl fmt::Display for CliBeneficiarySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Vesting Summary for {}", self.beneficiary)?;
        write!(f, "{}", self.summary)
    }
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CliSchedule {
    #[serde(flatten)]
    pub schedule: VestingSchedule,
    pub releasable: String,
}

impl fmt::Display for CliSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.schedule;
        let status = match (s.revoked, s.revocable) {
            (true, _) => "revoked",
            (false, true) => "active, revocable",
            (false, false) => "active",
        };
        writeln!(f, "  {}", s.id)?;
        writeln!(f, "    Type:        {} / {}", s.category, s.vesting_type)?;
        writeln!(
            f,
            "    Curve:       start {}, cliff +{}s, duration {}s, slice {}s",
            s.start, s.cliff, s.duration, s.slice_period_seconds
        )?;
        writeln!(f, "    Total:       {}", s.amount_total)?;
        writeln!(f, "    Released:    {}", s.released)?;
        writeln!(f, "    Releasable:  {}", self.releasable)?;
        writeln!(f, "    Status:      {status}")?;
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CliScheduleList {
    pub beneficiary: Address,
    pub now: u64,
    pub schedules: Vec<CliSchedule>,
    pub categories: Vec<CategorySummary>,
    pub summary: BeneficiarySummary,
}

impl fmt::Display for CliScheduleList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Vesting Schedules for {} (at {})",
            self.beneficiary, self.now
        )?;
        if self.schedules.is_empty() {
            writeln!(f, "  No schedules")?;
            return Ok(());
        }
        for schedule in &self.schedules {
            write!(f, "{schedule}")?;
        }
        writeln!(f)?;
        writeln!(f, "By Category:")?;
        for category in &self.categories {
            write!(f, "{category}")?;
        }
        writeln!(f)?;
        writeln!(f, "Totals:")?;
        write!(f, "{}", self.summary)
    }
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CliScheduleId {
    pub beneficiary: Address,
    pub index: u64,
    pub schedule_id: ScheduleId,
}

impl fmt::Display for CliScheduleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.schedule_id)
    }
}

// ── Subcommand Definition (clap) ────────────────────────────────────
fn is_valid_address(value: String) -> Result<(), String> {
    value
        .parse::<Address>()
        .map(|_| ())
        .map_err(|e| e.to_string())
}

fn is_u64(value: String) -> Result<(), String> {
    value
        .parse::<u64>()
        .map(|_| ())
        .map_err(|e| format!("{value}: {e}"))
}

fn beneficiary_arg<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name("beneficiary")
        .long("beneficiary")
        .value_name("ADDRESS")
        .takes_value(true)
        .required(true)
        .validator(is_valid_address)
        .help("Beneficiary address, 0x-prefixed hex")
}

pub trait VestingSubCommands {
    fn vesting_subcommands(self) -> Self;
}

impl VestingSubCommands for App<'_, '_> {
    fn vesting_subcommands(self) -> Self {
        self.setting(AppSettings::SubcommandRequiredElseHelp)
            .subcommand(
                SubCommand::with_name("summary")
                    .about("Show the remote vesting summary of a beneficiary")
                    .arg(beneficiary_arg()),
            )
            .subcommand(
                SubCommand::with_name("schedules")
                    .about("Mirror a beneficiary's schedules and show what is releasable")
                    .arg(beneficiary_arg())
                    .arg(
                        Arg::with_name("now")
                            .long("now")
                            .value_name("UNIX_TIMESTAMP")
                            .takes_value(true)
                            .validator(is_u64)
                            .help("Evaluate releasable amounts at this time [default: current time]"),
                    ),
            )
            .subcommand(
                SubCommand::with_name("schedule-id")
                    .about("Derive the id of a beneficiary's schedule at an index (offline)")
                    .arg(beneficiary_arg())
                    .arg(
                        Arg::with_name("index")
                            .long("index")
                            .value_name("N")
                            .takes_value(true)
                            .required(true)
                            .validator(is_u64)
                            .help("Zero-based schedule index of the beneficiary"),
                    ),
            )
    }
}

// ── Argument Parsing ────────────────────────────────────────────────
fn address_of(matches: &ArgMatches<'_>, name: &str) -> Result<Address, CliError> {
    let value = matches
        .value_of(name)
        .ok_or_else(|| CliError::BadParameter(format!("missing --{name}")))?;
    Ok(value.parse()?)
}

fn u64_of(matches: &ArgMatches<'_>, name: &str) -> Result<Option<u64>, CliError> {
    matches
        .value_of(name)
        .map(|value| {
            value
                .parse()
                .map_err(|_| CliError::BadParameter(format!("invalid --{name}: {value}")))
        })
        .transpose()
}

pub fn parse_vesting_command(matches: &ArgMatches<'_>) -> Result<CliCommand, CliError> {
    let command = match matches.subcommand() {
        ("summary", Some(matches)) => VestingCliCommand::Summary {
            beneficiary: address_of(matches, "beneficiary")?,
        },
        ("schedules", Some(matches)) => VestingCliCommand::Schedules {
            beneficiary: address_of(matches, "beneficiary")?,
            now: u64_of(matches, "now")?,
        },
        ("schedule-id", Some(matches)) => VestingCliCommand::ScheduleId {
            beneficiary: address_of(matches, "beneficiary")?,
            index: u64_of(matches, "index")?
                .ok_or_else(|| CliError::BadParameter("missing --index".to_string()))?,
        },
        (other, _) => {
            return Err(CliError::BadParameter(format!(
                "unknown subcommand {other:?}"
            )))
        }
    };
    Ok(CliCommand::Vesting(command))
}

// ── Command Processing ──────────────────────────────────────────────
pub fn process_vesting_command<S: RpcSender>(
    client: &VestingRpcClient<S>,
    config: &CliConfig,
    command: &VestingCliCommand,
) -> ProcessResult {
    match command {
        VestingCliCommand::Summary { beneficiary } => {
            process_summary(client, config, beneficiary)
        }
        VestingCliCommand::Schedules { beneficiary, now } => {
            process_schedules(client, config, beneficiary, now.unwrap_or_else(unix_now))
        }
        VestingCliCommand::ScheduleId { beneficiary, index } => {
            process_schedule_id(config, beneficiary, *index)
        }
    }
}

fn process_summary<S: RpcSender>(
    client: &VestingRpcClient<S>,
    config: &CliConfig,
    beneficiary: &Address,
) -> ProcessResult {
    let summary = client.get_beneficiary_summary(beneficiary)?;
    config.output_format.formatted_string(&CliBeneficiarySummary {
        beneficiary: *beneficiary,
        summary,
    })
}

fn process_schedules<S: RpcSender>(
    client: &VestingRpcClient<S>,
    config: &CliConfig,
    beneficiary: &Address,
    now: u64,
) -> ProcessResult {
    let mut store = VestingStore::default();
    mirror_beneficiary(client, beneficiary, &mut store)?;

    let schedules = store
        .list_by_beneficiary(beneficiary)
        .into_iter()
        .map(|schedule| CliSchedule {
            releasable: calculator::releasable_amount(schedule, now).to_string(),
            schedule: schedule.clone(),
        })
        .collect();

    config.output_format.formatted_string(&CliScheduleList {
        beneficiary: *beneficiary,
        now,
        schedules,
        categories: aggregation::summary_by_category(&store, beneficiary, now),
        summary: aggregation::summary(&store, beneficiary, now),
    })
}

pub fn process_schedule_id(config: &CliConfig, beneficiary: &Address, index: u64) -> ProcessResult {
    config.output_format.formatted_string(&CliScheduleId {
        beneficiary: *beneficiary,
        index,
        schedule_id: ScheduleId::derive(beneficiary, index),
    })
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}
