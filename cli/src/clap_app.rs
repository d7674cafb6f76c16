use {
    crate::vesting::VestingSubCommands,
    clap::{App, AppSettings, Arg},
};

pub fn get_clap_app<'ab, 'v>(name: &str, about: &'ab str, version: &'v str) -> App<'ab, 'v> {
    App::new(name)
        .about(about)
        .version(version)
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("config_file")
                .short("C")
                .long("config")
                .value_name("FILEPATH")
                .takes_value(true)
                .global(true)
                .help("YAML client configuration file"),
        )
        .arg(
            Arg::with_name("json_rpc_url")
                .short("u")
                .long("url")
                .value_name("URL")
                .takes_value(true)
                .global(true)
                .help("JSON RPC URL of the node serving the vesting ledger"),
        )
        .arg(
            Arg::with_name("contract")
                .long("contract")
                .value_name("ADDRESS")
                .takes_value(true)
                .global(true)
                .help("Address of the vesting ledger contract"),
        )
        .arg(
            Arg::with_name("timeout_ms")
                .long("timeout-ms")
                .value_name("MILLISECONDS")
                .takes_value(true)
                .global(true)
                .help("Per-request timeout [default: 30000]"),
        )
        .arg(
            Arg::with_name("output_format")
                .long("output")
                .value_name("FORMAT")
                .global(true)
                .takes_value(true)
                .possible_values(&["display", "json", "json-compact"])
                .help("Return information in specified output format"),
        )
        .vesting_subcommands()
}
