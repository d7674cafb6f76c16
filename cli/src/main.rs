use {
    log::error,
    std::process::exit,
    vesting_cli::{
        clap_app::get_clap_app,
        cli::{parse_config, process_command, CliError},
        vesting::parse_vesting_command,
    },
};

fn do_main() -> Result<String, CliError> {
    let matches = get_clap_app(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
    )
    .get_matches();

    let config = parse_config(&matches)?;
    let command = parse_vesting_command(&matches)?;
    process_command(&config, &command)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match do_main() {
        Ok(output) => println!("{output}"),
        Err(err) => {
            error!("{err}");
            eprintln!("Error: {err}");
            exit(1);
        }
    }
}
