pub mod clap_app;
pub mod cli;
pub mod vesting;
