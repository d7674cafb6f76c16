//! Read-only client for a remote vesting ledger.
//!
//! Queries go out as JSON-RPC `eth_call` requests through an [`RpcSender`]:
//! [`HttpSender`] for real endpoints, [`MockSender`] for tests. Responses are
//! fixed-width word sequences decoded by the layout tables in [`abi`].

pub mod abi;
pub mod client;
pub mod config;
pub mod error;
pub mod http_sender;
pub mod mirror;
pub mod mock_sender;
pub mod rpc_sender;

#[cfg(test)]
mod tests;

pub use {
    abi::{
        build_call_data, build_call_data_word, decode_fixed_summary, encode_fixed_summary,
        Selector, SummaryWords,
    },
    client::VestingRpcClient,
    config::{ClientConfig, SelectorConfig},
    error::ClientError,
    http_sender::HttpSender,
    mirror::mirror_beneficiary,
    mock_sender::{MockResponse, MockSender},
    rpc_sender::RpcSender,
};
