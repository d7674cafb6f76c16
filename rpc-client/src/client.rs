//! Read-only queries against a remote vesting ledger.

use {
    crate::{
        abi::{
            build_call_data_address, build_call_data_word, decode_fixed_summary, decode_schedule,
            Selector, WORD_LEN,
        },
        config::{ClientConfig, Selectors},
        error::{ClientError, Result},
        http_sender::HttpSender,
        rpc_sender::RpcSender,
    },
    log::{debug, warn},
    num_traits::ToPrimitive,
    rayon::prelude::*,
    serde_json::{json, Value},
    vesting_ledger::{
        Address, Amount, BeneficiarySummary, ScheduleId, VestingError, VestingSchedule,
    },
};

/// Client for the vesting ledger's read methods.
///
/// Holds no mutable state: each query is an independent `eth_call`, so one
/// client can be shared across threads. There is no automatic retry; see
/// [`ClientError::is_retryable`].
#[derive(Debug)]
pub struct VestingRpcClient<S: RpcSender = HttpSender> {
    sender: S,
    contract: Address,
    block_tag: String,
    selectors: Selectors,
}

impl VestingRpcClient<HttpSender> {
    /// Create an HTTP client from a validated configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let sender = HttpSender::new_with_timeout(&config.json_rpc_url, config.timeout())?;
        Self::new_sender(sender, config)
    }
}

impl<S: RpcSender> VestingRpcClient<S> {
    /// Create a client over any [`RpcSender`]. The sender's own endpoint
    /// wins over `config.json_rpc_url`.
    pub fn new_sender(sender: S, config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            sender,
            contract: config.contract()?,
            block_tag: config.block_tag.clone(),
            selectors: config.selectors.resolve()?,
        })
    }

    pub fn contract(&self) -> &Address {
        &self.contract
    }

    pub fn url(&self) -> String {
        self.sender.url()
    }

    pub fn sender(&self) -> &S {
        &self.sender
    }

    /// Issue one `eth_call` of `data` against `target` and return the raw
    /// return bytes.
    pub fn call(&self, target: &Address, data: &[u8]) -> Result<Vec<u8>> {
        let params = json!([
            {
                "to": target.to_string(),
                "data": format!("0x{}", hex::encode(data)),
            },
            self.block_tag,
        ]);

        let result = self
            .sender
            .send("eth_call", params)
            .map_err(|err| err.with_context(call_context(target, data)))?;

        let raw = match &result {
            Value::String(s) => hex::decode(s.trim_start_matches("0x")).map_err(|e| {
                ClientError::decode("eth_call result", e).with_context(call_context(target, data))
            })?,
            Value::Null => Vec::new(),
            other => {
                return Err(ClientError::decode(
                    "eth_call result",
                    format!("expected a hex string, got {other}"),
                )
                .with_context(call_context(target, data)))
            }
        };
        debug!("eth_call to {} returned {} bytes", target, raw.len());
        Ok(raw)
    }

    /// Call the ledger contract with `data` and decode the reply. Decode
    /// failures name the target, the selector and the raw length.
    fn call_and_decode<T>(
        &self,
        data: &[u8],
        decode: impl FnOnce(&[u8]) -> Result<T>,
    ) -> Result<T> {
        let raw = self.call(&self.contract, data)?;
        decode(&raw).map_err(|err| {
            err.with_context(format!(
                "{}, {} bytes returned",
                call_context(&self.contract, data),
                raw.len()
            ))
        })
    }

    /// Aggregate totals for `beneficiary` as computed by the remote ledger.
    pub fn get_beneficiary_summary(&self, beneficiary: &Address) -> Result<BeneficiarySummary> {
        let data = build_call_data_address(self.selectors.summary, beneficiary);
        self.call_and_decode(&data, |raw| decode_fixed_summary(raw)?.into_summary())
    }

    pub fn get_schedule_count(&self, beneficiary: &Address) -> Result<u64> {
        let data = build_call_data_address(self.selectors.schedule_count, beneficiary);
        self.call_and_decode(&data, decode_count)
    }

    /// Fetch one schedule. Ids the remote ledger never initialized fail with
    /// [`VestingError::NotInitialized`].
    pub fn get_schedule(&self, id: &ScheduleId) -> Result<VestingSchedule> {
        let data = build_call_data_word(self.selectors.schedule, id.as_bytes());
        let schedule = self.call_and_decode(&data, |raw| decode_schedule(*id, raw))?;
        if !schedule.initialized {
            return Err(VestingError::NotInitialized(*id).into());
        }
        Ok(schedule)
    }

    /// Every schedule of `beneficiary`, in index order.
    pub fn get_schedules_for_beneficiary(
        &self,
        beneficiary: &Address,
    ) -> Result<Vec<VestingSchedule>> {
        self.get_schedules_from_index(beneficiary, 0)
    }

    /// Schedules of `beneficiary` from index `first` to the current count.
    pub fn get_schedules_from_index(
        &self,
        beneficiary: &Address,
        first: u64,
    ) -> Result<Vec<VestingSchedule>> {
        let count = self.get_schedule_count(beneficiary)?;
        debug!("{} has {} remote schedules", beneficiary, count);
        (first..count)
            .map(|index| self.get_schedule(&ScheduleId::derive(beneficiary, index)))
            .collect()
    }

    /// Summaries for many beneficiaries, queried in parallel. Results keep
    /// the input order; one failure does not affect the others.
    pub fn get_summaries(&self, beneficiaries: &[Address]) -> Vec<Result<BeneficiarySummary>> {
        beneficiaries
            .par_iter()
            .map(|beneficiary| {
                self.get_beneficiary_summary(beneficiary).inspect_err(|err| {
                    warn!("summary query for {} failed: {}", beneficiary, err);
                })
            })
            .collect()
    }
}

fn call_context(target: &Address, data: &[u8]) -> String {
    let selector = data.get(..Selector::LEN).map(hex::encode).unwrap_or_default();
    format!("eth_call to {target} selector 0x{selector}")
}

/// Decode the single-word `scheduleCount` reply. An empty reply counts as
/// zero.
fn decode_count(raw: &[u8]) -> Result<u64> {
    let mut word = [0u8; WORD_LEN];
    match raw.len() {
        0 => {}
        len if len >= WORD_LEN => word.copy_from_slice(&raw[..WORD_LEN]),
        len => return Err(ClientError::short_response("schedule count", WORD_LEN, len)),
    }
    Amount::from_bytes_be(&word)
        .to_u64()
        .ok_or_else(|| ClientError::decode("scheduleCount", "value exceeds u64"))
}
