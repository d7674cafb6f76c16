//! Client tests against [`MockSender`].

use {
    crate::{
        abi::{build_call_data_address, encode_schedule, SCHEDULE_LAYOUT, SUMMARY_LEN},
        config::{ClientConfig, Selectors},
        error::ClientError,
        mirror::mirror_beneficiary,
        mock_sender::{MockResponse, MockSender},
        SummaryWords, VestingRpcClient,
    },
    assert_matches::assert_matches,
    vesting_ledger::{
        Amount, Address, BeneficiarySummary, Category, CreateScheduleParams, ScheduleId,
        StoreConfig, VestingError, VestingSchedule, VestingStore, VestingType,
    },
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const CONTRACT: &str = "0x5fbdb2315678afecb367f032d93f642f64180aa3";

fn config() -> ClientConfig {
    ClientConfig {
        contract_address: CONTRACT.to_string(),
        ..ClientConfig::default()
    }
}

fn selectors() -> Selectors {
    config().selectors.resolve().unwrap()
}

fn alice() -> Address {
    "0x00000000000000000000000000000000000a11ce".parse().unwrap()
}

fn bob() -> Address {
    "0x0000000000000000000000000000000000000b0b".parse().unwrap()
}

fn client(sender: MockSender) -> VestingRpcClient<MockSender> {
    VestingRpcClient::new_sender(sender, &config()).unwrap()
}

fn summary_call(beneficiary: &Address) -> Vec<u8> {
    build_call_data_address(selectors().summary, beneficiary)
}

fn count_call(beneficiary: &Address) -> Vec<u8> {
    build_call_data_address(selectors().schedule_count, beneficiary)
}

fn schedule_call(id: &ScheduleId) -> Vec<u8> {
    crate::abi::build_call_data_word(selectors().schedule, id.as_bytes())
}

fn count_word(count: u64) -> Vec<u8> {
    let mut word = vec![0u8; 32];
    word[24..].copy_from_slice(&count.to_be_bytes());
    word
}

fn remote_schedule(beneficiary: Address, index: u64, total: u64) -> VestingSchedule {
    VestingSchedule::from_params(
        CreateScheduleParams {
            beneficiary,
            start: 1_000,
            cliff: 0,
            duration: 100,
            slice_period_seconds: 1,
            revocable: true,
            amount_total: Amount::from(total),
            category: if index % 2 == 0 {
                Category::Ecosystem
            } else {
                Category::Team
            },
            vesting_type: VestingType::Linear,
        },
        index,
    )
}

/// Mock holding `schedules` as `beneficiary`'s remote list.
fn with_schedules(
    mut sender: MockSender,
    beneficiary: &Address,
    schedules: &[VestingSchedule],
) -> MockSender {
    sender = sender.with_bytes(count_call(beneficiary), count_word(schedules.len() as u64));
    for schedule in schedules {
        sender = sender.with_bytes(schedule_call(&schedule.id), encode_schedule(schedule).unwrap());
    }
    sender
}

// ===========================================================================
// 1. Raw calls
// ===========================================================================

#[test]
fn call_sends_eth_call_against_latest() {
    let client = client(MockSender::new());
    let data = summary_call(&alice());
    client.call(client.contract(), &data).unwrap();

    let requests = client.sender().requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request["method"], "eth_call");
    assert_eq!(request["params"][0]["to"], CONTRACT);
    assert_eq!(
        request["params"][0]["data"],
        format!("0x{}", hex::encode(&data))
    );
    assert_eq!(request["params"][1], "latest");
}

#[test]
fn call_uses_configured_block_tag() {
    let config = ClientConfig {
        block_tag: "finalized".to_string(),
        ..config()
    };
    let client = VestingRpcClient::new_sender(MockSender::new(), &config).unwrap();
    client.call(&alice(), &[1, 2, 3, 4]).unwrap();
    assert_eq!(client.sender().requests()[0]["params"][1], "finalized");
}

#[test]
fn remote_error_carries_call_context() {
    let data = summary_call(&alice());
    let sender = MockSender::new().with_response(
        data.clone(),
        MockResponse::RemoteError {
            code: 3,
            message: "execution reverted".to_string(),
        },
    );
    let client = client(sender);

    let err = client.call(client.contract(), &data).unwrap_err();
    assert!(!err.is_retryable());
    assert_matches!(
        err,
        ClientError::Remote { code: 3, ref context, .. }
            if context.contains(CONTRACT) && context.contains(&selectors().summary.to_string())
    );
}

#[test]
fn decode_errors_carry_call_context() {
    let schedule = remote_schedule(alice(), 0, 1_000);
    let mut raw = encode_schedule(&schedule).unwrap();
    let revocable = SCHEDULE_LAYOUT
        .iter()
        .find(|field| field.name == "revocable")
        .unwrap();
    raw[revocable.offset + 31] = 2;

    let sender = MockSender::new()
        .with_bytes(schedule_call(&schedule.id), raw)
        .with_bytes(summary_call(&alice()), vec![0u8; 10]);
    let client = client(sender);

    let err = client.get_schedule(&schedule.id).unwrap_err();
    assert_matches!(
        err,
        ClientError::Decode { ref field, ref context, .. }
            if field == "revocable"
                && context.contains(CONTRACT)
                && context.contains(&selectors().schedule.to_string())
                && context.contains("384 bytes")
    );

    let err = client.get_beneficiary_summary(&alice()).unwrap_err();
    assert_matches!(
        err,
        ClientError::ShortResponse { actual: 10, ref context, .. }
            if context.contains(CONTRACT) && context.contains(&selectors().summary.to_string())
    );
    assert!(err.to_string().contains("10 bytes returned"));
}

#[test]
fn transport_failure_is_retryable() {
    let sender = MockSender::new().with_response(
        summary_call(&alice()),
        MockResponse::TransportError("timed out".to_string()),
    );
    let err = client(sender).get_beneficiary_summary(&alice()).unwrap_err();
    assert_matches!(err, ClientError::Transport { .. });
    assert!(err.is_retryable());
}

#[test]
fn client_requires_contract() {
    assert_matches!(
        VestingRpcClient::new_sender(MockSender::new(), &ClientConfig::default()),
        Err(ClientError::Config(_))
    );
}

// ===========================================================================
// 2. Summary
// ===========================================================================

#[test]
fn empty_summary_response_is_all_zeros() {
    let summary = client(MockSender::new())
        .get_beneficiary_summary(&alice())
        .unwrap();
    assert_eq!(summary, BeneficiarySummary::default());
}

#[test]
fn summary_decoded_from_words() {
    let words = SummaryWords {
        total_amount: Amount::from(3_000u32),
        released_amount: Amount::from(600u32),
        releasable_amount: Amount::from(900u32),
        locked_amount: Amount::from(1_500u32),
        schedule_count: Amount::from(2u32),
    };
    let sender = MockSender::new().with_bytes(
        summary_call(&alice()),
        crate::encode_fixed_summary(&words).unwrap(),
    );
    let summary = client(sender).get_beneficiary_summary(&alice()).unwrap();

    assert_eq!(summary.total_amount, Amount::from(3_000u32));
    assert_eq!(summary.schedule_count, 2);
    assert_eq!(summary.released_pct(), "20.00");
    assert_eq!(summary.locked_pct(), "50.00");
}

#[test]
fn short_summary_response() {
    let sender = MockSender::new().with_bytes(summary_call(&alice()), vec![0u8; SUMMARY_LEN - 32]);
    assert_matches!(
        client(sender).get_beneficiary_summary(&alice()),
        Err(ClientError::ShortResponse { expected: 160, actual: 128, .. })
    );
}

#[test]
fn summaries_keep_input_order() {
    let words = SummaryWords {
        total_amount: Amount::from(10u32),
        schedule_count: Amount::from(1u32),
        ..SummaryWords::default()
    };
    let sender = MockSender::new()
        .with_bytes(
            summary_call(&alice()),
            crate::encode_fixed_summary(&words).unwrap(),
        )
        .with_bytes(summary_call(&bob()), vec![0u8; 7]);
    let client = client(sender);

    let carol = Address::new([0xcc; 20]);
    let results = client.get_summaries(&[alice(), bob(), carol]);
    assert_eq!(results.len(), 3);
    assert_eq!(
        results[0].as_ref().unwrap().total_amount,
        Amount::from(10u32)
    );
    assert_matches!(results[1], Err(ClientError::ShortResponse { .. }));
    assert_eq!(results[2].as_ref().unwrap(), &BeneficiarySummary::default());
    assert_eq!(client.sender().request_count(), 3);
}

// ===========================================================================
// 3. Schedules
// ===========================================================================

#[test]
fn schedule_count_decoding() {
    let sender = MockSender::new()
        .with_bytes(count_call(&alice()), count_word(5))
        .with_bytes(count_call(&bob()), vec![0u8; 31]);
    let client = client(sender);

    assert_eq!(client.get_schedule_count(&alice()).unwrap(), 5);
    assert_eq!(client.get_schedule_count(&Address::new([9; 20])).unwrap(), 0);
    assert_matches!(
        client.get_schedule_count(&bob()),
        Err(ClientError::ShortResponse { .. })
    );
}

#[test]
fn uninitialized_schedule() {
    let id = ScheduleId::derive(&alice(), 0);
    assert_matches!(
        client(MockSender::new()).get_schedule(&id),
        Err(ClientError::Ledger(VestingError::NotInitialized(missing))) if missing == id
    );
}

#[test]
fn schedules_fetched_in_index_order() {
    let schedules = [
        remote_schedule(alice(), 0, 100),
        remote_schedule(alice(), 1, 200),
    ];
    let client = client(with_schedules(MockSender::new(), &alice(), &schedules));

    let fetched = client.get_schedules_for_beneficiary(&alice()).unwrap();
    assert_eq!(fetched, schedules.to_vec());
    // One count query plus one query per schedule.
    assert_eq!(client.sender().request_count(), 3);
}

// ===========================================================================
// 4. Mirroring
// ===========================================================================

#[test]
fn mirror_hydrates_store() {
    let mut released = remote_schedule(alice(), 1, 200);
    released.released = Amount::from(50u32);
    let schedules = [remote_schedule(alice(), 0, 100), released];
    let client = client(with_schedules(MockSender::new(), &alice(), &schedules));

    let mut store = VestingStore::new(StoreConfig::default());
    assert_eq!(mirror_beneficiary(&client, &alice(), &mut store).unwrap(), 2);
    assert_eq!(store.count_by_beneficiary(&alice()), 2);
    assert_eq!(
        store.releasable(&schedules[1].id, 1_050).unwrap(),
        Amount::from(50u32)
    );

    let summary = vesting_ledger::aggregation::summary(&store, &alice(), 1_050);
    assert_eq!(summary.total_amount, Amount::from(300u32));
    assert_eq!(summary.released_amount, Amount::from(50u32));

    // Nothing new remotely: no schedule queries, nothing adopted.
    assert_eq!(mirror_beneficiary(&client, &alice(), &mut store).unwrap(), 0);
}

#[test]
fn mirror_only_fetches_new_indices() {
    let first = [remote_schedule(alice(), 0, 100)];
    let mut store = VestingStore::new(StoreConfig::default());
    mirror_beneficiary(
        &client(with_schedules(MockSender::new(), &alice(), &first)),
        &alice(),
        &mut store,
    )
    .unwrap();

    let both = [first[0].clone(), remote_schedule(alice(), 1, 200)];
    let client = client(with_schedules(MockSender::new(), &alice(), &both));
    assert_eq!(mirror_beneficiary(&client, &alice(), &mut store).unwrap(), 1);

    let queried: Vec<_> = client
        .sender()
        .requests()
        .iter()
        .map(|r| r["params"][0]["data"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(queried.len(), 2);
    assert_eq!(
        queried[1],
        format!("0x{}", hex::encode(schedule_call(&both[1].id)))
    );
}

#[test]
fn mirror_rejects_foreign_schedule() {
    // The remote answers alice's index 0 with a record belonging to bob.
    let mut foreign = remote_schedule(bob(), 0, 100);
    foreign.id = ScheduleId::derive(&alice(), 0);
    let sender = MockSender::new()
        .with_bytes(count_call(&alice()), count_word(1))
        .with_bytes(schedule_call(&foreign.id), encode_schedule(&foreign).unwrap());

    let mut store = VestingStore::new(StoreConfig::default());
    assert_matches!(
        mirror_beneficiary(&client(sender), &alice(), &mut store),
        Err(ClientError::Ledger(VestingError::ScheduleIdMismatch { .. }))
    );
    assert_eq!(store.total_count(), 0);
}

#[test]
fn mirror_keeps_revoked_schedules_frozen() {
    let mut revoked = remote_schedule(alice(), 0, 1_000);
    revoked.released = Amount::from(400u32);
    revoked.revoked = true;
    let client = client(with_schedules(MockSender::new(), &alice(), &[revoked.clone()]));

    let mut store = VestingStore::new(StoreConfig::default());
    mirror_beneficiary(&client, &alice(), &mut store).unwrap();
    assert_eq!(store.releasable(&revoked.id, 5_000).unwrap(), Amount::from(0u32));
    assert_matches!(
        store.revoke(&revoked.id, 5_000),
        Err(VestingError::AlreadyRevoked(_))
    );
}
