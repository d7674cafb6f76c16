//! Property-based tests for the remote response word codec.
//!
//! Properties tested:
//! 1. Summary words survive encode/decode for every 256-bit value
//! 2. Any response shorter than five words (but not empty) is rejected
//! 3. Schedule records survive encode/decode
//! 4. Call data always has the fixed selector ‖ padded-argument shape

#[cfg(test)]
mod tests {
    use {
        proptest::prelude::*,
        vesting_ledger::{
            Address, Amount, Category, CreateScheduleParams, ScheduleId, VestingSchedule,
            VestingType,
        },
        vesting_rpc_client::{
            abi::{decode_schedule, encode_schedule, SUMMARY_LEN},
            build_call_data, decode_fixed_summary, encode_fixed_summary, ClientError, Selector,
            SummaryWords,
        },
    };

    fn word() -> impl Strategy<Value = Amount> {
        any::<[u8; 32]>().prop_map(|bytes| Amount::from_bytes_be(&bytes))
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 1. Summary round trip
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn summary_words_round_trip(
            total in word(),
            released in word(),
            releasable in word(),
            locked in word(),
            count in word(),
        ) {
            let words = SummaryWords {
                total_amount: total,
                released_amount: released,
                releasable_amount: releasable,
                locked_amount: locked,
                schedule_count: count,
            };
            let raw = encode_fixed_summary(&words).unwrap();
            prop_assert_eq!(raw.len(), SUMMARY_LEN);
            prop_assert_eq!(decode_fixed_summary(&raw).unwrap(), words);
        }

        #[test]
        fn short_summary_rejected(len in 1usize..SUMMARY_LEN, fill in any::<u8>()) {
            let raw = vec![fill; len];
            let is_short = matches!(
                decode_fixed_summary(&raw),
                Err(ClientError::ShortResponse { actual, .. }) if actual == len
            );
            prop_assert!(is_short);
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 2. Schedule round trip
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn schedule_round_trip(
            beneficiary in any::<[u8; 20]>(),
            index in any::<u64>(),
            (start, cliff, duration, slice) in (any::<u64>(), any::<u64>(), any::<u64>(), any::<u64>()),
            total in word(),
            released in word(),
            flags in any::<(bool, bool)>(),
            category in 0usize..4,
            vesting_type in prop_oneof![
                Just(VestingType::Linear),
                Just(VestingType::Milestone),
                Just(VestingType::CliffLinear),
            ],
        ) {
            let beneficiary = Address::new(beneficiary);
            let mut schedule = VestingSchedule::from_params(
                CreateScheduleParams {
                    beneficiary,
                    start,
                    cliff,
                    duration,
                    slice_period_seconds: slice,
                    revocable: flags.0,
                    amount_total: total,
                    category: Category::ALL[category],
                    vesting_type,
                },
                index,
            );
            schedule.released = released;
            schedule.revoked = flags.1;

            let raw = encode_schedule(&schedule).unwrap();
            let decoded = decode_schedule(ScheduleId::derive(&beneficiary, index), &raw).unwrap();
            prop_assert_eq!(decoded, schedule);
        }

        #[test]
        fn call_data_shape(address in any::<[u8; 20]>(), selector in any::<[u8; 4]>()) {
            let address = Address::new(address);
            let data = build_call_data(Selector::new(selector), &address.to_string()).unwrap();
            prop_assert_eq!(data.len(), 36);
            prop_assert_eq!(&data[..4], &selector[..]);
            prop_assert!(data[4..16].iter().all(|b| *b == 0));
            prop_assert_eq!(&data[16..], &address.as_bytes()[..]);
        }
    }
}
