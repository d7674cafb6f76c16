//! Property-based tests for vesting schedule invariants.
//!
//! Properties tested:
//! 1. Released never exceeds the schedule total
//! 2. Vested amount is monotone in time and hits the boundaries exactly
//! 3. Revocation freezes the releasable amount under both policies
//! 4. Summaries are additive and locked = total - released - releasable
//! 5. Ids follow the per-beneficiary index regardless of revocations

#[cfg(test)]
mod tests {
    use {
        num_traits::Zero,
        proptest::prelude::*,
        vesting_ledger::{
            aggregation::{summary, summary_by_category},
            calculator::{releasable_amount, vested_amount},
            Address, Amount, Category, CreateScheduleParams, RevocationPolicy, ScheduleId,
            StoreConfig, VestingSchedule, VestingStore, VestingType,
        },
    };

    const START: u64 = 1_600_000_000;

    fn beneficiary(tag: u8) -> Address {
        Address::new([tag; 20])
    }

    /// Valid time-based creation parameters.
    fn arb_params() -> impl Strategy<Value = CreateScheduleParams> {
        (1u64..=200_000)
            .prop_flat_map(|duration| {
                (
                    Just(duration),
                    0..=duration,
                    1u64..=duration.saturating_mul(2),
                    1u64..=u64::MAX,
                    any::<bool>(),
                    prop_oneof![Just(VestingType::Linear), Just(VestingType::CliffLinear)],
                    0usize..4,
                )
            })
            .prop_map(
                |(duration, cliff, slice, total, revocable, vesting_type, category)| {
                    CreateScheduleParams {
                        beneficiary: beneficiary(1),
                        start: START,
                        cliff,
                        duration,
                        slice_period_seconds: slice,
                        revocable,
                        amount_total: Amount::from(total),
                        category: Category::ALL[category],
                        vesting_type,
                    }
                },
            )
    }

    fn schedule(params: CreateScheduleParams) -> VestingSchedule {
        VestingSchedule::from_params(params, 0)
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 1. Released never exceeds total
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn released_never_exceeds_total(
            params in arb_params(),
            mut offsets in prop::collection::vec(0u64..400_000, 1..20),
            fraction_pct in 1u32..=100,
        ) {
            offsets.sort_unstable();
            let mut store = VestingStore::new(StoreConfig::default());
            let id = store.create(params).unwrap();

            for offset in offsets {
                let now = START + offset;
                let releasable = store.releasable(&id, now).unwrap();
                let request = &releasable * fraction_pct / 100u32;
                store.release(&id, request, now).unwrap();

                let s = store.get(&id).unwrap();
                prop_assert!(s.released <= s.amount_total);
                let over = releasable_amount(s, now) + 1u32;
                prop_assert!(store.release(&id, over, now).is_err());
            }
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 2. Monotone curve with exact boundaries
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn vested_is_monotone(params in arb_params(), a in 0u64..400_000, b in 0u64..400_000) {
            let s = schedule(params);
            let (early, late) = if a <= b { (a, b) } else { (b, a) };
            let v_early = vested_amount(&s, START + early);
            let v_late = vested_amount(&s, START + late);
            prop_assert!(v_early <= v_late, "vested fell from {} to {}", v_early, v_late);
            prop_assert!(v_late <= s.amount_total);
        }

        #[test]
        fn boundaries_are_exact(params in arb_params()) {
            let s = schedule(params);
            if s.cliff > 0 {
                prop_assert!(releasable_amount(&s, s.cliff_end() - 1).is_zero());
            }
            prop_assert!(releasable_amount(&s, START.saturating_sub(1)).is_zero());
            prop_assert_eq!(releasable_amount(&s, s.end()), s.amount_total.clone());
            prop_assert_eq!(releasable_amount(&s, u64::MAX), s.amount_total.clone());
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 3. Revocation freezes the curve
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn revocation_freezes_releasable(
            mut params in arb_params(),
            revoke_at in 0u64..400_000,
            later in prop::collection::vec(0u64..1_000_000, 1..10),
            freeze in any::<bool>(),
        ) {
            params.revocable = true;
            let policy = if freeze {
                RevocationPolicy::FreezeClaimable
            } else {
                RevocationPolicy::AutoRelease
            };
            let mut store = VestingStore::new(StoreConfig::with_policy(policy));
            let id = store.create(params).unwrap();

            let revoke_time = START + revoke_at;
            let vested = vested_amount(store.get(&id).unwrap(), revoke_time);
            let forfeited = store.revoke(&id, revoke_time).unwrap();
            prop_assert_eq!(&forfeited + &vested, store.get(&id).unwrap().amount_total.clone());

            let frozen = store.releasable(&id, revoke_time).unwrap();
            if !freeze {
                prop_assert!(frozen.is_zero());
            }
            for delta in later {
                let now = revoke_time.saturating_add(delta);
                prop_assert_eq!(store.releasable(&id, now).unwrap(), frozen.clone());
            }
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 4. Summaries are additive
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn summary_is_additive(
            schedules in prop::collection::vec((arb_params(), 0u64..400_000), 1..8),
            now_offset in 0u64..400_000,
        ) {
            let mut store = VestingStore::new(StoreConfig::default());
            for (params, release_offset) in schedules {
                let id = store.create(params).unwrap();
                let at = START + release_offset;
                let releasable = store.releasable(&id, at).unwrap();
                store.release(&id, releasable, at).unwrap();
            }

            let now = START + now_offset;
            let s = summary(&store, &beneficiary(1), now);
            prop_assert_eq!(&s, &summary(&store, &beneficiary(1), now));

            let listed = store.list_by_beneficiary(&beneficiary(1));
            let total: Amount = listed.iter().map(|x| x.amount_total.clone()).sum();
            let released: Amount = listed.iter().map(|x| x.released.clone()).sum();
            let releasable: Amount = listed.iter().map(|x| releasable_amount(x, now)).sum();
            prop_assert_eq!(&s.total_amount, &total);
            prop_assert_eq!(&s.released_amount, &released);
            prop_assert_eq!(&s.releasable_amount, &releasable);
            prop_assert_eq!(&s.locked_amount + &released + &releasable, total);
            prop_assert_eq!(s.schedule_count, listed.len() as u64);

            let by_category = summary_by_category(&store, &beneficiary(1), now);
            let category_count: usize = by_category.iter().map(|c| c.schedule_ids.len()).sum();
            prop_assert_eq!(category_count, listed.len());
            prop_assert!(by_category.iter().all(|c| !c.schedule_ids.is_empty()));
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 5. Stable ids
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn ids_follow_index(
            owners in prop::collection::vec(1u8..4, 1..20),
            revoke_mask in any::<u32>(),
        ) {
            let mut store = VestingStore::new(StoreConfig::default());
            let mut created = Vec::new();
            for (i, owner) in owners.iter().enumerate() {
                let predicted = store.next_schedule_id(&beneficiary(*owner));
                let params = CreateScheduleParams {
                    beneficiary: beneficiary(*owner),
                    start: START,
                    cliff: 0,
                    duration: 100,
                    slice_period_seconds: 1,
                    revocable: true,
                    amount_total: Amount::from(1_000u32),
                    category: Category::Ecosystem,
                    vesting_type: VestingType::Linear,
                };
                let id = store.create(params).unwrap();
                prop_assert_eq!(id, predicted);
                if revoke_mask & (1 << (i % 32)) != 0 {
                    store.revoke(&id, START + 50).unwrap();
                }
                created.push((*owner, id));
            }

            for owner in 1u8..4 {
                let ids: Vec<ScheduleId> = created
                    .iter()
                    .filter(|(o, _)| *o == owner)
                    .map(|(_, id)| *id)
                    .collect();
                for (index, id) in ids.iter().enumerate() {
                    prop_assert_eq!(*id, ScheduleId::derive(&beneficiary(owner), index as u64));
                    prop_assert_eq!(
                        store.id_at_index(&beneficiary(owner), index as u64).unwrap(),
                        *id
                    );
                }
                prop_assert_eq!(store.count_by_beneficiary(&beneficiary(owner)), ids.len() as u64);
            }
        }
    }
}
