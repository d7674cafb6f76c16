//! Hydrating a local [`VestingStore`] from the remote ledger.

use {
    crate::{client::VestingRpcClient, error::Result, rpc_sender::RpcSender},
    log::info,
    vesting_ledger::{Address, ScheduleBackend, VestingStore},
};

/// Copy `beneficiary`'s remote schedules that the store does not hold yet.
///
/// Schedules are adopted in index order starting at the store's current
/// count for the beneficiary, so every derived id is checked against the
/// local sequence. Schedules already mirrored are not refreshed. Returns the
/// number of schedules adopted.
pub fn mirror_beneficiary<S: RpcSender, B: ScheduleBackend>(
    client: &VestingRpcClient<S>,
    beneficiary: &Address,
    store: &mut VestingStore<B>,
) -> Result<usize> {
    let first = store.count_by_beneficiary(beneficiary);
    let schedules = client.get_schedules_from_index(beneficiary, first)?;
    let adopted = schedules.len();

    for schedule in schedules {
        store.adopt(schedule)?;
    }

    info!(
        "mirrored {} schedules for {} from {} ({} held locally)",
        adopted,
        beneficiary,
        client.url(),
        store.count_by_beneficiary(beneficiary)
    );
    Ok(adopted)
}
