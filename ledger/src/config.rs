use serde::{Deserialize, Serialize};

/// What `revoke` does with the amount that has vested but not been released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RevocationPolicy {
    /// Release the vested remainder to the beneficiary as part of the
    /// revocation. Nothing is claimable afterwards.
    #[default]
    AutoRelease,

    /// Stop accrual at the revocation instant but leave the vested remainder
    /// claimable through ordinary `release` calls.
    FreezeClaimable,
}

/// Configuration for a [`crate::store::VestingStore`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Revocation behaviour. Defaults to [`RevocationPolicy::AutoRelease`],
    /// matching the deployed ledger contract.
    pub revocation_policy: RevocationPolicy,
}

impl StoreConfig {
    pub fn with_policy(revocation_policy: RevocationPolicy) -> Self {
        Self { revocation_policy }
    }
}
