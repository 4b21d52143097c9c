//! Infrastructure account classification.
//!
//! Pool reserves, the dust collector and the farming module's staking
//! reserves hold protocol-owned coins. Their holdings are already credited
//! to users through pool shares and stake records, so they never get an
//! exposure row.

use genesis_exposure_data::Snapshot;
use genesis_exposure_domain::entities::Pool;
use std::collections::HashSet;
use tracing::debug;

/// Addresses excluded from per-account aggregation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReserveAccountSet {
    addresses: HashSet<String>,
}

impl ReserveAccountSet {
    /// Union of pool reserve addresses, the dust collector and the given
    /// staking reserve addresses. Empty addresses are ignored.
    #[must_use]
    pub fn build<'a, I>(pools: &[Pool], dust_collector: &str, staking_reserves: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let addresses: HashSet<String> = pools
            .iter()
            .map(|pool| pool.reserve_address.clone())
            .chain(std::iter::once(dust_collector.to_owned()))
            .chain(staking_reserves.into_iter().map(str::to_owned))
            .filter(|address| !address.is_empty())
            .collect();

        debug!(accounts = addresses.len(), "Classified reserve accounts");
        Self { addresses }
    }

    /// Builds the set for a snapshot, including the staking reserve of every
    /// tracked denomination the farming module knows about.
    #[must_use]
    pub fn from_snapshot(snapshot: &Snapshot, tracked_denoms: &[String]) -> Self {
        let staking_reserves = tracked_denoms
            .iter()
            .filter_map(|denom| snapshot.staking_reserve_of(denom));
        Self::build(
            &snapshot.pools,
            &snapshot.params.dust_collector_address,
            staking_reserves,
        )
    }

    /// Whether `address` is an infrastructure account.
    #[must_use]
    pub fn contains(&self, address: &str) -> bool {
        self.addresses.contains(address)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}
