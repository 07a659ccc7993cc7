use alloc::sync::Arc;
use core::any::TypeId;
use std::sync::{PoisonError, RwLock};

use crate::contract::{Contract, DefaultContractResolver};
use crate::hash::{FixedHashState, HashMap};

type ContractMap = HashMap<(TypeId, DefaultContractResolver), Arc<Contract>>;

static CONTRACTS: RwLock<ContractMap> = RwLock::new(HashMap::with_hasher(FixedHashState));

pub(crate) fn get(key: &(TypeId, DefaultContractResolver)) -> Option<Arc<Contract>> {
    CONTRACTS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(key)
        .cloned()
}

/// Publishes `contract` unless another thread won the race, returning the
/// published one.
pub(crate) fn publish(key: (TypeId, DefaultContractResolver), contract: Contract) -> Arc<Contract> {
    let mut map = CONTRACTS.write().unwrap_or_else(PoisonError::into_inner);
    Arc::clone(map.entry(key).or_insert_with(|| Arc::new(contract)))
}

/// Drops every cached contract.
///
/// Contracts are never invalidated on their own; this exists for tests that
/// need a cold cache.
pub fn clear_contract_cache() {
    CONTRACTS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .clear();
}
