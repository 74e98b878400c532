use super::probe::{coerce_decimals, first_present, first_truthy, identifier, text, FieldPath};
use common::{NormalizedReserve, DEFAULT_DECIMALS};
use log::debug;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::HashMap;

const RESERVE_ID_PATHS: &[FieldPath] =
    &[&["id"], &["reserveId"], &["fields", "id"], &["fields", "metadata", "id"]];
const RESERVE_SYMBOL_PATHS: &[FieldPath] = &[&["symbol"], &["metadata", "symbol"], &["assetSymbol"]];
const RESERVE_COIN_TYPE_PATHS: &[FieldPath] =
    &[&["coinType"], &["metadata", "coinType"], &["assetType"], &["fields", "coin_type"]];
const RESERVE_DECIMALS_PATHS: &[FieldPath] =
    &[&["decimals"], &["metadata", "decimals"], &["fields", "mint_decimals"]];

/// Anything that can answer "what do we know about reserve `id`".
///
/// The answer is a JSON record so that both a built [`ReserveIndex`] and a
/// plain JSON object keyed by reserve id can serve lookups.
pub trait ReserveLookup {
    fn lookup_reserve(&self, id: &str) -> Option<Cow<'_, Value>>;
}

/// Reserve id to [`NormalizedReserve`], keeping first-seen order
#[derive(Debug, Clone, Default)]
pub struct ReserveIndex {
    reserves: Vec<NormalizedReserve>,
    positions: HashMap<String, usize>,
}

impl ReserveIndex {
    /// Build the index from raw reserve records; records without any id are skipped
    pub fn build(raw_reserves: &[Value]) -> Self {
        let mut index = Self::default();
        for raw in raw_reserves {
            match normalize_reserve(raw) {
                Some(reserve) => index.insert(reserve),
                None => debug!("Skipping reserve record without an id"),
            }
        }
        index
    }

    /// Insert a reserve; an existing id keeps its position and takes the new value
    pub fn insert(&mut self, reserve: NormalizedReserve) {
        match self.positions.get(&reserve.id) {
            Some(&position) => self.reserves[position] = reserve,
            None => {
                self.positions.insert(reserve.id.clone(), self.reserves.len());
                self.reserves.push(reserve);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&NormalizedReserve> {
        self.positions.get(id).map(|&position| &self.reserves[position])
    }

    pub fn len(&self) -> usize {
        self.reserves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reserves.is_empty()
    }

    pub fn reserves(&self) -> &[NormalizedReserve] {
        &self.reserves
    }
}

impl ReserveLookup for ReserveIndex {
    fn lookup_reserve(&self, id: &str) -> Option<Cow<'_, Value>> {
        self.get(id).and_then(|reserve| serde_json::to_value(reserve).ok()).map(Cow::Owned)
    }
}

impl ReserveLookup for Map<String, Value> {
    fn lookup_reserve(&self, id: &str) -> Option<Cow<'_, Value>> {
        self.get(id).map(Cow::Borrowed)
    }
}

/// Normalize one raw reserve record; `None` when no id can be extracted
pub fn normalize_reserve(raw: &Value) -> Option<NormalizedReserve> {
    let id = first_truthy(raw, RESERVE_ID_PATHS).and_then(identifier)?;

    Some(NormalizedReserve {
        id,
        symbol: first_truthy(raw, RESERVE_SYMBOL_PATHS).map(text).unwrap_or_default(),
        coin_type: first_truthy(raw, RESERVE_COIN_TYPE_PATHS).map(text).unwrap_or_default(),
        decimals: first_present(raw, RESERVE_DECIMALS_PATHS)
            .and_then(coerce_decimals)
            .unwrap_or(DEFAULT_DECIMALS),
    })
}
