use super::{
    probe::{coerce_decimals, coerce_number, first_present, first_truthy, identifier, text, FieldPath},
    reserve_index::ReserveLookup,
    shape::ObligationShape,
};
use common::{NormalizedEntry, NormalizedObligation, DEFAULT_DECIMALS};
use log::debug;
use serde_json::Value;

const ENTRY_RESERVE_ID_PATHS: &[FieldPath] = &[
    &["reserveId"],
    &["reserve_id"],
    &["reserve"],
    &["reserveID"],
    &["reserve_id_ref"],
    &["id"],
    &["fields", "reserveId"],
    &["fields", "reserve", "id"],
];
const ENTRY_SYMBOL_PATHS: &[FieldPath] = &[&["symbol"]];
const ENTRY_COIN_TYPE_PATHS: &[FieldPath] = &[&["coinType"], &["fields", "coin_type"]];
const ENTRY_DECIMALS_PATHS: &[FieldPath] = &[&["decimals"]];
const ENTRY_AMOUNT_PATHS: &[FieldPath] = &[
    &["amount"],
    &["balance"],
    &["principal"],
    &["deposited"],
    &["depositedBalance"],
    &["borrowed"],
];

const RESERVE_SYMBOL_PATHS: &[FieldPath] = &[&["symbol"], &["assetSymbol"], &["ticker"]];
const RESERVE_COIN_TYPE_PATHS: &[FieldPath] = &[&["coinType"], &["assetType"]];
const RESERVE_DECIMALS_PATHS: &[FieldPath] = &[&["decimals"]];

/// Normalize one raw obligation against a reserve lookup.
///
/// Never fails: a record without any known position list yields empty
/// deposits and borrows, and every unresolved field takes its default.
pub fn normalize_obligation<L>(raw: &Value, reserves: &L) -> NormalizedObligation
where
    L: ReserveLookup + ?Sized,
{
    let shape = ObligationShape::detect(raw);
    if !shape.is_recognized() {
        debug!("Obligation has no recognized deposit or borrow list");
    }

    NormalizedObligation {
        deposits: shape.deposits(raw).iter().map(|entry| normalize_entry(entry, reserves)).collect(),
        borrows: shape.borrows(raw).iter().map(|entry| normalize_entry(entry, reserves)).collect(),
        raw: raw.clone(),
    }
}

/// Normalize one deposit or borrow line
pub fn normalize_entry<L>(entry: &Value, reserves: &L) -> NormalizedEntry
where
    L: ReserveLookup + ?Sized,
{
    let reserve_id = first_truthy(entry, ENTRY_RESERVE_ID_PATHS).and_then(identifier);
    let reserve = reserve_id
        .as_deref()
        .and_then(|id| reserves.lookup_reserve(id))
        .map(|reserve| reserve.into_owned())
        .unwrap_or(Value::Null);

    let symbol = first_truthy(entry, ENTRY_SYMBOL_PATHS)
        .or_else(|| first_truthy(&reserve, RESERVE_SYMBOL_PATHS))
        .map(text)
        .unwrap_or_default();
    let coin_type = first_truthy(entry, ENTRY_COIN_TYPE_PATHS)
        .or_else(|| first_truthy(&reserve, RESERVE_COIN_TYPE_PATHS))
        .map(text)
        .unwrap_or_default();
    let decimals = first_present(entry, ENTRY_DECIMALS_PATHS)
        .or_else(|| first_present(&reserve, RESERVE_DECIMALS_PATHS))
        .and_then(coerce_decimals)
        .unwrap_or(DEFAULT_DECIMALS);

    let amount_raw = first_present(entry, ENTRY_AMOUNT_PATHS).map_or(0.0, coerce_number);
    let amount_human = match entry.get("amountHuman") {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        _ => to_human(amount_raw, decimals),
    };

    NormalizedEntry {
        reserve_id,
        coin_type,
        symbol,
        decimals,
        amount_raw,
        amount_human,
        raw: entry.clone(),
    }
}

/// Scale a raw on-chain amount down by `10^decimals`
pub fn to_human(amount_raw: f64, decimals: u8) -> f64 {
    amount_raw / 10f64.powi(i32::from(decimals))
}
