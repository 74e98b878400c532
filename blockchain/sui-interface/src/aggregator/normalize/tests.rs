use crate::aggregator::normalize::{
    normalize_entry, normalize_obligation, to_human, DepositField, ReserveIndex,
};
use proptest::prelude::*;
use serde_json::{json, Map, Value};
use strum::IntoEnumIterator;

fn plain_index(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

#[test]
fn test_single_sui_deposit() {
    let raw = json!({ "deposits": [{ "reserveId": "r1", "amount": 1_000_000_000u64 }] });
    let reserves = plain_index(json!({ "r1": { "symbol": "SUI", "decimals": 9 } }));

    let normalized = normalize_obligation(&raw, &reserves);
    assert_eq!(normalized.deposits.len(), 1);
    assert!(normalized.borrows.is_empty());

    let deposit = &normalized.deposits[0];
    assert_eq!(deposit.reserve_id.as_deref(), Some("r1"));
    assert_eq!(deposit.symbol, "SUI");
    assert_eq!(deposit.decimals, 9);
    assert_eq!(deposit.amount_raw, 1_000_000_000.0);
    assert_eq!(deposit.amount_human, 1.0);
    assert_eq!(normalized.raw, raw);
}

#[test]
fn test_every_deposit_field_name_is_recognized() {
    let reserves = ReserveIndex::default();

    for field in DepositField::iter() {
        let mut raw = Map::new();
        raw.insert(field.to_string(), json!([{ "amount": 5 }, { "amount": 7 }]));
        let normalized = normalize_obligation(&Value::Object(raw), &reserves);

        assert_eq!(normalized.deposits.len(), 2, "field {}", field);
        assert_eq!(normalized.deposits[1].amount_raw, 7.0);
    }
}

#[test]
fn test_borrow_balances_are_recognized() {
    let raw = json!({ "borrowBalances": [{ "reserveId": "r1", "borrowed": "2500000" }] });
    let reserves = ReserveIndex::build(&[json!({ "id": "r1", "symbol": "USDC", "decimals": 6 })]);

    let normalized = normalize_obligation(&raw, &reserves);
    assert!(normalized.deposits.is_empty());
    assert_eq!(normalized.borrows.len(), 1);
    assert_eq!(normalized.borrows[0].symbol, "USDC");
    assert_eq!(normalized.borrows[0].amount_raw, 2_500_000.0);
    assert_eq!(normalized.borrows[0].amount_human, 2.5);
}

#[test]
fn test_unrecognized_obligation_is_empty() {
    let reserves = ReserveIndex::default();

    for raw in [json!({}), json!({ "positions": [1, 2] }), json!(null), json!("0xabc")] {
        let normalized = normalize_obligation(&raw, &reserves);
        assert!(normalized.deposits.is_empty());
        assert!(normalized.borrows.is_empty());
    }
}

#[test]
fn test_missing_reserve_falls_back_to_defaults() {
    let reserves = ReserveIndex::build(&[json!({ "id": "r1", "symbol": "SUI", "decimals": 9 })]);
    let entry = normalize_entry(&json!({ "reserveId": "unknown", "amount": 100 }), &reserves);

    assert_eq!(entry.reserve_id.as_deref(), Some("unknown"));
    assert_eq!(entry.symbol, "");
    assert_eq!(entry.coin_type, "");
    assert_eq!(entry.decimals, 9);
    assert_eq!(entry.amount_human, 100.0 / 1e9);
}

#[test]
fn test_entry_fields_override_reserve() {
    let reserves = ReserveIndex::build(&[json!({
        "id": "r1", "symbol": "SUI", "coinType": "0x2::sui::SUI", "decimals": 9
    })]);
    let entry = normalize_entry(
        &json!({ "reserve_id": "r1", "symbol": "sSUI", "decimals": 6, "balance": 3_000_000 }),
        &reserves,
    );

    assert_eq!(entry.symbol, "sSUI");
    assert_eq!(entry.coin_type, "0x2::sui::SUI");
    assert_eq!(entry.decimals, 6);
    assert_eq!(entry.amount_human, 3.0);
}

#[test]
fn test_reserve_alternate_names_from_plain_index() {
    let reserves = plain_index(json!({
        "r7": { "ticker": "DEEP", "assetType": "0xdeeb::deep::DEEP", "decimals": "6" }
    }));
    let entry = normalize_entry(&json!({ "fields": { "reserve": { "id": "r7" } }, "principal": 1 }), &reserves);

    assert_eq!(entry.reserve_id.as_deref(), Some("r7"));
    assert_eq!(entry.symbol, "DEEP");
    assert_eq!(entry.coin_type, "0xdeeb::deep::DEEP");
    assert_eq!(entry.decimals, 6);
}

#[test]
fn test_own_human_amount_wins() {
    let reserves = ReserveIndex::default();

    let entry = normalize_entry(&json!({ "amount": 10, "amountHuman": 0.5 }), &reserves);
    assert_eq!(entry.amount_human, 0.5);

    // a string is not a usable human amount
    let entry = normalize_entry(&json!({ "amount": 10, "amountHuman": "0.5" }), &reserves);
    assert_eq!(entry.amount_human, 10.0 / 1e9);
}

#[test]
fn test_amount_probing_order_and_coercion() {
    let reserves = ReserveIndex::default();

    let entry = normalize_entry(&json!({ "amount": null, "balance": 0, "principal": 9 }), &reserves);
    assert_eq!(entry.amount_raw, 0.0);

    let entry = normalize_entry(&json!({ "depositedBalance": "42" }), &reserves);
    assert_eq!(entry.amount_raw, 42.0);

    let entry = normalize_entry(&json!({ "amount": -3 }), &reserves);
    assert_eq!(entry.amount_raw, -3.0);

    let entry = normalize_entry(&json!({ "amount": "n/a" }), &reserves);
    assert!(entry.amount_raw.is_nan());
    assert!(entry.amount_human.is_nan());

    let entry = normalize_entry(&json!({ "symbol": "SUI" }), &reserves);
    assert_eq!(entry.amount_raw, 0.0);
    assert!(entry.reserve_id.is_none());
}

#[test]
fn test_move_coin_type_is_unwrapped() {
    let reserves = ReserveIndex::default();
    let entry = normalize_entry(
        &json!({
            "type": "0xf95b::obligation::Deposit",
            "fields": { "coin_type": { "fields": { "name": "0x2::sui::SUI" } } }
        }),
        &reserves,
    );
    assert_eq!(entry.coin_type, "0x2::sui::SUI");
}

#[test]
fn test_reserve_index_feeds_snapshot_listing() {
    let index = ReserveIndex::build(&[
        json!({ "id": "r1", "symbol": "SUI" }),
        json!({ "nothing": "here" }),
        json!({ "reserveId": "r2", "metadata": { "symbol": "USDC", "decimals": 6 } }),
    ]);

    let listing = serde_json::to_value(index.reserves()).unwrap();
    assert_eq!(
        listing,
        json!([
            { "id": "r1", "symbol": "SUI", "coinType": "", "decimals": 9 },
            { "id": "r2", "symbol": "USDC", "coinType": "", "decimals": 6 }
        ])
    );
}

proptest! {
    #[test]
    fn prop_human_amount_is_scaled_raw(amount in 0u64..=u64::MAX / 2, decimals in 0u8..=18) {
        let reserves = ReserveIndex::default();
        let entry = normalize_entry(&json!({ "amount": amount, "decimals": decimals }), &reserves);

        prop_assert_eq!(entry.amount_raw, amount as f64);
        prop_assert_eq!(entry.amount_human, to_human(amount as f64, decimals));
        prop_assert_eq!(entry.amount_human, amount as f64 / 10f64.powi(decimals as i32));
    }

    #[test]
    fn prop_normalization_is_idempotent(
        amounts in proptest::collection::vec(any::<i64>(), 0..8),
        symbol in "[A-Z]{0,6}",
    ) {
        let deposits: Vec<Value> = amounts
            .iter()
            .enumerate()
            .map(|(i, amount)| json!({ "reserveId": format!("r{}", i % 3), "amount": amount }))
            .collect();
        let raw = json!({ "deposits": deposits, "borrows": [{ "reserveId": "r0", "borrowed": "17" }] });
        let reserves = ReserveIndex::build(&[json!({ "id": "r0", "symbol": symbol, "decimals": 8 })]);

        let first = serde_json::to_string(&normalize_obligation(&raw, &reserves)).unwrap();
        let second = serde_json::to_string(&normalize_obligation(&raw, &reserves)).unwrap();
        prop_assert_eq!(first, second);
    }
}
