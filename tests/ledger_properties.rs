//! Property-based checks on ledger arithmetic: after any sequence of
//! add/remove/modify, the recomputed total equals the sum over the lines
//! and every line honors the quantity bounds.

use proptest::prelude::*;
use rust_decimal::Decimal;

use orderdesk::{Catalog, CatalogRecord, OrderLedger, OrderPolicy, MAX_LINE_QUANTITY};

const ITEMS: &[&str] = &["pancakes", "fry", "orange juice"];

fn test_catalog() -> Catalog {
    let record = |name: &str, category: &str, price: &str| CatalogRecord {
        name: name.into(),
        category: category.into(),
        price: price.parse().expect("valid decimal"),
        serving_size: "1 serving".into(),
    };
    Catalog::from_records(vec![
        record("Pancakes", "breakfast", "5.00"),
        record("Fry", "sides", "2.50"),
        record("Orange Juice", "beverages", "3.15"),
    ])
    .expect("valid catalog")
}

#[derive(Debug, Clone)]
enum Op {
    Add(usize, u32),
    Remove(usize),
    Modify(usize, u32),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..ITEMS.len(), 0..=120u32).prop_map(|(i, q)| Op::Add(i, q)),
        (0..ITEMS.len()).prop_map(Op::Remove),
        (0..ITEMS.len(), 0..=120u32).prop_map(|(i, q)| Op::Modify(i, q)),
    ]
}

proptest! {
    #[test]
    fn total_always_equals_line_sum(ops in proptest::collection::vec(op_strategy(), 0..50)) {
        let catalog = test_catalog();
        let policy = OrderPolicy::default();
        let mut ledger = OrderLedger::new();

        for op in ops {
            // rejected operations must leave no trace; outcomes are
            // irrelevant to the invariant
            match op {
                Op::Add(i, q) => {
                    let _ = ledger.add(&catalog, &policy, ITEMS[i], q);
                }
                Op::Remove(i) => {
                    let _ = ledger.remove(&catalog, ITEMS[i]);
                }
                Op::Modify(i, q) => {
                    let _ = ledger.modify(&catalog, ITEMS[i], q);
                }
            }

            let lines = ledger.lines(&catalog);
            let expected: Decimal = lines
                .iter()
                .map(|line| line.unit_price * Decimal::from(line.quantity))
                .sum();
            prop_assert_eq!(ledger.total(&catalog), expected);

            for line in &lines {
                prop_assert!(line.quantity >= 1);
                prop_assert!(line.quantity <= MAX_LINE_QUANTITY);
                prop_assert_eq!(line.line_total, line.unit_price * Decimal::from(line.quantity));
            }
        }
    }

    #[test]
    fn add_then_remove_round_trips_total(
        seed in proptest::collection::vec((0..ITEMS.len(), 1..=10u32), 0..5),
        pick in 0..ITEMS.len(),
        quantity in 1..=10u32,
    ) {
        let catalog = test_catalog();
        let policy = OrderPolicy::default();
        let mut ledger = OrderLedger::new();

        for (i, q) in seed {
            let _ = ledger.add(&catalog, &policy, ITEMS[i], q);
        }
        // the probe item must not already be on the order, otherwise
        // remove would take the seeded quantity with it
        let _ = ledger.remove(&catalog, ITEMS[pick]);
        let before = ledger.total(&catalog);

        ledger.add(&catalog, &policy, ITEMS[pick], quantity).expect("within bounds");
        ledger.remove(&catalog, ITEMS[pick]);

        prop_assert_eq!(ledger.total(&catalog), before);
    }
}
