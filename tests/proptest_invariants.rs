
use farerule::{
    evaluate, evaluate_detailed, parse_condition, Action, Combinator, ConditionNode, Rule,
};
use proptest::prelude::*;
use serde_json::Value;
use strategies::{arb_leaf, arb_payload, arb_rule, arb_tree};

fn price_of(payload: &Value) -> f64 {
    payload["price"].as_f64().expect("schema price is numeric")
}

// ---------------------------------------------------------------------------
// Invariant 1: Determinism
//
// Executing the same rule against the same payload yields identical results,
// down to the serialized bytes.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn determinism(rule in arb_rule(), payload in arb_payload()) {
        let first = rule.execute(&payload).unwrap();
        for _ in 0..3 {
            let again = rule.execute(&payload).unwrap();
            prop_assert_eq!(&first, &again);
            prop_assert_eq!(
                serde_json::to_string(&first).unwrap(),
                serde_json::to_string(&again).unwrap()
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Invariant 2: Payload ownership
//
// The caller's payload is never modified, and a non-matching rule returns an
// identical copy of it with no applied actions.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn input_payload_untouched(rule in arb_rule(), payload in arb_payload()) {
        let snapshot = payload.clone();
        let _ = rule.execute(&payload).unwrap();
        prop_assert_eq!(&payload, &snapshot);
    }

    #[test]
    fn not_matched_is_identity(rule in arb_rule(), payload in arb_payload()) {
        let result = rule.execute(&payload).unwrap();
        if !result.is_matched() {
            prop_assert_eq!(result.updated_payload(), &payload);
            prop_assert!(result.applied_actions().is_empty());
            prop_assert!(result.failed_condition().is_some());
            prop_assert!(result.explanation().starts_with("Rule generated did not match: "));
        } else {
            prop_assert!(result.failed_condition().is_none());
        }
    }
}

// ---------------------------------------------------------------------------
// Invariant 3: Discount bounds
//
// Discounts never produce a negative price and never raise it.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn amount_discount_never_negative(price in 0_u32..=5000, amount in 0_u32..=10_000) {
        let payload = serde_json::json!({"price": price});
        let (updated, _) =
            farerule::apply(&[Action::discount_amount("price", f64::from(amount))], &payload).unwrap();
        let new_price = price_of(&updated);
        prop_assert!(new_price >= 0.0);
        prop_assert!((new_price - f64::from(price.saturating_sub(amount))).abs() < 1e-9);
    }

    #[test]
    fn percent_discount_within_bounds(price in 0_u32..=5000, percent in 0_u32..=100) {
        let payload = serde_json::json!({"price": price});
        let (updated, _) =
            farerule::apply(&[Action::discount_percent("price", f64::from(percent))], &payload).unwrap();
        let new_price = price_of(&updated);
        prop_assert!(new_price >= 0.0);
        prop_assert!(new_price <= f64::from(price));
    }
}

// ---------------------------------------------------------------------------
// Invariant 4: Group ordering
//
// AND reports its leftmost false child; OR reports its last child when all
// are false. Reported failures are leaves matching the child's own failure.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn and_reports_leftmost_failure(
        children in prop::collection::vec(arb_tree(1), 2..=4),
        payload in arb_payload(),
    ) {
        let (matched, failure) = evaluate(&farerule::all(children.clone()), &payload);
        let outcomes: Vec<_> = children.iter().map(|c| evaluate(c, &payload)).collect();
        prop_assert_eq!(matched, outcomes.iter().all(|(m, _)| *m));
        match outcomes.iter().position(|(m, _)| !*m) {
            Some(first) => {
                let expected = outcomes[first].1.as_ref().unwrap();
                let failure = failure.unwrap();
                prop_assert_eq!(&failure.condition, &expected.condition);
                let expected_prefix = format!("conditions.children[{}]", first);
                prop_assert!(failure.path.starts_with(&expected_prefix));
            }
            None => prop_assert!(failure.is_none()),
        }
    }

    #[test]
    fn or_reports_last_failure(
        children in prop::collection::vec(arb_tree(1), 2..=4),
        payload in arb_payload(),
    ) {
        let (matched, failure) = evaluate(&farerule::any(children.clone()), &payload);
        let outcomes: Vec<_> = children.iter().map(|c| evaluate(c, &payload)).collect();
        prop_assert_eq!(matched, outcomes.iter().any(|(m, _)| *m));
        if matched {
            prop_assert!(failure.is_none());
        } else {
            let last = children.len() - 1;
            let expected = outcomes[last].1.as_ref().unwrap();
            let failure = failure.unwrap();
            prop_assert_eq!(&failure.condition, &expected.condition);
            let expected_prefix = format!("conditions.children[{}]", last);
            prop_assert!(failure.path.starts_with(&expected_prefix));
        }
    }

    #[test]
    fn detailed_agrees_with_plain(tree in arb_tree(3), payload in arb_payload()) {
        let (matched, failure) = evaluate(&tree, &payload);
        let report = evaluate_detailed(&tree, &payload);
        prop_assert_eq!(report.is_matched(), matched);
        prop_assert_eq!(report.failure(), failure.as_ref());
        prop_assert!(!report.evaluated().is_empty());
        prop_assert!(report.evaluated().len() <= tree.leaf_count());
        if let Some(failure) = &failure {
            prop_assert_eq!(report.evaluated().last(), Some(&failure.path));
        }
    }

    #[test]
    fn and_stops_at_first_false_leaf(
        leaves in prop::collection::vec(arb_leaf(), 2..=5),
        payload in arb_payload(),
    ) {
        let report = evaluate_detailed(&farerule::all(leaves.clone()), &payload);
        let stop = leaves
            .iter()
            .position(|leaf| !evaluate(leaf, &payload).0)
            .map_or(leaves.len(), |i| i + 1);
        prop_assert_eq!(report.evaluated().len(), stop);
    }
}

// ---------------------------------------------------------------------------
// Invariant 5: Condition text
//
// A condition tree's display form parses back into the same tree.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn display_parses_back(tree in arb_tree(3)) {
        let text = tree.to_string();
        let parsed = parse_condition(&text).unwrap();
        prop_assert_eq!(parsed, tree, "text: {}", text);
    }

    #[test]
    fn parsed_tree_evaluates_like_built_tree(tree in arb_tree(2), payload in arb_payload()) {
        let parsed = parse_condition(&tree.to_string()).unwrap();
        prop_assert_eq!(evaluate(&parsed, &payload), evaluate(&tree, &payload));
    }
}

// ---------------------------------------------------------------------------
// Invariant 6: Priority ordering
//
// Sorting is ascending and stable.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn sort_by_priority_is_stable(priorities in prop::collection::vec(-5_i64..=5, 1..=12)) {
        let mut rules: Vec<Rule> = priorities
            .iter()
            .enumerate()
            .map(|(i, p)| {
                Rule::builder(&format!("r{i}"))
                    .priority(*p)
                    .when(farerule::field("x").eq(1))
                    .build()
                    .unwrap()
            })
            .collect();
        farerule::sort_by_priority(&mut rules);
        for pair in rules.windows(2) {
            prop_assert!(pair[0].priority <= pair[1].priority);
            if pair[0].priority == pair[1].priority {
                let a: usize = pair[0].rule_id[1..].parse().unwrap();
                let b: usize = pair[1].rule_id[1..].parse().unwrap();
                prop_assert!(a < b);
            }
        }
    }
}

#[test]
fn group_combinators_survive_display() {
    let tree = farerule::any([
        farerule::field("a").eq(1),
        farerule::all([farerule::field("b").eq(2), farerule::field("c").is_not_null()]),
    ]);
    let parsed = parse_condition(&tree.to_string()).unwrap();
    match parsed {
        ConditionNode::Group {
            combinator: Combinator::Or,
            children,
        } => assert_eq!(children.len(), 2),
        other => panic!("expected OR group, got {other:?}"),
    }
}
