use farerule::{
    ActionKind, Combinator, ConditionNode, FareRuleError, OUT_OF_POLICY_FLAG, Operand, Operator,
    Rule, RuleDefinitionError,
};
use serde_json::json;

fn leaf(node: &ConditionNode) -> &farerule::Condition {
    match node {
        ConditionNode::Leaf(leaf) => leaf,
        other => panic!("expected leaf, got {other:?}"),
    }
}

#[test]
fn nested_groups_and_all_operators() {
    let rule = Rule::from_json(
        r#"{
            "rule_id": "mixed",
            "priority": 5,
            "conditions": {
                "combinator": "AND",
                "children": [
                    {"field": "product_type", "operator": "eq", "value": "flight"},
                    {"combinator": "or", "children": [
                        {"field": "traveler.tier", "operator": "in", "value": ["gold", "platinum"]},
                        {"field": "price", "operator": "between", "value": [100, 300]},
                        {"field": "route", "operator": "contains", "value": "DEL"}
                    ]},
                    {"field": "promo_code", "operator": "is_null"}
                ]
            },
            "actions": [
                {"kind": "add_metadata_flag", "target_field": "priority_booking"}
            ]
        }"#,
    )
    .unwrap();

    assert_eq!(rule.priority, 5);
    assert_eq!(rule.conditions.leaf_count(), 5);
    match &rule.conditions {
        ConditionNode::Group {
            combinator: Combinator::And,
            children,
        } => {
            assert!(matches!(
                &children[1],
                ConditionNode::Group {
                    combinator: Combinator::Or,
                    ..
                }
            ));
            assert_eq!(leaf(&children[2]).operator, Operator::IsNull);
            assert_eq!(leaf(&children[2]).operand, Operand::Absent);
        }
        other => panic!("expected AND group, got {other:?}"),
    }
    assert_eq!(rule.actions[0].kind, ActionKind::AddMetadataFlag);
    assert_eq!(rule.actions[0].amount_or_value, json!(true));
}

#[test]
fn flat_condition_list_with_symbol_operators() {
    let rule = Rule::from_value(&json!({
        "rule_id": "policy_business_short_haul",
        "name": "Business class on short flights",
        "conditions": [
            {"attribute": "cabin_class", "operator": "==", "value": "business"},
            {"attribute": "flight_duration_hours", "operator": "<", "value": 6},
            {"attribute": "manager_approval", "operator": "!=", "value": true}
        ],
        "actions": [{"action": "mark_out_of_policy"}]
    }))
    .unwrap();

    match &rule.conditions {
        ConditionNode::Group {
            combinator: Combinator::And,
            children,
        } => {
            let ops: Vec<Operator> = children.iter().map(|c| leaf(c).operator).collect();
            assert_eq!(ops, [Operator::Eq, Operator::Lt, Operator::Neq]);
        }
        other => panic!("expected AND group, got {other:?}"),
    }
    assert_eq!(rule.metadata["name"], "Business class on short flights");
    assert_eq!(rule.actions[0].kind, ActionKind::MarkOutOfPolicy);
    assert_eq!(rule.actions[0].target_field, OUT_OF_POLICY_FLAG);
    assert_eq!(rule.priority, 0);
}

#[test]
fn legacy_actions_map_to_kinds() {
    let rule = Rule::from_value(&json!({
        "rule_id": "legacy",
        "conditions": [{"field": "x", "operator": "eq", "value": 1}],
        "actions": [
            {"action": "apply_discount", "params": {"value": 10, "type": "percent"}},
            {"action": "apply_discount", "params": {"value": 25, "type": "fixed"}},
            {"action": "override_price", "params": {"value": 99}},
            {"action": "set_field", "params": {"field": "fare.basis", "value": "YLOW"}}
        ]
    }))
    .unwrap();

    let kinds: Vec<ActionKind> = rule.actions.iter().map(|a| a.kind).collect();
    assert_eq!(
        kinds,
        [
            ActionKind::ApplyDiscountPercent,
            ActionKind::ApplyDiscountAmount,
            ActionKind::OverridePrice,
            ActionKind::SetField,
        ]
    );
    assert_eq!(rule.actions[0].target_field, "price");
    assert_eq!(rule.actions[3].target_field, "fare.basis");

    let result = rule
        .execute(&json!({"x": 1, "price": 200, "fare": {"basis": "Y"}}))
        .unwrap();
    assert_eq!(result.updated_payload()["price"], json!(99));
    assert_eq!(result.updated_payload()["fare"]["basis"], json!("YLOW"));
}

#[test]
fn metadata_values_are_stringified() {
    let rule = Rule::from_value(&json!({
        "rule_id": "m",
        "conditions": {"field": "x", "operator": "eq", "value": 1},
        "meta": {"source": "nl", "confidence": 0.93, "reviewed": false}
    }))
    .unwrap();
    assert_eq!(rule.metadata["source"], "nl");
    assert_eq!(rule.metadata["confidence"], "0.93");
    assert_eq!(rule.metadata["reviewed"], "false");
}

#[test]
fn string_conditions_use_compact_syntax() {
    let rule = Rule::from_value(&json!({
        "rule_id": "dsl",
        "conditions": "days_before_travel >= 30 AND (tier == \"gold\" OR price between [100, 200])",
        "actions": [{"kind": "apply_discount_amount", "target_field": "price", "amount_or_value": 15}]
    }))
    .unwrap();
    assert_eq!(rule.conditions.leaf_count(), 3);

    let result = rule
        .execute(&json!({"days_before_travel": 40, "tier": "silver", "price": 150}))
        .unwrap();
    assert_eq!(result.updated_payload()["price"], json!(135));
}

#[test]
fn invalid_compact_condition_is_expression_error() {
    let err = Rule::from_value(&json!({
        "rule_id": "dsl",
        "conditions": "days_before_travel >=",
        "actions": []
    }))
    .unwrap_err();
    assert!(matches!(err, RuleDefinitionError::Expression(_)));
}

#[test]
fn structural_errors_are_named() {
    let cases = [
        (
            json!({"conditions": {"field": "x", "operator": "eq", "value": 1}}),
            RuleDefinitionError::MissingRuleId,
        ),
        (
            json!({"rule_id": " ", "conditions": {"field": "x", "operator": "eq", "value": 1}}),
            RuleDefinitionError::EmptyRuleId,
        ),
        (
            json!({"rule_id": "r", "conditions": []}),
            RuleDefinitionError::EmptyGroup {
                path: "conditions".into(),
            },
        ),
        (
            json!({"rule_id": "r", "conditions": {"combinator": "XOR", "children": [
                {"field": "x", "operator": "eq", "value": 1}
            ]}}),
            RuleDefinitionError::UnknownCombinator {
                path: "conditions".into(),
                combinator: "XOR".into(),
            },
        ),
        (
            json!({"rule_id": "r", "conditions": {"field": "x", "operator": "like", "value": 1}}),
            RuleDefinitionError::UnknownOperator {
                path: "conditions".into(),
                operator: "like".into(),
            },
        ),
        (
            json!({"rule_id": "r", "conditions": {"field": "x", "operator": "between", "value": [1]}}),
            RuleDefinitionError::RangeRequiresPair { field: "x".into() },
        ),
        (
            json!({"rule_id": "r", "conditions": {"field": "x", "operator": "in", "value": "gold"}}),
            RuleDefinitionError::SetRequired {
                field: "x".into(),
                operator: Operator::In,
            },
        ),
        (
            json!({"rule_id": "r", "conditions": {"field": "x", "operator": "eq", "value": 1},
                   "actions": [{"kind": "teleport", "target_field": "x"}]}),
            RuleDefinitionError::UnknownActionKind {
                kind: "teleport".into(),
            },
        ),
        (
            json!({"rule_id": "r", "conditions": {"field": "x", "operator": "eq", "value": 1},
                   "actions": [{"kind": "override_price", "target_field": "price", "amount_or_value": "free"}]}),
            RuleDefinitionError::NonNumericAmount {
                kind: ActionKind::OverridePrice,
                value: "\"free\"".into(),
            },
        ),
    ];

    for (document, expected) in cases {
        assert_eq!(Rule::from_value(&document), Err(expected), "{document}");
    }
}

#[test]
fn malformed_json_is_reported() {
    let err = Rule::from_json("{not json").unwrap_err();
    assert!(matches!(err, RuleDefinitionError::Malformed { .. }));
}

#[test]
fn from_file_missing_is_io_error() {
    let err = Rule::from_file("/nonexistent/farerule/rule.json").unwrap_err();
    assert!(matches!(err, FareRuleError::Io(_)));
}
