use farerule::parse::parse_condition;
use farerule::{evaluate, field, Combinator, ConditionNode, Rule};
use serde_json::json;

#[test]
fn dsl_parse_and_evaluate() {
    let node = parse_condition(
        r#"product_type == "flight" AND days_before_travel >= 30 AND traveler.tier in ["gold", "platinum"]"#,
    )
    .unwrap();

    let payload = json!({
        "product_type": "flight",
        "days_before_travel": 45,
        "traveler": {"tier": "gold"}
    });
    let (matched, failure) = evaluate(&node, &payload);
    assert!(matched);
    assert!(failure.is_none());
}

#[test]
fn dsl_equals_builder_tree() {
    let parsed = parse_condition(
        r#"(cabin_class == "business" OR cabin_class == "first") AND flight_duration_hours < 6"#,
    )
    .unwrap();
    let built = field("cabin_class")
        .eq("business")
        .or(field("cabin_class").eq("first"))
        .and(field("flight_duration_hours").lt(6));
    assert_eq!(parsed, built);
}

#[test]
fn dsl_lowercase_keywords() {
    let upper = parse_condition("a == 1 AND b == 2 OR c == 3").unwrap();
    let lower = parse_condition("a == 1 and b == 2 or c == 3").unwrap();
    assert_eq!(upper, lower);
}

#[test]
fn dsl_or_chain_is_one_group() {
    let node = parse_condition("a == 1 OR b == 2 OR c == 3 OR d == 4").unwrap();
    match node {
        ConditionNode::Group {
            combinator: Combinator::Or,
            children,
        } => assert_eq!(children.len(), 4),
        other => panic!("expected OR group, got {other:?}"),
    }
}

#[test]
fn dsl_whitespace_and_newlines() {
    let node = parse_condition(
        "
        price   between [ 100 , 250 ]
            AND
        promo_code is not null
        ",
    )
    .unwrap();
    assert_eq!(node.leaf_count(), 2);
    let (matched, _) = evaluate(&node, &json!({"price": 180, "promo_code": "SPRING"}));
    assert!(matched);
}

#[test]
fn dsl_negative_and_float_literals() {
    let node = parse_condition("balance > -10.5 AND balance <= 0").unwrap();
    assert!(evaluate(&node, &json!({"balance": -3})).0);
    assert!(!evaluate(&node, &json!({"balance": -11})).0);
}

#[test]
fn dsl_rule_document() {
    let rule = Rule::from_value(&json!({
        "rule_id": "junior_hotel_cap",
        "conditions": "traveler.age_class == \"junior\" AND hotel.star_rating >= 5",
        "actions": [{"kind": "mark_out_of_policy"}]
    }))
    .unwrap();
    let result = rule
        .execute(&json!({"traveler": {"age_class": "junior"}, "hotel": {"star_rating": 5}}))
        .unwrap();
    assert!(result.is_matched());
    assert_eq!(
        result.updated_payload()["policy_flags"]["out_of_policy_rule"],
        json!(true)
    );
}

#[test]
fn dsl_error_messages_point_at_input() {
    let err = parse_condition("price >= AND x == 1").unwrap_err();
    assert!(err.to_string().starts_with("parse error at offset"));
    assert!(err.offset > 0);

    assert!(parse_condition("price ~ 3").is_err());
    assert!(parse_condition("tier in gold").is_err());
    assert!(parse_condition("promo is maybe").is_err());
    assert!(parse_condition("a == 1 AND").is_err());
    assert!(parse_condition("\"quoted\" == 1").is_err());
}

#[test]
fn dsl_keywords_are_whole_words() {
    assert!(parse_condition("x == 1 android == 2").is_err());
    assert!(parse_condition("x == 1 ornament == 2").is_err());

    let node = parse_condition("order_total > 10 or origin == \"DEL\"").unwrap();
    assert_eq!(
        node,
        field("order_total").gt(10).or(field("origin").eq("DEL"))
    );

    let err = Rule::from_value(&json!({
        "rule_id": "typo",
        "conditions": "x == 1 android == 2",
        "actions": []
    }))
    .unwrap_err();
    assert!(matches!(err, farerule::RuleDefinitionError::Expression(_)));
}
