use farerule::policy::{PolicyChecker, PolicyConfig, PolicyRegistry};
use farerule::Rule;
use serde_json::json;

fn main() {
    let checker = PolicyChecker::new(PolicyRegistry::with_builtins(&PolicyConfig::default()));

    let rule = Rule::from_value(&json!({
        "rule_id": "short_haul_business",
        "conditions": "cabin_class == \"business\" AND flight_duration_hours < 6",
        "actions": [{"kind": "mark_out_of_policy"}]
    }))
    .expect("failed to load rule");

    let booking = json!({
        "cabin_class": "business",
        "flight_duration_hours": 2,
        "price": 640,
        "flight_options": [
            {"carrier": "AI", "price": 610, "is_direct": true},
            {"carrier": "6E", "price": 655, "is_direct": true}
        ]
    });

    let result = rule.execute(&booking).expect("execution failed");
    println!("{result}");
    for verdict in checker.check_all(&booking, Some(&result)) {
        println!("{verdict}");
    }
}
