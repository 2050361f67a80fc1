use farerule::{field, Action, Rule};
use serde_json::json;

fn main() {
    // Define a rule
    let rule = Rule::builder("early_bird_flight")
        .when(
            field("product_type")
                .eq("flight")
                .and(field("days_before_travel").gte(30)),
        )
        .then(Action::discount_percent("price", 10.0))
        .then(Action::metadata_flag("early_bird", true))
        .build()
        .expect("failed to build rule");

    // Execute against a booking
    let booking = json!({
        "product_type": "flight",
        "days_before_travel": 45,
        "price": 200
    });

    let result = rule.execute(&booking).expect("execution failed");
    println!("{result}");
    println!(
        "{}",
        serde_json::to_string_pretty(result.updated_payload()).expect("serializable payload")
    );
}
