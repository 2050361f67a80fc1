use farerule::{evaluate_detailed, parse_condition};
use serde_json::json;

fn main() {
    let conditions = parse_condition(
        r#"traveler.tier in ["gold", "platinum"] OR (price >= 500 AND cabin_class == "economy")"#,
    )
    .expect("failed to parse conditions");

    let booking = json!({
        "traveler": {"tier": "silver"},
        "price": 420,
        "cabin_class": "economy"
    });

    let report = evaluate_detailed(&conditions, &booking);

    println!("{report}");
    println!();
    println!("Visited leaves: {:?}", report.evaluated());
    if let Some(failure) = report.failure() {
        println!("Deciding failure at {}: {}", failure.path, failure.diagnostic);
    }
}
