use criterion::{black_box, criterion_group, criterion_main, Criterion};
use farerule::policy::{PolicyChecker, PolicyConfig, PolicyRegistry};
use farerule::{all, evaluate, field, parse_condition, Action, Rule};
use serde_json::{json, Map, Value};

/// Build a rule with `n` leaves (each comparing a unique field) ANDed
/// together, and a payload that satisfies every one of them.
fn build_rule(n: usize) -> (Rule, Value) {
    let mut payload = Map::new();
    let leaves = (0..n).map(|i| {
        let name = format!("f{i}");
        payload.insert(name.clone(), json!(10));
        field(&name).gte(1)
    });
    let conditions = all(leaves.collect::<Vec<_>>());
    payload.insert("price".into(), json!(250));

    let rule = Rule::builder("bench")
        .when(conditions)
        .then(Action::discount_percent("price", 10.0))
        .then(Action::metadata_flag("benchmarked", true))
        .build()
        .unwrap();
    (rule, Value::Object(payload))
}

fn dsl_source(n: usize) -> String {
    (0..n)
        .map(|i| format!("f{i} >= 1"))
        .collect::<Vec<_>>()
        .join(" AND ")
}

fn bench_execute(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_execute");

    for &n in &[5, 20, 50] {
        let (rule, payload) = build_rule(n);
        group.bench_function(&format!("{n}_leaves_execute"), |b| {
            b.iter(|| rule.execute(black_box(&payload)));
        });
        group.bench_function(&format!("{n}_leaves_evaluate"), |b| {
            b.iter(|| evaluate(&rule.conditions, black_box(&payload)));
        });
    }

    group.finish();
}

fn bench_intake(c: &mut Criterion) {
    let mut group = c.benchmark_group("intake");

    for &n in &[5, 20, 50] {
        let source = dsl_source(n);
        group.bench_function(&format!("{n}_leaves_parse"), |b| {
            b.iter(|| black_box(parse_condition(black_box(&source)).unwrap()));
        });

        let document = json!({
            "rule_id": "bench",
            "conditions": (0..n)
                .map(|i| json!({"field": format!("f{i}"), "operator": ">=", "value": 1}))
                .collect::<Vec<_>>(),
            "actions": [{"kind": "apply_discount_percent", "target_field": "price", "amount_or_value": 10}]
        });
        group.bench_function(&format!("{n}_leaves_document"), |b| {
            b.iter(|| black_box(Rule::from_value(black_box(&document)).unwrap()));
        });
    }

    group.finish();
}

fn bench_policies(c: &mut Criterion) {
    let checker = PolicyChecker::new(PolicyRegistry::with_builtins(&PolicyConfig::default()));
    let payload = json!({
        "price": 420,
        "cabin_class": "business",
        "flight_duration_hours": 3,
        "traveler": {"age_class": "junior"},
        "hotel": {"star_rating": 5},
        "flight_options": (0..20)
            .map(|i| json!({"price": 300 + i * 7, "is_direct": i % 3 == 0}))
            .collect::<Vec<_>>()
    });
    let (rule, _) = build_rule(1);
    let result = rule.execute(&json!({"f0": 10, "price": 420})).unwrap();

    c.bench_function("check_all_builtins", |b| {
        b.iter(|| checker.check_all(black_box(&payload), Some(&result)));
    });
}

criterion_group!(benches, bench_execute, bench_intake, bench_policies);
criterion_main!(benches);
