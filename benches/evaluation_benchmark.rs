//! Benchmark for deep evaluation of condition trees
//!
//! Every `evaluate` call re-walks the whole tree, so cost should grow
//! linearly with the number of nodes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rule_conditions::{Combinator, Condition, ConditionSet};
use serde_json::json;

/// Build an outer `Any` set of `groups` inner `All` sets, each holding a
/// mix of unary, comparison and pattern conditions
fn create_test_tree(groups: usize) -> ConditionSet {
    let mut root = ConditionSet::new();
    root.set_combinator(Combinator::Any);

    for i in 0..groups {
        let mut group = ConditionSet::new();

        let mut present = Condition::new();
        present.when("email").is_not_empty();

        let mut adult = Condition::new();
        adult.when("age").is_greater_equal(18 + (i % 10) as i64);

        let mut within_limit = Condition::new();
        within_limit.when("balance").is_less_equal("limit");

        let mut email = Condition::new();
        email.when("email").is_match(r"^[^@\s]+@[^@\s]+\.[a-z]{2,}$");

        group.add(present).add(adult).add(within_limit).add(email);
        root.add(group);
    }

    root.bind_target(json!({
        "email": "ada@example.com",
        "age": 24,
        "balance": 80,
        "limit": 100
    }));
    root
}

fn benchmark_evaluate(c: &mut Criterion) {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut group = c.benchmark_group("evaluate");
    for groups in [1usize, 10, 100] {
        let mut tree = create_test_tree(groups);
        group.bench_with_input(BenchmarkId::from_parameter(groups), &groups, |b, _| {
            b.iter(|| black_box(tree.evaluate().map(|set| set.is_valid())))
        });
    }
    group.finish();
}

fn benchmark_rebind(c: &mut Criterion) {
    let mut tree = create_test_tree(100);
    let mut age = 0i64;

    c.bench_function("rebind_and_evaluate", |b| {
        b.iter(|| {
            age = (age + 1) % 100;
            tree.bind_target(json!({
                "email": "ada@example.com",
                "age": age,
                "balance": 80,
                "limit": 100
            }));
            black_box(tree.evaluate().map(|set| set.is_valid()))
        })
    });
}

criterion_group!(benches, benchmark_evaluate, benchmark_rebind);
criterion_main!(benches);
