use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::{json, Value};

use hirebench_core::judge;
use hirebench_core::model::Actual;
use hirebench_core::traits::extract_json_array;

fn bench_extract_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_json_array");

    let simple = r#"Here are the questions:
[{"text": "What is a closure?", "options": ["a", "b", "c", "d"]}]
Good luck!"#;

    let noisy = r#"Note [draft]: the array below is final.
```json
[{"text": "Escaped \"[brackets]\" inside", "options": ["[", "]", "\\", "x"]}]
```"#;

    let large = {
        let items: Vec<Value> = (0..20)
            .map(|i| {
                json!({
                    "text": format!("Question {i}: what does [x] mean?"),
                    "options": ["one", "two", "three", "four"],
                    "correctAnswer": "one",
                    "difficulty": "medium"
                })
            })
            .collect();
        format!("Sure! Here you go:\n{}\nLet me know.", Value::Array(items))
    };

    group.bench_function("simple", |b| {
        b.iter(|| extract_json_array(black_box(simple)))
    });

    group.bench_function("noisy", |b| {
        b.iter(|| extract_json_array(black_box(noisy)))
    });

    group.bench_function("20_questions", |b| {
        b.iter(|| extract_json_array(black_box(&large)))
    });

    group.finish();
}

fn bench_judge(c: &mut Criterion) {
    let mut group = c.benchmark_group("judge");

    let products: Vec<Value> = (0..500)
        .map(|i| json!({"name": format!("Item {i}"), "price": i * 10, "tags": ["a", "b"]}))
        .collect();
    let expected = Value::Array(products.clone());
    let equal = Actual::Value(Value::Array(products.clone()));
    let mut tail_differs = products;
    tail_differs[499] = json!({"name": "Item 499", "price": 0, "tags": []});
    let unequal = Actual::Value(Value::Array(tail_differs));

    group.bench_function("500_equal", |b| {
        b.iter(|| judge::evaluate(black_box(&equal), black_box(&expected)))
    });

    group.bench_function("500_unequal", |b| {
        b.iter(|| judge::evaluate(black_box(&unequal), black_box(&expected)))
    });

    group.finish();
}

criterion_group!(benches, bench_extract_array, bench_judge);
criterion_main!(benches);
