use cadence_core::recurrence::{next_date, next_occurrence};
use cadence_core::rule::RecurrenceRule;
use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn bench_rule_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("rule_parsing");

    for rule in ["d 7", "y", "w 1,2,3,4,5,6,7", "m 1,15,-1,-2 1,3,5,7,9,11"] {
        group.bench_with_input(BenchmarkId::from_parameter(rule), rule, |b, rule| {
            b.iter(|| RecurrenceRule::parse(black_box(rule)).unwrap())
        });
    }
    group.finish();
}

fn bench_next_occurrence(c: &mut Criterion) {
    let now = ymd(2024, 1, 26);
    let mut group = c.benchmark_group("next_occurrence");

    let cases = [
        ("daily_far_past", ymd(1970, 1, 1), "d 3"),
        ("yearly_far_past", ymd(1904, 2, 29), "y"),
        ("weekly", ymd(2024, 1, 1), "w 7"),
        ("monthly_sparse", ymd(2024, 1, 1), "m 31 12"),
        ("monthly_last_day", ymd(2024, 1, 1), "m -1"),
    ];

    for (name, anchor, text) in cases {
        let rule = RecurrenceRule::parse(text).unwrap();
        group.bench_function(name, |b| {
            b.iter(|| next_occurrence(black_box(anchor), black_box(now), black_box(&rule)).unwrap())
        });
    }
    group.finish();
}

fn bench_next_date_text(c: &mut Criterion) {
    let now = ymd(2024, 1, 26);
    c.bench_function("next_date_from_text", |b| {
        b.iter(|| next_date(black_box(now), black_box("20230101"), black_box("m 10,-1")).unwrap())
    });
}

criterion_group!(
    benches,
    bench_rule_parsing,
    bench_next_occurrence,
    bench_next_date_text
);
criterion_main!(benches);
