//! # Init Data Verification Benchmarks
//!
//! | Stage | Target |
//! |-------|--------|
//! | Full verification (typical payload) | < 50μs |
//! | Rejection on hash mismatch | same cost as acceptance |
//! | Verification with many extra fields | linear in field count |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use spok_01_init_data::{sign_init_data, verify_at, BotToken, RawPayload};
use std::time::Duration;

const TOKEN: &str = "1234567890:BENCH-ONLY-TOKEN";
const NOW: i64 = 1_700_000_000;

fn typical_payload(token: &BotToken) -> String {
    let auth_date = NOW.to_string();
    sign_init_data(
        [
            ("query_id", "AAHdF6IQAAAAAN0XohDhrOrc"),
            ("auth_date", auth_date.as_str()),
            (
                "user",
                r#"{"id":100200300,"first_name":"Bench","last_name":"User","username":"bench_user","language_code":"en","is_premium":true}"#,
            ),
            ("chat_type", "private"),
        ],
        token,
    )
}

fn bench_verification(c: &mut Criterion) {
    let mut group = c.benchmark_group("spok-01-init-data");
    group.measurement_time(Duration::from_secs(5));

    let token = BotToken::new(TOKEN).unwrap();
    let valid = typical_payload(&token);
    let tampered = valid.replace("Bench", "Bunch");

    group.bench_function("verify_valid", |b| {
        b.iter(|| black_box(verify_at(black_box(&valid), &token, NOW, 86_400)))
    });

    group.bench_function("verify_hash_mismatch", |b| {
        b.iter(|| black_box(verify_at(black_box(&tampered), &token, NOW, 86_400)))
    });

    group.bench_function("parse_and_canonicalize", |b| {
        b.iter(|| {
            let payload = RawPayload::parse(black_box(&valid)).unwrap();
            black_box(payload.canonical_string())
        })
    });

    for extra in [0usize, 16, 64, 256] {
        let names: Vec<String> = (0..extra).map(|i| format!("field_{i:03}")).collect();
        let auth_date = NOW.to_string();
        let mut fields: Vec<(&str, &str)> = vec![
            ("auth_date", auth_date.as_str()),
            ("user", r#"{"id":1}"#),
        ];
        fields.extend(names.iter().map(|n| (n.as_str(), "value")));
        let payload = sign_init_data(fields.iter().copied(), &token);

        group.throughput(Throughput::Elements((extra + 2) as u64));
        group.bench_with_input(BenchmarkId::new("verify_fields", extra), &payload, |b, p| {
            b.iter(|| black_box(verify_at(p, &token, NOW, 86_400)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_verification);
criterion_main!(benches);
