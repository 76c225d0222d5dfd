//! Costs of the password paths the directory hits: login verification and
//! the reset flow (generate a temporary password, then hash it).

use auth::password::{generate_password, hash_password, verify_password, RESET_PASSWORD_LENGTH};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use secrecy::{ExposeSecret, SecretString};

fn bench_login(c: &mut Criterion) {
    let stored = SecretString::from("correct-horse-battery".to_string());
    let hash = hash_password(&stored, None).unwrap();
    let wrong = SecretString::from("correct-horse-battern".to_string());

    let mut group = c.benchmark_group("login");
    group.bench_function("accepted", |b| {
        b.iter(|| verify_password(black_box(&stored), black_box(hash.expose_secret())).is_ok())
    });
    group.bench_function("rejected", |b| {
        b.iter(|| verify_password(black_box(&wrong), black_box(hash.expose_secret())).is_err())
    });
    group.finish();
}

fn bench_reset(c: &mut Criterion) {
    let mut group = c.benchmark_group("reset");
    group.bench_function("generate", |b| {
        b.iter(|| generate_password(black_box(RESET_PASSWORD_LENGTH)))
    });
    group.bench_function("generate_and_hash", |b| {
        b.iter_batched(
            || generate_password(RESET_PASSWORD_LENGTH),
            |temporary| hash_password(black_box(&temporary), None),
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_login, bench_reset);
criterion_main!(benches);
