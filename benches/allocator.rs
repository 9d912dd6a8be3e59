//! Benchmark for the budget allocator over a realistic multi-domain set.

use criterion::{Criterion, criterion_group, criterion_main};
use mnemex::models::{Classification, Record, RecordKind};
use mnemex::services::{CharCostEstimator, DomainRecords, allocate};
use std::hint::black_box;

fn build_domains(domains: usize, records_per_domain: usize) -> Vec<DomainRecords> {
    (0..domains)
        .map(|d| DomainRecords {
            domain: format!("domain-{d}"),
            records: (0..records_per_domain)
                .map(|r| {
                    let classification = match r % 3 {
                        0 => Classification::Foundational,
                        1 => Classification::Tactical,
                        _ => Classification::Observational,
                    };
                    let kind = if r % 2 == 0 {
                        RecordKind::Convention {
                            content: format!("convention {d}-{r}: keep the lock advisory"),
                        }
                    } else {
                        RecordKind::Pattern {
                            name: format!("pattern {d}-{r}"),
                            description: "read all, compute, replace all".to_string(),
                            files: None,
                        }
                    };
                    let mut record = Record::new(kind, classification);
                    record.assign_id();
                    record
                })
                .collect(),
        })
        .collect()
}

fn bench_allocate(c: &mut Criterion) {
    let domains = build_domains(8, 250);

    c.bench_function("allocate_2000_records_tight_budget", |b| {
        b.iter(|| allocate(black_box(&domains), black_box(5_000), &CharCostEstimator));
    });

    c.bench_function("allocate_2000_records_ample_budget", |b| {
        b.iter(|| allocate(black_box(&domains), black_box(10_000_000), &CharCostEstimator));
    });
}

criterion_group!(benches, bench_allocate);
criterion_main!(benches);
