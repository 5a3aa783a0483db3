// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tagmatrix::{AxisSets, aggregate, parse_config, shared_groups};

const CONFIG: &str = r#"
matrix:
  sdk: ["8.2.0", "8.2", "8"]
  python: ["3.9", "3.10", "3.11"]
  platform: ["bookworm", "slim", "slim-bookworm"]
defaults:
  sdk: "8.2.0"
  python: "3.10"
  platform: "bookworm"
aliases:
  sdk:
    "8": "8.2.0"
    "8.2": "8.2.0"
  platform:
    slim: slim-bookworm
exclude:
  - python: "3.9"
    platform: slim-bookworm
shared:
  contracted:
    - python: "3.9"
    - python: "3.10"
    - python: "3.11"
template:
  templates/slim.Dockerfile:
    - platform: slim-bookworm
  templates/default.Dockerfile:
    - {}
"#;

fn benchmark_parse_config(c: &mut Criterion,)
{
    c.bench_function("parse_config", |b| {
        b.iter(|| parse_config(black_box(CONFIG,),).expect("parse failed",),)
    },);
}

fn benchmark_aggregate(c: &mut Criterion,)
{
    let config = parse_config(CONFIG,).expect("parse failed",);
    let sets = AxisSets::from_values(&config.matrix,);

    c.bench_function("aggregate_matrix", |b| {
        b.iter(|| {
            aggregate(
                black_box(&sets,),
                &config.defaults,
                &config.aliases,
                &config.exclude,
                &config.default_tag,
            )
            .expect("aggregation failed",)
        },)
    },);
}

fn benchmark_shared_groups(c: &mut Criterion,)
{
    let config = parse_config(CONFIG,).expect("parse failed",);
    let sets = AxisSets::from_values(&config.matrix,);

    c.bench_function("shared_groups", |b| {
        b.iter(|| {
            shared_groups(
                black_box(&config.shared.contracted,),
                &config.defaults,
                &sets,
                &config.aliases,
                &config.exclude,
                &config.default_tag,
            )
            .expect("grouping failed",)
        },)
    },);
}

fn benchmark_wide_matrix(c: &mut Criterion,)
{
    let mut config = parse_config(CONFIG,).expect("parse failed",);
    for minor in 0..20 {
        config.matrix.python.push(format!("3.{minor}"),);
    }
    let sets = AxisSets::from_values(&config.matrix,);

    c.bench_function("aggregate_wide_matrix", |b| {
        b.iter(|| {
            aggregate(
                black_box(&sets,),
                &config.defaults,
                &config.aliases,
                &config.exclude,
                &config.default_tag,
            )
            .expect("aggregation failed",)
        },)
    },);
}

criterion_group!(
    benches,
    benchmark_parse_config,
    benchmark_aggregate,
    benchmark_shared_groups,
    benchmark_wide_matrix
);
criterion_main!(benches);
