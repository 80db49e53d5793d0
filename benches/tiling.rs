// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Tilecut Team

//! Tiling performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nalgebra::{Point2, Point3, Vector3};
use tilecut::geometry::{bisect, Axis, SplitPlane};
use tilecut::{tile_mesh, Corner, Mesh, TilingConfig, Triangle};

/// N×N grid over the unit square with a small height wave, so every split
/// plane clips real geometry
fn wavy_grid(n: usize) -> Mesh {
    let up = Vector3::new(0.0, 0.0, 1.0);
    let step = 1.0 / n as f64;
    let height = |i: usize, j: usize| ((i + j) % 2) as f64 * 0.05;

    let vertices: Vec<Point3<f64>> = (0..=n)
        .flat_map(|j| {
            (0..=n).map(move |i| Point3::new(i as f64 * step, j as f64 * step, height(i, j)))
        })
        .collect();
    let index = |i: usize, j: usize| j * (n + 1) + i;

    let mut corners = Vec::new();
    let mut triangles = Vec::new();
    for j in 0..n {
        for i in 0..n {
            for tri in [
                [index(i, j), index(i + 1, j), index(i + 1, j + 1)],
                [index(i, j), index(i + 1, j + 1), index(i, j + 1)],
            ] {
                let base = corners.len();
                for v in tri {
                    let p = vertices[v];
                    corners.push(Corner::new(v, Point2::new(p.x, p.y), up));
                }
                triangles.push(Triangle::new([base, base + 1, base + 2], 0));
            }
        }
    }
    Mesh::new(vertices, corners, triangles)
}

fn bench_bisect(c: &mut Criterion) {
    let mut group = c.benchmark_group("bisect");

    for n in [32usize, 64] {
        let mesh = wavy_grid(n);
        group.bench_with_input(BenchmarkId::new("grid", n * n * 2), &mesh, |b, mesh| {
            b.iter(|| bisect(black_box(mesh), SplitPlane::new(Axis::X, 0.5), 1e-9));
        });
    }

    group.finish();
}

fn bench_tile(c: &mut Criterion) {
    let mut group = c.benchmark_group("tile");
    group.sample_size(20);

    let config = TilingConfig {
        triangle_threshold: 256,
        max_depth: 3,
        ..TilingConfig::default()
    };

    for n in [32usize, 64] {
        let mesh = wavy_grid(n);
        group.bench_with_input(BenchmarkId::new("grid", n * n * 2), &mesh, |b, mesh| {
            b.iter(|| tile_mesh(black_box(mesh.clone()), &config).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_bisect, bench_tile);
criterion_main!(benches);
