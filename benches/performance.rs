// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Performance benchmarks

use brushlab::cli::demo_target;
use brushlab::config::DecalConfig;
use brushlab::decal::{orientation_from_normal, PlacementSample};
use brushlab::evaluator::MaterialAssignment;
use brushlab::geometry::{build, BoxClipper, ClipGeometryGenerator, ClipTarget, Complexity, ShapeKind, BVH};
use brushlab::{
    tick, BooleanEvaluator, BrushInput, BrushSlot, CsgScene, DebugInfo, DecalProjector,
    EvaluatorOptions, Operation, ResultMesh, SceneEditState, Transform,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nalgebra::{Matrix4, Point3, UnitQuaternion, Vector3};

/// Copies brush A into the result so ticks measure scheduling, not booleans
struct CopyA;

impl BooleanEvaluator for CopyA {
    fn evaluate(
        &mut self,
        a: &BrushInput<'_>,
        _b: &BrushInput<'_>,
        _operation: Operation,
        target: &mut ResultMesh,
        _options: &EvaluatorOptions,
    ) -> DebugInfo {
        target.geometry = a.geometry.transformed(&a.world);
        target.material = MaterialAssignment::Single(a.material);
        DebugInfo::default()
    }
}

fn bench_builder(c: &mut Criterion) {
    let mut group = c.benchmark_group("builder");

    for shape in [
        ShapeKind::Sphere,
        ShapeKind::Box,
        ShapeKind::Cylinder,
        ShapeKind::Torus,
        ShapeKind::TorusKnot,
    ] {
        for complexity in [0.5f32, 1.0, 2.0] {
            group.bench_with_input(
                BenchmarkId::new(shape.name(), complexity),
                &complexity,
                |b, &complexity| {
                    b.iter(|| {
                        build(black_box(shape), Complexity::new(complexity), None, BrushSlot::A).unwrap()
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_clip(c: &mut Criterion) {
    let mut group = c.benchmark_group("clip");
    let mesh = demo_target();
    let bvh = BVH::from_mesh(&mesh);
    let world = Matrix4::identity();
    let orientation = orientation_from_normal(&Vector3::y());

    for (name, bvh) in [("brute_force", None), ("bvh", Some(&bvh))] {
        let target = ClipTarget {
            mesh: &mesh,
            world,
            bvh,
        };
        for size in [5.0f32, 20.0] {
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, &size| {
                b.iter(|| {
                    BoxClipper.clip(
                        &target,
                        black_box(&Point3::new(1.3, 0.0, 0.7)),
                        &orientation,
                        &Vector3::repeat(size),
                    )
                });
            });
        }
    }

    group.finish();
}

fn bench_decal_placement(c: &mut Criterion) {
    let mut projector = DecalProjector::new(DecalConfig {
        seed: Some(7),
        ..DecalConfig::default()
    });
    projector.set_target(demo_target(), Transform::identity());
    let sample = PlacementSample {
        scale: 15.0,
        hue: 0.5,
        twist: Some(0.3),
    };

    c.bench_function("decal_place_at", |b| {
        b.iter(|| {
            projector
                .place_at(Point3::new(2.1, 0.0, -3.4), UnitQuaternion::identity(), black_box(&sample))
                .unwrap();
            projector.clear();
        });
    });
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");
    let mut scene = CsgScene::new();
    let mut evaluator = CopyA;
    let (clean, _) = tick(SceneEditState::new(), &mut scene, &mut evaluator);

    group.bench_function("clean", |b| {
        b.iter(|| tick(black_box(clean), &mut scene, &mut evaluator));
    });

    group.bench_function("dirty", |b| {
        b.iter(|| {
            let mut state = clean;
            scene.set_operation(&mut state, Operation::Union);
            tick(state, &mut scene, &mut evaluator)
        });
    });

    group.finish();
}

criterion_group!(benches, bench_builder, bench_clip, bench_decal_placement, bench_tick);
criterion_main!(benches);
