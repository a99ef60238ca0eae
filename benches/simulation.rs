use criterion::{black_box, criterion_group, criterion_main, Criterion};
use voxfall::core::{
    determinism_hash, resolve, BagEntry, Grid, Level, Simulation, VoxelPlacement,
};
use voxfall::types::{GravityDir, InputCommand, Int3, MaterialId, OccupancyType, PieceKind};

fn level() -> Level {
    let mut level = Level::new(
        "bench",
        Int3::new(8, 16, 8),
        vec![
            BagEntry::new(PieceKind::T4, MaterialId::default()),
            BagEntry::new(PieceKind::L4, MaterialId::new("HEAVY")),
            BagEntry::new(PieceKind::I4, MaterialId::new("FROST")),
        ],
    );
    for x in 0..8 {
        for z in 0..8 {
            level.voxels.push(VoxelPlacement::new(Int3::new(x, 1, z), OccupancyType::Water));
        }
    }
    level.voxels.push(VoxelPlacement::new(Int3::new(0, 0, 0), OccupancyType::Drain));
    level
}

fn bench_tick(c: &mut Criterion) {
    let level = level();
    let mut sim = Simulation::new(&level).unwrap();

    c.bench_function("sim_tick_noop", |b| {
        b.iter(|| {
            if sim.status().is_terminal() {
                sim = Simulation::new(&level).unwrap();
            }
            sim.tick(black_box(InputCommand::Noop)).unwrap();
        })
    });
}

fn bench_hard_drop_loop(c: &mut Criterion) {
    let level = level();

    c.bench_function("sim_hard_drop_x8", |b| {
        b.iter(|| {
            let mut sim = Simulation::new(&level).unwrap();
            for _ in 0..8 {
                sim.tick(black_box(InputCommand::HardDrop)).unwrap();
            }
        })
    });
}

fn bench_world_rotation(c: &mut Criterion) {
    let level = level();
    let mut sim = Simulation::new(&level).unwrap();

    c.bench_function("sim_world_rotation", |b| {
        b.iter(|| {
            if sim.status().is_terminal() {
                sim = Simulation::new(&level).unwrap();
            }
            sim.tick(black_box(InputCommand::RotateWorldForward)).unwrap();
        })
    });
}

fn bench_determinism_hash(c: &mut Criterion) {
    let sim = Simulation::new(&level()).unwrap();

    c.bench_function("determinism_hash", |b| {
        b.iter(|| determinism_hash(black_box(&sim)))
    });
}

fn bench_resolve(c: &mut Criterion) {
    let sim = Simulation::new(&level()).unwrap();
    let grid: &Grid = sim.grid();
    let piece = sim.active().unwrap().clone();

    c.bench_function("resolve_rotate_cw", |b| {
        b.iter(|| {
            resolve(
                grid,
                black_box(&piece),
                GravityDir::NegY,
                black_box(InputCommand::RotateCw),
            )
        })
    });
}

criterion_group!(
    benches,
    bench_tick,
    bench_hard_drop_loop,
    bench_world_rotation,
    bench_determinism_hash,
    bench_resolve
);
criterion_main!(benches);
