use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use relicforge::{DefinitionRegistry, EngineConfig, LootGenerator};

fn bench_select_entry(c: &mut Criterion) {
    let registry = DefinitionRegistry::with_defaults();
    let config = EngineConfig::default();
    let generator = LootGenerator::new(&registry, &config);
    let Some(table) = registry.loot_table("dungeon_common") else {
        return;
    };
    let mut rng = StdRng::seed_from_u64(7);

    c.bench_function("select_entry dungeon_common", |b| {
        b.iter(|| generator.select_entry(black_box(table), black_box(6), &mut rng))
    });
}

fn bench_generate(c: &mut Criterion) {
    let registry = DefinitionRegistry::with_defaults();
    let config = EngineConfig::default();
    let generator = LootGenerator::new(&registry, &config);
    let mut rng = StdRng::seed_from_u64(7);

    c.bench_function("generate chest x10", |b| {
        b.iter(|| generator.generate(black_box("chest"), black_box(12), 10, &mut rng))
    });
}

criterion_group!(benches, bench_select_entry, bench_generate);
criterion_main!(benches);
