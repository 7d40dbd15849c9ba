use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gloomgrid::world::astar;
use gloomgrid::{build_level, DijkstraMap, Fov, LevelConfig, LevelStyle, Map, Position, Rng, Tile};

fn level(style: LevelStyle) -> (Map, Position, Position) {
    let config = LevelConfig {
        style,
        ..LevelConfig::default()
    };
    let mut rng = Rng::new(42);
    let mut map = build_level(&config, &mut rng);

    for pos in map.positions_where(|tile| tile == Tile::ClosedDoor) {
        map.set_tile(pos, Tile::OpenDoor);
    }
    map.derive_flags();

    let up = map.find_tile(Tile::UpStairs).unwrap();
    let down = map.find_tile(Tile::DownStairs).unwrap();
    (map, up, down)
}

fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Generation");

    for style in LevelStyle::ALL {
        let config = LevelConfig {
            style,
            ..LevelConfig::default()
        };
        group.bench_function(style.name(), |b| {
            let mut seed = 0;
            b.iter(|| {
                seed += 1;
                let mut rng = Rng::new(seed);
                black_box(build_level(&config, &mut rng));
            });
        });
    }

    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let (mut map, up, down) = level(LevelStyle::Caves);
    let mut group = c.benchmark_group("Spatial Queries");

    group.bench_function("FOV (range 10)", |b| {
        let mut fov = Fov::new();
        b.iter(|| {
            fov.clear(&mut map);
            fov.compute(&mut map, black_box(up), 10);
        });
    });

    group.bench_function("Dijkstra (single seed)", |b| {
        let mut dijkstra = DijkstraMap::new(&map);
        b.iter(|| {
            dijkstra.clear();
            dijkstra.add_cost(black_box(down), 0);
            dijkstra.compute(&map);
            black_box(dijkstra.cost(up));
        });
    });

    group.bench_function("A* (stairs to stairs)", |b| {
        b.iter(|| black_box(astar::search(&map, black_box(up), black_box(down))));
    });

    group.finish();
}

criterion_group!(benches, bench_generation, bench_queries);
criterion_main!(benches);
