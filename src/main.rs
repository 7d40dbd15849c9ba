//! Gloomgrid - Entry Point
//!
//! Builds a level, looks around from the up stairs and walks to the down
//! stairs, then prints what it found.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use gloomgrid::config::{default_config_path, load_config, load_or_default};
use gloomgrid::world::astar;
use gloomgrid::world::fov::is_visible;
use gloomgrid::{build_level, DijkstraMap, Fov, LevelStyle, Map, Position, Rng, Tile};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StyleArg {
    Caves,
    Dungeon,
    Lakes,
    Chambers,
}

impl From<StyleArg> for LevelStyle {
    fn from(style: StyleArg) -> Self {
        match style {
            StyleArg::Caves => LevelStyle::Caves,
            StyleArg::Dungeon => LevelStyle::Dungeon,
            StyleArg::Lakes => LevelStyle::Lakes,
            StyleArg::Chambers => LevelStyle::Chambers,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "gloomgrid")]
#[command(about = "Generate a roguelike level and trace sight lines and paths through it")]
struct Args {
    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Level template
    #[arg(long, value_enum)]
    style: Option<StyleArg>,

    /// Width of the map in tiles
    #[arg(short = 'W', long)]
    width: Option<i32>,

    /// Height of the map in tiles
    #[arg(short = 'H', long)]
    height: Option<i32>,

    /// RON config file (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sight radius from the up stairs
    #[arg(long, default_value = "8")]
    fov_range: i32,

    /// Print the effective config as RON and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    // An explicit path must load; the default one may be missing
    let mut config = match &args.config {
        Some(path) => load_config(path).with_context(|| format!("loading {}", path.display()))?,
        None => load_or_default(&default_config_path()),
    };

    if let Some(style) = args.style {
        config.style = style.into();
    }
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.validate()?;

    if args.print_config {
        println!("{}", config.to_ron()?);
        return Ok(());
    }

    let mut rng = match config.seed {
        Some(seed) => Rng::new(seed),
        None => Rng::from_entropy(),
    };

    println!("Generating {} level with seed: {}", config.style, rng.seed());
    println!("Map size: {}x{}", config.width, config.height);

    let mut map = build_level(&config, &mut rng);

    let (Some(up), Some(down)) = (map.find_tile(Tile::UpStairs), map.find_tile(Tile::DownStairs)) else {
        anyhow::bail!("level has no stairs");
    };

    // Walk straight through doors
    for pos in map.positions_where(|tile| tile == Tile::ClosedDoor) {
        map.set_tile(pos, Tile::OpenDoor);
    }
    map.derive_flags();

    let mut fov = Fov::new();
    fov.compute(&mut map, up, args.fov_range);
    let visible = map.positions_where(|_| true).into_iter().filter(|&pos| is_visible(&map, pos)).count();

    let route = astar::search(&map, up, down);

    let mut dijkstra = DijkstraMap::new(&map);
    dijkstra.add_cost(down, 0);
    dijkstra.compute(&map);
    let walk = dijkstra.path(down, up);

    println!();
    print!("{}", render(&map, &route));
    println!();
    println!("Stairs: up {:?}, down {:?}", (up.x, up.y), (down.x, down.y));
    println!(
        "Tiles: {} floor, {} corridor, {} water, {} doors",
        map.count_tiles(Tile::Floor),
        map.count_tiles(Tile::Corridor),
        map.count_tiles(Tile::Water),
        map.count_tiles(Tile::OpenDoor)
    );
    println!("Visible from up stairs (range {}): {} cells", args.fov_range, visible);
    if route.is_empty() {
        println!("A*: no route");
    } else {
        println!("A*: {} steps", route.len() - 1);
    }
    println!(
        "Cost field: {} steps to the down stairs, walk of {} cells",
        dijkstra.cost(up),
        walk.len()
    );

    Ok(())
}

/// The map with the inner cells of a route drawn as `*`
fn render(map: &Map, route: &[Position]) -> String {
    let mut rows: Vec<Vec<char>> = map
        .tiles()
        .chunks(map.width() as usize)
        .map(|row| row.iter().map(Tile::glyph).collect())
        .collect();

    let inner = route.len().saturating_sub(1);
    for &pos in route.iter().take(inner).skip(1) {
        rows[pos.y as usize][pos.x as usize] = '*';
    }

    rows.into_iter()
        .map(|row| {
            let mut line: String = row.into_iter().collect();
            line.truncate(line.trim_end().len());
            line.push('\n');
            line
        })
        .collect()
}
