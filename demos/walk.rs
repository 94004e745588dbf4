//! Route one agent across a layout, or let a crowd wander it.
//!
//! Run: cargo run --bin walk -- [MAP_FILE] [--config FILE] [--doors]
//!      [--obstacles] [--scatter DENSITY] [--seed N] [--crowd TICKS]
//!
//! Set `NPCPATH_LOG=debug` to see every search outcome.

use std::error::Error;
use std::fs;
use std::path::PathBuf;

use log::info;
use npcpath_demos::{Crowd, SAMPLE, crowd_is_consistent, init_logger, load_layout, render_route};
use npcpath_paths::{Capabilities, FastAstar, SearchConfig};
use npcpath_terrain::{Tile, scatter};
use rand::SeedableRng;
use rand::rngs::StdRng;

const USAGE: &str = "usage: walk [MAP_FILE] [--config FILE] [--doors] [--obstacles] \
[--scatter DENSITY] [--seed N] [--crowd TICKS]";

const CROWD_SIZE: usize = 6;

#[derive(Debug, Default)]
struct Args {
    map: Option<PathBuf>,
    config: Option<PathBuf>,
    caps: Capabilities,
    scatter: f64,
    seed: u64,
    crowd: Option<u32>,
}

impl Args {
    fn parse(mut it: impl Iterator<Item = String>) -> Result<Self, Box<dyn Error>> {
        let mut args = Args::default();
        while let Some(arg) = it.next() {
            match arg.as_str() {
                "--doors" => args.caps.open_doors = true,
                "--obstacles" => args.caps.cross_obstacles = true,
                "--config" => args.config = Some(value(&mut it, &arg)?.into()),
                "--scatter" => args.scatter = value(&mut it, &arg)?.parse()?,
                "--seed" => args.seed = value(&mut it, &arg)?.parse()?,
                "--crowd" => args.crowd = Some(value(&mut it, &arg)?.parse()?),
                "-h" | "--help" => return Err(USAGE.into()),
                flag if flag.starts_with('-') => {
                    return Err(format!("unknown flag {flag}\n{USAGE}").into());
                }
                _ if args.map.is_none() => args.map = Some(PathBuf::from(&arg)),
                _ => return Err(USAGE.into()),
            }
        }
        Ok(args)
    }
}

fn value(it: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, Box<dyn Error>> {
    it.next().ok_or_else(|| format!("{flag} needs a value").into())
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logger();
    let args = Args::parse(std::env::args().skip(1))?;

    let text = match &args.map {
        Some(path) => fs::read_to_string(path)?,
        None => SAMPLE.to_string(),
    };
    let mut layout = load_layout(&text)?;

    let cfg: SearchConfig = match &args.config {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => SearchConfig::default(),
    };
    let mut pather = FastAstar::with_config(cfg)?;
    let cfg = pather.config();
    info!(
        "window of {} cells, elevations {}..{}",
        cfg.area_size,
        cfg.min_elevation(),
        cfg.max_elevation()
    );

    if args.scatter > 0.0 {
        let mut rng = StdRng::seed_from_u64(args.seed);
        let keep = [layout.start, layout.goal];
        let placed = scatter(&mut layout.map, &mut rng, Tile::Obstacle, args.scatter, &keep);
        info!("scattered {placed} obstacles");
    }

    if let Some(ticks) = args.crowd {
        let mut crowd = Crowd::new(layout.map, pather, CROWD_SIZE, args.seed);
        for _ in 0..ticks {
            let report = crowd.tick();
            info!("tick {}: {report:?}", crowd.ticks());
            debug_assert!(crowd_is_consistent(&crowd));
        }
        println!("{}", crowd.render());
        for npc in crowd.npcs() {
            println!("{} at {} with {} steps to go", npc.glyph, npc.pos, npc.remaining().len());
        }
        return Ok(());
    }

    let (start, goal) = layout.endpoints();
    match pather.search(&args.caps, &layout.map, start, goal) {
        Ok(steps) => {
            let names: Vec<String> = steps.iter().map(ToString::to_string).collect();
            println!("{} steps: {}", steps.len(), names.join(" "));
            println!("{}", render_route(&layout, steps));
        }
        Err(reason) => println!("no path from {start} to {goal}: {reason}"),
    }
    let stats = pather.stats();
    println!(
        "expanded {} nodes, {} oracle calls",
        stats.expanded, stats.oracle_calls
    );
    Ok(())
}
