use anyhow::{bail, Context, Result};
use ghostrun_geo::{
    convert, format_coordinate, format_distance, to_raw_from, total_distance,
    ConfigurationManager, Coordinate, JsonFileRouteStore, PositionAnimator, ReferenceSystem,
    RouteRunner, RouteStore, RunReportFormatter, SimulationConfig,
};
use log::info;

/// Rendering frame length used by the headless run (ms)
const FRAME_MS: u64 = 16;

/// A loop along the Bund, drawn in GCJ02
const SAMPLE_ROUTE: [Coordinate; 4] = [
    Coordinate::new(31.2304, 121.4737),
    Coordinate::new(31.2397, 121.4998),
    Coordinate::new(31.2453, 121.5052),
    Coordinate::new(31.2304, 121.4737),
];

fn convert_point(args: &[String]) -> Result<()> {
    let from: ReferenceSystem = args[2].parse()?;
    let to: ReferenceSystem = args[3].parse()?;
    let latitude: f64 = args[4].parse().context("latitude must be a number")?;
    let longitude: f64 = args[5].parse().context("longitude must be a number")?;

    let converted = convert(Coordinate::new(latitude, longitude), from, to);
    println!("{} -> {}: {}", from, to, format_coordinate(&converted));
    Ok(())
}

fn simulate(config: &SimulationConfig) -> Result<()> {
    let route = to_raw_from(&SAMPLE_ROUTE, config.route_system);
    println!("Route length: {}", format_distance(total_distance(&route)));

    if let Some(path) = &config.route_store_path {
        let mut store = JsonFileRouteStore::new(path);
        store
            .save_last_route(&SAMPLE_ROUTE)
            .with_context(|| format!("saving route to {}", path))?;
        info!("Route saved to {}", path);
    }

    let mut runner = RouteRunner::new(config.run)?;
    runner.set_route(&route)?;
    runner.start()?;

    let mut animator = PositionAnimator::with_config(config.animator)?;
    let formatter = RunReportFormatter::new(config.display_system);
    let interval = config.run.update_interval_ms;
    let mut now_ms = 0u64;
    let mut frames = 0usize;

    while let Some(raw) = runner.advance(interval) {
        animator.set_target(convert(raw, ReferenceSystem::Raw, config.display_system));

        let until = now_ms + interval;
        while now_ms < until {
            if animator.tick(now_ms).is_some() {
                frames += 1;
            }
            now_ms += FRAME_MS;
        }

        if runner.stats().elapsed_ms % 60_000 < interval {
            println!("{}", formatter.format_text(&runner.stats()));
        }
        if runner.is_complete() {
            break;
        }
    }

    println!("{}", formatter.format_text(&runner.stats()));
    println!("{} animation frames drawn", frames);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map_or("ghostrun", |s| s.as_str());

    if args.len() == 6 && args[1] == "--convert" {
        return convert_point(&args);
    }

    let config = match args.len() {
        1 => SimulationConfig::default(),
        2 => ConfigurationManager::from_file(&args[1])?.get_config().clone(),
        _ => {
            eprintln!("Usage: {} [config.json]", program);
            eprintln!("   or: {} --convert <from> <to> <lat> <lon>", program);
            bail!("unexpected arguments");
        }
    };

    simulate(&config)
}
