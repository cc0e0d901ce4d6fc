use std::process;

use clap::Parser;
use tracing::error;

use delivery_planner::config::Config;
use delivery_planner::grid::Grid;
use delivery_planner::maps::Scenario;
use delivery_planner::simulation::{print_comparison_results, run_all_algorithms};
use delivery_planner::statistics::ExperimentResult;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("delivery_planner=info")),
        )
        .init();

    let config = Config::parse();
    if let Err(e) = run(&config) {
        error!("{}", e);
        process::exit(1);
    }
}

fn run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let algorithms = config.algorithms()?;
    let planner_config = config.planner_config();
    planner_config.validate()?;

    let (scenario, map) = match &config.grid_file {
        Some(path) => {
            let scenario = Scenario {
                grid: Grid::load(path)?,
                start: config.start,
                packages: config.packages.clone(),
                destinations: config.destinations.clone(),
            };
            (scenario, ExperimentResult::map_label(None))
        }
        None => (
            Scenario::build(config.map, config.seed)?,
            ExperimentResult::map_label(Some(config.map)),
        ),
    };

    if let Some(path) = &config.save_map {
        scenario.grid.save(path)?;
        println!("Saved map to {}", path.display());
    }

    println!("Starting delivery planning...");
    println!("Grid size: {}x{}", scenario.grid.width, scenario.grid.height);
    println!(
        "Moving obstacles: {}, Stops: {}",
        scenario.grid.moving_obstacles().len(),
        scenario.stops().count()
    );
    println!("Fuel: {}", config.fuel);
    println!();

    if !config.no_visualization {
        print!("{}", scenario.grid.render(Some(scenario.start)));
        println!();
    }

    let results = run_all_algorithms(&scenario, &map, &algorithms, config.fuel, &planner_config);
    match results.as_slice() {
        [single] => {
            println!("\n=== FINAL RESULTS ===");
            println!("{}", single);
        }
        _ => print_comparison_results(&results),
    }
    Ok(())
}
