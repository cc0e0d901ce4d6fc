use std::time::Instant;

use tracing::info;

use crate::agent::DeliveryAgent;
use crate::algorithms::Algorithm;
use crate::config::PlannerConfig;
use crate::maps::Scenario;
use crate::statistics::ExperimentResult;

/// Runs one delivery mission on a copy of `scenario`'s world.
///
/// The scenario is cloned so every algorithm sees moving obstacles in the
/// same initial state.
pub fn run_experiment(
    scenario: &Scenario,
    map: &str,
    algorithm: Algorithm,
    fuel: u32,
    config: &PlannerConfig,
) -> ExperimentResult {
    let mut grid = scenario.grid.clone();
    let mut agent = DeliveryAgent::new(scenario.start, fuel);
    for &package in &scenario.packages {
        agent.add_package(package);
    }
    for &destination in &scenario.destinations {
        agent.add_destination(destination);
    }

    let started = Instant::now();
    let outcome = agent.deliver_packages(&mut grid, algorithm, config);
    let elapsed = started.elapsed();

    let report = agent.report();
    ExperimentResult {
        map: map.to_string(),
        algorithm,
        success: outcome.is_ok(),
        failure: outcome.err().map(|err| err.to_string()),
        moves: report.moves,
        fuel_used: report.fuel_used,
        fuel_remaining: report.fuel_remaining,
        planning_calls: report.planning_calls,
        expanded: report.expanded,
        elapsed,
    }
}

/// Runs the same scenario with every algorithm in `algorithms`.
pub fn run_all_algorithms(
    scenario: &Scenario,
    map: &str,
    algorithms: &[Algorithm],
    fuel: u32,
    config: &PlannerConfig,
) -> Vec<ExperimentResult> {
    let mut results = Vec::with_capacity(algorithms.len());

    for (i, &algorithm) in algorithms.iter().enumerate() {
        info!("Running algorithm {} of {}: {}", i + 1, algorithms.len(), algorithm);
        let result = run_experiment(scenario, map, algorithm, fuel, config);
        info!(
            "Completed: {} - Success: {}, Moves: {}, Fuel used: {}",
            algorithm, result.success, result.moves, result.fuel_used
        );
        results.push(result);
    }

    results
}

pub fn print_comparison_results(results: &[ExperimentResult]) {
    println!("\n=== ALGORITHM COMPARISON RESULTS ===");
    println!();

    println!(
        "{:<10} {:<8} {:<8} {:<8} {:<10} {:<10} {:<12} {:<12}",
        "Algorithm", "Map", "Success", "Moves", "Fuel Used", "Fuel Left", "Expanded", "Time"
    );
    println!("{}", "-".repeat(84));

    for result in results {
        let success_str = if result.success { "✓" } else { "✗" };
        println!(
            "{:<10} {:<8} {:<8} {:<8} {:<10} {:<10} {:<12} {:<12}",
            result.algorithm.name(),
            result.map,
            success_str,
            result.moves,
            result.fuel_used,
            result.fuel_remaining,
            result.expanded,
            format!("{:.2?}", result.elapsed),
        );
    }
    println!();

    for result in results.iter().filter(|r| !r.success) {
        if let Some(reason) = &result.failure {
            println!("{} failed: {}", result.algorithm, reason);
        }
    }

    let successful: Vec<_> = results.iter().filter(|r| r.success).collect();
    let (Some(cheapest), Some(fastest)) = (
        successful.iter().min_by_key(|r| r.fuel_used),
        successful.iter().min_by_key(|r| r.elapsed),
    ) else {
        println!("No algorithm completed the mission.");
        return;
    };

    println!("=== PERFORMANCE ANALYSIS ===");
    println!("Cheapest route: {} ({} fuel)", cheapest.algorithm, cheapest.fuel_used);
    println!("Fastest planner: {} ({:.2?})", fastest.algorithm, fastest.elapsed);
    if let Some(fewest) = successful.iter().min_by_key(|r| r.expanded) {
        println!("Fewest expansions: {} ({} states)", fewest.algorithm, fewest.expanded);
    }
}
