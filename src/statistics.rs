use std::fmt;
use std::time::Duration;

use crate::algorithms::Algorithm;
use crate::maps::MapKind;

/// Outcome of one delivery mission on one map with one algorithm.
#[derive(Debug, Clone)]
pub struct ExperimentResult {
    pub map: String,
    pub algorithm: Algorithm,
    pub success: bool,
    /// Why the mission stopped early, if it did.
    pub failure: Option<String>,
    pub moves: usize,
    pub fuel_used: u32,
    pub fuel_remaining: u32,
    pub planning_calls: usize,
    pub expanded: usize,
    pub elapsed: Duration,
}

impl ExperimentResult {
    pub fn map_label(kind: Option<MapKind>) -> String {
        kind.map_or_else(|| "file".to_string(), |kind| kind.to_string())
    }

    /// Fuel spent per move, or 0 when the agent never moved.
    pub fn average_step_cost(&self) -> f64 {
        if self.moves > 0 {
            f64::from(self.fuel_used) / self.moves as f64
        } else {
            0.0
        }
    }
}

impl fmt::Display for ExperimentResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Map: {}", self.map)?;
        writeln!(f, "Algorithm: {}", self.algorithm)?;
        writeln!(f, "Success: {}", self.success)?;
        if let Some(reason) = &self.failure {
            writeln!(f, "Failure: {}", reason)?;
        }
        writeln!(f, "Moves: {}", self.moves)?;
        writeln!(f, "Fuel Used: {}", self.fuel_used)?;
        writeln!(f, "Fuel Remaining: {}", self.fuel_remaining)?;
        writeln!(f, "Average Step Cost: {:.2}", self.average_step_cost())?;
        writeln!(f, "Planning Calls: {}", self.planning_calls)?;
        writeln!(f, "Expanded States: {}", self.expanded)?;
        writeln!(f, "Time: {:.2?}", self.elapsed)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_mentions_failure() {
        let result = ExperimentResult {
            map: "small".to_string(),
            algorithm: Algorithm::Ucs,
            success: false,
            failure: Some("out of fuel".to_string()),
            moves: 4,
            fuel_used: 12,
            fuel_remaining: 0,
            planning_calls: 1,
            expanded: 30,
            elapsed: Duration::from_millis(3),
        };
        let text = result.to_string();
        assert!(text.contains("Algorithm: ucs"));
        assert!(text.contains("Failure: out of fuel"));
        assert!(text.contains("Average Step Cost: 3.00"));
    }

    #[test]
    fn test_map_label() {
        assert_eq!(ExperimentResult::map_label(Some(MapKind::Dynamic)), "dynamic");
        assert_eq!(ExperimentResult::map_label(None), "file");
    }
}
