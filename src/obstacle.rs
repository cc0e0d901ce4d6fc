use crate::error::ConfigError;
use crate::grid::Position;

/// An obstacle cycling through a fixed list of waypoints.
///
/// The obstacle moves to the next waypoint every `speed` ticks and wraps
/// around at the end of the list. Its future positions are a pure function
/// of the current waypoint index, the ticks already spent there and the
/// requested offset, so planners can look ahead without stepping it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovingObstacle {
    waypoints: Vec<Position>,
    index: usize,
    speed: usize,
    elapsed: usize,
}

impl MovingObstacle {
    pub fn new(waypoints: Vec<Position>, speed: usize) -> Result<Self, ConfigError> {
        if waypoints.is_empty() {
            return Err(ConfigError::EmptyWaypoints);
        }
        if speed == 0 {
            return Err(ConfigError::InvalidSpeed(speed));
        }
        // One spare waypoint of headroom so `position_at` can add the ticks
        // already spent at the current waypoint without overflowing.
        if (waypoints.len() + 1).checked_mul(speed).is_none() {
            return Err(ConfigError::CycleTooLong {
                waypoints: waypoints.len(),
                speed,
            });
        }

        Ok(MovingObstacle {
            waypoints,
            index: 0,
            speed,
            elapsed: 0,
        })
    }

    /// Starts the obstacle at `index` instead of the first waypoint.
    pub fn with_start_index(mut self, index: usize) -> Result<Self, ConfigError> {
        if index >= self.waypoints.len() {
            return Err(ConfigError::InvalidWaypointIndex {
                index,
                len: self.waypoints.len(),
            });
        }
        self.index = index;
        Ok(self)
    }

    pub fn waypoints(&self) -> &[Position] {
        &self.waypoints
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn speed(&self) -> usize {
        self.speed
    }

    pub fn position(&self) -> Position {
        self.waypoints[self.index]
    }

    /// Ticks until the obstacle repeats its whole cycle.
    pub fn period(&self) -> usize {
        self.waypoints.len() * self.speed
    }

    /// Where the obstacle will be `offset` ticks from now.
    pub fn position_at(&self, offset: usize) -> Position {
        let len = self.waypoints.len();
        // Only the offset within one cycle matters; reducing first keeps the sum from overflowing.
        let ticks = self.elapsed + offset % self.period();
        let advanced = ticks / self.speed;
        self.waypoints[(self.index + advanced) % len]
    }

    /// Moves the obstacle forward by one tick.
    pub fn advance(&mut self) {
        self.elapsed += 1;
        if self.elapsed >= self.speed {
            self.elapsed = 0;
            self.index = (self.index + 1) % self.waypoints.len();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Position> {
        vec![
            Position::new(0, 0),
            Position::new(0, 1),
            Position::new(1, 1),
            Position::new(1, 0),
        ]
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        assert_eq!(MovingObstacle::new(Vec::new(), 1), Err(ConfigError::EmptyWaypoints));
        assert_eq!(MovingObstacle::new(square(), 0), Err(ConfigError::InvalidSpeed(0)));
        assert!(MovingObstacle::new(square(), 1).unwrap().with_start_index(4).is_err());
        assert_eq!(
            MovingObstacle::new(square(), usize::MAX / 4),
            Err(ConfigError::CycleTooLong {
                waypoints: 4,
                speed: usize::MAX / 4
            })
        );
    }

    #[test]
    fn test_very_slow_obstacle_predicts_without_overflow() {
        let speed = usize::MAX / 3;
        let mut obstacle =
            MovingObstacle::new(vec![Position::new(0, 0), Position::new(1, 0)], speed).unwrap();
        obstacle.advance();
        assert_eq!(obstacle.period(), 2 * speed);
        assert_eq!(obstacle.position_at(usize::MAX), Position::new(1, 0));
        assert_eq!(obstacle.position_at(speed - 2), Position::new(0, 0));
        assert_eq!(obstacle.position_at(speed - 1), Position::new(1, 0));
    }

    #[test]
    fn test_advance_follows_waypoints() {
        let mut obstacle = MovingObstacle::new(square(), 1).unwrap();
        assert_eq!(obstacle.position(), Position::new(0, 0));

        obstacle.advance();
        assert_eq!(obstacle.position(), Position::new(0, 1));

        obstacle.advance();
        assert_eq!(obstacle.position(), Position::new(1, 1));
    }

    #[test]
    fn test_position_prediction() {
        let obstacle = MovingObstacle::new(square(), 1).unwrap();
        assert_eq!(obstacle.position_at(0), Position::new(0, 0));
        assert_eq!(obstacle.position_at(1), Position::new(0, 1));
        assert_eq!(obstacle.position_at(2), Position::new(1, 1));
        assert_eq!(obstacle.position_at(4), Position::new(0, 0));
    }

    #[test]
    fn test_slow_obstacle_lingers() {
        let mut obstacle = MovingObstacle::new(square(), 2).unwrap();
        assert_eq!(obstacle.position_at(1), Position::new(0, 0));
        assert_eq!(obstacle.position_at(2), Position::new(0, 1));

        obstacle.advance();
        assert_eq!(obstacle.position(), Position::new(0, 0));
        assert_eq!(obstacle.position_at(1), Position::new(0, 1));
    }

    #[test]
    fn test_prediction_matches_stepping_mid_cycle() {
        let mut obstacle = MovingObstacle::new(square(), 3).unwrap().with_start_index(2).unwrap();
        obstacle.advance();

        let mut stepped = obstacle.clone();
        for offset in 0..40 {
            assert_eq!(obstacle.position_at(offset), stepped.position(), "offset {offset}");
            stepped.advance();
        }
    }
}
