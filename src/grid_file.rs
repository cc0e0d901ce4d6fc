//! Plain-text grid files.
//!
//! ```text
//! <width> <height>
//! <wall count>
//! <x> <y>                                  one line per wall
//! <cost> <cost> ...                        `height` rows of `width` terrain costs
//! <moving obstacle count>
//! <x> <y> <n> <x1> <y1> ... <xn> <yn> <speed>   one line per moving obstacle
//! ```
//!
//! The leading `x y` of a moving obstacle is its current position; it picks
//! the waypoint the obstacle starts from. Blank lines are ignored.

use std::fmt::Write as _;
use std::path::Path;
use std::str::FromStr;

use tracing::warn;

use crate::error::GridFileError;
use crate::grid::{Grid, Position, Terrain};
use crate::obstacle::MovingObstacle;

struct Lines<'a> {
    inner: std::iter::Enumerate<std::str::Lines<'a>>,
    last: usize,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        Lines {
            inner: text.lines().enumerate(),
            last: 0,
        }
    }

    /// Next non-blank line as `(line number, fields)`.
    fn next_fields(&mut self, what: &str) -> Result<(usize, Vec<&'a str>), GridFileError> {
        for (index, line) in self.inner.by_ref() {
            self.last = index + 1;
            let fields: Vec<_> = line.split_whitespace().collect();
            if !fields.is_empty() {
                return Ok((index + 1, fields));
            }
        }
        Err(GridFileError::parse(self.last + 1, format!("unexpected end of file, expected {what}")))
    }

    fn next_count(&mut self, what: &str) -> Result<usize, GridFileError> {
        let (line, fields) = self.next_fields(what)?;
        match fields.as_slice() {
            [count] => parse_field(line, count, what),
            _ => Err(GridFileError::parse(line, format!("expected a single {what}"))),
        }
    }
}

fn parse_field<T: FromStr>(line: usize, field: &str, what: &str) -> Result<T, GridFileError> {
    field
        .parse()
        .map_err(|_| GridFileError::parse(line, format!("invalid {what} `{field}`")))
}

fn parse_position(line: usize, x: &str, y: &str) -> Result<Position, GridFileError> {
    Ok(Position {
        x: parse_field(line, x, "x coordinate")?,
        y: parse_field(line, y, "y coordinate")?,
    })
}

impl Grid {
    /// Parses a world from the grid file format.
    pub fn parse(text: &str) -> Result<Grid, GridFileError> {
        let mut lines = Lines::new(text);

        let (line, fields) = lines.next_fields("grid dimensions")?;
        let [width, height] = fields.as_slice() else {
            return Err(GridFileError::parse(line, "expected `<width> <height>`"));
        };
        let mut grid = Grid::new(
            parse_field(line, width, "width")?,
            parse_field(line, height, "height")?,
        )?;

        let walls = lines.next_count("wall count")?;
        for _ in 0..walls {
            let (line, fields) = lines.next_fields("wall position")?;
            let [x, y] = fields.as_slice() else {
                return Err(GridFileError::parse(line, "expected `<x> <y>`"));
            };
            grid.add_wall(parse_position(line, x, y)?)?;
        }

        for y in 0..grid.height {
            let (line, fields) = lines.next_fields("terrain row")?;
            if fields.len() != grid.width {
                return Err(GridFileError::parse(
                    line,
                    format!("expected {} terrain costs, found {}", grid.width, fields.len()),
                ));
            }
            for (x, field) in fields.iter().enumerate() {
                let cost: u32 = parse_field(line, field, "terrain cost")?;
                grid.terrain[x][y] = Terrain::try_from(cost)?;
            }
        }

        let obstacles = lines.next_count("moving obstacle count")?;
        for _ in 0..obstacles {
            let (line, fields) = lines.next_fields("moving obstacle")?;
            grid.add_moving_obstacle(parse_obstacle(line, &fields)?);
        }

        Ok(grid)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Grid, GridFileError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| GridFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Grid::parse(&text)
    }

    /// Serializes the world; [`Grid::parse`] reads it back.
    pub fn to_file_string(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} {}", self.width, self.height);

        let walls: Vec<_> = (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| Position { x, y }))
            .filter(|pos| self.is_wall(*pos))
            .collect();
        let _ = writeln!(out, "{}", walls.len());
        for pos in walls {
            let _ = writeln!(out, "{} {}", pos.x, pos.y);
        }

        for y in 0..self.height {
            let row: Vec<_> = (0..self.width)
                .map(|x| self.terrain[x][y].cost().to_string())
                .collect();
            let _ = writeln!(out, "{}", row.join(" "));
        }

        let _ = writeln!(out, "{}", self.moving_obstacles().len());
        for obstacle in self.moving_obstacles() {
            let current = obstacle.position();
            let _ = write!(out, "{} {} {}", current.x, current.y, obstacle.waypoints().len());
            for waypoint in obstacle.waypoints() {
                let _ = write!(out, " {} {}", waypoint.x, waypoint.y);
            }
            let _ = writeln!(out, " {}", obstacle.speed());
        }
        out
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), GridFileError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_file_string()).map_err(|source| GridFileError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn parse_obstacle(line: usize, fields: &[&str]) -> Result<MovingObstacle, GridFileError> {
    if fields.len() < 3 {
        return Err(GridFileError::parse(line, "expected `<x> <y> <n> <waypoints...> <speed>`"));
    }
    let current = parse_position(line, fields[0], fields[1])?;
    let count: usize = parse_field(line, fields[2], "waypoint count")?;

    let expected = count
        .checked_mul(2)
        .and_then(|n| n.checked_add(4))
        .ok_or_else(|| GridFileError::parse(line, "waypoint count too large"))?;
    if fields.len() != expected {
        return Err(GridFileError::parse(
            line,
            format!("expected {expected} fields for {count} waypoints, found {}", fields.len()),
        ));
    }

    let waypoints = fields[3..3 + 2 * count]
        .chunks_exact(2)
        .map(|pair| parse_position(line, pair[0], pair[1]))
        .collect::<Result<Vec<_>, _>>()?;
    let speed = parse_field(line, fields[expected - 1], "speed")?;

    let start_index = match waypoints.iter().position(|&w| w == current) {
        Some(index) => index,
        None => {
            warn!(line, ?current, "moving obstacle is not on its path, starting at the first waypoint");
            0
        }
    };

    Ok(MovingObstacle::new(waypoints, speed)?.with_start_index(start_index)?)
}
