pub mod error;

use error::WorldError;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The neighbouring position one cell towards `direction`, if it does not underflow.
    pub fn stepped(&self, direction: Direction) -> Option<Position> {
        let (row, col) = match direction {
            Direction::Up => (self.row.checked_sub(1)?, self.col),
            Direction::Down => (self.row.checked_add(1)?, self.col),
            Direction::Left => (self.row, self.col.checked_sub(1)?),
            Direction::Right => (self.row, self.col.checked_add(1)?),
        };
        Some(Position { row, col })
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub const fn turned_left(self) -> Self {
        match self {
            Direction::Up => Direction::Left,
            Direction::Left => Direction::Down,
            Direction::Down => Direction::Right,
            Direction::Right => Direction::Up,
        }
    }

    pub const fn turned_right(self) -> Self {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Blocked,
    Path,
    Goal,
}

impl Cell {
    pub const fn code(self) -> u8 {
        match self {
            Cell::Blocked => 0,
            Cell::Path => 1,
            Cell::Goal => 2,
        }
    }

    pub const fn is_walkable(self) -> bool {
        !matches!(self, Cell::Blocked)
    }
}

impl TryFrom<u8> for Cell {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Cell::Blocked),
            1 => Ok(Cell::Path),
            2 => Ok(Cell::Goal),
            other => Err(other),
        }
    }
}

/// The maze a program is run against.
///
/// Cells are stored row-major. The world is never mutated by a run; only the
/// character state owned by the interpreter changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridWorld {
    cells: Vec<Cell>,
    rows: usize,
    cols: usize,
    start: Position,
    start_direction: Direction,
    goal: Position,
}

impl GridWorld {
    pub fn new(
        codes: &[Vec<u8>],
        start: Position,
        start_direction: Direction,
        goal: Position,
    ) -> Result<Self, WorldError> {
        let rows = codes.len();
        let cols = codes.first().map(Vec::len).unwrap_or(0);
        if rows == 0 || cols == 0 {
            return Err(WorldError::Empty);
        }

        let mut cells = Vec::with_capacity(rows * cols);
        for (row, line) in codes.iter().enumerate() {
            if line.len() != cols {
                return Err(WorldError::Ragged {
                    row,
                    expected: cols,
                    actual: line.len(),
                });
            }
            for (col, &code) in line.iter().enumerate() {
                let cell = Cell::try_from(code).map_err(|code| WorldError::InvalidCell {
                    position: Position::new(row, col),
                    code,
                })?;
                cells.push(cell);
            }
        }

        let world = Self {
            cells,
            rows,
            cols,
            start,
            start_direction,
            goal,
        };
        if !world.contains(start) {
            return Err(WorldError::StartOutOfBounds(start));
        }
        if !world.contains(goal) {
            return Err(WorldError::GoalOutOfBounds(goal));
        }
        Ok(world)
    }

    /// Finds the only goal-coded cell of a grid, if there is exactly one.
    pub fn find_goal(codes: &[Vec<u8>]) -> Option<Position> {
        let mut goals = codes.iter().enumerate().flat_map(|(row, line)| {
            line.iter()
                .enumerate()
                .filter(|&(_, &code)| code == Cell::Goal.code())
                .map(move |(col, _)| Position::new(row, col))
        });
        let goal = goals.next()?;
        match goals.next() {
            Some(_) => None,
            None => Some(goal),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn start_direction(&self) -> Direction {
        self.start_direction
    }

    pub fn goal(&self) -> Position {
        self.goal
    }

    pub fn contains(&self, position: Position) -> bool {
        position.row < self.rows && position.col < self.cols
    }

    pub fn cell(&self, position: Position) -> Option<Cell> {
        if self.contains(position) {
            self.cells.get(position.row * self.cols + position.col).copied()
        } else {
            None
        }
    }

    pub fn is_walkable(&self, position: Position) -> bool {
        self.cell(position).is_some_and(Cell::is_walkable)
    }

    /// The cell in front of `position`, or `None` when it would leave the grid.
    pub fn ahead(&self, position: Position, direction: Direction) -> Option<Position> {
        position
            .stepped(direction)
            .filter(|target| self.contains(*target))
    }

    pub fn front_is_clear(&self, position: Position, direction: Direction) -> bool {
        self.ahead(position, direction)
            .is_some_and(|target| self.is_walkable(target))
    }

    pub fn codes(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.cols)
            .map(|row| row.iter().map(|cell| cell.code()).collect())
            .collect()
    }
}
