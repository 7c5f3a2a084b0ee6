use super::direction::Direction;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring cell one step away in `direction`
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// The snake: body segments with the head at index 0, plus its travel
/// direction. The direction is `None` until the first steer or start.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    pub body: Vec<Position>,
    pub direction: Option<Direction>,
}

impl Snake {
    /// A freshly spawned snake: a single cell, not yet moving
    pub fn spawn(head: Position) -> Self {
        Self {
            body: vec![head],
            direction: None,
        }
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Whether any segment occupies `pos`
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Whether `pos` coincides with a segment other than the head
    pub fn hits_body(&self, pos: Position) -> bool {
        self.body[1..].contains(&pos)
    }

    /// Adopt a new travel direction unless it would reverse straight into
    /// the second body segment. Returns whether the turn was accepted.
    pub fn turn(&mut self, direction: Direction) -> bool {
        match self.direction {
            Some(current) if current.is_opposite(direction) => false,
            _ => {
                self.direction = Some(direction);
                true
            }
        }
    }

    /// Move one cell in `direction`: the new head is prepended, and the
    /// tail is dropped unless the snake grew this tick.
    pub fn advance(&mut self, direction: Direction, grow: bool) -> Position {
        let new_head = self.head().step(direction);
        self.body.insert(0, new_head);
        if !grow {
            self.body.pop();
        }
        new_head
    }
}

/// What the snake ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake left the play field
    Wall,
    /// Snake hit its own body
    SelfCollision,
}

/// Lifecycle phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameStatus {
    /// Board is reset and waiting for the first start
    #[default]
    Idle,
    Running,
    Paused,
    /// Terminal: a collision ended the run
    Over,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    pub grid_size: usize,
    pub score: u32,
    pub status: GameStatus,
}

impl GameState {
    pub fn new(snake: Snake, food: Position, grid_size: usize) -> Self {
        Self {
            snake,
            food,
            grid_size,
            score: 0,
            status: GameStatus::Idle,
        }
    }

    /// Check if a position is within the grid bounds
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x < self.grid_size as i32
            && pos.y >= 0
            && pos.y < self.grid_size as i32
    }
}
