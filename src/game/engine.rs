use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::config::{GameConfig, WallPolicy};
use super::direction::Direction;
use super::grid::{Cell, Grid};

/// Engine status as observed by the driver after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    /// The engine is paused; the step was a no-op
    Paused,
    /// The step ran (or was dropped by the lenient wall policy)
    Running,
    /// The round has ended; all further steps are no-ops
    GameOver,
}

/// What the snake ran into, if anything
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionKind {
    Wall,
    SelfBody,
}

/// Result of a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    pub status: EngineStatus,
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Collision encountered this step, if any
    pub collision: Option<CollisionKind>,
}

/// Read-only view of the engine state for rendering and testing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Body cells in temporal order of occupation: tail first, head last
    pub body: Vec<Cell>,
    pub food: Option<Cell>,
    pub paused: bool,
    pub over: bool,
    /// Cells grown since the start of the round
    pub score: u32,
}

/// The simulation engine.
///
/// Owns the entire game state; all mutation goes through `set_direction`,
/// `toggle_pause` and `step`. The engine knows nothing about timing: the
/// driver calls `step` once per tick at whatever period it likes.
pub struct GameEngine {
    config: GameConfig,
    grid: Grid,
    rng: StdRng,
    /// Tail at the front, head at the back
    body: VecDeque<Cell>,
    food: Option<Cell>,
    /// Next direction to apply, overwritten by input between ticks
    pending: Direction,
    /// Direction of the last applied move; reversal is judged against this
    heading: Direction,
    paused: bool,
    over: bool,
}

impl GameEngine {
    /// Create a new engine. The session starts paused, with the snake
    /// seeded as a horizontal run in the top-left corner heading right,
    /// and no food on the grid.
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create an engine with a seeded RNG for deterministic food placement
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        let grid = Grid::new(config.grid_width, config.grid_height);
        let body: VecDeque<Cell> = (0..config.initial_snake_length)
            .map(|i| Cell::new(i as i32, 0))
            .collect();

        Self {
            config,
            grid,
            rng,
            body,
            food: None,
            pending: Direction::Right,
            heading: Direction::Right,
            paused: true,
            over: false,
        }
    }

    /// Overwrite the pending direction buffer. Takes effect at the next step.
    pub fn set_direction(&mut self, direction: Direction) {
        self.pending = direction;
    }

    /// Decode a raw direction index and buffer it. Indices outside the
    /// four-direction range are dropped and the prior pending direction
    /// is retained.
    pub fn set_direction_index(&mut self, raw: i32) {
        if let Some(direction) = Direction::from_index(raw) {
            self.pending = direction;
        }
    }

    /// Flip the paused flag; observed starting from the next step
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    /// Advance the simulation by one tick
    pub fn step(&mut self) -> StepOutcome {
        if self.paused {
            return self.skipped(EngineStatus::Paused);
        }
        if self.over {
            return self.skipped(EngineStatus::GameOver);
        }

        let mut direction = self.pending;
        if self.config.reject_reversal && direction.is_opposite(self.heading) {
            direction = self.heading;
        }

        let (dx, dy) = direction.delta();
        let next = self.head().offset(dx, dy);

        if !self.grid.contains(next) {
            return match self.config.wall_policy {
                // Move dropped; food respawn is also skipped this tick
                WallPolicy::Ignore => StepOutcome {
                    status: EngineStatus::Running,
                    ate_food: false,
                    collision: Some(CollisionKind::Wall),
                },
                WallPolicy::EndRound => {
                    self.over = true;
                    StepOutcome {
                        status: EngineStatus::GameOver,
                        ate_food: false,
                        collision: Some(CollisionKind::Wall),
                    }
                }
            };
        }

        let ate_food = self.food == Some(next);

        // Collision must be detected before the body is touched so that a
        // terminal round never leaves a duplicated cell behind.
        if self.config.self_collision_ends_round && self.hits_body(next, ate_food) {
            self.over = true;
            return StepOutcome {
                status: EngineStatus::GameOver,
                ate_food: false,
                collision: Some(CollisionKind::SelfBody),
            };
        }

        self.heading = direction;
        if ate_food {
            self.body.push_back(next);
            self.food = None;
        } else {
            self.body.pop_front();
            self.body.push_back(next);
        }

        // Best-effort food placement: one draw per tick, retried on later
        // ticks while the draw keeps landing on the body.
        if self.food.is_none() {
            let cell = self.grid.random_cell(&mut self.rng);
            if !self.body.contains(&cell) {
                self.food = Some(cell);
            }
        }

        StepOutcome {
            status: EngineStatus::Running,
            ate_food,
            collision: None,
        }
    }

    /// Read-only view of the current state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            body: self.body.iter().copied().collect(),
            food: self.food,
            paused: self.paused,
            over: self.over,
            score: (self.body.len() - self.config.initial_snake_length) as u32,
        }
    }

    fn head(&self) -> Cell {
        *self.body.back().expect("body is never empty")
    }

    fn hits_body(&self, next: Cell, growing: bool) -> bool {
        // On a non-growing move the tail cell vacates before the head
        // arrives, so moving into it is legal.
        let vacating = usize::from(!growing);
        self.body.iter().skip(vacating).any(|&cell| cell == next)
    }

    fn skipped(&self, status: EngineStatus) -> StepOutcome {
        StepOutcome {
            status,
            ate_food: false,
            collision: None,
        }
    }

    #[cfg(test)]
    fn place_food(&mut self, cell: Cell) {
        self.food = Some(cell);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn unpaused(config: GameConfig) -> GameEngine {
        let mut engine = GameEngine::with_seed(config, 7);
        engine.toggle_pause();
        engine
    }

    fn cells(coords: &[(i32, i32)]) -> Vec<Cell> {
        coords.iter().map(|&(x, y)| Cell::new(x, y)).collect()
    }

    #[test]
    fn test_initial_state() {
        let engine = GameEngine::with_seed(GameConfig::small(), 7);
        let snap = engine.snapshot();

        assert!(snap.paused);
        assert!(!snap.over);
        assert_eq!(snap.score, 0);
        assert_eq!(snap.food, None);
        assert_eq!(snap.body, cells(&[(0, 0), (1, 0), (2, 0)]));
    }

    #[test]
    fn test_paused_steps_do_not_mutate() {
        let mut engine = GameEngine::with_seed(GameConfig::small(), 7);
        let before = engine.snapshot();

        for _ in 0..5 {
            let outcome = engine.step();
            assert_eq!(outcome.status, EngineStatus::Paused);
        }

        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn test_toggle_pause_twice_is_identity() {
        let mut engine = GameEngine::with_seed(GameConfig::small(), 7);
        assert!(engine.is_paused());
        engine.toggle_pause();
        engine.toggle_pause();
        assert!(engine.is_paused());
    }

    #[test]
    fn test_translation_preserves_length() {
        let mut engine = unpaused(GameConfig::small());

        let outcome = engine.step();

        assert_eq!(outcome.status, EngineStatus::Running);
        assert!(!outcome.ate_food);
        assert_eq!(engine.snapshot().body, cells(&[(1, 0), (2, 0), (3, 0)]));
    }

    #[test]
    fn test_eating_grows_by_one_and_clears_food() {
        let mut engine = unpaused(GameConfig::small());
        engine.place_food(Cell::new(3, 0));

        let outcome = engine.step();

        assert!(outcome.ate_food);
        let snap = engine.snapshot();
        assert_eq!(snap.body, cells(&[(0, 0), (1, 0), (2, 0), (3, 0)]));
        assert_eq!(snap.score, 1);
        // Food was cleared; whatever is present now came from the respawn
        // draw and cannot be on the body.
        if let Some(food) = snap.food {
            assert!(!snap.body.contains(&food));
        }
    }

    #[test]
    fn test_food_stays_absent_while_grid_is_full() {
        // The snake covers the whole 2x1 grid, so every respawn draw lands
        // on the body and food must stay absent, tick after tick.
        let mut config = GameConfig::lenient(2, 1);
        config.initial_snake_length = 2;
        let mut engine = unpaused(config);

        for turn in 0..10 {
            let direction = if turn % 2 == 0 {
                Direction::Left
            } else {
                Direction::Right
            };
            engine.set_direction(direction);
            let outcome = engine.step();
            assert_eq!(outcome.status, EngineStatus::Running);
            assert_eq!(engine.snapshot().food, None);
        }
    }

    #[test]
    fn test_wall_ends_round_by_default() {
        let mut engine = unpaused(GameConfig::small());
        engine.set_direction(Direction::Up);

        let outcome = engine.step();

        assert_eq!(outcome.status, EngineStatus::GameOver);
        assert_eq!(outcome.collision, Some(CollisionKind::Wall));
        let snap = engine.snapshot();
        assert!(snap.over);
        assert_eq!(snap.body, cells(&[(0, 0), (1, 0), (2, 0)]));

        // Terminal state is absorbing.
        let outcome = engine.step();
        assert_eq!(outcome.status, EngineStatus::GameOver);
        assert_eq!(engine.snapshot().body, cells(&[(0, 0), (1, 0), (2, 0)]));
    }

    #[test]
    fn test_lenient_wall_drops_the_move() {
        let mut engine = unpaused(GameConfig::lenient(5, 5));
        engine.set_direction(Direction::Up);

        let outcome = engine.step();

        assert_eq!(outcome.status, EngineStatus::Running);
        assert_eq!(outcome.collision, Some(CollisionKind::Wall));
        let snap = engine.snapshot();
        assert!(!snap.over);
        assert_eq!(snap.body, cells(&[(0, 0), (1, 0), (2, 0)]));
        assert_eq!(snap.food, None);

        // An in-bounds direction recovers on the next tick.
        engine.set_direction(Direction::Down);
        engine.step();
        assert_eq!(engine.snapshot().body, cells(&[(1, 0), (2, 0), (2, 1)]));
    }

    #[test]
    fn test_reversal_is_rejected() {
        let mut engine = unpaused(GameConfig::small());
        engine.set_direction(Direction::Left);

        engine.step();

        // Heading right; the reversal is discarded and the snake keeps going.
        assert_eq!(engine.snapshot().body, cells(&[(1, 0), (2, 0), (3, 0)]));
    }

    #[test]
    fn test_self_collision_ends_round() {
        let mut engine = unpaused(GameConfig::small());

        // Grow to length 5 along the top row.
        engine.place_food(Cell::new(3, 0));
        engine.step();
        engine.place_food(Cell::new(4, 0));
        engine.step();
        assert_eq!(
            engine.snapshot().body,
            cells(&[(0, 0), (1, 0), (2, 0), (3, 0), (4, 0)])
        );

        // Hook back into the body: down, left, then up into (3, 0).
        engine.set_direction(Direction::Down);
        engine.step();
        engine.set_direction(Direction::Left);
        engine.step();
        engine.set_direction(Direction::Up);
        let outcome = engine.step();

        assert_eq!(outcome.status, EngineStatus::GameOver);
        assert_eq!(outcome.collision, Some(CollisionKind::SelfBody));
        assert!(engine.is_over());
    }

    #[test]
    fn test_moving_into_vacating_tail_is_legal() {
        // Grow the snake until it fills a 3x2 ring, then run laps around
        // that ring: every move steps onto the cell the tail just left.
        fn ring_direction(head: Cell) -> Direction {
            match (head.x, head.y) {
                (3, 0) => Direction::Down,
                (3, 1) | (2, 1) => Direction::Left,
                (1, 1) => Direction::Up,
                (1, 0) | (2, 0) => Direction::Right,
                _ => unreachable!("head left the ring"),
            }
        }

        let mut config = GameConfig::new(5, 5);
        config.initial_snake_length = 4;
        let mut engine = unpaused(config);

        // Body [(0,0),(1,0),(2,0),(3,0)], head (3,0); eat twice to reach 6.
        engine.place_food(Cell::new(3, 1));
        engine.set_direction(Direction::Down);
        engine.step();
        engine.place_food(Cell::new(2, 1));
        engine.set_direction(Direction::Left);
        engine.step();
        assert_eq!(engine.snapshot().score, 2);

        for _ in 0..18 {
            // Park the food off the ring so laps never grow the snake.
            engine.place_food(Cell::new(0, 4));
            let head = *engine.snapshot().body.last().unwrap();
            engine.set_direction(ring_direction(head));
            let outcome = engine.step();
            assert_eq!(outcome.status, EngineStatus::Running);
        }
        assert!(!engine.is_over());
    }

    #[test]
    fn test_set_direction_is_idempotent() {
        let mut once = unpaused(GameConfig::small());
        let mut thrice = unpaused(GameConfig::small());

        once.set_direction(Direction::Down);
        for _ in 0..3 {
            thrice.set_direction(Direction::Down);
        }
        once.step();
        thrice.step();

        assert_eq!(once.snapshot(), thrice.snapshot());
    }

    #[test]
    fn test_invalid_direction_index_is_ignored() {
        let mut engine = unpaused(GameConfig::small());
        engine.set_direction_index(3); // down
        engine.set_direction_index(9); // junk: prior pending retained
        engine.set_direction_index(-1);

        engine.step();

        assert_eq!(engine.snapshot().body, cells(&[(1, 0), (2, 0), (2, 1)]));
    }

    #[test]
    fn test_body_never_duplicates_and_food_never_on_body() {
        let mut engine = unpaused(GameConfig::new(10, 10));
        let mut rng = StdRng::seed_from_u64(99);

        for _ in 0..300 {
            engine.set_direction_index(rng.gen_range(0..4));
            engine.step();
            let snap = engine.snapshot();

            let mut seen = snap.body.clone();
            seen.sort_by_key(|c| (c.x, c.y));
            seen.dedup();
            assert_eq!(seen.len(), snap.body.len(), "duplicate body cell");

            if let Some(food) = snap.food {
                assert!(!snap.body.contains(&food), "food on body");
            }
            if snap.over {
                break;
            }
        }
    }

    #[test]
    fn test_food_not_on_body_under_lenient_rules() {
        let mut engine = unpaused(GameConfig::lenient(8, 8));
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..500 {
            engine.set_direction_index(rng.gen_range(0..4));
            engine.step();
            let snap = engine.snapshot();
            assert!(!snap.over);
            if let Some(food) = snap.food {
                assert!(!snap.body.contains(&food), "food on body");
            }
        }
    }
}
