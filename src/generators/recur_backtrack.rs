use crate::{
    generators::{BoundedStack, GenerationError, GenerationReport, Lcg},
    maze::{
        BitGrid, Cell, Direction, GridEvent, GridEventSink, Neighbors, Position, STEP,
        unvisited_neighbors,
    },
};

/// Lifecycle of a [`MazeGenerator`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorState {
    /// No maze in progress.
    #[default]
    Idle,
    /// Extending a path or backtracking.
    Carving,
    /// The stack drained, or overflowed. Waiting to be rendered.
    Done,
}

/// Carves perfect mazes with a randomized depth-first search over an explicit
/// bounded stack.
///
/// The generator owns the grid, the stack and the PRNG. The PRNG state carries
/// over from one generation to the next.
pub struct MazeGenerator {
    grid: BitGrid,
    stack: BoundedStack,
    prng: Lcg,
    start: Position,
    state: GeneratorState,
}

impl MazeGenerator {
    /// # Panics
    /// If `start` lies outside a `width` x `height` grid or `stack_capacity` is zero.
    pub fn new(width: u16, height: u16, start: Position, stack_capacity: usize, seed: u32) -> Self {
        let grid = BitGrid::new(width, height);
        assert!(
            grid.is_in_bounds(start.x, start.y),
            "start {:?} is outside the {}x{} grid",
            start,
            width,
            height
        );
        MazeGenerator {
            grid,
            stack: BoundedStack::new(stack_capacity),
            prng: Lcg::new(seed),
            start,
            state: GeneratorState::Idle,
        }
    }

    pub fn grid(&self) -> &BitGrid {
        &self.grid
    }

    pub fn prng(&self) -> &Lcg {
        &self.prng
    }

    pub fn prng_mut(&mut self) -> &mut Lcg {
        &mut self.prng
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn stack_capacity(&self) -> usize {
        self.stack.capacity()
    }

    pub fn state(&self) -> GeneratorState {
        self.state
    }

    /// Returns to [`GeneratorState::Idle`] once a finished maze has been shown.
    pub fn finish(&mut self) {
        if self.state == GeneratorState::Done {
            self.state = GeneratorState::Idle;
        }
    }

    /// Resets every cell to uncarved.
    pub fn clear<S: GridEventSink>(&mut self, sink: &mut S) {
        self.grid.clear();
        sink.send_event(GridEvent::Cleared {
            width: self.grid.width(),
            height: self.grid.height(),
        });
    }

    fn carve<S: GridEventSink>(&mut self, pos: Position, sink: &mut S) {
        if self.grid.set_carved(pos.x, pos.y, true) {
            sink.send_event(GridEvent::Update {
                coord: pos.into(),
                cell: Cell::Carved,
            });
        }
    }

    /// Picks one of the open directions uniformly.
    fn choose_direction(&mut self, neighbors: Neighbors) -> Direction {
        // Ordered list of the open directions, north first
        let mut choices = [Direction::North; 4];
        let mut count = 0;
        for direction in neighbors.directions() {
            choices[count] = direction;
            count += 1;
        }
        choices[self.prng.choose_index(count)]
    }

    /// Carves a full maze from the start cell, emitting every cell change to `sink`.
    ///
    /// Each step jumps [`STEP`] cells to an unvisited neighbor and carves the
    /// cell in between, so corridors and walls are one cell wide. When a path
    /// dead-ends, positions are popped off the stack until one with an
    /// unvisited neighbor is found. The run ends once the stack is empty.
    ///
    /// # Errors
    /// [`GenerationError::StackOverflow`] if the path gets deeper than the stack
    /// capacity. Carving stops immediately and the overflow sentinel is drawn.
    pub fn generate<S: GridEventSink>(
        &mut self,
        sink: &mut S,
    ) -> Result<GenerationReport, GenerationError> {
        self.state = GeneratorState::Carving;
        let seed = self.prng.seed();
        tracing::debug!(
            "[generator] starting at {:?} with seed {} on a {}x{} grid",
            self.start,
            seed,
            self.grid.width(),
            self.grid.height()
        );

        self.clear(sink);
        self.stack.reset();

        let mut current = self.start;
        self.carve(current, sink);
        self.stack.push(current);
        let mut report = GenerationReport {
            visited: 1,
            pushes: 1,
            ..Default::default()
        };

        while !self.stack.is_empty() {
            if self.stack.is_overflowed() {
                return Err(self.overflow(sink));
            }

            // Go as far as possible along this path
            let mut neighbors = unvisited_neighbors(&self.grid, current);
            while !neighbors.is_empty() {
                self.stack.push(current);
                report.pushes += 1;
                // Any pop past this point could return an overwritten slot
                if self.stack.is_overflowed() {
                    return Err(self.overflow(sink));
                }

                let direction = self.choose_direction(neighbors);
                self.carve(current.offset(direction, 1), sink);
                current = current.offset(direction, STEP);
                self.carve(current, sink);
                report.visited += 1;
                report.edges += 1;

                neighbors = unvisited_neighbors(&self.grid, current);
            }

            // Dead end, backtrack
            match self.stack.pop() {
                Some(pos) => {
                    current = pos;
                    report.pops += 1;
                }
                None => break,
            }
        }

        report.peak_depth = self.stack.peak();
        self.state = GeneratorState::Done;
        tracing::info!(
            "[generator] seed {} carved {} cells, peak stack depth {}/{}",
            seed,
            report.visited,
            report.peak_depth,
            self.stack.capacity()
        );
        Ok(report)
    }

    /// Stops the run and draws the sentinel: every valid cell of the last
    /// word of the bottom row.
    fn overflow<S: GridEventSink>(&mut self, sink: &mut S) -> GenerationError {
        let depth = self.stack.len();
        let capacity = self.stack.capacity();
        tracing::warn!(
            "[generator] stack overflow at depth {} (capacity {}), abandoning maze",
            depth,
            capacity
        );

        let last_col = self.grid.words_per_row() - 1;
        let first_x = (last_col * BitGrid::WORD_BITS as usize) as u16;
        let y = self.grid.height() - 1;
        for x in first_x..self.grid.width() {
            self.carve(Position::new(x, y), sink);
        }

        self.state = GeneratorState::Done;
        GenerationError::StackOverflow { depth, capacity }
    }
}
