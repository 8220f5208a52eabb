pub mod cell;
pub mod grid;

pub use cell::{Cell, Rgb15};
pub use grid::{BitGrid, GridEvent, GridEventSink};

/// Distance between two maze cells. The cell in between is the corridor joining them.
pub const STEP: u16 = 2;

/// A grid coordinate. Both axes fit in 16 bits so a position packs into one `u32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: u16,
    pub y: u16,
}

impl Position {
    pub const fn new(x: u16, y: u16) -> Self {
        Position { x, y }
    }

    /// Low 16 bits hold `x`, high 16 bits hold `y`.
    pub const fn pack(self) -> u32 {
        self.x as u32 | ((self.y as u32) << 16)
    }

    pub const fn unpack(packed: u32) -> Self {
        Position {
            x: (packed & 0xffff) as u16,
            y: (packed >> 16) as u16,
        }
    }

    /// Center cell of a `width` x `height` grid, biased up and left.
    pub fn center(width: u16, height: u16) -> Self {
        Position {
            x: (width / 2).saturating_sub(1),
            y: (height / 2).saturating_sub(1),
        }
    }

    /// The position `distance` cells away in `direction`.
    ///
    /// # Panics
    /// In debug builds, if the move leaves the `u16` range. Callers only move in
    /// directions reported by [`unvisited_neighbors`].
    pub fn offset(self, direction: Direction, distance: u16) -> Self {
        match direction {
            Direction::North => Position::new(self.x, self.y - distance),
            Direction::East => Position::new(self.x + distance, self.y),
            Direction::South => Position::new(self.x, self.y + distance),
            Direction::West => Position::new(self.x - distance, self.y),
        }
    }
}

impl From<(u16, u16)> for Position {
    fn from((x, y): (u16, u16)) -> Self {
        Position { x, y }
    }
}

impl From<Position> for (u16, u16) {
    fn from(pos: Position) -> Self {
        (pos.x, pos.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Canonical enumeration order. Direction selection depends on it.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub const fn bit(self) -> u8 {
        match self {
            Direction::North => 0b0001,
            Direction::East => 0b0010,
            Direction::South => 0b0100,
            Direction::West => 0b1000,
        }
    }
}

/// Set of directions with an unvisited cell two steps away.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Neighbors {
    mask: u8,
}

impl Neighbors {
    pub const NONE: Neighbors = Neighbors { mask: 0 };

    pub fn mask(self) -> u8 {
        self.mask
    }

    pub fn count(self) -> usize {
        self.mask.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.mask == 0
    }

    pub fn contains(self, direction: Direction) -> bool {
        self.mask & direction.bit() != 0
    }

    fn insert(&mut self, direction: Direction) {
        self.mask |= direction.bit();
    }

    /// Present directions in canonical order (north, east, south, west).
    pub fn directions(self) -> impl Iterator<Item = Direction> {
        Direction::ALL
            .into_iter()
            .filter(move |&direction| self.contains(direction))
    }
}

/// Get unvisited neighbors of a cell.
///
/// A neighbor is the cell [`STEP`] cells away in a cardinal direction. It is
/// reported when it is uncarved and the whole two-cell carve towards it stays
/// on the grid: probes keep a margin of 2 cells from the near edges and 3 from
/// the far edges, so `y > 2` for north, `x < width - 3` for east,
/// `y < height - 3` for south and `x > 2` for west.
pub fn unvisited_neighbors(grid: &BitGrid, pos: Position) -> Neighbors {
    let Position { x, y } = pos;
    let mut neighbors = Neighbors::NONE;

    if y > STEP && !grid.is_carved(x, y - STEP) {
        neighbors.insert(Direction::North);
    }
    if (x as u32) + 3 < grid.width() as u32 && !grid.is_carved(x + STEP, y) {
        neighbors.insert(Direction::East);
    }
    if (y as u32) + 3 < grid.height() as u32 && !grid.is_carved(x, y + STEP) {
        neighbors.insert(Direction::South);
    }
    if x > STEP && !grid.is_carved(x - STEP, y) {
        neighbors.insert(Direction::West);
    }

    neighbors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_packing() {
        let pos = Position::new(119, 79);
        assert_eq!(pos.pack(), 119 | (79 << 16));
        assert_eq!(Position::unpack(pos.pack()), pos);
        let corner = Position::new(u16::MAX, 1);
        assert_eq!(corner.pack(), 0x0001_ffff);
        assert_eq!(Position::unpack(0x0001_ffff), corner);
    }

    #[test]
    fn test_center() {
        assert_eq!(Position::center(240, 160), Position::new(119, 79));
        assert_eq!(Position::center(8, 8), Position::new(3, 3));
    }

    #[test]
    fn test_all_open_in_the_middle() {
        let grid = BitGrid::new(16, 16);
        let neighbors = unvisited_neighbors(&grid, Position::new(7, 7));
        assert_eq!(neighbors.mask(), 0b1111);
        assert_eq!(neighbors.count(), 4);
        assert_eq!(
            neighbors.directions().collect::<Vec<_>>(),
            Direction::ALL.to_vec()
        );
    }

    #[test]
    fn test_carved_cells_are_excluded() {
        let mut grid = BitGrid::new(16, 16);
        grid.set_carved(7, 5, true);
        grid.set_carved(5, 7, true);
        let neighbors = unvisited_neighbors(&grid, Position::new(7, 7));
        assert_eq!(
            neighbors.directions().collect::<Vec<_>>(),
            vec![Direction::East, Direction::South]
        );
        assert_eq!(neighbors.count(), 2);
    }

    #[test]
    fn test_edge_margins() {
        let grid = BitGrid::new(8, 8);
        // Near edges need y > 2 / x > 2
        assert!(unvisited_neighbors(&grid, Position::new(1, 1)).directions().eq([
            Direction::East,
            Direction::South
        ]));
        // Far edges need x < width - 3 / y < height - 3
        assert!(unvisited_neighbors(&grid, Position::new(5, 5)).directions().eq([
            Direction::North,
            Direction::West
        ]));
        assert!(unvisited_neighbors(&grid, Position::new(0, 0)).directions().eq([
            Direction::East,
            Direction::South
        ]));
    }

    #[test]
    fn test_never_leaves_the_grid() {
        for (width, height) in [(3u16, 3u16), (4, 7), (8, 8), (13, 6)] {
            let grid = BitGrid::new(width, height);
            for y in 0..height {
                for x in 0..width {
                    let pos = Position::new(x, y);
                    for direction in unvisited_neighbors(&grid, pos).directions() {
                        let target = pos.offset(direction, STEP);
                        assert!(
                            grid.is_in_bounds(target.x, target.y),
                            "{:?} from {:?} leaves a {}x{} grid",
                            direction,
                            pos,
                            width,
                            height
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_tiny_grid_has_no_neighbors() {
        let grid = BitGrid::new(3, 3);
        assert!(unvisited_neighbors(&grid, Position::new(1, 1)).is_empty());
    }
}
