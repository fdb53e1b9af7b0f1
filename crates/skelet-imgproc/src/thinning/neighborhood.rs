/// Position of a neighbor around the center pixel.
///
/// The discriminant is the index into [`Neighborhood::ring`], walking the ring
/// clockwise from north. In the thinning literature these are `P2..P9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `P2`, row above.
    North = 0,
    /// `P3`
    NorthEast = 1,
    /// `P4`, column to the right.
    East = 2,
    /// `P5`
    SouthEast = 3,
    /// `P6`, row below.
    South = 4,
    /// `P7`
    SouthWest = 5,
    /// `P8`, column to the left.
    West = 6,
    /// `P9`
    NorthWest = 7,
}

impl Direction {
    /// All directions in ring order.
    pub const CLOCKWISE: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Offset `(dx, dy)` from the center pixel, with `y` growing downwards.
    pub fn offset(&self) -> (isize, isize) {
        match self {
            Direction::North => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, 1),
            Direction::South => (0, 1),
            Direction::SouthWest => (-1, 1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, -1),
        }
    }
}

/// Snapshot of the 8 neighbors of a pixel, `true` meaning foreground.
///
/// The ring is ordered as in [`Direction::CLOCKWISE`]. Every statistic and
/// every removal rule reads the same ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Neighborhood {
    ring: [bool; 8],
}

impl Neighborhood {
    /// Create a neighborhood from its ring `[P2, P3, ..., P9]`.
    pub fn from_ring(ring: [bool; 8]) -> Self {
        Self { ring }
    }

    /// The neighbors in clockwise order starting from north.
    pub fn ring(&self) -> [bool; 8] {
        self.ring
    }

    /// Whether the neighbor in the given direction is foreground.
    pub fn get(&self, direction: Direction) -> bool {
        self.ring[direction as usize]
    }

    /// Number of foreground neighbors, `B(P1)` in Zhang-Suen. Range `0..=8`.
    pub fn neighbor_count(&self) -> u8 {
        self.ring.iter().filter(|&&p| p).count() as u8
    }

    /// Number of background to foreground transitions walking the ring once
    /// and wrapping back to north, `A(P1)` in Zhang-Suen. Range `0..=4`.
    pub fn transitions(&self) -> u8 {
        (0..8)
            .filter(|&k| !self.ring[k] && self.ring[(k + 1) % 8])
            .count() as u8
    }
}

#[cfg(test)]
mod tests {
    use super::{Direction, Neighborhood};

    // parses a 3x3 window written row by row, the center is ignored
    fn window(rows: [&str; 3]) -> Neighborhood {
        let cell = |dx: isize, dy: isize| {
            rows[(dy + 1) as usize].as_bytes()[(dx + 1) as usize] == b'#'
        };
        let mut ring = [false; 8];
        for d in Direction::CLOCKWISE {
            let (dx, dy) = d.offset();
            ring[d as usize] = cell(dx, dy);
        }
        Neighborhood::from_ring(ring)
    }

    #[test]
    fn test_empty_neighborhood() {
        let n = window(["...", ".#.", "..."]);
        assert_eq!(n.neighbor_count(), 0);
        assert_eq!(n.transitions(), 0);
    }

    #[test]
    fn test_full_neighborhood() {
        let n = window(["###", "###", "###"]);
        assert_eq!(n.neighbor_count(), 8);
        assert_eq!(n.transitions(), 0);
    }

    #[test]
    fn test_ring_order() {
        let n = window(["#..", ".#.", "..."]);
        assert!(n.get(Direction::NorthWest));
        assert_eq!(n.ring(), [false, false, false, false, false, false, false, true]);

        let n = window([".#.", ".#.", "..#"]);
        assert!(n.get(Direction::North));
        assert!(n.get(Direction::SouthEast));
    }

    #[test]
    fn test_transitions_wrap_around() {
        // NW and N form one run across the end of the ring
        let n = window(["##.", ".#.", "..."]);
        assert_eq!(n.neighbor_count(), 2);
        assert_eq!(n.transitions(), 1);
    }

    #[test]
    fn test_transitions_alternating() {
        let n = window(["#.#", ".#.", "#.#"]);
        assert_eq!(n.neighbor_count(), 4);
        assert_eq!(n.transitions(), 4);
    }

    #[test]
    fn test_transitions_line_middle() {
        let n = window(["...", "###", "..."]);
        assert_eq!(n.neighbor_count(), 2);
        assert_eq!(n.transitions(), 2);
    }

    #[test]
    fn test_offsets_cover_window() {
        let mut seen = std::collections::HashSet::new();
        for d in Direction::CLOCKWISE {
            let (dx, dy) = d.offset();
            assert!((-1..=1).contains(&dx) && (-1..=1).contains(&dy));
            assert!(dx != 0 || dy != 0);
            assert!(seen.insert((dx, dy)));
        }
        assert_eq!(seen.len(), 8);
    }
}
