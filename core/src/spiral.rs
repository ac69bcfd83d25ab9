//! Outward square spiral that lays the one-dimensional road onto a plane.
//!
//! Position zero sits at the origin. The walk heads east first and turns
//! clockwise after every leg; legs grow by one unit each time the walk turns
//! back to east or west, which yields the sequence E1 S1 W2 N2 E3 S3 W4 N4 ...

use crate::{Direction, Position, SpiralCoord};

/// Maps a logical road position to its coordinate on the spiral plane.
#[must_use]
pub fn coords_for(position: Position) -> SpiralCoord {
    let mut spiral = Spiral::new();
    for _ in 0..position.get() {
        spiral.advance();
    }
    spiral.coord()
}

/// Sequential walker over the spiral that yields one position per step.
///
/// Scanning a range of positions with the walker costs a single step per
/// position, whereas repeated [`coords_for`] calls replay the walk each time.
#[derive(Clone, Debug)]
pub struct Spiral {
    position: u32,
    coord: SpiralCoord,
    direction: Direction,
    leg_length: u32,
    walked: u32,
}

impl Spiral {
    /// Creates a walker standing on position zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            position: 0,
            coord: SpiralCoord::ORIGIN,
            direction: Direction::East,
            leg_length: 1,
            walked: 0,
        }
    }

    /// Position the walker currently stands on.
    #[must_use]
    pub const fn position(&self) -> Position {
        Position::new(self.position)
    }

    /// Spiral coordinate of the current position.
    #[must_use]
    pub const fn coord(&self) -> SpiralCoord {
        self.coord
    }

    /// Steps to the next position along the spiral.
    pub fn advance(&mut self) {
        self.coord = self.coord.step(self.direction);
        self.position = self.position.saturating_add(1);
        self.walked += 1;
        if self.walked == self.leg_length {
            self.walked = 0;
            self.direction = self.direction.clockwise();
            if matches!(self.direction, Direction::East | Direction::West) {
                self.leg_length += 1;
            }
        }
    }
}

impl Default for Spiral {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for Spiral {
    type Item = (Position, SpiralCoord);

    fn next(&mut self) -> Option<Self::Item> {
        let item = (Position::new(self.position), self.coord);
        self.advance();
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_positions_follow_the_outward_spiral() {
        let expected = [
            (0, 0),
            (0, 1),
            (1, 1),
            (1, 0),
            (1, -1),
            (0, -1),
            (-1, -1),
            (-1, 0),
            (-1, 1),
            (-1, 2),
            (0, 2),
            (1, 2),
            (2, 2),
        ];

        for (position, (row, column)) in expected.into_iter().enumerate() {
            let coord = coords_for(Position::new(position as u32));
            assert_eq!(
                coord,
                SpiralCoord::new(row, column),
                "position {position} landed on the wrong coordinate"
            );
        }
    }

    #[test]
    fn walker_agrees_with_direct_mapping() {
        for (position, coord) in Spiral::new().take(200) {
            assert_eq!(coord, coords_for(position));
        }
    }

    #[test]
    fn iteration_yields_consecutive_positions() {
        let positions: Vec<u32> = Spiral::new()
            .take(4)
            .map(|(position, _)| position.get())
            .collect();
        assert_eq!(positions, vec![0, 1, 2, 3]);
    }

    #[test]
    fn walker_reports_its_position() {
        let mut spiral = Spiral::new();
        spiral.advance();
        spiral.advance();
        assert_eq!(spiral.position(), Position::new(2));
        assert_eq!(spiral.coord(), SpiralCoord::new(1, 1));
    }

    #[test]
    fn full_rings_close_on_the_diagonal() {
        // The west leg of ring k ends on the lower-left corner (k, -k) at position (2k)^2.
        assert_eq!(coords_for(Position::new(4)), SpiralCoord::new(1, -1));
        assert_eq!(coords_for(Position::new(16)), SpiralCoord::new(2, -2));
        assert_eq!(coords_for(Position::new(36)), SpiralCoord::new(3, -3));
    }
}
