//! Terminal placement geometry.

use crate::circuit::{Point, Rotation, TerminalSide};

/// Distance from a component's center to each terminal.
pub const DEFAULT_HALF_LENGTH: f64 = 40.0;

/// Compute the position of a terminal.
///
/// The unrotated offset is `(-h, 0)` for A and `(+h, 0)` for B. It is rotated
/// by the component angle and added to the center:
///
/// ```text
/// x' = cos(θ)·dx - sin(θ)·dy
/// y' = sin(θ)·dx + cos(θ)·dy
/// ```
pub fn terminal_position(
    center: Point,
    rotation: Rotation,
    side: TerminalSide,
    half_length: f64,
) -> Point {
    let dx = side.offset_sign() * half_length;
    let dy = 0.0;
    let (sin, cos) = match rotation {
        // Exact values keep grid-snapped terminals on the grid
        Rotation::Deg0 => (0.0, 1.0),
        Rotation::Deg90 => (1.0, 0.0),
    };
    Point::new(
        center.x + cos * dx - sin * dy,
        center.y + sin * dx + cos * dy,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_terminals() {
        let c = Point::new(100.0, 60.0);
        let a = terminal_position(c, Rotation::Deg0, TerminalSide::A, 40.0);
        let b = terminal_position(c, Rotation::Deg0, TerminalSide::B, 40.0);
        assert_eq!(a, Point::new(60.0, 60.0));
        assert_eq!(b, Point::new(140.0, 60.0));
    }

    #[test]
    fn test_vertical_terminals() {
        let c = Point::new(100.0, 60.0);
        let a = terminal_position(c, Rotation::Deg90, TerminalSide::A, 40.0);
        let b = terminal_position(c, Rotation::Deg90, TerminalSide::B, 40.0);
        assert_eq!(a, Point::new(100.0, 20.0));
        assert_eq!(b, Point::new(100.0, 100.0));
    }
}
