/// A block position in normalized board coordinates (percent of the display
/// region on both axes).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    pub fn distance_to(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// The stock nine-block board: a quasi-random scatter covering the whole
/// region, enough blocks for spans up to nine.
pub fn standard_nine() -> Vec<Position> {
    vec![
        Position::new(10.0, 50.0),
        Position::new(23.0, 25.0),
        Position::new(30.0, 72.0),
        Position::new(45.0, 82.0),
        Position::new(50.0, 35.0),
        Position::new(61.0, 58.0),
        Position::new(70.0, 18.0),
        Position::new(72.0, 80.0),
        Position::new(88.0, 45.0),
    ]
}
