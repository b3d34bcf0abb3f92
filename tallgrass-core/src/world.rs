use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{BlockCause, CommandError, LayoutError};

/// Reference route: rock border, tall grass patches and two ponds.
/// Spawn (2, 2) sits in the north-west grass patch.
pub const REFERENCE_LAYOUT: &str = r#"
RRRRRRRRRRRR
R..........R
R.GGGG..WW.R
R.GGGG..WW.R
R......R...R
R.WW...R.GGR
R.WW.....GGR
R...GGG..GGR
R...GGG....R
RRRRRRRRRRRR
"#;

const MAX_SIDE: u16 = 256;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum TileType {
    Plain,
    Grass,
    Water,
    Rock,
}

impl TileType {
    fn from_layout_char(ch: char) -> Self {
        match ch {
            'G' => TileType::Grass,
            'W' => TileType::Water,
            'R' => TileType::Rock,
            _ => TileType::Plain,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Tile {
    pub kind: TileType,
    pub walkable: bool,
}

impl Tile {
    pub fn new(kind: TileType) -> Self {
        Self {
            kind,
            walkable: !matches!(kind, TileType::Water | TileType::Rock),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Position {
    pub x: u16,
    pub y: u16,
}

impl Position {
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Raw neighbour coordinates, possibly negative or past the map edge.
    pub fn offset(self, direction: Direction) -> (i32, i32) {
        let (dx, dy) = direction.delta();
        (i32::from(self.x) + dx, i32::from(self.y) + dy)
    }
}

/// Immutable tile grid built once from a character layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldMap {
    width: u16,
    height: u16,
    tiles: Vec<Tile>,
}

impl WorldMap {
    /// Parses a row-based layout (`G` grass, `W` water, `R` rock, anything
    /// else plain). Blank lines and surrounding whitespace are ignored.
    pub fn from_layout(layout: &str) -> Result<Self, LayoutError> {
        let rows: Vec<&str> = layout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let Some(first) = rows.first() else {
            return Err(LayoutError::Empty);
        };
        let width = first.chars().count();
        let height = rows.len();
        if width > usize::from(MAX_SIDE) || height > usize::from(MAX_SIDE) {
            return Err(LayoutError::TooLarge { max: MAX_SIDE });
        }

        let mut tiles = Vec::with_capacity(width * height);
        for (row, line) in rows.iter().enumerate() {
            let actual = line.chars().count();
            if actual != width {
                return Err(LayoutError::RaggedRow {
                    row,
                    expected: width,
                    actual,
                });
            }
            tiles.extend(line.chars().map(|ch| Tile::new(TileType::from_layout_char(ch))));
        }

        let map = Self {
            width: width as u16,
            height: height as u16,
            tiles,
        };
        map.check_border()?;
        Ok(map)
    }

    pub fn reference() -> Result<Self, LayoutError> {
        Self::from_layout(REFERENCE_LAYOUT)
    }

    fn check_border(&self) -> Result<(), LayoutError> {
        for y in 0..self.height {
            for x in 0..self.width {
                let on_edge = x == 0 || y == 0 || x + 1 == self.width || y + 1 == self.height;
                if on_edge && self.tiles[self.index(x, y)].kind != TileType::Rock {
                    return Err(LayoutError::OpenBorder { x, y });
                }
            }
        }
        Ok(())
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < i32::from(self.width) && y < i32::from(self.height)
    }

    pub fn tile_at(&self, x: i32, y: i32) -> Result<Tile, CommandError> {
        if !self.contains(x, y) {
            return Err(CommandError::OutOfBounds { x, y });
        }
        Ok(self.tiles[self.index(x as u16, y as u16)])
    }

    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.tile_at(x, y).map(|tile| tile.walkable).unwrap_or(false)
    }

    /// Resolves a one-tile step, reporting why it is refused if it is.
    pub fn step(&self, from: Position, direction: Direction) -> Result<(Position, Tile), CommandError> {
        let (x, y) = from.offset(direction);
        let tile = self.tile_at(x, y).map_err(|_| CommandError::Blocked {
            x,
            y,
            cause: BlockCause::Edge,
        })?;
        if !tile.walkable {
            return Err(CommandError::Blocked {
                x,
                y,
                cause: BlockCause::Obstacle(tile.kind),
            });
        }
        Ok((Position::new(x as u16, y as u16), tile))
    }

    /// Tiles of one row, left to right. Empty for rows past the bottom edge.
    pub fn row(&self, y: u16) -> &[Tile] {
        if y >= self.height {
            return &[];
        }
        let start = usize::from(y) * usize::from(self.width);
        &self.tiles[start..start + usize::from(self.width)]
    }

    fn index(&self, x: u16, y: u16) -> usize {
        (y as usize * self.width as usize) + x as usize
    }
}
