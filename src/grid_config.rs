//! This module implements code for describing a crossword puzzle's geometry, independent of the
//! solving algorithm: which cells are fillable, which runs of cells form slots, and where slots
//! cross each other.

use std::collections::HashMap;
use std::fmt;
use std::fmt::Debug;

#[cfg(feature = "serde")]
use serde_derive::{Deserialize, Serialize};

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::{GlyphId, WordId};
use crate::word_list::WordList;

/// An identifier for a given slot: its index into the `GridConfig`'s `slot_configs` field.
pub type SlotId = usize;

/// Zero-indexed (x, y) coords of a cell in the grid, with y = 0 at the top row.
pub type GridCoord = (usize, usize);

/// The orientation of a slot in the grid.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    Across,
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    EmptyGrid,
    RaggedRows,
    UnknownCell(char),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let string = match self {
            GridError::EmptyGrid => "Grid must have at least one row".to_string(),
            GridError::RaggedRows => "Rows in grid must all be the same length".to_string(),
            GridError::UnknownCell(cell) => {
                format!("Grid contains unrecognized cell “{cell}”")
            }
        };
        write!(f, "{string}")
    }
}

/// A struct representing the shape of a puzzle: which cells are part of it and which are blocks
/// or background.
#[derive(Debug, Clone)]
pub struct Grid {
    pub width: usize,
    pub height: usize,

    /// Whether each cell is fillable, in order of row and then column.
    cells: Vec<bool>,
}

impl Grid {
    /// Construct a grid from an explicit fillable-cell matrix, flattened in row-major order.
    #[must_use]
    pub fn new(width: usize, height: usize, cells: Vec<bool>) -> Grid {
        assert_eq!(
            cells.len(),
            width * height,
            "Cell count doesn't match grid dimensions?"
        );
        Grid {
            width,
            height,
            cells,
        }
    }

    /// Parse a grid from a template string with `.` representing empty squares and `#`
    /// representing blocks. Blank lines are skipped; all remaining lines must have the same
    /// number of characters.
    pub fn parse(template: &str) -> Result<Grid, GridError> {
        let mut rows: Vec<Vec<bool>> = vec![];

        for line in template.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let row: Vec<bool> = line
                .chars()
                .map(|cell| match cell {
                    '.' => Ok(true),
                    '#' => Ok(false),
                    _ => Err(GridError::UnknownCell(cell)),
                })
                .collect::<Result<_, _>>()?;

            rows.push(row);
        }

        if rows.is_empty() {
            return Err(GridError::EmptyGrid);
        }

        let width = rows[0].len();
        if rows.iter().any(|row| row.len() != width) {
            return Err(GridError::RaggedRows);
        }

        let height = rows.len();
        Ok(Grid::new(width, height, rows.into_iter().flatten().collect()))
    }

    /// Is the given cell part of the puzzle?
    #[must_use]
    pub fn is_fillable(&self, (x, y): GridCoord) -> bool {
        self.cells[y * self.width + x]
    }
}

/// A struct identifying a specific slot in the grid. Two slots are the same entity exactly when
/// all three fields match.
#[derive(Debug, PartialEq, Eq, Hash, Clone, PartialOrd, Ord)]
pub struct Slot {
    pub start_cell: GridCoord,
    pub direction: Direction,
    pub length: usize,
}

impl Slot {
    /// Parse a string like "1,2,down,5" into a `Slot` struct.
    pub fn from_key(key: &str) -> Result<Slot, String> {
        let key_parts: Vec<&str> = key.split(',').collect();
        if key_parts.len() != 4 {
            return Err(format!("invalid slot key: {key}"));
        }

        let x: Result<usize, _> = key_parts[0].parse();
        let y: Result<usize, _> = key_parts[1].parse();
        let direction: Option<Direction> = match key_parts[2] {
            "across" => Some(Direction::Across),
            "down" => Some(Direction::Down),
            _ => None,
        };
        let length: Result<usize, _> = key_parts[3].parse();

        if let (Ok(x), Ok(y), Some(direction), Ok(length)) = (x, y, direction, length) {
            Ok(Slot {
                start_cell: (x, y),
                direction,
                length,
            })
        } else {
            Err(format!("invalid slot key: {key:?}"))
        }
    }

    /// Represent this slot as a string like "1,2,down,5".
    #[must_use]
    pub fn to_key(&self) -> String {
        let direction = match self.direction {
            Direction::Across => "across",
            Direction::Down => "down",
        };
        format!(
            "{},{},{},{}",
            self.start_cell.0, self.start_cell.1, direction, self.length,
        )
    }

    /// Generate the coords for each cell of this slot.
    #[must_use]
    pub fn cell_coords(&self) -> Vec<GridCoord> {
        (0..self.length)
            .map(|cell_idx| match self.direction {
                Direction::Across => (self.start_cell.0 + cell_idx, self.start_cell.1),
                Direction::Down => (self.start_cell.0, self.start_cell.1 + cell_idx),
            })
            .collect()
    }
}

/// Serialize a `Slot` into a string key.
#[cfg(feature = "serde")]
impl Serialize for Slot {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_key())
    }
}

/// Deserialize a `Slot` from a string key.
#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Slot {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw_string = String::deserialize(deserializer)?;
        Slot::from_key(&raw_string).map_err(serde::de::Error::custom)
    }
}

/// A struct describing one cell a slot shares with another slot: which slot it is, and where the
/// shared cell falls within that slot's word.
#[derive(Debug, Clone)]
pub struct Crossing {
    pub other_slot_id: SlotId,
    pub other_slot_cell: usize,
}

/// A struct representing the aspects of a slot that are static during a solve.
#[derive(Debug, Clone)]
pub struct SlotConfig {
    pub id: SlotId,
    pub start_cell: GridCoord,
    pub direction: Direction,
    pub length: usize,

    /// This slot's crossing for each of its cells, if any.
    pub crossings: Vec<Option<Crossing>>,

    /// The ids of all slots this one crosses, sorted and deduplicated.
    pub neighbors: Vec<SlotId>,
}

impl SlotConfig {
    /// Generate the coords for each cell of this slot.
    #[must_use]
    pub fn cell_coords(&self) -> Vec<GridCoord> {
        self.slot().cell_coords()
    }

    /// Generate a `Slot` identifying this slot.
    #[must_use]
    pub fn slot(&self) -> Slot {
        Slot {
            start_cell: self.start_cell,
            direction: self.direction,
            length: self.length,
        }
    }

    /// Generate a string key identifying this slot.
    #[must_use]
    pub fn slot_key(&self) -> String {
        self.slot().to_key()
    }
}

/// Given a grid, catalog its slots: every maximal horizontal or vertical run of at least two
/// fillable cells. Across slots are listed first in reading order, then down slots in reading
/// order; a slot's position in the returned list becomes its `SlotId`, and that ordering is the
/// tie-break of record wherever the solver has to choose between otherwise-equivalent slots.
#[must_use]
pub fn generate_slots(grid: &Grid) -> Vec<Slot> {
    let mut slots: Vec<Slot> = vec![];

    for y in 0..grid.height {
        for x in 0..grid.width {
            if grid.is_fillable((x, y)) && (x == 0 || !grid.is_fillable((x - 1, y))) {
                let mut length = 1;
                while x + length < grid.width && grid.is_fillable((x + length, y)) {
                    length += 1;
                }
                if length > 1 {
                    slots.push(Slot {
                        start_cell: (x, y),
                        direction: Direction::Across,
                        length,
                    });
                }
            }
        }
    }

    for y in 0..grid.height {
        for x in 0..grid.width {
            if grid.is_fillable((x, y)) && (y == 0 || !grid.is_fillable((x, y - 1))) {
                let mut length = 1;
                while y + length < grid.height && grid.is_fillable((x, y + length)) {
                    length += 1;
                }
                if length > 1 {
                    slots.push(Slot {
                        start_cell: (x, y),
                        direction: Direction::Down,
                        length,
                    });
                }
            }
        }
    }

    slots
}

/// Given `Slot` structs specifying the positions of the slots in a grid, generate `SlotConfig`s
/// containing derived information about crossings and neighbors.
#[must_use]
pub fn generate_slot_configs(slots: &[Slot]) -> Vec<SlotConfig> {
    let mut slot_configs: Vec<SlotConfig> = vec![];

    // Build a map from cell location to the slots involved, which we can then use to calculate
    // crossings.
    let mut entries_by_loc: HashMap<GridCoord, Vec<(usize, usize)>> = HashMap::new();

    for (slot_idx, slot) in slots.iter().enumerate() {
        for (cell_idx, &loc) in slot.cell_coords().iter().enumerate() {
            entries_by_loc.entry(loc).or_default().push((slot_idx, cell_idx));
        }
    }

    for (slot_idx, slot) in slots.iter().enumerate() {
        let crossings: Vec<Option<Crossing>> = slot
            .cell_coords()
            .iter()
            .map(|loc| {
                let crossing_idxs: Vec<_> = entries_by_loc[loc]
                    .iter()
                    .filter(|&&(s, _)| s != slot_idx)
                    .collect();

                if crossing_idxs.is_empty() {
                    None
                } else if crossing_idxs.len() > 1 {
                    panic!("More than two slots crossing in cell?");
                } else {
                    let &(other_slot_id, other_slot_cell) = crossing_idxs[0];

                    Some(Crossing {
                        other_slot_id,
                        other_slot_cell,
                    })
                }
            })
            .collect();

        let mut neighbors: Vec<SlotId> = crossings
            .iter()
            .flatten()
            .map(|crossing| crossing.other_slot_id)
            .collect();
        neighbors.sort_unstable();
        neighbors.dedup();

        slot_configs.push(SlotConfig {
            id: slot_idx,
            start_cell: slot.start_cell,
            direction: slot.direction,
            length: slot.length,
            crossings,
            neighbors,
        });
    }

    slot_configs
}

/// A struct holding all of the information needed as input to a solve: the puzzle's geometry,
/// its derived slots and crossings, and the word list to draw candidates from.
pub struct GridConfig {
    pub grid: Grid,
    pub word_list: WordList,
    pub slot_configs: Vec<SlotConfig>,
}

impl GridConfig {
    #[must_use]
    pub fn new(grid: Grid, word_list: WordList) -> GridConfig {
        let slots = generate_slots(&grid);
        let slot_configs = generate_slot_configs(&slots);

        GridConfig {
            grid,
            word_list,
            slot_configs,
        }
    }

    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slot_configs.len()
    }

    /// If the two given slots share a cell, the index of that cell within each slot's word.
    #[must_use]
    pub fn overlap(&self, a: SlotId, b: SlotId) -> Option<(usize, usize)> {
        self.slot_configs[a]
            .crossings
            .iter()
            .enumerate()
            .find_map(|(cell_idx, crossing)| {
                crossing
                    .as_ref()
                    .filter(|crossing| crossing.other_slot_id == b)
                    .map(|crossing| (cell_idx, crossing.other_slot_cell))
            })
    }

    /// The ids of all slots that share a cell with the given slot.
    #[must_use]
    pub fn neighbors(&self, a: SlotId) -> &[SlotId] {
        &self.slot_configs[a].neighbors
    }
}

impl Debug for GridConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridConfig")
            .field("grid", &self.grid)
            .field("slot_count", &self.slot_configs.len())
            .finish_non_exhaustive()
    }
}

/// A struct recording a slot assignment made during a solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub slot_id: SlotId,
    pub word_id: WordId,
}

/// Turn the given grid config and solve choices into a rendered string, with `#` for blocks and
/// `.` for any fillable cell no choice covers.
#[must_use]
pub fn render_grid(config: &GridConfig, choices: &[Choice]) -> String {
    let mut cells: Vec<char> = (0..config.grid.height)
        .flat_map(|y| {
            (0..config.grid.width).map(move |x| {
                if config.grid.is_fillable((x, y)) {
                    '.'
                } else {
                    '#'
                }
            })
        })
        .collect();

    for &Choice { slot_id, word_id } in choices {
        let slot_config = &config.slot_configs[slot_id];
        let word = config.word_list.get_word((slot_config.length, word_id));

        for (cell_idx, &(x, y)) in slot_config.cell_coords().iter().enumerate() {
            let glyph: GlyphId = word.glyphs[cell_idx];
            cells[y * config.grid.width + x] = config.word_list.glyphs[glyph];
        }
    }

    cells
        .chunks(config.grid.width)
        .map(|line| line.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use crate::grid_config::{
        generate_slot_configs, generate_slots, Direction, Grid, GridConfig, GridError, Slot,
    };
    use crate::word_list::WordList;

    fn empty_word_list() -> WordList {
        WordList::new(&[], None).unwrap()
    }

    #[test]
    fn test_parse_rejects_malformed_templates() {
        assert!(matches!(Grid::parse(""), Err(GridError::EmptyGrid)));
        assert!(matches!(Grid::parse("\n  \n"), Err(GridError::EmptyGrid)));
        assert!(matches!(Grid::parse("..\n..."), Err(GridError::RaggedRows)));
        assert!(matches!(
            Grid::parse(".x.\n..."),
            Err(GridError::UnknownCell('x'))
        ));
    }

    #[test]
    fn test_parse_and_cell_lookup() {
        let grid = Grid::parse("..#\n...").unwrap();

        assert_eq!(grid.width, 3);
        assert_eq!(grid.height, 2);
        assert!(grid.is_fillable((0, 0)));
        assert!(!grid.is_fillable((2, 0)));
        assert!(grid.is_fillable((2, 1)));
    }

    #[test]
    fn test_generate_slots_ordering_and_lengths() {
        let grid = Grid::parse("..#\n...").unwrap();
        let slots = generate_slots(&grid);

        assert_eq!(
            slots,
            vec![
                Slot {
                    start_cell: (0, 0),
                    direction: Direction::Across,
                    length: 2,
                },
                Slot {
                    start_cell: (0, 1),
                    direction: Direction::Across,
                    length: 3,
                },
                Slot {
                    start_cell: (0, 0),
                    direction: Direction::Down,
                    length: 2,
                },
                Slot {
                    start_cell: (1, 0),
                    direction: Direction::Down,
                    length: 2,
                },
            ]
        );
    }

    #[test]
    fn test_generate_slots_skips_single_cell_runs() {
        assert!(generate_slots(&Grid::parse(".").unwrap()).is_empty());
        assert!(generate_slots(&Grid::parse(".#\n#.").unwrap()).is_empty());
    }

    #[test]
    fn test_crossings_and_neighbors() {
        let grid = Grid::parse("..#\n...").unwrap();
        let slot_configs = generate_slot_configs(&generate_slots(&grid));

        let crossing = slot_configs[0].crossings[0].as_ref().unwrap();
        assert_eq!(crossing.other_slot_id, 2);
        assert_eq!(crossing.other_slot_cell, 0);

        // The last cell of the bottom row doesn't cross anything.
        assert!(slot_configs[1].crossings[2].is_none());

        assert_eq!(slot_configs[0].neighbors, vec![2, 3]);
        assert_eq!(slot_configs[1].neighbors, vec![2, 3]);
        assert_eq!(slot_configs[2].neighbors, vec![0, 1]);
    }

    #[test]
    #[should_panic(expected = "More than two slots")]
    fn test_more_than_two_slots_in_a_cell_panics() {
        // Two across slots and a down slot all covering (0, 0) can't come from any real grid.
        generate_slot_configs(&[
            Slot {
                start_cell: (0, 0),
                direction: Direction::Across,
                length: 2,
            },
            Slot {
                start_cell: (0, 0),
                direction: Direction::Across,
                length: 3,
            },
            Slot {
                start_cell: (0, 0),
                direction: Direction::Down,
                length: 2,
            },
        ]);
    }

    #[test]
    fn test_overlap_and_neighbors_lookup() {
        let grid = Grid::parse("..#\n...").unwrap();
        let config = GridConfig::new(grid, empty_word_list());

        assert_eq!(config.overlap(0, 2), Some((0, 0)));
        assert_eq!(config.overlap(2, 0), Some((0, 0)));
        assert_eq!(config.overlap(1, 3), Some((1, 1)));
        assert_eq!(config.overlap(0, 1), None);

        assert_eq!(config.neighbors(3), &[0, 1]);
    }

    #[test]
    fn test_slot_keys_round_trip() {
        let slot = Slot {
            start_cell: (1, 2),
            direction: Direction::Down,
            length: 5,
        };

        assert_eq!(slot.to_key(), "1,2,down,5");
        assert_eq!(Slot::from_key("1,2,down,5"), Ok(slot));
        assert!(Slot::from_key("1,2,sideways,5").is_err());
        assert!(Slot::from_key("1,2,down").is_err());
    }

    #[test]
    fn test_slot_cell_coords() {
        let slot = Slot {
            start_cell: (1, 0),
            direction: Direction::Down,
            length: 3,
        };

        assert_eq!(slot.cell_coords(), vec![(1, 0), (1, 1), (1, 2)]);
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use crate::grid_config::{Direction, Slot};

    #[test]
    fn test_slot_serialization() {
        let slot = Slot {
            start_cell: (1, 2),
            direction: Direction::Across,
            length: 5,
        };

        let slot_key = serde_json::to_string(&slot).unwrap();

        assert_eq!(slot_key, "\"1,2,across,5\"");
    }

    #[test]
    fn test_slot_deserialization() {
        let slot: Slot = serde_json::from_str("\"3,4,down,12\"").unwrap();

        assert_eq!(
            slot,
            Slot {
                start_cell: (3, 4),
                direction: Direction::Down,
                length: 12,
            }
        );
    }
}
