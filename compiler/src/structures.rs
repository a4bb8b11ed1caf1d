use std::collections::{BTreeMap, BTreeSet};

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::constants::{GRID_SIZE, STATIC_WAIT};
use crate::encoder::{self, Command};

/// One screen's lit LEDs: a set of row indices per column. The grid is
/// dense over columns (all 16 are always present) and sparse over rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "BTreeMap<String, Vec<RowValue>>")]
pub struct PixelGrid {
    columns: [BTreeSet<u8>; GRID_SIZE],
}

impl PixelGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips one LED.
    pub fn toggle(&mut self, x: u8, y: u8) {
        assert!(
            (x as usize) < GRID_SIZE && (y as usize) < GRID_SIZE,
            "LED coordinates are 0-15"
        );
        let rows = &mut self.columns[x as usize];
        if !rows.remove(&y) {
            rows.insert(y);
        }
    }

    pub fn is_lit(&self, x: u8, y: u8) -> bool {
        assert!(
            (x as usize) < GRID_SIZE && (y as usize) < GRID_SIZE,
            "LED coordinates are 0-15"
        );
        self.columns[x as usize].contains(&y)
    }

    /// True when no LED on the screen is lit.
    pub fn is_empty(&self) -> bool {
        self.columns.iter().all(|rows| rows.is_empty())
    }

    pub fn lit_count(&self) -> usize {
        self.columns.iter().map(BTreeSet::len).sum()
    }

    /// Lit coordinates in encoding order: column by column, rows ascending
    /// within each column.
    pub fn lit(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.columns
            .iter()
            .enumerate()
            .flat_map(|(x, rows)| rows.iter().map(move |y| (x as u8, *y)))
    }
}

impl Serialize for PixelGrid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(GRID_SIZE))?;
        for (x, rows) in self.columns.iter().enumerate() {
            map.serialize_entry(&x.to_string(), rows)?;
        }
        map.end()
    }
}

/// Rows arrive as plain integers from files this tool writes, and as
/// zero-padded strings ("03") from the oldest save files.
#[derive(Deserialize)]
#[serde(untagged)]
enum RowValue {
    Number(u8),
    Legacy(String),
}

impl TryFrom<BTreeMap<String, Vec<RowValue>>> for PixelGrid {
    type Error = String;

    fn try_from(columns: BTreeMap<String, Vec<RowValue>>) -> Result<Self, Self::Error> {
        let mut grid = PixelGrid::new();
        for (key, rows) in columns {
            let x: usize = key
                .parse()
                .map_err(|_| format!("column key {:?} is not a number", key))?;
            if x >= GRID_SIZE {
                return Err(format!("column {} is outside the {}-wide matrix", x, GRID_SIZE));
            }
            for row in rows {
                let y = match row {
                    RowValue::Number(y) => y,
                    RowValue::Legacy(text) => text
                        .parse()
                        .map_err(|_| format!("row {:?} is not a number", text))?,
                };
                if (y as usize) >= GRID_SIZE {
                    return Err(format!("row {} is outside the {}-tall matrix", y, GRID_SIZE));
                }
                grid.columns[x].insert(y);
            }
        }
        Ok(grid)
    }
}

/// The ordered screens, keyed by index. Indices may go sparse while
/// editing; encoding and saving always pass through [`compact`] first.
///
/// [`compact`]: ScreenSequence::compact
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "BTreeMap<String, PixelGrid>")]
pub struct ScreenSequence {
    screens: BTreeMap<usize, PixelGrid>,
}

impl ScreenSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a copy of `grid` at `index`. The caller's working grid and
    /// the stored screen never alias.
    pub fn set_screen(&mut self, index: usize, grid: &PixelGrid) {
        self.screens.insert(index, grid.clone());
    }

    pub fn screen(&self, index: usize) -> Option<&PixelGrid> {
        self.screens.get(&index)
    }

    /// True when nothing would survive compaction.
    pub fn is_blank(&self) -> bool {
        self.screens.values().all(PixelGrid::is_empty)
    }

    /// Highest stored index, or `None` for a sequence with no screens.
    pub fn max_index(&self) -> Option<usize> {
        self.screens.keys().next_back().copied()
    }

    /// Drops every fully-empty screen and renumbers the survivors
    /// contiguously from 0, keeping their order. Idempotent.
    pub fn compact(&mut self) {
        let screens = std::mem::take(&mut self.screens);
        self.screens = screens
            .into_values()
            .filter(|grid| !grid.is_empty())
            .enumerate()
            .collect();
    }

    /// Compacts, then encodes every screen in order. Each inner vec holds
    /// one screen's commands; the final screen is flagged so a static
    /// sequence stops there instead of advancing.
    pub fn encode_screens(&mut self, wait_time: i32) -> Vec<Vec<Command>> {
        self.compact();
        let max_index = match self.max_index() {
            Some(max_index) => max_index,
            None => return Vec::new(),
        };
        (0..=max_index)
            .map(|index| {
                encoder::encode_screen(self.screens.get(&index), index == max_index, wait_time)
            })
            .collect()
    }

    /// One flat command stream for the whole sequence.
    pub fn encode_all(&mut self, wait_time: i32) -> Vec<Command> {
        self.encode_screens(wait_time).into_iter().flatten().collect()
    }
}

impl Serialize for ScreenSequence {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.screens.len()))?;
        for (index, grid) in &self.screens {
            map.serialize_entry(&index.to_string(), grid)?;
        }
        map.end()
    }
}

// Screen keys get the same hand parsing as column keys, so the oldest
// files' zero-padded indices ("07") still load.
impl TryFrom<BTreeMap<String, PixelGrid>> for ScreenSequence {
    type Error = String;

    fn try_from(screens: BTreeMap<String, PixelGrid>) -> Result<Self, Self::Error> {
        let mut sequence = ScreenSequence::new();
        for (key, grid) in screens {
            let index: usize = key
                .parse()
                .map_err(|_| format!("screen key {:?} is not a number", key))?;
            sequence.screens.insert(index, grid);
        }
        Ok(sequence)
    }
}

/// The persisted input document: the screens plus the shared wait time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "Screens")]
    pub screens: ScreenSequence,
    #[serde(rename = "Wait_time", default = "default_wait_time")]
    pub wait_time: i32,
}

impl Default for Document {
    fn default() -> Self {
        Document {
            screens: ScreenSequence::new(),
            wait_time: STATIC_WAIT,
        }
    }
}

fn default_wait_time() -> i32 {
    STATIC_WAIT
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;

    #[test]
    fn toggling_lights_and_clears_one_led() {
        let mut grid = PixelGrid::new();
        assert!(grid.is_empty());

        grid.toggle(4, 9);
        assert!(grid.is_lit(4, 9));
        assert!(!grid.is_lit(9, 4));
        assert!(!grid.is_empty());

        grid.toggle(4, 9);
        assert!(!grid.is_lit(4, 9));
        assert!(grid.is_empty());
    }

    #[test]
    #[should_panic(expected = "LED coordinates are 0-15")]
    fn is_lit_rejects_coordinates_off_the_matrix() {
        PixelGrid::new().is_lit(16, 0);
    }

    #[test]
    fn lit_iterates_columns_then_rows() {
        let mut grid = PixelGrid::new();
        grid.toggle(7, 2);
        grid.toggle(0, 15);
        grid.toggle(7, 0);
        grid.toggle(3, 3);

        let lit: Vec<(u8, u8)> = grid.lit().collect();
        assert_eq!(lit, [(0, 15), (3, 3), (7, 0), (7, 2)]);
        assert_eq!(grid.lit_count(), 4);
    }

    #[test]
    fn grids_serialize_dense_over_all_columns() {
        let mut grid = PixelGrid::new();
        grid.toggle(2, 3);

        let json = serde_json::to_string(&grid).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value.as_object().unwrap().len(), GRID_SIZE);
        assert_eq!(value["2"], serde_json::json!([3]));
        assert_eq!(value["15"], serde_json::json!([]));

        // keys come out in numeric order, not lexicographic
        assert!(json.find("\"9\"").unwrap() < json.find("\"10\"").unwrap());
    }

    #[test]
    fn grids_load_zero_padded_columns_and_string_rows() {
        let json = r#"{"00": ["03", "07"], "05": [1, "12"], "15": []}"#;
        let grid: PixelGrid = serde_json::from_str(json).unwrap();

        assert!(grid.is_lit(0, 3));
        assert!(grid.is_lit(0, 7));
        assert!(grid.is_lit(5, 1));
        assert!(grid.is_lit(5, 12));
        assert_eq!(grid.lit_count(), 4);
    }

    #[test]
    fn grids_reject_out_of_range_coordinates() {
        assert!(serde_json::from_str::<PixelGrid>(r#"{"16": []}"#).is_err());
        assert!(serde_json::from_str::<PixelGrid>(r#"{"0": [16]}"#).is_err());
        assert!(serde_json::from_str::<PixelGrid>(r#"{"0": [-1]}"#).is_err());
        assert!(serde_json::from_str::<PixelGrid>(r#"{"x": []}"#).is_err());
    }

    #[test]
    fn sequences_load_zero_padded_screen_keys() {
        let json = r#"{"07": {"00": ["03"]}, "1": {"2": [3]}}"#;
        let sequence: ScreenSequence = serde_json::from_str(json).unwrap();

        assert!(sequence.screen(7).unwrap().is_lit(0, 3));
        assert!(sequence.screen(1).unwrap().is_lit(2, 3));
        assert_eq!(sequence.max_index(), Some(7));
        assert!(serde_json::from_str::<ScreenSequence>(r#"{"x": {}}"#).is_err());
    }

    #[test]
    fn set_screen_stores_a_copy() {
        let mut grid = PixelGrid::new();
        grid.toggle(1, 1);

        let mut sequence = ScreenSequence::new();
        sequence.set_screen(0, &grid);

        grid.toggle(2, 2);
        assert!(!sequence.screen(0).unwrap().is_lit(2, 2));
        assert!(sequence.screen(0).unwrap().is_lit(1, 1));
    }

    #[test]
    fn compact_drops_empties_and_renumbers() {
        let mut first = PixelGrid::new();
        first.toggle(2, 3);
        let mut last = PixelGrid::new();
        last.toggle(0, 0);

        let mut sequence = ScreenSequence::new();
        sequence.set_screen(0, &first);
        sequence.set_screen(2, &PixelGrid::new());
        sequence.set_screen(5, &last);

        sequence.compact();
        assert_eq!(sequence.max_index(), Some(1));
        assert_eq!(sequence.screen(0), Some(&first));
        assert_eq!(sequence.screen(1), Some(&last));

        let once = sequence.clone();
        sequence.compact();
        assert_eq!(sequence, once);
    }

    #[test]
    fn blank_sequences_encode_to_nothing() {
        let mut sequence = ScreenSequence::new();
        sequence.set_screen(3, &PixelGrid::new());

        assert!(sequence.is_blank());
        assert_eq!(sequence.max_index(), Some(3));
        assert!(sequence.encode_all(STATIC_WAIT).is_empty());
        assert_eq!(sequence.max_index(), None);
    }

    #[test]
    fn encode_all_renumbers_and_stops_on_the_new_last_screen() {
        let mut first = PixelGrid::new();
        first.toggle(2, 3);
        let mut third = PixelGrid::new();
        third.toggle(0, 0);

        let mut sequence = ScreenSequence::new();
        sequence.set_screen(0, &first);
        sequence.set_screen(1, &PixelGrid::new());
        sequence.set_screen(2, &third);

        let opcodes: Vec<String> = sequence
            .encode_all(STATIC_WAIT)
            .into_iter()
            .map(|command| command.opcode)
            .collect();
        assert_eq!(
            opcodes,
            ["e00", "a", "e0f", "s32", "wffff", "x", "e00", "a", "e0f", "s00", "wffff"]
        );
    }

    #[test]
    fn animation_sequences_wait_after_every_frame() {
        let mut grid = PixelGrid::new();
        grid.toggle(8, 8);

        let mut sequence = ScreenSequence::new();
        sequence.set_screen(0, &grid);
        sequence.set_screen(1, &grid);

        let opcodes: Vec<String> = sequence
            .encode_all(90)
            .into_iter()
            .map(|command| command.opcode)
            .collect();
        assert_eq!(
            opcodes,
            ["e00", "a", "e0f", "s88", "w0006", "e00", "a", "e0f", "s88", "w0006"]
        );
    }

    #[test]
    fn documents_round_trip_through_json() {
        let mut rng = rand::thread_rng();

        for _ in 0..20 {
            let mut sequence = ScreenSequence::new();
            for index in 0..rng.gen_range(1..4) {
                let mut grid = PixelGrid::new();
                for _ in 0..rng.gen_range(0..40) {
                    grid.toggle(rng.gen_range(0..16), rng.gen_range(0..16));
                }
                sequence.set_screen(index, &grid);
            }
            let document = Document {
                screens: sequence,
                wait_time: rng.gen_range(-1..2000),
            };

            let json = serde_json::to_string_pretty(&document).unwrap();
            let reloaded: Document = serde_json::from_str(&json).unwrap();
            assert_eq!(reloaded, document);
        }
    }
}
