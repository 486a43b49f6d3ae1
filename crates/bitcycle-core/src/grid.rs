//! The playfield grid and the program loader.
//!
//! The grid's shape is fixed at load time; only device state inside cells
//! mutates afterwards. Cells that hold queues (collectors, sources, sinks)
//! are stored in engine-side registries and referenced from the grid by
//! index, so the cell array itself stays a flat tagged sum.

use crate::bit::Bit;
use crate::collector::{COLLECTOR_NAMES, Collector};
use crate::device::Device;
use crate::direction::Direction;
use crate::id::{CollectorId, SinkId, SourceId};
use crate::io::{InputError, IoFormat};
use crate::sink::Sink;
use crate::source::Source;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Cells
// ---------------------------------------------------------------------------

/// One grid cell: either a plain device or a reference into the engine's
/// collector/source/sink registries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Device(Device),
    Collector(CollectorId),
    Source(SourceId),
    Sink(SinkId),
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// A dense, row-major 2D array of cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether a bit position is still on the playfield.
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && (x as usize) < self.width && y >= 0 && (y as usize) < self.height
    }

    /// Cell at an in-bounds position.
    pub fn cell(&self, x: i32, y: i32) -> &Cell {
        &self.cells[y as usize * self.width + x as usize]
    }

    pub fn cell_mut(&mut self, x: i32, y: i32) -> &mut Cell {
        &mut self.cells[y as usize * self.width + x as usize]
    }

    /// Iterate all cells with their coordinates, in reading order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, &Cell)> {
        self.cells.iter().enumerate().map(|(i, cell)| {
            (
                (i % self.width) as i32,
                (i / self.width) as i32,
                cell,
            )
        })
    }

    /// Revert every fired mirror and latched demultiplexer. Fires once per
    /// collector-activation event.
    pub fn reset_latches(&mut self) {
        for cell in &mut self.cells {
            if let Cell::Device(device) = cell {
                device.rearm();
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load-time inputs for one program, as supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramSpec {
    /// Program body, one string per grid row.
    pub code: Vec<String>,
    /// One raw input line per `?` in reading order; missing lines read as "".
    pub inputs: Vec<String>,
    pub format: IoFormat,
    /// Interleave blank rows/columns so adjacent devices get their own cells.
    pub expand: bool,
}

impl ProgramSpec {
    /// Spec with a program body, no inputs, raw format.
    pub fn from_code(code: &str) -> Self {
        Self {
            code: code.lines().map(str::to_string).collect(),
            inputs: Vec::new(),
            format: IoFormat::Raw,
            expand: false,
        }
    }

    pub fn with_inputs(mut self, inputs: &[&str]) -> Self {
        self.inputs = inputs.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_format(mut self, format: IoFormat) -> Self {
        self.format = format;
        self
    }

    pub fn expanded(mut self) -> Self {
        self.expand = true;
        self
    }
}

/// Errors raised while loading a program. Program text itself is total
/// (every character means something); only source input data can fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("bad input for source {source_id} at ({x}, {y}): {cause}")]
    BadSourceInput {
        source_id: u32,
        x: i32,
        y: i32,
        cause: InputError,
    },
}

/// Everything the loader produces: the grid plus the populated registries.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub grid: Grid,
    pub collectors: Vec<Collector>,
    /// Physical collectors grouped under each name, in encounter order.
    /// BTreeMap keys iterate alphabetically, which is exactly the canonical
    /// activation order since `V` never gets a key.
    pub collectors_by_name: BTreeMap<char, Vec<CollectorId>>,
    pub sources: Vec<Source>,
    pub sinks: Vec<Sink>,
    /// Literal `0`/`1` bits, already in flight heading east.
    pub initial_bits: Vec<Bit>,
}

/// Insert a blank row between every pair of rows (plus leading/trailing)
/// and a blank column between every pair of columns.
fn expand_lines(lines: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(lines.len() * 2 + 1);
    for line in lines {
        out.push(String::new());
        let mut spaced = String::with_capacity(line.len() * 2 + 1);
        for c in line.chars() {
            spaced.push(' ');
            spaced.push(c);
        }
        spaced.push(' ');
        out.push(spaced);
    }
    out.push(String::new());
    out
}

/// Build the playfield from program text per the character classification
/// rules: letters (except `v`) are collectors, `?` sources, `!` sinks,
/// `0`/`1` literal bits over a blank cell, and everything else a device.
pub fn load(spec: &ProgramSpec) -> Result<Loaded, LoadError> {
    let code: Vec<String> = if spec.expand {
        expand_lines(&spec.code)
    } else {
        spec.code.clone()
    };

    let height = code.len();
    let width = code.iter().map(|line| line.chars().count()).max().unwrap_or(0);

    let mut cells = Vec::with_capacity(width * height);
    let mut collectors = Vec::new();
    let mut collectors_by_name: BTreeMap<char, Vec<CollectorId>> = BTreeMap::new();
    let mut sources = Vec::new();
    let mut sinks = Vec::new();
    let mut initial_bits = Vec::new();
    let mut pending_inputs = spec.inputs.iter();

    for (y, line) in code.iter().enumerate() {
        let mut row: Vec<char> = line.chars().collect();
        row.resize(width, ' ');
        for (x, raw) in row.into_iter().enumerate() {
            let (x, y) = (x as i32, y as i32);
            let chr = raw.to_ascii_lowercase();
            let upper = chr.to_ascii_uppercase();
            let cell = if upper.is_ascii_uppercase() && COLLECTOR_NAMES.contains(upper) {
                let id = CollectorId(collectors.len() as u32);
                collectors.push(Collector::new(upper, x, y));
                collectors_by_name.entry(upper).or_default().push(id);
                Cell::Collector(id)
            } else if chr == '?' {
                let id = SourceId(sources.len() as u32);
                let input = pending_inputs.next().map(String::as_str).unwrap_or("");
                let source = Source::new(x, y, input, spec.format).map_err(|cause| {
                    LoadError::BadSourceInput {
                        source_id: id.0,
                        x,
                        y,
                        cause,
                    }
                })?;
                sources.push(source);
                Cell::Source(id)
            } else if chr == '!' {
                let id = SinkId(sinks.len() as u32);
                sinks.push(Sink::new(id, x, y, spec.format));
                Cell::Sink(id)
            } else if chr == '0' || chr == '1' {
                initial_bits.push(Bit::new(x, y, Direction::East, chr == '1'));
                Cell::Device(Device::Blank(' '))
            } else {
                Cell::Device(Device::from_char(chr))
            };
            cells.push(cell);
        }
    }

    Ok(Loaded {
        grid: Grid {
            width,
            height,
            cells,
        },
        collectors,
        collectors_by_name,
        sources,
        sinks,
        initial_bits,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::MirrorKind;
    use std::collections::VecDeque;

    #[test]
    fn width_is_longest_line_with_padding() {
        let loaded = load(&ProgramSpec::from_code(">>\n>>>>\n")).unwrap();
        assert_eq!(loaded.grid.width(), 4);
        assert_eq!(loaded.grid.height(), 2);
        assert_eq!(
            *loaded.grid.cell(3, 0),
            Cell::Device(Device::Blank(' '))
        );
    }

    #[test]
    fn classification_covers_every_kind() {
        let loaded = load(
            &ProgramSpec::from_code("A?!\n/#1").with_inputs(&["10"]),
        )
        .unwrap();
        assert!(matches!(loaded.grid.cell(0, 0), Cell::Collector(_)));
        assert!(matches!(loaded.grid.cell(1, 0), Cell::Source(_)));
        assert!(matches!(loaded.grid.cell(2, 0), Cell::Sink(_)));
        assert!(matches!(
            loaded.grid.cell(0, 1),
            Cell::Device(Device::Mirror {
                kind: MirrorKind::Forward,
                armed: true,
            })
        ));
        assert_eq!(*loaded.grid.cell(1, 1), Cell::Device(Device::Blank('#')));

        // The literal 1 became an eastbound bit over a blank cell.
        assert_eq!(*loaded.grid.cell(2, 1), Cell::Device(Device::Blank(' ')));
        assert_eq!(loaded.initial_bits.len(), 1);
        assert_eq!(loaded.initial_bits[0].x, 2);
        assert!(loaded.initial_bits[0].value);
    }

    #[test]
    fn collector_names_normalize_to_uppercase() {
        let loaded = load(&ProgramSpec::from_code("aA")).unwrap();
        assert_eq!(loaded.collectors.len(), 2);
        assert_eq!(loaded.collectors_by_name[&'A'].len(), 2);
        for collector in &loaded.collectors {
            assert_eq!(collector.name, 'A');
        }
    }

    #[test]
    fn uppercase_v_is_a_router_not_a_collector() {
        let loaded = load(&ProgramSpec::from_code("V")).unwrap();
        assert_eq!(
            *loaded.grid.cell(0, 0),
            Cell::Device(Device::Router(Direction::South))
        );
        assert!(loaded.collectors.is_empty());
    }

    #[test]
    fn sources_consume_input_lines_in_reading_order() {
        let loaded = load(
            &ProgramSpec::from_code("??\n?").with_inputs(&["1", "0"]),
        )
        .unwrap();
        assert_eq!(loaded.sources[0].queue, VecDeque::from(vec![true]));
        assert_eq!(loaded.sources[1].queue, VecDeque::from(vec![false]));
        // Third source had no input line left: loads closed.
        assert!(!loaded.sources[2].open);
    }

    #[test]
    fn expand_interleaves_blank_rows_and_columns() {
        let loaded = load(&ProgramSpec::from_code(">v\n^<").expanded()).unwrap();
        assert_eq!(loaded.grid.height(), 5);
        assert_eq!(loaded.grid.width(), 5);
        assert_eq!(
            *loaded.grid.cell(1, 1),
            Cell::Device(Device::Router(Direction::East))
        );
        assert_eq!(
            *loaded.grid.cell(3, 1),
            Cell::Device(Device::Router(Direction::South))
        );
        assert_eq!(
            *loaded.grid.cell(1, 3),
            Cell::Device(Device::Router(Direction::North))
        );
        assert_eq!(*loaded.grid.cell(0, 0), Cell::Device(Device::Blank(' ')));
    }

    #[test]
    fn reset_latches_rearms_all_devices() {
        let mut loaded = load(&ProgramSpec::from_code("|-{}")).unwrap();
        loaded.grid.reset_latches();
        let glyphs: String = (0..4)
            .map(|x| match loaded.grid.cell(x, 0) {
                Cell::Device(d) => d.glyph(),
                _ => '?',
            })
            .collect();
        assert_eq!(glyphs, "/\\==");
    }

    #[test]
    fn bad_source_input_reports_position() {
        let err = load(
            &ProgramSpec::from_code(" ?")
                .with_inputs(&["5,oops"])
                .with_format(IoFormat::Unsigned),
        )
        .unwrap_err();
        let LoadError::BadSourceInput { source_id, x, y, .. } = err;
        assert_eq!((source_id, x, y), (0, 1, 0));
    }
}
