/// Startup resources: car sprite sheet, obstacle sprite and road tile map.
///
/// All three are plain-text files read once before the game loop starts.
/// A missing or malformed file is fatal; nothing here is touched per tick.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::config::CAR_FRAMES;

pub const CAR_SHEET_FILE: &str = "car_sheet.txt";
pub const OBSTACLE_FILE: &str = "obstacle.txt";
pub const TILE_MAP_FILE: &str = "road.map";

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("could not read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{name} has no content")]
    Empty { name: String },
    #[error("{name}: width {width} does not split into {frames} equal frames")]
    FrameSplit {
        name: String,
        width: usize,
        frames: usize,
    },
    #[error("{name}: expected header `tiles <w>x<h>`, found `{found}`")]
    BadHeader { name: String, found: String },
    #[error("{name}: row {row} is {found} tiles wide, expected {expected}")]
    Ragged {
        name: String,
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("{name}: unknown tile {glyph:?} at row {row}, column {col}")]
    UnknownTile {
        name: String,
        glyph: char,
        row: usize,
        col: usize,
    },
}

// ── Sprites ───────────────────────────────────────────────────────────────────

/// Character-art image. Spaces are transparent.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    rows: Vec<Vec<char>>,
}

impl Sprite {
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn at(&self, col: usize, row: usize) -> char {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(' ')
    }

    /// Cut out the columns `start..start + width` as a new sprite.
    fn slice(&self, start: usize, width: usize) -> Sprite {
        Sprite {
            rows: self
                .rows
                .iter()
                .map(|r| r[start..start + width].to_vec())
                .collect(),
        }
    }
}

/// Significant lines of a text resource: `\r` stripped, trailing blank
/// lines dropped.
fn content_lines(text: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = text.lines().map(|l| l.trim_end_matches('\r')).collect();
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    lines
}

/// Parse character art. Short rows are padded with transparent cells so
/// the result is always rectangular.
pub fn parse_sprite(name: &str, text: &str) -> Result<Sprite, AssetError> {
    let lines = content_lines(text);
    let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    if width == 0 {
        return Err(AssetError::Empty {
            name: name.to_string(),
        });
    }
    let rows = lines
        .iter()
        .map(|l| {
            let mut row: Vec<char> = l.chars().collect();
            row.resize(width, ' ');
            row
        })
        .collect();
    Ok(Sprite { rows })
}

/// Frames laid out side by side, all the same width.
#[derive(Clone, Debug, PartialEq)]
pub struct SpriteSheet {
    pub frames: Vec<Sprite>,
}

impl SpriteSheet {
    /// Frame `index`, wrapping around the frame count.
    pub fn frame(&self, index: usize) -> &Sprite {
        &self.frames[index % self.frames.len()]
    }
}

pub fn parse_sheet(name: &str, text: &str, frames: usize) -> Result<SpriteSheet, AssetError> {
    let sheet = parse_sprite(name, text)?;
    let width = sheet.width();
    if frames == 0 || width % frames != 0 {
        return Err(AssetError::FrameSplit {
            name: name.to_string(),
            width,
            frames,
        });
    }
    let frame_width = width / frames;
    Ok(SpriteSheet {
        frames: (0..frames)
            .map(|i| sheet.slice(i * frame_width, frame_width))
            .collect(),
    })
}

// ── Tile map ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
    Grass,
    Asphalt,
    LaneMarking,
    Kerb,
}

impl Tile {
    /// `None` for a blank (undrawn) cell; `Err` for anything unknown.
    fn from_glyph(glyph: char) -> Result<Option<Tile>, char> {
        match glyph {
            ' ' => Ok(None),
            '.' => Ok(Some(Tile::Grass)),
            '#' => Ok(Some(Tile::Asphalt)),
            '|' => Ok(Some(Tile::LaneMarking)),
            '=' => Ok(Some(Tile::Kerb)),
            other => Err(other),
        }
    }
}

/// Grid of fixed-size tiles in canvas pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct TileMap {
    pub tile_width: u32,
    pub tile_height: u32,
    tiles: Vec<Vec<Option<Tile>>>,
}

impl TileMap {
    pub fn columns(&self) -> usize {
        self.tiles.first().map_or(0, Vec::len)
    }

    pub fn rows(&self) -> usize {
        self.tiles.len()
    }

    /// Tile covering the canvas pixel (`px`, `py`), if any.
    pub fn tile_at_pixel(&self, px: f32, py: f32) -> Option<Tile> {
        if px < 0.0 || py < 0.0 {
            return None;
        }
        let col = (px / self.tile_width as f32) as usize;
        let row = (py / self.tile_height as f32) as usize;
        self.tiles.get(row).and_then(|r| r.get(col)).copied().flatten()
    }
}

fn parse_header(name: &str, line: &str) -> Result<(u32, u32), AssetError> {
    let bad = || AssetError::BadHeader {
        name: name.to_string(),
        found: line.to_string(),
    };
    let dims = line.strip_prefix("tiles ").ok_or_else(bad)?;
    let (w, h) = dims.trim().split_once('x').ok_or_else(bad)?;
    let w: u32 = w.parse().map_err(|_| bad())?;
    let h: u32 = h.parse().map_err(|_| bad())?;
    if w == 0 || h == 0 {
        return Err(bad());
    }
    Ok((w, h))
}

pub fn parse_tile_map(name: &str, text: &str) -> Result<TileMap, AssetError> {
    let lines = content_lines(text);
    let (header, grid) = lines.split_first().ok_or_else(|| AssetError::Empty {
        name: name.to_string(),
    })?;
    let (tile_width, tile_height) = parse_header(name, header)?;

    let expected = grid.first().map_or(0, |l| l.chars().count());
    if expected == 0 {
        return Err(AssetError::Empty {
            name: name.to_string(),
        });
    }

    let mut tiles = Vec::with_capacity(grid.len());
    for (row, line) in grid.iter().enumerate() {
        let found = line.chars().count();
        if found != expected {
            return Err(AssetError::Ragged {
                name: name.to_string(),
                row,
                found,
                expected,
            });
        }
        let parsed = line
            .chars()
            .enumerate()
            .map(|(col, glyph)| {
                Tile::from_glyph(glyph).map_err(|glyph| AssetError::UnknownTile {
                    name: name.to_string(),
                    glyph,
                    row,
                    col,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        tiles.push(parsed);
    }

    Ok(TileMap {
        tile_width,
        tile_height,
        tiles,
    })
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Everything the renderer needs, loaded once at startup.
#[derive(Clone, Debug)]
pub struct Assets {
    pub car: SpriteSheet,
    pub obstacle: Sprite,
    pub map: TileMap,
}

/// `CARGO_MANIFEST_DIR/resources` when run through cargo, `./resources`
/// otherwise.
pub fn resource_dir() -> PathBuf {
    if let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") {
        let mut path = PathBuf::from(manifest_dir);
        path.push("resources");
        path
    } else {
        PathBuf::from("./resources")
    }
}

fn read(dir: &Path, file: &str) -> Result<String, AssetError> {
    let path = dir.join(file);
    fs::read_to_string(&path).map_err(|source| AssetError::Io { path, source })
}

impl Assets {
    pub fn load(dir: &Path) -> Result<Assets, AssetError> {
        let car = parse_sheet(CAR_SHEET_FILE, &read(dir, CAR_SHEET_FILE)?, CAR_FRAMES)?;
        let obstacle = parse_sprite(OBSTACLE_FILE, &read(dir, OBSTACLE_FILE)?)?;
        let map = parse_tile_map(TILE_MAP_FILE, &read(dir, TILE_MAP_FILE)?)?;
        info!(
            dir = %dir.display(),
            car_frames = car.frames.len(),
            map_columns = map.columns(),
            map_rows = map.rows(),
            "assets loaded"
        );
        Ok(Assets { car, obstacle, map })
    }
}
