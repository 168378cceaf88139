use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::*;

/// String key-value store the settings are persisted to.
pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// Store kept in memory, lost when dropped.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

/// Rendered width and height of one tile, in CSS pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSize(u16);

impl TileSize {
    pub const fn new(pixels: u16) -> Option<Self> {
        if pixels == 0 { None } else { Some(Self(pixels)) }
    }

    pub const fn pixels(self) -> u16 {
        self.0
    }
}

impl Default for TileSize {
    fn default() -> Self {
        Self(60)
    }
}

impl fmt::Display for TileSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px", self.0)
    }
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
#[error("Tile size must be a positive pixel count")]
pub struct ParseTileSizeError;

impl FromStr for TileSize {
    type Err = ParseTileSizeError;

    /// Accepts both `"60px"` and a bare `"60"`.
    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        let s = s.trim();
        let digits = s.strip_suffix("px").unwrap_or(s).trim_end();
        let pixels = digits.parse().map_err(|_| ParseTileSizeError)?;
        Self::new(pixels).ok_or(ParseTileSizeError)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub board_size: Coord,
    pub mine_count: CellCount,
    pub tile_size: TileSize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            board_size: 6,
            mine_count: 3,
            tile_size: TileSize::default(),
        }
    }
}

impl Settings {
    pub const BOARD_SIZE_KEY: &'static str = "boardSize";
    pub const MINE_COUNT_KEY: &'static str = "minesLeft";
    pub const TILE_SIZE_KEY: &'static str = "tileSize";

    /// Reads all three settings, falling back to the default for anything missing or unreadable.
    pub fn load<S: SettingsStore + ?Sized>(store: &S) -> Self {
        let defaults = Self::default();

        let board_size = read(store, Self::BOARD_SIZE_KEY, |s| {
            s.parse::<u64>()
                .ok()
                .map(|n| Coord::try_from(n).unwrap_or(Coord::MAX))
        })
        .unwrap_or(defaults.board_size);
        let mine_count = read(store, Self::MINE_COUNT_KEY, |s| {
            s.parse::<u64>()
                .ok()
                .map(|n| CellCount::try_from(n).unwrap_or(CellCount::MAX))
        })
        .unwrap_or(defaults.mine_count);
        let tile_size =
            read(store, Self::TILE_SIZE_KEY, |s| s.parse().ok()).unwrap_or(defaults.tile_size);

        let config = BoardConfig::clamped(board_size, mine_count);
        Self {
            board_size: config.size,
            mine_count: config.mines,
            tile_size,
        }
    }

    pub fn save<S: SettingsStore + ?Sized>(&self, store: &mut S) {
        store.set(Self::BOARD_SIZE_KEY, &self.board_size.to_string());
        store.set(Self::MINE_COUNT_KEY, &self.mine_count.to_string());
        store.set(Self::TILE_SIZE_KEY, &self.tile_size.to_string());
    }

    pub fn board_config(&self) -> BoardConfig {
        BoardConfig::clamped(self.board_size, self.mine_count)
    }

    /// A smaller board can hold fewer mines, so the mine count is clamped again.
    pub fn with_board_size(self, board_size: Coord) -> Self {
        let config = BoardConfig::clamped(board_size, self.mine_count);
        Self {
            board_size: config.size,
            mine_count: config.mines,
            ..self
        }
    }

    pub fn with_mine_count(self, mine_count: CellCount) -> Self {
        let config = BoardConfig::clamped(self.board_size, mine_count);
        Self {
            mine_count: config.mines,
            ..self
        }
    }

    pub fn with_tile_size(self, tile_size: TileSize) -> Self {
        Self { tile_size, ..self }
    }
}

fn read<S, T>(store: &S, key: &str, parse: impl FnOnce(&str) -> Option<T>) -> Option<T>
where
    S: SettingsStore + ?Sized,
{
    let raw = store.get(key)?;
    let parsed = parse(raw.trim());
    if parsed.is_none() {
        log::warn!("Ignoring unreadable setting {}={:?}", key, raw);
    }
    parsed
}
