//! Square tile map: terrain, ownership and fallout
//!
//! Terrain and dimensions are fixed once the map is built. Ownership and
//! fallout change during play and are only mutated through `GameState`, which
//! keeps the per-player tile counts in step.

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};
use crate::core::types::{Owner, TileRef};

/// Terrain class of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Plains,
    Highland,
    Mountain,
    Lake,
    Ocean,
}

impl Terrain {
    pub fn is_land(self) -> bool {
        matches!(self, Terrain::Plains | Terrain::Highland | Terrain::Mountain)
    }

    /// Parse the single-character form used by `GameMap::from_rows`
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            '.' => Some(Terrain::Plains),
            '^' => Some(Terrain::Highland),
            'M' => Some(Terrain::Mountain),
            'o' => Some(Terrain::Lake),
            '~' => Some(Terrain::Ocean),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GameMap {
    width: u32,
    height: u32,
    terrain: Vec<Terrain>,
    owners: Vec<Owner>,
    fallout: Vec<bool>,
    num_land_tiles: usize,
    num_fallout_tiles: usize,
}

impl GameMap {
    pub fn new(width: u32, height: u32, terrain: Vec<Terrain>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if width == 0 || height == 0 || terrain.len() != expected {
            return Err(SimError::InvalidMap(format!(
                "{}x{} map needs {} tiles, got {}",
                width,
                height,
                expected,
                terrain.len()
            )));
        }

        let num_land_tiles = terrain.iter().filter(|t| t.is_land()).count();
        Ok(Self {
            width,
            height,
            owners: vec![Owner::TerraNullius; expected],
            fallout: vec![false; expected],
            terrain,
            num_land_tiles,
            num_fallout_tiles: 0,
        })
    }

    /// Map of a single terrain type
    pub fn filled(width: u32, height: u32, terrain: Terrain) -> Result<Self> {
        Self::new(width, height, vec![terrain; width as usize * height as usize])
    }

    /// Build a map from text rows, one character per tile
    ///
    /// `.` plains, `^` highland, `M` mountain, `o` lake, `~` ocean.
    pub fn from_rows(rows: &[&str]) -> Result<Self> {
        let height = rows.len() as u32;
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0) as u32;
        let mut terrain = Vec::with_capacity(width as usize * height as usize);

        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() as u32 != width {
                return Err(SimError::InvalidMap(format!("row {} has ragged width", y)));
            }
            for c in row.chars() {
                let t = Terrain::from_symbol(c).ok_or_else(|| {
                    SimError::InvalidMap(format!("unknown terrain symbol '{}' in row {}", c, y))
                })?;
                terrain.push(t);
            }
        }

        Self::new(width, height, terrain)
    }

    /// Deterministic pseudo-random terrain for headless runs and benchmarks
    pub fn generate_simple(width: u32, height: u32, seed: u64) -> Result<Self> {
        let mut terrain = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                let hash = Self::simple_hash(x, y, seed);
                terrain.push(match hash % 10 {
                    0..=5 => Terrain::Plains,
                    6 | 7 => Terrain::Highland,
                    8 => Terrain::Mountain,
                    _ => Terrain::Lake,
                });
            }
        }
        Self::new(width, height, terrain)
    }

    fn simple_hash(x: u32, y: u32, seed: u64) -> u64 {
        let mut h = seed;
        h = h.wrapping_mul(31).wrapping_add(u64::from(x));
        h = h.wrapping_mul(31).wrapping_add(u64::from(y));
        h ^= h >> 16;
        h = h.wrapping_mul(0x45d9f3b);
        h ^ (h >> 16)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn num_tiles(&self) -> usize {
        self.terrain.len()
    }

    pub fn num_land_tiles(&self) -> usize {
        self.num_land_tiles
    }

    pub fn num_tiles_with_fallout(&self) -> usize {
        self.num_fallout_tiles
    }

    pub fn is_valid_coord(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < i64::from(self.width) && y < i64::from(self.height)
    }

    pub fn is_valid(&self, tile: TileRef) -> bool {
        tile.index() < self.terrain.len()
    }

    pub fn tile_ref(&self, x: u32, y: u32) -> Result<TileRef> {
        if x >= self.width || y >= self.height {
            return Err(SimError::TileOutOfBounds(TileRef(
                y.saturating_mul(self.width).saturating_add(x),
            )));
        }
        Ok(TileRef(y * self.width + x))
    }

    pub fn x(&self, tile: TileRef) -> u32 {
        tile.0 % self.width
    }

    pub fn y(&self, tile: TileRef) -> u32 {
        tile.0 / self.width
    }

    fn check(&self, tile: TileRef) -> Result<usize> {
        if self.is_valid(tile) {
            Ok(tile.index())
        } else {
            Err(SimError::TileOutOfBounds(tile))
        }
    }

    pub fn terrain(&self, tile: TileRef) -> Result<Terrain> {
        Ok(self.terrain[self.check(tile)?])
    }

    pub fn is_land(&self, tile: TileRef) -> bool {
        self.is_valid(tile) && self.terrain[tile.index()].is_land()
    }

    pub fn owner(&self, tile: TileRef) -> Result<Owner> {
        Ok(self.owners[self.check(tile)?])
    }

    pub fn has_fallout(&self, tile: TileRef) -> bool {
        self.is_valid(tile) && self.fallout[tile.index()]
    }

    /// Returns the previous owner
    pub(crate) fn set_owner(&mut self, tile: TileRef, owner: Owner) -> Result<Owner> {
        let idx = self.check(tile)?;
        Ok(std::mem::replace(&mut self.owners[idx], owner))
    }

    pub(crate) fn set_fallout(&mut self, tile: TileRef, value: bool) -> Result<()> {
        let idx = self.check(tile)?;
        if self.fallout[idx] != value {
            self.fallout[idx] = value;
            if value {
                self.num_fallout_tiles += 1;
            } else {
                self.num_fallout_tiles -= 1;
            }
        }
        Ok(())
    }

    /// Orthogonal neighbors inside the map
    pub fn neighbors(&self, tile: TileRef) -> Vec<TileRef> {
        let x = i64::from(self.x(tile));
        let y = i64::from(self.y(tile));
        [(x, y - 1), (x + 1, y), (x, y + 1), (x - 1, y)]
            .into_iter()
            .filter(|&(nx, ny)| self.is_valid_coord(nx, ny))
            .map(|(nx, ny)| TileRef(ny as u32 * self.width + nx as u32))
            .collect()
    }

    pub fn euclidean_dist_squared(&self, a: TileRef, b: TileRef) -> u64 {
        let dx = i64::from(self.x(a)) - i64::from(self.x(b));
        let dy = i64::from(self.y(a)) - i64::from(self.y(b));
        (dx * dx + dy * dy) as u64
    }

    /// All tiles within Euclidean `radius` of `center`, in tile order
    pub fn tiles_within(&self, center: TileRef, radius: u32) -> Vec<TileRef> {
        let cx = i64::from(self.x(center));
        let cy = i64::from(self.y(center));
        let r = i64::from(radius);
        let mut tiles = Vec::new();
        for y in (cy - r)..=(cy + r) {
            for x in (cx - r)..=(cx + r) {
                if !self.is_valid_coord(x, y) {
                    continue;
                }
                let (dx, dy) = (x - cx, y - cy);
                if dx * dx + dy * dy <= r * r {
                    tiles.push(TileRef(y as u32 * self.width + x as u32));
                }
            }
        }
        tiles
    }

    /// Iterator over every tile and its owner
    pub fn owners(&self) -> impl Iterator<Item = (TileRef, Owner)> + '_ {
        self.owners
            .iter()
            .enumerate()
            .map(|(i, &o)| (TileRef(i as u32), o))
    }
}
