//! Color mapping for terrain types

use crate::terrain::{Climate, Terrain};

/// RGBA color type
pub type TerrainColor = [f32; 4];

/// Trait for mapping terrain types to colors
pub trait ColorMapper {
    /// Map a terrain type to an RGBA color
    fn map_color(&self, terrain: &Terrain) -> TerrainColor;
}

/// Default color mapper
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicColorMapper;

impl ColorMapper for BasicColorMapper {
    fn map_color(&self, terrain: &Terrain) -> TerrainColor {
        match terrain {
            Terrain::Water => [0.1, 0.3, 0.7, 1.0],                   // Deep blue
            Terrain::Shallow => [0.2, 0.55, 0.8, 1.0],                // Light blue
            Terrain::Sand => [0.9, 0.8, 0.5, 1.0],                    // Sandy yellow
            Terrain::Ground(Climate::Temperate) => [0.2, 0.6, 0.2, 1.0], // Green
            Terrain::Ground(Climate::Hot) => [0.45, 0.65, 0.15, 1.0], // Yellow-green
            Terrain::Ground(Climate::Cold) => [0.85, 0.9, 0.9, 1.0],  // Frost
        }
    }
}

/// Custom color mapper that allows setting colors for each terrain type
#[derive(Debug, Clone)]
pub struct CustomColorMapper {
    pub water: TerrainColor,
    pub shallow: TerrainColor,
    pub sand: TerrainColor,
    pub temperate: TerrainColor,
    pub tropical: TerrainColor,
    pub boreal: TerrainColor,
}

impl Default for CustomColorMapper {
    fn default() -> Self {
        let basic = BasicColorMapper;
        Self {
            water: basic.map_color(&Terrain::Water),
            shallow: basic.map_color(&Terrain::Shallow),
            sand: basic.map_color(&Terrain::Sand),
            temperate: basic.map_color(&Terrain::Ground(Climate::Temperate)),
            tropical: basic.map_color(&Terrain::Ground(Climate::Hot)),
            boreal: basic.map_color(&Terrain::Ground(Climate::Cold)),
        }
    }
}

impl ColorMapper for CustomColorMapper {
    fn map_color(&self, terrain: &Terrain) -> TerrainColor {
        match terrain {
            Terrain::Water => self.water,
            Terrain::Shallow => self.shallow,
            Terrain::Sand => self.sand,
            Terrain::Ground(Climate::Temperate) => self.temperate,
            Terrain::Ground(Climate::Hot) => self.tropical,
            Terrain::Ground(Climate::Cold) => self.boreal,
        }
    }
}
