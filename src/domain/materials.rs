//! Material definitions and the per-material property table.
//!
//! The table is plain data owned by `HeatConfig`, so tests and peers can run
//! with their own values instead of a process-wide global.

use serde::{Deserialize, Serialize};

pub type MaterialId = u8;

pub const MAT_NONE: MaterialId = 0;
pub const MAT_WOOD: MaterialId = 1;
pub const MAT_BRICK: MaterialId = 2;
pub const MAT_STONE: MaterialId = 3;
pub const MAT_METAL: MaterialId = 4;
pub const MAT_INDESTRUCTIBLE: MaterialId = 5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Material {
    #[default]
    None = MAT_NONE,
    Wood = MAT_WOOD,
    Brick = MAT_BRICK,
    Stone = MAT_STONE,
    Metal = MAT_METAL,
    Indestructible = MAT_INDESTRUCTIBLE,
}

impl Material {
    pub const ALL: [Material; 6] = [
        Material::None,
        Material::Wood,
        Material::Brick,
        Material::Stone,
        Material::Metal,
        Material::Indestructible,
    ];

    #[inline]
    pub fn id(self) -> MaterialId {
        self as MaterialId
    }

    pub fn from_id(id: MaterialId) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    /// Solid material occupies the cell (anything except `None`).
    #[inline]
    pub fn is_solid(self) -> bool {
        self != Material::None
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaterialProps {
    pub hit_points: u32,
    pub flammable: bool,
    /// Seconds of continuous white heat before the cell vaporizes.
    /// `None` means heat alone never destroys it.
    pub vaporize_time: Option<f32>,
}

impl MaterialProps {
    const EMPTY: MaterialProps = MaterialProps {
        hit_points: 0,
        flammable: false,
        vaporize_time: None,
    };
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialTable {
    pub wood: MaterialProps,
    pub brick: MaterialProps,
    pub stone: MaterialProps,
    pub metal: MaterialProps,
    pub indestructible: MaterialProps,
}

impl Default for MaterialTable {
    fn default() -> Self {
        Self {
            wood: MaterialProps { hit_points: 20, flammable: true, vaporize_time: Some(4.0) },
            brick: MaterialProps { hit_points: 60, flammable: false, vaporize_time: Some(4.0) },
            stone: MaterialProps { hit_points: 100, flammable: false, vaporize_time: Some(6.0) },
            metal: MaterialProps { hit_points: 150, flammable: false, vaporize_time: Some(3.0) },
            indestructible: MaterialProps { hit_points: 1000, flammable: false, vaporize_time: None },
        }
    }
}

impl MaterialTable {
    #[inline]
    pub fn props(&self, material: Material) -> &MaterialProps {
        match material {
            Material::None => &MaterialProps::EMPTY,
            Material::Wood => &self.wood,
            Material::Brick => &self.brick,
            Material::Stone => &self.stone,
            Material::Metal => &self.metal,
            Material::Indestructible => &self.indestructible,
        }
    }

    /// Indestructible never burns or vaporizes, whatever the table says.
    #[inline]
    pub fn is_flammable(&self, material: Material) -> bool {
        material != Material::Indestructible && self.props(material).flammable
    }

    #[inline]
    pub fn vaporize_time(&self, material: Material) -> Option<f32> {
        match material {
            Material::None | Material::Indestructible => None,
            _ => self.props(material).vaporize_time,
        }
    }

    #[inline]
    pub fn hit_points(&self, material: Material) -> f32 {
        self.props(material).hit_points as f32
    }
}
