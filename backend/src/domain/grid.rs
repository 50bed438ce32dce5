//! The rentable city grid: cells, building kinds and their prices.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::user::{Credits, DisplayName, UserId};

/// Number of rows in the grid.
pub const GRID_ROWS: u16 = 10;
/// Number of columns in the grid.
pub const GRID_COLUMNS: u16 = 10;
/// Total number of cells; ids run from 1 to this value inclusive.
pub const CELL_COUNT: i32 = 100;

/// Identifier of a grid cell.
///
/// Any integer is accepted; whether the cell exists is decided by the store,
/// so a lookup for an out-of-range id reports "not found".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellId(i32);

impl CellId {
    /// Wrap a raw cell id.
    #[must_use]
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Raw integer value.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }

    /// Every cell id created when a store is initialised, in order.
    pub fn all() -> impl Iterator<Item = Self> {
        (1..=CELL_COUNT).map(Self)
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raised when a building code does not name one of the known kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown building type code {0}")]
pub struct UnknownBuildingType(pub i16);

/// The kinds of building a cell can hold.
///
/// Codes are persisted, so their numeric values are stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingType {
    /// Code 1.
    Shop,
    /// Code 2.
    Hospital,
    /// Code 3.
    Museum,
    /// Code 4.
    Post,
    /// Code 5.
    Hotel,
}

impl BuildingType {
    /// All kinds in code order.
    pub const ALL: [Self; 5] = [
        Self::Shop,
        Self::Hospital,
        Self::Museum,
        Self::Post,
        Self::Hotel,
    ];

    /// Persisted numeric code.
    #[must_use]
    pub const fn code(self) -> i16 {
        match self {
            Self::Shop => 1,
            Self::Hospital => 2,
            Self::Museum => 3,
            Self::Post => 4,
            Self::Hotel => 5,
        }
    }

    /// Resolve a persisted code.
    ///
    /// # Examples
    /// ```
    /// use citygrid::domain::BuildingType;
    ///
    /// assert_eq!(BuildingType::from_code(3), Ok(BuildingType::Museum));
    /// assert!(BuildingType::from_code(9).is_err());
    /// ```
    pub const fn from_code(code: i16) -> Result<Self, UnknownBuildingType> {
        match code {
            1 => Ok(Self::Shop),
            2 => Ok(Self::Hospital),
            3 => Ok(Self::Museum),
            4 => Ok(Self::Post),
            5 => Ok(Self::Hotel),
            other => Err(UnknownBuildingType(other)),
        }
    }

    /// One-time rental fee.
    #[must_use]
    pub const fn price(self) -> Credits {
        Credits::new(match self {
            Self::Shop => 100,
            Self::Hospital => 150,
            Self::Museum => 200,
            Self::Post => 120,
            Self::Hotel => 180,
        })
    }

    /// Human-readable name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Shop => "Shop",
            Self::Hospital => "Hospital",
            Self::Museum => "Museum",
            Self::Post => "Post office",
            Self::Hotel => "Hotel",
        }
    }

    /// Short description for the pricing table.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Shop => "A small retail space for local trade.",
            Self::Hospital => "A medical centre serving the district.",
            Self::Museum => "A cultural venue for exhibitions.",
            Self::Post => "A postal branch for letters and parcels.",
            Self::Hotel => "Lodging for visitors to the city.",
        }
    }
}

impl TryFrom<i16> for BuildingType {
    type Error = UnknownBuildingType;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        Self::from_code(value)
    }
}

impl fmt::Display for BuildingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Owner details shown alongside an occupied cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellOwner {
    /// Owning account.
    pub id: UserId,
    /// Owner's display name at read time.
    pub name: DisplayName,
}

/// Occupancy state of a cell. Owner and building always travel together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Occupancy {
    /// No owner and no building.
    Free,
    /// Rented by `owner`, who placed `building`.
    Occupied {
        /// Renting account.
        owner: CellOwner,
        /// Building placed on the cell.
        building: BuildingType,
    },
}

impl Occupancy {
    /// Whether the cell holds a building.
    #[must_use]
    pub const fn is_occupied(&self) -> bool {
        matches!(self, Self::Occupied { .. })
    }
}

/// A cell together with its current occupancy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Cell identifier.
    pub id: CellId,
    /// Current state.
    pub occupancy: Occupancy,
}

/// A cell held by a particular user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnedCell {
    /// Cell identifier.
    pub id: CellId,
    /// Building on the cell.
    pub building: BuildingType,
}
