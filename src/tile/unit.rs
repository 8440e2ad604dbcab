use slab::Slab;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::{log, utils::Color};

// ----------------------------------------------
// UnitKind
// ----------------------------------------------

#[derive(Copy, Clone, Debug, Display, EnumIter, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitKind {
    Marine,
    Tank,
    Fighter,
}

impl UnitKind {
    #[inline]
    pub const fn movement_points(self) -> u32 {
        match self {
            Self::Marine  => 2,
            Self::Tank    => 3,
            Self::Fighter => 4,
        }
    }

    #[inline]
    pub const fn marker_color(self) -> Color {
        match self {
            Self::Marine  => Color::new(0.9, 0.9, 0.2, 1.0), // yellow-ish
            Self::Tank    => Color::new(0.9, 0.3, 0.2, 1.0), // red-ish
            Self::Fighter => Color::new(0.3, 0.6, 0.95, 1.0), // light blue
        }
    }
}

// ----------------------------------------------
// Unit
// ----------------------------------------------

// Placeholder occupant. Units have no behavior, they only render as markers.
#[derive(Clone, Debug)]
pub struct Unit {
    pub name: String,
    pub kind: UnitKind,
    pub movement_points: u32,
}

impl Unit {
    pub fn new(name: &str, kind: UnitKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            movement_points: kind.movement_points(),
        }
    }
}

// ----------------------------------------------
// UnitId / UnitRegistry
// ----------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct UnitId(usize);

impl UnitId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// Owns every unit. Tiles only hold a `UnitId` into this registry,
// so the unit's lifetime is independent of the map.
#[derive(Default)]
pub struct UnitRegistry {
    units: Slab<Unit>,
}

impl UnitRegistry {
    pub fn new() -> Self {
        Self { units: Slab::new() }
    }

    pub fn spawn(&mut self, unit: Unit) -> UnitId {
        log::verbose!(log::channel!("map"), "Spawned {} '{}'.", unit.kind, unit.name);
        UnitId(self.units.insert(unit))
    }

    pub fn despawn(&mut self, id: UnitId) -> Option<Unit> {
        self.units.try_remove(id.0)
    }

    #[inline]
    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(id.0)
    }

    #[inline]
    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(id.0)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (UnitId, &Unit)> + '_ {
        self.units.iter().map(|(index, unit)| (UnitId(index), unit))
    }
}
