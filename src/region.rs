//! Named physical regions and their meshing parameters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::topology::Dimension;

/// Identifier of a region. `0` marks shapes that belong to no region.
pub type RegionId = u32;

/// The reserved id of "no region".
pub const UNASSIGNED: RegionId = 0;

/// A named, dimensioned classification of shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    pub name: String,
    pub dim: Dimension,
    /// Target mesh step. Values `<= 0` request the global estimate.
    #[serde(default)]
    pub mesh_step: f64,
    /// Excludes the region from the output mesh in every dimension.
    #[serde(default)]
    pub not_used: bool,
    /// Dimensions in which elements of the region are dropped.
    #[serde(default)]
    pub inactive_dims: Vec<Dimension>,
}

impl Region {
    /// Creates an active region.
    #[must_use]
    pub fn new(id: RegionId, name: impl Into<String>, dim: Dimension, mesh_step: f64) -> Self {
        Self {
            id,
            name: name.into(),
            dim,
            mesh_step,
            not_used: false,
            inactive_dims: Vec::new(),
        }
    }

    /// Marks the region inactive in `dim`.
    #[must_use]
    pub fn with_inactive_dim(mut self, dim: Dimension) -> Self {
        if !self.inactive_dims.contains(&dim) {
            self.inactive_dims.push(dim);
        }
        self
    }

    /// Returns whether elements of dimension `dim` in this region are kept.
    #[must_use]
    pub fn is_active(&self, dim: Dimension) -> bool {
        !self.not_used && !self.inactive_dims.contains(&dim)
    }
}

/// All regions of a run, ordered by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionTable {
    regions: BTreeMap<RegionId, Region>,
}

impl RegionTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a region.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReservedRegionId`] for id `0` and
    /// [`ConfigError::DuplicateRegion`] if the id is already taken.
    pub fn insert(&mut self, region: Region) -> Result<(), ConfigError> {
        if region.id == UNASSIGNED {
            return Err(ConfigError::ReservedRegionId);
        }
        if self.regions.contains_key(&region.id) {
            return Err(ConfigError::DuplicateRegion(region.id));
        }
        self.regions.insert(region.id, region);
        Ok(())
    }

    /// Looks up a region by id.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownRegion`] if no region has that id.
    pub fn get(&self, id: RegionId) -> Result<&Region, ConfigError> {
        self.regions.get(&id).ok_or(ConfigError::UnknownRegion(id))
    }

    /// Returns whether a region with that id exists.
    #[must_use]
    pub fn contains(&self, id: RegionId) -> bool {
        self.regions.contains_key(&id)
    }

    /// Iterates over the regions in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.values()
    }

    /// Number of regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Returns whether the table holds no region.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

impl TryFrom<Vec<Region>> for RegionTable {
    type Error = ConfigError;

    fn try_from(regions: Vec<Region>) -> Result<Self, Self::Error> {
        let mut table = Self::new();
        for region in regions {
            table.insert(region)?;
        }
        Ok(table)
    }
}

impl<'de> Deserialize<'de> for RegionTable {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let regions = Vec::<Region>::deserialize(deserializer)?;
        Self::try_from(regions).map_err(serde::de::Error::custom)
    }
}
