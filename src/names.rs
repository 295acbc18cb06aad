use rand::Rng;
use serde::Serialize;

use crate::scenarios::Scenario;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LandmarkKind {
    Land,
    Sea,
}

/// A name handed out by a [`NameBank`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocatedName {
    pub kind: LandmarkKind,
    /// Position of the entry in the scenario's name list
    pub pool_index: usize,
    pub name: String,
}

/// Landmark names for one run. Entries are removed as they are used and
/// never come back.
#[derive(Debug, Clone)]
pub struct NameBank {
    land: Vec<(usize, String)>,
    sea: Vec<(usize, String)>,
}

impl NameBank {
    pub fn from_scenario(scenario: &Scenario) -> Self {
        NameBank {
            land: scenario.land_names.iter().cloned().enumerate().collect(),
            sea: scenario.sea_names.iter().cloned().enumerate().collect(),
        }
    }

    pub fn remaining(&self, kind: LandmarkKind) -> usize {
        self.pool(kind).len()
    }

    /// Removes a uniformly chosen name from the pool for `kind`, or `None`
    /// once that pool is exhausted.
    pub fn take<R: Rng>(&mut self, kind: LandmarkKind, rng: &mut R) -> Option<AllocatedName> {
        let pool = self.pool_mut(kind);
        if pool.is_empty() {
            return None;
        }
        let (pool_index, name) = pool.remove(rng.gen_range(0..pool.len()));
        Some(AllocatedName { kind, pool_index, name })
    }

    fn pool(&self, kind: LandmarkKind) -> &Vec<(usize, String)> {
        match kind {
            LandmarkKind::Land => &self.land,
            LandmarkKind::Sea => &self.sea,
        }
    }

    fn pool_mut(&mut self, kind: LandmarkKind) -> &mut Vec<(usize, String)> {
        match kind {
            LandmarkKind::Land => &mut self.land,
            LandmarkKind::Sea => &mut self.sea,
        }
    }
}
