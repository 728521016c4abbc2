use std::collections::{BTreeSet, HashMap, VecDeque};

use crate::tour::{HotspotKind, Location, LocationId};

/// Directed edges derived from navigation hotspots. Built once per tour and
/// never mutated. Fixed buttons may still jump elsewhere, but they are not
/// edges.
#[derive(Debug, Default)]
pub struct LocationGraph {
    edges: HashMap<LocationId, Vec<LocationId>>,
}

impl LocationGraph {
    pub fn from_locations(locations: &[Location]) -> Self {
        let mut edges: HashMap<LocationId, Vec<LocationId>> = HashMap::new();
        for location in locations {
            let out = edges.entry(location.id).or_default();
            let targets = location.hot_spots.iter().filter_map(|spot| match spot.kind {
                HotspotKind::Navigation { target } => Some(target),
                _ => None,
            });
            for target in targets {
                if !out.contains(&target) {
                    out.push(target);
                }
            }
        }
        Self { edges }
    }

    /// Targets reachable in one hotspot click, in hotspot order.
    pub fn edges_from(&self, id: LocationId) -> &[LocationId] {
        self.edges.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_edge(&self, from: LocationId, to: LocationId) -> bool {
        self.edges_from(from).contains(&to)
    }

    /// Ids in `all` that no chain of hotspots leads to from `start`, sorted.
    pub fn unreachable_from(
        &self,
        start: LocationId,
        all: impl IntoIterator<Item = LocationId>,
    ) -> Vec<LocationId> {
        let mut seen = BTreeSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(id) = queue.pop_front() {
            for &next in self.edges_from(id) {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        let mut missing: Vec<_> = all.into_iter().filter(|id| !seen.contains(id)).collect();
        missing.sort();
        missing
    }
}
