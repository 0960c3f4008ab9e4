//! The registry of recognised road types (e.g. highway, urban).
//!
//! Legs decompose their distance across road types and vehicles declare a consumption multiplier
//! per road type. Both mappings are validated against this registry at load time so that the
//! weighted-sum computation can never hit a missing key silently.
use crate::id::{IDCollection, define_id_type};
use crate::units::Dimensionless;
use anyhow::{Context, Result, ensure};
use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;

define_id_type! {RoadTypeID}

/// Represents the "transport_factors" section of the scenario file.
#[derive(Debug, Deserialize, PartialEq)]
pub struct TransportFactorsRaw {
    /// The recognised road-type labels
    pub road_types: Vec<RoadTypeID>,
}

/// Build the road-type registry from the raw scenario section.
///
/// Fails if the list is empty or contains duplicates.
pub fn read_road_types(raw: TransportFactorsRaw) -> Result<IndexSet<RoadTypeID>> {
    ensure!(
        !raw.road_types.is_empty(),
        "transport_factors.road_types cannot be empty"
    );

    let mut road_types = IndexSet::with_capacity(raw.road_types.len());
    for road_type in raw.road_types {
        ensure!(
            road_types.insert(road_type.clone()),
            "Duplicate road type {road_type} in transport_factors.road_types"
        );
    }

    Ok(road_types)
}

/// Check that `factors` has an entry for every registered road type and no others.
///
/// # Arguments
///
/// * `factors` - A road-type-keyed mapping belonging to a leg or vehicle
/// * `road_types` - The road-type registry
/// * `owner` - A description of the owning entity, used in error messages
pub fn check_covers_road_types(
    factors: &IndexMap<RoadTypeID, Dimensionless>,
    road_types: &IndexSet<RoadTypeID>,
    owner: &str,
) -> Result<()> {
    for road_type in road_types {
        ensure!(
            factors.contains_key(road_type),
            "{owner} is missing an entry for road type {road_type}"
        );
    }
    for road_type in factors.keys() {
        road_types
            .get_id(road_type)
            .with_context(|| format!("{owner} refers to unknown road type {road_type}"))?;
    }

    Ok(())
}
