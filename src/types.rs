//! Data model for the gage visualization pipeline: per-site-per-year activity
//! records, derived yearly counts, and the static geometries the map renderer
//! draws. Everything here is a read-only snapshot; nothing is mutated after
//! creation.

use serde::{Deserialize, Serialize};

/// One (site, year) activity record: the gage identified by `site_id`
/// reported data during `year`.
///
/// A site may appear in many years; uniqueness is per (site, year) pair and
/// duplicates are collapsed during aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GageRecord {
    /// The USGS site code identifying the gage (e.g., "05553700").
    pub site_id: String,
    /// A calendar year in which the gage was active.
    pub year: i32,
}

impl GageRecord {
    pub fn new(site_id: impl Into<String>, year: i32) -> Self {
        Self {
            site_id: site_id.into(),
            year,
        }
    }
}

/// Derived count of distinct active sites for one year.
///
/// Recomputed fully on each aggregation call; there is no incremental update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearlyCount {
    pub year: i32,
    /// Number of distinct sites with at least one record in `year`.
    pub count: u32,
}

/// Static geographic point for a gage, joined to [`GageRecord`]s by site
/// identifier at render time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteLocation {
    /// The USGS site code identifying the gage.
    pub site_id: String,
    /// Longitude in decimal degrees (negative for West).
    pub longitude: f64,
    /// Latitude in decimal degrees (positive for North).
    pub latitude: f64,
}

impl SiteLocation {
    pub fn new(site_id: impl Into<String>, longitude: f64, latitude: f64) -> Self {
        Self {
            site_id: site_id.into(),
            longitude,
            latitude,
        }
    }
}

/// A named base-layer polygon (state or territory outline) drawn under the
/// site points. Each ring is a closed sequence of (longitude, latitude)
/// vertices; the first and last vertex do not need to repeat.
#[derive(Debug, Clone, PartialEq)]
pub struct StatePolygon {
    pub name: String,
    pub rings: Vec<Vec<(f64, f64)>>,
}

impl StatePolygon {
    pub fn new(name: impl Into<String>, rings: Vec<Vec<(f64, f64)>>) -> Self {
        Self {
            name: name.into(),
            rings,
        }
    }
}
