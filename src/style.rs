//! Typed descriptor for the web basemap style consumed by a separate
//! map-rendering client. Not exercised by the chart/animation pipeline; it is
//! only built here and written out as JSON.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;

const STYLE_VERSION: u8 = 8;
const TILE_URL: &str = "https://basemap.nationalmap.gov/arcgis/rest/services/USGSTopo/VectorTileServer/tile/{z}/{y}/{x}.pbf";
const SPRITE_URL: &str = "https://basemap.nationalmap.gov/arcgis/rest/services/USGSTopo/VectorTileServer/resources/sprites/sprite";
const GLYPHS_URL: &str = "https://basemap.nationalmap.gov/arcgis/rest/services/USGSTopo/VectorTileServer/resources/fonts/{fontstack}/{range}.pbf";

const STATE_FILL_COLOR: &str = "#ededed";
const HIGHLIGHT_FILL_COLOR: &str = "#0072b2";
const WATER_LINE_COLOR: &str = "#9ecae1";

#[derive(Debug, Error)]
pub enum StyleError {
    #[error("Failed to write style '{0}'")]
    Write(PathBuf, #[source] std::io::Error),

    #[error("Failed to serialize style")]
    Serialize(#[from] serde_json::Error),
}

/// A vector-tile style document: sources, endpoints and draw layers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapStyle {
    pub version: u8,
    pub name: String,
    pub sources: BTreeMap<String, TileSource>,
    pub sprite: String,
    pub glyphs: String,
    pub layers: Vec<StyleLayer>,
}

/// One tiled source with its zoom range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileSource {
    #[serde(rename = "type")]
    pub source_type: String,
    pub tiles: Vec<String>,
    pub minzoom: u8,
    pub maxzoom: u8,
}

/// One draw layer. Paint is kept as raw JSON since fill expressions are
/// open-ended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleLayer {
    pub id: String,
    #[serde(rename = "type")]
    pub layer_type: String,
    pub source: String,
    #[serde(rename = "source-layer")]
    pub source_layer: String,
    pub minzoom: u8,
    pub maxzoom: u8,
    pub paint: serde_json::Value,
}

/// Builds the basemap style: a state fill layer whose conditional fill
/// highlights `highlight_region`, plus a hydrography line layer.
pub fn basemap_style(highlight_region: &str) -> MapStyle {
    let mut sources = BTreeMap::new();
    sources.insert(
        "basemap".to_string(),
        TileSource {
            source_type: "vector".to_string(),
            tiles: vec![TILE_URL.to_string()],
            minzoom: 0,
            maxzoom: 16,
        },
    );

    let layers = vec![
        StyleLayer {
            id: "state-fill".to_string(),
            layer_type: "fill".to_string(),
            source: "basemap".to_string(),
            source_layer: "states".to_string(),
            minzoom: 0,
            maxzoom: 10,
            paint: json!({
                "fill-color": [
                    "case",
                    ["==", ["get", "name"], highlight_region],
                    HIGHLIGHT_FILL_COLOR,
                    STATE_FILL_COLOR
                ],
                "fill-outline-color": "#9e9e9e"
            }),
        },
        StyleLayer {
            id: "hydrography".to_string(),
            layer_type: "line".to_string(),
            source: "basemap".to_string(),
            source_layer: "hydrography".to_string(),
            minzoom: 4,
            maxzoom: 16,
            paint: json!({
                "line-color": WATER_LINE_COLOR,
                "line-width": 0.8
            }),
        },
    ];

    MapStyle {
        version: STYLE_VERSION,
        name: "gage-basemap".to_string(),
        sources,
        sprite: SPRITE_URL.to_string(),
        glyphs: GLYPHS_URL.to_string(),
        layers,
    }
}

/// Writes the style document as pretty-printed JSON.
pub fn write_style(style: &MapStyle, path: &Path) -> Result<PathBuf, StyleError> {
    let file = File::create(path).map_err(|e| StyleError::Write(path.to_path_buf(), e))?;
    serde_json::to_writer_pretty(BufWriter::new(file), style)?;
    Ok(path.to_path_buf())
}
