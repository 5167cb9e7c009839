//! GeoJSON feature types with simplestyle properties.

use serde::{Deserialize, Serialize};

/// A complete FeatureCollection, used when buffering is acceptable (tiny
/// outputs, tests). Large outputs go through the streamer instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub type_: String,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            type_: "FeatureCollection".to_string(),
            features,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub type_: String,
    pub geometry: Geometry,
    pub properties: Properties,
}

impl Feature {
    pub fn new(geometry: Geometry, properties: Properties) -> Self {
        Self {
            type_: "Feature".to_string(),
            geometry,
            properties,
        }
    }
}

/// Geometry variants the pipeline emits. Positions are `[lng, lat]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon { coordinates: Vec<Vec<[f64; 2]>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<[f64; 2]>>> },
    LineString { coordinates: Vec<[f64; 2]> },
}

/// The classified value a feature carries: a single level for isolines,
/// a "low-high" range label for isobands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Level(f64),
    Range(String),
}

/// Simplestyle-spec properties understood by common GeoJSON viewers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Properties {
    pub value: PropertyValue,
    pub fill: String,
    #[serde(rename = "fill-opacity")]
    pub fill_opacity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(rename = "stroke-width", skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(rename = "stroke-opacity", skip_serializing_if = "Option::is_none")]
    pub stroke_opacity: Option<f64>,
}

impl Properties {
    /// Properties for a filled band feature. The stroke carries the fill
    /// color but renders at zero width; fills alone seal band boundaries.
    pub fn band(low: f64, high: f64, fill: String, opacity: f64) -> Self {
        Self {
            value: PropertyValue::Range(format!("{}-{}", low, high)),
            stroke: Some(fill.clone()),
            stroke_width: Some(0.0),
            stroke_opacity: Some(0.0),
            fill,
            fill_opacity: opacity,
        }
    }

    /// Properties for an isoline feature.
    pub fn level(level: f64, stroke: String) -> Self {
        Self {
            value: PropertyValue::Level(level),
            fill: stroke.clone(),
            fill_opacity: 0.0,
            stroke: Some(stroke),
            stroke_width: Some(1.0),
            stroke_opacity: Some(1.0),
        }
    }
}
