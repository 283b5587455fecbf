//! Area-of-interest boundary overlay
//!
//! Reads the polygon rings out of a GeoJSON document. Only polygonal
//! geometry is kept; points and lines are skipped.

use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;

use crate::error::ForecastError;
use crate::models::GeoPoint;

/// Fixed styling of the boundary overlay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStyle {
    pub color: &'static str,
    pub weight: u8,
    pub fill_color: &'static str,
    pub fill_opacity: f32,
}

pub const AOI_STYLE: OverlayStyle = OverlayStyle {
    color: "blue",
    weight: 2,
    fill_color: "lightblue",
    fill_opacity: 0.3,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

#[derive(Debug, Clone)]
pub struct Boundary {
    rings: Vec<Vec<GeoPoint>>,
    pub style: OverlayStyle,
}

// GeoJSON positions are [longitude, latitude, (altitude)]
type Position = Vec<f64>;
type Ring = Vec<Position>;

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum GeoJson {
    FeatureCollection { features: Vec<Feature> },
    Feature { geometry: Option<Geometry> },
    Polygon { coordinates: Vec<Ring> },
    MultiPolygon { coordinates: Vec<Vec<Ring>> },
    GeometryCollection { geometries: Vec<Geometry> },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Polygon { coordinates: Vec<Ring> },
    MultiPolygon { coordinates: Vec<Vec<Ring>> },
    GeometryCollection { geometries: Vec<Geometry> },
    #[serde(other)]
    Unsupported,
}

impl Geometry {
    fn collect_rings(self, out: &mut Vec<Ring>) {
        match self {
            Geometry::Polygon { coordinates } => out.extend(coordinates),
            Geometry::MultiPolygon { coordinates } => out.extend(coordinates.into_iter().flatten()),
            Geometry::GeometryCollection { geometries } => {
                for geometry in geometries {
                    geometry.collect_rings(out);
                }
            }
            Geometry::Unsupported => {}
        }
    }
}

impl GeoJson {
    fn into_rings(self) -> Vec<Ring> {
        let mut rings = Vec::new();
        match self {
            GeoJson::FeatureCollection { features } => {
                for geometry in features.into_iter().filter_map(|f| f.geometry) {
                    geometry.collect_rings(&mut rings);
                }
            }
            GeoJson::Feature { geometry } => {
                if let Some(geometry) = geometry {
                    geometry.collect_rings(&mut rings);
                }
            }
            GeoJson::Polygon { coordinates } => rings.extend(coordinates),
            GeoJson::MultiPolygon { coordinates } => rings.extend(coordinates.into_iter().flatten()),
            GeoJson::GeometryCollection { geometries } => {
                for geometry in geometries {
                    geometry.collect_rings(&mut rings);
                }
            }
            GeoJson::Unsupported => {}
        }
        rings
    }
}

impl Boundary {
    /// Reads and parses a GeoJSON boundary file
    pub async fn load(path: &Path) -> Result<Self, ForecastError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ForecastError::boundary_load(path, e.to_string()))?;

        let boundary = Self::from_geojson_str(&text)
            .map_err(|e| ForecastError::boundary_load(path, format!("{e:#}")))?;

        tracing::info!(
            "Loaded boundary {} with {} rings",
            path.display(),
            boundary.rings.len()
        );
        Ok(boundary)
    }

    pub fn from_geojson_str(text: &str) -> Result<Self> {
        let document: GeoJson = serde_json::from_str(text)?;

        let rings = document
            .into_rings()
            .into_iter()
            .map(|ring| {
                ring.into_iter()
                    .map(|position| match position.as_slice() {
                        [lon, lat, ..] => Ok(GeoPoint::new(*lat, *lon)),
                        _ => Err(anyhow!("invalid position {position:?}")),
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let rings: Vec<Vec<GeoPoint>> = rings.into_iter().filter(|r| r.len() >= 3).collect();
        if rings.is_empty() {
            anyhow::bail!("no polygon geometry found");
        }

        Ok(Self {
            rings,
            style: AOI_STYLE,
        })
    }

    pub fn rings(&self) -> &[Vec<GeoPoint>] {
        &self.rings
    }

    pub fn bounds(&self) -> Bounds {
        let mut bounds = Bounds {
            south: f64::INFINITY,
            west: f64::INFINITY,
            north: f64::NEG_INFINITY,
            east: f64::NEG_INFINITY,
        };
        for point in self.rings.iter().flatten() {
            bounds.south = bounds.south.min(point.latitude);
            bounds.north = bounds.north.max(point.latitude);
            bounds.west = bounds.west.min(point.longitude);
            bounds.east = bounds.east.max(point.longitude);
        }
        bounds
    }

    /// Centre of the bounding box
    pub fn center(&self) -> GeoPoint {
        let b = self.bounds();
        GeoPoint::new((b.south + b.north) / 2.0, (b.west + b.east) / 2.0)
    }

    /// Even-odd test over every ring, so holes count as outside
    pub fn contains(&self, point: GeoPoint) -> bool {
        let (x, y) = (point.longitude, point.latitude);
        let mut inside = false;

        for ring in &self.rings {
            let mut j = ring.len() - 1;
            for i in 0..ring.len() {
                let (xi, yi) = (ring[i].longitude, ring[i].latitude);
                let (xj, yj) = (ring[j].longitude, ring[j].latitude);
                if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
                    inside = !inside;
                }
                j = i;
            }
        }
        inside
    }

    /// Centre followed by the SW, NW, NE and SE corners of the bounding box
    pub fn sample_points(&self) -> Vec<GeoPoint> {
        let b = self.bounds();
        vec![
            self.center(),
            GeoPoint::new(b.south, b.west),
            GeoPoint::new(b.north, b.west),
            GeoPoint::new(b.north, b.east),
            GeoPoint::new(b.south, b.east),
        ]
    }
}
