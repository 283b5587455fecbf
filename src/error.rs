//! Error taxonomy for the forecast pipeline
//!
//! Every variant marks a single unavailable item. Callers log it and move on.

use std::path::PathBuf;
use thiserror::Error;

use crate::models::GeoPoint;

#[derive(Error, Debug)]
pub enum ForecastError {
    /// The point could not be mapped to a forecast resource
    #[error("Failed to resolve forecast resource for {point}: {message}")]
    Resolution { point: GeoPoint, message: String },

    /// The forecast resource could not be fetched or decoded
    #[error("Failed to retrieve forecast from {url}: {message}")]
    Retrieval { url: String, message: String },

    /// The boundary overlay file is missing or not valid GeoJSON
    #[error("Failed to load boundary {}: {message}", .path.display())]
    BoundaryLoad { path: PathBuf, message: String },
}

impl ForecastError {
    pub fn resolution<S: Into<String>>(point: GeoPoint, message: S) -> Self {
        Self::Resolution {
            point,
            message: message.into(),
        }
    }

    pub fn retrieval<U: Into<String>, S: Into<String>>(url: U, message: S) -> Self {
        Self::Retrieval {
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn boundary_load<P: Into<PathBuf>, S: Into<String>>(path: P, message: S) -> Self {
        Self::BoundaryLoad {
            path: path.into(),
            message: message.into(),
        }
    }
}
