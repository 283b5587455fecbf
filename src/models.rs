use chrono::{DateTime, FixedOffset, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Domain Models
// ============================================================================

/// A forecast query location
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Forecast periods fetched for one point
#[derive(Debug, Clone)]
pub struct LocationForecast {
    pub point: GeoPoint,
    pub periods: Vec<ForecastPeriod>,
}

/// One calendar day reduced from its forecast periods
#[derive(Debug, Clone, PartialEq)]
pub struct DaySummary {
    pub label: String,
    pub date: NaiveDate,
    pub max_temp: Option<i32>,
    pub min_temp: Option<i32>,
    pub max_pop: i32,
    pub representative_wind: Option<String>,
}

// ============================================================================
// National Weather Service API Models
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct PointsResponse {
    pub properties: PointsProperties,
}

#[derive(Debug, Deserialize)]
pub struct PointsProperties {
    /// URL of the 12-hour period forecast for the grid cell
    pub forecast: Option<String>,
    #[serde(rename = "gridId")]
    pub grid_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub properties: ForecastProperties,
}

#[derive(Debug, Deserialize)]
pub struct ForecastProperties {
    #[serde(default)]
    pub periods: Vec<ForecastPeriod>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastPeriod {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "startTime")]
    pub start_time: DateTime<FixedOffset>,
    pub temperature: Option<i32>,
    #[serde(rename = "temperatureUnit", default)]
    pub temperature_unit: String,
    #[serde(rename = "windSpeed", default)]
    pub wind_speed: String,
    #[serde(rename = "windDirection", default)]
    pub wind_direction: String,
    #[serde(rename = "shortForecast", default)]
    pub short_forecast: String,
    #[serde(rename = "detailedForecast", default)]
    pub detailed_forecast: String,
    #[serde(rename = "probabilityOfPrecipitation")]
    pub probability_of_precipitation: Option<QuantitativeValue>,
}

impl ForecastPeriod {
    /// Precipitation probability, if the service reported one
    pub fn pop(&self) -> Option<i32> {
        self.probability_of_precipitation
            .as_ref()
            .and_then(|pop| pop.value)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuantitativeValue {
    pub value: Option<i32>,
}

// ============================================================================
// MCP Tool Request Models
// ============================================================================

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct GetPointForecastRequest {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct ClassifyForecastRequest {
    /// Short forecast text, e.g. "Mostly Sunny"
    pub short_forecast: Option<String>,
}
