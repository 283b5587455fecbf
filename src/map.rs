use crate::boundary::Boundary;
use crate::constants::NOT_AVAILABLE;
use crate::icons::classify;
use crate::models::{GeoPoint, LocationForecast};

/// Marker colour by temperature band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerColor {
    Red,
    Orange,
    Yellow,
    Blue,
}

impl MarkerColor {
    pub fn for_temperature(temperature: Option<i32>) -> Self {
        match temperature {
            Some(t) if t > 80 => MarkerColor::Red,
            Some(t) if t > 60 => MarkerColor::Orange,
            Some(t) if t > 40 => MarkerColor::Yellow,
            _ => MarkerColor::Blue,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MarkerColor::Red => "red",
            MarkerColor::Orange => "orange",
            MarkerColor::Yellow => "yellow",
            MarkerColor::Blue => "blue",
        }
    }
}

/// Circle marker summarising the first forecast period of a point
#[derive(Debug, Clone)]
pub struct ForecastMarker {
    pub point: GeoPoint,
    pub color: MarkerColor,
    pub popup: String,
}

/// Everything drawn on the map for one cycle
#[derive(Debug, Clone)]
pub struct MapLayer {
    pub center: GeoPoint,
    pub zoom: u8,
    pub center_label: String,
    pub overlay: Option<Boundary>,
    pub markers: Vec<ForecastMarker>,
}

impl MapLayer {
    pub fn new(center: GeoPoint, zoom: u8, center_label: impl Into<String>) -> Self {
        Self {
            center,
            zoom,
            center_label: center_label.into(),
            overlay: None,
            markers: Vec::new(),
        }
    }

    pub fn set_overlay(&mut self, boundary: Boundary) {
        self.overlay = Some(boundary);
    }
}

/// Adds a marker for `forecast`; a forecast without periods adds nothing
pub fn add_forecast_marker(map: &mut MapLayer, forecast: &LocationForecast) {
    let Some(current) = forecast.periods.first() else {
        tracing::debug!("No periods for {}, skipping marker", forecast.point);
        return;
    };

    let icon = classify(Some(&current.short_forecast)).glyph();
    let temp = match current.temperature {
        Some(t) => format!("{}\u{00b0}{}", t, current.temperature_unit),
        None => NOT_AVAILABLE.to_string(),
    };
    let pop = format!("{}%", current.pop().unwrap_or(0));

    map.markers.push(ForecastMarker {
        point: forecast.point,
        color: MarkerColor::for_temperature(current.temperature),
        popup: format!(
            "{} {}\nTemp: {}\nPoP: {}\nWind: {} {}",
            icon, current.name, temp, pop, current.wind_speed, current.wind_direction
        ),
    });
}

/// Adds markers for every fetched point, skipping failed ones
pub fn add_forecast_markers(map: &mut MapLayer, results: &[Option<LocationForecast>]) {
    for forecast in results.iter().flatten() {
        add_forecast_marker(map, forecast);
    }
}
