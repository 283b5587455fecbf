use crate::boundary::Boundary;
use crate::constants::NOT_AVAILABLE;
use crate::icons::classify;
use crate::map::MapLayer;
use crate::models::{DaySummary, LocationForecast};

fn or_na<T: ToString>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Formats one card per forecast period
pub fn format_forecast_cards(forecast: &LocationForecast) -> String {
    let mut output = format!(
        "Forecast for {:.4}, {:.4}:\n\n",
        forecast.point.latitude, forecast.point.longitude
    );
    for period in &forecast.periods {
        let icon = classify(Some(&period.short_forecast)).glyph();
        output.push_str(&format!(
            "{} {}:\n  {}\n  Temperature: {}\u{00b0}{}\n  Wind: {} {}\n\n",
            icon,
            period.name,
            period.detailed_forecast,
            or_na(period.temperature),
            period.temperature_unit,
            period.wind_speed,
            period.wind_direction
        ));
    }
    output
}

/// Formats daily summaries as a table
pub fn format_daily_table(days: &[DaySummary]) -> String {
    let mut output = String::from("Daily Summary:\n\n");
    output.push_str(&format!(
        "{:<16} {:>6} {:>6} {:>5}  {}\n",
        "Date", "High", "Low", "PoP", "Wind"
    ));
    for day in days {
        output.push_str(&format!(
            "{:<16} {:>6} {:>6} {:>5}  {}\n",
            day.label,
            day.max_temp
                .map(|t| format!("{t}\u{00b0}F"))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            day.min_temp
                .map(|t| format!("{t}\u{00b0}F"))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            format!("{}%", day.max_pop),
            or_na(day.representative_wind.as_deref())
        ));
    }
    output
}

/// Formats the boundary overlay and its geometry
pub fn format_boundary(boundary: &Boundary) -> String {
    let bounds = boundary.bounds();
    let style = boundary.style;
    let mut output = format!(
        "AOI Boundary:\n  Rings: {}\n  Bounds: S {:.4}, W {:.4}, N {:.4}, E {:.4}\n  Style: {} outline (weight {}), {} fill at {:.0}% opacity\n",
        boundary.rings().len(),
        bounds.south,
        bounds.west,
        bounds.north,
        bounds.east,
        style.color,
        style.weight,
        style.fill_color,
        style.fill_opacity * 100.0
    );
    output.push_str("  Sample points:\n");
    for point in boundary.sample_points() {
        let side = if boundary.contains(point) { "inside" } else { "outside" };
        output.push_str(&format!(
            "    {:.4}, {:.4} ({})\n",
            point.latitude, point.longitude, side
        ));
    }
    output
}

/// Formats the map layer: centre, overlay and forecast markers
pub fn format_map(map: &MapLayer) -> String {
    let mut output = format!(
        "Map:\n  Center: {} ({:.4}, {:.4}) at zoom {}\n",
        map.center_label, map.center.latitude, map.center.longitude, map.zoom
    );
    match &map.overlay {
        Some(boundary) => output.push_str(&format!(
            "  Overlay: AOI boundary with {} rings\n",
            boundary.rings().len()
        )),
        None => output.push_str("  Overlay: unavailable\n"),
    }
    output.push('\n');

    for (i, marker) in map.markers.iter().enumerate() {
        output.push_str(&format!(
            "Marker {} at {:.4}, {:.4} [{}]:\n",
            i + 1,
            marker.point.latitude,
            marker.point.longitude,
            marker.color.name()
        ));
        for line in marker.popup.lines() {
            output.push_str(&format!("  {line}\n"));
        }
        output.push('\n');
    }
    output
}
