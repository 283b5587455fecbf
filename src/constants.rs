use crate::models::GeoPoint;

/// User agent string for HTTP requests
pub const USER_AGENT: &str = "PhoenixForecastPortal/1.0 (contact@example.com)";

/// National Weather Service API base URL
pub const NWS_API_BASE: &str = "https://api.weather.gov";

/// Pause between two points of a fetch cycle
pub const DEFAULT_INTER_DELAY_MS: u64 = 1000;

/// Local AOI boundary overlay
pub const DEFAULT_BOUNDARY_PATH: &str = "aoi.geojson";

/// Optional config file, looked up in the working directory
pub const DEFAULT_CONFIG_PATH: &str = "forecast-portal.json";

/// Downtown Phoenix, the map centre and the main forecast location
pub const PHOENIX_CENTER: GeoPoint = GeoPoint::new(33.4484, -112.0740);

pub const DEFAULT_MAP_ZOOM: u8 = 10;

/// Centre and corners of the AOI
pub const AOI_POINTS: [GeoPoint; 5] = [
    PHOENIX_CENTER,
    GeoPoint::new(32.0, -114.0),
    GeoPoint::new(35.0, -114.0),
    GeoPoint::new(35.0, -110.0),
    GeoPoint::new(32.0, -110.0),
];

/// Shown when no point of a cycle could be fetched
pub const FORECAST_UNAVAILABLE: &str = "Error loading forecast data. Please try again later.";

pub const NOT_AVAILABLE: &str = "N/A";
