use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::error::ForecastError;
use crate::models::{ForecastPeriod, ForecastResponse, GeoPoint, LocationForecast, PointsResponse};

/// Two-step forecast lookup: point to forecast URL, forecast URL to periods
#[async_trait]
pub trait ForecastSource: Send + Sync {
    async fn resolve(&self, point: GeoPoint) -> Result<String, ForecastError>;

    async fn retrieve(&self, forecast_url: &str) -> Result<Vec<ForecastPeriod>, ForecastError>;
}

/// National Weather Service backed forecast source
#[derive(Clone)]
pub struct NwsClient {
    client: Arc<Client>,
    api_base: String,
}

impl NwsClient {
    pub fn new(user_agent: &str, api_base: impl Into<String>) -> Result<Self> {
        let client = Client::builder().user_agent(user_agent).build()?;

        Ok(Self {
            client: Arc::new(client),
            api_base: api_base.into(),
        })
    }

    /// Makes an HTTP GET request and deserializes the JSON response
    async fn make_request<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            anyhow::bail!("Request failed with status: {}", response.status());
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }
}

#[async_trait]
impl ForecastSource for NwsClient {
    async fn resolve(&self, point: GeoPoint) -> Result<String, ForecastError> {
        let points_url = format!(
            "{}/points/{},{}",
            self.api_base, point.latitude, point.longitude
        );

        let points = self
            .make_request::<PointsResponse>(&points_url)
            .await
            .map_err(|e| ForecastError::resolution(point, e.to_string()))?;

        forecast_url(point, points)
    }

    async fn retrieve(&self, forecast_url: &str) -> Result<Vec<ForecastPeriod>, ForecastError> {
        let forecast = self
            .make_request::<ForecastResponse>(forecast_url)
            .await
            .map_err(|e| ForecastError::retrieval(forecast_url, e.to_string()))?;

        Ok(forecast.properties.periods)
    }
}

/// Extracts the forecast URL from a `/points` response
pub fn forecast_url(point: GeoPoint, points: PointsResponse) -> Result<String, ForecastError> {
    if let Some(grid_id) = &points.properties.grid_id {
        tracing::debug!("Point {} is served by office {}", point, grid_id);
    }

    points
        .properties
        .forecast
        .ok_or_else(|| ForecastError::resolution(point, "response has no forecast URL"))
}

/// Resolves and retrieves the forecast for a single point
pub async fn fetch_point<S>(source: &S, point: GeoPoint) -> Result<LocationForecast, ForecastError>
where
    S: ForecastSource + ?Sized,
{
    let forecast_url = source.resolve(point).await?;
    tracing::debug!("Resolved {} to {}", point, forecast_url);

    let periods = source.retrieve(&forecast_url).await?;
    tracing::info!("Fetched {} forecast periods for {}", periods.len(), point);

    Ok(LocationForecast { point, periods })
}

/// Fetches every point in order, one at a time, pausing `inter_delay` between points.
///
/// A failed point is logged and yields `None` in its slot; the batch always
/// runs to the end and the output lines up with `points`.
pub async fn fetch_all<S>(
    source: &S,
    points: &[GeoPoint],
    inter_delay: Duration,
) -> Vec<Option<LocationForecast>>
where
    S: ForecastSource + ?Sized,
{
    let mut results = Vec::with_capacity(points.len());

    for (i, point) in points.iter().enumerate() {
        match fetch_point(source, *point).await {
            Ok(forecast) => results.push(Some(forecast)),
            Err(e) => {
                tracing::warn!("{}", e);
                results.push(None);
            }
        }

        if i + 1 < points.len() {
            tokio::time::sleep(inter_delay).await;
        }
    }

    let fetched = results.iter().filter(|r| r.is_some()).count();
    tracing::info!("Fetched forecasts for {}/{} points", fetched, points.len());

    results
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::aggregator::tests::period;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Instant;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// In-memory source keyed by point; a missing entry fails resolution
    #[derive(Default)]
    pub(crate) struct StubSource {
        pub(crate) forecasts: HashMap<String, Vec<ForecastPeriod>>,
        pub(crate) broken_urls: Vec<String>,
        pub(crate) calls: Mutex<Vec<String>>,
    }

    impl StubSource {
        pub(crate) fn with_point(mut self, point: GeoPoint, periods: Vec<ForecastPeriod>) -> Self {
            self.forecasts.insert(point.to_string(), periods);
            self
        }
    }

    #[async_trait]
    impl ForecastSource for StubSource {
        async fn resolve(&self, point: GeoPoint) -> Result<String, ForecastError> {
            self.calls.lock().unwrap().push(format!("resolve {point}"));
            if self.forecasts.contains_key(&point.to_string()) {
                Ok(format!("stub://{point}"))
            } else {
                Err(ForecastError::resolution(point, "404 Not Found"))
            }
        }

        async fn retrieve(&self, forecast_url: &str) -> Result<Vec<ForecastPeriod>, ForecastError> {
            self.calls.lock().unwrap().push(format!("retrieve {forecast_url}"));
            if self.broken_urls.iter().any(|u| u == forecast_url) {
                return Err(ForecastError::retrieval(forecast_url, "500 Internal Server Error"));
            }
            let key = forecast_url.trim_start_matches("stub://");
            Ok(self.forecasts.get(key).cloned().unwrap_or_default())
        }
    }

    #[tokio::test]
    async fn test_fetch_all_tolerates_resolution_failure() {
        let ok = GeoPoint::new(33.4484, -112.074);
        let missing = GeoPoint::new(32.0, -114.0);
        let source = StubSource::default().with_point(
            ok,
            vec![period("2026-10-19T06:00:00-07:00", Some(90), None, "5 mph")],
        );
        let delay = Duration::from_millis(25);

        let started = Instant::now();
        let results = fetch_all(&source, &[ok, missing], delay).await;

        assert!(started.elapsed() >= delay);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap().point, ok);
        assert_eq!(results[0].as_ref().unwrap().periods.len(), 1);
        assert!(results[1].is_none());
    }

    #[tokio::test]
    async fn test_fetch_all_tolerates_retrieval_failure() {
        let first = GeoPoint::new(35.0, -114.0);
        let second = GeoPoint::new(35.0, -110.0);
        let mut source = StubSource::default()
            .with_point(first, Vec::new())
            .with_point(second, vec![period("2026-10-19T06:00:00-07:00", Some(70), None, "")]);
        source.broken_urls.push(format!("stub://{first}"));

        let results = fetch_all(&source, &[first, second], Duration::ZERO).await;

        assert!(results[0].is_none());
        assert!(results[1].is_some());
    }

    #[tokio::test]
    async fn test_fetch_all_is_sequential_and_ordered() {
        let points = [
            GeoPoint::new(33.4484, -112.074),
            GeoPoint::new(32.0, -110.0),
            GeoPoint::new(35.0, -110.0),
        ];
        let source = points
            .iter()
            .fold(StubSource::default(), |s, p| s.with_point(*p, Vec::new()));
        let delay = Duration::from_millis(10);

        let started = Instant::now();
        let results = fetch_all(&source, &points, delay).await;

        assert!(started.elapsed() >= delay * 2);
        let fetched: Vec<GeoPoint> = results.into_iter().flatten().map(|f| f.point).collect();
        assert_eq!(fetched, points.to_vec());

        // Each point's retrieve happens before the next point's resolve
        let calls = source.calls.lock().unwrap();
        assert_eq!(calls.len(), 6);
        assert_eq!(calls[0], format!("resolve {}", points[0]));
        assert_eq!(calls[1], format!("retrieve stub://{}", points[0]));
        assert_eq!(calls[2], format!("resolve {}", points[1]));
    }

    #[tokio::test]
    async fn test_fetch_all_empty_input() {
        let results = fetch_all(&StubSource::default(), &[], Duration::from_secs(5)).await;
        assert!(results.is_empty());
    }

    /// Serves a single canned HTTP response on a local port
    async fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf).await.unwrap();
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
        });

        format!("http://{addr}")
    }

    const NOT_FOUND: &str =
        "HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\nconnection: close\r\n\r\n";

    #[test]
    fn test_forecast_url_present() {
        let points: PointsResponse = serde_json::from_str(
            r#"{"properties": {"gridId": "PSR", "forecast": "https://api.weather.gov/gridpoints/PSR/159,57/forecast"}}"#,
        )
        .unwrap();

        let url = forecast_url(GeoPoint::new(33.4484, -112.074), points).unwrap();
        assert_eq!(url, "https://api.weather.gov/gridpoints/PSR/159,57/forecast");
    }

    #[test]
    fn test_forecast_url_missing_is_resolution_error() {
        let points: PointsResponse =
            serde_json::from_str(r#"{"properties": {"gridId": "PSR"}}"#).unwrap();

        let err = forecast_url(GeoPoint::new(33.4484, -112.074), points).unwrap_err();
        assert!(matches!(err, ForecastError::Resolution { .. }));
        assert!(err.to_string().contains("no forecast URL"));
    }

    #[tokio::test]
    async fn test_nws_resolve_non_success_status() {
        let base = serve_once(NOT_FOUND).await;
        let client = NwsClient::new("test-agent", base).unwrap();

        let err = client.resolve(GeoPoint::new(0.0, 0.0)).await.unwrap_err();
        assert!(matches!(err, ForecastError::Resolution { .. }));
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_nws_retrieve_non_success_status() {
        let base = serve_once(NOT_FOUND).await;
        let client = NwsClient::new("test-agent", base.clone()).unwrap();

        let err = client
            .retrieve(&format!("{base}/gridpoints/PSR/1,1/forecast"))
            .await
            .unwrap_err();
        assert!(matches!(err, ForecastError::Retrieval { .. }));
    }

    #[tokio::test]
    async fn test_nws_resolve_success() {
        let base = serve_once(concat!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/geo+json\r\n",
            "content-length: 49\r\nconnection: close\r\n\r\n",
            r#"{"properties": {"forecast": "http://x/forecast"}}"#
        ))
        .await;
        let client = NwsClient::new("test-agent", base).unwrap();

        let url = client.resolve(GeoPoint::new(33.0, -112.0)).await.unwrap();
        assert_eq!(url, "http://x/forecast");
    }

    #[tokio::test]
    async fn test_fetch_point_reports_resolution_error() {
        let point = GeoPoint::new(10.0, 10.0);
        let err = fetch_point(&StubSource::default(), point).await.unwrap_err();
        assert!(matches!(err, ForecastError::Resolution { .. }));
    }
}
