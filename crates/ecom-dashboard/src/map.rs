//! # Geolocation Map
//!
//! Scatter overlay of customer/seller points on a fixed Brazil bounding
//! box, with the background image fetched over HTTP.

use ecom_domain::{GeoKind, GeoPoint};
use geo::{coord, Intersects, Point, Rect};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Western edge of the background image, degrees longitude.
pub const MIN_LONGITUDE: f64 = -73.982_830_55;
/// Eastern edge, degrees longitude.
pub const MAX_LONGITUDE: f64 = -33.8;
/// Southern edge, degrees latitude.
pub const MIN_LATITUDE: f64 = -33.751_169_44;
/// Northern edge, degrees latitude.
pub const MAX_LATITUDE: f64 = 5.4;

/// Extent covered by the background image.
#[must_use]
pub fn brazil_bounds() -> Rect<f64> {
    Rect::new(
        coord! { x: MIN_LONGITUDE, y: MIN_LATITUDE },
        coord! { x: MAX_LONGITUDE, y: MAX_LATITUDE },
    )
}

/// Map background errors
#[derive(Debug, Error)]
pub enum MapError {
    #[error("Map image request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Map image server returned status {0}")]
    Status(u16),

    #[error("Map image response was empty")]
    Empty,
}

/// Points of one entity kind that fall on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapOverlay {
    pub kind: GeoKind,
    /// `[longitude, latitude]` pairs, in input order.
    pub coordinates: Vec<[f64; 2]>,
    /// Points outside the bounding box.
    pub dropped: usize,
}

impl MapOverlay {
    /// Keep the points inside [`brazil_bounds`], edges included.
    #[must_use]
    pub fn new(kind: GeoKind, points: &[GeoPoint]) -> Self {
        let bounds = brazil_bounds();
        let coordinates: Vec<[f64; 2]> = points
            .iter()
            .map(|p| Point::new(p.longitude, p.latitude))
            .filter(|p| bounds.intersects(p))
            .map(|p| [p.x(), p.y()])
            .collect();
        let dropped = points.len() - coordinates.len();

        debug!(
            kind = kind.as_str(),
            kept = coordinates.len(),
            dropped,
            "Built map overlay"
        );
        Self {
            kind,
            coordinates,
            dropped,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }
}

/// Fetched background image.
#[derive(Debug, Clone)]
pub struct MapBackground {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

impl MapBackground {
    /// File extension matching the image content type.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self.content_type.as_deref() {
            Some(ct) if ct.contains("png") => "png",
            Some(ct) if ct.contains("webp") => "webp",
            _ => "jpg",
        }
    }
}

/// Where the background is saved: next to the page, `<stem>_map.<ext>`.
#[must_use]
pub fn background_path(page: &Path, extension: &str) -> PathBuf {
    let stem = page
        .file_stem()
        .map_or_else(|| "dashboard".into(), |s| s.to_string_lossy());
    page.with_file_name(format!("{stem}_map.{extension}"))
}

/// Download the background image.
pub async fn fetch_background(url: &str, timeout: Duration) -> Result<MapBackground, MapError> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;

    info!(%url, "Fetching map background");
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(MapError::Status(status.as_u16()));
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = response.bytes().await?.to_vec();
    if bytes.is_empty() {
        return Err(MapError::Empty);
    }

    debug!(size = bytes.len(), ?content_type, "Map background fetched");
    Ok(MapBackground {
        bytes,
        content_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lng: f64) -> GeoPoint {
        GeoPoint::new(GeoKind::Customer, "c", None, lat, lng).unwrap()
    }

    #[test]
    fn test_overlay_drops_points_outside_bounds() {
        let points = vec![
            point(-23.55, -46.63), // Sao Paulo
            point(40.71, -74.0),   // New York
            point(-22.90, -43.17), // Rio de Janeiro
        ];
        let overlay = MapOverlay::new(GeoKind::Customer, &points);
        assert_eq!(overlay.coordinates, vec![[-46.63, -23.55], [-43.17, -22.90]]);
        assert_eq!(overlay.dropped, 1);
    }

    #[test]
    fn test_overlay_keeps_edge_points() {
        let overlay = MapOverlay::new(GeoKind::Seller, &[point(MAX_LATITUDE, MAX_LONGITUDE)]);
        assert_eq!(overlay.coordinates.len(), 1);
    }

    #[test]
    fn test_background_extension() {
        let bg = |ct: Option<&str>| MapBackground {
            bytes: vec![1],
            content_type: ct.map(str::to_string),
        };
        assert_eq!(bg(Some("image/png")).extension(), "png");
        assert_eq!(bg(Some("image/jpeg")).extension(), "jpg");
        assert_eq!(bg(None).extension(), "jpg");
    }

    #[test]
    fn test_background_path_sits_next_to_page() {
        assert_eq!(
            background_path(Path::new("out/report.html"), "jpg"),
            PathBuf::from("out/report_map.jpg")
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_is_reported() {
        let result = fetch_background("http://127.0.0.1:9/brazil.jpg", Duration::from_millis(500)).await;
        assert!(result.is_err());
    }
}
