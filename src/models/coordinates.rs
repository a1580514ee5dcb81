use crate::constants::EARTH_RADIUS_M;
use geo::{Centroid, MultiPoint, Point};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Result<Self, String> {
        let coords = Coordinates { lat, lng };
        coords.validate()?;
        Ok(coords)
    }

    /// Check ranges on a value that arrived through deserialization.
    pub fn validate(&self) -> Result<(), String> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(format!(
                "Invalid latitude: {} (must be between -90 and 90)",
                self.lat
            ));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(format!(
                "Invalid longitude: {} (must be between -180 and 180)",
                self.lng
            ));
        }
        Ok(())
    }

    /// Calculate distance between two coordinates using Haversine formula
    /// Returns distance in meters
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        let lat1_rad = self.lat.to_radians();
        let lat2_rad = other.lat.to_radians();
        let delta_lat = (other.lat - self.lat).to_radians();
        let delta_lng = (other.lng - self.lng).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_M * c
    }
}

impl From<Coordinates> for Point<f64> {
    fn from(c: Coordinates) -> Self {
        Point::new(c.lng, c.lat)
    }
}

impl From<Point<f64>> for Coordinates {
    fn from(p: Point<f64>) -> Self {
        Coordinates {
            lat: p.y(),
            lng: p.x(),
        }
    }
}

/// Great-circle distance in meters.
pub fn distance(a: &Coordinates, b: &Coordinates) -> f64 {
    a.distance_to(b)
}

/// Arithmetic mean of latitudes and longitudes.
///
/// This is a planar mean, not a geodesic centroid; it is only good as a local
/// proximity reference. Returns `None` for an empty input.
pub fn centroid<'a, I>(points: I) -> Option<Coordinates>
where
    I: IntoIterator<Item = &'a Coordinates>,
{
    let multi: MultiPoint<f64> = points.into_iter().map(|c| Point::from(*c)).collect();
    multi.centroid().map(Coordinates::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_validation() {
        assert!(Coordinates::new(48.8566, 2.3522).is_ok());
        assert!(Coordinates::new(91.0, 0.0).is_err()); // Invalid lat
        assert!(Coordinates::new(0.0, 181.0).is_err()); // Invalid lng

        let deserialized: Coordinates =
            serde_json::from_str(r#"{"lat": -95.0, "lng": 10.0}"#).unwrap();
        assert!(deserialized.validate().is_err());
    }

    #[test]
    fn test_distance_calculation() {
        let paris = Coordinates::new(48.8566, 2.3522).unwrap();
        let london = Coordinates::new(51.5074, -0.1278).unwrap();

        let meters = distance(&paris, &london);
        // Paris to London is approximately 344 km
        assert!((meters - 344_000.0).abs() < 10_000.0);
    }

    #[test]
    fn test_distance_is_symmetric_and_zero_on_self() {
        let a = Coordinates::new(35.6762, 139.6503).unwrap();
        let b = Coordinates::new(34.6937, 135.5023).unwrap();
        assert_eq!(distance(&a, &a), 0.0);
        assert!((distance(&a, &b) - distance(&b, &a)).abs() < 1e-6);
    }

    #[test]
    fn test_distance_antipodal() {
        let a = Coordinates::new(0.0, 0.0).unwrap();
        let b = Coordinates::new(0.0, 180.0).unwrap();
        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_M;
        assert!((distance(&a, &b) - half_circumference).abs() < 1.0);
    }

    #[test]
    fn test_centroid_is_simple_mean() {
        let points = vec![
            Coordinates::new(10.0, 20.0).unwrap(),
            Coordinates::new(12.0, 24.0).unwrap(),
            Coordinates::new(14.0, 22.0).unwrap(),
        ];
        let c = centroid(&points).unwrap();
        assert!((c.lat - 12.0).abs() < 1e-9);
        assert!((c.lng - 22.0).abs() < 1e-9);
    }

    #[test]
    fn test_centroid_single_and_empty() {
        let only = Coordinates::new(48.85, 2.35).unwrap();
        assert_eq!(centroid(&[only]), Some(only));
        assert_eq!(centroid(&Vec::<Coordinates>::new()), None);
    }
}
