//! Coordinate reference systems and transforms
use map_3d::{deg2rad, ecef2geodetic, geodetic2ecef, rad2deg, Ellipsoid as RefEllipsoid};

use crate::{
    constants::{WEB_MERCATOR_MAX_LATITUDE_DEG, WEB_MERCATOR_RADIUS_M},
    prelude::{Error, Vector3},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Supported coordinate reference systems.
/// Geographic coordinates are expressed as (longitude, latitude, elevation)
/// in decimal degrees and meters.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Crs {
    /// EPSG:4326 geographic coordinates
    #[default]
    Wgs84,
    /// EPSG:3857 spherical mercator (meters)
    WebMercator,
    /// EPSG:4978 Earth centered Earth fixed (meters)
    Ecef,
}

impl Crs {
    /// EPSG authority identifier
    pub fn epsg(&self) -> u32 {
        match self {
            Self::Wgs84 => 4326,
            Self::WebMercator => 3857,
            Self::Ecef => 4978,
        }
    }

    /// True for geographic (angular) systems.
    pub fn is_geographic(&self) -> bool {
        matches!(self, Self::Wgs84)
    }

    fn to_wgs84(&self, p: &Vector3<f64>) -> Vector3<f64> {
        match self {
            Self::Wgs84 => *p,
            Self::WebMercator => {
                let lon = rad2deg(p[0] / WEB_MERCATOR_RADIUS_M);
                let lat = rad2deg(
                    2.0 * (p[1] / WEB_MERCATOR_RADIUS_M).exp().atan() - std::f64::consts::FRAC_PI_2,
                );
                Vector3::new(lon, lat, p[2])
            },
            Self::Ecef => {
                let (lat, lon, h) = ecef2geodetic(p[0], p[1], p[2], RefEllipsoid::WGS84);
                Vector3::new(rad2deg(lon), rad2deg(lat), h)
            },
        }
    }

    fn project_wgs84(&self, p: &Vector3<f64>) -> Vector3<f64> {
        match self {
            Self::Wgs84 => *p,
            Self::WebMercator => {
                let lat = p[1].clamp(-WEB_MERCATOR_MAX_LATITUDE_DEG, WEB_MERCATOR_MAX_LATITUDE_DEG);
                let x = WEB_MERCATOR_RADIUS_M * deg2rad(p[0]);
                let y = WEB_MERCATOR_RADIUS_M
                    * (std::f64::consts::FRAC_PI_4 + deg2rad(lat) / 2.0)
                        .tan()
                        .ln();
                Vector3::new(x, y, p[2])
            },
            Self::Ecef => {
                let (x, y, z) =
                    geodetic2ecef(deg2rad(p[1]), deg2rad(p[0]), p[2], RefEllipsoid::WGS84);
                Vector3::new(x, y, z)
            },
        }
    }
}

impl std::fmt::Display for Crs {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "EPSG:{}", self.epsg())
    }
}

impl std::str::FromStr for Crs {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_uppercase();
        match s.as_str() {
            "EPSG:4326" | "WGS84" => Ok(Self::Wgs84),
            "EPSG:3857" | "WEBMERCATOR" => Ok(Self::WebMercator),
            "EPSG:4978" | "ECEF" => Ok(Self::Ecef),
            _ => Err(Error::UnknownCrs),
        }
    }
}

/// Reprojects points from the working (map) frame to a geographic frame,
/// and back. Both frames are captured at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransform {
    working: Crs,
    geographic: Crs,
}

impl Default for CoordinateTransform {
    fn default() -> Self {
        Self::new(Crs::Wgs84, Crs::Wgs84)
    }
}

impl CoordinateTransform {
    pub fn new(working: Crs, geographic: Crs) -> Self {
        Self {
            working,
            geographic,
        }
    }

    /// Working frame to geographic frame transform.
    pub fn to_geographic_frame(working: Crs) -> Self {
        Self::new(working, Crs::Wgs84)
    }

    pub fn working_crs(&self) -> Crs {
        self.working
    }

    pub fn geographic_crs(&self) -> Crs {
        self.geographic
    }

    pub fn is_identity(&self) -> bool {
        self.working == self.geographic
    }

    /// Reprojects a working frame point to the geographic frame.
    pub fn to_geographic(&self, p: &Vector3<f64>) -> Vector3<f64> {
        if self.is_identity() {
            return *p;
        }
        self.geographic.project_wgs84(&self.working.to_wgs84(p))
    }

    /// Reprojects a geographic frame point to the working frame.
    pub fn to_working(&self, p: &Vector3<f64>) -> Vector3<f64> {
        if self.is_identity() {
            return *p;
        }
        self.working.project_wgs84(&self.geographic.to_wgs84(p))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::*;
    use std::str::FromStr;

    #[test]
    fn identity_preserves_coordinates() {
        let transform = CoordinateTransform::default();
        assert!(transform.is_identity());

        let p = Vector3::new(-1.234567891234, 45.987654321987, 123.456);
        assert_eq!(transform.to_geographic(&p), p);
        assert_eq!(transform.to_working(&p), p);
    }

    #[test]
    fn web_mercator_reference_point() {
        let transform = CoordinateTransform::to_geographic_frame(Crs::WebMercator);

        let working = Vector3::new(261_668.0, 6_250_250.0, 35.0);
        let geo = transform.to_geographic(&working);

        assert!((geo[0] - 2.350604).abs() < 1.0E-5, "bad longitude {}", geo[0]);
        assert!((geo[1] - 48.854742).abs() < 1.0E-5, "bad latitude {}", geo[1]);
        assert_eq!(geo[2], 35.0, "elevation is not reprojected");
    }

    #[rstest]
    #[case(Crs::WebMercator, Vector3::new(7.5, -33.2, 12.0))]
    #[case(Crs::Ecef, Vector3::new(-122.4, 37.8, 50.0))]
    #[case(Crs::Ecef, Vector3::new(139.7, 35.6, 0.0))]
    fn round_trip(#[case] crs: Crs, #[case] geo: Vector3<f64>) {
        let transform = CoordinateTransform::to_geographic_frame(crs);
        let working = transform.to_working(&geo);
        let back = transform.to_geographic(&working);

        assert!((back[0] - geo[0]).abs() < 1.0E-6);
        assert!((back[1] - geo[1]).abs() < 1.0E-6);
        assert!((back[2] - geo[2]).abs() < 1.0E-3);
    }

    #[test]
    fn ecef_equator() {
        let transform = CoordinateTransform::to_geographic_frame(Crs::Ecef);
        let working = transform.to_working(&Vector3::new(0.0, 0.0, 0.0));
        assert!((working[0] - 6378137.0).abs() < 1.0E-3);
        assert!(working[1].abs() < 1.0E-3);
        assert!(working[2].abs() < 1.0E-3);
    }

    #[test]
    fn parsing() {
        assert_eq!(Crs::from_str("epsg:3857"), Ok(Crs::WebMercator));
        assert_eq!(Crs::from_str("WGS84"), Ok(Crs::Wgs84));
        assert_eq!(Crs::from_str("EPSG:2154"), Err(Error::UnknownCrs));
        assert_eq!(Crs::Ecef.to_string(), "EPSG:4978");
    }
}
