//! Ellipsoidal distances
use geographiclib_rs::{Geodesic, InverseGeodesic};
use itertools::Itertools;
use log::debug;

use crate::{
    constants::{EARTH_FLATTENING_GRS80, EARTH_FLATTENING_WGS84, EARTH_SEMI_MAJOR_AXIS_WGS84},
    prelude::{Error, Vector3},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ellipsoid of revolution used in distance calculations.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Ellipsoid {
    #[default]
    WGS84,
    GRS80,
    Bessel1841,
    International1924,
    Clarke1866,
    Airy1830,
    /// User defined ellipsoid
    Custom {
        /// Semi major axis (meters)
        semi_major_axis_m: f64,
        /// Flattening
        flattening: f64,
    },
}

impl Ellipsoid {
    /// Builds a custom [Ellipsoid] from its semi major axis (meters)
    /// and its flattening.
    pub fn custom(semi_major_axis_m: f64, flattening: f64) -> Result<Self, Error> {
        if !(semi_major_axis_m > 0.0) || !(0.0..1.0).contains(&flattening) {
            return Err(Error::InvalidEllipsoid);
        }
        Ok(Self::Custom {
            semi_major_axis_m,
            flattening,
        })
    }

    /// Returns (semi major axis [m], flattening)
    pub fn parameters(&self) -> (f64, f64) {
        match self {
            Self::WGS84 => (EARTH_SEMI_MAJOR_AXIS_WGS84, EARTH_FLATTENING_WGS84),
            Self::GRS80 => (EARTH_SEMI_MAJOR_AXIS_WGS84, EARTH_FLATTENING_GRS80),
            Self::Bessel1841 => (6377397.155, 1.0 / 299.1528128),
            Self::International1924 => (6378388.0, 1.0 / 297.0),
            Self::Clarke1866 => (6378206.4, 1.0 / 294.978698214),
            Self::Airy1830 => (6377563.396, 1.0 / 299.3249646),
            Self::Custom {
                semi_major_axis_m,
                flattening,
            } => (*semi_major_axis_m, *flattening),
        }
    }

    fn geodesic(&self) -> Geodesic {
        let (a, f) = self.parameters();
        Geodesic::new(a, f)
    }
}

impl std::fmt::Display for Ellipsoid {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::WGS84 => write!(f, "WGS84"),
            Self::GRS80 => write!(f, "GRS80"),
            Self::Bessel1841 => write!(f, "Bessel 1841"),
            Self::International1924 => write!(f, "International 1924"),
            Self::Clarke1866 => write!(f, "Clarke 1866"),
            Self::Airy1830 => write!(f, "Airy 1830"),
            Self::Custom {
                semi_major_axis_m,
                flattening,
            } => write!(f, "a={}m, f={}", semi_major_axis_m, flattening),
        }
    }
}

impl std::str::FromStr for Ellipsoid {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase().replace([' ', '_', '-'], "");
        match s.as_str() {
            "wgs84" | "epsg:7030" => Ok(Self::WGS84),
            "grs80" | "epsg:7019" => Ok(Self::GRS80),
            "bessel1841" | "epsg:7004" => Ok(Self::Bessel1841),
            "international1924" | "intl" | "epsg:7022" => Ok(Self::International1924),
            "clarke1866" | "epsg:7008" => Ok(Self::Clarke1866),
            "airy1830" | "airy" | "epsg:7001" => Ok(Self::Airy1830),
            _ => Err(Error::UnknownEllipsoid),
        }
    }
}

/// Computes ellipsoidal distances between geographic points
/// (longitude, latitude in decimal degrees). Elevation is disregarded.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct DistanceCalculator {
    ellipsoid: Ellipsoid,
}

impl DistanceCalculator {
    pub fn new(ellipsoid: Ellipsoid) -> Self {
        debug!("distance calculator: {} ellipsoid", ellipsoid);
        Self { ellipsoid }
    }

    pub fn ellipsoid(&self) -> Ellipsoid {
        self.ellipsoid
    }

    /// Ellipsoidal distance between two points, in meters.
    pub fn distance(&self, a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
        let geodesic = self.ellipsoid.geodesic();
        Self::inverse(&geodesic, a, b)
    }

    /// Ellipsoidal length of this polyline, in meters.
    /// Null for less than 2 points.
    pub fn length(&self, points: &[Vector3<f64>]) -> f64 {
        let geodesic = self.ellipsoid.geodesic();
        points
            .iter()
            .tuple_windows()
            .map(|(a, b)| Self::inverse(&geodesic, a, b))
            .sum()
    }

    fn inverse(geodesic: &Geodesic, a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
        let s12: f64 = geodesic.inverse(a[1], a[0], b[1], b[0]);
        s12
    }
}
