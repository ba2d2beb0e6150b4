/// WGS84 Earth Frame Ellipsoid semi-major axis
pub const EARTH_SEMI_MAJOR_AXIS_WGS84: f64 = 6378137.0_f64;

/// WGS84 Earth Frame Ellipsoid flattening
pub const EARTH_FLATTENING_WGS84: f64 = 1.0 / 298.257223563;

/// GRS80 flattening (same semi-major axis as WGS84)
pub const EARTH_FLATTENING_GRS80: f64 = 1.0 / 298.257222101;

/// Web Mercator sphere radius (meters): WGS84 semi major axis
pub const WEB_MERCATOR_RADIUS_M: f64 = EARTH_SEMI_MAJOR_AXIS_WGS84;

/// Web Mercator latitude validity bound (degrees)
pub const WEB_MERCATOR_MAX_LATITUDE_DEG: f64 = 85.05112878;

/// Valid longitude range (degrees)
pub const LONGITUDE_RANGE_DEG: (f64, f64) = (-180.0, 180.0);

/// Valid latitude range (degrees)
pub const LATITUDE_RANGE_DEG: (f64, f64) = (-90.0, 90.0);
