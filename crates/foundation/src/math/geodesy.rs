/// Mean Earth radius (kilometres) used for great-circle distances.
pub const EARTH_MEAN_RADIUS_KM: f64 = 6371.0;

/// Haversine great-circle distance in kilometres between two lat/lon pairs in degrees.
pub fn haversine_km(lat1_deg: f64, lon1_deg: f64, lat2_deg: f64, lon2_deg: f64) -> f64 {
    let d_lat = (lat2_deg - lat1_deg).to_radians();
    let d_lon = (lon2_deg - lon1_deg).to_radians();
    let a = (d_lat * 0.5).sin().powi(2)
        + lat1_deg.to_radians().cos() * lat2_deg.to_radians().cos() * (d_lon * 0.5).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_MEAN_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::haversine_km;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn zero_for_identical_points() {
        assert_close(haversine_km(51.5, -0.12, 51.5, -0.12), 0.0, 1e-12);
    }

    #[test]
    fn quarter_meridian() {
        let d = haversine_km(0.0, 0.0, 90.0, 0.0);
        assert_close(d, std::f64::consts::FRAC_PI_2 * 6371.0, 1e-6);
    }

    #[test]
    fn symmetric() {
        let a = haversine_km(48.85, 2.35, 40.71, -74.0);
        let b = haversine_km(40.71, -74.0, 48.85, 2.35);
        assert_close(a, b, 1e-9);
        assert_close(a, 5837.0, 20.0);
    }
}
