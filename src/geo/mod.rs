use crate::models::location::Location;

/// Straight-line distance on the coordinate plane, in coordinate units.
pub fn euclidean_distance(a: &Location, b: &Location) -> f64 {
    let delta_lat = a.latitude - b.latitude;
    let delta_lng = a.longitude - b.longitude;

    (delta_lat * delta_lat + delta_lng * delta_lng).sqrt()
}

#[cfg(test)]
mod tests {
    use super::euclidean_distance;
    use crate::models::location::Location;

    #[test]
    fn zero_distance_for_same_point() {
        let p = Location::new("City Center", 0.0, 0.0);
        assert_eq!(euclidean_distance(&p, &p), 0.0);
    }

    #[test]
    fn three_four_five_triangle() {
        let a = Location::new("A", 1.0, 1.0);
        let b = Location::new("B", 4.0, 5.0);
        assert!((euclidean_distance(&a, &b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn distance_is_symmetric() {
        let center = Location::new("City Center", 0.0, 0.0);
        let suburb = Location::new("Suburb", 5.0, 5.0);
        assert_eq!(
            euclidean_distance(&center, &suburb),
            euclidean_distance(&suburb, &center)
        );
        assert!((center.distance_to(&suburb) - 50f64.sqrt()).abs() < 1e-12);
    }
}
