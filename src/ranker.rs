use ordered_float::OrderedFloat;

use crate::geo::{haversine_miles, Coordinate};
use crate::spot::Spot;

/// Order spots nearest-first from `reference`, attaching `distance` (miles) to each copy.
/// Without a reference the spots come back in input order, unannotated.
/// Ties keep their input order; NaN distances sort last.
pub fn rank(spots: &[Spot], reference: Option<Coordinate>) -> Vec<Spot> {
    let Some(reference) = reference else {
        return spots.to_vec();
    };

    let mut ranked: Vec<Spot> = spots
        .iter()
        .map(|spot| Spot {
            distance: Some(haversine_miles(reference, spot.location)),
            ..spot.clone()
        })
        .collect();
    // sort_by_key is stable
    ranked.sort_by_key(|spot| OrderedFloat(spot.distance.unwrap_or(f64::INFINITY)));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(spots: &[Spot]) -> Vec<&str> {
        spots.iter().map(|s| s.name.as_str()).collect()
    }

    fn origin() -> Coordinate {
        Coordinate::new(0.0, 0.0)
    }

    #[test]
    fn no_reference_keeps_input() {
        let spots = vec![
            Spot::new("C", "", Coordinate::new(3.0, 0.0)),
            Spot::new("A", "", Coordinate::new(1.0, 0.0)),
            Spot::new("B", "", Coordinate::new(2.0, 0.0)),
        ];
        let ranked = rank(&spots, None);
        assert_eq!(ranked, spots);
        assert!(ranked.iter().all(|s| s.distance.is_none()));
    }

    #[test]
    fn sorts_by_distance() {
        // Distances from the origin grow with latitude along the prime meridian.
        let spots = vec![
            Spot::new("A", "", Coordinate::new(5.0, 0.0)),
            Spot::new("B", "", Coordinate::new(1.0, 0.0)),
            Spot::new("C", "", Coordinate::new(3.0, 0.0)),
        ];
        let ranked = rank(&spots, Some(origin()));
        assert_eq!(names(&ranked), vec!["B", "C", "A"]);
        for spot in &ranked {
            assert_eq!(spot.distance, Some(haversine_miles(origin(), spot.location)));
        }
    }

    #[test]
    fn ties_keep_input_order() {
        let here = Coordinate::new(32.7157, -117.1611);
        let far = Coordinate::new(34.0522, -118.2437);
        let spots = vec![
            Spot::new("far", "", far),
            Spot::new("first", "", here),
            Spot::new("second", "", here),
            Spot::new("third", "", here),
        ];
        let ranked = rank(&spots, Some(Coordinate::new(32.0, -117.0)));
        assert_eq!(names(&ranked), vec!["first", "second", "third", "far"]);
    }

    #[test]
    fn ranking_twice_is_stable() {
        let reference = Coordinate::new(32.7157, -117.1611);
        let spots = vec![
            Spot::new("LA", "", Coordinate::new(34.0522, -118.2437)),
            Spot::new("Tijuana", "", Coordinate::new(32.5149, -117.0382)),
            Spot::new("Escondido", "", Coordinate::new(33.1192, -117.0864)),
            Spot::new("Tijuana again", "", Coordinate::new(32.5149, -117.0382)),
        ];
        let once = rank(&spots, Some(reference));
        let twice = rank(&once, Some(reference));
        assert_eq!(once, twice);
        assert_eq!(
            names(&once),
            vec!["Tijuana", "Tijuana again", "Escondido", "LA"]
        );
    }

    #[test]
    fn reference_overwrites_previous_distance() {
        let mut spot = Spot::new("A", "", Coordinate::new(1.0, 0.0));
        spot.distance = Some(1_000.0);
        let ranked = rank(&[spot], Some(origin()));
        assert!(ranked[0].distance.unwrap() < 100.0);
    }

    #[test]
    fn input_is_not_mutated() {
        let spots = vec![
            Spot::new("far", "", Coordinate::new(10.0, 0.0)),
            Spot::new("near", "", Coordinate::new(1.0, 0.0)),
        ];
        let before = spots.clone();
        let _ = rank(&spots, Some(origin()));
        assert_eq!(spots, before);
    }

    #[test]
    fn nan_sorts_last() {
        let spots = vec![
            Spot::new("bad", "", Coordinate::new(f64::NAN, 0.0)),
            Spot::new("ok", "", Coordinate::new(1.0, 0.0)),
        ];
        let ranked = rank(&spots, Some(origin()));
        assert_eq!(names(&ranked), vec!["ok", "bad"]);
        assert!(ranked[1].distance.unwrap().is_nan());
    }

    #[test]
    fn empty_input() {
        assert!(rank(&[], Some(origin())).is_empty());
        assert!(rank(&[], None).is_empty());
    }
}
