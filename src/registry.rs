//! Static registry mapping city names to geographical coordinates.
//!
//! The registry is fixed at compile time; looking up a name that is not
//! registered is a caller error and surfaces as
//! [`CompareError::UnknownCity`] before any network activity.

use crate::error::CompareError;

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second
/// (index 1). Both values are represented as `f64` degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

/// The city list the default pipeline compares.
pub const DEFAULT_CITIES: [&str; 3] = ["Madrid", "London", "Rio"];

const COORDINATES: &[(&str, LatLon)] = &[
    ("Madrid", LatLon(40.416775, -3.703790)),
    ("London", LatLon(51.507351, -0.127758)),
    ("Rio", LatLon(-22.906847, -43.172896)),
];

/// Looks up the coordinates registered for `city`.
pub fn coordinates(city: &str) -> Result<LatLon, CompareError> {
    COORDINATES
        .iter()
        .find(|(name, _)| *name == city)
        .map(|(_, location)| *location)
        .ok_or_else(|| CompareError::UnknownCity(city.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_cities_resolve() {
        assert_eq!(coordinates("Madrid").unwrap(), LatLon(40.416775, -3.703790));
        assert_eq!(coordinates("London").unwrap(), LatLon(51.507351, -0.127758));
        assert_eq!(coordinates("Rio").unwrap(), LatLon(-22.906847, -43.172896));
    }

    #[test]
    fn unknown_city_is_an_error() {
        let err = coordinates("Atlantis").unwrap_err();
        assert!(matches!(err, CompareError::UnknownCity(name) if name == "Atlantis"));
    }
}
