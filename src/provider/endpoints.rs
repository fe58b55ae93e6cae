//! Amadeus API paths
//!
//! Paths are written absolute but always resolve beneath the configured base
//! URL, so a base such as `https://proxy.internal/amadeus` keeps its prefix.

use url::Url;

use crate::errors::Error;

pub const TOKEN: &str = "/v1/security/oauth2/token";

pub const FLIGHT_OFFERS: &str = "/v2/shopping/flight-offers";
pub const FLIGHT_DESTINATIONS: &str = "/v1/shopping/flight-destinations";
pub const FLIGHT_OFFERS_PRICING: &str = "/v1/shopping/flight-offers/pricing";
pub const SEATMAPS: &str = "/v1/shopping/seatmaps";

pub const HOTELS_BY_CITY: &str = "/v1/reference-data/locations/hotels/by-city";
pub const HOTELS_BY_GEOCODE: &str = "/v1/reference-data/locations/hotels/by-geocode";
pub const HOTEL_OFFERS: &str = "/v3/shopping/hotel-offers";
pub const HOTEL_OFFERS_BY_CITY: &str = "/v2/shopping/hotel-offers";

pub const LOCATIONS: &str = "/v1/reference-data/locations";
pub const CITIES: &str = "/v1/reference-data/locations/cities";
pub const POINTS_OF_INTEREST: &str = "/v1/reference-data/locations/pois";

pub const CAR_OFFERS: &str = "/v1/shopping/car-offers";
pub const TRIP_PURPOSE: &str = "/v1/travel/predictions/trip-purpose";

/// Resolve `path` beneath `base`, keeping any path prefix the base carries
pub fn resolve(base: &Url, path: &str) -> Result<Url, Error> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let prefixed = format!("{}/", base.path());
        base.set_path(&prefixed);
    }
    base.join(path.trim_start_matches('/'))
        .map_err(|e| Error::Configuration(format!("Invalid provider path '{}': {}", path, e)))
}
