//! Tool arguments and recognized options
//!
//! Every tool owns one [`ToolOptions`] table listing the defaults for its
//! optional arguments. The table is applied to the raw argument map before it
//! is deserialized into the tool's typed argument struct, so handlers never
//! repeat defaulting logic.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::Error;
use crate::utils::de;

/// Default value of one recognized option
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OptionDefault {
    Text(&'static str),
    Flag(bool),
}

impl OptionDefault {
    pub fn to_value(self) -> Value {
        match self {
            OptionDefault::Text(s) => Value::String(s.to_string()),
            OptionDefault::Flag(b) => Value::Bool(b),
        }
    }
}

/// Recognized options of a tool with their defaults
#[derive(Debug, Clone, Copy)]
pub struct ToolOptions(pub &'static [(&'static str, OptionDefault)]);

impl ToolOptions {
    pub const NONE: ToolOptions = ToolOptions(&[]);

    /// Fill absent (or null) options with their defaults
    pub fn apply(&self, arguments: &mut Map<String, Value>) {
        for (key, default) in self.0 {
            let missing = arguments.get(*key).is_none_or(Value::is_null);
            if missing {
                arguments.insert((*key).to_string(), default.to_value());
            }
        }
    }

    pub fn default_for(&self, key: &str) -> Option<OptionDefault> {
        self.0.iter().find(|(k, _)| *k == key).map(|(_, d)| *d)
    }
}

use OptionDefault::{Flag, Text};

pub const FLIGHT_SEARCH_OPTIONS: ToolOptions =
    ToolOptions(&[("adults", Text("1")), ("max", Text("10")), ("currencyCode", Text("USD"))]);
pub const FLIGHT_DESTINATION_OPTIONS: ToolOptions =
    ToolOptions(&[("oneWay", Flag(true)), ("max", Text("50"))]);
pub const HOTEL_SEARCH_OPTIONS: ToolOptions =
    ToolOptions(&[("adults", Text("2")), ("max", Text("10"))]);
pub const HOTEL_GEO_OPTIONS: ToolOptions =
    ToolOptions(&[("radius", Text("5")), ("adults", Text("2"))]);
pub const LOCATION_SEARCH_OPTIONS: ToolOptions = ToolOptions(&[("max", Text("10"))]);
pub const POI_SEARCH_OPTIONS: ToolOptions =
    ToolOptions(&[("radius", Text("5")), ("max", Text("10"))]);
pub const CAR_RENTAL_OPTIONS: ToolOptions =
    ToolOptions(&[("pickUpTime", Text("10:00")), ("dropOffTime", Text("10:00"))]);
pub const TRIP_PLAN_OPTIONS: ToolOptions = ToolOptions(&[("adults", Text("2"))]);

/// Apply `options` and deserialize the result into the tool's argument type.
pub fn parse_args<T: DeserializeOwned>(
    options: &ToolOptions,
    mut arguments: Map<String, Value>,
) -> Result<T, Error> {
    options.apply(&mut arguments);
    serde_json::from_value(Value::Object(arguments)).map_err(|e| Error::InvalidParams(e.to_string()))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightSearchArgs {
    pub origin: String,
    pub destination: String,
    #[serde(deserialize_with = "de::date")]
    pub departure_date: String,
    #[serde(default, deserialize_with = "de::opt_date", skip_serializing_if = "Option::is_none")]
    pub return_date: Option<String>,
    #[serde(deserialize_with = "de::string_or_number")]
    pub adults: String,
    #[serde(deserialize_with = "de::string_or_number")]
    pub max: String,
    pub currency_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightDestinationArgs {
    pub origin: String,
    #[serde(default, deserialize_with = "de::opt_date", skip_serializing_if = "Option::is_none")]
    pub departure_date: Option<String>,
    pub one_way: bool,
    #[serde(deserialize_with = "de::string_or_number")]
    pub max: String,
}

/// Flight offers handed back for pricing or seat maps
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightOffersArgs {
    pub flight_offers: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelSearchArgs {
    pub city_code: String,
    #[serde(deserialize_with = "de::date")]
    pub check_in_date: String,
    #[serde(deserialize_with = "de::date")]
    pub check_out_date: String,
    #[serde(deserialize_with = "de::string_or_number")]
    pub adults: String,
    #[serde(deserialize_with = "de::string_or_number")]
    pub max: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelGeoSearchArgs {
    #[serde(deserialize_with = "de::string_or_number")]
    pub latitude: String,
    #[serde(deserialize_with = "de::string_or_number")]
    pub longitude: String,
    #[serde(deserialize_with = "de::string_or_number")]
    pub radius: String,
    #[serde(deserialize_with = "de::date")]
    pub check_in_date: String,
    #[serde(deserialize_with = "de::date")]
    pub check_out_date: String,
    #[serde(deserialize_with = "de::string_or_number")]
    pub adults: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelDetailsArgs {
    pub hotel_id: String,
    #[serde(default, deserialize_with = "de::opt_date", skip_serializing_if = "Option::is_none")]
    pub check_in_date: Option<String>,
    #[serde(default, deserialize_with = "de::opt_date", skip_serializing_if = "Option::is_none")]
    pub check_out_date: Option<String>,
    #[serde(
        default,
        deserialize_with = "de::opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub adults: Option<String>,
}

/// Keyword search shared by airports and cities
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSearchArgs {
    pub keyword: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(deserialize_with = "de::string_or_number")]
    pub max: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoiSearchArgs {
    pub city_code: String,
    #[serde(default, deserialize_with = "de::string_list", skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(deserialize_with = "de::string_or_number")]
    pub radius: String,
    #[serde(deserialize_with = "de::string_or_number")]
    pub max: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarRentalArgs {
    pub city_code: String,
    #[serde(deserialize_with = "de::date")]
    pub pick_up_date: String,
    #[serde(deserialize_with = "de::date")]
    pub drop_off_date: String,
    pub pick_up_time: String,
    pub drop_off_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPlanArgs {
    pub origin: String,
    pub destination: String,
    #[serde(deserialize_with = "de::date")]
    pub departure_date: String,
    #[serde(deserialize_with = "de::date")]
    pub return_date: String,
    #[serde(deserialize_with = "de::string_or_number")]
    pub adults: String,
    #[serde(default, deserialize_with = "de::string_list", skip_serializing_if = "Vec::is_empty")]
    pub interests: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationArgs {
    pub destination: String,
    #[serde(default, deserialize_with = "de::string_list", skip_serializing_if = "Vec::is_empty")]
    pub interests: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    #[serde(
        default,
        deserialize_with = "de::opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelPredictionArgs {
    pub origin: String,
    pub destination: String,
    #[serde(deserialize_with = "de::date")]
    pub departure_date: String,
    #[serde(default, deserialize_with = "de::opt_date", skip_serializing_if = "Option::is_none")]
    pub return_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn test_flight_defaults_and_date_normalization() {
        let args: FlightSearchArgs = parse_args(
            &FLIGHT_SEARCH_OPTIONS,
            map(json!({
                "origin": "NYC",
                "destination": "LAX",
                "departureDate": "2025-12-15T08:00:00",
            })),
        )
        .unwrap();

        assert_eq!(args.departure_date, "2025-12-15");
        assert_eq!(args.adults, "1");
        assert_eq!(args.max, "10");
        assert_eq!(args.currency_code, "USD");
        assert!(args.return_date.is_none());
    }

    #[test]
    fn test_explicit_values_win_over_defaults() {
        let args: HotelSearchArgs = parse_args(
            &HOTEL_SEARCH_OPTIONS,
            map(json!({
                "cityCode": "PAR",
                "checkInDate": "2025-06-01",
                "checkOutDate": "2025-06-04",
                "adults": 3,
                "max": null,
            })),
        )
        .unwrap();

        assert_eq!(args.adults, "3");
        assert_eq!(args.max, "10");
    }

    #[test]
    fn test_flag_defaults() {
        let args: FlightDestinationArgs =
            parse_args(&FLIGHT_DESTINATION_OPTIONS, map(json!({ "origin": "MAD" }))).unwrap();
        assert!(args.one_way);
        assert_eq!(args.max, "50");
        assert_eq!(
            FLIGHT_DESTINATION_OPTIONS.default_for("oneWay"),
            Some(OptionDefault::Flag(true))
        );
    }

    #[test]
    fn test_missing_required_argument_is_invalid_params() {
        let result: Result<CarRentalArgs, Error> =
            parse_args(&CAR_RENTAL_OPTIONS, map(json!({ "cityCode": "NCE" })));
        assert!(matches!(result, Err(Error::InvalidParams(_))));
    }
}
