//! The travel tool catalog
//!
//! Descriptors are built once, in the order `tools/list` advertises them, and
//! each is bound to one [`TravelService`] method, its options table and its
//! response style.

use std::sync::Arc;

use futures::FutureExt;
use serde_json::json;

use crate::errors::Error;
use crate::formatter;
use crate::service::args::*;
use crate::service::{TravelService, handlers};
use crate::types::tools::{Tool, ToolBuilder, ToolParameterBuilder, ToolParameterType};

use super::tool_registry::{ResponseStyle, ToolRegistry};

const MAX_DESCRIPTION: &str = "Maximum number of results to return";

fn with_default(description: &str, options: &ToolOptions, key: &str) -> String {
    match options.default_for(key) {
        Some(OptionDefault::Text(value)) => format!("{} (default: \"{}\")", description, value),
        Some(OptionDefault::Flag(value)) => format!("{} (default: {})", description, value),
        None => description.to_string(),
    }
}

/// Optional parameter advertising the default from `options`
fn defaulted(
    name: &str,
    kind: ToolParameterType,
    description: &str,
    options: &ToolOptions,
) -> ToolParameterBuilder {
    let builder = ToolParameterBuilder::new(name, kind).description(with_default(description, options, name));
    match options.default_for(name) {
        Some(default) => builder.default_value(default.to_value()),
        None => builder,
    }
}

fn format_parameter() -> ToolParameterBuilder {
    ToolParameterBuilder::new("format", ToolParameterType::String)
        .description("Response format: \"json\" (default) or \"text\" for a readable summary")
        .enum_values(vec!["json", "text"])
}

fn string_list(name: &str, description: &str) -> ToolParameterBuilder {
    ToolParameterBuilder::new(name, ToolParameterType::Array)
        .description(description)
        .schema(json!({ "type": ["array", "string"], "items": { "type": "string" } }))
}

fn flight_offers(description: &str) -> ToolParameterBuilder {
    ToolParameterBuilder::new("flightOffers", ToolParameterType::Array)
        .description(description)
        .schema(json!({ "type": "array", "items": { "type": "object" } }))
        .required(true)
}

fn date(description: &str) -> String {
    format!("{} in YYYY-MM-DD format", description)
}

fn search_flights_tool() -> Tool {
    let options = &FLIGHT_SEARCH_OPTIONS;
    ToolBuilder::new(
        "search_flights",
        "Search for available flights between airports using Amadeus API",
    )
    .required_string("origin", "Origin airport code (e.g., \"NYC\", \"LAX\", \"LHR\")")
    .required_string("destination", "Destination airport code (e.g., \"LAX\", \"NYC\", \"CDG\")")
    .required_string("departureDate", &date("Departure date"))
    .optional_string(
        "returnDate",
        "Return date in YYYY-MM-DD format (optional for one-way flights)",
    )
    .with_parameter(defaulted("adults", ToolParameterType::Count, "Number of adult passengers", options))
    .with_parameter(defaulted("max", ToolParameterType::Count, MAX_DESCRIPTION, options))
    .with_parameter(defaulted("currencyCode", ToolParameterType::String, "Currency for prices", options))
    .with_parameter(format_parameter())
    .build()
}

fn search_flight_destinations_tool() -> Tool {
    let options = &FLIGHT_DESTINATION_OPTIONS;
    ToolBuilder::new(
        "search_flight_destinations",
        "Search for flight destinations from a specific origin",
    )
    .required_string("origin", "Origin airport code (e.g., \"NYC\", \"LAX\")")
    .optional_string("departureDate", &date("Departure date"))
    .with_parameter(defaulted("oneWay", ToolParameterType::Boolean, "Whether the flight is one-way", options))
    .with_parameter(defaulted("max", ToolParameterType::Count, MAX_DESCRIPTION, options))
    .with_parameter(format_parameter())
    .build()
}

fn get_flight_offers_pricing_tool() -> Tool {
    ToolBuilder::new("get_flight_offers_pricing", "Get pricing for specific flight offers")
        .with_parameter(flight_offers("Array of flight offers to price"))
        .build()
}

fn get_flight_seatmaps_tool() -> Tool {
    ToolBuilder::new("get_flight_seatmaps", "Get seat maps for specific flights")
        .with_parameter(flight_offers("Array of flight offers to get seat maps for"))
        .build()
}

fn search_hotels_tool() -> Tool {
    let options = &HOTEL_SEARCH_OPTIONS;
    ToolBuilder::new("search_hotels", "Search for available hotels in a city using Amadeus API")
        .required_string("cityCode", "City code (e.g., \"PAR\", \"NYC\", \"LON\", \"TOK\")")
        .required_string("checkInDate", &date("Check-in date"))
        .required_string("checkOutDate", &date("Check-out date"))
        .with_parameter(defaulted("adults", ToolParameterType::Count, "Number of adult guests", options))
        .with_parameter(defaulted("max", ToolParameterType::Count, MAX_DESCRIPTION, options))
        .with_parameter(format_parameter())
        .build()
}

fn search_hotels_by_geolocation_tool() -> Tool {
    let options = &HOTEL_GEO_OPTIONS;
    ToolBuilder::new("search_hotels_by_geolocation", "Search for hotels near specific coordinates")
        .with_parameter(
            ToolParameterBuilder::new("latitude", ToolParameterType::Number)
                .description("Latitude coordinate")
                .required(true),
        )
        .with_parameter(
            ToolParameterBuilder::new("longitude", ToolParameterType::Number)
                .description("Longitude coordinate")
                .required(true),
        )
        .with_parameter(defaulted("radius", ToolParameterType::Count, "Search radius in kilometers", options))
        .required_string("checkInDate", &date("Check-in date"))
        .required_string("checkOutDate", &date("Check-out date"))
        .with_parameter(defaulted("adults", ToolParameterType::Count, "Number of adult guests", options))
        .with_parameter(format_parameter())
        .build()
}

fn get_hotel_details_tool() -> Tool {
    ToolBuilder::new("get_hotel_details", "Get detailed information about a specific hotel")
        .required_string("hotelId", "Hotel ID from search results")
        .optional_string("checkInDate", &date("Check-in date"))
        .optional_string("checkOutDate", &date("Check-out date"))
        .with_parameter(
            ToolParameterBuilder::new("adults", ToolParameterType::Count).description("Number of adult guests"),
        )
        .build()
}

fn location_tool(name: &str, description: &str, keyword: &str) -> Tool {
    ToolBuilder::new(name, description)
        .required_string("keyword", keyword)
        .optional_string("countryCode", "Country code to limit search (optional)")
        .with_parameter(defaulted(
            "max",
            ToolParameterType::Count,
            MAX_DESCRIPTION,
            &LOCATION_SEARCH_OPTIONS,
        ))
        .with_parameter(format_parameter())
        .build()
}

fn search_points_of_interest_tool() -> Tool {
    let options = &POI_SEARCH_OPTIONS;
    ToolBuilder::new("search_points_of_interest", "Search for points of interest in a city")
        .required_string("cityCode", "City code to search in")
        .with_parameter(string_list(
            "categories",
            "Categories to search for (e.g., [\"SIGHTS\", \"RESTAURANT\"])",
        ))
        .with_parameter(defaulted("radius", ToolParameterType::Count, "Search radius in kilometers", options))
        .with_parameter(defaulted("max", ToolParameterType::Count, MAX_DESCRIPTION, options))
        .with_parameter(format_parameter())
        .build()
}

fn search_car_rentals_tool() -> Tool {
    let options = &CAR_RENTAL_OPTIONS;
    ToolBuilder::new("search_car_rentals", "Search for car rental options in a city")
        .required_string("cityCode", "City code for car rental search")
        .required_string("pickUpDate", &date("Pick-up date"))
        .required_string("dropOffDate", &date("Drop-off date"))
        .with_parameter(defaulted("pickUpTime", ToolParameterType::String, "Pick-up time in HH:MM format", options))
        .with_parameter(defaulted(
            "dropOffTime",
            ToolParameterType::String,
            "Drop-off time in HH:MM format",
            options,
        ))
        .with_parameter(format_parameter())
        .build()
}

fn create_trip_plan_tool() -> Tool {
    let options = &TRIP_PLAN_OPTIONS;
    ToolBuilder::new(
        "create_trip_plan",
        "Create a comprehensive trip plan with flights, hotels, and activities",
    )
    .required_string("origin", "Origin city/airport code")
    .required_string("destination", "Destination city/airport code")
    .required_string("departureDate", &date("Departure date"))
    .required_string("returnDate", &date("Return date"))
    .with_parameter(defaulted("adults", ToolParameterType::Count, "Number of adult travelers", options))
    .with_parameter(string_list("interests", "List of interests for activities"))
    .optional_string("budget", "Budget level for the trip")
    .build()
}

fn get_travel_recommendations_tool() -> Tool {
    ToolBuilder::new(
        "get_travel_recommendations",
        "Get travel recommendations and tips for destinations",
    )
    .required_string("destination", "Destination city or country")
    .with_parameter(string_list(
        "interests",
        "List of interests (e.g., [\"culture\", \"food\", \"adventure\"])",
    ))
    .optional_string("budget", "Budget level (e.g., \"budget\", \"mid-range\", \"luxury\")")
    .with_parameter(
        ToolParameterBuilder::new("duration", ToolParameterType::String)
            .description("Trip duration (e.g., \"3 days\", \"1 week\")")
            .schema(json!({ "type": ["string", "number"] })),
    )
    .build()
}

fn get_travel_predictions_tool() -> Tool {
    ToolBuilder::new(
        "get_travel_predictions",
        "Get travel predictions and insights for destinations",
    )
    .required_string("origin", "Origin city code")
    .required_string("destination", "Destination city code")
    .required_string("departureDate", &date("Departure date"))
    .optional_string(
        "returnDate",
        "Return date in YYYY-MM-DD format (defaults to the departure date)",
    )
    .build()
}

/// Register every travel tool, bound to `registry`'s service
pub fn register_travel_tools(registry: &mut ToolRegistry) -> Result<(), Error> {
    use ResponseStyle::{Json, Prose, Summary};

    registry
        .register(
            search_flights_tool(),
            handlers::SEARCH_FLIGHTS,
            FLIGHT_SEARCH_OPTIONS,
            Summary(formatter::flights_summary),
            |service, args: FlightSearchArgs| async move { service.search_flights(args).await }.boxed(),
        )?
        .register(
            search_flight_destinations_tool(),
            handlers::SEARCH_FLIGHT_DESTINATIONS,
            FLIGHT_DESTINATION_OPTIONS,
            Summary(formatter::destinations_summary),
            |service, args: FlightDestinationArgs| {
                async move { service.search_flight_destinations(args).await }.boxed()
            },
        )?
        .register(
            get_flight_offers_pricing_tool(),
            handlers::GET_FLIGHT_OFFERS_PRICING,
            ToolOptions::NONE,
            Json,
            |service, args: FlightOffersArgs| {
                async move { service.get_flight_offers_pricing(args).await }.boxed()
            },
        )?
        .register(
            get_flight_seatmaps_tool(),
            handlers::GET_FLIGHT_SEATMAPS,
            ToolOptions::NONE,
            Json,
            |service, args: FlightOffersArgs| async move { service.get_flight_seatmaps(args).await }.boxed(),
        )?
        .register(
            search_hotels_tool(),
            handlers::SEARCH_HOTELS,
            HOTEL_SEARCH_OPTIONS,
            Summary(formatter::hotels_summary),
            |service, args: HotelSearchArgs| async move { service.search_hotels(args).await }.boxed(),
        )?
        .register(
            search_hotels_by_geolocation_tool(),
            handlers::SEARCH_HOTELS_BY_GEOLOCATION,
            HOTEL_GEO_OPTIONS,
            Summary(formatter::hotels_summary),
            |service, args: HotelGeoSearchArgs| {
                async move { service.search_hotels_by_geolocation(args).await }.boxed()
            },
        )?
        .register(
            get_hotel_details_tool(),
            handlers::GET_HOTEL_DETAILS,
            ToolOptions::NONE,
            Json,
            |service, args: HotelDetailsArgs| async move { service.get_hotel_details(args).await }.boxed(),
        )?
        .register(
            location_tool(
                "search_airports",
                "Search for airports by keyword or location",
                "Search keyword (city name, airport code, etc.)",
            ),
            handlers::SEARCH_AIRPORTS,
            LOCATION_SEARCH_OPTIONS,
            Summary(formatter::airports_summary),
            |service, args: LocationSearchArgs| async move { service.search_airports(args).await }.boxed(),
        )?
        .register(
            location_tool(
                "search_cities",
                "Search for cities by keyword",
                "City name or keyword to search for",
            ),
            handlers::SEARCH_CITIES,
            LOCATION_SEARCH_OPTIONS,
            Summary(formatter::cities_summary),
            |service, args: LocationSearchArgs| async move { service.search_cities(args).await }.boxed(),
        )?
        .register(
            search_points_of_interest_tool(),
            handlers::SEARCH_POINTS_OF_INTEREST,
            POI_SEARCH_OPTIONS,
            Summary(formatter::points_of_interest_summary),
            |service, args: PoiSearchArgs| {
                async move { service.search_points_of_interest(args).await }.boxed()
            },
        )?
        .register(
            search_car_rentals_tool(),
            handlers::SEARCH_CAR_RENTALS,
            CAR_RENTAL_OPTIONS,
            Summary(formatter::car_rentals_summary),
            |service, args: CarRentalArgs| async move { service.search_car_rentals(args).await }.boxed(),
        )?
        .register(
            create_trip_plan_tool(),
            handlers::CREATE_TRIP_PLAN,
            TRIP_PLAN_OPTIONS,
            Prose(formatter::trip_plan),
            |service, args: TripPlanArgs| async move { service.create_trip_plan(args).await }.boxed(),
        )?
        .register(
            get_travel_recommendations_tool(),
            handlers::GET_TRAVEL_RECOMMENDATIONS,
            ToolOptions::NONE,
            Prose(formatter::recommendations),
            |service, args: RecommendationArgs| {
                async move { service.get_travel_recommendations(args).await }.boxed()
            },
        )?
        .register(
            get_travel_predictions_tool(),
            handlers::GET_TRAVEL_PREDICTIONS,
            ToolOptions::NONE,
            Json,
            |service, args: TravelPredictionArgs| {
                async move { service.get_travel_predictions(args).await }.boxed()
            },
        )?;

    Ok(())
}

impl ToolRegistry {
    /// Registry holding the full travel catalog
    pub fn with_travel_tools(service: Arc<dyn TravelService>) -> Result<Self, Error> {
        let mut registry = ToolRegistry::new(service);
        register_travel_tools(&mut registry)?;
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::MockTravelService;
    use std::collections::HashSet;

    fn registry() -> ToolRegistry {
        ToolRegistry::with_travel_tools(Arc::new(MockTravelService::new())).unwrap()
    }

    #[test]
    fn test_catalog_is_unique_and_ordered() {
        let names: Vec<String> = registry().list_tools().into_iter().map(|t| t.name).collect();

        assert_eq!(names.len(), 14);
        assert_eq!(names.iter().collect::<HashSet<_>>().len(), names.len());
        assert_eq!(names.first().map(String::as_str), Some("search_flights"));
        assert_eq!(names.last().map(String::as_str), Some("get_travel_predictions"));
        assert_eq!(names, registry().list_tools().into_iter().map(|t| t.name).collect::<Vec<_>>());
    }

    #[test]
    fn test_flight_search_schema_advertises_defaults() {
        let registry = registry();
        let schema = registry.get_tool("search_flights").unwrap().input_schema();

        assert_eq!(schema["required"], json!(["origin", "destination", "departureDate"]));
        assert_eq!(schema["properties"]["adults"]["default"], "1");
        assert_eq!(
            schema["properties"]["adults"]["description"],
            "Number of adult passengers (default: \"1\")"
        );
        assert_eq!(registry.handler_name("search_flights"), Some(handlers::SEARCH_FLIGHTS));
    }

    #[test]
    fn test_destination_flag_default() {
        let registry = registry();
        let tool = registry.get_tool("search_flight_destinations").unwrap();
        assert_eq!(tool.input_schema()["properties"]["oneWay"]["default"], true);
    }
}
