//! Mock mode
//!
//! Served when no provider credentials are configured. Every provider-backed
//! handler answers with a single placeholder record naming the handler and
//! echoing the normalized arguments; the provider is never contacted.
//! Recommendations need no provider, so they are computed as in live mode.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::errors::Error;

use super::args::*;
use super::{OrchestrationResult, TravelService, handlers, recommendations};

pub const MOCK_MESSAGE: &str =
    "Mock data - configure AMADEUS_CLIENT_ID and AMADEUS_CLIENT_SECRET for live results";

#[derive(Debug, Default, Clone, Copy)]
pub struct MockTravelService;

impl MockTravelService {
    pub fn new() -> Self {
        Self
    }

    fn respond<T: Serialize>(&self, method: &str, args: &T) -> Result<OrchestrationResult, Error> {
        debug!("Mock response for {}", method);
        let arguments = serde_json::to_value(args)?;
        let record = json!({
            "method": method,
            "message": MOCK_MESSAGE,
            "arguments": arguments,
        });

        let mut result = OrchestrationResult::records(vec![record])
            .with_message(MOCK_MESSAGE)
            .with_search_params(args)?;
        result.mock = true;
        Ok(result)
    }
}

#[async_trait]
impl TravelService for MockTravelService {
    async fn search_flights(&self, args: FlightSearchArgs) -> Result<OrchestrationResult, Error> {
        self.respond(handlers::SEARCH_FLIGHTS, &args)
    }

    async fn search_flight_destinations(
        &self,
        args: FlightDestinationArgs,
    ) -> Result<OrchestrationResult, Error> {
        self.respond(handlers::SEARCH_FLIGHT_DESTINATIONS, &args)
    }

    async fn get_flight_offers_pricing(
        &self,
        args: FlightOffersArgs,
    ) -> Result<OrchestrationResult, Error> {
        self.respond(handlers::GET_FLIGHT_OFFERS_PRICING, &args)
    }

    async fn get_flight_seatmaps(&self, args: FlightOffersArgs) -> Result<OrchestrationResult, Error> {
        self.respond(handlers::GET_FLIGHT_SEATMAPS, &args)
    }

    async fn search_hotels(&self, args: HotelSearchArgs) -> Result<OrchestrationResult, Error> {
        self.respond(handlers::SEARCH_HOTELS, &args)
    }

    async fn search_hotels_by_geolocation(
        &self,
        args: HotelGeoSearchArgs,
    ) -> Result<OrchestrationResult, Error> {
        self.respond(handlers::SEARCH_HOTELS_BY_GEOLOCATION, &args)
    }

    async fn get_hotel_details(&self, args: HotelDetailsArgs) -> Result<OrchestrationResult, Error> {
        self.respond(handlers::GET_HOTEL_DETAILS, &args)
    }

    async fn search_airports(&self, args: LocationSearchArgs) -> Result<OrchestrationResult, Error> {
        self.respond(handlers::SEARCH_AIRPORTS, &args)
    }

    async fn search_cities(&self, args: LocationSearchArgs) -> Result<OrchestrationResult, Error> {
        self.respond(handlers::SEARCH_CITIES, &args)
    }

    async fn search_points_of_interest(
        &self,
        args: PoiSearchArgs,
    ) -> Result<OrchestrationResult, Error> {
        self.respond(handlers::SEARCH_POINTS_OF_INTEREST, &args)
    }

    async fn search_car_rentals(&self, args: CarRentalArgs) -> Result<OrchestrationResult, Error> {
        self.respond(handlers::SEARCH_CAR_RENTALS, &args)
    }

    async fn create_trip_plan(&self, args: TripPlanArgs) -> Result<OrchestrationResult, Error> {
        self.respond(handlers::CREATE_TRIP_PLAN, &args)
    }

    async fn get_travel_recommendations(
        &self,
        args: RecommendationArgs,
    ) -> Result<OrchestrationResult, Error> {
        recommendations::recommend(&args).into_result()
    }

    async fn get_travel_predictions(
        &self,
        args: TravelPredictionArgs,
    ) -> Result<OrchestrationResult, Error> {
        self.respond(handlers::GET_TRAVEL_PREDICTIONS, &args)
    }
}
