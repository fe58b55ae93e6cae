//! Orchestration Service
//!
//! One handler per tool. Handlers default and normalize arguments (see
//! [`args`]), sequence provider calls, apply fallback chains and assemble a
//! uniform [`OrchestrationResult`].
//!
//! Two implementations of [`TravelService`] exist and the choice is made once,
//! in [`build_service`]: the live [`TravelOrchestrator`] and the
//! [`MockTravelService`] used when no credentials are configured.

pub mod args;
pub mod fallback;
pub mod flights;
pub mod hotels;
pub mod locations;
pub mod mock;
pub mod recommendations;
pub mod trips;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::config::{CredentialPolicy, ServerConfig};
use crate::errors::Error;
use crate::provider::{AccessToken, HttpProviderClient, Provider, ProviderPayload, ProviderRequest, RetryPolicy};

use args::*;
pub use mock::MockTravelService;

/// Internal handler names, shared by the registry and mock records
pub mod handlers {
    pub const SEARCH_FLIGHTS: &str = "searchFlights";
    pub const SEARCH_FLIGHT_DESTINATIONS: &str = "searchFlightDestinations";
    pub const GET_FLIGHT_OFFERS_PRICING: &str = "getFlightOffersPricing";
    pub const GET_FLIGHT_SEATMAPS: &str = "getFlightSeatmaps";
    pub const SEARCH_HOTELS: &str = "searchHotels";
    pub const SEARCH_HOTELS_BY_GEOLOCATION: &str = "searchHotelsByGeolocation";
    pub const GET_HOTEL_DETAILS: &str = "getHotelDetails";
    pub const SEARCH_AIRPORTS: &str = "searchAirports";
    pub const SEARCH_CITIES: &str = "searchCities";
    pub const SEARCH_POINTS_OF_INTEREST: &str = "searchPointsOfInterest";
    pub const SEARCH_CAR_RENTALS: &str = "searchCarRentals";
    pub const CREATE_TRIP_PLAN: &str = "createTripPlan";
    pub const GET_TRAVEL_RECOMMENDATIONS: &str = "getTravelRecommendations";
    pub const GET_TRAVEL_PREDICTIONS: &str = "getTravelPredictions";
}

/// Uniform result envelope returned by every handler.
///
/// Failures are `Err` values, so `success` is always `true`; `data` is an
/// array or an object and never `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrchestrationResult {
    pub success: bool,
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_params: Option<Value>,
    /// Produced without contacting the provider
    #[serde(skip)]
    pub mock: bool,
}

impl OrchestrationResult {
    /// A list of records; `count` is set to its length
    pub fn records(records: Vec<Value>) -> Self {
        Self {
            success: true,
            count: Some(records.len()),
            data: Value::Array(records),
            meta: None,
            message: None,
            search_params: None,
            mock: false,
        }
    }

    /// A single structured value; `null` becomes an empty list
    pub fn object(data: Value) -> Self {
        let data = if data.is_null() { Value::Array(Vec::new()) } else { data };
        Self {
            success: true,
            data,
            count: None,
            meta: None,
            message: None,
            search_params: None,
            mock: false,
        }
    }

    /// Records of a provider payload with its `meta` carried over
    pub fn from_payload(payload: ProviderPayload) -> Self {
        let records = payload.records();
        Self::records(records).with_meta(payload.meta)
    }

    pub fn with_meta(mut self, meta: Option<Value>) -> Self {
        self.meta = meta;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Echo the normalized arguments the handler searched with
    pub fn with_search_params<T: Serialize>(mut self, params: &T) -> Result<Self, Error> {
        self.search_params = Some(serde_json::to_value(params)?);
        Ok(self)
    }

    /// `data` as a slice of records; an object is not a record list
    pub fn data_records(&self) -> &[Value] {
        self.data.as_array().map(Vec::as_slice).unwrap_or_default()
    }

    /// Look up an echoed search parameter
    pub fn search_param(&self, key: &str) -> Option<&str> {
        self.search_params.as_ref()?.get(key)?.as_str()
    }
}

/// One method per tool
#[async_trait]
pub trait TravelService: Send + Sync {
    async fn search_flights(&self, args: FlightSearchArgs) -> Result<OrchestrationResult, Error>;
    async fn search_flight_destinations(
        &self,
        args: FlightDestinationArgs,
    ) -> Result<OrchestrationResult, Error>;
    async fn get_flight_offers_pricing(
        &self,
        args: FlightOffersArgs,
    ) -> Result<OrchestrationResult, Error>;
    async fn get_flight_seatmaps(&self, args: FlightOffersArgs) -> Result<OrchestrationResult, Error>;
    async fn search_hotels(&self, args: HotelSearchArgs) -> Result<OrchestrationResult, Error>;
    async fn search_hotels_by_geolocation(
        &self,
        args: HotelGeoSearchArgs,
    ) -> Result<OrchestrationResult, Error>;
    async fn get_hotel_details(&self, args: HotelDetailsArgs) -> Result<OrchestrationResult, Error>;
    async fn search_airports(&self, args: LocationSearchArgs) -> Result<OrchestrationResult, Error>;
    async fn search_cities(&self, args: LocationSearchArgs) -> Result<OrchestrationResult, Error>;
    async fn search_points_of_interest(
        &self,
        args: PoiSearchArgs,
    ) -> Result<OrchestrationResult, Error>;
    async fn search_car_rentals(&self, args: CarRentalArgs) -> Result<OrchestrationResult, Error>;
    async fn create_trip_plan(&self, args: TripPlanArgs) -> Result<OrchestrationResult, Error>;
    async fn get_travel_recommendations(
        &self,
        args: RecommendationArgs,
    ) -> Result<OrchestrationResult, Error>;
    async fn get_travel_predictions(
        &self,
        args: TravelPredictionArgs,
    ) -> Result<OrchestrationResult, Error>;
}

/// Live orchestration over a [`Provider`]
pub struct TravelOrchestrator<P> {
    provider: Arc<P>,
    city_retry: RetryPolicy,
}

impl<P: Provider> TravelOrchestrator<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider: Arc::new(provider),
            city_retry: RetryPolicy::default(),
        }
    }

    /// Override the rate-limit policy used by city search
    pub fn with_city_retry(mut self, policy: RetryPolicy) -> Self {
        self.city_retry = policy;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    async fn token(&self) -> Result<AccessToken, Error> {
        self.provider.authenticate().await
    }

    async fn fetch(&self, request: ProviderRequest, token: &AccessToken) -> Result<ProviderPayload, Error> {
        self.provider.call(&request, token).await
    }
}

#[async_trait]
impl<P: Provider + 'static> TravelService for TravelOrchestrator<P> {
    async fn search_flights(&self, args: FlightSearchArgs) -> Result<OrchestrationResult, Error> {
        self.flight_offers(args)
            .await
            .map_err(|e| e.within("Flight search"))
    }

    async fn search_flight_destinations(
        &self,
        args: FlightDestinationArgs,
    ) -> Result<OrchestrationResult, Error> {
        self.flight_destinations(args)
            .await
            .map_err(|e| e.within("Flight destinations search"))
    }

    async fn get_flight_offers_pricing(
        &self,
        args: FlightOffersArgs,
    ) -> Result<OrchestrationResult, Error> {
        self.price_flight_offers(args)
            .await
            .map_err(|e| e.within("Flight pricing"))
    }

    async fn get_flight_seatmaps(&self, args: FlightOffersArgs) -> Result<OrchestrationResult, Error> {
        self.seatmaps(args)
            .await
            .map_err(|e| e.within("Seat map lookup"))
    }

    async fn search_hotels(&self, args: HotelSearchArgs) -> Result<OrchestrationResult, Error> {
        self.hotel_offers(args)
            .await
            .map_err(|e| e.within("Hotel search"))
    }

    async fn search_hotels_by_geolocation(
        &self,
        args: HotelGeoSearchArgs,
    ) -> Result<OrchestrationResult, Error> {
        self.hotel_offers_near(args)
            .await
            .map_err(|e| e.within("Hotel geolocation search"))
    }

    async fn get_hotel_details(&self, args: HotelDetailsArgs) -> Result<OrchestrationResult, Error> {
        self.hotel_details(args)
            .await
            .map_err(|e| e.within("Hotel details"))
    }

    async fn search_airports(&self, args: LocationSearchArgs) -> Result<OrchestrationResult, Error> {
        self.airports(args)
            .await
            .map_err(|e| e.within("Airport search"))
    }

    async fn search_cities(&self, args: LocationSearchArgs) -> Result<OrchestrationResult, Error> {
        self.cities(args)
            .await
            .map_err(|e| e.within("City search"))
    }

    async fn search_points_of_interest(
        &self,
        args: PoiSearchArgs,
    ) -> Result<OrchestrationResult, Error> {
        self.points_of_interest(args)
            .await
            .map_err(|e| e.within("Points of interest search"))
    }

    async fn search_car_rentals(&self, args: CarRentalArgs) -> Result<OrchestrationResult, Error> {
        self.car_offers(args)
            .await
            .map_err(|e| e.within("Car rental search"))
    }

    async fn create_trip_plan(&self, args: TripPlanArgs) -> Result<OrchestrationResult, Error> {
        self.trip_plan(args)
            .await
            .map_err(|e| e.within("Trip planning"))
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
        self.trip_purpose(args)
            .await
            .map_err(|e| e.within("Travel prediction"))
    }
}

/// Build the service for this configuration.
///
/// With credentials the live orchestrator is returned. Without them the
/// credential policy decides between mock mode and a configuration error.
pub fn build_service(config: &ServerConfig) -> Result<Arc<dyn TravelService>, Error> {
    match (&config.credentials, config.credential_policy) {
        (Some(credentials), _) => {
            let client = HttpProviderClient::from_config(config)?;
            info!(
                client_id = %credentials.client_id,
                base_url = %client.base_url(),
                "Using live Amadeus provider"
            );
            Ok(Arc::new(TravelOrchestrator::new(client)))
        }
        (None, CredentialPolicy::Mock) => {
            warn!("Amadeus credentials not configured; serving mock data");
            Ok(Arc::new(MockTravelService::new()))
        }
        (None, CredentialPolicy::Fail) => Err(Error::Configuration(
            "AMADEUS_CLIENT_ID and AMADEUS_CLIENT_SECRET must be set".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_result_envelope_serialization() {
        let result = OrchestrationResult::records(vec![json!({ "id": "1" })])
            .with_message("ok")
            .with_search_params(&json!({ "origin": "NYC" }))
            .unwrap();
        let wire = serde_json::to_value(&result).unwrap();

        assert_eq!(
            wire,
            json!({
                "success": true,
                "data": [{ "id": "1" }],
                "count": 1,
                "message": "ok",
                "searchParams": { "origin": "NYC" }
            })
        );
        assert_eq!(result.search_param("origin"), Some("NYC"));
    }

    #[test]
    fn test_null_data_becomes_empty_list() {
        let result = OrchestrationResult::object(Value::Null);
        assert_eq!(result.data, json!([]));
        assert!(result.data_records().is_empty());
    }

    #[test]
    fn test_build_service_honours_credential_policy() {
        let mock = ServerConfig::default();
        assert!(build_service(&mock).is_ok());

        let strict = ServerConfig::default().with_credential_policy(CredentialPolicy::Fail);
        assert!(matches!(build_service(&strict), Err(Error::Configuration(_))));

        let live = ServerConfig::default().with_credentials("id", "secret");
        assert!(build_service(&live).is_ok());
    }
}
