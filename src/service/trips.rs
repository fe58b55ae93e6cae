//! Trip planning, car rentals and trip-purpose predictions.
//!
//! A trip plan queries flights, hotels and points of interest concurrently
//! with one shared token. A failing section is logged and left empty; the plan
//! itself only fails when the token cannot be obtained.

use serde_json::{Value, json};
use tracing::warn;

use crate::errors::Error;
use crate::provider::{Provider, ProviderRequest, endpoints};

use super::args::{CarRentalArgs, TravelPredictionArgs, TripPlanArgs};
use super::hotels::Stay;
use super::{OrchestrationResult, TravelOrchestrator};

pub const TRIP_FLIGHT_OPTIONS: usize = 3;
pub const TRIP_HOTEL_OPTIONS: usize = 3;
pub const TRIP_ACTIVITY_OPTIONS: usize = 5;

fn section(name: &str, outcome: Result<Vec<Value>, Error>, limit: usize, missing: &mut Vec<String>) -> Vec<Value> {
    match outcome {
        Ok(mut records) => {
            records.truncate(limit);
            if records.is_empty() {
                missing.push(name.to_string());
            }
            records
        }
        Err(error) => {
            warn!("Trip plan {} unavailable: {}", name, error);
            missing.push(name.to_string());
            Vec::new()
        }
    }
}

impl<P: Provider> TravelOrchestrator<P> {
    pub(crate) async fn trip_plan(&self, args: TripPlanArgs) -> Result<OrchestrationResult, Error> {
        let token = self.token().await?;

        let flights = async {
            let request = ProviderRequest::get(endpoints::FLIGHT_OFFERS)
                .query("originLocationCode", &args.origin)
                .query("destinationLocationCode", &args.destination)
                .query("departureDate", &args.departure_date)
                .query("returnDate", &args.return_date)
                .query("adults", &args.adults)
                .query("max", TRIP_FLIGHT_OPTIONS.to_string());
            Ok::<_, Error>(self.fetch(request, &token).await?.records())
        };
        let stay = Stay {
            check_in: Some(&args.departure_date),
            check_out: Some(&args.return_date),
            adults: Some(&args.adults),
        };
        let hotels = self.offers_by_city_list(&token, &args.destination, TRIP_HOTEL_OPTIONS, stay);
        let activity_limit = TRIP_ACTIVITY_OPTIONS.to_string();
        let activities = self.nearby_points(&token, &args.destination, &[], "5", &activity_limit);

        let (flights, hotels, activities) = futures::join!(flights, hotels, activities);

        let mut missing = Vec::new();
        let flights = section("flights", flights, TRIP_FLIGHT_OPTIONS, &mut missing);
        let hotels = section("hotels", hotels, TRIP_HOTEL_OPTIONS, &mut missing);
        let activities = section("activities", activities, TRIP_ACTIVITY_OPTIONS, &mut missing);

        let plan = json!({
            "origin": &args.origin,
            "destination": &args.destination,
            "departureDate": &args.departure_date,
            "returnDate": &args.return_date,
            "travelers": &args.adults,
            "budget": &args.budget,
            "interests": &args.interests,
            "flights": flights,
            "hotels": hotels,
            "activities": activities,
        });

        let mut result = OrchestrationResult::object(plan).with_search_params(&args)?;
        if !missing.is_empty() {
            result = result
                .with_meta(Some(json!({ "unavailable": missing.clone() })))
                .with_message(format!("Partial plan: no {} found", missing.join(", ")));
        }
        Ok(result)
    }

    pub(crate) async fn car_offers(&self, args: CarRentalArgs) -> Result<OrchestrationResult, Error> {
        let token = self.token().await?;
        let request = ProviderRequest::get(endpoints::CAR_OFFERS)
            .query("cityCode", &args.city_code)
            .query("pickUpDate", &args.pick_up_date)
            .query("dropOffDate", &args.drop_off_date)
            .query("pickUpTime", &args.pick_up_time)
            .query("dropOffTime", &args.drop_off_time);

        OrchestrationResult::from_payload(self.fetch(request, &token).await?).with_search_params(&args)
    }

    pub(crate) async fn trip_purpose(
        &self,
        args: TravelPredictionArgs,
    ) -> Result<OrchestrationResult, Error> {
        let token = self.token().await?;
        let return_date = args.return_date.as_deref().unwrap_or(&args.departure_date);
        let request = ProviderRequest::get(endpoints::TRIP_PURPOSE)
            .query("originLocationCode", &args.origin)
            .query("destinationLocationCode", &args.destination)
            .query("departureDate", &args.departure_date)
            .query("returnDate", return_date);
        let payload = self.fetch(request, &token).await?;

        OrchestrationResult::object(payload.data.unwrap_or(Value::Null))
            .with_meta(payload.meta)
            .with_search_params(&args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderPayload;
    use crate::service::args::{CAR_RENTAL_OPTIONS, TRIP_PLAN_OPTIONS, ToolOptions, parse_args};
    use crate::test_support::{ScriptedProvider, args_map, upstream_error};

    fn trip_args() -> TripPlanArgs {
        parse_args(
            &TRIP_PLAN_OPTIONS,
            args_map(json!({
                "origin": "NYC",
                "destination": "PAR",
                "departureDate": "2025-05-01",
                "returnDate": "2025-05-08",
                "interests": ["art", "food"]
            })),
        )
        .unwrap()
    }

    fn offers(count: usize) -> ProviderPayload {
        let data: Vec<Value> = (0..count).map(|i| json!({ "id": i.to_string() })).collect();
        ProviderPayload::with_data(Value::Array(data))
    }

    #[tokio::test]
    async fn test_full_plan_truncates_sections() {
        let provider = ScriptedProvider::new(|request| match request.path.as_str() {
            endpoints::FLIGHT_OFFERS => Ok(offers(4)),
            endpoints::HOTELS_BY_CITY => Ok(ProviderPayload::with_data(json!([
                { "hotelId": "A" }, { "hotelId": "B" }, { "hotelId": "C" }, { "hotelId": "D" }
            ]))),
            endpoints::HOTEL_OFFERS => Ok(offers(3)),
            endpoints::LOCATIONS => Ok(ProviderPayload::with_data(json!([
                { "iataCode": "PAR", "geoCode": { "latitude": 48.8, "longitude": 2.3 } }
            ]))),
            endpoints::POINTS_OF_INTEREST => Ok(offers(9)),
            other => panic!("unexpected path {other}"),
        });
        let orchestrator = TravelOrchestrator::new(provider);

        let result = orchestrator.trip_plan(trip_args()).await.unwrap();

        assert_eq!(result.data["flights"].as_array().unwrap().len(), 3);
        assert_eq!(result.data["hotels"].as_array().unwrap().len(), 3);
        assert_eq!(result.data["activities"].as_array().unwrap().len(), 5);
        assert_eq!(result.data["travelers"], "2");
        assert!(result.message.is_none());

        let calls = orchestrator.provider().calls();
        let hotel_offers = calls.iter().find(|c| c.path == endpoints::HOTEL_OFFERS).unwrap();
        assert_eq!(hotel_offers.param("hotelIds"), Some("A,B,C"));
        assert_eq!(orchestrator.provider().token_requests(), 1);
    }

    #[tokio::test]
    async fn test_failing_section_yields_partial_plan() {
        let provider = ScriptedProvider::new(|request| match request.path.as_str() {
            endpoints::FLIGHT_OFFERS => Ok(offers(2)),
            endpoints::HOTELS_BY_CITY => Err(upstream_error(500)),
            endpoints::LOCATIONS => Err(upstream_error(404)),
            other => panic!("unexpected path {other}"),
        });
        let orchestrator = TravelOrchestrator::new(provider);

        let result = orchestrator.trip_plan(trip_args()).await.unwrap();

        assert_eq!(result.data["flights"].as_array().unwrap().len(), 2);
        assert_eq!(result.data["hotels"], json!([]));
        assert_eq!(result.data["activities"], json!([]));
        assert_eq!(result.meta, Some(json!({ "unavailable": ["hotels", "activities"] })));
        assert_eq!(result.message.as_deref(), Some("Partial plan: no hotels, activities found"));
    }

    #[tokio::test]
    async fn test_car_rental_default_times() {
        let provider = ScriptedProvider::new(|_| Ok(offers(1)));
        let orchestrator = TravelOrchestrator::new(provider);

        let args: CarRentalArgs = parse_args(
            &CAR_RENTAL_OPTIONS,
            args_map(json!({ "cityCode": "NCE", "pickUpDate": "2025-07-01", "dropOffDate": "2025-07-05" })),
        )
        .unwrap();
        orchestrator.car_offers(args).await.unwrap();

        let calls = orchestrator.provider().calls();
        assert_eq!(calls[0].path, endpoints::CAR_OFFERS);
        assert_eq!(calls[0].param("pickUpTime"), Some("10:00"));
        assert_eq!(calls[0].param("dropOffTime"), Some("10:00"));
    }

    #[tokio::test]
    async fn test_prediction_return_date_defaults_to_departure() {
        let provider = ScriptedProvider::new(|_| {
            Ok(ProviderPayload::with_data(json!({ "type": "prediction", "result": "LEISURE" })))
        });
        let orchestrator = TravelOrchestrator::new(provider);

        let args: TravelPredictionArgs = parse_args(
            &ToolOptions::NONE,
            args_map(json!({ "origin": "NYC", "destination": "MAD", "departureDate": "2025-08-10" })),
        )
        .unwrap();
        let result = orchestrator.trip_purpose(args).await.unwrap();

        assert_eq!(result.data["result"], "LEISURE");
        assert_eq!(orchestrator.provider().calls()[0].param("returnDate"), Some("2025-08-10"));
    }
}
