//! Flight handlers: offer search, destination inspiration, pricing and seat maps.

use futures::future::join_all;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::errors::Error;
use crate::provider::{AccessToken, Provider, ProviderRequest, endpoints};
use crate::utils::date_in_days;

use super::args::{FlightDestinationArgs, FlightOffersArgs, FlightSearchArgs};
use super::{OrchestrationResult, TravelOrchestrator};

/// Destinations sampled when the inspiration endpoint has nothing for an origin
pub const POPULAR_DESTINATIONS: [&str; 10] =
    ["LAX", "ORD", "DFW", "ATL", "DEN", "SFO", "MIA", "LAS", "PHX", "CLT"];

const INSPIRATION_SAMPLE_SIZE: usize = 5;

pub(crate) fn flight_offers_request(args: &FlightSearchArgs) -> ProviderRequest {
    ProviderRequest::get(endpoints::FLIGHT_OFFERS)
        .query("originLocationCode", &args.origin)
        .query("destinationLocationCode", &args.destination)
        .query("departureDate", &args.departure_date)
        .query_opt("returnDate", args.return_date.as_deref())
        .query("adults", &args.adults)
        .query("max", &args.max)
        .query("currencyCode", &args.currency_code)
}

fn offers_body(kind: Option<&str>, offers: Vec<Value>) -> Value {
    match kind {
        Some(kind) => json!({ "data": { "type": kind, "flightOffers": offers } }),
        None => json!({ "data": offers }),
    }
}

impl<P: Provider> TravelOrchestrator<P> {
    pub(crate) async fn flight_offers(
        &self,
        args: FlightSearchArgs,
    ) -> Result<OrchestrationResult, Error> {
        let token = self.token().await?;
        let payload = self.fetch(flight_offers_request(&args), &token).await?;

        OrchestrationResult::from_payload(payload).with_search_params(&args)
    }

    pub(crate) async fn flight_destinations(
        &self,
        args: FlightDestinationArgs,
    ) -> Result<OrchestrationResult, Error> {
        let token = self.token().await?;
        let request = ProviderRequest::get(endpoints::FLIGHT_DESTINATIONS)
            .query("origin", &args.origin)
            .query_opt("departureDate", args.departure_date.as_deref())
            .query("oneWay", args.one_way.to_string())
            .query("max", &args.max);

        let direct_error = match self.fetch(request, &token).await {
            Ok(payload) if !payload.is_empty() => {
                return OrchestrationResult::from_payload(payload).with_search_params(&args);
            }
            Ok(_) => {
                debug!("No inspiration results for {}, sampling popular destinations", args.origin);
                None
            }
            Err(error) => {
                warn!("Inspiration search failed for {}: {}", args.origin, error);
                Some(error)
            }
        };

        let departure = args.departure_date.clone().unwrap_or_else(|| date_in_days(30));
        let samples = POPULAR_DESTINATIONS
            .iter()
            .filter(|code| !code.eq_ignore_ascii_case(&args.origin))
            .take(INSPIRATION_SAMPLE_SIZE)
            .map(|code| self.sample_destination(&token, &args.origin, code, &departure));
        let records: Vec<Value> = join_all(samples).await.into_iter().flatten().collect();

        if records.is_empty() {
            return Err(direct_error
                .unwrap_or_else(|| Error::EmptyResult(format!("flight inspiration from {}", args.origin))));
        }

        OrchestrationResult::records(records)
            .with_message(format!("Sampled popular destinations from {}", args.origin))
            .with_search_params(&args)
    }

    /// Cheapest single offer to `destination`, or `None` if the lookup fails
    async fn sample_destination(
        &self,
        token: &AccessToken,
        origin: &str,
        destination: &str,
        departure: &str,
    ) -> Option<Value> {
        let request = ProviderRequest::get(endpoints::FLIGHT_OFFERS)
            .query("originLocationCode", origin)
            .query("destinationLocationCode", destination)
            .query("departureDate", departure)
            .query("adults", "1")
            .query("max", "1");

        match self.fetch(request, token).await {
            Ok(payload) => payload.records().into_iter().next().map(|offer| {
                json!({
                    "type": "flight-destination",
                    "origin": origin,
                    "destination": destination,
                    "departureDate": departure,
                    "price": offer.get("price").cloned().unwrap_or(Value::Null),
                    "sampleOffer": offer,
                })
            }),
            Err(error) => {
                debug!("Skipping sample {} -> {}: {}", origin, destination, error);
                None
            }
        }
    }

    pub(crate) async fn price_flight_offers(
        &self,
        args: FlightOffersArgs,
    ) -> Result<OrchestrationResult, Error> {
        if args.flight_offers.is_empty() {
            return Err(Error::InvalidParams("flightOffers must not be empty".to_string()));
        }
        let token = self.token().await?;
        let request = ProviderRequest::post(
            endpoints::FLIGHT_OFFERS_PRICING,
            offers_body(Some("flight-offers-pricing"), args.flight_offers),
        );
        let payload = self.fetch(request, &token).await?;

        Ok(OrchestrationResult::object(payload.data.unwrap_or(Value::Null)).with_meta(payload.meta))
    }

    pub(crate) async fn seatmaps(&self, args: FlightOffersArgs) -> Result<OrchestrationResult, Error> {
        if args.flight_offers.is_empty() {
            return Err(Error::InvalidParams("flightOffers must not be empty".to_string()));
        }
        let token = self.token().await?;
        let request = ProviderRequest::post(endpoints::SEATMAPS, offers_body(None, args.flight_offers));

        Ok(OrchestrationResult::from_payload(self.fetch(request, &token).await?))
    }
}
