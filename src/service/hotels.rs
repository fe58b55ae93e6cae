//! Hotel handlers
//!
//! City search runs a three-step [`FallbackChain`]:
//!
//! 1. hotel list by city code, then offers for the first five hotel ids;
//! 2. the city + dates offer search;
//! 3. resolve the city keyword to a geocode, list hotels around it, then offers.

use serde_json::Value;

use crate::errors::Error;
use crate::provider::{AccessToken, Provider, ProviderRequest, endpoints};

use super::args::{HotelDetailsArgs, HotelGeoSearchArgs, HotelSearchArgs};
use super::fallback::FallbackChain;
use super::{OrchestrationResult, TravelOrchestrator};

/// Hotel ids forwarded to the offers endpoint per lookup
pub const MAX_HOTEL_IDS: usize = 5;

pub const STEP_BY_CITY: &str = "hotel list by city";
pub const STEP_CITY_OFFERS: &str = "city offers";
pub const STEP_BY_KEYWORD: &str = "city keyword geocode";

/// Stay parameters forwarded to the offers endpoint
#[derive(Debug, Clone, Copy)]
pub(crate) struct Stay<'a> {
    pub check_in: Option<&'a str>,
    pub check_out: Option<&'a str>,
    pub adults: Option<&'a str>,
}

impl<'a> Stay<'a> {
    fn from_search(args: &'a HotelSearchArgs) -> Self {
        Self {
            check_in: Some(&args.check_in_date),
            check_out: Some(&args.check_out_date),
            adults: Some(&args.adults),
        }
    }
}

/// `hotelId` of each listed hotel, first `limit` only
pub(crate) fn hotel_ids(records: &[Value], limit: usize) -> Vec<String> {
    records
        .iter()
        .filter_map(|hotel| hotel.get("hotelId").and_then(Value::as_str))
        .take(limit)
        .map(str::to_string)
        .collect()
}

impl<P: Provider> TravelOrchestrator<P> {
    /// Offers for specific hotel ids
    pub(crate) async fn offers_for_ids(
        &self,
        token: &AccessToken,
        ids: &[String],
        stay: Stay<'_>,
    ) -> Result<Vec<Value>, Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let request = ProviderRequest::get(endpoints::HOTEL_OFFERS)
            .query("hotelIds", ids.join(","))
            .query_opt("checkInDate", stay.check_in)
            .query_opt("checkOutDate", stay.check_out)
            .query_opt("adults", stay.adults);

        Ok(self.fetch(request, token).await?.records())
    }

    /// Hotels listed for a city code, then their offers
    pub(crate) async fn offers_by_city_list(
        &self,
        token: &AccessToken,
        city_code: &str,
        limit: usize,
        stay: Stay<'_>,
    ) -> Result<Vec<Value>, Error> {
        let listing = self
            .fetch(ProviderRequest::get(endpoints::HOTELS_BY_CITY).query("cityCode", city_code), token)
            .await?;
        let ids = hotel_ids(&listing.records(), limit);
        if ids.is_empty() {
            return Err(Error::EmptyResult(format!("hotel list for {}", city_code)));
        }
        self.offers_for_ids(token, &ids, stay).await
    }

    async fn offers_by_city_and_dates(
        &self,
        token: &AccessToken,
        args: &HotelSearchArgs,
    ) -> Result<Vec<Value>, Error> {
        let request = ProviderRequest::get(endpoints::HOTEL_OFFERS_BY_CITY)
            .query("cityCode", &args.city_code)
            .query("checkInDate", &args.check_in_date)
            .query("checkOutDate", &args.check_out_date)
            .query("adults", &args.adults)
            .query("max", &args.max);

        Ok(self.fetch(request, token).await?.records())
    }

    async fn offers_near(
        &self,
        token: &AccessToken,
        latitude: &str,
        longitude: &str,
        radius: &str,
        stay: Stay<'_>,
    ) -> Result<Vec<Value>, Error> {
        let request = ProviderRequest::get(endpoints::HOTELS_BY_GEOCODE)
            .query("latitude", latitude)
            .query("longitude", longitude)
            .query("radius", radius)
            .query("radiusUnit", "KM");
        let ids = hotel_ids(&self.fetch(request, token).await?.records(), MAX_HOTEL_IDS);
        self.offers_for_ids(token, &ids, stay).await
    }

    async fn offers_by_city_keyword(
        &self,
        token: &AccessToken,
        args: &HotelSearchArgs,
    ) -> Result<Vec<Value>, Error> {
        let geo = self.resolve_city_geocode(token, &args.city_code).await?;
        self.offers_near(token, &geo.latitude, &geo.longitude, "5", Stay::from_search(args))
            .await
    }

    pub(crate) async fn hotel_offers(&self, args: HotelSearchArgs) -> Result<OrchestrationResult, Error> {
        let token = self.token().await?;
        let stay = Stay::from_search(&args);

        let outcome = FallbackChain::new("hotel search")
            .step(
                STEP_BY_CITY,
                Box::pin(self.offers_by_city_list(&token, &args.city_code, MAX_HOTEL_IDS, stay)),
            )
            .step(STEP_CITY_OFFERS, Box::pin(self.offers_by_city_and_dates(&token, &args)))
            .step(STEP_BY_KEYWORD, Box::pin(self.offers_by_city_keyword(&token, &args)))
            .run()
            .await?;

        OrchestrationResult::records(outcome.records)
            .with_meta(Some(serde_json::json!({ "source": outcome.label })))
            .with_search_params(&args)
    }

    pub(crate) async fn hotel_offers_near(
        &self,
        args: HotelGeoSearchArgs,
    ) -> Result<OrchestrationResult, Error> {
        let token = self.token().await?;
        let stay = Stay {
            check_in: Some(&args.check_in_date),
            check_out: Some(&args.check_out_date),
            adults: Some(&args.adults),
        };
        let records = self
            .offers_near(&token, &args.latitude, &args.longitude, &args.radius, stay)
            .await?;

        OrchestrationResult::records(records).with_search_params(&args)
    }

    pub(crate) async fn hotel_details(&self, args: HotelDetailsArgs) -> Result<OrchestrationResult, Error> {
        let token = self.token().await?;
        let stay = Stay {
            check_in: args.check_in_date.as_deref(),
            check_out: args.check_out_date.as_deref(),
            adults: args.adults.as_deref(),
        };
        let records = self
            .offers_for_ids(&token, std::slice::from_ref(&args.hotel_id), stay)
            .await?;

        OrchestrationResult::records(records).with_search_params(&args)
    }
}
