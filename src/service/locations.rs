//! Reference-data handlers: airports, cities and points of interest.

use serde_json::Value;

use crate::errors::Error;
use crate::provider::{AccessToken, Provider, ProviderRequest, endpoints};

use super::args::{LocationSearchArgs, PoiSearchArgs};
use super::{OrchestrationResult, TravelOrchestrator};

/// Coordinates of a resolved city, kept as the strings the provider expects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoCode {
    pub latitude: String,
    pub longitude: String,
}

impl GeoCode {
    /// Read a `geoCode` object from a location record
    pub fn from_record(record: &Value) -> Option<Self> {
        let geo = record.get("geoCode")?;
        Some(Self {
            latitude: coordinate(geo.get("latitude")?)?,
            longitude: coordinate(geo.get("longitude")?)?,
        })
    }
}

fn coordinate(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

impl<P: Provider> TravelOrchestrator<P> {
    /// Resolve a city code or name to coordinates via the CITY locations search
    pub(crate) async fn resolve_city_geocode(
        &self,
        token: &AccessToken,
        city: &str,
    ) -> Result<GeoCode, Error> {
        let request = ProviderRequest::get(endpoints::LOCATIONS)
            .query("subType", "CITY")
            .query("keyword", city);
        let records = self.fetch(request, token).await?.records();

        // Prefer the record whose IATA code matches exactly
        records
            .iter()
            .find(|r| r.get("iataCode").and_then(Value::as_str) == Some(city))
            .or_else(|| records.first())
            .and_then(GeoCode::from_record)
            .ok_or_else(|| Error::EmptyResult(format!("coordinates for {}", city)))
    }

    pub(crate) async fn airports(&self, args: LocationSearchArgs) -> Result<OrchestrationResult, Error> {
        let token = self.token().await?;
        let request = ProviderRequest::get(endpoints::LOCATIONS)
            .query("subType", "AIRPORT")
            .query("keyword", &args.keyword)
            .query_opt("countryCode", args.country_code.as_deref())
            .query("page[limit]", &args.max);

        OrchestrationResult::from_payload(self.fetch(request, &token).await?).with_search_params(&args)
    }

    pub(crate) async fn cities(&self, args: LocationSearchArgs) -> Result<OrchestrationResult, Error> {
        let token = self.token().await?;
        let request = ProviderRequest::get(endpoints::CITIES)
            .query("keyword", &args.keyword)
            .query_opt("countryCode", args.country_code.as_deref())
            .query("max", &args.max);

        let payload = self
            .city_retry
            .run("city search", || self.fetch(request.clone(), &token))
            .await?;

        OrchestrationResult::from_payload(payload).with_search_params(&args)
    }

    pub(crate) async fn nearby_points(
        &self,
        token: &AccessToken,
        city_code: &str,
        categories: &[String],
        radius: &str,
        max: &str,
    ) -> Result<Vec<Value>, Error> {
        let geo = self.resolve_city_geocode(token, city_code).await?;
        let categories = (!categories.is_empty()).then(|| categories.join(","));
        let request = ProviderRequest::get(endpoints::POINTS_OF_INTEREST)
            .query("latitude", geo.latitude)
            .query("longitude", geo.longitude)
            .query("radius", radius)
            .query_opt("categories", categories)
            .query("page[limit]", max);

        Ok(self.fetch(request, token).await?.records())
    }

    pub(crate) async fn points_of_interest(
        &self,
        args: PoiSearchArgs,
    ) -> Result<OrchestrationResult, Error> {
        let token = self.token().await?;
        let records = self
            .nearby_points(&token, &args.city_code, &args.categories, &args.radius, &args.max)
            .await?;

        OrchestrationResult::records(records).with_search_params(&args)
    }
}
