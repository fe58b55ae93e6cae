//! Response Formatter
//!
//! Turns a dispatched [`ToolResponse`] into MCP text content. Machine-facing
//! tools get the pretty-printed result envelope with field order preserved;
//! summary renderers and the two prose tools produce human-readable text.

use serde_json::Value;

use crate::errors::Error;
use crate::service::OrchestrationResult;
use crate::tools::{OutputFormat, ResponseStyle, ToolResponse};
use crate::types::tools::CallToolResult;

/// Render a successful tool response
pub fn render(response: &ToolResponse) -> CallToolResult {
    let result = &response.result;
    let text = match response.style {
        _ if result.mock => json_block(result),
        ResponseStyle::Json => json_block(result),
        ResponseStyle::Summary(renderer) if response.format == OutputFormat::Text => renderer(result),
        ResponseStyle::Summary(_) => json_block(result),
        ResponseStyle::Prose(renderer) => renderer(result),
    };
    CallToolResult::text(text)
}

/// Error content for a failed call
pub fn error_result(error: &Error) -> CallToolResult {
    CallToolResult::error(format!("Error: {}", error))
}

/// The whole envelope as indented JSON
pub fn json_block(result: &OrchestrationResult) -> String {
    serde_json::to_string_pretty(result).unwrap_or_else(|e| format!("Error: {}", e))
}

//=============================================================================
// Field access
//=============================================================================

/// String or number at a JSON pointer, as text
fn text_at(value: &Value, pointer: &str) -> Option<String> {
    match value.pointer(pointer)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn text_or(value: &Value, pointer: &str, fallback: &str) -> String {
    text_at(value, pointer).unwrap_or_else(|| fallback.to_string())
}

fn param<'a>(result: &'a OrchestrationResult, key: &str, fallback: &'a str) -> &'a str {
    result.search_param(key).unwrap_or(fallback)
}

fn listing(header: String, entries: Vec<String>) -> String {
    format!("{}:\n\n{}", header, entries.join("\n\n"))
}

fn list_items(items: Option<&Value>) -> Vec<&str> {
    items
        .and_then(Value::as_array)
        .map(|values| values.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

//=============================================================================
// Summary renderers
//=============================================================================

fn flight_line(flight: &Value) -> String {
    format!(
        "{}{}",
        text_or(flight, "/itineraries/0/segments/0/carrierCode", ""),
        text_or(flight, "/itineraries/0/segments/0/number", "")
    )
}

pub fn flights_summary(result: &OrchestrationResult) -> String {
    let flights = result.data_records();
    let entries = flights
        .iter()
        .map(|flight| {
            let stops = flight
                .pointer("/itineraries/0/segments")
                .and_then(Value::as_array)
                .map(|segments| segments.len().saturating_sub(1))
                .unwrap_or(0);
            format!(
                "✈️ {} - {} → {}\n   💰 {} {} | ⏱️ {} | 🛑 {} stops",
                flight_line(flight),
                text_or(flight, "/itineraries/0/segments/0/departure/iataCode", "?"),
                text_or(flight, "/itineraries/0/segments/0/arrival/iataCode", "?"),
                text_or(flight, "/price/total", "?"),
                text_or(flight, "/price/currency", ""),
                text_or(flight, "/itineraries/0/duration", "N/A"),
                stops
            )
        })
        .collect();

    listing(
        format!(
            "Found {} flights from {} to {}",
            flights.len(),
            param(result, "origin", "?"),
            param(result, "destination", "?")
        ),
        entries,
    )
}

pub fn destinations_summary(result: &OrchestrationResult) -> String {
    let destinations = result.data_records();
    let default_currency = result
        .meta
        .as_ref()
        .and_then(|meta| text_at(meta, "/currency"));

    let entries = destinations
        .iter()
        .map(|d| {
            let mut line = format!(
                "🌍 {} | 📅 {}",
                text_or(d, "/destination", "?"),
                text_or(d, "/departureDate", "?")
            );
            if let Some(ret) = text_at(d, "/returnDate") {
                line.push_str(&format!(" - {}", ret));
            }
            if let Some(price) = text_at(d, "/price/total") {
                let currency = text_at(d, "/price/currency")
                    .or_else(|| default_currency.clone())
                    .unwrap_or_default();
                line.push_str(&format!(" | 💰 {} {}", price, currency));
            }
            line
        })
        .collect::<Vec<_>>();

    format!(
        "Found {} destinations from {}:\n\n{}",
        destinations.len(),
        param(result, "origin", "?"),
        entries.join("\n")
    )
}

pub fn hotels_summary(result: &OrchestrationResult) -> String {
    let hotels = result.data_records();
    let entries = hotels
        .iter()
        .map(|record| {
            let hotel = record.get("hotel").unwrap_or(record);
            format!(
                "🏨 {} ({}⭐)\n   📍 {}, {}",
                text_or(hotel, "/name", "Unknown Hotel"),
                text_or(hotel, "/rating", "N/A"),
                text_or(hotel, "/address/cityName", "Unknown City"),
                text_or(hotel, "/address/countryCode", "Unknown Country")
            )
        })
        .collect();

    let place = result
        .search_param("cityCode")
        .map(str::to_string)
        .or_else(|| {
            Some(format!(
                "{},{}",
                result.search_param("latitude")?,
                result.search_param("longitude")?
            ))
        })
        .unwrap_or_else(|| "the requested area".to_string());

    listing(format!("Found {} hotels in {}", hotels.len(), place), entries)
}

pub fn airports_summary(result: &OrchestrationResult) -> String {
    let airports = result.data_records();
    let entries = airports
        .iter()
        .map(|a| {
            format!(
                "✈️ {} - {}\n   📍 {}, {}",
                text_or(a, "/iataCode", "?"),
                text_or(a, "/name", "Unknown"),
                text_or(a, "/address/cityName", "Unknown City"),
                text_or(a, "/address/countryName", "Unknown Country")
            )
        })
        .collect();

    listing(
        format!("Found {} airports for \"{}\"", airports.len(), param(result, "keyword", "")),
        entries,
    )
}

pub fn cities_summary(result: &OrchestrationResult) -> String {
    let cities = result.data_records();
    let entries = cities
        .iter()
        .map(|c| {
            let mut line = format!(
                "🏙️ {} - {}\n   📍 {}",
                text_or(c, "/iataCode", "?"),
                text_or(c, "/name", "Unknown"),
                text_or(c, "/address/countryCode", "Unknown Country")
            );
            if let Some(region) = text_at(c, "/address/stateCode") {
                line.push_str(&format!(", {}", region));
            }
            line
        })
        .collect();

    listing(
        format!("Found {} cities for \"{}\"", cities.len(), param(result, "keyword", "")),
        entries,
    )
}

pub fn points_of_interest_summary(result: &OrchestrationResult) -> String {
    let pois = result.data_records();
    let entries = pois
        .iter()
        .map(|p| {
            let mut entry = format!(
                "🎯 {} ({})",
                text_or(p, "/name", "Unknown"),
                text_or(p, "/category", "N/A")
            );
            let street = [text_at(p, "/address/streetNumber"), text_at(p, "/address/streetName")]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" ");
            let location = [Some(street).filter(|s| !s.is_empty()), text_at(p, "/address/cityName")]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>();
            if !location.is_empty() {
                entry.push_str(&format!("\n   📍 {}", location.join(", ")));
            }
            if let Some(distance) = text_at(p, "/distance/value").or_else(|| text_at(p, "/distance")) {
                entry.push_str(&format!("\n   📏 {}km away", distance));
            }
            entry
        })
        .collect();

    listing(
        format!(
            "Found {} points of interest in {}",
            pois.len(),
            param(result, "cityCode", "?")
        ),
        entries,
    )
}

pub fn car_rentals_summary(result: &OrchestrationResult) -> String {
    let cars = result.data_records();
    let entries = cars
        .iter()
        .map(|c| {
            let price = match text_at(c, "/rate/totalAmount") {
                Some(amount) => format!("{} {}", amount, text_or(c, "/rate/currencyCode", "")),
                None => "Price not available".to_string(),
            };
            format!(
                "🚗 {} - {} ({})\n   💰 {}",
                text_or(c, "/carInfo/companyName", "Unknown Company"),
                text_or(c, "/carInfo/model", "Unknown Model"),
                text_or(c, "/carInfo/type", "Unknown Type"),
                price.trim_end()
            )
        })
        .collect();

    listing(
        format!(
            "Found {} car rental options in {}",
            cars.len(),
            param(result, "cityCode", "?")
        ),
        entries,
    )
}

//=============================================================================
// Prose renderers
//=============================================================================

pub fn trip_plan(result: &OrchestrationResult) -> String {
    let plan = &result.data;
    let mut text = format!(
        "🗺️ **Trip Plan: {} → {}**\n\n",
        text_or(plan, "/origin", "?"),
        text_or(plan, "/destination", "?")
    );
    text.push_str(&format!(
        "📅 **Dates:** {} to {}\n",
        text_or(plan, "/departureDate", "?"),
        text_or(plan, "/returnDate", "?")
    ));
    text.push_str(&format!("👥 **Travelers:** {} adults\n", text_or(plan, "/travelers", "2")));
    if let Some(budget) = text_at(plan, "/budget") {
        text.push_str(&format!("💰 **Budget:** {}\n", budget));
    }
    let interests = list_items(plan.get("interests"));
    if !interests.is_empty() {
        text.push_str(&format!("🎯 **Interests:** {}\n", interests.join(", ")));
    }

    let section = |text: &mut String, title: &str, key: &str, line: &dyn Fn(&Value) -> String| {
        let records = plan.get(key).and_then(Value::as_array).filter(|r| !r.is_empty());
        if let Some(records) = records {
            text.push_str(&format!("\n{}\n", title));
            for (index, record) in records.iter().enumerate() {
                text.push_str(&format!("{}. {}\n", index + 1, line(record)));
            }
        }
    };

    section(&mut text, "✈️ **Flight Options:**", "flights", &|f| {
        format!(
            "{} - {} {}",
            flight_line(f),
            text_or(f, "/price/total", "?"),
            text_or(f, "/price/currency", "")
        )
    });
    section(&mut text, "🏨 **Hotel Options:**", "hotels", &|h| {
        text_at(h, "/hotel/name")
            .or_else(|| text_at(h, "/name"))
            .unwrap_or_else(|| "Unknown Hotel".to_string())
    });
    section(&mut text, "🎯 **Recommended Activities:**", "activities", &|p| {
        format!("{} ({})", text_or(p, "/name", "Unknown"), text_or(p, "/category", "N/A"))
    });

    if let Some(message) = &result.message {
        text.push_str(&format!("\nℹ️ {}\n", message));
    }
    text
}

pub fn recommendations(result: &OrchestrationResult) -> String {
    let rec = &result.data;
    let mut text = format!("Travel recommendations for {}:\n\n", text_or(rec, "/destination", "?"));

    let interests = list_items(rec.get("interests"));
    if !interests.is_empty() {
        text.push_str(&format!("Based on your interests: {}\n\n", interests.join(", ")));
    }
    if let Some(budget) = text_at(rec, "/budget") {
        text.push_str(&format!("Budget level: {}\n\n", budget));
    }
    if let Some(duration) = text_at(rec, "/duration") {
        text.push_str(&format!("Trip duration: {}\n\n", duration));
    }

    let bullets = |key: &str| {
        list_items(rec.get(key))
            .iter()
            .map(|item| format!("   • {}", item))
            .collect::<Vec<_>>()
            .join("\n")
    };
    text.push_str(&format!("🎯 Suggested Activities:\n{}\n\n", bullets("activities")));
    text.push_str(&format!("💡 Travel Tips:\n{}", bullets("tips")));
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(result: OrchestrationResult, style: ResponseStyle, format: OutputFormat) -> ToolResponse {
        ToolResponse {
            tool: "test".to_string(),
            result,
            style,
            format,
        }
    }

    fn flight(carrier: &str, number: &str, total: &str, segments: usize) -> Value {
        let segment = json!({
            "carrierCode": carrier,
            "number": number,
            "departure": { "iataCode": "JFK", "at": "2025-12-15T08:00:00" },
            "arrival": { "iataCode": "LAX", "at": "2025-12-15T11:30:00" }
        });
        json!({
            "id": "1",
            "itineraries": [{ "duration": "PT6H30M", "segments": vec![segment; segments] }],
            "price": { "total": total, "currency": "USD" }
        })
    }

    #[test]
    fn test_json_block_preserves_field_order() {
        let result = OrchestrationResult::records(vec![json!({ "zeta": 1, "alpha": 2 })]);
        let text = json_block(&result);

        assert!(text.find("\"zeta\"").unwrap() < text.find("\"alpha\"").unwrap());
        assert!(text.find("\"success\"").unwrap() < text.find("\"data\"").unwrap());
    }

    #[test]
    fn test_summary_only_when_text_requested() {
        let result = OrchestrationResult::records(vec![flight("AA", "100", "120.00", 1)])
            .with_search_params(&json!({ "origin": "NYC", "destination": "LAX" }))
            .unwrap();

        let as_json = render(&response(
            result.clone(),
            ResponseStyle::Summary(flights_summary),
            OutputFormat::Json,
        ));
        assert!(as_json.joined_text().starts_with('{'));

        let as_text = render(&response(result, ResponseStyle::Summary(flights_summary), OutputFormat::Text));
        assert_eq!(
            as_text.joined_text(),
            "Found 1 flights from NYC to LAX:\n\n✈️ AA100 - JFK → LAX\n   💰 120.00 USD | ⏱️ PT6H30M | 🛑 0 stops"
        );
    }

    #[test]
    fn test_mock_results_always_render_as_json() {
        let mut result = OrchestrationResult::records(vec![json!({ "method": "createTripPlan" })]);
        result.mock = true;

        let content = render(&response(result, ResponseStyle::Prose(trip_plan), OutputFormat::Json));
        assert!(content.joined_text().contains("\"method\": \"createTripPlan\""));
        assert!(!content.is_error);
    }

    #[test]
    fn test_stops_count_connecting_segments() {
        let result = OrchestrationResult::records(vec![flight("BA", "7", "450.10", 3)]);
        assert!(flights_summary(&result).ends_with("🛑 2 stops"));
    }

    #[test]
    fn test_hotel_summary_defaults() {
        let result = OrchestrationResult::records(vec![json!({ "hotel": { "name": "Le Marais" } })])
            .with_search_params(&json!({ "cityCode": "PAR" }))
            .unwrap();
        assert_eq!(
            hotels_summary(&result),
            "Found 1 hotels in PAR:\n\n🏨 Le Marais (N/A⭐)\n   📍 Unknown City, Unknown Country"
        );
    }

    #[test]
    fn test_car_without_rate() {
        let result = OrchestrationResult::records(vec![json!({
            "carInfo": { "companyName": "Hertz", "model": "Clio", "type": "ECONOMY" }
        })])
        .with_search_params(&json!({ "cityCode": "NCE" }))
        .unwrap();
        assert!(car_rentals_summary(&result).ends_with("🚗 Hertz - Clio (ECONOMY)\n   💰 Price not available"));
    }

    #[test]
    fn test_trip_plan_prose() {
        let result = OrchestrationResult::object(json!({
            "origin": "NYC",
            "destination": "PAR",
            "departureDate": "2025-05-01",
            "returnDate": "2025-05-08",
            "travelers": "2",
            "budget": "mid-range",
            "interests": ["art", "food"],
            "flights": [flight("AF", "7", "640.00", 1)],
            "hotels": [{ "hotel": { "name": "Hotel Lutetia" } }],
            "activities": []
        }));

        insta::assert_snapshot!(trip_plan(&result).trim_end(), @r"
        🗺️ **Trip Plan: NYC → PAR**

        📅 **Dates:** 2025-05-01 to 2025-05-08
        👥 **Travelers:** 2 adults
        💰 **Budget:** mid-range
        🎯 **Interests:** art, food

        ✈️ **Flight Options:**
        1. AF7 - 640.00 USD

        🏨 **Hotel Options:**
        1. Hotel Lutetia
        ");
    }

    #[test]
    fn test_recommendations_prose() {
        let result = OrchestrationResult::object(json!({
            "destination": "Atlantis",
            "curated": false,
            "budget": "luxury",
            "activities": ["Try authentic local cuisine"],
            "tips": ["Learn basic local phrases"]
        }));

        assert_eq!(
            recommendations(&result),
            "Travel recommendations for Atlantis:\n\nBudget level: luxury\n\n🎯 Suggested Activities:\n   • Try authentic local cuisine\n\n💡 Travel Tips:\n   • Learn basic local phrases"
        );
    }

    #[test]
    fn test_error_result() {
        let content = error_result(&Error::UnknownTool("book_flight".into()));
        assert!(content.is_error);
        assert_eq!(content.joined_text(), "Error: Unknown tool: book_flight");
    }
}
