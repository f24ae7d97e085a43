//! Trip request and record types

use serde::{Deserialize, Serialize};
use tracing::debug;

use chrono::NaiveDate;
use tripstore::TripFact;

use super::failure::ProviderResult;
use super::id::generate_trip_id;

/// One trip-planning request, immutable once constructed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRequest {
    /// Destination city
    pub city: String,

    /// Trip date
    pub date: NaiveDate,

    /// Interest tags, non-empty, order preserved for prompt text
    pub interests: Vec<String>,

    /// Budget in the user's currency, positive
    pub budget: f64,
}

impl TripRequest {
    pub fn new(city: impl Into<String>, date: NaiveDate, interests: Vec<String>, budget: f64) -> Self {
        let city = city.into();
        debug!(%city, %date, %budget, "TripRequest::new: called");
        Self {
            city,
            date,
            interests,
            budget,
        }
    }
}

/// Weather section of a trip record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    /// Temperature in Celsius
    pub temperature_c: f64,
    /// Perceived temperature in Celsius
    pub feels_like_c: f64,
    /// Relative humidity percentage
    pub humidity_pct: u8,
    /// One-line condition description
    pub description: String,
}

/// One news headline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Headline {
    pub title: String,
    /// Empty when the upstream article carries no description
    pub description: String,
    pub url: String,
}

/// Route section of a trip record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    /// Total distance in meters
    pub distance_meters: f64,
    /// Total duration in seconds
    pub duration_seconds: f64,
    /// Ordered textual driving steps
    pub steps: Vec<String>,
}

/// The merged result of one planning call.
///
/// Built once by the aggregator and never mutated; a newer record replaces
/// the session's current trip rather than editing it. Individual sections
/// fail independently - an `Err` weather section does not invalidate the
/// record. The itinerary section being `Ok` is the minimum bar for the trip
/// to count as planned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    /// Unique per planning call
    pub trip_id: String,

    /// Owning user
    pub user_id: String,

    /// The request this record answers, echoed exactly
    pub request: TripRequest,

    /// Weather at the destination
    pub weather: ProviderResult<WeatherReport>,

    /// Up to five headlines, upstream order
    pub news: ProviderResult<Vec<Headline>>,

    /// Route from the configured origin to the destination
    pub route: ProviderResult<RouteSummary>,

    /// Generated itinerary text
    pub itinerary: ProviderResult<String>,

    /// Unix milliseconds, assigned when the itinerary outcome became known
    pub created_at: i64,
}

impl TripRecord {
    /// Assemble a record from the four provider outcomes.
    ///
    /// `created_at` is stamped by the caller at the moment the itinerary
    /// outcome resolved, which is why it is an argument rather than read
    /// from the clock here.
    pub fn assemble(
        user_id: impl Into<String>,
        request: TripRequest,
        weather: ProviderResult<WeatherReport>,
        news: ProviderResult<Vec<Headline>>,
        route: ProviderResult<RouteSummary>,
        itinerary: ProviderResult<String>,
        created_at: i64,
    ) -> Self {
        let user_id = user_id.into();
        let trip_id = generate_trip_id(&request.city);
        debug!(%trip_id, %user_id, "TripRecord::assemble: called");

        Self {
            trip_id,
            user_id,
            request,
            weather,
            news,
            route,
            itinerary,
            created_at,
        }
    }

    /// A trip is planned once its itinerary section succeeded
    pub fn is_planned(&self) -> bool {
        self.itinerary.is_ok()
    }

    /// Project this record into its persisted graph fact
    pub fn to_fact(&self) -> TripFact {
        TripFact {
            user_id: self.user_id.clone(),
            trip_id: self.trip_id.clone(),
            city: self.request.city.clone(),
            date: self.request.date,
            budget: self.request.budget,
            interests: self.request.interests.clone(),
            itinerary: self.itinerary.clone().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FailureKind, ProviderFailure, now_ms};

    fn request() -> TripRequest {
        TripRequest::new(
            "Rome",
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            vec!["Art".to_string(), "Food".to_string()],
            200.0,
        )
    }

    fn weather() -> WeatherReport {
        WeatherReport {
            temperature_c: 22.0,
            feels_like_c: 21.0,
            humidity_pct: 55,
            description: "clear sky".to_string(),
        }
    }

    // =========================================================================
    // Assembly
    // =========================================================================

    #[test]
    fn test_assemble_echoes_request_exactly() {
        let req = request();
        let record = TripRecord::assemble(
            "mia",
            req.clone(),
            Ok(weather()),
            Ok(vec![]),
            Err(ProviderFailure::timeout()),
            Ok("9am Colosseum...".to_string()),
            now_ms(),
        );

        assert_eq!(record.request, req);
        assert_eq!(record.user_id, "mia");
        assert!(record.trip_id.contains("-trip-rome"));
    }

    #[test]
    fn test_assemble_generates_unique_trip_ids() {
        let a = TripRecord::assemble(
            "mia",
            request(),
            Ok(weather()),
            Ok(vec![]),
            Err(ProviderFailure::timeout()),
            Ok("x".to_string()),
            now_ms(),
        );
        let b = TripRecord::assemble(
            "mia",
            request(),
            Ok(weather()),
            Ok(vec![]),
            Err(ProviderFailure::timeout()),
            Ok("x".to_string()),
            now_ms(),
        );
        assert_ne!(a.trip_id, b.trip_id);
    }

    #[test]
    fn test_created_at_comes_from_caller() {
        let record = TripRecord::assemble(
            "mia",
            request(),
            Ok(weather()),
            Ok(vec![]),
            Ok(RouteSummary {
                distance_meters: 1000.0,
                duration_seconds: 60.0,
                steps: vec![],
            }),
            Ok("x".to_string()),
            42,
        );
        assert_eq!(record.created_at, 42);
    }

    // =========================================================================
    // Predicates & Projection
    // =========================================================================

    #[test]
    fn test_is_planned_tracks_itinerary_only() {
        let planned = TripRecord::assemble(
            "mia",
            request(),
            Err(ProviderFailure::timeout()),
            Err(ProviderFailure::timeout()),
            Err(ProviderFailure::timeout()),
            Ok("9am Colosseum...".to_string()),
            now_ms(),
        );
        assert!(planned.is_planned());

        let degraded = TripRecord::assemble(
            "mia",
            request(),
            Ok(weather()),
            Ok(vec![]),
            Err(ProviderFailure::timeout()),
            Err(ProviderFailure::generation_refused("503")),
            now_ms(),
        );
        assert!(!degraded.is_planned());
    }

    #[test]
    fn test_to_fact_maps_scalar_fields() {
        let record = TripRecord::assemble(
            "mia",
            request(),
            Ok(weather()),
            Ok(vec![]),
            Err(ProviderFailure::timeout()),
            Ok("9am Colosseum...".to_string()),
            now_ms(),
        );

        let fact = record.to_fact();
        assert_eq!(fact.user_id, "mia");
        assert_eq!(fact.trip_id, record.trip_id);
        assert_eq!(fact.city, "Rome");
        assert_eq!(fact.budget, 200.0);
        assert_eq!(fact.interests, vec!["Art", "Food"]);
        assert_eq!(fact.itinerary, "9am Colosseum...");
    }

    #[test]
    fn test_to_fact_empty_itinerary_when_generation_failed() {
        let record = TripRecord::assemble(
            "mia",
            request(),
            Ok(weather()),
            Ok(vec![]),
            Err(ProviderFailure::timeout()),
            Err(ProviderFailure::generation_timeout("no answer")),
            now_ms(),
        );
        assert_eq!(record.to_fact().itinerary, "");
    }

    #[test]
    fn test_record_serde_round_trip() {
        let record = TripRecord::assemble(
            "mia",
            request(),
            Ok(weather()),
            Ok(vec![Headline {
                title: "t".to_string(),
                description: "d".to_string(),
                url: "u".to_string(),
            }]),
            Err(ProviderFailure::new(FailureKind::UpstreamUnavailable, "down")),
            Ok("9am Colosseum...".to_string()),
            now_ms(),
        );

        let json = serde_json::to_string(&record).unwrap();
        let back: TripRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
