use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::time::sleep;
use tracing::{debug, info};
use tripflow_core::{AgentError, AgentRuntime, AgentSpec, JobResult};

/// Deterministic agent runtime for the vacation-planning roles.
///
/// Produces canned results derived from the brief, with a small simulated
/// latency per invocation. Intended for the demo workflow and tests; a
/// provider-backed runtime implements the same [`AgentRuntime`] trait.
pub struct ScriptedRuntime {
    latency: Duration,
}

impl ScriptedRuntime {
    pub fn new() -> Self {
        Self {
            latency: Duration::from_millis(25),
        }
    }

    /// Zero-latency variant for tests.
    pub fn instant() -> Self {
        Self {
            latency: Duration::ZERO,
        }
    }
}

impl Default for ScriptedRuntime {
    fn default() -> Self {
        Self::new()
    }
}

/// Brief fields the scripted agents read, with defaults for absent keys.
struct Brief {
    destination: String,
    nights: u64,
    travelers: u64,
}

impl Brief {
    fn from_input(input: &Value) -> Self {
        let brief = &input["brief"];
        Self {
            destination: brief["destination"]
                .as_str()
                .unwrap_or("your destination")
                .to_string(),
            nights: brief["nights"].as_u64().unwrap_or(3),
            travelers: brief["travelers"].as_u64().unwrap_or(2),
        }
    }
}

#[async_trait]
impl AgentRuntime for ScriptedRuntime {
    async fn invoke(&self, agent: &AgentSpec, input: &str) -> Result<JobResult, AgentError> {
        let parsed: Value = serde_json::from_str(input)
            .map_err(|err| AgentError::Provider(format!("invalid input payload: {err}")))?;
        let brief = Brief::from_input(&parsed);

        if !self.latency.is_zero() {
            sleep(self.latency).await;
        }

        debug!(agent = %agent.id, role = %agent.role, "scripted agent invoked");

        let result = match agent.role.as_str() {
            "goals" => JobResult::structured(json!({
                "goals": [
                    format!("Unwind for {} nights in {}", brief.nights, brief.destination),
                    "Balance downtime with one signature excursion".to_string(),
                    format!("Keep the pace comfortable for {} travelers", brief.travelers),
                ],
                "travelStyle": "relaxed"
            })),
            "destinations" => JobResult::structured(json!({
                "suggestions": [
                    { "city": brief.destination, "match": "requested in brief" },
                    { "city": "St. Petersburg", "match": "nearby alternative with similar weather" },
                    { "city": "Clearwater", "match": "quieter beaches, short drive" }
                ]
            })),
            "research" => JobResult::text(format!(
                "{} is mild this season with occasional afternoon showers. Book \
outdoor activities for mornings; museums and markets fill the afternoons. \
Local transit covers the waterfront, but day trips need a car.",
                brief.destination
            )),
            "lodging" => JobResult::structured(json!({
                "options": [
                    { "name": "Harborview Suites", "area": "waterfront", "perNight": 180 },
                    { "name": "Garden District Inn", "area": "old town", "perNight": 135 },
                    { "name": "Palm Court Apartments", "area": "midtown", "perNight": 110 }
                ]
            })),
            "transport" => JobResult::structured(json!({
                "arrival": "Direct flights land before noon on most carriers",
                "local": ["airport shuttle", "waterfront streetcar", "rideshare"],
                "dayTrips": "compact rental car recommended"
            })),
            "activities" => JobResult::structured(json!({
                "activities": [
                    "Sunrise kayak tour of the mangroves",
                    "Historic district walking tour",
                    "Afternoon at the aquarium",
                    "Sunset sail from the marina"
                ]
            })),
            "dining" => JobResult::structured(json!({
                "restaurants": [
                    { "name": "La Marea", "cuisine": "coastal", "price": "$$" },
                    { "name": "Citrus & Thyme", "cuisine": "farm-to-table", "price": "$$$" },
                    { "name": "The Night Market", "cuisine": "street food", "price": "$" }
                ]
            })),
            "budget" => {
                let lodging = 135 * brief.nights;
                let dining = 60 * brief.nights * brief.travelers;
                let activities = 45 * brief.nights;
                let transport = 160 * brief.travelers;
                JobResult::structured(json!({
                    "currency": "USD",
                    "lodging": lodging,
                    "dining": dining,
                    "activities": activities,
                    "transport": transport,
                    "total": lodging + dining + activities + transport
                }))
            }
            "itinerary" => {
                let mut days = String::new();
                for day in 1..=brief.nights {
                    days.push_str(&format!(
                        "Day {day}: morning excursion, free afternoon, dinner reservation.\n"
                    ));
                }
                JobResult::text(format!(
                    "Itinerary for {} ({} nights):\n{days}Final day: checkout and departure.",
                    brief.destination, brief.nights
                ))
            }
            "review" => JobResult::text(
                "The plan holds together: pacing is realistic, the budget covers \
every named activity, and nothing is double-booked. Approved as drafted."
                    .to_string(),
            ),
            other => {
                return Err(AgentError::Provider(format!(
                    "no scripted behavior for role '{other}'"
                )));
            }
        };

        info!(agent = %agent.id, role = %agent.role, "scripted agent produced result");
        Ok(result)
    }
}
