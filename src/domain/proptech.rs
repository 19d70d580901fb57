//! Property management vertical
//!
//! Domain record stores and tools for the property assistant: rental
//! availability, visit calendars, visit booking, and property details.
//! The stores are lock-guarded and shared by reference into the tool
//! handlers; scheduling a visit is a single check-then-append critical
//! section under the store lock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::agent::{Orchestrator, Supervisor, Worker};
use crate::core::{Config, ToolDefinition};
use crate::gateway::ChatGateway;
use crate::tools::ToolRegistry;

/// Name the supervisor routes property requests to
pub const PROPERTY_AGENT: &str = "property_agent";

/// Persona for the property worker
const PROPERTY_PERSONA: &str = "\
Act as a helpful assistant for property management that will guide leads through \
the property details, availability, calendar and visits schedule. \
Don't ask for the property id if it was already given in the conversation. \
Answer always in spanish. Never answer using tags like <user> or <assistant> or \
anything like that. \
Don't answer about the properties with your own knowledge, only answer with the \
data provided by the tools.

Conditions to call the tools:
- Call the tools only if you don't have the information to answer the user.
- Call the tools with the exact parameters needed to answer the user.
- When users ask about a property, first check if the property is available for \
rent. If the property is not available, inform the user and don't call any tool.
- If the property is available, call check_property_calendar to get the available \
dates and times for a visit.
- Call set_property_visit with the date and time provided by the user. If the date \
and time was not provided, don't call this tool, instead call check_property_calendar.
- Don't call set_property_visit if the property is not available.";

/// Details of one property listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyDetails {
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub owner: String,
    pub price: String,
    pub description: String,
    pub amenities: Vec<String>,
}

/// Outcome of a visit booking attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisitOutcome {
    /// The visit was recorded
    Booked,
    /// The requested slot is not in the property's calendar
    SlotUnavailable(Vec<String>),
    /// No property with that id
    UnknownProperty,
}

#[derive(Debug, Default)]
struct PropertyData {
    availability: HashMap<String, String>,
    calendar: HashMap<String, Vec<String>>,
    visits: HashMap<String, Vec<String>>,
    details: HashMap<String, PropertyDetails>,
}

/// Lock-guarded store of property records
///
/// Mutated only through tool handler calls; the single lock serializes
/// concurrent handlers so check-then-write sequences never lose updates.
#[derive(Default)]
pub struct PropertyStore {
    inner: Mutex<PropertyData>,
}

impl PropertyStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with the demonstration data set
    pub fn seeded() -> Self {
        let store = Self::new();
        {
            let mut data = store.inner.lock().unwrap();

            for (id, status) in [("123", "available"), ("456", "unavailable"), ("789", "available")]
            {
                data.availability.insert(id.to_string(), status.to_string());
            }

            let slots = |times: &[&str]| times.iter().map(|t| t.to_string()).collect::<Vec<_>>();
            data.calendar
                .insert("123".into(), slots(&["2024-10-30 10:00", "2024-10-31 11:00"]));
            data.calendar.insert(
                "456".into(),
                slots(&["2024-10-30 14:00", "2024-10-31 15:00", "2024-11-01 16:00"]),
            );
            data.calendar
                .insert("789".into(), slots(&["2024-10-30 10:00", "2024-10-31 11:00"]));

            // Booked visits start out mirroring the calendar seeds
            data.visits = data.calendar.clone();

            data.details.insert(
                "123".into(),
                PropertyDetails {
                    address: "Usaquen".into(),
                    city: "Bogota".into(),
                    state: "Colombia".into(),
                    zip: "12345".into(),
                    owner: "John Doe".into(),
                    price: "$1000".into(),
                    description: "A nice house with a garden".into(),
                    amenities: vec!["wifi".into(), "tv".into(), "pool".into(), "parking".into()],
                },
            );
            data.details.insert(
                "456".into(),
                PropertyDetails {
                    address: "Mapocho".into(),
                    city: "Santiago".into(),
                    state: "Chile".into(),
                    zip: "67890".into(),
                    owner: "Juan Perez".into(),
                    price: "$1500".into(),
                    description: "A nice apartment with a view to the park".into(),
                    amenities: vec!["wifi".into(), "tv".into(), "gym".into()],
                },
            );
            data.details.insert(
                "789".into(),
                PropertyDetails {
                    address: "Riomar".into(),
                    city: "Barranquilla".into(),
                    state: "Colombia".into(),
                    zip: "84736".into(),
                    owner: "Maria Gomez".into(),
                    price: "$1200".into(),
                    description: "A nice apartment with a pool".into(),
                    amenities: vec!["wifi".into(), "tv".into(), "pool".into()],
                },
            );
        }
        store
    }

    /// Rental availability status for a property
    pub fn availability(&self, id: &str) -> Option<String> {
        self.inner.lock().unwrap().availability.get(id).cloned()
    }

    /// Visit calendar (legal slots) for a property
    pub fn calendar(&self, id: &str) -> Option<Vec<String>> {
        self.inner.lock().unwrap().calendar.get(id).cloned()
    }

    /// Booked visits for a property
    pub fn visits(&self, id: &str) -> Option<Vec<String>> {
        self.inner.lock().unwrap().visits.get(id).cloned()
    }

    /// Details for a property
    pub fn details(&self, id: &str) -> Option<PropertyDetails> {
        self.inner.lock().unwrap().details.get(id).cloned()
    }

    /// Book a visit: check the calendar and append to the visit record
    /// in one critical section
    pub fn schedule_visit(&self, id: &str, date_time: &str) -> VisitOutcome {
        let mut data = self.inner.lock().unwrap();

        if !data.visits.contains_key(id) {
            return VisitOutcome::UnknownProperty;
        }

        let calendar = data.calendar.get(id).cloned().unwrap_or_default();
        if !calendar.iter().any(|slot| slot == date_time) {
            return VisitOutcome::SlotUnavailable(calendar);
        }

        if let Some(visits) = data.visits.get_mut(id) {
            visits.push(date_time.to_string());
        }
        VisitOutcome::Booked
    }
}

/// Schema shared by the availability, calendar and details tools
fn property_id_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "id": {
                "type": "string",
                "description": "The id of the property to check availability, calendar or details"
            }
        },
        "required": ["id"]
    })
}

/// Build the property tool registry over a shared store
///
/// Every tool is direct-return: each performs a single authoritative
/// lookup or mutation whose result is the answer.
pub fn registry(store: Arc<PropertyStore>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    let lookup = Arc::clone(&store);
    registry.register(
        ToolDefinition::function(
            "check_property_availability",
            "Check if a property is available or unavailable for rent.",
            property_id_schema(),
        ),
        true,
        move |call| {
            let id = call.get_string("id").unwrap_or_default();
            match lookup.availability(&id) {
                Some(status) => format!("The property with id {} is {}", id, status),
                None => format!("The property with id {} was not found", id),
            }
        },
    );

    let calendar = Arc::clone(&store);
    registry.register(
        ToolDefinition::function(
            "check_property_calendar",
            "Check the calendar available dates and times for a visit to a property. \
             Give information needed to schedule a visit.",
            property_id_schema(),
        ),
        true,
        move |call| {
            let id = call.get_string("id").unwrap_or_default();
            match calendar.calendar(&id) {
                Some(slots) => format!(
                    "The property with id {} has the following calendar for a visit: {:?}",
                    id, slots
                ),
                None => format!("The property with id {} was not found", id),
            }
        },
    );

    let visits = Arc::clone(&store);
    registry.register(
        ToolDefinition::function(
            "set_property_visit",
            "Schedule a visit to a property when user provides a date and time.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "id": {
                        "type": "string",
                        "description": "The id of the property to set a visit"
                    },
                    "date_time": {
                        "type": "string",
                        "description": "The date and time to set a visit"
                    }
                },
                "required": ["id", "date_time"]
            }),
        ),
        true,
        move |call| {
            let id = call.get_string("id").unwrap_or_default();
            let date_time = call.get_string("date_time").unwrap_or_default();
            match visits.schedule_visit(&id, &date_time) {
                VisitOutcome::Booked => format!(
                    "The visit to the property with id {} has been set for {}",
                    id, date_time
                ),
                VisitOutcome::SlotUnavailable(_) => format!(
                    "The date and time {} is not available for the property with id {}. \
                     Do you want me to check the calendar for available dates and times?",
                    date_time, id
                ),
                VisitOutcome::UnknownProperty => {
                    format!("The property with id {} was not found", id)
                }
            }
        },
    );

    let details = Arc::clone(&store);
    registry.register(
        ToolDefinition::function(
            "get_property_details",
            "Get the details of a property like address, owner, price, description and amenities.",
            property_id_schema(),
        ),
        true,
        move |call| {
            let id = call.get_string("id").unwrap_or_default();
            match details.details(&id) {
                Some(d) => format!(
                    "The property with id {} has the following details: {}",
                    id,
                    serde_json::to_string(&d).unwrap_or_default()
                ),
                None => format!("The property with id {} was not found", id),
            }
        },
    );

    registry
}

/// Assemble the property assistant team
pub fn team(
    gateway: Arc<dyn ChatGateway>,
    config: &Config,
    store: Arc<PropertyStore>,
) -> Orchestrator {
    let worker = Worker::builder(PROPERTY_AGENT, Arc::clone(&gateway))
        .persona(PROPERTY_PERSONA)
        .model(config.models.worker.clone())
        .tools(Arc::new(registry(store)))
        .max_tool_iterations(config.engine.max_tool_iterations)
        .build();

    let supervisor = Supervisor::new(
        gateway,
        config.models.router.clone(),
        vec![PROPERTY_AGENT.to_string()],
    );

    Orchestrator::new(supervisor, vec![worker], &config.engine)
}
