//! Retail store vertical
//!
//! Domain record stores and tools for the car store assistant: product
//! catalog, product reviews, and order creation. Five workers share the
//! conversation: general conversation, recommendations, details, reviews,
//! and order creation, each with its own persona and tool set.
//!
//! Product matching uses case-insensitive substring search over the
//! catalog; similarity search over an embedded collection is an external
//! concern this engine does not take on.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::agent::{Orchestrator, Supervisor, Worker};
use crate::core::{Config, ToolDefinition};
use crate::gateway::ChatGateway;
use crate::tools::ToolRegistry;

/// Worker names in routing order
pub const GENERAL_CONVERSATION_AGENT: &str = "general_conversation_agent";
pub const PRODUCT_RECOMMENDATION_AGENT: &str = "product_recommendation_agent";
pub const PRODUCT_DETAILS_AGENT: &str = "product_details_agent";
pub const PRODUCT_REVIEWS_AGENT: &str = "product_reviews_agent";
pub const CREATE_ORDER_AGENT: &str = "create_order_agent";

const GENERAL_PERSONA: &str = "\
Act as a personal cars consultant. Your name is Juan. You work for a car store. \
The store sells cars. Handle general conversation, greetings, and basic questions.
Key behaviors:
- Respond warmly to greetings and basic questions about the store.
- Don't use emojis
- Answer always in english
- Keep responses friendly but professional
- Don't make up information about products";

const RECOMMENDATION_PERSONA: &str = "\
Act as a personal cars consultant. Your name is Juan. You work for a car store \
guiding users through the product recommendations. \
Respond organizing the data in a friendly way. \
If the user asks for the recommendations of a product, call \
check_product_recommendation to get the recommendations. \
If the user gives you a list of interests, call check_product_recommendation to \
get the recommendations. \
Answer always in english. Never answer using tags like <user> or <assistant> or \
anything like that. \
Don't answer about the products with your own knowledge, only answer with the \
data provided by the tools.";

const DETAILS_PERSONA: &str = "\
Act as a personal cars consultant. Your name is Juan. You work for a car store \
guiding users through the product details like name, price, description, best \
for usage. \
Respond organizing the data in a friendly way. \
If the user asks for the details of a product, call check_product_details to get \
the details. \
Don't include product ID in the response. \
Answer always in english. Never answer using tags like <user> or <assistant> or \
anything like that. \
Don't answer about the products with your own knowledge, only answer with the \
data provided by the tools.";

const REVIEWS_PERSONA: &str = "\
Act as a personal cars consultant. Your name is Juan. You work for a car store \
guiding users through the product reviews. \
If the user asks for the reviews of a product, call check_product_reviews to get \
the reviews. \
Answer always in english. Never answer using tags like <user> or <assistant> or \
anything like that. \
Don't answer about the products with your own knowledge, only answer with the \
data provided by the tools.";

const ORDER_PERSONA: &str = "\
Act as a personal cars consultant. Your name is Juan. You work for a car store \
guiding users through the order creation. \
If the user asks to create an order or to buy a car, you should first ask for \
the email, product name, and quantity if they were not provided. \
If the user provides the email, product name, and quantity, then call \
create_order with the email, product name, and quantity provided by the user. \
Answer always in english. Never answer using tags like <user> or <assistant> or \
anything like that. \
Don't answer about the products with your own knowledge, only answer with the \
data provided by the tools.";

/// A product in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub product_id: String,
    pub name: String,
    pub price: f64,
    pub description: String,
    pub key_features: Vec<String>,
    pub best_for: String,
    pub types: Vec<String>,
}

/// A customer review of a product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub product_id: String,
    pub reviewer: String,
    pub rating: u8,
    pub review: String,
}

/// A created order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    pub email: String,
    pub product: String,
    pub quantity: u32,
    pub total: f64,
}

#[derive(Debug, Default)]
struct CatalogData {
    products: Vec<Product>,
    reviews: Vec<Review>,
}

/// Lock-guarded store of catalog and review records
#[derive(Default)]
pub struct CatalogStore {
    inner: Mutex<CatalogData>,
}

impl CatalogStore {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog seeded with the demonstration data set
    pub fn seeded() -> Self {
        let store = Self::new();
        {
            let mut data = store.inner.lock().unwrap();
            data.products = vec![
                Product {
                    product_id: "P001".into(),
                    name: "Andino SUV".into(),
                    price: 28000.0,
                    description: "A spacious SUV with all-wheel drive and a panoramic roof".into(),
                    key_features: vec![
                        "all-wheel drive".into(),
                        "panoramic roof".into(),
                        "7 seats".into(),
                    ],
                    best_for: "family trips and mountain roads".into(),
                    types: vec!["suv".into(), "family".into()],
                },
                Product {
                    product_id: "P002".into(),
                    name: "Capital Sedan".into(),
                    price: 21000.0,
                    description: "A fuel-efficient sedan for daily city commuting".into(),
                    key_features: vec![
                        "hybrid engine".into(),
                        "lane assist".into(),
                        "compact trunk".into(),
                    ],
                    best_for: "city commuting".into(),
                    types: vec!["sedan".into(), "city".into(), "hybrid".into()],
                },
                Product {
                    product_id: "P003".into(),
                    name: "Costa Pickup".into(),
                    price: 35000.0,
                    description: "A rugged pickup truck with a long bed and towing package".into(),
                    key_features: vec![
                        "towing package".into(),
                        "long bed".into(),
                        "4x4".into(),
                    ],
                    best_for: "work sites and heavy loads".into(),
                    types: vec!["pickup".into(), "work".into(), "offroad".into()],
                },
                Product {
                    product_id: "P004".into(),
                    name: "Sabana Coupe".into(),
                    price: 42000.0,
                    description: "A sporty coupe with a turbocharged engine".into(),
                    key_features: vec![
                        "turbocharged engine".into(),
                        "sport suspension".into(),
                        "leather seats".into(),
                    ],
                    best_for: "weekend drives".into(),
                    types: vec!["coupe".into(), "sport".into()],
                },
            ];
            data.reviews = vec![
                Review {
                    product_id: "P001".into(),
                    reviewer: "Carolina".into(),
                    rating: 5,
                    review: "Great space for the kids and luggage, handles curves well.".into(),
                },
                Review {
                    product_id: "P001".into(),
                    reviewer: "Andres".into(),
                    rating: 4,
                    review: "Comfortable ride, fuel consumption a bit high.".into(),
                },
                Review {
                    product_id: "P002".into(),
                    reviewer: "Luisa".into(),
                    rating: 5,
                    review: "Perfect for traffic, the hybrid engine saves a lot.".into(),
                },
                Review {
                    product_id: "P003".into(),
                    reviewer: "Miguel".into(),
                    rating: 4,
                    review: "Tows my trailer without effort. Cabin is loud on highways.".into(),
                },
            ];
        }
        store
    }

    /// Load the catalog and reviews from JSON files
    pub fn from_files(catalog_path: &Path, reviews_path: &Path) -> std::io::Result<Self> {
        let store = Self::new();
        {
            let mut data = store.inner.lock().unwrap();
            let catalog = std::fs::read_to_string(catalog_path)?;
            data.products = serde_json::from_str(&catalog)?;
            let reviews = std::fs::read_to_string(reviews_path)?;
            data.reviews = serde_json::from_str(&reviews)?;
        }
        Ok(store)
    }

    /// Find the product best matching a name query
    pub fn find_product(&self, name: &str) -> Option<Product> {
        let query = name.to_lowercase();
        let data = self.inner.lock().unwrap();
        data.products
            .iter()
            .find(|p| {
                let candidate = p.name.to_lowercase();
                candidate.contains(&query) || query.contains(&candidate)
            })
            .cloned()
    }

    /// Recommend one product per interest, deduplicated by name
    pub fn recommend(&self, interests: &[String]) -> Vec<Product> {
        let data = self.inner.lock().unwrap();
        let mut recommendations: Vec<Product> = Vec::new();

        for interest in interests {
            let query = interest.to_lowercase();
            let matched = data.products.iter().find(|p| {
                p.name.to_lowercase().contains(&query)
                    || p.description.to_lowercase().contains(&query)
                    || p.best_for.to_lowercase().contains(&query)
                    || p.types.iter().any(|t| t.to_lowercase().contains(&query))
            });

            if let Some(product) = matched {
                if !recommendations.iter().any(|r| r.name == product.name) {
                    recommendations.push(product.clone());
                }
            }
        }

        recommendations
    }

    /// Reviews for the product best matching a name query
    pub fn reviews_for(&self, name: &str) -> Vec<Review> {
        let product = match self.find_product(name) {
            Some(p) => p,
            None => return Vec::new(),
        };
        let data = self.inner.lock().unwrap();
        data.reviews
            .iter()
            .filter(|r| r.product_id == product.product_id)
            .cloned()
            .collect()
    }
}

/// Lock-guarded store of created orders
///
/// When constructed with a path, every created order is written through to
/// a JSON file; the in-memory record is authoritative either way.
#[derive(Default)]
pub struct OrderStore {
    inner: Mutex<Vec<Order>>,
    path: Option<PathBuf>,
}

impl OrderStore {
    /// Create an in-memory order store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an order store that writes through to a JSON file
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Mutex::new(Vec::new()),
            path: Some(path.into()),
        }
    }

    /// Record a new order for a product, computing the total price
    pub fn create(&self, email: &str, product: &Product, quantity: u32) -> Order {
        let order = Order {
            order_id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            product: product.name.clone(),
            quantity,
            total: product.price * f64::from(quantity),
        };

        let mut orders = self.inner.lock().unwrap();
        orders.push(order.clone());

        if let Some(ref path) = self.path {
            match serde_json::to_string_pretty(&*orders) {
                Ok(json) => {
                    if let Err(e) = std::fs::write(path, json) {
                        warn!(target: "switchboard::retail", error = %e, "failed to write orders file");
                    }
                }
                Err(e) => {
                    warn!(target: "switchboard::retail", error = %e, "failed to serialize orders")
                }
            }
        }

        order
    }

    /// All orders created so far
    pub fn orders(&self) -> Vec<Order> {
        self.inner.lock().unwrap().clone()
    }
}

/// Schema for tools keyed by product name
fn product_name_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "product_name": {
                "type": "string",
                "description": "The name of the product to check"
            }
        },
        "required": ["product_name"]
    })
}

/// Registry for the recommendation worker
pub fn recommendation_registry(catalog: Arc<CatalogStore>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(
        ToolDefinition::function(
            "check_product_recommendation",
            "List the products recommendations based on the interests of the user",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "interests": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "The list of interests of the user to find the best \
                                        product that matches the interests. Could be type of \
                                        car, design, usage, etc."
                    }
                },
                "required": ["interests"]
            }),
        ),
        true,
        move |call| {
            let interests = call.get_string_list("interests").unwrap_or_default();
            let recommendations = catalog.recommend(&interests);
            if recommendations.is_empty() {
                return "No products matched those interests".to_string();
            }
            let mut data_response = String::new();
            for product in &recommendations {
                data_response.push_str(&format!(
                    "Product: {}\n",
                    serde_json::to_string(product).unwrap_or_default()
                ));
            }
            format!("The products recommendations are {}", data_response)
        },
    );
    registry
}

/// Registry for the product details worker
pub fn details_registry(catalog: Arc<CatalogStore>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(
        ToolDefinition::function(
            "check_product_details",
            "List the details of a product like name, price, description, key features, \
             best for usage, available types",
            product_name_schema(),
        ),
        true,
        move |call| {
            let name = call.get_string("product_name").unwrap_or_default();
            match catalog.find_product(&name) {
                Some(product) => format!(
                    "The product details are {}",
                    serde_json::to_string(&product).unwrap_or_default()
                ),
                None => format!("The product with name {} was not found", name),
            }
        },
    );
    registry
}

/// Registry for the product reviews worker
pub fn reviews_registry(catalog: Arc<CatalogStore>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(
        ToolDefinition::function(
            "check_product_reviews",
            "List the reviews of a product that contains the user reviewer name, rating, review.",
            product_name_schema(),
        ),
        true,
        move |call| {
            let name = call.get_string("product_name").unwrap_or_default();
            let reviews = catalog.reviews_for(&name);
            if reviews.is_empty() {
                return format!("The product with name {} was not found", name);
            }
            format!(
                "The product reviews are {}",
                serde_json::to_string(&reviews).unwrap_or_default()
            )
        },
    );
    registry
}

/// Registry for the order creation worker
pub fn order_registry(catalog: Arc<CatalogStore>, orders: Arc<OrderStore>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(
        ToolDefinition::function(
            "create_order",
            "Create an order when user provides an email, product name, and quantity.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "email": {
                        "type": "string",
                        "description": "The email of the user to create an order"
                    },
                    "product_name": {
                        "type": "string",
                        "description": "The name of the product to create an order"
                    },
                    "quantity": {
                        "type": "string",
                        "description": "The quantity of the product to create an order"
                    }
                },
                "required": ["email", "product_name", "quantity"]
            }),
        ),
        true,
        move |call| {
            let email = call.get_string("email").unwrap_or_default();
            let product_name = call.get_string("product_name").unwrap_or_default();
            let quantity = call.get_string("quantity").unwrap_or_default();

            if email.is_empty() || product_name.is_empty() || quantity.is_empty() {
                return format!(
                    "The order has not been created because the user {} or the product {} \
                     or the quantity {} was not provided",
                    email, product_name, quantity
                );
            }

            let quantity: u32 = match quantity.parse() {
                Ok(q) => q,
                Err(_) => {
                    return format!(
                        "The order has not been created because the quantity {} is not a \
                         valid number",
                        quantity
                    )
                }
            };

            match catalog.find_product(&product_name) {
                Some(product) => {
                    let order = orders.create(&email, &product, quantity);
                    format!(
                        "The order has been created for the user {} with the product {} \
                         and the total price is {}",
                        email, product.name, order.total
                    )
                }
                None => format!(
                    "The order has not been created because the product {} was not found",
                    product_name
                ),
            }
        },
    );
    registry
}

/// Assemble the retail assistant team
pub fn team(
    gateway: Arc<dyn ChatGateway>,
    config: &Config,
    catalog: Arc<CatalogStore>,
    orders: Arc<OrderStore>,
) -> Orchestrator {
    let model = config.models.worker.as_str();
    let cap = config.engine.max_tool_iterations;

    let general = Worker::builder(GENERAL_CONVERSATION_AGENT, Arc::clone(&gateway))
        .persona(GENERAL_PERSONA)
        .model(model)
        // Slightly higher temperature for more natural conversation
        .temperature(0.7)
        .max_tool_iterations(cap)
        .build();

    let recommendation = Worker::builder(PRODUCT_RECOMMENDATION_AGENT, Arc::clone(&gateway))
        .persona(RECOMMENDATION_PERSONA)
        .model(model)
        .tools(Arc::new(recommendation_registry(Arc::clone(&catalog))))
        .max_tool_iterations(cap)
        .build();

    let details = Worker::builder(PRODUCT_DETAILS_AGENT, Arc::clone(&gateway))
        .persona(DETAILS_PERSONA)
        .model(model)
        .tools(Arc::new(details_registry(Arc::clone(&catalog))))
        .max_tool_iterations(cap)
        .build();

    let reviews = Worker::builder(PRODUCT_REVIEWS_AGENT, Arc::clone(&gateway))
        .persona(REVIEWS_PERSONA)
        .model(model)
        .tools(Arc::new(reviews_registry(Arc::clone(&catalog))))
        .max_tool_iterations(cap)
        .build();

    let order = Worker::builder(CREATE_ORDER_AGENT, Arc::clone(&gateway))
        .persona(ORDER_PERSONA)
        .model(model)
        .tools(Arc::new(order_registry(catalog, orders)))
        .max_tool_iterations(cap)
        .build();

    let members = vec![
        GENERAL_CONVERSATION_AGENT.to_string(),
        PRODUCT_RECOMMENDATION_AGENT.to_string(),
        PRODUCT_DETAILS_AGENT.to_string(),
        PRODUCT_REVIEWS_AGENT.to_string(),
        CREATE_ORDER_AGENT.to_string(),
    ];

    let supervisor = Supervisor::new(gateway, config.models.router.clone(), members);

    Orchestrator::new(
        supervisor,
        vec![general, recommendation, details, reviews, order],
        &config.engine,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ToolCall;

    #[test]
    fn test_find_product_case_insensitive() {
        let catalog = CatalogStore::seeded();
        assert!(catalog.find_product("andino suv").is_some());
        assert!(catalog.find_product("Capital").is_some());
        assert!(catalog.find_product("Nonexistent Roadster").is_none());
    }

    #[test]
    fn test_recommend_dedup() {
        let catalog = CatalogStore::seeded();
        // Both interests match the same SUV; it must appear once
        let recs = catalog.recommend(&["suv".to_string(), "family".to_string()]);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].name, "Andino SUV");
    }

    #[test]
    fn test_order_total() {
        let catalog = CatalogStore::seeded();
        let orders = OrderStore::new();
        let product = catalog.find_product("Capital Sedan").unwrap();

        let order = orders.create("ana@example.com", &product, 2);
        assert_eq!(order.total, 42000.0);
        assert_eq!(orders.orders().len(), 1);
    }

    #[test]
    fn test_create_order_tool() {
        let catalog = Arc::new(CatalogStore::seeded());
        let orders = Arc::new(OrderStore::new());
        let registry = order_registry(catalog, Arc::clone(&orders));

        let result = registry.dispatch(&ToolCall::new(
            "create_order",
            serde_json::json!({
                "email": "ana@example.com",
                "product_name": "Capital Sedan",
                "quantity": "2"
            }),
        ));
        assert!(result.success);
        assert!(result.output.contains("the total price is 42000"));
        assert_eq!(orders.orders().len(), 1);
    }

    #[test]
    fn test_create_order_tool_unknown_product() {
        let catalog = Arc::new(CatalogStore::seeded());
        let orders = Arc::new(OrderStore::new());
        let registry = order_registry(catalog, Arc::clone(&orders));

        let result = registry.dispatch(&ToolCall::new(
            "create_order",
            serde_json::json!({
                "email": "ana@example.com",
                "product_name": "Nonexistent Roadster",
                "quantity": "1"
            }),
        ));
        assert!(result.success);
        assert!(result.output.contains("was not found"));
        assert!(orders.orders().is_empty());
    }

    #[test]
    fn test_from_files_round_trip() {
        let dir = std::env::temp_dir();
        let catalog_path = dir.join("switchboard_test_catalog.json");
        let reviews_path = dir.join("switchboard_test_reviews.json");

        let seeded = CatalogStore::seeded();
        {
            let data = seeded.inner.lock().unwrap();
            std::fs::write(&catalog_path, serde_json::to_string(&data.products).unwrap()).unwrap();
            std::fs::write(&reviews_path, serde_json::to_string(&data.reviews).unwrap()).unwrap();
        }

        let loaded = CatalogStore::from_files(&catalog_path, &reviews_path).unwrap();
        assert!(loaded.find_product("Andino SUV").is_some());
        assert_eq!(loaded.reviews_for("Andino").len(), 2);

        let _ = std::fs::remove_file(catalog_path);
        let _ = std::fs::remove_file(reviews_path);
    }

    #[test]
    fn test_reviews_for_product() {
        let catalog = CatalogStore::seeded();
        let reviews = catalog.reviews_for("Andino");
        assert_eq!(reviews.len(), 2);
        assert!(catalog.reviews_for("Nonexistent Roadster").is_empty());
    }
}
