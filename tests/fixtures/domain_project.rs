use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Shipped,
    Delivered,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    /// Street name and number
    pub street: String,
    pub city: String,
    pub postal_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Unique customer identifier
    pub id: Uuid,
    #[serde(rename = "displayName")]
    #[validate(length(min = 3, max = 40))]
    pub name: String,
    pub email: Option<String>,
    pub tags: Vec<String>,
    pub addresses: HashMap<String, Address>,
    #[serde(skip)]
    pub internal_notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub status: OrderStatus,
    pub placed_at: DateTime<Utc>,
    pub customer: Customer,
    pub attachment: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub children: Vec<Category>,
}
