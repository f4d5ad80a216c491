use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Envelope posted by the checkout client: `{ "order": { ... } }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderPayload {
    #[serde(default)]
    pub order: Option<Order>,
}

impl OrderPayload {
    /// Read the envelope out of any JSON document. A missing, null or
    /// non-object `order` reads as absent.
    pub fn from_json(doc: &Value) -> Self {
        Self {
            order: doc
                .get("order")
                .filter(|order| order.is_object())
                .map(Order::from_json),
        }
    }
}

/// An order as submitted by the browser. Line items are opaque; only their
/// count and the shipping country take part in validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default)]
    pub items: Option<Vec<Value>>,
    #[serde(default)]
    pub shipping_country: Option<Value>,
}

impl Order {
    pub fn new(items: Vec<LineItem>, shipping_country: impl Into<String>) -> Self {
        Self {
            items: Some(items.iter().map(LineItem::to_json).collect()),
            shipping_country: Some(Value::String(shipping_country.into())),
        }
    }

    /// Lenient read: a non-array `items` counts as absent, and
    /// `shippingCountry` is kept whatever its JSON type.
    pub fn from_json(value: &Value) -> Self {
        Self {
            items: value.get("items").and_then(Value::as_array).cloned(),
            shipping_country: value
                .get("shippingCountry")
                .filter(|country| !country.is_null())
                .cloned(),
        }
    }

    /// Line items, treating an absent sequence as empty.
    pub fn line_items(&self) -> &[Value] {
        self.items.as_deref().unwrap_or_default()
    }

    /// The shipping country when it is a string.
    pub fn shipping_country(&self) -> Option<&str> {
        self.shipping_country.as_ref().and_then(Value::as_str)
    }
}

/// A line item as the checkout client builds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub price: f64,
}

impl LineItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, quantity: u32, price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            quantity,
            price,
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "quantity": self.quantity,
            "price": self.price,
        })
    }
}
