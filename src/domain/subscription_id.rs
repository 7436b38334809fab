use serde::{Deserialize, Serialize};

/// Opaque identifier of an SCN subscription.
///
/// HSM hands out integer IDs, but the lookup treats them as opaque and also
/// accepts strings. The original JSON shape is kept when serializing.
/// Any other JSON type (float, bool, null, array, object) is refused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubscriptionId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubscriptionId::Number(id) => write!(f, "{}", id),
            SubscriptionId::Text(id) => write!(f, "{}", id),
        }
    }
}

impl From<i64> for SubscriptionId {
    fn from(id: i64) -> Self {
        SubscriptionId::Number(id)
    }
}

impl From<&str> for SubscriptionId {
    fn from(id: &str) -> Self {
        SubscriptionId::Text(id.to_string())
    }
}
