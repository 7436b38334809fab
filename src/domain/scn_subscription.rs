use super::{SubscriberUrl, SubscriptionId};
use serde::{Deserialize, Serialize};

/// One entry of `GET /Subscriptions/SCN`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScnSubscription {
    #[serde(rename = "ID")]
    pub id: SubscriptionId,
    pub subscriber: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub software_status: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub states: Vec<String>,
    pub url: String,
}

impl ScnSubscription {
    pub fn subscriber_url(&self) -> SubscriberUrl {
        SubscriberUrl::new(&self.subscriber, &self.url)
    }
}

/// Body of `GET /Subscriptions/SCN`. A body without `SubscriptionList` is rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScnSubscriptionArray {
    #[serde(rename = "SubscriptionList")]
    pub subscription_list: Vec<ScnSubscription>,
}

impl ScnSubscriptionArray {
    /// First subscription in list order whose subscriber+URL key equals `subscriber_url`.
    pub fn find_by_subscriber_url(&self, subscriber_url: &str) -> Option<&ScnSubscription> {
        self.subscription_list
            .iter()
            .find(|subscription| subscription.subscriber_url() == subscriber_url)
    }
}

/// Body of `POST /Subscriptions/SCN`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScnPostSubscription {
    pub subscriber: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub software_status: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub states: Vec<String>,
    pub url: String,
}

impl ScnPostSubscription {
    pub fn new(subscriber: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            subscriber: subscriber.into(),
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn subscriber_url(&self) -> SubscriberUrl {
        SubscriberUrl::new(&self.subscriber, &self.url)
    }
}

/// How HSM merges an [`ScnPatchSubscription`] into the stored subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScnPatchOp {
    Add,
    Remove,
    Replace,
}

/// Body of `PATCH /Subscriptions/SCN/{id}`. Subscriber and URL cannot be patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScnPatchSubscription {
    pub op: ScnPatchOp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub software_status: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub states: Vec<String>,
}

impl ScnPatchSubscription {
    pub fn new(op: ScnPatchOp) -> Self {
        Self {
            op,
            enabled: None,
            roles: Vec::new(),
            sub_roles: Vec::new(),
            software_status: Vec::new(),
            states: Vec::new(),
        }
    }
}
