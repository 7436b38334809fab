//! Lookup of an SCN subscription ID by its subscriber+URL key.
//!
//! Component tests create subscriptions, then need the ID HSM assigned to
//! one of them so later steps can fetch, patch or delete it. HSM only
//! returns the whole list, so the ID is recovered by scanning it.

use crate::domain::{SubscriberUrl, SubscriptionId};
use crate::telemetry::error_chain_fmt;
use serde::Serialize;
use serde_json::Value;

const SUBSCRIPTION_LIST: &str = "SubscriptionList";
const ID: &str = "ID";
const SUBSCRIBER: &str = "Subscriber";
const URL: &str = "Url";

/// Result handed back to the test runner, serialized as `{"subscriber_url_id": ...}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SubscriberUrlLookup {
    pub subscriber_url_id: Option<SubscriptionId>,
}

#[derive(thiserror::Error)]
pub enum SubscriberUrlLookupError {
    #[error("Failed to parse the response body as JSON")]
    Parse(#[from] serde_json::Error),
    #[error("Missing key `{0}`")]
    MissingKey(&'static str),
    #[error("Expected `{field}` to be {expected}, found {found}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
        found: String,
    },
    #[error("Failed to read the response body")]
    Body(#[from] reqwest::Error),
}

impl std::fmt::Debug for SubscriberUrlLookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// The three fields of a listed subscription the lookup reads.
struct SubscriptionRecord<'a> {
    id: SubscriptionId,
    subscriber: &'a str,
    url: &'a str,
}

impl<'a> TryFrom<&'a Value> for SubscriptionRecord<'a> {
    type Error = SubscriberUrlLookupError;

    fn try_from(subscription: &'a Value) -> Result<Self, Self::Error> {
        let id = field(subscription, ID)?;
        let id = serde_json::from_value::<SubscriptionId>(id.clone())
            .map_err(|_| invalid_field(ID, "an integer or a string", id))?;
        Ok(Self {
            id,
            subscriber: str_field(subscription, SUBSCRIBER)?,
            url: str_field(subscription, URL)?,
        })
    }
}

fn field<'a>(
    subscription: &'a Value,
    key: &'static str,
) -> Result<&'a Value, SubscriberUrlLookupError> {
    subscription
        .get(key)
        .ok_or(SubscriberUrlLookupError::MissingKey(key))
}

fn str_field<'a>(
    subscription: &'a Value,
    key: &'static str,
) -> Result<&'a str, SubscriberUrlLookupError> {
    let value = field(subscription, key)?;
    value
        .as_str()
        .ok_or_else(|| invalid_field(key, "a string", value))
}

fn invalid_field(
    field: &'static str,
    expected: &'static str,
    found: &Value,
) -> SubscriberUrlLookupError {
    SubscriberUrlLookupError::InvalidField {
        field,
        expected,
        found: found.to_string(),
    }
}

/// Find the ID of the first subscription whose `Subscriber` followed by its
/// `Url` equals `subscriber_url`.
///
/// No match is not an error: the returned lookup carries `None` and the
/// calling test decides what that means.
#[tracing::instrument(name = "Looking up SCN subscription by subscriber+url", skip(body))]
pub fn get_id_of_scn_subscriber_url(
    body: &str,
    subscriber_url: &str,
) -> Result<SubscriberUrlLookup, SubscriberUrlLookupError> {
    let response_data: Value = serde_json::from_str(body)?;
    let subscription_list = field(&response_data, SUBSCRIPTION_LIST)?;
    let subscriptions = subscription_list
        .as_array()
        .ok_or_else(|| invalid_field(SUBSCRIPTION_LIST, "an array", subscription_list))?;

    for subscription in subscriptions {
        let record = SubscriptionRecord::try_from(subscription)?;
        tracing::debug!(
            "Subscription: ID={}, Subscriber={}, Url={}",
            record.id,
            record.subscriber,
            record.url
        );
        if SubscriberUrl::new(record.subscriber, record.url) == subscriber_url {
            tracing::debug!("Found matching subscriber_url: ID={}", record.id);
            return Ok(SubscriberUrlLookup {
                subscriber_url_id: Some(record.id),
            });
        }
    }

    Ok(SubscriberUrlLookup::default())
}

/// Same as [`get_id_of_scn_subscriber_url`], reading the body out of an HSM response.
pub async fn get_id_of_scn_subscriber_url_from_response(
    response: reqwest::Response,
    subscriber_url: &str,
) -> Result<SubscriberUrlLookup, SubscriberUrlLookupError> {
    let body = response.text().await?;
    get_id_of_scn_subscriber_url(&body, subscriber_url)
}
