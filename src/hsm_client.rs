use crate::domain::{
    ScnPatchSubscription, ScnPostSubscription, ScnSubscription, ScnSubscriptionArray,
    SubscriptionId,
};
use crate::scn_subscriber_url::{
    SubscriberUrlLookup, SubscriberUrlLookupError, get_id_of_scn_subscriber_url_from_response,
};
use crate::telemetry::error_chain_fmt;
use reqwest::{Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, Secret};

/// Client for the SCN subscription endpoints of the Hardware State Manager.
#[derive(Clone, Debug)]
pub struct HsmClient {
    base_url: String,
    api_prefix: String,
    http_client: Client,
    authorization_token: Option<Secret<String>>,
}

#[derive(thiserror::Error)]
pub enum HsmClientError {
    #[error("Request to HSM failed")]
    Request(#[from] reqwest::Error),
    #[error(transparent)]
    Lookup(#[from] SubscriberUrlLookupError),
}

impl std::fmt::Debug for HsmClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl HsmClient {
    pub fn new(
        base_url: String,
        api_prefix: String,
        authorization_token: Option<Secret<String>>,
        timeout: std::time::Duration,
    ) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url,
            api_prefix,
            http_client,
            authorization_token,
        })
    }

    fn scn_subscriptions_url(&self) -> String {
        format!(
            "{}{}/Subscriptions/SCN",
            self.base_url.trim_end_matches('/'),
            self.api_prefix
        )
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.authorization_token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, reqwest::Error> {
        self.authorize(builder)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| {
                tracing::error!("HSM returned an error status: {:?}", e);
                e
            })
    }

    #[tracing::instrument(name = "Fetching SCN subscriptions", skip(self))]
    pub async fn get_scn_subscriptions(&self) -> Result<Response, reqwest::Error> {
        self.send(self.http_client.get(self.scn_subscriptions_url()))
            .await
    }

    #[tracing::instrument(name = "Fetching SCN subscription list", skip(self))]
    pub async fn get_scn_subscription_list(&self) -> Result<ScnSubscriptionArray, reqwest::Error> {
        self.get_scn_subscriptions().await?.json().await
    }

    #[tracing::instrument(
        name = "Creating SCN subscription",
        skip(self, subscription),
        fields(
            subscriber = %subscription.subscriber,
            url = %subscription.url
        )
    )]
    pub async fn post_scn_subscription(
        &self,
        subscription: &ScnPostSubscription,
    ) -> Result<Response, reqwest::Error> {
        self.send(
            self.http_client
                .post(self.scn_subscriptions_url())
                .json(subscription),
        )
        .await
    }

    fn scn_subscription_url(&self, id: &SubscriptionId) -> String {
        format!("{}/{}", self.scn_subscriptions_url(), id)
    }

    #[tracing::instrument(name = "Fetching SCN subscription", skip(self))]
    pub async fn get_scn_subscription(
        &self,
        id: &SubscriptionId,
    ) -> Result<ScnSubscription, reqwest::Error> {
        self.send(self.http_client.get(self.scn_subscription_url(id)))
            .await?
            .json()
            .await
    }

    /// Overwrite the subscription stored under `id`.
    #[tracing::instrument(
        name = "Replacing SCN subscription",
        skip(self, subscription),
        fields(
            subscriber = %subscription.subscriber,
            url = %subscription.url
        )
    )]
    pub async fn put_scn_subscription(
        &self,
        id: &SubscriptionId,
        subscription: &ScnPostSubscription,
    ) -> Result<Response, reqwest::Error> {
        self.send(
            self.http_client
                .put(self.scn_subscription_url(id))
                .json(subscription),
        )
        .await
    }

    #[tracing::instrument(
        name = "Patching SCN subscription",
        skip(self, patch),
        fields(op = ?patch.op)
    )]
    pub async fn patch_scn_subscription(
        &self,
        id: &SubscriptionId,
        patch: &ScnPatchSubscription,
    ) -> Result<Response, reqwest::Error> {
        self.send(
            self.http_client
                .patch(self.scn_subscription_url(id))
                .json(patch),
        )
        .await
    }

    #[tracing::instrument(name = "Deleting SCN subscription", skip(self))]
    pub async fn delete_scn_subscription(
        &self,
        id: &SubscriptionId,
    ) -> Result<Response, reqwest::Error> {
        self.send(self.http_client.delete(self.scn_subscription_url(id)))
            .await
    }

    #[tracing::instrument(name = "Deleting all SCN subscriptions", skip(self))]
    pub async fn delete_all_scn_subscriptions(&self) -> Result<Response, reqwest::Error> {
        self.send(self.http_client.delete(self.scn_subscriptions_url()))
            .await
    }

    /// Fetch the subscription list and look up the ID registered for `subscriber_url`.
    #[tracing::instrument(name = "Resolving SCN subscription ID", skip(self))]
    pub async fn get_id_of_scn_subscriber_url(
        &self,
        subscriber_url: &str,
    ) -> Result<SubscriberUrlLookup, HsmClientError> {
        let response = self.get_scn_subscriptions().await?;
        Ok(get_id_of_scn_subscriber_url_from_response(response, subscriber_url).await?)
    }
}
