use hsm_ct::domain::{
    ScnPatchOp, ScnPatchSubscription, ScnPostSubscription, ScnSubscription, ScnSubscriptionArray,
    SubscriptionId,
};
use hsm_ct::hsm_client::HsmClient;
use hsm_ct::telemetry::{get_subscriber, init_subscriber};
use std::sync::{Arc, LazyLock, Mutex};
use wiremock::matchers::{path, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const SCN_PATH: &str = "/hsm/v2/Subscriptions/SCN";

// Ensure that the `tracing` stack is only initialised once using `LazyLock`
static TRACING: LazyLock<()> = LazyLock::new(|| {
    let default_filter_level = "debug".to_string();
    let subscriber_name = "test".to_string();
    // We cannot assign the output of `get_subscriber` to a variable based on the
    // value of `TEST_LOG` because the sink is part of the type returned by
    // `get_subscriber`, therefore they are not the same type.
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

/// In-memory stand-in for the HSM SCN subscription store.
#[derive(Clone, Default)]
pub struct ScnSubscriptionStore {
    state: Arc<Mutex<StoreState>>,
}

#[derive(Default)]
struct StoreState {
    next_id: i64,
    subscriptions: Vec<ScnSubscription>,
}

impl ScnSubscriptionStore {
    pub fn snapshot(&self) -> Vec<ScnSubscription> {
        self.state.lock().unwrap().subscriptions.clone()
    }
}

fn add_missing(current: &mut Vec<String>, additions: Vec<String>) {
    for addition in additions {
        if !current.contains(&addition) {
            current.push(addition);
        }
    }
}

fn replace_if_given(current: &mut Vec<String>, replacement: Vec<String>) {
    if !replacement.is_empty() {
        *current = replacement;
    }
}

fn apply_patch(subscription: &mut ScnSubscription, patch: ScnPatchSubscription) {
    match patch.op {
        ScnPatchOp::Add => {
            add_missing(&mut subscription.roles, patch.roles);
            add_missing(&mut subscription.sub_roles, patch.sub_roles);
            add_missing(&mut subscription.software_status, patch.software_status);
            add_missing(&mut subscription.states, patch.states);
            // Add only ever flips Enabled from false to true
            if patch.enabled == Some(true) && subscription.enabled == Some(false) {
                subscription.enabled = Some(true);
            }
        }
        ScnPatchOp::Remove => {
            subscription.roles.retain(|r| !patch.roles.contains(r));
            subscription.sub_roles.retain(|r| !patch.sub_roles.contains(r));
            subscription
                .software_status
                .retain(|s| !patch.software_status.contains(s));
            subscription.states.retain(|s| !patch.states.contains(s));
            // Remove only ever flips Enabled from true to false
            if patch.enabled == Some(true) && subscription.enabled == Some(true) {
                subscription.enabled = Some(false);
            }
        }
        ScnPatchOp::Replace => {
            replace_if_given(&mut subscription.roles, patch.roles);
            replace_if_given(&mut subscription.sub_roles, patch.sub_roles);
            replace_if_given(&mut subscription.software_status, patch.software_status);
            replace_if_given(&mut subscription.states, patch.states);
            if patch.enabled.is_some() {
                subscription.enabled = patch.enabled;
            }
        }
    }
}

fn stored(id: SubscriptionId, post: ScnPostSubscription) -> ScnSubscription {
    ScnSubscription {
        id,
        subscriber: post.subscriber,
        enabled: post.enabled,
        roles: post.roles,
        sub_roles: post.sub_roles,
        software_status: post.software_status,
        states: post.states,
        url: post.url,
    }
}

impl Respond for ScnSubscriptionStore {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let mut state = self.state.lock().unwrap();
        let id = request
            .url
            .path()
            .strip_prefix(SCN_PATH)
            .and_then(|rest| rest.strip_prefix('/'))
            .map(|id| id.parse::<i64>());

        match (request.method.as_str(), id) {
            ("GET", None) => ResponseTemplate::new(200).set_body_json(ScnSubscriptionArray {
                subscription_list: state.subscriptions.clone(),
            }),
            ("POST", None) => {
                let Ok(post) = serde_json::from_slice::<ScnPostSubscription>(&request.body) else {
                    return ResponseTemplate::new(400);
                };
                state.next_id += 1;
                let subscription = stored(SubscriptionId::Number(state.next_id), post);
                state.subscriptions.push(subscription.clone());
                ResponseTemplate::new(200).set_body_json(subscription)
            }
            ("DELETE", None) => {
                state.subscriptions.clear();
                ResponseTemplate::new(200)
            }
            ("GET", Some(Ok(id))) => {
                match state
                    .subscriptions
                    .iter()
                    .find(|s| s.id == SubscriptionId::Number(id))
                {
                    Some(subscription) => ResponseTemplate::new(200).set_body_json(subscription),
                    None => ResponseTemplate::new(404),
                }
            }
            ("PUT", Some(Ok(id))) => {
                let Ok(post) = serde_json::from_slice::<ScnPostSubscription>(&request.body) else {
                    return ResponseTemplate::new(400);
                };
                let id = SubscriptionId::Number(id);
                match state.subscriptions.iter_mut().find(|s| s.id == id) {
                    Some(subscription) => {
                        *subscription = stored(id, post);
                        ResponseTemplate::new(204)
                    }
                    None => ResponseTemplate::new(404),
                }
            }
            ("PATCH", Some(Ok(id))) => {
                let Ok(patch) = serde_json::from_slice::<ScnPatchSubscription>(&request.body)
                else {
                    return ResponseTemplate::new(400);
                };
                match state
                    .subscriptions
                    .iter_mut()
                    .find(|s| s.id == SubscriptionId::Number(id))
                {
                    Some(subscription) => {
                        apply_patch(subscription, patch);
                        ResponseTemplate::new(204)
                    }
                    None => ResponseTemplate::new(404),
                }
            }
            ("DELETE", Some(Ok(id))) => {
                let before = state.subscriptions.len();
                state
                    .subscriptions
                    .retain(|s| s.id != SubscriptionId::Number(id));
                if state.subscriptions.len() < before {
                    ResponseTemplate::new(200)
                } else {
                    ResponseTemplate::new(404)
                }
            }
            (_, Some(Err(_))) => ResponseTemplate::new(400),
            _ => ResponseTemplate::new(405),
        }
    }
}

pub struct MockHsm {
    pub server: MockServer,
    pub hsm_client: HsmClient,
    pub store: ScnSubscriptionStore,
}

impl MockHsm {
    pub async fn post_subscription(&self, subscriber: &str, url: &str) -> ScnSubscription {
        self.hsm_client
            .post_scn_subscription(&ScnPostSubscription::new(subscriber, url))
            .await
            .expect("Failed to create SCN subscription.")
            .json()
            .await
            .expect("Failed to decode created SCN subscription.")
    }
}

/// Start a mock HSM backed by an in-memory subscription store.
pub async fn spawn_mock_hsm() -> MockHsm {
    // The first time `initialize` is invoked the code in `TRACING` is executed.
    // All other invocations will instead skip execution.
    LazyLock::force(&TRACING);

    let server = MockServer::start().await;
    let store = ScnSubscriptionStore::default();
    Mock::given(path(SCN_PATH))
        .respond_with(store.clone())
        .mount(&server)
        .await;
    Mock::given(path_regex(format!("^{}/[^/]+$", SCN_PATH)))
        .respond_with(store.clone())
        .mount(&server)
        .await;

    let hsm_client = HsmClient::new(
        server.uri(),
        "/hsm/v2".into(),
        None,
        std::time::Duration::from_secs(2),
    )
    .expect("Failed to build HSM client.");

    MockHsm {
        server,
        hsm_client,
        store,
    }
}
