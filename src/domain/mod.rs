mod scn_subscription;
mod subscriber_url;
mod subscription_id;

pub use scn_subscription::{
    ScnPatchOp, ScnPatchSubscription, ScnPostSubscription, ScnSubscription, ScnSubscriptionArray,
};
pub use subscriber_url::SubscriberUrl;
pub use subscription_id::SubscriptionId;
