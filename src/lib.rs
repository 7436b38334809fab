pub mod configuration;
pub mod domain;
pub mod hsm_client;
pub mod scn_subscriber_url;
pub mod telemetry;
