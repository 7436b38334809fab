// Resolves the ID of an SCN subscription on the configured HSM instance.
// Usage: find_scn_subscription <subscriber> <url>
//        find_scn_subscription <subscriber+url>

use anyhow::{Context, bail};
use hsm_ct::configuration::get_configuration;
use hsm_ct::domain::SubscriberUrl;
use hsm_ct::telemetry::{get_subscriber, init_subscriber};

/// One argument is taken as the full key, two are joined into one.
fn parse_subscriber_url(args: &[String]) -> anyhow::Result<String> {
    match args {
        [subscriber_url] => Ok(subscriber_url.clone()),
        [subscriber, url] => Ok(SubscriberUrl::new(subscriber, url).to_string()),
        _ => bail!("Usage: find_scn_subscription <subscriber> <url> | <subscriber+url>"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout only carries the lookup result
    let subscriber = get_subscriber(
        "find_scn_subscription".into(),
        "info".into(),
        std::io::stderr,
    );
    init_subscriber(subscriber);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let subscriber_url = parse_subscriber_url(&args)?;

    let configuration = get_configuration().context("Failed to read configuration.")?;
    let hsm_client = configuration
        .hsm
        .client()
        .context("Failed to build the HSM client.")?;

    let lookup = hsm_client
        .get_id_of_scn_subscriber_url(&subscriber_url)
        .await
        .context("Failed to look up the SCN subscription.")?;

    println!("{}", serde_json::to_string(&lookup)?);
    Ok(())
}
