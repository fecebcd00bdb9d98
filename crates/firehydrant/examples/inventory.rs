//! Print every service and team, with their signal rules
//!
//! ## Usage
//!
//! ```bash
//! export FIREHYDRANT_API_KEY=fhb-...
//! RUST_LOG=firehydrant=debug cargo run --example inventory --features trace
//! ```

use std::time::Duration;

use firehydrant::resources::services::ServiceQuery;
use firehydrant::resources::teams::TeamQuery;
use firehydrant::resources::NoQuery;
use firehydrant::{Client, ClientConfig, RequestContext};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    firehydrant::observability::init_tracing();

    let client = Client::from_config(ClientConfig::from_env()?)?;

    let actor = client.ping().await?;
    println!("Authenticated as {} ({})", actor.name, actor.id);

    let services = client.services().list(&ServiceQuery::default()).await?;
    println!("\n{} services", services.len());
    for service in &services {
        println!("  {:<40} tier {:?}", service.name, service.service_tier);
    }

    let teams = client.teams().list(&TeamQuery::default()).await?;
    println!("\n{} teams", teams.len());
    for team in &teams {
        // Give up on a team rather than queueing behind the limiter forever.
        let ctx = RequestContext::background().with_timeout(Duration::from_secs(30));
        let rules = client
            .signal_rules(&team.id)
            .with_context(ctx)
            .list(&NoQuery::default())
            .await;

        match rules {
            Ok(rules) => println!("  {:<40} {} signal rules", team.name, rules.len()),
            Err(e) if e.is_rate_limit_timeout() => println!("  {:<40} (skipped, rate limited)", team.name),
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
