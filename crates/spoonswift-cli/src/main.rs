use anyhow::bail;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use spoonswift_core::query::{GeoPoint, SubmitAction, UpstreamQuery};
use spoonswift_core::load_config;
use spoonswift_fetch::{
    fetch_resource, FetchEngine, ListingValidator, MenuValidator, RelayChain, RequestState,
    SearchValidator, Status, SuggestionsValidator, Validator,
};

#[derive(Debug, Parser)]
#[command(name = "spoonswift-cli")]
#[command(about = "Fetch catalog data through the relay chain")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch the restaurant listing for a location.
    Listing {
        #[arg(long)]
        lat: Option<f64>,
        #[arg(long)]
        lng: Option<f64>,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// Fetch one restaurant's full menu.
    Menu {
        /// Upstream restaurant identifier.
        #[arg(long)]
        id: String,
    },
    /// Fetch type-ahead suggestions for a partial query.
    Suggest {
        #[arg(long)]
        query: String,
        #[arg(long)]
        lat: Option<f64>,
        #[arg(long)]
        lng: Option<f64>,
    },
    /// Fetch full search results for a submitted query.
    Search {
        #[arg(long)]
        query: String,
        #[arg(long)]
        lat: Option<f64>,
        #[arg(long)]
        lng: Option<f64>,
        #[arg(long)]
        tracking_id: Option<String>,
        #[arg(long)]
        query_unique_id: Option<String>,
        #[arg(long)]
        meta_data: Option<String>,
        /// Submit as a suggestion click instead of a direct entry.
        #[arg(long)]
        from_suggestion: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = load_config()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    let cli = Cli::parse();
    let engine = FetchEngine::from_config(&config)?;
    let chain = RelayChain::default_chain(&config)?;

    let location = |lat: Option<f64>, lng: Option<f64>| GeoPoint {
        lat: lat.unwrap_or(config.default_lat),
        lng: lng.unwrap_or(config.default_lng),
    };

    match cli.command {
        Commands::Listing { lat, lng, offset } => {
            let query = UpstreamQuery::Listing {
                location: location(lat, lng),
                offset,
            };
            let state = run(engine, chain, ListingValidator, query).await;
            report(state, |data| {
                format!(
                    "{} restaurants ({})",
                    data.restaurants.len(),
                    if data.header_title.is_empty() {
                        "no header"
                    } else {
                        data.header_title.as_str()
                    }
                )
            })
        }
        Commands::Menu { id } => {
            let query = UpstreamQuery::Menu { restaurant_id: id };
            let state = run(engine, chain, MenuValidator, query).await;
            report(state, |data| {
                format!(
                    "{}: {} menu categories",
                    data.restaurant_info
                        .get("name")
                        .and_then(serde_json::Value::as_str)
                        .unwrap_or("(unnamed restaurant)"),
                    data.categories.len()
                )
            })
        }
        Commands::Suggest { query, lat, lng } => {
            let query = UpstreamQuery::Suggestions {
                location: location(lat, lng),
                query,
            };
            let state = run(engine, chain, SuggestionsValidator, query).await;
            report(state, |data| {
                let texts: Vec<&str> = data
                    .suggestions
                    .iter()
                    .filter_map(|s| s.get("text").and_then(serde_json::Value::as_str))
                    .collect();
                format!("{} suggestions: {}", data.suggestions.len(), texts.join(", "))
            })
        }
        Commands::Search {
            query,
            lat,
            lng,
            tracking_id,
            query_unique_id,
            meta_data,
            from_suggestion,
        } => {
            let query = UpstreamQuery::Search {
                location: location(lat, lng),
                query,
                tracking_id,
                query_unique_id,
                meta_data,
                submit_action: if from_suggestion {
                    SubmitAction::Suggestion
                } else {
                    SubmitAction::Enter
                },
            };
            let state = run(engine, chain, SearchValidator, query).await;
            report(state, |data| {
                serde_json::to_string_pretty(&data.payload)
                    .unwrap_or_else(|_| "(unprintable payload)".to_owned())
            })
        }
    }
}

async fn run<V: Validator>(
    engine: FetchEngine,
    chain: RelayChain,
    validator: V,
    query: UpstreamQuery,
) -> RequestState<V::Output> {
    fetch_resource(engine, chain, validator, query).await.state()
}

/// Prints the attempt log and either the data summary or the cycle error.
fn report<T>(state: RequestState<T>, describe: impl Fn(&T) -> String) -> anyhow::Result<()> {
    for attempt in &state.history {
        eprintln!("  {}: {}", attempt.relay, attempt.outcome);
    }
    match (state.status, state.data, state.last_error) {
        (Status::Success, Some(data), _) => {
            tracing::info!(
                attempts = state.attempts,
                relays_tried = state.history.len(),
                "fetch cycle succeeded"
            );
            println!("{}", describe(&data));
            Ok(())
        }
        (_, _, Some(err)) => {
            tracing::warn!(
                attempts = state.attempts,
                relays_tried = err.relays_tried,
                error = %err,
                "fetch cycle failed"
            );
            bail!("{err}")
        }
        _ => bail!("fetch did not complete"),
    }
}

#[cfg(test)]
mod tests;
