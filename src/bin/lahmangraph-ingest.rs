//! Load Lahman People.csv and Batting.csv into Neo4j

use lahmangraph::ingest::{ingest, load_batting, load_people};
use lahmangraph::{Config, GraphClient, Neo4jConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let config = Config::from_env()?;
    let neo4j = Neo4jConfig::from_env()?;

    let people = load_people(config.people_csv())?;
    let batting = load_batting(config.batting_csv(), config.year_min)?;

    let client = GraphClient::new(&neo4j);
    let summary = ingest(&client, &people, &batting).await?;

    info!(
        "Ingestion complete: {} players, {} batting lines",
        summary.players, summary.batting_lines
    );

    Ok(())
}
