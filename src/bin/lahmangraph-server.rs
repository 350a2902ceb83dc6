//! lahmangraph HTTP server binary

use lahmangraph::ingest::{load_batting, load_people};
use lahmangraph::{BattingStore, Config, GraphClient, MemoryStore, Neo4jConfig, Neo4jStore, SimilarityEngine};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod server {
    pub use lahmangraph::server::*;
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_level(true)
        .init();

    info!("lahmangraph similarity service v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;

    // Check for --use-neo4j flag
    let use_neo4j = std::env::args().any(|arg| arg == "--use-neo4j");

    let store: Box<dyn BattingStore> = if use_neo4j {
        let neo4j = Neo4jConfig::from_env()?;
        info!("Mode: Neo4j graph at {} (database '{}')", neo4j.uri, neo4j.database);

        let client = GraphClient::new(&neo4j);
        match client.health_check().await {
            Ok(true) => info!("Neo4j is reachable"),
            Ok(false) => warn!("Neo4j answered with a non-success status"),
            Err(e) => {
                error!("Failed to connect to Neo4j: {}", e);
                return Err(e);
            }
        }

        Box::new(Neo4jStore::new(client))
    } else {
        info!("Mode: in-memory store from {}", config.lahman_dir.display());
        info!("(use --use-neo4j to query the graph instead)");

        let people = load_people(config.people_csv())?;
        let batting = load_batting(config.batting_csv(), config.year_min)?;
        Box::new(MemoryStore::from_rows(&people, &batting))
    };

    let engine = SimilarityEngine::new(store);
    info!("Similarity engine initialized ({} store)", engine.store_name());

    server::run_server(engine, config.port).await?;

    Ok(())
}
