//! Batting store backed by the Neo4j graph

use crate::graph_client::GraphClient;
use crate::store::BattingStore;
use crate::types::*;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;

const SEARCH_PLAYERS: &str = "
MATCH (p:Player)
WHERE toLower(p.nameFull) CONTAINS toLower($q)
RETURN p.playerID AS playerID, p.nameFull AS name
ORDER BY name
LIMIT $limit
";

const PLAYER_SEASON: &str = "
MATCH (p:Player {playerID: $player_id})-[:HAS_BATTING_LINE]->(b:BattingLine {yearID: $year})
RETURN p.playerID AS playerID, p.nameFull AS name, b.yearID AS year,
       b.G AS G, b.AB AS AB, b.H AS H, b.HR AS HR, b.BB AS BB, b.SO AS SO, b.R AS R
";

const BATTING_LINE: &str = "
MATCH (p:Player {playerID: $player_id})-[:HAS_BATTING_LINE]->(b:BattingLine {yearID: $year})
RETURN p.playerID AS playerID, p.nameFull AS name, b.yearID AS year,
       b.AB AS AB, b.HR AS HR, b.BB AS BB, b.SO AS SO, b.H AS H, b.SB AS SB
";

const SEASON_LINES: &str = "
MATCH (p:Player)-[:HAS_BATTING_LINE]->(b:BattingLine {yearID: $year})
WHERE b.AB >= $min_ab
RETURN p.playerID AS playerID, p.nameFull AS name, b.yearID AS year,
       b.AB AS AB, b.HR AS HR, b.BB AS BB, b.SO AS SO, b.H AS H, b.SB AS SB
";

/// Graph-backed store
pub struct Neo4jStore {
    client: GraphClient,
}

impl Neo4jStore {
    pub fn new(client: GraphClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BattingStore for Neo4jStore {
    fn name(&self) -> &'static str {
        "neo4j"
    }

    async fn search_players(&self, query: &str, limit: usize) -> Result<Vec<PlayerSummary>> {
        self.client
            .query_as(SEARCH_PLAYERS, json!({ "q": query, "limit": limit }))
            .await
    }

    async fn player_season(&self, player_id: &str, year: i64) -> Result<Option<SeasonLine>> {
        let rows: Vec<SeasonLine> = self
            .client
            .query_as(PLAYER_SEASON, json!({ "player_id": player_id, "year": year }))
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn batting_line(&self, player_id: &str, year: i64) -> Result<Option<BattingLineRecord>> {
        let rows: Vec<BattingLineRecord> = self
            .client
            .query_as(BATTING_LINE, json!({ "player_id": player_id, "year": year }))
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn season_lines(&self, year: i64, min_ab: i64) -> Result<Vec<BattingLineRecord>> {
        let rows: Vec<BattingLineRecord> = self
            .client
            .query_as(SEASON_LINES, json!({ "year": year, "min_ab": min_ab }))
            .await?;
        tracing::debug!("Neo4j returned {} candidate lines for {}", rows.len(), year);
        Ok(rows)
    }
}
