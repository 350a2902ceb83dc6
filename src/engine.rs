//! SimilarityEngine: store lookups feeding the similarity core

use crate::error::{ServiceError, ServiceResult};
use crate::explain::explain;
use crate::features::build_vector;
use crate::scoring::{rank, round_score};
use crate::store::BattingStore;
use crate::types::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Shortest accepted player search query
pub const MIN_QUERY_LEN: usize = 2;
/// Player search result cap
pub const SEARCH_LIMIT: usize = 20;

/// How many features each explanation names on either side
#[derive(Debug, Clone, Copy)]
pub struct ExplainOptions {
    pub top_similar: usize,
    pub top_different: usize,
}

impl Default for ExplainOptions {
    fn default() -> Self {
        Self {
            top_similar: 2,
            top_different: 2,
        }
    }
}

/// Main engine (thread-safe via Arc)
pub struct SimilarityEngine {
    pub store: Box<dyn BattingStore>,
    pub explain_options: ExplainOptions,
}

pub type SharedSimilarityEngine = Arc<SimilarityEngine>;

impl SimilarityEngine {
    pub fn new(store: Box<dyn BattingStore>) -> SharedSimilarityEngine {
        Arc::new(Self {
            store,
            explain_options: ExplainOptions::default(),
        })
    }

    pub fn store_name(&self) -> &'static str {
        self.store.name()
    }

    pub async fn search_players(&self, query: &str) -> ServiceResult<Vec<PlayerSummary>> {
        if query.chars().count() < MIN_QUERY_LEN {
            return Err(ServiceError::BadRequest(format!(
                "query must be at least {} characters",
                MIN_QUERY_LEN
            )));
        }
        Ok(self.store.search_players(query, SEARCH_LIMIT).await?)
    }

    pub async fn player_season(&self, player_id: &str, year: i64) -> ServiceResult<SeasonLine> {
        self.store
            .player_season(player_id, year)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Not found".to_string()))
    }

    /// Rank the season's hitters against one player season and explain each match
    pub async fn similar_hitters(&self, req: SimilarRequest) -> ServiceResult<SimilarResponse> {
        let start = Instant::now();

        info!(
            "Similarity request: player={}, year={}, k={}, min_ab={}",
            req.player_id, req.year, req.k, req.min_ab
        );

        // Target and candidate lookups are independent
        let (target_row, candidate_rows) = futures::try_join!(
            self.store.batting_line(&req.player_id, req.year),
            self.store.season_lines(req.year, req.min_ab),
        )?;

        let target_row = target_row
            .ok_or_else(|| ServiceError::NotFound("Target player/year not found".to_string()))?;

        let target = build_vector(&target_row)?;
        let candidates = candidate_rows
            .iter()
            .map(build_vector)
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Built {} candidate vectors", candidates.len());

        let top = rank(&target, &candidates, req.k)?;

        let ExplainOptions { top_similar, top_different } = self.explain_options;
        let mut results = Vec::with_capacity(top.len());
        for (hitter, score) in top {
            results.push(SimilarHitter {
                player_id: hitter.player_id.clone(),
                name: hitter.name.clone(),
                year: hitter.year,
                ab: hitter.ab,
                similarity: round_score(score),
                explanation: explain(&target, hitter, top_similar, top_different)?,
                features: hitter.features.clone(),
            });
        }

        info!(
            "Similarity complete: {} of {} candidates returned in {}ms",
            results.len(),
            candidates.len(),
            start.elapsed().as_millis()
        );

        Ok(SimilarResponse {
            target,
            feature_definition: FEATURE_NAMES,
            results,
            params: SimilarParams {
                k: req.k,
                min_ab: req.min_ab,
            },
        })
    }
}
