//! Batting data stores behind the similarity engine

use crate::ingest::{BattingRow, PersonRow};
use crate::types::*;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};

/// Trait for pluggable batting data sources
#[async_trait]
pub trait BattingStore: Send + Sync {
    fn name(&self) -> &'static str;

    /// Players whose full name contains `query`, case-insensitively, ordered by name
    async fn search_players(&self, query: &str, limit: usize) -> Result<Vec<PlayerSummary>>;

    async fn player_season(&self, player_id: &str, year: i64) -> Result<Option<SeasonLine>>;

    /// Similarity input for one player season
    async fn batting_line(&self, player_id: &str, year: i64) -> Result<Option<BattingLineRecord>>;

    /// Similarity inputs for every line of `year` with at least `min_ab` at-bats
    async fn season_lines(&self, year: i64, min_ab: i64) -> Result<Vec<BattingLineRecord>>;
}

/// In-process store built from loaded Lahman rows
#[derive(Debug, Default)]
pub struct MemoryStore {
    names: HashMap<String, String>,
    lines: BTreeMap<(String, i64), BattingRow>,
}

impl MemoryStore {
    /// Index the rows the same way ingestion shapes the graph: one line per
    /// (player, year), later stints overwriting earlier ones, and only lines
    /// whose player is known are reachable.
    pub fn from_rows(people: &[PersonRow], batting: &[BattingRow]) -> Self {
        let names = people
            .iter()
            .map(|p| (p.player_id.clone(), p.name_full.clone()))
            .collect();

        let mut lines = BTreeMap::new();
        for row in batting {
            lines.insert((row.player_id.clone(), row.year_id), row.clone());
        }

        Self { names, lines }
    }

    fn record(&self, row: &BattingRow) -> BattingLineRecord {
        BattingLineRecord {
            player_id: Some(row.player_id.clone()),
            name: self.names.get(&row.player_id).cloned(),
            year: Some(row.year_id),
            ab: Some(row.ab),
            hr: Some(row.hr as f64),
            bb: Some(row.bb as f64),
            so: Some(row.so as f64),
            h: Some(row.h as f64),
            sb: Some(row.sb as f64),
        }
    }

    fn known_line(&self, player_id: &str, year: i64) -> Option<&BattingRow> {
        if !self.names.contains_key(player_id) {
            return None;
        }
        self.lines.get(&(player_id.to_string(), year))
    }
}

#[async_trait]
impl BattingStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn search_players(&self, query: &str, limit: usize) -> Result<Vec<PlayerSummary>> {
        let needle = query.to_lowercase();
        let mut hits: Vec<PlayerSummary> = self
            .names
            .iter()
            .filter(|(_, name)| name.to_lowercase().contains(&needle))
            .map(|(id, name)| PlayerSummary {
                player_id: id.clone(),
                name: Some(name.clone()),
            })
            .collect();

        hits.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.player_id.cmp(&b.player_id)));
        hits.truncate(limit);
        Ok(hits)
    }

    async fn player_season(&self, player_id: &str, year: i64) -> Result<Option<SeasonLine>> {
        Ok(self.known_line(player_id, year).map(|row| SeasonLine {
            player_id: row.player_id.clone(),
            name: self.names.get(&row.player_id).cloned(),
            year: row.year_id,
            g: Some(row.g),
            ab: Some(row.ab),
            h: Some(row.h),
            hr: Some(row.hr),
            bb: Some(row.bb),
            so: Some(row.so),
            r: Some(row.r),
        }))
    }

    async fn batting_line(&self, player_id: &str, year: i64) -> Result<Option<BattingLineRecord>> {
        Ok(self.known_line(player_id, year).map(|row| self.record(row)))
    }

    async fn season_lines(&self, year: i64, min_ab: i64) -> Result<Vec<BattingLineRecord>> {
        Ok(self
            .lines
            .values()
            .filter(|row| row.year_id == year && row.ab >= min_ab)
            .filter(|row| self.names.contains_key(&row.player_id))
            .map(|row| self.record(row))
            .collect())
    }
}
