//! Lahman CSV loading and graph ingestion

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;
use std::io::Read;
use std::path::Path;
use tracing::info;

use crate::graph_client::GraphClient;

/// Rows sent per UNWIND statement
const BATCH_SIZE: usize = 5_000;

/// Player identity row from `People.csv`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonRow {
    #[serde(rename = "playerID")]
    pub player_id: String,
    #[serde(rename = "nameFirst", default)]
    pub name_first: String,
    #[serde(rename = "nameLast", default)]
    pub name_last: String,
    #[serde(rename = "nameFull", default)]
    pub name_full: String,
    #[serde(default)]
    pub bats: String,
    #[serde(default)]
    pub throws: String,
}

/// Season stint row from `Batting.csv`; absent or blank counts are 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattingRow {
    #[serde(rename = "playerID")]
    pub player_id: String,
    #[serde(rename = "yearID")]
    pub year_id: i64,
    #[serde(rename = "teamID", default)]
    pub team_id: String,
    #[serde(rename = "lgID", default)]
    pub lg_id: String,
    #[serde(default, deserialize_with = "zero_if_blank")]
    pub stint: i64,
    #[serde(rename = "G", default, deserialize_with = "zero_if_blank")]
    pub g: i64,
    #[serde(rename = "AB", default, deserialize_with = "zero_if_blank")]
    pub ab: i64,
    #[serde(rename = "R", default, deserialize_with = "zero_if_blank")]
    pub r: i64,
    #[serde(rename = "H", default, deserialize_with = "zero_if_blank")]
    pub h: i64,
    #[serde(rename = "HR", default, deserialize_with = "zero_if_blank")]
    pub hr: i64,
    #[serde(rename = "BB", default, deserialize_with = "zero_if_blank")]
    pub bb: i64,
    #[serde(rename = "SO", default, deserialize_with = "zero_if_blank")]
    pub so: i64,
    #[serde(rename = "SB", default, deserialize_with = "zero_if_blank")]
    pub sb: i64,
    #[serde(rename = "CS", default, deserialize_with = "zero_if_blank")]
    pub cs: i64,
}

fn zero_if_blank<'de, D: Deserializer<'de>>(de: D) -> std::result::Result<i64, D::Error> {
    Ok(csv::invalid_option(de)?.unwrap_or(0))
}

/// Counts written by `ingest`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestSummary {
    pub players: usize,
    pub batting_lines: usize,
}

pub fn read_people<R: Read>(reader: R) -> Result<Vec<PersonRow>> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

    let mut people = Vec::new();
    for (idx, record) in rdr.deserialize::<PersonRow>().enumerate() {
        let mut person = record.with_context(|| format!("Bad People row {}", idx + 1))?;
        person.name_full = format!("{} {}", person.name_first, person.name_last)
            .trim()
            .to_string();
        people.push(person);
    }
    Ok(people)
}

pub fn read_batting<R: Read>(reader: R, year_min: i64) -> Result<Vec<BattingRow>> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

    let mut lines = Vec::new();
    for (idx, record) in rdr.deserialize::<BattingRow>().enumerate() {
        let line = record.with_context(|| format!("Bad Batting row {}", idx + 1))?;
        if line.year_id >= year_min {
            lines.push(line);
        }
    }
    Ok(lines)
}

/// Load `People.csv`, deriving `nameFull` from first and last name
pub fn load_people(path: impl AsRef<Path>) -> Result<Vec<PersonRow>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let people = read_people(file)?;
    info!("Loaded {} players from {}", people.len(), path.display());
    Ok(people)
}

/// Load `Batting.csv`, keeping seasons from `year_min` on
pub fn load_batting(path: impl AsRef<Path>, year_min: i64) -> Result<Vec<BattingRow>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let lines = read_batting(file, year_min)?;
    info!(
        "Loaded {} batting lines (yearID >= {}) from {}",
        lines.len(),
        year_min,
        path.display()
    );
    Ok(lines)
}

const MERGE_PLAYERS: &str = "
UNWIND $rows AS row
MERGE (p:Player {playerID: row.playerID})
SET p.nameFirst = row.nameFirst,
    p.nameLast  = row.nameLast,
    p.nameFull  = row.nameFull,
    p.bats      = row.bats,
    p.throws    = row.throws
";

// A line is keyed by (playerID, yearID): later stints overwrite earlier ones.
const MERGE_BATTING: &str = "
UNWIND $rows AS row
MERGE (s:Season {yearID: row.yearID})
MERGE (b:BattingLine {playerID: row.playerID, yearID: row.yearID})
SET b.teamID = row.teamID,
    b.lgID   = row.lgID,
    b.stint  = row.stint,
    b.G      = row.G,
    b.AB     = row.AB,
    b.R      = row.R,
    b.H      = row.H,
    b.HR     = row.HR,
    b.BB     = row.BB,
    b.SO     = row.SO,
    b.SB     = row.SB,
    b.CS     = row.CS
WITH s, b, row
MATCH (p:Player {playerID: row.playerID})
MERGE (p)-[:HAS_BATTING_LINE]->(b)
MERGE (b)-[:IN_SEASON]->(s)
";

/// Write players, seasons and batting lines into the graph
pub async fn ingest(
    client: &GraphClient,
    people: &[PersonRow],
    batting: &[BattingRow],
) -> Result<IngestSummary> {
    for chunk in people.chunks(BATCH_SIZE) {
        client
            .run(MERGE_PLAYERS, json!({ "rows": chunk }))
            .await
            .context("Failed to merge players")?;
        info!("Merged {} players", chunk.len());
    }

    for chunk in batting.chunks(BATCH_SIZE) {
        client
            .run(MERGE_BATTING, json!({ "rows": chunk }))
            .await
            .context("Failed to merge batting lines")?;
        info!("Merged {} batting lines", chunk.len());
    }

    Ok(IngestSummary {
        players: people.len(),
        batting_lines: batting.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_people_builds_full_name() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "playerID,birthYear,nameFirst,nameLast,bats,throws").unwrap();
        writeln!(file, "a01,1992,Aaron,Judge,R,R").unwrap();
        writeln!(file, "b02,1994,Shohei,Ohtani,L,R").unwrap();
        writeln!(file, "c03,1880,,Smith,,").unwrap();

        let people = load_people(file.path()).unwrap();
        assert_eq!(people.len(), 3);
        assert_eq!(people[0].name_full, "Aaron Judge");
        assert_eq!(people[1].bats, "L");
        assert_eq!(people[2].name_full, "Smith");
        assert_eq!(people[2].throws, "");
    }

    #[test]
    fn test_load_batting_filters_year_min() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "playerID,yearID,stint,teamID,lgID,G,AB,R,H,2B,3B,HR,RBI,SB,CS,BB,SO").unwrap();
        writeln!(file, "a01,2014,1,NYA,AL,10,20,2,5,1,0,1,3,0,0,2,3").unwrap();
        writeln!(file, "a01,2016,1,NYA,AL,50,150,30,40,8,1,10,25,2,1,20,60").unwrap();

        let lines = load_batting(file.path(), 2015).unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines.iter().all(|l| l.year_id >= 2015));
        assert_eq!(lines[0].ab, 150);
        assert_eq!(lines[0].so, 60);
    }

    #[test]
    fn test_batting_blank_and_missing_columns_are_zero() {
        let data = "playerID,yearID,teamID,G,AB,H,HR\nx01,2020,BOS,3,,1,NA\n";
        let lines = read_batting(data.as_bytes(), 2015).unwrap();
        assert_eq!(lines.len(), 1);
        let line = &lines[0];
        assert_eq!(line.ab, 0);
        assert_eq!(line.hr, 0);
        assert_eq!(line.h, 1);
        assert_eq!(line.sb, 0);
        assert_eq!(line.stint, 0);
        assert_eq!(line.lg_id, "");
    }

    #[test]
    fn test_rows_serialize_with_lahman_keys() {
        let line = read_batting("playerID,yearID,AB\nx01,2020,12\n".as_bytes(), 0)
            .unwrap()
            .remove(0);
        let value = serde_json::to_value(&line).unwrap();
        assert_eq!(value["playerID"], "x01");
        assert_eq!(value["yearID"], 2020);
        assert_eq!(value["AB"], 12);
    }
}
