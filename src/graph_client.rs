//! HTTP client for the Neo4j transactional Cypher endpoint
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::Neo4jConfig;

#[derive(Debug, Clone)]
pub struct GraphClient {
    base_url: String,
    database: String,
    user: String,
    password: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct TxRequest<'a> {
    statements: Vec<Statement<'a>>,
}

#[derive(Debug, Serialize)]
struct Statement<'a> {
    statement: &'a str,
    parameters: Value,
    #[serde(rename = "resultDataContents")]
    result_data_contents: [&'static str; 1],
}

#[derive(Debug, Deserialize)]
struct TxResponse {
    #[serde(default)]
    results: Vec<StatementResult>,
    #[serde(default)]
    errors: Vec<TxError>,
}

#[derive(Debug, Deserialize)]
struct StatementResult {
    columns: Vec<String>,
    data: Vec<RowData>,
}

#[derive(Debug, Deserialize)]
struct RowData {
    row: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct TxError {
    code: String,
    message: String,
}

impl GraphClient {
    /// Create a new graph client
    pub fn new(config: &Neo4jConfig) -> Self {
        Self {
            base_url: config.uri.trim_end_matches('/').to_string(),
            database: config.database.clone(),
            user: config.user.clone(),
            password: config.password.clone(),
            client: reqwest::Client::new(),
        }
    }

    fn commit_url(&self) -> String {
        format!(
            "{}/db/{}/tx/commit",
            self.base_url,
            urlencoding::encode(&self.database)
        )
    }

    /// Run one Cypher statement in an auto-commit transaction and return
    /// its rows keyed by column name
    pub async fn run(&self, cypher: &str, parameters: Value) -> Result<Vec<Map<String, Value>>> {
        let url = self.commit_url();
        let body = TxRequest {
            statements: vec![Statement {
                statement: cypher,
                parameters,
                result_data_contents: ["row"],
            }],
        };

        debug!("Running Cypher against {}", url);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.user, Some(&self.password))
            .json(&body)
            .send()
            .await
            .context("Failed to reach Neo4j")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Neo4j HTTP error {}: {}", status, body);
        }

        let tx: TxResponse = response
            .json()
            .await
            .context("Failed to parse Neo4j response")?;

        rows_from_response(tx)
    }

    /// Run a statement and deserialize every row into `T`
    pub async fn query_as<T: DeserializeOwned>(&self, cypher: &str, parameters: Value) -> Result<Vec<T>> {
        self.run(cypher, parameters)
            .await?
            .into_iter()
            .map(|row| serde_json::from_value(Value::Object(row)).context("Unexpected row shape"))
            .collect()
    }

    /// Health check
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/", self.base_url);
        let response = self.client.get(&url).send().await?;
        Ok(response.status().is_success())
    }
}

fn rows_from_response(tx: TxResponse) -> Result<Vec<Map<String, Value>>> {
    if let Some(err) = tx.errors.first() {
        anyhow::bail!("Neo4j error {}: {}", err.code, err.message);
    }

    let mut rows = Vec::new();
    for result in tx.results {
        for data in result.data {
            let row: Map<String, Value> = result
                .columns
                .iter()
                .cloned()
                .zip(data.row)
                .collect();
            rows.push(row);
        }
    }

    debug!("Neo4j returned {} rows", rows.len());
    Ok(rows)
}
