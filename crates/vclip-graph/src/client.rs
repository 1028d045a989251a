//! Neo4j HTTP Cypher transactional-endpoint client
//! (`POST {base}/db/data/transaction/commit`). Chosen over the Bolt
//! protocol so the graph store sits behind the same plain-`reqwest`
//! idiom as the object store and search adapters; see DESIGN.md.

use reqwest::Client;
use serde_json::{json, Value};

use crate::error::{GraphError, GraphResult};

#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub base_url: String,
    pub user: String,
    pub password: String,
}

impl GraphConfig {
    pub fn from_env() -> GraphResult<Self> {
        Ok(Self {
            base_url: std::env::var("NEO4J_URL")
                .map_err(|_| GraphError::config("NEO4J_URL is not set"))?,
            user: std::env::var("NEO4J_USER").unwrap_or_else(|_| "neo4j".to_string()),
            password: std::env::var("NEO4J_PASSWORD")
                .map_err(|_| GraphError::config("NEO4J_PASSWORD is not set"))?,
        })
    }
}

#[derive(Clone)]
pub struct GraphClient {
    http: Client,
    base_url: String,
    user: String,
    password: String,
}

pub struct Statement {
    pub cypher: String,
    pub parameters: Value,
}

impl Statement {
    pub fn new(cypher: impl Into<String>, parameters: Value) -> Self {
        Self { cypher: cypher.into(), parameters }
    }
}

impl GraphClient {
    pub fn new(config: GraphConfig) -> Self {
        Self {
            http: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            user: config.user,
            password: config.password,
        }
    }

    pub fn from_env() -> GraphResult<Self> {
        Ok(Self::new(GraphConfig::from_env()?))
    }

    /// Run a batch of statements as a single committed transaction and
    /// return the raw `results[].data[].row` payloads, one `Vec<Value>`
    /// per statement.
    pub async fn run(&self, statements: Vec<Statement>) -> GraphResult<Vec<Vec<Value>>> {
        let body = json!({
            "statements": statements
                .into_iter()
                .map(|s| json!({ "statement": s.cypher, "parameters": s.parameters }))
                .collect::<Vec<_>>()
        });

        let url = format!("{}/db/data/transaction/commit", self.base_url);
        let resp = self
            .http
            .post(&url)
            .basic_auth(&self.user, Some(&self.password))
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(GraphError::Cypher(format!("http {status}: {text}")));
        }

        let parsed: Value = serde_json::from_str(&text)?;
        let errors = parsed.get("errors").and_then(|e| e.as_array());
        if let Some(errs) = errors {
            if !errs.is_empty() {
                return Err(GraphError::Cypher(errs.to_string()));
            }
        }

        let results = parsed
            .get("results")
            .and_then(|r| r.as_array())
            .cloned()
            .unwrap_or_default();
        Ok(results
            .into_iter()
            .map(|r| {
                r.get("data")
                    .and_then(|d| d.as_array())
                    .map(|rows| {
                        rows.iter()
                            .map(|row| row.get("row").cloned().unwrap_or(Value::Null))
                            .collect()
                    })
                    .unwrap_or_default()
            })
            .collect())
    }
}
