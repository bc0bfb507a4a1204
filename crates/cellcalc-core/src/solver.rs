//! Numeric evaluator client.
//!
//! The resolved expression is sent verbatim to a remote short-answer API and
//! the plain-text answer is returned as the cell's value.

use crate::error::{CellcalcError, Result};
use reqwest::Url;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_ENDPOINT: &str = "https://api.wolframalpha.com/v1/result";

/// Anything that can turn an arithmetic expression into a value.
pub trait Evaluator: Send + Sync {
    fn evaluate(&self, expression: &str) -> Result<String>;
}

impl<F> Evaluator for F
where
    F: Fn(&str) -> Result<String> + Send + Sync,
{
    fn evaluate(&self, expression: &str) -> Result<String> {
        self(expression)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub endpoint: String,
    /// API key; usually supplied through `FORMULA_KEY`.
    pub app_id: Option<String>,
    pub timeout_secs: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            app_id: None,
            timeout_secs: 30,
        }
    }
}

/// Blocking client for the short-answer results API.
pub struct WolframSolver {
    http: Client,
    endpoint: String,
    app_id: String,
}

impl WolframSolver {
    pub fn new(config: &SolverConfig) -> Result<Self> {
        let app_id = config.app_id.clone().ok_or_else(|| {
            CellcalcError::Config("no solver app id configured (set FORMULA_KEY)".to_string())
        })?;
        let http = Client::builder()
            .user_agent(format!("cellcalc/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let solver = WolframSolver {
            http,
            endpoint: config.endpoint.clone(),
            app_id,
        };
        // Validate the endpoint up front.
        solver.request_url("0")?;
        Ok(solver)
    }

    pub fn request_url(&self, expression: &str) -> Result<Url> {
        Url::parse_with_params(
            &self.endpoint,
            &[("appid", self.app_id.as_str()), ("i", expression)],
        )
        .map_err(|e| CellcalcError::Config(format!("invalid solver endpoint {}: {e}", self.endpoint)))
    }
}

impl Evaluator for WolframSolver {
    fn evaluate(&self, expression: &str) -> Result<String> {
        let url = self.request_url(expression)?;
        debug!(expression, "sending expression to solver");
        let response = self.http.get(url).send()?;
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(CellcalcError::Evaluation {
                expression: expression.to_string(),
                reason: format!("HTTP {}", status.as_u16()),
            });
        }
        Ok(response.text()?.trim().to_string())
    }
}
