//! Inference endpoint client.
//!
//! The endpoint takes the AutoML request envelope and answers with one
//! prediction per submitted row. Known response shapes are decoded
//! explicitly; anything else is an error, never a silent coercion. Endpoint
//! failures are fatal, with no retry.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::common::error::{OracleError, Result};
use crate::config::EndpointConfig;
use crate::domain::ProjectedTeam;

/// Feature order the model was trained with. The request matrix must follow
/// this order exactly.
pub const FEATURE_COLUMNS: [&str; 9] = [
    "W", "L", "ORtg", "DRtg", "NRtg", "Pace", "FTr", "ThreePAr", "TS_Pct",
];

#[derive(Debug, Serialize)]
struct InferenceRequest {
    input_data: InputFrame,
}

#[derive(Debug, Serialize)]
struct InputFrame {
    columns: Vec<&'static str>,
    data: Vec<Vec<f64>>,
}

/// The known response envelopes: a bare array, or the array wrapped in
/// `{ "result": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResponseEnvelope {
    Flat(Vec<PredictionValue>),
    Wrapped { result: Vec<PredictionValue> },
}

impl ResponseEnvelope {
    fn into_values(self) -> Vec<PredictionValue> {
        match self {
            ResponseEnvelope::Flat(values) => values,
            ResponseEnvelope::Wrapped { result } => result,
        }
    }
}

/// One entry of the response: a probability pair, a bare probability, or a
/// class label.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PredictionValue {
    Pair([f64; 2]),
    Scalar(f64),
    Label(String),
}

impl PredictionValue {
    /// Playoff probability on the [0,1] scale. Fails on anything outside the
    /// known shapes rather than coercing.
    pub fn playoff_probability(&self) -> Result<f64> {
        match self {
            PredictionValue::Pair([_, yes]) if (0.0..=1.0).contains(yes) => Ok(*yes),
            PredictionValue::Pair(pair) => Err(OracleError::ResponseShape(format!(
                "probability pair out of range: {pair:?}"
            ))),
            PredictionValue::Scalar(p) if (0.0..=1.0).contains(p) => Ok(*p),
            PredictionValue::Scalar(p) => Err(OracleError::ResponseShape(format!(
                "probability out of range: {p}"
            ))),
            PredictionValue::Label(label) => match label.as_str() {
                "0" => Ok(0.0),
                "1" => Ok(1.0),
                other => Err(OracleError::ResponseShape(format!(
                    "unknown class label: {other:?}"
                ))),
            },
        }
    }
}

pub struct InferenceClient {
    client: reqwest::Client,
    config: EndpointConfig,
}

impl InferenceClient {
    pub fn new(config: EndpointConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Score a batch of projected teams. Returns exactly one value per team
    /// or fails.
    #[instrument(skip(self, teams), fields(teams = teams.len()))]
    pub async fn predict(&self, teams: &[ProjectedTeam]) -> Result<Vec<PredictionValue>> {
        let request = InferenceRequest {
            input_data: InputFrame {
                columns: FEATURE_COLUMNS.to_vec(),
                data: teams.iter().map(feature_vector).collect(),
            },
        };

        info!(url = %self.config.url, "calling inference endpoint");
        let response = self
            .client
            .post(&self.config.url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(OracleError::EndpointStatus {
                status: status.as_u16(),
                body,
            });
        }

        let values = decode_response(&body)?;
        if values.len() != teams.len() {
            return Err(OracleError::ResponseShape(format!(
                "{} predictions for {} submitted teams",
                values.len(),
                teams.len()
            )));
        }
        Ok(values)
    }
}

/// Feature vector for one team, in `FEATURE_COLUMNS` order.
pub fn feature_vector(team: &ProjectedTeam) -> Vec<f64> {
    vec![
        team.wins,
        team.losses,
        team.offensive_rating,
        team.defensive_rating,
        team.net_rating,
        team.pace,
        team.free_throw_rate,
        team.three_point_rate,
        team.true_shooting_pct,
    ]
}

pub fn decode_response(body: &str) -> Result<Vec<PredictionValue>> {
    let envelope: ResponseEnvelope = serde_json::from_str(body).map_err(|_| {
        OracleError::ResponseShape(format!(
            "expected a prediction array or {{\"result\": [...]}}, got: {}",
            truncate(body, 120)
        ))
    })?;
    Ok(envelope.into_values())
}

fn truncate(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}
