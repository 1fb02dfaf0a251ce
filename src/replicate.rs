//! Replicate API client: creates a prediction for a model/prompt pair and
//! polls it to a terminal state.

use anyhow::Result;
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};
use tokio::time::sleep;

const API_BASE: &str = "https://api.replicate.com";
const POLL_INTERVAL: Duration = Duration::from_secs(1);
const POLL_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Clone)]
pub struct ReplicateClient {
    api_key: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct PredictionInput<'a> {
    prompt: &'a str,
}

#[derive(Serialize)]
struct CreateVersionedPrediction<'a> {
    version: &'a str,
    input: PredictionInput<'a>,
}

#[derive(Serialize)]
struct CreateModelPrediction<'a> {
    input: PredictionInput<'a>,
}

#[derive(Deserialize, Debug)]
struct Prediction {
    id: String,
    status: PredictionStatus,
    #[serde(default)]
    output: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum PredictionStatus {
    Starting,
    Processing,
    Succeeded,
    Failed,
    Canceled,
}

impl PredictionStatus {
    fn as_str(self) -> &'static str {
        match self {
            PredictionStatus::Starting => "starting",
            PredictionStatus::Processing => "processing",
            PredictionStatus::Succeeded => "succeeded",
            PredictionStatus::Failed => "failed",
            PredictionStatus::Canceled => "canceled",
        }
    }
}

impl Prediction {
    /// Replicate reports errors as a string most of the time, but leaves the
    /// field free-form, so anything non-string is rendered as raw JSON.
    fn error_text(&self) -> String {
        match &self.error {
            Some(Value::String(message)) => message.clone(),
            Some(other) => other.to_string(),
            None => "no error detail provided".to_string(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct ApiError {
    detail: String,
}

/// Splits a model reference into its name and optional pinned version.
/// `owner/name:version` targets the versioned predictions endpoint,
/// bare `owner/name` targets the official-model endpoint.
fn split_model_ref(model: &str) -> (&str, Option<&str>) {
    match model.split_once(':') {
        Some((name, version)) => (name, Some(version)),
        None => (model, None),
    }
}

/// Flattens a prediction's `output` field into the list of produced asset
/// URLs. Models return either a single URL or an array of them.
fn collect_outputs(output: Option<&Value>) -> Vec<String> {
    match output {
        Some(Value::String(url)) => vec![url.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

impl ReplicateClient {
    pub fn new(api_key: String) -> Self {
        ReplicateClient {
            api_key,
            client: reqwest::Client::new(),
        }
    }

    /// Runs a model to completion and returns its output URLs in order.
    ///
    /// The created prediction is polled until Replicate reports a terminal
    /// status. A prediction that succeeds without producing any output is
    /// treated as a failure so callers never have to index an empty list.
    pub async fn run(&self, model: &str, prompt: &str) -> Result<Vec<String>> {
        info!(
            "Running Replicate model '{}' | Prompt: '{}'",
            model,
            prompt.chars().take(100).collect::<String>()
        );

        let mut prediction = self.create_prediction(model, prompt).await?;
        let started = Instant::now();

        loop {
            match prediction.status {
                PredictionStatus::Succeeded => {
                    let outputs = collect_outputs(prediction.output.as_ref());
                    if outputs.is_empty() {
                        error!("Prediction {} succeeded with no output", prediction.id);
                        return Err(anyhow::anyhow!("The model returned no output"));
                    }
                    info!(
                        "Prediction {} succeeded | {} output(s)",
                        prediction.id,
                        outputs.len()
                    );
                    return Ok(outputs);
                }
                PredictionStatus::Failed | PredictionStatus::Canceled => {
                    let detail = prediction.error_text();
                    error!(
                        "Prediction {} {}: {}",
                        prediction.id,
                        prediction.status.as_str(),
                        detail
                    );
                    return Err(anyhow::anyhow!("Generation {}: {}", prediction.status.as_str(), detail));
                }
                PredictionStatus::Starting | PredictionStatus::Processing => {
                    if started.elapsed() >= POLL_TIMEOUT {
                        error!("Prediction {} timed out while {}", prediction.id, prediction.status.as_str());
                        return Err(anyhow::anyhow!(
                            "Timed out waiting for the model after {} seconds",
                            POLL_TIMEOUT.as_secs()
                        ));
                    }
                    sleep(POLL_INTERVAL).await;
                    prediction = self.get_prediction(&prediction.id).await?;
                }
            }
        }
    }

    async fn create_prediction(&self, model: &str, prompt: &str) -> Result<Prediction> {
        let input = PredictionInput { prompt };

        debug!("Creating Replicate prediction for '{}'", model);
        let request = match split_model_ref(model) {
            (_, Some(version)) => self
                .client
                .post(format!("{}/v1/predictions", API_BASE))
                .json(&CreateVersionedPrediction { version, input }),
            (name, None) => self
                .client
                .post(format!("{}/v1/models/{}/predictions", API_BASE, name))
                .json(&CreateModelPrediction { input }),
        };

        let response = request
            .header("Authorization", format!("Token {}", self.api_key))
            .send()
            .await?;

        Self::decode_prediction(response).await
    }

    async fn get_prediction(&self, id: &str) -> Result<Prediction> {
        let response = self
            .client
            .get(format!("{}/v1/predictions/{}", API_BASE, id))
            .header("Authorization", format!("Token {}", self.api_key))
            .send()
            .await?;

        Self::decode_prediction(response).await
    }

    async fn decode_prediction(response: reqwest::Response) -> Result<Prediction> {
        let status = response.status();
        let response_text = response.text().await?;

        if status.is_success() {
            serde_json::from_str(&response_text)
                .map_err(|e| anyhow::anyhow!("Failed to parse Replicate response: {}", e))
        } else if let Ok(api_error) = serde_json::from_str::<ApiError>(&response_text) {
            error!("Replicate API error: {}", api_error.detail);
            Err(anyhow::anyhow!("Replicate error: {}", api_error.detail))
        } else {
            error!("Replicate API error (status {}): {}", status, response_text);
            Err(anyhow::anyhow!("Replicate API error (status {})", status))
        }
    }
}
