use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::remote::{PredictionClient, RawPrediction};
use crate::error::PredictionFailure;

/// HTTP client for the external prediction service.
///
/// `POST {base_url}/predict` with `{"symptoms": "fever,cough"}`, answered by
/// `{"predictions": [{"disease", "probability", "description", "precautions"}]}`.
pub struct HttpPredictionClient {
    base_url: String,
    predict_url: String,
    client: reqwest::blocking::Client,
    timeout: Duration,
}

impl HttpPredictionClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        let base_url = base_url.trim_end_matches('/').to_string();

        Ok(Self {
            predict_url: format!("{base_url}/predict"),
            base_url,
            client,
            timeout,
        })
    }
}

/// Request body for /predict
#[derive(Serialize)]
struct PredictRequest<'a> {
    symptoms: &'a str,
}

/// Response body from /predict
#[derive(Deserialize)]
struct PredictResponse {
    predictions: Vec<WirePrediction>,
}

#[derive(Deserialize)]
struct WirePrediction {
    disease: String,
    probability: f64,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    precautions: Option<String>,
}

impl From<WirePrediction> for RawPrediction {
    fn from(wire: WirePrediction) -> Self {
        Self {
            condition: wire.disease,
            probability: wire.probability,
            description: wire.description,
            precautions: wire.precautions,
        }
    }
}

impl PredictionClient for HttpPredictionClient {
    fn predict(&self, symptoms: &str) -> Result<Vec<RawPrediction>, PredictionFailure> {
        let response = self
            .client
            .post(&self.predict_url)
            .json(&PredictRequest { symptoms })
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    PredictionFailure::Timeout(self.timeout)
                } else if e.is_connect() {
                    PredictionFailure::Connection(self.base_url.clone())
                } else {
                    PredictionFailure::Request(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(PredictionFailure::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: PredictResponse = response.json().map_err(|e| {
            if e.is_timeout() {
                PredictionFailure::Timeout(self.timeout)
            } else {
                PredictionFailure::Malformed(e.to_string())
            }
        })?;

        Ok(parsed.predictions.into_iter().map(RawPrediction::from).collect())
    }

    fn endpoint(&self) -> &str {
        &self.predict_url
    }
}
