use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{HistoryError, HistoryProvider, HistoryQuery, PositionRow};

/// History provider backed by a SignalK-style history HTTP endpoint.
pub struct HttpHistoryProvider {
    client: reqwest::Client,
    base_url: String,
    context: String,
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    data: Vec<(DateTime<Utc>, Value)>,
}

impl HttpHistoryProvider {
    pub fn new(base_url: String, context: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            context,
        }
    }
}

#[async_trait]
impl HistoryProvider for HttpHistoryProvider {
    async fn query(&self, query: &HistoryQuery) -> Result<Vec<PositionRow>, HistoryError> {
        let url = format!("{}/values", self.base_url.trim_end_matches('/'));

        debug!(
            from = %query.from,
            to = %query.to,
            path = %query.path,
            "Querying history endpoint"
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("from", query.from.to_rfc3339()),
                ("to", query.to.to_rfc3339()),
                ("context", self.context.clone()),
                ("resolution", query.resolution_seconds.to_string()),
                ("paths", format!("{}:{}", query.path, query.aggregate)),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(HistoryError::Status(response.status()));
        }

        let body: HistoryResponse = response
            .json()
            .await
            .map_err(|e| HistoryError::Decode(e.to_string()))?;

        let rows = body
            .data
            .into_iter()
            .map(|(timestamp, value)| PositionRow {
                timestamp,
                position: decode_position(&value),
            })
            .collect();

        Ok(rows)
    }
}

/// Pull a `[longitude, latitude]` pair out of a row value. Anything
/// that is not a two-element numeric array yields None, which the
/// sampler then skips.
fn decode_position(value: &Value) -> Option<[f64; 2]> {
    let pair = value.as_array()?;
    if pair.len() < 2 {
        return None;
    }
    let longitude = pair[0].as_f64()?;
    let latitude = pair[1].as_f64()?;
    Some([longitude, latitude])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_numeric_pair() {
        assert_eq!(
            decode_position(&json!([4.91, 52.35])),
            Some([4.91, 52.35])
        );
    }

    #[test]
    fn rejects_null_and_malformed_values() {
        assert_eq!(decode_position(&json!(null)), None);
        assert_eq!(decode_position(&json!([4.91])), None);
        assert_eq!(decode_position(&json!(["east", 52.35])), None);
        assert_eq!(decode_position(&json!({"lon": 4.91})), None);
    }
}
