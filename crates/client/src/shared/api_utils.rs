//! Helpers for talking to the backend API: URL construction and response
//! decoding shared by the per-aggregate clients.

use serde::de::DeserializeOwned;

use crate::shared::error::ApiError;

/// Build a query string from key/value pairs.
///
/// Pairs with an empty value are dropped entirely, so an unset filter never
/// reaches the backend as `key=`. Values are percent-encoded, keys are
/// expected to be plain identifiers.
pub fn build_query(params: &[(String, String)]) -> String {
    params
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Append a query string to a URL, skipping the `?` when there is nothing
/// to append.
pub fn with_query(url: &str, query: &str) -> String {
    if query.is_empty() {
        url.to_string()
    } else {
        format!("{}?{}", url, query)
    }
}

/// Check the status of a response and decode its JSON body.
///
/// Non-success statuses become [`ApiError`]s carrying whatever message the
/// body held. Decode failures log a preview of the body (up to 500 chars)
/// so a malformed payload can be diagnosed from the logs.
pub async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    context: &str,
) -> Result<T, ApiError> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::error!("{} failed with status {}: {}", context, status, body);
        return Err(ApiError::from_status(status, &body));
    }

    let body = response.text().await?;
    match serde_json::from_str::<T>(&body) {
        Ok(value) => Ok(value),
        Err(e) => {
            let preview: String = body.chars().take(500).collect();
            let preview = if preview.len() < body.len() {
                format!("{}...", preview)
            } else {
                preview
            };
            tracing::error!("Failed to parse {} response: {}. Body: {}", context, e, preview);
            Err(ApiError::server(format!(
                "Failed to parse {} response: {}",
                context, e
            )))
        }
    }
}

/// Check the status of a response whose body carries nothing useful.
pub async fn read_ok(response: reqwest::Response, context: &str) -> Result<(), ApiError> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::error!("{} failed with status {}: {}", context, status, body);
        return Err(ApiError::from_status(status, &body));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_values_are_dropped() {
        let query = build_query(&pairs(&[("delivery_status", ""), ("page", "2")]));
        assert_eq!(query, "page=2");
    }

    #[test]
    fn test_values_are_encoded() {
        let query = build_query(&pairs(&[("q", "red shirt & tie")]));
        assert_eq!(query, "q=red%20shirt%20%26%20tie");
    }

    #[test]
    fn test_with_query_skips_empty() {
        assert_eq!(with_query("http://x/api/order", ""), "http://x/api/order");
        assert_eq!(
            with_query("http://x/api/order", "page=1&limit=10"),
            "http://x/api/order?page=1&limit=10"
        );
    }
}
