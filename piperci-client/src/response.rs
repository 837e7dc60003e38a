//! Request and response helpers shared by both clients

use reqwest::{Response, Url};
use serde::de::DeserializeOwned;

use crate::Filter;
use crate::error::{ClientError, Result};

/// Join `segments` onto `base_url`, percent-encoding each one
///
/// An id containing `/`, `?` or `#` stays a single path segment.
pub(crate) fn endpoint(base_url: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base_url)
        .map_err(|e| ClientError::InvalidArgument(format!("Invalid base URL {}: {}", base_url, e)))?;

    url.path_segments_mut()
        .map_err(|_| ClientError::InvalidArgument(format!("Invalid base URL {}", base_url)))?
        .pop_if_empty()
        .extend(segments);

    Ok(url)
}

/// Fail with [`ClientError::Remote`] unless the status is 2xx
pub(crate) async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ClientError::remote(status.as_u16(), body));
    }

    Ok(response)
}

/// Check the status code and deserialize the JSON body
pub(crate) async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T> {
    check_status(response)
        .await?
        .json()
        .await
        .map_err(|e| ClientError::Parse(format!("Failed to parse JSON response: {}", e)))
}

/// Deserialize a JSON array and keep only the elements accepted by `filter`
pub(crate) async fn handle_list_response<T: DeserializeOwned>(
    response: Response,
    filter: Option<Filter<'_, T>>,
) -> Result<Vec<T>> {
    let items: Vec<T> = handle_response(response).await?;
    Ok(apply_filter(items, filter))
}

pub(crate) fn apply_filter<T>(items: Vec<T>, filter: Option<Filter<'_, T>>) -> Vec<T> {
    match filter {
        Some(keep) => items.into_iter().filter(|item| keep(item)).collect(),
        None => items,
    }
}

/// Read a header as a string
pub(crate) fn header_str<'a>(response: &'a Response, name: &str) -> Result<&'a str> {
    response
        .headers()
        .get(name)
        .ok_or_else(|| ClientError::MissingHeader(name.to_string()))?
        .to_str()
        .map_err(|e| ClientError::Parse(format!("Header {} is not valid text: {}", name, e)))
}

/// Read a header as an unsigned count
pub(crate) fn header_count(response: &Response, name: &str) -> Result<u64> {
    let raw = header_str(response, name)?;
    raw.trim()
        .parse()
        .map_err(|_| ClientError::Parse(format!("Header {} is not a count: '{}'", name, raw)))
}
