//! Harvest types

use crate::error::{Error, Result};
use crate::http::RawResponse;
use serde_json::Value;

/// One successful fetch from the remote source
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Records in source order
    pub records: Vec<Value>,
    /// Total records the source reports for the window
    pub total_available: u64,
    /// Offset this page was requested at
    pub offset_requested: u64,
}

impl Page {
    /// Decode a 200 response body
    ///
    /// The body must be an object carrying an array under `records_field`
    /// and a non-negative integer under `total_field`.
    pub fn decode(
        body: &str,
        records_field: &str,
        total_field: &str,
        offset_requested: u64,
    ) -> Result<Self> {
        let mut document: Value = serde_json::from_str(body)
            .map_err(|e| Error::malformed_response(format!("invalid JSON: {e}")))?;

        let object = document
            .as_object_mut()
            .ok_or_else(|| Error::malformed_response("body is not a JSON object"))?;

        let total_available = object
            .get(total_field)
            .and_then(Value::as_u64)
            .ok_or_else(|| {
                Error::malformed_response(format!("missing integer field '{total_field}'"))
            })?;

        let records = match object.remove(records_field) {
            Some(Value::Array(records)) => records,
            Some(_) => {
                return Err(Error::malformed_response(format!(
                    "field '{records_field}' is not an array"
                )))
            }
            None => {
                return Err(Error::malformed_response(format!(
                    "missing array field '{records_field}'"
                )))
            }
        };

        Ok(Self {
            records,
            total_available,
            offset_requested,
        })
    }
}

/// Classification of one request's result
#[derive(Debug)]
pub enum FetchOutcome {
    /// HTTP 200 with a well-formed body
    Success(Page),
    /// HTTP 403: cool down and retry the same offset
    RateLimited,
    /// Any other status, a transport failure or a malformed body
    TransientError(Error),
}

impl FetchOutcome {
    /// Classify a fetch result
    pub fn classify(
        result: Result<RawResponse>,
        records_field: &str,
        total_field: &str,
        offset: u64,
    ) -> Result<Self> {
        let response = match result {
            Ok(response) => response,
            Err(e) if e.is_retryable() => return Ok(Self::TransientError(e)),
            Err(e) => return Err(e),
        };

        Ok(match response.status {
            200 => match Page::decode(&response.body, records_field, total_field, offset) {
                Ok(page) => Self::Success(page),
                Err(e) => Self::TransientError(e),
            },
            403 => Self::RateLimited,
            status => Self::TransientError(Error::http_status(status, response.body)),
        })
    }
}

/// Counters accumulated over a harvest run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HarvestStats {
    /// Windows fully drained
    pub windows: u32,
    /// Successful pages
    pub pages: u64,
    /// Records delivered
    pub records: u64,
    /// 403 responses absorbed
    pub rate_limited: u64,
    /// Transient failures absorbed
    pub transient_failures: u64,
}
