//! tRPC adapter
//!
//! Homarr's tRPC endpoints live under `/api/trpc/{procedure}` and wrap every
//! payload in a superjson envelope:
//!
//! - input: `{"json": <value>}`, URL-encoded into `?input=` for queries and
//!   sent as the body for mutations
//! - success: `{"result":{"data":{"json": <value>}}}`
//! - failure: `{"error":{"json":{"message": <string>, "code": <int>}}}`,
//!   possibly with HTTP 200
//!
//! The envelope never leaves this module: callers get the unwrapped payload
//! or an error.

use super::http::{sanitize_for_log, AuthMode, RawResponse, Transport};
use crate::error::{HomarrError, RemoteError, Result};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const TRPC_PREFIX: &str = "/api/trpc/";

/// Request-side wrapper
#[derive(Debug, Serialize)]
pub struct TrpcInput<'a, T: ?Sized> {
    pub json: &'a T,
}

/// Response-side wrapper
#[derive(Debug, Default, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub result: Option<EnvelopeResult>,
    #[serde(default)]
    pub error: Option<EnvelopeError>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EnvelopeResult {
    #[serde(default)]
    pub data: EnvelopeData,
}

#[derive(Debug, Default, Deserialize)]
pub struct EnvelopeData {
    // `undefined` results drop the key entirely
    #[serde(default)]
    pub json: Value,
}

#[derive(Debug, Deserialize)]
pub struct EnvelopeError {
    pub json: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub code: Option<i64>,
}

/// Serialize `{"json": input}` for a query string or request body
pub fn encode_input<T>(input: &T) -> Result<String>
where
    T: Serialize + ?Sized,
{
    serde_json::to_string(&TrpcInput { json: input })
        .map_err(|e| HomarrError::decode("tRPC input", e))
}

/// Path for a query, with the input envelope URL-encoded into `?input=`
pub fn query_path(procedure: &str, input: Option<&Value>) -> Result<String> {
    let mut path = format!("{TRPC_PREFIX}{procedure}");
    if let Some(input) = input {
        let encoded = encode_input(input)?;
        path.push_str("?input=");
        path.push_str(&urlencoding::encode(&encoded));
    }
    Ok(path)
}

/// Unwrap an envelope into its payload.
///
/// The error branch wins regardless of HTTP status. A non-2xx response that
/// is not an envelope at all is reported with its status and raw body.
pub fn decode_envelope(procedure: &str, response: &RawResponse) -> Result<Value> {
    let status_error = || {
        HomarrError::from(RemoteError::Status {
            status: response.status.as_u16(),
            body: response.body_text(),
        })
    };

    let envelope: Envelope = match serde_json::from_slice(&response.body) {
        Ok(envelope) => envelope,
        Err(_) if !response.status.is_success() => return Err(status_error()),
        Err(e) => return Err(HomarrError::decode(format!("{procedure} response"), e)),
    };

    if let Some(error) = envelope.error {
        tracing::error!(
            "tRPC error on {}: {}",
            procedure,
            sanitize_for_log(&error.json.message)
        );
        return Err(RemoteError::Rpc {
            message: error.json.message,
            code: error.json.code,
        }
        .into());
    }

    match envelope.result {
        Some(result) => Ok(result.data.json),
        None if !response.status.is_success() => Err(status_error()),
        None => Err(HomarrError::decode(
            format!("{procedure} response"),
            serde::de::Error::custom("envelope has neither result nor error"),
        )),
    }
}

/// tRPC view over a [`Transport`]
#[derive(Clone, Copy)]
pub struct TrpcApi<'a> {
    transport: &'a Transport,
}

impl<'a> TrpcApi<'a> {
    pub fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// GET a procedure. Without input the bare procedure path is used.
    pub async fn query(&self, procedure: &str, input: Option<&Value>) -> Result<Value> {
        let path = query_path(procedure, input)?;
        let response = self
            .transport
            .send(Method::GET, &path, AuthMode::Rpc, None)
            .await?;
        decode_envelope(procedure, &response)
    }

    /// POST a procedure with `{"json": input}` as the body
    pub async fn mutate<I>(&self, procedure: &str, input: &I) -> Result<Value>
    where
        I: Serialize + ?Sized,
    {
        let body = encode_input(input)?.into_bytes();
        let path = format!("{TRPC_PREFIX}{procedure}");
        let response = self
            .transport
            .send(Method::POST, &path, AuthMode::Rpc, Some(body))
            .await?;
        decode_envelope(procedure, &response)
    }
}
