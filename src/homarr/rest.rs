//! REST adapter
//!
//! Plain JSON over verb-per-path endpoints, authenticated with the API key.
//! Errors are signalled by status code and surface from the transport.

use super::http::{AuthMode, Transport};
use crate::error::{HomarrError, Result};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

/// REST view over a [`Transport`]
#[derive(Clone, Copy)]
pub struct RestApi<'a> {
    transport: &'a Transport,
}

impl<'a> RestApi<'a> {
    pub fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// GET `path` and return the parsed body
    pub async fn query(&self, path: &str) -> Result<Value> {
        let response = self
            .transport
            .send(Method::GET, path, AuthMode::Rest, None)
            .await?;
        parse_body(path, &response.body)
    }

    /// Send `input` as the JSON body with the given verb.
    ///
    /// An empty response body (PATCH and DELETE reply with none) yields
    /// `Value::Null`.
    pub async fn mutate<I>(&self, method: Method, path: &str, input: Option<&I>) -> Result<Value>
    where
        I: Serialize + ?Sized,
    {
        let body = input
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|e| HomarrError::decode(format!("request body for {method} {path}"), e))?;

        let response = self
            .transport
            .send(method, path, AuthMode::Rest, body)
            .await?;
        parse_body(path, &response.body)
    }
}

fn parse_body(path: &str, body: &[u8]) -> Result<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|e| HomarrError::decode(format!("response from {path}"), e))
}
