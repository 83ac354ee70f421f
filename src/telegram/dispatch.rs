//! Request encoding and transport.
//!
//! Each endpoint maps to one of two wire shapes: a query-string `GET` or a
//! `multipart/form-data` `POST`. Responses are buffered in full and parsed
//! as JSON; the envelope is not inspected.

use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use serde_json::Value;
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

use super::endpoint::{Endpoint, Transport};
use super::media::{FileBody, FilePart, ResolvedField};
use super::TelegramError;

/// Sends requests for one bot.
pub struct Dispatcher {
    http: Client,
    base_url: String,
    log_url: String,
}

impl Dispatcher {
    /// Creates a dispatcher for `<api_url>/bot<token>/`.
    pub fn new(http: Client, api_url: &str, token: &str) -> Self {
        let api_url = api_url.trim_end_matches('/');
        Self {
            http,
            base_url: format!("{api_url}/bot{token}/"),
            log_url: format!("{api_url}/bot{}/", mask_token(token)),
        }
    }

    /// Full URL of an endpoint.
    pub fn endpoint_url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.name())
    }

    /// Sends `fields` to `endpoint` using the endpoint's transport.
    pub async fn dispatch(
        &self,
        endpoint: Endpoint,
        fields: Vec<(String, ResolvedField)>,
    ) -> Result<Value, TelegramError> {
        debug!(
            "Dispatching {} via {:?} to {}{} (fields: {:?})",
            endpoint,
            endpoint.transport(),
            self.log_url,
            endpoint.name(),
            fields.iter().map(|(name, _)| name.as_str()).collect::<Vec<_>>()
        );

        let body = match endpoint.transport() {
            Transport::Query => self.query_get(endpoint, fields).await?,
            Transport::Multipart => self.multipart_post(endpoint, fields).await?,
        };

        parse_body(endpoint, &body)
    }

    /// Issues a `GET` with the fields in the query string and returns the
    /// raw response text.
    pub async fn query_get(
        &self,
        endpoint: Endpoint,
        fields: Vec<(String, ResolvedField)>,
    ) -> Result<String, TelegramError> {
        let pairs = fields
            .into_iter()
            .map(|(name, field)| match field {
                ResolvedField::Text(value) => Ok((name, value)),
                ResolvedField::File(part) => Err(TelegramError::UnsupportedMediaInput(format!(
                    "{endpoint} cannot upload {} in field {name}",
                    part.file_name
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut request = self.http.get(self.endpoint_url(endpoint));
        if !pairs.is_empty() {
            request = request.query(&pairs);
        }

        let response = request.send().await.inspect_err(|e| {
            warn!("{} request failed: {}", endpoint, e);
        })?;
        debug!("{} responded with status {}", endpoint, response.status());

        Ok(response.text().await?)
    }

    /// Issues a multipart `POST` and returns the raw response text.
    pub async fn multipart_post(
        &self,
        endpoint: Endpoint,
        fields: Vec<(String, ResolvedField)>,
    ) -> Result<String, TelegramError> {
        let form = build_form(fields)?;

        let response = self
            .http
            .post(self.endpoint_url(endpoint))
            .multipart(form)
            .send()
            .await
            .inspect_err(|e| {
                warn!("{} request failed: {}", endpoint, e);
            })?;
        debug!("{} responded with status {}", endpoint, response.status());

        Ok(response.text().await?)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("base_url", &self.log_url)
            .finish_non_exhaustive()
    }
}

fn build_form(fields: Vec<(String, ResolvedField)>) -> Result<Form, TelegramError> {
    let mut form = Form::new();
    for (name, field) in fields {
        form = match field {
            ResolvedField::Text(value) => form.text(name, value),
            ResolvedField::File(part) => form.part(name, file_part(part)?),
        };
    }
    Ok(form)
}

fn file_part(part: FilePart) -> Result<Part, TelegramError> {
    let body = match part.body {
        FileBody::Bytes(data) => Part::bytes(data),
        FileBody::Reader(reader) => Part::stream(Body::wrap_stream(ReaderStream::new(reader))),
    };

    Ok(body.file_name(part.file_name).mime_str(part.content_type)?)
}

fn parse_body(endpoint: Endpoint, body: &str) -> Result<Value, TelegramError> {
    serde_json::from_str(body).map_err(|e| {
        warn!(
            "{} returned a non-JSON body: \"{}\"",
            endpoint,
            truncate_for_log(body, 80)
        );
        TelegramError::MalformedResponse(e)
    })
}

/// Masks a bot token for logging (keeps the bot id before the colon).
pub(crate) fn mask_token(token: &str) -> String {
    match token.split_once(':') {
        Some((bot_id, _)) if !bot_id.is_empty() => format!("{bot_id}:***"),
        _ => "***".to_owned(),
    }
}

/// Truncates a string for logging purposes.
pub(crate) fn truncate_for_log(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_owned()
    } else {
        format!("{}...", s.chars().take(max_len).collect::<String>())
    }
}
