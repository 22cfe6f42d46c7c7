use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};
use crate::models::{Person, TimeEntryDraft};

const USER_AGENT: &str = concat!("timebridge/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// The destination time-tracking service, as the pipeline sees it.
pub trait TimeEntryService {
    fn get_person(&self, id: &str) -> Result<Person>;

    /// Create a time entry and return the id the service assigned to it.
    fn create_time_entry(&self, entry: &TimeEntryDraft) -> Result<String>;
}

#[derive(Deserialize)]
struct PersonEnvelope {
    person: Person,
}

#[derive(Serialize)]
struct TimeEntryEnvelope<'a> {
    #[serde(rename = "time-entry")]
    entry: &'a TimeEntryDraft,
}

#[derive(Deserialize)]
struct CreateResponse {
    #[serde(rename = "STATUS", default)]
    status: String,
    #[serde(rename = "MESSAGE", default)]
    message: String,
    #[serde(rename = "timeLogId", default)]
    time_log_id: String,
}

pub fn decode_person(body: &str) -> Result<Person> {
    let envelope: PersonEnvelope = serde_json::from_str(body)?;
    Ok(envelope.person)
}

pub fn encode_time_entry(entry: &TimeEntryDraft) -> Result<String> {
    Ok(serde_json::to_string(&TimeEntryEnvelope { entry })?)
}

pub fn decode_create_response(body: &str) -> Result<String> {
    let res: CreateResponse = serde_json::from_str(body)?;
    if res.status != "OK" {
        let message = if res.message.is_empty() {
            format!("time entry rejected (status {})", res.status)
        } else {
            res.message
        };
        return Err(BridgeError::Remote(message));
    }
    if res.time_log_id.is_empty() {
        return Err(BridgeError::Remote("response did not include a time log id".into()));
    }
    Ok(res.time_log_id)
}

/// Teamwork v1 REST client. The API key goes out as the basic-auth user.
pub struct TeamworkClient {
    http: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
}

impl TeamworkClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        if base_url.trim().is_empty() {
            return Err(BridgeError::Settings(
                "no API URL configured. Run `timebridge init --api-url <url>`.".into(),
            ));
        }
        let http = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn check_status(response: reqwest::blocking::Response) -> Result<String> {
        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(BridgeError::Remote(format!(
                "API error {}: {}",
                status.as_u16(),
                body.trim()
            )));
        }
        Ok(body)
    }
}

impl TimeEntryService for TeamworkClient {
    fn get_person(&self, id: &str) -> Result<Person> {
        let url = format!("{}/people/{}.json", self.base_url, id);
        log::debug!("GET {url}");
        let response = self
            .http
            .get(&url)
            .basic_auth(&self.api_key, Some("x"))
            .send()?;
        let body = Self::check_status(response)?;
        decode_person(&body)
    }

    fn create_time_entry(&self, entry: &TimeEntryDraft) -> Result<String> {
        let url = format!("{}/tasks/{}/time_entries.json", self.base_url, entry.task_id);
        log::debug!("POST {url}");
        let response = self
            .http
            .post(&url)
            .basic_auth(&self.api_key, Some("x"))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(encode_time_entry(entry)?)
            .send()
            .map_err(|e| BridgeError::Remote(e.to_string()))?;
        let body = Self::check_status(response)?;
        decode_create_response(&body)
    }
}
