//! Wire contract of the content-extraction service.
//!
//! The service takes a URL plus a list of named prompts and returns, for
//! each prompt, the text it extracted along with every outbound link it saw
//! on the page. [`PageExtract`] is the typed view the crawler works with;
//! defaulting and malformed-link handling happen here so the scheduler
//! never touches the raw response.

use crate::error::Result;
use crate::result::LinkCandidate;
use futures::future::BoxFuture;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

pub const TITLE_PROMPT: &str = "Article title";
pub const INTRODUCTION_PROMPT: &str = "Article introduction";
pub const KEY_CONCEPTS_PROMPT: &str = "Key concepts";
pub const TEXT_PROMPT: &str = "Article text";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionRequest {
    pub url: String,
    pub element_prompts: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_for: Option<WaitFor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goto_options: Option<GotoOptions>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaitFor {
    pub mode: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GotoOptions {
    /// Page load timeout in milliseconds
    pub timeout: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_until: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractionResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<ExtractedField>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub link: Vec<RawLink>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractedField {
    pub key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<FieldResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldResult {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLink {
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// Treats an explicit `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Anything that can run an extraction request. Implemented by
/// [`crate::client::ScrapeClient`] and by in-memory fakes in tests.
pub trait Extractor: Send + Sync {
    fn extract<'a>(&'a self, request: &'a ExtractionRequest)
    -> BoxFuture<'a, Result<ExtractionResponse>>;
}

/// Request template: which prompts to send and how the page should load.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionProfile {
    pub prompts: Vec<String>,
    pub content_selector: Option<String>,
    pub load_timeout_ms: u64,
    pub navigation_mode: Option<String>,
}

impl ExtractionProfile {
    /// Full request used for every page on the first attempt.
    pub fn primary() -> Self {
        Self {
            prompts: vec![
                TITLE_PROMPT.to_string(),
                INTRODUCTION_PROMPT.to_string(),
                KEY_CONCEPTS_PROMPT.to_string(),
            ],
            content_selector: Some("#content".to_string()),
            load_timeout_ms: 12_000,
            navigation_mode: Some("domcontentloaded".to_string()),
        }
    }

    /// Reduced request used once for a failed seed page: fewer prompts,
    /// no selector wait and a longer load timeout.
    pub fn retry() -> Self {
        Self {
            prompts: vec![TITLE_PROMPT.to_string(), TEXT_PROMPT.to_string()],
            content_selector: None,
            load_timeout_ms: 15_000,
            navigation_mode: None,
        }
    }

    pub fn request(&self, url: &str) -> ExtractionRequest {
        ExtractionRequest {
            url: url.to_string(),
            element_prompts: self.prompts.clone(),
            wait_for: self.content_selector.as_ref().map(|selector| WaitFor {
                mode: "selector".to_string(),
                value: selector.clone(),
            }),
            goto_options: Some(GotoOptions {
                timeout: self.load_timeout_ms,
                wait_until: self.navigation_mode.clone(),
            }),
        }
    }
}

impl Default for ExtractionProfile {
    fn default() -> Self {
        Self::primary()
    }
}

/// Typed view of one extraction response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageExtract {
    pub fields: HashMap<String, Option<String>>,
    pub links: Vec<LinkCandidate>,
}

impl PageExtract {
    /// Maps a raw response. A prompt's value is the first result's text;
    /// empty text counts as missing. Links without an href are dropped.
    pub fn from_response(response: ExtractionResponse) -> Self {
        let mut fields: HashMap<String, Option<String>> = HashMap::new();

        for field in response.data {
            let value = field
                .results
                .into_iter()
                .next()
                .and_then(|r| r.text)
                .filter(|text| !text.is_empty());

            // first non-empty answer for a key wins
            let slot = fields.entry(field.key).or_insert(None);
            if slot.is_none() {
                *slot = value;
            }
        }

        let links = response
            .link
            .into_iter()
            .filter_map(|raw| {
                let href = raw.href.filter(|h| !h.is_empty())?;
                Some(LinkCandidate::new(href, raw.text.unwrap_or_default()))
            })
            .collect();

        Self { fields, links }
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(|v| v.as_deref())
    }

    pub fn field_or(&self, key: &str, default: &str) -> String {
        self.field(key).unwrap_or(default).to_string()
    }
}
