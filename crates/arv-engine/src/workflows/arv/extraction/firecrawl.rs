use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ExtractionSchema, ScrapeError, ScrapeGateway, ScrapedPage};

/// Firecrawl `/scrape` client requesting JSON extraction plus markdown.
#[derive(Clone)]
pub struct FirecrawlGateway {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScrapeRequest<'a> {
    url: &'a str,
    formats: [&'static str; 2],
    json_options: JsonOptions<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOptions<'a> {
    schema: &'a Value,
    system_prompt: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct ScrapeResponse {
    success: bool,
    data: Option<ScrapeData>,
}

#[derive(Deserialize)]
struct ScrapeData {
    #[serde(default, alias = "llm_extraction")]
    json: Option<Value>,
    #[serde(default)]
    markdown: Option<String>,
}

impl FirecrawlGateway {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ScrapeError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

impl std::fmt::Debug for FirecrawlGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirecrawlGateway")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ScrapeGateway for FirecrawlGateway {
    async fn scrape(
        &self,
        url: &str,
        schema: &ExtractionSchema,
    ) -> Result<ScrapedPage, ScrapeError> {
        let request = ScrapeRequest {
            url,
            formats: ["json", "markdown"],
            json_options: JsonOptions {
                schema: &schema.schema,
                system_prompt: &schema.system_prompt,
                prompt: &schema.prompt,
            },
        };

        let response = self
            .client
            .post(format!("{}/scrape", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| ScrapeError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScrapeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: ScrapeResponse = response
            .json()
            .await
            .map_err(|err| ScrapeError::Decode(err.to_string()))?;

        if !payload.success {
            return Err(ScrapeError::Unsuccessful {
                url: url.to_string(),
            });
        }

        Ok(payload
            .data
            .map(|data| ScrapedPage {
                extracted: data.json.filter(|value| !value.is_null()),
                markdown: data.markdown,
            })
            .unwrap_or_default())
    }
}
