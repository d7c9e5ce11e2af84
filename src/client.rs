use anyhow::{Context, Result, bail};
use log::{debug, info};
use reqwest::blocking::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::aggregation::SearchResponse;

/// One row of `GET /_cat/indices?format=json`. The server may omit the name
/// for broken indices, so it stays optional.
#[derive(Debug, Deserialize)]
pub struct IndexRecord {
    #[serde(default)]
    pub index: Option<String>,
    #[serde(default)]
    pub health: Option<String>,
    #[serde(rename = "docs.count", default)]
    pub docs_count: Option<String>,
}

/// Thin blocking client for the cluster's REST API. Only the endpoints the
/// probe flow needs are modeled; everything else is out of scope.
pub struct SearchClient {
    base_url: String,
    http: Client,
}

impl SearchClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = Client::builder()
            .build()
            .context("building HTTP client")?;

        Ok(SearchClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// `PUT /{index}/_create/{id}`. With `refresh`, the document is visible
    /// to searches as soon as the call returns.
    pub fn create_document<T: Serialize>(
        &self,
        index: &str,
        id: &str,
        document: &T,
        refresh: bool,
    ) -> Result<()> {
        let url = format!("{}/{}/_create/{}", self.base_url, index, id);
        let mut request = self.http.put(&url).json(document);
        if refresh {
            request = request.query(&[("refresh", "true")]);
        }

        let response = request.send().with_context(|| format!("PUT {url}"))?;
        check_status(response, "create document")?;
        debug!("created document {id} in {index}");
        Ok(())
    }

    /// `POST /{index}/_search` with `size: 0`, carrying a single named
    /// aggregation. Hits are suppressed; only aggregates come back.
    pub fn search_aggregation(
        &self,
        index: &str,
        name: &str,
        aggregation: &Value,
    ) -> Result<SearchResponse> {
        let url = format!("{}/{}/_search", self.base_url, index);
        let body = json!({
            "size": 0,
            "aggs": { name: aggregation },
        });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .with_context(|| format!("POST {url}"))?;
        let response = check_status(response, "search")?;
        response.json().context("decoding search response")
    }

    /// `GET /_cat/indices?format=json&expand_wildcards=all`, so hidden and
    /// dot-prefixed indices show up too.
    pub fn list_indices(&self) -> Result<Vec<IndexRecord>> {
        let url = format!("{}/_cat/indices", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("format", "json"), ("expand_wildcards", "all")])
            .send()
            .with_context(|| format!("GET {url}"))?;
        let response = check_status(response, "list indices")?;
        response.json().context("decoding index listing")
    }

    pub fn delete_index(&self, name: &str) -> Result<()> {
        let url = format!("{}/{}", self.base_url, name);
        let response = self
            .http
            .delete(&url)
            .send()
            .with_context(|| format!("DELETE {url}"))?;
        check_status(response, "delete index")?;
        Ok(())
    }

    /// Deletes every index on the cluster except the ones named in `keep`.
    /// Returns how many indices were deleted.
    pub fn purge_indices(&self, keep: &[&str]) -> Result<usize> {
        let mut deleted = 0;
        for record in self.list_indices()? {
            let Some(name) = record.index else { continue };
            if keep.contains(&name.as_str()) {
                continue;
            }
            self.delete_index(&name)?;
            info!("deleted index {name}");
            deleted += 1;
        }
        Ok(deleted)
    }
}

fn check_status(response: Response, action: &str) -> Result<Response> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        bail!("{action} failed with status {status}: {body}");
    }
    Ok(response)
}
