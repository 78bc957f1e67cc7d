//! Text blocklist management.

use std::time::Duration;

use cogforge_core::{CogError, CogResult, ServiceClient, ServiceCredentials};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::client::{API_VERSION, SERVICE_NAME};
use crate::models::{BlocklistUpsert, TextBlocklist, TextBlocklistItem};

/// One page of a listing; `nextLink` is absolute when present.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Page<T> {
    #[serde(default = "Vec::new")]
    value: Vec<T>,
    #[serde(default)]
    next_link: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemsEnvelope {
    blocklist_items: Vec<TextBlocklistItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RemoveItems<'a> {
    blocklist_item_ids: &'a [String],
}

#[derive(Debug, Clone)]
pub struct BlocklistClient {
    http: ServiceClient,
}

/// Names travel in the URL path, so keep them to a safe alphabet.
fn check_name(name: &str) -> CogResult<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~'));
    if valid {
        Ok(())
    } else {
        Err(CogError::invalid_request(format!(
            "invalid blocklist name '{name}'"
        )))
    }
}

fn blocklist_path(name: &str, suffix: &str) -> String {
    format!("/contentsafety/text/blocklists/{name}{suffix}?api-version={API_VERSION}")
}

impl BlocklistClient {
    pub fn new(endpoint: &str, api_key: &str) -> CogResult<Self> {
        Ok(Self {
            http: ServiceClient::new(SERVICE_NAME, endpoint, api_key)?,
        })
    }

    pub fn from_credentials(credentials: &ServiceCredentials) -> CogResult<Self> {
        Ok(Self {
            http: ServiceClient::from_credentials(SERVICE_NAME, credentials)?,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = self.http.with_timeout(timeout);
        self
    }

    /// `PATCH /contentsafety/text/blocklists/{name}`
    pub async fn create_or_update_blocklist(
        &self,
        name: &str,
        description: &str,
    ) -> CogResult<BlocklistUpsert> {
        check_name(name)?;
        let operation = "create or update blocklist";
        let resp = self
            .http
            .patch_json_response(
                operation,
                &blocklist_path(name, ""),
                &serde_json::json!({ "description": description }),
            )
            .await?;
        let created = resp.status() == StatusCode::CREATED;
        let blocklist: TextBlocklist = self.http.read_json(operation, resp).await?;
        info!(blocklist = name, created, "Blocklist upserted");
        Ok(BlocklistUpsert { blocklist, created })
    }

    /// `POST /contentsafety/text/blocklists/{name}:addOrUpdateBlocklistItems`
    pub async fn add_or_update_items(
        &self,
        name: &str,
        items: &[TextBlocklistItem],
    ) -> CogResult<Vec<TextBlocklistItem>> {
        check_name(name)?;
        if items.is_empty() {
            return Err(CogError::invalid_request("no blocklist items to add"));
        }
        let body = ItemsEnvelope {
            blocklist_items: items.to_vec(),
        };
        let added: ItemsEnvelope = self
            .http
            .post_json(
                "add blocklist items",
                &blocklist_path(name, ":addOrUpdateBlocklistItems"),
                &body,
            )
            .await?;
        info!(blocklist = name, count = added.blocklist_items.len(), "Blocklist items added");
        Ok(added.blocklist_items)
    }

    /// `GET /contentsafety/text/blocklists`, following `nextLink`.
    pub async fn list_blocklists(&self) -> CogResult<Vec<TextBlocklist>> {
        self.collect_pages(
            "list blocklists",
            format!("/contentsafety/text/blocklists?api-version={API_VERSION}"),
        )
        .await
    }

    /// `GET /contentsafety/text/blocklists/{name}/blocklistItems`, following `nextLink`.
    pub async fn list_items(&self, name: &str) -> CogResult<Vec<TextBlocklistItem>> {
        check_name(name)?;
        self.collect_pages("list blocklist items", blocklist_path(name, "/blocklistItems"))
            .await
    }

    /// `POST /contentsafety/text/blocklists/{name}:removeBlocklistItems`
    pub async fn remove_items(&self, name: &str, item_ids: &[String]) -> CogResult<()> {
        check_name(name)?;
        if item_ids.is_empty() {
            return Ok(());
        }
        self.http
            .post_json_response(
                "remove blocklist items",
                &blocklist_path(name, ":removeBlocklistItems"),
                &RemoveItems {
                    blocklist_item_ids: item_ids,
                },
            )
            .await?;
        info!(blocklist = name, count = item_ids.len(), "Blocklist items removed");
        Ok(())
    }

    /// `DELETE /contentsafety/text/blocklists/{name}`
    pub async fn delete_blocklist(&self, name: &str) -> CogResult<()> {
        check_name(name)?;
        self.http
            .delete("delete blocklist", &blocklist_path(name, ""))
            .await?;
        info!(blocklist = name, "Blocklist deleted");
        Ok(())
    }

    async fn collect_pages<T>(&self, operation: &str, first: String) -> CogResult<Vec<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut out = Vec::new();
        let mut next = Some(first);
        while let Some(url) = next {
            let page: Page<T> = self.http.get_json(operation, &url).await?;
            debug!(operation, items = page.value.len(), "Fetched page");
            out.extend(page.value);
            next = page.next_link.filter(|link| !link.is_empty());
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ContentSafetyClient;
    use crate::models::AnalyzeTextOptions;
    use crate::samples::{BLOCKLIST_DESCRIPTION, BLOCKLIST_ITEMS, BLOCKLIST_NAME, BLOCKLIST_TEXT};
    use serde_json::json;
    use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn rejects_unsafe_names() {
        assert!(check_name("ProhibitStockAnalysis").is_ok());
        assert!(check_name("a/b").is_err());
        assert!(check_name("").is_err());
    }

    #[tokio::test]
    async fn create_reports_created_status() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path(format!("/contentsafety/text/blocklists/{BLOCKLIST_NAME}")))
            .and(header("Content-Type", "application/merge-patch+json"))
            .and(body_json(json!({"description": BLOCKLIST_DESCRIPTION})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "blocklistName": BLOCKLIST_NAME,
                "description": BLOCKLIST_DESCRIPTION
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = BlocklistClient::new(&server.uri(), "k").unwrap();
        let upsert = client
            .create_or_update_blocklist(BLOCKLIST_NAME, BLOCKLIST_DESCRIPTION)
            .await
            .unwrap();
        assert!(upsert.created);
        assert_eq!(upsert.blocklist.blocklist_name, BLOCKLIST_NAME);
    }

    #[tokio::test]
    async fn listing_follows_next_link() {
        let server = MockServer::start().await;
        let next = format!("{}/contentsafety/text/blocklists/page2", server.uri());
        Mock::given(method("GET"))
            .and(path("/contentsafety/text/blocklists"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": [{"blocklistName": "first", "description": "one"}],
                "nextLink": next
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/contentsafety/text/blocklists/page2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": [{"blocklistName": "second"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = BlocklistClient::new(&server.uri(), "k").unwrap();
        let lists = client.list_blocklists().await.unwrap();
        let names: Vec<_> = lists.iter().map(|l| l.blocklist_name.as_str()).collect();
        assert_eq!(names, ["first", "second"]);
        assert_eq!(lists[1].description, None);
    }

    #[tokio::test]
    async fn removes_items_by_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!(
                "/contentsafety/text/blocklists/{BLOCKLIST_NAME}:removeBlocklistItems"
            )))
            .and(body_json(json!({"blocklistItemIds": ["id-1"]})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = BlocklistClient::new(&server.uri(), "k").unwrap();
        client
            .remove_items(BLOCKLIST_NAME, &["id-1".to_string()])
            .await
            .unwrap();
    }

    /// Create the stock-analysis blocklist, fill it, then analyze text against it.
    #[tokio::test]
    async fn blocklist_end_to_end() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path(format!("/contentsafety/text/blocklists/{BLOCKLIST_NAME}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "blocklistName": BLOCKLIST_NAME,
                "description": BLOCKLIST_DESCRIPTION
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(format!(
                "/contentsafety/text/blocklists/{BLOCKLIST_NAME}:addOrUpdateBlocklistItems"
            )))
            .and(body_partial_json(json!({
                "blocklistItems": [
                    {"text": "Stock"},
                    {"text": "Fundamentals"},
                    {"text": "Market Analysis"},
                    {"text": "Investment Strategy"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "blocklistItems": [
                    {"blocklistItemId": "id-1", "text": "Stock"},
                    {"blocklistItemId": "id-2", "text": "Fundamentals"},
                    {"blocklistItemId": "id-3", "text": "Market Analysis"},
                    {"blocklistItemId": "id-4", "text": "Investment Strategy"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/contentsafety/text:analyze"))
            .and(query_param("api-version", API_VERSION))
            .and(body_json(json!({
                "text": BLOCKLIST_TEXT,
                "blocklistNames": [BLOCKLIST_NAME],
                "haltOnBlocklistHit": true,
                "outputType": "FourSeverityLevels"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "blocklistsMatch": [
                    {"blocklistName": BLOCKLIST_NAME, "blocklistItemId": "id-1", "blocklistItemText": "Stock"},
                    {"blocklistName": BLOCKLIST_NAME, "blocklistItemId": "id-2", "blocklistItemText": "Fundamentals"}
                ],
                "categoriesAnalysis": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let blocklists = BlocklistClient::new(&server.uri(), "k").unwrap();
        let upsert = blocklists
            .create_or_update_blocklist(BLOCKLIST_NAME, BLOCKLIST_DESCRIPTION)
            .await
            .unwrap();
        assert!(!upsert.created);

        let items: Vec<_> = BLOCKLIST_ITEMS.iter().map(|t| TextBlocklistItem::new(*t)).collect();
        let added = blocklists.add_or_update_items(BLOCKLIST_NAME, &items).await.unwrap();
        assert!(added.iter().all(|i| i.blocklist_item_id.is_some()));

        let client = ContentSafetyClient::new(&server.uri(), "k").unwrap();
        let result = client
            .analyze_text(&AnalyzeTextOptions::new(BLOCKLIST_TEXT).with_blocklists([BLOCKLIST_NAME], true))
            .await
            .unwrap();
        let matched: Vec<_> = result
            .blocklists_match
            .iter()
            .map(|m| m.blocklist_item_text.as_str())
            .collect();
        assert!(!matched.is_empty());
        assert!(matched.contains(&"Stock"));
        assert!(matched.contains(&"Fundamentals"));
    }
}
