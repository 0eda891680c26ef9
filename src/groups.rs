//! Group-based search filter.
//!
//! Resolves the caller's transitive group memberships from the identity-graph API and
//! renders them into a `search.in` filter over the permitted-groups column.

use http::header;
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::error::GraphError;

/// One group the caller belongs to. Other fields the graph returns are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMembership {
    pub id: String,
}

/// One page of `transitiveMemberOf` results.
#[derive(Debug, Deserialize)]
struct GroupPage {
    value: Vec<GroupMembership>,
    #[serde(rename = "@odata.nextLink", default)]
    next_link: Option<String>,
}

/// Resolves group memberships and renders the permitted-groups filter.
#[derive(Debug, Clone)]
pub struct GroupFilterResolver {
    client: reqwest::Client,
    endpoint: String,
    permitted_groups_column: String,
    max_pages: Option<usize>,
}

impl GroupFilterResolver {
    pub fn new(client: reqwest::Client, settings: &Settings) -> Self {
        Self {
            client,
            endpoint: settings.graph_groups_endpoint.clone(),
            permitted_groups_column: settings.permitted_groups_column.clone(),
            max_pages: settings.graph_max_pages,
        }
    }

    /// Collect every group reachable through `@odata.nextLink`, page order preserved.
    ///
    /// Starts at `page_link` when given, otherwise at the configured endpoint. A failed
    /// page is logged and ends pagination; groups from earlier pages are kept, so a
    /// failing first page yields an empty list. Duplicates are not removed.
    pub async fn fetch_groups(&self, token: &str, page_link: Option<&str>) -> Vec<GroupMembership> {
        let mut groups = Vec::new();
        let mut next = Some(page_link.unwrap_or(self.endpoint.as_str()).to_string());
        let mut pages = 0usize;

        while let Some(url) = next.take() {
            if let Some(max) = self.max_pages {
                if pages >= max {
                    tracing::warn!(
                        pages,
                        collected = groups.len(),
                        "Stopping group pagination at configured page limit"
                    );
                    break;
                }
            }

            match self.fetch_page(token, &url).await {
                Ok(page) => {
                    pages += 1;
                    tracing::debug!(page = pages, count = page.value.len(), "fetched group page");
                    groups.extend(page.value);
                    next = page.next_link;
                }
                Err(GraphError::Status { status, body }) => {
                    tracing::error!("Error fetching user groups: {} {}", status, body);
                }
                Err(e) => {
                    tracing::error!("Exception while fetching user groups: {}", e);
                }
            }
        }

        groups
    }

    /// Build `<column>/any(g:search.in(g, '<id1>, <id2>'))` for the token's groups.
    ///
    /// With no groups the expression is still rendered, with an empty id list.
    pub async fn generate_filter_string(&self, token: &str) -> String {
        let groups = self.fetch_groups(token, None).await;
        if groups.is_empty() {
            tracing::debug!("No user groups found");
        }
        render_filter(&self.permitted_groups_column, &groups)
    }

    async fn fetch_page(&self, token: &str, url: &str) -> Result<GroupPage, GraphError> {
        let resp = self
            .client
            .get(url)
            .header(header::AUTHORIZATION, format!("bearer {token}"))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GraphError::Status { status, body });
        }

        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Render the permitted-groups filter for an already resolved group list.
pub fn render_filter(column: &str, groups: &[GroupMembership]) -> String {
    let ids = groups
        .iter()
        .map(|g| g.id.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    format!("{column}/any(g:search.in(g, '{ids}'))")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(id: &str) -> GroupMembership {
        GroupMembership { id: id.into() }
    }

    #[test]
    fn renders_joined_ids() {
        let f = render_filter("group_ids", &[group("a"), group("b"), group("a")]);
        assert_eq!(f, "group_ids/any(g:search.in(g, 'a, b, a'))");
    }

    #[test]
    fn renders_empty_list() {
        assert_eq!(render_filter("col", &[]), "col/any(g:search.in(g, ''))");
    }

    #[test]
    fn page_requires_value() {
        let page: Result<GroupPage, _> =
            serde_json::from_str(r#"{"@odata.nextLink": "http://next"}"#);
        assert!(page.is_err());

        let page: GroupPage = serde_json::from_str(
            r#"{"value": [{"id": "g1", "displayName": "Team"}], "@odata.nextLink": "http://next"}"#,
        )
        .unwrap();
        assert_eq!(page.value, vec![group("g1")]);
        assert_eq!(page.next_link.as_deref(), Some("http://next"));
    }
}
