//! JSON bodies exchanged with the service.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct CrawlRequest<'a> {
    pub url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_pages: Option<u32>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub query: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CrawlResponse {
    pub success: bool,
    pub message: Option<String>,
    pub error: Option<String>,
    pub pages_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    pub success: bool,
    pub response: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusResponse {
    pub has_documents: bool,
    pub crawled_url: Option<String>,
    pub pages_count: Option<u32>,
}
