use std::sync::Arc;
use std::time::Duration;

use crawlchat_logging::{chat_debug, chat_warn};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::wire::{ChatRequest, ChatResponse, CrawlRequest, CrawlResponse, StatusResponse};
use crate::{CrawlSummary, FailureKind, ServiceError, StatusReport};

/// Crawl bounds forwarded with every crawl request. `None` leaves the
/// service default in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CrawlLimits {
    pub max_depth: Option<u32>,
    pub max_pages: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// No overall deadline unless set; a stalled request stays in flight.
    pub request_timeout: Option<Duration>,
    pub crawl_limits: CrawlLimits,
    /// `name=value; name2=value2` as previously returned by
    /// [`ServiceTransport::session_cookie`].
    pub session_cookie: Option<String>,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
            crawl_limits: CrawlLimits::default(),
            session_cookie: None,
        }
    }
}

/// The three operations of the crawl/chat service.
///
/// `Err` covers both tiers: `FailureKind::Rejected` for a structured
/// `success: false`, anything else for transport trouble.
#[async_trait::async_trait]
pub trait ServiceTransport: Send + Sync {
    async fn status(&self) -> Result<StatusReport, ServiceError>;

    async fn crawl(&self, url: &str) -> Result<CrawlSummary, ServiceError>;

    async fn chat(&self, query: &str) -> Result<String, ServiceError>;

    /// Cookie header the service session is keyed on, if any.
    fn session_cookie(&self) -> Option<String> {
        None
    }
}

pub struct ReqwestTransport {
    client: reqwest::Client,
    base: Url,
    limits: CrawlLimits,
    jar: Arc<Jar>,
}

impl ReqwestTransport {
    pub fn new(settings: ServiceSettings) -> Result<Self, ServiceError> {
        let base = parse_base(&settings.base_url)?;

        let jar = Arc::new(Jar::default());
        if let Some(cookie) = settings.session_cookie.as_deref() {
            for pair in cookie.split(';').map(str::trim).filter(|p| !p.is_empty()) {
                jar.add_cookie_str(pair, &base);
            }
        }

        let mut builder = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .cookie_provider(jar.clone());
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ServiceError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            client,
            base,
            limits: settings.crawl_limits,
            jar,
        })
    }

    fn endpoint(&self, name: &str) -> Result<Url, ServiceError> {
        self.base
            .join(name)
            .map_err(|err| ServiceError::new(FailureKind::InvalidBaseUrl, err.to_string()))
    }

    async fn post<B, R>(&self, name: &str, body: &B) -> Result<R, ServiceError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self.endpoint(name)?;
        let payload = serde_json::to_string(body)
            .map_err(|err| ServiceError::new(FailureKind::InvalidRequest, err.to_string()))?;
        chat_debug!("POST {} ({} bytes)", url, payload.len());

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        read_json(response).await
    }

    async fn get<R: DeserializeOwned>(&self, name: &str) -> Result<R, ServiceError> {
        let url = self.endpoint(name)?;
        chat_debug!("GET {}", url);
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        read_json(response).await
    }
}

#[async_trait::async_trait]
impl ServiceTransport for ReqwestTransport {
    async fn status(&self) -> Result<StatusReport, ServiceError> {
        let body: StatusResponse = self.get("status").await?;
        Ok(StatusReport {
            has_documents: body.has_documents,
            crawled_url: body.crawled_url,
            pages_count: body.pages_count,
        })
    }

    async fn crawl(&self, url: &str) -> Result<CrawlSummary, ServiceError> {
        let request = CrawlRequest {
            url,
            max_depth: self.limits.max_depth,
            max_pages: self.limits.max_pages,
        };
        let body: CrawlResponse = self.post("crawl", &request).await?;
        if !body.success {
            return Err(ServiceError::rejected(body.error));
        }
        Ok(CrawlSummary {
            message: body.message,
            pages_count: body.pages_count,
        })
    }

    async fn chat(&self, query: &str) -> Result<String, ServiceError> {
        let body: ChatResponse = self.post("chat", &ChatRequest { query }).await?;
        if !body.success {
            return Err(ServiceError::rejected(body.error));
        }
        body.response.ok_or_else(|| {
            ServiceError::new(
                FailureKind::MalformedResponse { http_status: 200 },
                "success without a response field",
            )
        })
    }

    fn session_cookie(&self) -> Option<String> {
        let header = self.jar.cookies(&self.base)?;
        header.to_str().ok().map(str::to_string)
    }
}

/// Parse the base URL and make sure relative joins land below its path.
fn parse_base(raw: &str) -> Result<Url, ServiceError> {
    let mut base = Url::parse(raw.trim())
        .map_err(|err| ServiceError::new(FailureKind::InvalidBaseUrl, err.to_string()))?;
    if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
        return Err(ServiceError::new(
            FailureKind::InvalidBaseUrl,
            format!("not an http(s) base url: {raw}"),
        ));
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base)
}

/// The JSON body decides success, whatever the HTTP status says.
async fn read_json<R: DeserializeOwned>(response: reqwest::Response) -> Result<R, ServiceError> {
    let status = response.status();
    let text = response.text().await.map_err(map_reqwest_error)?;
    serde_json::from_str(&text).map_err(|err| {
        chat_warn!("unparseable reply (http {}): {}", status, err);
        ServiceError::new(
            FailureKind::MalformedResponse {
                http_status: status.as_u16(),
            },
            err.to_string(),
        )
    })
}

fn map_reqwest_error(err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        return ServiceError::new(FailureKind::Timeout, err.to_string());
    }
    ServiceError::new(FailureKind::Network, err.to_string())
}
