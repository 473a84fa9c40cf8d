use std::{collections::BTreeMap, time::Duration};

use reqwest::Method;
use serde_json::Value;

/// Minimum time the loading state stays visible when nothing else is asked for.
pub const DEFAULT_MIN_DISPLAY: Duration = Duration::from_millis(1000);

/// Options applied to a single request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestConfig {
    pub method: Method,
    /// Header name → value. Kept ordered so two configs compare by value.
    pub headers: BTreeMap<String, String>,
    pub query: Vec<(String, String)>,
    pub json_body: Option<Value>,
    pub timeout: Option<Duration>,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: BTreeMap::new(),
            query: Vec::new(),
            json_body: None,
            timeout: None,
        }
    }
}

impl RequestConfig {
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_json_body(mut self, body: Value) -> Self {
        self.json_body = Some(body);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// The inputs a controller observes. A new request is issued whenever any of
/// the three fields changes by value.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub resource: String,
    pub config: RequestConfig,
    pub min_display: Duration,
}

impl FetchRequest {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            config: RequestConfig::default(),
            min_display: DEFAULT_MIN_DISPLAY,
        }
    }

    pub fn with_config(mut self, config: RequestConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_min_display(mut self, min_display: Duration) -> Self {
        self.min_display = min_display;
        self
    }

    /// An empty resource means "no request issued".
    pub fn is_empty(&self) -> bool {
        self.resource.trim().is_empty()
    }
}

/// What an observer sees. The variants are mutually exclusive, so `data` and
/// `error` can never both be present.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Success(Value),
    Failure(String),
}

impl FetchState {
    pub fn data(&self) -> Option<&Value> {
        match self {
            FetchState::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchState::Failure(message) => Some(message.as_str()),
            _ => None,
        }
    }

    /// True once a request has either succeeded or failed.
    pub fn is_settled(&self) -> bool {
        matches!(self, FetchState::Success(_) | FetchState::Failure(_))
    }
}
