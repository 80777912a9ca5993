use crate::problemdetails;
use axum::http::StatusCode;
use serde::Serialize;
use std::collections::BTreeMap;

pub struct ErrorBuilder {
    status: StatusCode,
    type_: Option<String>,
    title: Option<String>,
    detail: Option<String>,
    instance: Option<String>,
    values: BTreeMap<String, serde_json::Value>,
}

impl ErrorBuilder {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            type_: None,
            title: None,
            detail: None,
            instance: None,
            values: BTreeMap::new(),
        }
    }

    pub fn type_(mut self, type_: impl Into<String>) -> Self {
        self.type_ = Some(type_.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    pub fn value<T: Serialize>(mut self, key: &str, value: T) -> Self {
        if let Ok(value) = serde_json::to_value(value) {
            self.values.insert(key.to_string(), value);
        }
        self
    }

    pub fn build(self) -> problemdetails::Problem {
        let mut problem = problemdetails::new(self.status)
            .with_value("timestamp", chrono::Utc::now().to_rfc3339());

        if let Some(type_) = self.type_ {
            problem = problem.with_type(type_);
        }
        if let Some(title) = self.title {
            problem = problem.with_title(title);
        }
        if let Some(detail) = self.detail {
            problem = problem.with_detail(detail);
        }
        if let Some(instance) = self.instance {
            problem = problem.with_instance(instance);
        }

        for (key, value) in self.values {
            problem = problem.with_value(&key, value);
        }

        problem
    }
}

// Common error builders
pub fn internal_server_error() -> ErrorBuilder {
    ErrorBuilder::new(StatusCode::INTERNAL_SERVER_ERROR)
        .type_("/probs/internal-server-error")
        .title("Internal Server Error")
        .detail("An unexpected error occurred while processing your request")
        .value("error_code", "INTERNAL_SERVER_ERROR")
}

pub fn bad_request() -> ErrorBuilder {
    ErrorBuilder::new(StatusCode::BAD_REQUEST)
        .type_("/probs/bad-request")
        .title("Bad Request")
        .value("error_code", "BAD_REQUEST")
}

pub fn not_found() -> ErrorBuilder {
    ErrorBuilder::new(StatusCode::NOT_FOUND)
        .type_("/probs/not-found")
        .title("Not Found")
        .value("error_code", "NOT_FOUND")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_request_overrides_detail() {
        let problem = bad_request().detail("older_than_days must not be negative").build();
        assert_eq!(problem.status_code, StatusCode::BAD_REQUEST);
        assert_eq!(
            problem.body.get("detail").and_then(|v| v.as_str()),
            Some("older_than_days must not be negative")
        );
        assert_eq!(
            problem.body.get("error_code").and_then(|v| v.as_str()),
            Some("BAD_REQUEST")
        );
        assert!(problem.body.contains_key("timestamp"));
    }

    #[test]
    fn test_unset_fields_are_omitted() {
        let problem = ErrorBuilder::new(StatusCode::CONFLICT).build();
        assert!(!problem.body.contains_key("title"));
        assert!(!problem.body.contains_key("instance"));
    }
}
