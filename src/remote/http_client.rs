use super::*;

/// Compatibility marker the store requires on version endpoints.
pub const PROTOCOL_VERSION_HEADER: &str = "x-protocol-version";
pub const PROTOCOL_VERSION: &str = "2";

/// HTTP-level rejection by the store, kept typed so callers can classify failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unauthorized (sign in or refresh the token)")]
    Unauthorized,
    #[error("forbidden (insufficient permissions)")]
    Forbidden,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("rejected by store ({status}): {message}")]
    Rejected { status: u16, message: String },
}

impl StoreError {
    fn from_response(resp: reqwest::blocking::Response) -> Self {
        let status = resp.status();
        let message = resp
            .json::<serde_json::Value>()
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
        match status {
            reqwest::StatusCode::UNAUTHORIZED => StoreError::Unauthorized,
            reqwest::StatusCode::FORBIDDEN => StoreError::Forbidden,
            reqwest::StatusCode::NOT_FOUND => StoreError::NotFound(message),
            _ => StoreError::Rejected {
                status: status.as_u16(),
                message,
            },
        }
    }
}

impl RemoteClient {
    pub(super) fn ensure_ok(
        &self,
        resp: reqwest::blocking::Response,
        label: &str,
    ) -> Result<reqwest::blocking::Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }
        let err = StoreError::from_response(resp);
        tracing::debug!(label, error = %err, "store rejected request");
        Err(anyhow::Error::new(err).context(label.to_string()))
    }

    /// Attaches the bearer token as it is at send time; anonymous requests go out bare.
    pub(super) fn authorize(
        &self,
        req: reqwest::blocking::RequestBuilder,
    ) -> reqwest::blocking::RequestBuilder {
        match self.credentials.bearer_token() {
            Some(token) => req.header(reqwest::header::AUTHORIZATION, format!("Bearer {}", token)),
            None => req,
        }
    }

    pub(super) fn url(&self, endpoint: &[&str], path: &LogicalPath) -> Result<url::Url> {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| anyhow::anyhow!("store url cannot be a base: {}", self.base))?;
            segments.pop_if_empty();
            segments.extend(endpoint);
            segments.extend(path.store_segments());
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> RemoteClient {
        RemoteClient::new(base, Arc::new(Anonymous)).unwrap()
    }

    #[test]
    fn urls_drop_root_marker_and_escape_segments() {
        let c = client("http://localhost:8080/rest-file-server/rest/");
        let root = LogicalPath::root();
        assert_eq!(
            c.url(&["list"], &root).unwrap().as_str(),
            "http://localhost:8080/rest-file-server/rest/list"
        );
        let p = root.child("my docs").unwrap().child("a#1.txt").unwrap();
        assert_eq!(
            c.url(&["version", "info"], &p).unwrap().as_str(),
            "http://localhost:8080/rest-file-server/rest/version/info/my%20docs/a%231.txt"
        );
    }

    #[test]
    fn base_without_trailing_slash_still_nests() {
        let c = client("http://127.0.0.1:9000/api");
        let p = LogicalPath::parse("./a").unwrap();
        assert_eq!(
            c.url(&["download"], &p).unwrap().as_str(),
            "http://127.0.0.1:9000/api/download/a"
        );
    }
}
