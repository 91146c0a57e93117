//! Configuration types for the VidispineClient.

use migration_shared::Page;

/// How the page window is encoded on search requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEncoding {
    /// `;first=N;number=M` appended to the path. Required by 4.x and older.
    MatrixParams,
    /// `first=N&number=M` appended to the query string. Supported from 5.x.
    QueryParams,
}

impl PageEncoding {
    /// Pick the encoding for a server generation.
    pub fn for_server(v4_compatible: bool) -> Self {
        if v4_compatible {
            PageEncoding::MatrixParams
        } else {
            PageEncoding::QueryParams
        }
    }

    /// Apply the page window to a request path and raw query string.
    ///
    /// Returns the new `(path, query)` pair.
    pub fn apply(&self, path: &str, query: &str, page: Page) -> (String, String) {
        match self {
            PageEncoding::MatrixParams => (
                format!("{};first={};number={}", path, page.offset, page.size),
                query.to_string(),
            ),
            PageEncoding::QueryParams => {
                let window = format!("first={}&number={}", page.offset, page.size);
                let query = if query.is_empty() {
                    window
                } else {
                    format!("{}&{}", query, window)
                };
                (path.to_string(), query)
            }
        }
    }
}

/// Connection settings for a Vidispine server.
#[derive(Debug, Clone)]
pub struct VidispineConfig {
    /// Base URL, e.g. `http://localhost:8080`.
    pub base_url: String,
    pub user: String,
    pub password: String,
    /// Whether the server only understands matrix-parameter pagination.
    pub v4_compatible: bool,
}

impl VidispineConfig {
    pub fn new(
        base_url: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            user: user.into(),
            password: password.into(),
            v4_compatible: true,
        }
    }

    /// Set server compatibility mode.
    pub fn with_v4_compatible(mut self, v4_compatible: bool) -> Self {
        self.v4_compatible = v4_compatible;
        self
    }

    pub fn page_encoding(&self) -> PageEncoding {
        PageEncoding::for_server(self.v4_compatible)
    }
}

impl Default for VidispineConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080", "admin", "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_params_go_on_the_path() {
        let page = Page::new(21, 10).unwrap();
        let (path, query) =
            PageEncoding::MatrixParams.apply("/API/collection", "content=metadata", page);
        assert_eq!(path, "/API/collection;first=21;number=10");
        assert_eq!(query, "content=metadata");
    }

    #[test]
    fn test_query_params_go_on_the_query() {
        let page = Page::new(21, 10).unwrap();
        let (path, query) =
            PageEncoding::QueryParams.apply("/API/collection", "content=metadata", page);
        assert_eq!(path, "/API/collection");
        assert_eq!(query, "content=metadata&first=21&number=10");

        let (_, query) = PageEncoding::QueryParams.apply("/API/item", "", page);
        assert_eq!(query, "first=21&number=10");
    }

    #[test]
    fn test_encoding_follows_compat_flag() {
        let config = VidispineConfig::default();
        assert_eq!(config.page_encoding(), PageEncoding::MatrixParams);
        let config = config.with_v4_compatible(false);
        assert_eq!(config.page_encoding(), PageEncoding::QueryParams);
    }
}
