use crate::PaginationResult;
use serde::{Deserialize, Serialize};

/// Default number of items per page.
pub const DEFAULT_PER_PAGE: u64 = 15;

/// Default query-string name of the page parameter.
pub const DEFAULT_PAGE_NAME: &str = "page";

/// Engine configuration.
///
/// The column names here are the aliases every default union branch
/// projects, and the names the engine reads back from paged rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginatorConfig {
    /// Page size used by `paginate_default`.
    pub per_page: u64,
    /// Page parameter name used by `paginate_default`.
    pub page_name: String,
    /// Alias of the primary key column in the union.
    pub id_column: String,
    /// Alias of the literal discriminator column in the union.
    pub discriminator_column: String,
    pub created_at_column: String,
    pub updated_at_column: String,
    /// Column ordered on when no explicit ordering is set (newest first).
    /// Unset means `created_at_column`.
    pub default_order: Option<String>,
    /// Base path for page URLs. No URLs are produced without one.
    pub path: Option<String>,
}

impl Default for PaginatorConfig {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            page_name: DEFAULT_PAGE_NAME.to_string(),
            id_column: "id".to_string(),
            discriminator_column: "type".to_string(),
            created_at_column: "created_at".to_string(),
            updated_at_column: "updated_at".to_string(),
            default_order: None,
            path: None,
        }
    }
}

impl PaginatorConfig {
    /// Loads a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> PaginationResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The column `latest`, `oldest` and the default ordering sort on.
    #[must_use]
    pub fn order_column(&self) -> &str {
        self.default_order.as_deref().unwrap_or(&self.created_at_column)
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_per_page(mut self, per_page: u64) -> Self {
        self.per_page = per_page;
        self
    }
}
