use clap::Args;

use crate::domain::DEFAULT_PAGE_SIZE;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_CHANNEL_CAPACITY: usize = 32;

/// Settings for a [`CatalogSystem`](super::CatalogSystem).
///
/// Meant to be flattened into a host's clap parser; every option can also
/// come from the environment.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct CatalogConfig {
    /// Root URL of the catalog REST API
    #[arg(long, env = "CATALOG_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Rows per page in the product table
    #[arg(long, env = "CATALOG_PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE,
          value_parser = clap::value_parser!(u32).range(1..))]
    pub page_size: u32,

    /// Mailbox size of each service
    #[arg(long, env = "CATALOG_CHANNEL_CAPACITY", default_value_t = DEFAULT_CHANNEL_CAPACITY)]
    pub channel_capacity: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl CatalogConfig {
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct Host {
        #[command(flatten)]
        config: CatalogConfig,
    }

    #[test]
    fn test_flags_override_defaults() {
        let host = Host::try_parse_from([
            "catalog",
            "--api-url",
            "http://catalog.test/api",
            "--page-size",
            "25",
        ])
        .unwrap();
        assert_eq!(host.config.api_url, "http://catalog.test/api");
        assert_eq!(host.config.page_size, 25);
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        assert!(Host::try_parse_from(["catalog", "--page-size", "0"]).is_err());
    }
}
