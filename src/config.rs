use crate::variant::Category;

/// Server configuration parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server listen port.
    pub port: u16,
    /// Server bind host.
    pub host: String,
    /// Category used when a request does not name one.
    pub default_category: Category,
}

impl AppConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        let defaults = AppConfig::default();
        AppConfig {
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            host: std::env::var("HOST").unwrap_or(defaults.host),
            default_category: std::env::var("CHESS_DEFAULT_CATEGORY")
                .map(|v| Category::from(v.as_str()))
                .unwrap_or(defaults.default_category),
        }
    }

    /// Socket address string for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            port: 8083,
            host: "0.0.0.0".to_string(),
            default_category: Category::Standard,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = AppConfig::default();
        assert_eq!(config.port, 8083);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.default_category, Category::Standard);
        assert_eq!(config.bind_addr(), "0.0.0.0:8083");
    }

    #[test]
    fn from_env_defaults() {
        // Without setting env vars, should fall back to defaults
        let config = AppConfig::from_env();
        assert_eq!(config.port, 8083);
        assert_eq!(config.host, "0.0.0.0");
    }
}
