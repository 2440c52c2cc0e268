use crate::adapters::default_plans;
use crate::domain::model::Plan;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, SiteError};
use crate::utils::logger::LogFormat;
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Upper bound on `reviews.public_limit`.
pub const MAX_PUBLIC_LIMIT: usize = 100;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub catalog: CatalogConfig,
    pub reviews: ReviewsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    /// Empty means any origin may call the API.
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:3001".to_string(),
            allowed_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Sqlite,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub path: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSource {
    #[default]
    Static,
    Storage,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub source: CatalogSource,
    /// Static plans; the built-in tiers are used when empty.
    pub plans: Vec<Plan>,
}

impl CatalogConfig {
    pub fn plans_or_default(&self) -> Vec<Plan> {
        if self.plans.is_empty() {
            default_plans()
        } else {
            self.plans.clone()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewsConfig {
    pub default_author: String,
    pub public_limit: usize,
}

impl Default for ReviewsConfig {
    fn default() -> Self {
        Self {
            default_author: "Anonymous".to_string(),
            public_limit: 10,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub verbose: bool,
    pub format: LogFormat,
}

impl SiteConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SiteError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SiteError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SiteError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_socket_addr("server.bind", &self.server.bind)?;

        for origin in &self.server.allowed_origins {
            validation::validate_origin("server.allowed_origins", origin)?;
        }

        if self.storage.backend == StorageBackend::Sqlite {
            let path = validation::validate_required_field("storage.path", &self.storage.path)?;
            validation::validate_db_path("storage.path", path)?;
        }

        if self.catalog.source == CatalogSource::Storage && !self.catalog.plans.is_empty() {
            return Err(SiteError::InvalidConfigValueError {
                field: "catalog.plans".to_string(),
                value: format!("{} plans", self.catalog.plans.len()),
                reason: "Static plans cannot be combined with a storage-backed catalog"
                    .to_string(),
            });
        }
        validation::validate_unique(
            "catalog.plans",
            self.catalog.plans.iter().map(|p| p.name.as_str()),
        )?;

        validation::validate_display_name(
            "reviews.default_author",
            &self.reviews.default_author,
        )?;
        validation::validate_limit(
            "reviews.public_limit",
            self.reviews.public_limit,
            MAX_PUBLIC_LIMIT,
        )?;

        Ok(())
    }
}

impl ConfigProvider for SiteConfig {
    fn bind_address(&self) -> &str {
        &self.server.bind
    }

    fn allowed_origins(&self) -> &[String] {
        &self.server.allowed_origins
    }

    fn default_author(&self) -> &str {
        &self.reviews.default_author
    }

    fn public_review_limit(&self) -> usize {
        self.reviews.public_limit
    }
}

impl Validate for SiteConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
