use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Server configuration, loaded from a TOML file.
///
/// ```toml
/// [storage]
/// data_dir = "/var/lib/agora"
///
/// [mail]
/// endpoint = "https://api.mailprovider.example/v1/send"
/// api_key = "..."
/// from = "notifications@agora.example"
///
/// [social]
/// site_name = "Agora"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub storage: StorageConfig,

    /// Transactional-email provider. Absent means notifications are
    /// in-app only.
    #[serde(default)]
    pub mail: Option<MailConfig>,

    #[serde(default)]
    pub social: SocialSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    pub endpoint: String,
    pub api_key: String,
    pub from: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SocialSection {
    #[serde(default = "default_site_name")]
    pub site_name: String,
}

fn default_site_name() -> String {
    "Agora".to_string()
}

impl Default for SocialSection {
    fn default() -> Self {
        Self {
            site_name: default_site_name(),
        }
    }
}

impl ServerConfig {
    /// Resolve a context name to `/etc/agora/<name>.toml`; anything
    /// containing `/` or `.` is treated as a literal path.
    pub fn resolve_path(name_or_path: &str) -> PathBuf {
        if name_or_path.contains('/') || name_or_path.contains('.') {
            PathBuf::from(name_or_path)
        } else {
            PathBuf::from(format!("/etc/agora/{name_or_path}.toml"))
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: ServerConfig = toml::from_str(&raw)?;
        Ok(config)
    }
}
