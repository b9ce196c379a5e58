use anyhow::{anyhow, Result};
use std::io::ErrorKind;
use std::path::Path;
use tokio::io::AsyncReadExt;

const CONFIG_PATH: &str = "config.json";

/// Bot configuration from `config.json`, loaded once at startup.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct Config {
    pub sync_commands_globally: bool,
    #[serde(default)]
    pub owners: Vec<u64>,
}

impl Config {
    pub async fn load() -> Result<Self> {
        Self::load_from(Path::new(CONFIG_PATH)).await
    }

    pub async fn load_from(path: &Path) -> Result<Self> {
        let mut file = match tokio::fs::File::open(path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(anyhow!(
                    "'config.json' not found! Please add it and try again."
                ));
            }
            Err(e) => {
                return Err(anyhow!(
                    "Could not open configuration at `{}`: {}",
                    path.to_string_lossy(),
                    e
                ));
            }
        };

        let mut contents = String::new();
        file.read_to_string(&mut contents).await.map_err(|e| {
            anyhow!(
                "Could not read configuration at `{}`: {}",
                path.to_string_lossy(),
                e
            )
        })?;

        let config: Config = serde_json::from_str(&contents).map_err(|e| {
            anyhow!(
                "Could not parse configuration at `{}`: {}",
                path.to_string_lossy(),
                e
            )
        })?;

        Ok(config)
    }

    pub fn is_owner(&self, user_id: u64) -> bool {
        self.owners.contains(&user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("cogbot-{}-{}.json", name, std::process::id()))
    }

    #[tokio::test]
    async fn missing_file_yields_the_literal_message() {
        let path = temp_path("missing");
        let err = Config::load_from(&path).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "'config.json' not found! Please add it and try again."
        );
    }

    #[tokio::test]
    async fn parses_sync_flag_and_owners() {
        let path = temp_path("good");
        std::fs::write(
            &path,
            r#"{ "sync_commands_globally": true, "owners": [42, 7] }"#,
        )
        .unwrap();

        let config = Config::load_from(&path).await.unwrap();
        assert!(config.sync_commands_globally);
        assert!(config.is_owner(42));
        assert!(config.is_owner(7));
        assert!(!config.is_owner(1));

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn owners_default_to_empty() {
        let path = temp_path("no-owners");
        std::fs::write(&path, r#"{ "sync_commands_globally": false }"#).unwrap();

        let config = Config::load_from(&path).await.unwrap();
        assert!(!config.sync_commands_globally);
        assert!(!config.is_owner(42));

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn malformed_json_is_a_parse_error() {
        let path = temp_path("bad");
        std::fs::write(&path, "{ not json").unwrap();

        let err = Config::load_from(&path).await.unwrap_err();
        assert!(err.to_string().contains("Could not parse configuration"));

        let _ = std::fs::remove_file(&path);
    }
}
