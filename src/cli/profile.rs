use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Settings persisted between CLI invocations in `~/.fedhub/profile.json`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Profile {
    pub endpoint: Option<String>,
}

impl Profile {
    pub fn load() -> anyhow::Result<Self> {
        let profile_path = Profile::build_config_path()?;

        if !profile_path.exists() {
            return Ok(Profile::default());
        }

        let profile_json = fs::read_to_string(profile_path)?;

        let profile: Profile = serde_json::from_str(&profile_json)?;

        Ok(profile)
    }

    fn build_config_path() -> anyhow::Result<PathBuf> {
        let mut path =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("could not locate home directory"))?;

        path.push(".fedhub");
        path.push("profile.json");

        Ok(path)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let profile_path = Profile::build_config_path()?;

        if let Some(parent) = profile_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let profile_json = serde_json::to_string_pretty(&self)?;

        Ok(fs::write(&profile_path, profile_json)?)
    }
}
