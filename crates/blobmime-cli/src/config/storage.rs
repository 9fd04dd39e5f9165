//! Storage account and container configuration.

use std::fmt;

use anyhow::{Result as AnyhowResult, anyhow};
use clap::Args;

use crate::prompt::{Prompt, PromptError};

/// Azure Storage containers that do not follow the regular naming rules.
const RESERVED_CONTAINERS: &[&str] = &["$root", "$web", "$logs"];

/// Storage account and container selection.
///
/// # Environment Variables
///
/// - `AZURE_STORAGE_CONNECTION_STRING` - Storage account connection string
/// - `AZURE_STORAGE_CONTAINER` - Container name
/// - `BLOBMIME_PREFIX` - Only inspect blobs whose name starts with this string
#[derive(Clone, Default, Args)]
#[must_use = "config does nothing unless you use it"]
pub struct StorageConfig {
    /// Storage account connection string.
    ///
    /// Prompted for when omitted.
    #[arg(long, env = "AZURE_STORAGE_CONNECTION_STRING", hide_env_values = true)]
    pub connection: Option<String>,

    /// Blob container name.
    ///
    /// Prompted for when omitted.
    #[arg(long, env = "AZURE_STORAGE_CONTAINER")]
    pub container: Option<String>,

    /// Only inspect blobs whose name starts with this string.
    ///
    /// Matched as plain text, not by path segment: `img` also selects
    /// `img-1.png` and `images/a.png`.
    #[arg(long, env = "BLOBMIME_PREFIX")]
    pub prefix: Option<String>,
}

impl StorageConfig {
    /// Validates the values that were provided up front.
    ///
    /// # Errors
    ///
    /// Returns an error if the container name breaks Azure naming rules.
    pub fn validate(&self) -> AnyhowResult<()> {
        if let Some(container) = &self.container {
            validate_container_name(container)?;
        }
        Ok(())
    }

    /// Fills in missing values by asking the user.
    ///
    /// # Errors
    ///
    /// Returns an error if the prompt is cancelled or the entered container
    /// name is invalid.
    pub fn resolve(self, prompt: &mut impl Prompt) -> AnyhowResult<ResolvedStorage> {
        let connection = match non_blank(self.connection) {
            Some(connection) => connection,
            None => ask_non_blank(prompt, "Enter Azure Storage Account connection string: ")?,
        };

        let container = match non_blank(self.container) {
            Some(container) => container,
            None => ask_non_blank(prompt, "Enter container name: ")?,
        };
        validate_container_name(&container)?;

        Ok(ResolvedStorage {
            connection,
            container,
            prefix: non_blank(self.prefix).unwrap_or_default(),
        })
    }
}

impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageConfig")
            .field("connection", &self.connection.as_ref().map(|_| "<redacted>"))
            .field("container", &self.container)
            .field("prefix", &self.prefix)
            .finish()
    }
}

/// Storage settings after prompting, all present.
#[derive(Clone)]
pub struct ResolvedStorage {
    /// Storage account connection string.
    pub connection: String,
    /// Blob container name.
    pub container: String,
    /// Key prefix, empty for the whole container.
    pub prefix: String,
}

impl fmt::Debug for ResolvedStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedStorage")
            .field("connection", &"<redacted>")
            .field("container", &self.container)
            .field("prefix", &self.prefix)
            .finish()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn ask_non_blank(prompt: &mut impl Prompt, question: &str) -> Result<String, PromptError> {
    loop {
        let answer = prompt.ask(question)?;
        let answer = answer.trim();
        if !answer.is_empty() {
            return Ok(answer.to_string());
        }
    }
}

/// Checks a container name against the Azure naming rules: 3-63 characters,
/// lowercase letters, digits and single hyphens, starting and ending with a
/// letter or digit.
fn validate_container_name(name: &str) -> AnyhowResult<()> {
    if RESERVED_CONTAINERS.contains(&name) {
        return Ok(());
    }

    if !(3..=63).contains(&name.len()) {
        return Err(anyhow!(
            "Container name '{name}' must be between 3 and 63 characters long."
        ));
    }

    let valid_chars = name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !valid_chars || name.starts_with('-') || name.ends_with('-') || name.contains("--") {
        return Err(anyhow!(
            "Container name '{name}' may only contain lowercase letters, digits and single hyphens, and must start and end with a letter or digit."
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::Scripted;

    #[test]
    fn container_names() {
        assert!(validate_container_name("assets").is_ok());
        assert!(validate_container_name("web-assets-01").is_ok());
        assert!(validate_container_name("$web").is_ok());

        assert!(validate_container_name("ab").is_err());
        assert!(validate_container_name("Assets").is_err());
        assert!(validate_container_name("-assets").is_err());
        assert!(validate_container_name("web--assets").is_err());
        assert!(validate_container_name("web_assets").is_err());
    }

    #[test]
    fn resolve_prompts_for_missing_values() {
        let mut prompt = Scripted::new(["", "  AccountName=acct;AccountKey=abc ", "assets"]);
        let resolved = StorageConfig::default().resolve(&mut prompt).unwrap();

        assert_eq!(resolved.connection, "AccountName=acct;AccountKey=abc");
        assert_eq!(resolved.container, "assets");
        assert_eq!(resolved.prefix, "");
        assert_eq!(prompt.asked(), 3);
    }

    #[test]
    fn resolve_keeps_provided_values() {
        let config = StorageConfig {
            connection: Some("UseDevelopmentStorage=true".into()),
            container: Some("assets".into()),
            prefix: Some("img/".into()),
        };
        let mut prompt = Scripted::new::<[&str; 0]>([]);
        let resolved = config.resolve(&mut prompt).unwrap();

        assert_eq!(resolved.container, "assets");
        assert_eq!(resolved.prefix, "img/");
        assert_eq!(prompt.asked(), 0);
    }

    #[test]
    fn resolve_rejects_invalid_prompted_container() {
        let config = StorageConfig {
            connection: Some("UseDevelopmentStorage=true".into()),
            ..Default::default()
        };
        let mut prompt = Scripted::new(["Not_Valid"]);
        assert!(config.resolve(&mut prompt).is_err());
    }

    #[test]
    fn cancelled_prompt_is_an_error() {
        let mut prompt = Scripted::new::<[&str; 0]>([]);
        let err = StorageConfig::default().resolve(&mut prompt).unwrap_err();
        assert!(err.downcast_ref::<PromptError>().is_some());
    }

    #[test]
    fn debug_redacts_connection_string() {
        let config = StorageConfig {
            connection: Some("AccountKey=secret".into()),
            ..Default::default()
        };
        assert!(!format!("{config:?}").contains("secret"));
    }
}
