//! Azure Storage account connection strings.
//!
//! A connection string is a `;`-separated list of `Key=Value` settings as
//! shown in the Azure portal, e.g.
//!
//! ```text
//! DefaultEndpointsProtocol=https;AccountName=acct;AccountKey=...;EndpointSuffix=core.windows.net
//! ```
//!
//! Keys are matched case-insensitively and values may themselves contain `=`
//! (base64 account keys, SAS tokens).

use std::str::FromStr;

use super::AzureCredentials;
use crate::types::Error;

const LABEL: &str = "connection-string";
const DEFAULT_ENDPOINT_SUFFIX: &str = "core.windows.net";

/// Parsed Azure Storage connection string.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ConnectionString {
    /// `DefaultEndpointsProtocol`, `https` when absent.
    pub protocol: Option<String>,
    /// `AccountName`.
    pub account_name: Option<String>,
    /// `AccountKey`.
    pub account_key: Option<String>,
    /// `SharedAccessSignature`.
    pub shared_access_signature: Option<String>,
    /// `BlobEndpoint`, overrides the endpoint derived from the account name.
    pub blob_endpoint: Option<String>,
    /// `EndpointSuffix`, e.g. `core.chinacloudapi.cn`.
    pub endpoint_suffix: Option<String>,
    /// `UseDevelopmentStorage=true`.
    pub use_development_storage: bool,
}

impl ConnectionString {
    /// Converts the parsed settings into credentials for `container`.
    ///
    /// # Errors
    ///
    /// Returns an error when neither an account name nor development storage
    /// is configured, or when no account key or SAS token is present.
    pub fn into_credentials(self, container: impl Into<String>) -> Result<AzureCredentials, Error> {
        let container = container.into();

        if self.use_development_storage {
            return Ok(AzureCredentials {
                container,
                use_emulator: true,
                ..Default::default()
            });
        }

        let endpoint = self.endpoint();
        let Some(account_name) = self.account_name else {
            return Err(Error::config("missing AccountName", LABEL));
        };

        if self.account_key.is_none() && self.shared_access_signature.is_none() {
            return Err(Error::config(
                "either AccountKey or SharedAccessSignature is required",
                LABEL,
            ));
        }

        Ok(AzureCredentials {
            container,
            account_name,
            access_key: self.account_key,
            sas_token: self.shared_access_signature,
            endpoint,
            use_emulator: false,
        })
    }

    /// Blob endpoint to use instead of the public-cloud default, if any.
    fn endpoint(&self) -> Option<String> {
        if let Some(endpoint) = &self.blob_endpoint {
            return Some(endpoint.trim_end_matches('/').to_string());
        }

        let suffix = self.endpoint_suffix.as_deref()?;
        if suffix.eq_ignore_ascii_case(DEFAULT_ENDPOINT_SUFFIX) {
            return None;
        }

        let account = self.account_name.as_deref()?;
        let protocol = self.protocol.as_deref().unwrap_or("https");
        Some(format!("{protocol}://{account}.blob.{suffix}"))
    }
}

impl FromStr for ConnectionString {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parsed = Self::default();

        for segment in s.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            let Some((key, value)) = segment.split_once('=') else {
                return Err(Error::config(
                    format!("malformed setting '{}'", redact_segment(segment)),
                    LABEL,
                ));
            };
            let value = value.trim().to_string();

            match key.trim().to_ascii_lowercase().as_str() {
                "defaultendpointsprotocol" => parsed.protocol = Some(value.to_ascii_lowercase()),
                "accountname" => parsed.account_name = Some(value),
                "accountkey" => parsed.account_key = Some(value),
                "sharedaccesssignature" => parsed.shared_access_signature = Some(value),
                "blobendpoint" => parsed.blob_endpoint = Some(value),
                "endpointsuffix" => parsed.endpoint_suffix = Some(value),
                "usedevelopmentstorage" => {
                    parsed.use_development_storage = value.eq_ignore_ascii_case("true");
                }
                // Queue/table/file endpoints and other settings do not apply to blobs.
                _ => {}
            }
        }

        if parsed == Self::default() {
            return Err(Error::config("connection string is empty", LABEL));
        }

        Ok(parsed)
    }
}

impl std::fmt::Debug for ConnectionString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionString")
            .field("protocol", &self.protocol)
            .field("account_name", &self.account_name)
            .field("account_key", &self.account_key.as_ref().map(|_| "<redacted>"))
            .field(
                "shared_access_signature",
                &self.shared_access_signature.as_ref().map(|_| "<redacted>"),
            )
            .field("blob_endpoint", &self.blob_endpoint)
            .field("endpoint_suffix", &self.endpoint_suffix)
            .field("use_development_storage", &self.use_development_storage)
            .finish()
    }
}

/// Keeps at most the first few characters of an unparsable segment, which
/// may be a pasted secret.
fn redact_segment(segment: &str) -> String {
    let head: String = segment.chars().take(4).collect();
    if head.len() < segment.len() {
        format!("{head}...")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUBLIC: &str = "DefaultEndpointsProtocol=https;AccountName=acct;AccountKey=a2V5PT0=;EndpointSuffix=core.windows.net";

    #[test]
    fn parses_public_cloud() {
        let parsed: ConnectionString = PUBLIC.parse().unwrap();
        assert_eq!(parsed.account_name.as_deref(), Some("acct"));
        assert_eq!(parsed.account_key.as_deref(), Some("a2V5PT0="));
        assert_eq!(parsed.protocol.as_deref(), Some("https"));

        let creds = parsed.into_credentials("assets").unwrap();
        assert_eq!(creds.container, "assets");
        assert_eq!(creds.account_name, "acct");
        assert_eq!(creds.endpoint, None);
        assert!(!creds.use_emulator);
    }

    #[test]
    fn keys_are_case_insensitive() {
        let parsed: ConnectionString = "accountname=acct;ACCOUNTKEY=abc".parse().unwrap();
        assert_eq!(parsed.account_name.as_deref(), Some("acct"));
        assert_eq!(parsed.account_key.as_deref(), Some("abc"));
    }

    #[test]
    fn sovereign_cloud_suffix_sets_endpoint() {
        let creds = AzureCredentials::from_connection_string(
            "AccountName=acct;AccountKey=abc;EndpointSuffix=core.chinacloudapi.cn",
            "assets",
        )
        .unwrap();
        assert_eq!(
            creds.endpoint.as_deref(),
            Some("https://acct.blob.core.chinacloudapi.cn")
        );
    }

    #[test]
    fn blob_endpoint_wins() {
        let creds = AzureCredentials::from_connection_string(
            "BlobEndpoint=http://127.0.0.1:10000/acct/;AccountName=acct;SharedAccessSignature=sv=2022-11-02&sig=x%2By",
            "assets",
        )
        .unwrap();
        assert_eq!(creds.endpoint.as_deref(), Some("http://127.0.0.1:10000/acct"));
        assert_eq!(creds.sas_token.as_deref(), Some("sv=2022-11-02&sig=x%2By"));
        assert_eq!(creds.access_key, None);
    }

    #[test]
    fn development_storage() {
        let creds =
            AzureCredentials::from_connection_string("UseDevelopmentStorage=true", "assets")
                .unwrap();
        assert!(creds.use_emulator);
        assert_eq!(creds.container, "assets");
    }

    #[test]
    fn missing_account_name() {
        let err = AzureCredentials::from_connection_string("AccountKey=abc", "assets").unwrap_err();
        assert!(err.to_string().contains("AccountName"));
    }

    #[test]
    fn missing_credential() {
        let err = AzureCredentials::from_connection_string("AccountName=acct", "assets").unwrap_err();
        assert!(err.to_string().contains("AccountKey"));
    }

    #[test]
    fn malformed_segment_is_redacted() {
        let err = "AccountName=acct;supersecretvalue"
            .parse::<ConnectionString>()
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("supe..."));
        assert!(!message.contains("supersecretvalue"));
    }

    #[test]
    fn empty_string_is_rejected() {
        assert!(" ; ".parse::<ConnectionString>().is_err());
    }

    #[test]
    fn debug_redacts_secrets() {
        let parsed: ConnectionString = PUBLIC.parse().unwrap();
        assert!(!format!("{parsed:?}").contains("a2V5PT0="));
    }
}
