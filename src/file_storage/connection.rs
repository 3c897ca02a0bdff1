//! # Azure Storage Connection Strings
//!
//! Parses the `Key=Value;Key=Value` form handed out by the Azure portal.
//! Keys are case-insensitive; values are split at the first `=` so base64
//! account keys survive intact.

use std::fmt;

use super::errors::{StorageError, StorageResult};

/// Parsed storage connection string
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ConnectionString {
    pub protocol: Option<String>,
    pub account_name: Option<String>,
    account_key: Option<String>,
    shared_access_signature: Option<String>,
    pub endpoint_suffix: Option<String>,
    pub blob_endpoint: Option<String>,
    pub use_development_storage: bool,
}

impl ConnectionString {
    /// Parse and validate a connection string
    pub fn parse(raw: &str) -> StorageResult<Self> {
        let mut parsed = ConnectionString::default();

        for pair in raw.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            // The segment itself is not echoed, it may be a secret
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                StorageError::InvalidConnectionString("segment without '='".to_string())
            })?;
            let value = value.trim().to_string();

            match key.trim().to_ascii_lowercase().as_str() {
                "defaultendpointsprotocol" => parsed.protocol = Some(value),
                "accountname" => parsed.account_name = Some(value),
                "accountkey" => parsed.account_key = Some(value),
                "sharedaccesssignature" => parsed.shared_access_signature = Some(value),
                "endpointsuffix" => parsed.endpoint_suffix = Some(value),
                "blobendpoint" => parsed.blob_endpoint = Some(value),
                "usedevelopmentstorage" => {
                    parsed.use_development_storage = value.eq_ignore_ascii_case("true")
                }
                // Queue/table/file endpoints and the like do not concern blobs
                _ => {}
            }
        }

        parsed.validate()?;
        Ok(parsed)
    }

    fn validate(&self) -> StorageResult<()> {
        if self.use_development_storage {
            return Ok(());
        }

        match self.account_name.as_deref() {
            None | Some("") => {
                return Err(StorageError::InvalidConnectionString(
                    "AccountName is required".to_string(),
                ))
            }
            Some(_) => {}
        }

        if self.account_key.is_none() && self.shared_access_signature.is_none() {
            return Err(StorageError::InvalidConnectionString(
                "AccountKey or SharedAccessSignature is required".to_string(),
            ));
        }

        Ok(())
    }

    pub fn account_key(&self) -> Option<&str> {
        self.account_key.as_deref()
    }

    pub fn shared_access_signature(&self) -> Option<&str> {
        self.shared_access_signature.as_deref()
    }

    /// Blob service endpoint, if the connection string pins one.
    ///
    /// An explicit `BlobEndpoint` wins; otherwise the endpoint is derived
    /// from `EndpointSuffix` (sovereign clouds). `None` means the public
    /// cloud default.
    pub fn blob_endpoint(&self) -> Option<String> {
        if let Some(endpoint) = &self.blob_endpoint {
            return Some(endpoint.trim_end_matches('/').to_string());
        }

        let suffix = self.endpoint_suffix.as_deref()?;
        let account = self.account_name.as_deref()?;
        let protocol = self.protocol.as_deref().unwrap_or("https");
        Some(format!("{}://{}.blob.{}", protocol, account, suffix))
    }
}

impl fmt::Debug for ConnectionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted = |v: &Option<String>| v.as_ref().map(|_| "***REDACTED***");
        f.debug_struct("ConnectionString")
            .field("protocol", &self.protocol)
            .field("account_name", &self.account_name)
            .field("account_key", &redacted(&self.account_key))
            .field("shared_access_signature", &redacted(&self.shared_access_signature))
            .field("endpoint_suffix", &self.endpoint_suffix)
            .field("blob_endpoint", &self.blob_endpoint)
            .field("use_development_storage", &self.use_development_storage)
            .finish()
    }
}
