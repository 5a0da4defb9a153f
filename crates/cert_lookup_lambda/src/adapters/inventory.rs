use std::fs;
use std::path::PathBuf;

use cert_lookup_core::contract::CertificateSummary;

/// Source of issued certificates, in the order the backing service returns them.
pub trait CertificateInventory {
    fn list_issued_certificates(&self) -> Result<Vec<CertificateSummary>, String>;
}

/// Reads a JSON array of `{"DomainName", "CertificateArn"}` objects from disk.
///
/// Entries are taken as already issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCertificateInventory {
    path: PathBuf,
}

impl FileCertificateInventory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CertificateInventory for FileCertificateInventory {
    fn list_issued_certificates(&self) -> Result<Vec<CertificateSummary>, String> {
        let body = fs::read_to_string(&self.path).map_err(|error| {
            format!(
                "failed to read inventory file '{}': {error}",
                self.path.display()
            )
        })?;
        serde_json::from_str(&body).map_err(|error| {
            format!(
                "invalid inventory file '{}': {error}",
                self.path.display()
            )
        })
    }
}
