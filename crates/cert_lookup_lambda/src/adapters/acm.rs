use aws_sdk_acm::error::DisplayErrorContext;
use aws_sdk_acm::types::{CertificateStatus, CertificateSummary as AcmCertificateSummary};
use cert_lookup_core::contract::CertificateSummary;
use tracing::{debug, warn};

use crate::adapters::inventory::CertificateInventory;

/// Lists `ISSUED` certificates from AWS Certificate Manager.
#[derive(Debug, Clone)]
pub struct AcmCertificateInventory {
    client: aws_sdk_acm::Client,
}

impl AcmCertificateInventory {
    pub fn new(client: aws_sdk_acm::Client) -> Self {
        Self { client }
    }

    /// Walks every `ListCertificates` page and keeps the service ordering.
    pub async fn list_issued(&self) -> Result<Vec<CertificateSummary>, String> {
        let mut certificates = Vec::new();
        let mut next_token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let output = self
                .client
                .list_certificates()
                .certificate_statuses(CertificateStatus::Issued)
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|error| {
                    format!(
                        "failed to list issued ACM certificates: {}",
                        DisplayErrorContext(&error)
                    )
                })?;
            pages += 1;

            next_token = fold_page(
                &mut certificates,
                output.certificate_summary_list(),
                output.next_token(),
            );
            if next_token.is_none() {
                break;
            }
        }

        debug!(
            component = "acm_inventory",
            event = "listing_completed",
            pages,
            certificates = certificates.len(),
        );
        Ok(certificates)
    }
}

impl CertificateInventory for AcmCertificateInventory {
    fn list_issued_certificates(&self) -> Result<Vec<CertificateSummary>, String> {
        tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(self.list_issued()))
    }
}

/// Appends one page of summaries and returns the token for the next page.
///
/// An absent or empty token ends the listing.
fn fold_page(
    certificates: &mut Vec<CertificateSummary>,
    page: &[AcmCertificateSummary],
    next_token: Option<&str>,
) -> Option<String> {
    for summary in page {
        match (summary.domain_name(), summary.certificate_arn()) {
            (Some(domain_name), Some(certificate_arn)) => {
                certificates.push(CertificateSummary {
                    domain_name: domain_name.to_string(),
                    certificate_arn: certificate_arn.to_string(),
                });
            }
            _ => warn!(
                component = "acm_inventory",
                event = "summary_skipped",
                domain_name = summary.domain_name(),
                certificate_arn = summary.certificate_arn(),
                "skipping certificate summary without domain name or arn"
            ),
        }
    }

    next_token
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}
