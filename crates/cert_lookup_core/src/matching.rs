use crate::contract::CertificateSummary;
use crate::error::LookupError;

/// Returns the first inventory entry whose domain name contains `domain_name`.
///
/// Containment is case-sensitive on the literal text and runs in inventory order,
/// so the service's ordering breaks ties.
pub fn select_certificate<'a>(
    domain_name: &str,
    inventory: &'a [CertificateSummary],
) -> Option<&'a CertificateSummary> {
    inventory
        .iter()
        .find(|summary| summary.domain_name.contains(domain_name))
}

pub fn resolve_certificate<'a>(
    domain_name: &str,
    inventory: &'a [CertificateSummary],
) -> Result<&'a CertificateSummary, LookupError> {
    select_certificate(domain_name, inventory).ok_or_else(|| LookupError::NoMatchFound {
        domain_name: domain_name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(domain_name: &str, certificate_arn: &str) -> CertificateSummary {
        CertificateSummary {
            domain_name: domain_name.to_string(),
            certificate_arn: certificate_arn.to_string(),
        }
    }

    #[test]
    fn exact_domain_matches() {
        let inventory = vec![summary(
            "gokanmalkoc.click",
            "arn:aws:acm:us-east-1:123456789012:certificate/abc",
        )];

        let matched = resolve_certificate("gokanmalkoc.click", &inventory).expect("should match");
        assert_eq!(
            matched.certificate_arn,
            "arn:aws:acm:us-east-1:123456789012:certificate/abc"
        );
    }

    #[test]
    fn unmatched_domain_reports_requested_name() {
        let inventory = vec![summary("other.example", "arn:other")];

        let error = resolve_certificate("nomatch.example", &inventory).expect_err("no match");
        assert!(error.to_string().contains("nomatch.example"));
    }

    #[test]
    fn empty_inventory_is_no_match() {
        let error = resolve_certificate("site.com", &[]).expect_err("empty inventory");
        assert_eq!(
            error,
            LookupError::NoMatchFound {
                domain_name: "site.com".to_string()
            }
        );
    }

    #[test]
    fn entry_must_contain_request_not_the_reverse() {
        let parent_only = vec![summary("site.com", "arn:X")];
        assert!(select_certificate("sub.site.com", &parent_only).is_none());

        let child_only = vec![summary("sub.site.com", "arn:Y")];
        assert_eq!(
            select_certificate("site.com", &child_only).map(|entry| entry.certificate_arn.as_str()),
            Some("arn:Y")
        );
    }

    #[test]
    fn subdomain_request_skips_parent_and_finds_exact_entry() {
        let inventory = vec![summary("site.com", "arn:X"), summary("sub.site.com", "arn:Y")];

        let matched = resolve_certificate("sub.site.com", &inventory).expect("should match");
        assert_eq!(matched.certificate_arn, "arn:Y");
    }

    #[test]
    fn first_match_in_inventory_order_wins() {
        let inventory = vec![
            summary("unrelated.org", "arn:0"),
            summary("api.site.com", "arn:1"),
            summary("site.com", "arn:2"),
        ];

        let matched = resolve_certificate("site.com", &inventory).expect("should match");
        assert_eq!(matched.certificate_arn, "arn:1");
    }

    #[test]
    fn containment_is_case_sensitive() {
        let inventory = vec![summary("Site.Com", "arn:upper")];
        assert!(select_certificate("site.com", &inventory).is_none());
    }

    #[test]
    fn wildcard_entries_match_by_plain_containment() {
        let inventory = vec![summary("*.site.com", "arn:wild")];
        assert!(select_certificate("site.com", &inventory).is_some());
        assert!(select_certificate("www.site.com", &inventory).is_none());
    }
}
