// Strict filtering of raw candidates before normalization
use crate::config::{ImagePolicy, ValidationPolicy};
use crate::model::RawDeal;
use tracing::debug;
use url::Url;

pub fn is_valid_asin(asin: &str) -> bool {
    asin.len() == 10
        && asin
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

pub fn is_valid_image_url(image_url: &str, policy: &ValidationPolicy) -> bool {
    let Ok(parsed) = Url::parse(image_url) else {
        return false;
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }
    match policy.image_policy {
        ImagePolicy::Scheme => parsed.host_str().is_some(),
        ImagePolicy::TrustedHost => parsed.host_str().is_some_and(|host| {
            policy
                .trusted_image_hosts
                .iter()
                .any(|domain| host_in_domain(host, domain))
        }),
    }
}

/// True for `domain` itself or any subdomain of it, never for a host that
/// merely ends with the same characters.
fn host_in_domain(host: &str, domain: &str) -> bool {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    let domain = domain.trim_matches('.').to_ascii_lowercase();
    if domain.is_empty() {
        return false;
    }
    host == domain
        || host
            .strip_suffix(domain.as_str())
            .is_some_and(|rest| rest.ends_with('.'))
}

/// Why a candidate was dropped; used only for logging.
fn rejection(deal: &RawDeal, policy: &ValidationPolicy) -> Option<&'static str> {
    if deal.title.trim().is_empty() {
        Some("empty title")
    } else if !(deal.current_price > 0.0) {
        Some("non-positive price")
    } else if !is_valid_asin(&deal.asin) {
        Some("bad identifier")
    } else if !is_valid_image_url(&deal.image_url, policy) {
        Some("bad image url")
    } else {
        None
    }
}

/// Keeps the records that pass every check, in input order, capped at
/// `policy.max_results`.
pub fn filter_valid(candidates: Vec<RawDeal>, policy: &ValidationPolicy) -> Vec<RawDeal> {
    candidates
        .into_iter()
        .filter(|deal| match rejection(deal, policy) {
            Some(reason) => {
                debug!("Dropping deal {:?}: {}", deal.asin, reason);
                false
            }
            None => true,
        })
        .take(policy.max_results)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(asin: &str, image_url: &str) -> RawDeal {
        RawDeal {
            asin: asin.into(),
            title: "Socket Set".into(),
            brand: "Craftsman".into(),
            image_url: image_url.into(),
            current_price: 40.0,
            original_price: 60.0,
            last_updated: "2024-06-01T00:00:00Z".into(),
        }
    }

    fn scheme_only() -> ValidationPolicy {
        ValidationPolicy {
            image_policy: ImagePolicy::Scheme,
            ..ValidationPolicy::default()
        }
    }

    #[test]
    fn asin_must_be_ten_uppercase_alphanumerics() {
        assert!(is_valid_asin("B0123ABCDE"));
        assert!(!is_valid_asin("short1"));
        assert!(!is_valid_asin("b0123abcde"));
        assert!(!is_valid_asin("B0123ABCD-"));
        assert!(!is_valid_asin("B0123ABCDEF"));
        assert!(!is_valid_asin(""));
    }

    #[test]
    fn image_url_scheme_checks() {
        let policy = scheme_only();
        assert!(is_valid_image_url("https://example.com/a.jpg", &policy));
        assert!(is_valid_image_url("http://example.com/a.jpg", &policy));
        assert!(!is_valid_image_url("ftp://x/y.jpg", &policy));
        assert!(!is_valid_image_url("/relative/a.jpg", &policy));
        assert!(!is_valid_image_url("", &policy));
    }

    #[test]
    fn trusted_host_policy_requires_suffix() {
        let policy = ValidationPolicy::default();
        assert!(!is_valid_image_url("https://example.com/a.jpg", &policy));
        assert!(is_valid_image_url("https://m.media-amazon.com/images/a.jpg", &policy));
        assert!(is_valid_image_url("https://images-na.ssl-images-amazon.com/a.jpg", &policy));
        assert!(is_valid_image_url("https://amazon.com/a.jpg", &policy));
    }

    #[test]
    fn trusted_host_matches_whole_labels_only() {
        let policy = ValidationPolicy::default();
        assert!(!is_valid_image_url("https://evil-amazon.com/a.jpg", &policy));
        assert!(!is_valid_image_url("https://notmedia-amazon.com/a.jpg", &policy));
        assert!(!is_valid_image_url("https://amazon.com.evil.net/a.jpg", &policy));
        assert!(is_valid_image_url("https://www.amazon.com/a.jpg", &policy));

        assert!(host_in_domain("IMAGES.Amazon.com", "amazon.com"));
        assert!(!host_in_domain("amazon.com", ""));
    }

    #[test]
    fn drops_invalid_records_and_keeps_order() {
        let img = "https://m.media-amazon.com/a.jpg";
        let mut no_title = candidate("B000000003", img);
        no_title.title = "  ".into();
        let mut free = candidate("B000000004", img);
        free.current_price = 0.0;
        let mut nan = candidate("B000000005", img);
        nan.current_price = f64::NAN;

        let kept = filter_valid(
            vec![
                candidate("B000000001", img),
                candidate("short1", img),
                no_title,
                free,
                nan,
                candidate("B000000006", "ftp://x/y.jpg"),
                candidate("B000000002", img),
            ],
            &ValidationPolicy::default(),
        );
        let asins: Vec<_> = kept.iter().map(|d| d.asin.as_str()).collect();
        assert_eq!(asins, ["B000000001", "B000000002"]);
    }

    #[test]
    fn truncates_after_filtering() {
        let img = "https://m.media-amazon.com/a.jpg";
        let mut candidates = vec![candidate("bad", img)];
        candidates.extend((0..40).map(|i| candidate(&format!("B{:09}", i), img)));

        let kept = filter_valid(candidates, &ValidationPolicy::default());
        assert_eq!(kept.len(), 30);
        assert_eq!(kept[0].asin, "B000000000");
        assert_eq!(kept[29].asin, "B000000029");
    }
}
