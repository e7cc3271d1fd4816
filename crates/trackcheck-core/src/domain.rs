//! Domain canonicalization shared by both cookie codecs.
//!
//! Inputs may arrive as bare hosts (`advertiser.localhost`), dotted
//! wildcard hosts (`.adsp.localhost`) or full URLs
//! (`http://sub.example.com/page`). Lookup and storage both key on the
//! registrable domain: the last two labels of the hostname.

use url::Url;

use crate::errors::{HarnessError, Result};

/// Strip any scheme and reduce the hostname to its last two labels,
/// lowercased. A leading dot is ignored here; see [`host_key`] for the
/// dot-preserving variant used on writes.
pub fn registrable_domain(domain: &str) -> Result<String> {
    let trimmed = domain.strip_prefix('.').unwrap_or(domain);

    let host = if trimmed.contains("://") {
        let url = Url::parse(trimmed)
            .map_err(|e| HarnessError::InvalidArgument(format!("bad domain '{domain}': {e}")))?;
        url.host_str()
            .ok_or_else(|| {
                HarnessError::InvalidArgument(format!("domain '{domain}' has no host"))
            })?
            .to_string()
    } else {
        // Bare host, possibly with a port.
        trimmed.split(':').next().unwrap_or(trimmed).to_string()
    };

    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    if labels.is_empty() {
        return Err(HarnessError::InvalidArgument(format!(
            "domain '{domain}' is empty after normalization"
        )));
    }

    let keep = labels.len().min(2);
    Ok(labels[labels.len() - keep..].join(".").to_ascii_lowercase())
}

/// Registrable domain with a leading dot preserved from the input. The dot
/// marks a cookie as valid for all subdomains and must survive writes.
pub fn host_key(domain: &str) -> Result<String> {
    let base = registrable_domain(domain)?;
    if domain.starts_with('.') {
        Ok(format!(".{base}"))
    } else {
        Ok(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_scheme_and_subdomain() {
        assert_eq!(
            registrable_domain("http://sub.example.com").unwrap(),
            "example.com"
        );
        assert_eq!(registrable_domain("example.com").unwrap(), "example.com");
    }

    #[test]
    fn url_and_bare_domain_agree() {
        assert_eq!(
            registrable_domain("http://sub.example.com/page?x=1").unwrap(),
            registrable_domain("example.com").unwrap()
        );
    }

    #[test]
    fn single_label_hosts_survive() {
        assert_eq!(registrable_domain("localhost").unwrap(), "localhost");
        assert_eq!(
            registrable_domain("publisher.localhost").unwrap(),
            "publisher.localhost"
        );
    }

    #[test]
    fn leading_dot_is_preserved_only_by_host_key() {
        assert_eq!(
            registrable_domain(".adsp.localhost").unwrap(),
            "adsp.localhost"
        );
        assert_eq!(host_key(".adsp.localhost").unwrap(), ".adsp.localhost");
        assert_eq!(host_key("adsp.localhost").unwrap(), "adsp.localhost");
    }

    #[test]
    fn port_is_dropped() {
        assert_eq!(
            registrable_domain("sub.example.com:8080").unwrap(),
            "example.com"
        );
    }

    #[test]
    fn lowercases() {
        assert_eq!(registrable_domain("EXAMPLE.Com").unwrap(), "example.com");
    }

    #[test]
    fn empty_domain_is_rejected() {
        assert!(registrable_domain("").is_err());
        assert!(registrable_domain(".").is_err());
    }
}
