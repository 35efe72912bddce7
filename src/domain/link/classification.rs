// src/domain/link/classification.rs
//
// Link Classification - pure parsing of attribution links
//
// CRITICAL RULES:
// - No I/O, no randomness: same (uri, trusted_domain) → same classification
// - Exactly one variant per classified URI
// - campaign_id is the path with surrounding '/' trimmed, never empty
// - A trusted domain gates referrer-sourced links only; launch links pass None

use url::Url;

/// Query parameter carrying a nested destination link.
pub const LINK_QUERY_PARAM: &str = "link";

/// What an attribution link asks the app to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkClassification {
    /// Short link whose path is an opaque campaign id.
    CampaignLink {
        original: Url,
        campaign_id: String,
        embedded_deeplink: Option<Url>,
    },

    /// Link on the attribution domain that carries its destination inline.
    RegularDeeplink { original: Url, embedded_deeplink: Url },

    /// Anything else, including links from an untrusted host.
    Unknown { original: Url },
}

impl LinkClassification {
    /// Classify `uri`.
    ///
    /// When `trusted_domain` is given, a host mismatch (case-insensitive) makes
    /// the link `Unknown` regardless of its shape.
    pub fn classify(uri: &Url, trusted_domain: Option<&str>) -> Self {
        let campaign_id = uri.path().trim_matches('/');

        if let Some(domain) = trusted_domain {
            let host_matches = uri
                .host_str()
                .map(|host| host.eq_ignore_ascii_case(domain))
                .unwrap_or(false);
            if !host_matches {
                return LinkClassification::Unknown {
                    original: uri.clone(),
                };
            }
        }

        let embedded = embedded_link(uri);

        if !campaign_id.is_empty() {
            LinkClassification::CampaignLink {
                original: uri.clone(),
                campaign_id: campaign_id.to_string(),
                embedded_deeplink: embedded,
            }
        } else if let Some(embedded_deeplink) = embedded {
            LinkClassification::RegularDeeplink {
                original: uri.clone(),
                embedded_deeplink,
            }
        } else {
            LinkClassification::Unknown {
                original: uri.clone(),
            }
        }
    }

    pub fn original(&self) -> &Url {
        match self {
            LinkClassification::CampaignLink { original, .. } => original,
            LinkClassification::RegularDeeplink { original, .. } => original,
            LinkClassification::Unknown { original } => original,
        }
    }

    pub fn embedded_deeplink(&self) -> Option<&Url> {
        match self {
            LinkClassification::CampaignLink {
                embedded_deeplink, ..
            } => embedded_deeplink.as_ref(),
            LinkClassification::RegularDeeplink {
                embedded_deeplink, ..
            } => Some(embedded_deeplink),
            LinkClassification::Unknown { .. } => None,
        }
    }

    pub fn campaign_id(&self) -> Option<&str> {
        match self {
            LinkClassification::CampaignLink { campaign_id, .. } => Some(campaign_id),
            _ => None,
        }
    }

    pub fn is_campaign(&self) -> bool {
        matches!(self, LinkClassification::CampaignLink { .. })
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, LinkClassification::Unknown { .. })
    }
}

/// Decoded `link` query parameter, if it holds an absolute URL.
fn embedded_link(uri: &Url) -> Option<Url> {
    let (_, value) = uri
        .query_pairs()
        .find(|(key, _)| key == LINK_QUERY_PARAM)?;

    match Url::parse(&value) {
        Ok(link) => Some(link),
        Err(e) => {
            log::debug!("Ignoring malformed embedded link '{}': {}", value, e);
            None
        }
    }
}
