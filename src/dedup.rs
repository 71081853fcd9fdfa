//! # URL identity
//! Canonical form for article URLs so the same story syndicated with
//! different tracking decorations collapses to one pool entry.
//!
//! Normalization: lower-cased scheme/host (the `url` crate does this on
//! parse), tracking parameters stripped per denylist, remaining query kept
//! in original order, fragment dropped, one trailing slash trimmed from the
//! path. Anything unparseable passes through verbatim so weird-but-unique
//! links still dedup against themselves.

use serde::Deserialize;
use url::form_urlencoded;
use url::Url;

/// Query-parameter denylist. `prefixes` match case-insensitively on the
/// start of the key, `names` match the whole key.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackingParams {
    #[serde(default = "default_prefixes")]
    pub prefixes: Vec<String>,
    #[serde(default = "default_names")]
    pub names: Vec<String>,
}

fn default_prefixes() -> Vec<String> {
    vec!["utm_".to_string()]
}

fn default_names() -> Vec<String> {
    vec!["fbclid".to_string(), "ref".to_string()]
}

impl Default for TrackingParams {
    fn default() -> Self {
        Self {
            prefixes: default_prefixes(),
            names: default_names(),
        }
    }
}

impl TrackingParams {
    pub fn is_tracking(&self, key: &str) -> bool {
        let key = key.to_ascii_lowercase();
        self.prefixes
            .iter()
            .any(|p| key.starts_with(&p.to_ascii_lowercase()))
            || self.names.iter().any(|n| n.eq_ignore_ascii_case(&key))
    }
}

/// Canonical dedup key for `raw`. Never fails: a URL the parser rejects is
/// returned unchanged.
pub fn normalize_url(raw: &str, tracking: &TrackingParams) -> String {
    let mut url = match Url::parse(raw) {
        Ok(u) => u,
        Err(_) => return raw.to_string(),
    };

    if url.query().is_some() {
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| !tracking.is_tracking(k))
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        if kept.is_empty() {
            url.set_query(None);
        } else {
            let mut ser = form_urlencoded::Serializer::new(String::new());
            for (k, v) in &kept {
                ser.append_pair(k, v);
            }
            url.set_query(Some(&ser.finish()));
        }
    }
    url.set_fragment(None);

    // One trailing slash comes off the path itself, so "/news/" and "/news"
    // share a key even when a real query survives.
    let path = url.path();
    if path.len() > 1 && path.ends_with('/') {
        let trimmed = path[..path.len() - 1].to_string();
        url.set_path(&trimmed);
    }

    let mut out = url.to_string();
    // The parser forces "/" onto a bare-root URL; drop it so both spellings
    // of the homepage match.
    if url.path() == "/" && out.ends_with('/') {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(raw: &str) -> String {
        normalize_url(raw, &TrackingParams::default())
    }

    #[test]
    fn strips_utm_and_click_ids() {
        assert_eq!(
            norm("https://riabiz.com/a/deal?utm_source=nl&utm_medium=email&fbclid=xyz"),
            "https://riabiz.com/a/deal"
        );
    }

    #[test]
    fn keeps_meaningful_params_in_order() {
        assert_eq!(
            norm("https://example.com/s?page=2&utm_campaign=x&q=ria"),
            "https://example.com/s?page=2&q=ria"
        );
    }

    #[test]
    fn lowercases_scheme_and_host_only() {
        assert_eq!(
            norm("HTTPS://AdvisorHub.com/News/Deal-Story"),
            "https://advisorhub.com/News/Deal-Story"
        );
    }

    #[test]
    fn trims_trailing_slash() {
        assert_eq!(norm("https://riabiz.com/a/deal/"), "https://riabiz.com/a/deal");
        assert_eq!(norm("https://riabiz.com"), "https://riabiz.com");
        assert_eq!(norm("https://riabiz.com/"), "https://riabiz.com");
    }

    #[test]
    fn slash_collapses_even_when_a_query_survives() {
        assert_eq!(
            norm("https://advisorhub.com/news/?page=2"),
            "https://advisorhub.com/news?page=2"
        );
        assert_eq!(
            norm("https://advisorhub.com/news/?page=2"),
            norm("https://advisorhub.com/news?page=2")
        );
    }

    #[test]
    fn only_one_trailing_slash_comes_off() {
        assert_eq!(norm("https://example.com/a//"), "https://example.com/a/");
    }

    #[test]
    fn drops_fragment() {
        assert_eq!(
            norm("https://example.com/post#comments"),
            "https://example.com/post"
        );
    }

    #[test]
    fn all_tracking_params_leaves_no_question_mark() {
        assert_eq!(
            norm("https://example.com/x?utm_source=a&ref=b"),
            "https://example.com/x"
        );
    }

    #[test]
    fn unparseable_passes_through_verbatim() {
        assert_eq!(norm("not a url"), "not a url");
        assert_eq!(norm(""), "");
    }

    #[test]
    fn denylist_is_case_insensitive() {
        assert_eq!(
            norm("https://example.com/x?UTM_Source=a&FBCLID=b&q=1"),
            "https://example.com/x?q=1"
        );
    }

    #[test]
    fn custom_denylist_respected() {
        let t = TrackingParams {
            prefixes: vec!["mc_".to_string()],
            names: vec!["gclid".to_string()],
        };
        assert_eq!(
            normalize_url("https://example.com/x?mc_eid=7&gclid=9&id=3", &t),
            "https://example.com/x?id=3"
        );
        // utm_ is no longer on the list
        assert_eq!(
            normalize_url("https://example.com/x?utm_source=a", &t),
            "https://example.com/x?utm_source=a"
        );
    }
}
