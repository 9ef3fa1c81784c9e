//! Table-driven host filtering for the ambient views.
//!
//! None of this is algorithmic: the tables decide which tabs count as
//! "important", which hosts are noise in history views, which hosts are
//! translation services whose history entries are dropped, and which
//! decorative product suffixes are stripped from titles. The tables live in
//! [`HostFilterConfig`] so a deployment can replace them.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::model::{HistoryItem, Tab};

const NOISE_HOSTS: &[&str] = &[
    "translate.google.ru",
    "zoom.us",
    "miro.zoom.us",
    "9gag.com",
    "calendar.google.com",
    "www.facebook.com",
    "www.google.com",
    "accounts.google.com",
    "vk.com",
    "coub.com",
    "mail.google.com",
    "twitter.com",
    "code.devrtb.com",
    "www.youtube.com",
    "yandex.ru",
    "www.instagram.com",
    "2gis.ru",
];

const TRANSLATION_HOSTS: &[&str] = &["translate.google.ru", "translate.google.com", "www.deepl.com"];

const IMPORTANT_HOSTS: &[&str] = &[
    "miro.com",
    "miro.atlassian.net",
    "code.devrtb.com",
    "docs.google.com",
    "app2.greenhouse.io",
    "miro.latticehq.com",
    "notion.so",
];

const IGNORED_QUERY_HOSTS: &[&str] = &["miro.com", "docs.google.com", "www.figma.com"];

const PRODUCT_SUFFIXES: &[&str] = &[
    "| Greenhouse",
    " - Google Sheets",
    " - Google Docs",
    ", Online Whiteboard for Visual Collaboration",
    " - Stash",
    " - Confluence",
    " - YouTube",
    ", Visual Workspace for Innovation",
];

fn owned(table: &[&str]) -> Vec<String> {
    table.iter().map(|s| (*s).to_owned()).collect()
}

/// Host of `url` including any explicit port, or `""` when the url is
/// malformed or has no host.
pub fn extract_hostname(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return String::new();
    };
    match (parsed.host_str(), parsed.port()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_owned(),
        (None, _) => String::new(),
    }
}

/// The filter tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostFilterConfig {
    /// Hosts excluded from ambient views (exact host match).
    pub noise_hosts: Vec<String>,
    /// Hosts whose history entries are dropped entirely (exact host match).
    pub translation_hosts: Vec<String>,
    /// Substrings that mark a tab as important.
    pub important_hosts: Vec<String>,
    /// Hosts whose query string and fragment carry no identity.
    pub ignored_query_hosts: Vec<String>,
    /// Decorative suffixes stripped from titles, first occurrence each.
    pub product_suffixes: Vec<String>,
}

impl Default for HostFilterConfig {
    fn default() -> Self {
        Self {
            noise_hosts: owned(NOISE_HOSTS),
            translation_hosts: owned(TRANSLATION_HOSTS),
            important_hosts: owned(IMPORTANT_HOSTS),
            ignored_query_hosts: owned(IGNORED_QUERY_HOSTS),
            product_suffixes: owned(PRODUCT_SUFFIXES),
        }
    }
}

impl HostFilterConfig {
    /// `true` unless the url's host is in the noise table.
    ///
    /// A malformed url has no host and is therefore relevant.
    pub fn is_relevant_url(&self, url: &str) -> bool {
        let host = extract_hostname(url);
        !self.noise_hosts.iter().any(|h| *h == host)
    }

    /// `true` if the url's host ignores query and fragment.
    pub fn has_ignored_query(&self, url: &str) -> bool {
        let host = extract_hostname(url);
        self.ignored_query_hosts.iter().any(|h| *h == host)
    }

    /// `true` if the tab's url contains one of the important hosts.
    pub fn is_important_tab(&self, tab: &Tab) -> bool {
        !tab.url.is_empty() && self.important_hosts.iter().any(|h| tab.url.contains(h.as_str()))
    }

    /// Strip the first occurrence of each decorative product suffix.
    pub fn remove_useless_product_name(&self, title: &str) -> String {
        self.product_suffixes
            .iter()
            .fold(title.to_owned(), |acc, suffix| acc.replacen(suffix.as_str(), "", 1))
    }

    /// Drop history entries with no url or whose host is a translation service.
    pub fn filter_irrelevant_history(&self, items: &[HistoryItem]) -> Vec<HistoryItem> {
        items
            .iter()
            .filter(|item| {
                if item.url.is_empty() {
                    return false;
                }
                let host = extract_hostname(&item.url);
                !self.translation_hosts.iter().any(|h| *h == host)
            })
            .cloned()
            .collect()
    }

    /// History entries whose host is not noise, in input order.
    pub fn exclude_noise<'a>(&self, items: &'a [HistoryItem]) -> Vec<&'a HistoryItem> {
        items
            .iter()
            .filter(|item| self.is_relevant_url(&item.url))
            .collect()
    }
}
