use crate::common::*;
use percent_encoding::*;
use serde_json::from_reader;
use std::fs::File;
use std::net::SocketAddr;
use std::path::Path;

pub const CONFIG_FILE: &str = "ng2rss.json";

const ENDPOINT: &str =
    "https://www.nationalgeographic.com/bin/services/core/public/query/content.json";

const SECTIONS: [&str; 10] = [
    "adventure",
    "animals",
    "archaeologyandhistory",
    "environment",
    "magazine",
    "news",
    "peopleandculture",
    "photography",
    "science",
    "travel",
];

const PAGE_TYPES: [&str; 4] = ["article", "gallery", "interactive", "multipage"];

// The content API takes its list separators and tag namespaces literally.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b',')
    .remove(b':')
    .remove(b'/')
    .remove(b'_')
    .remove(b'-')
    .remove(b'.');

lazy_static! {
    static ref DEFAULT_CONTENT_TYPES: Vec<String> = SECTIONS
        .iter()
        .flat_map(|section| {
            PAGE_TYPES
                .iter()
                .map(move |kind| format!("{}/components/pagetypes/story/{}", section, kind))
        })
        .collect();
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
    pub listen: SocketAddr,
    pub upstream: Upstream,
    pub feed: FeedMeta,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            listen: ([0, 0, 0, 0], 9090).into(),
            upstream: Upstream::default(),
            feed: FeedMeta::default(),
        }
    }
}

impl Config {
    /// Reads the config file at `path`. A missing file yields the built-in defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> RssResult<Config> {
        use RssError::*;

        let path = path.as_ref();
        if !path.exists() {
            info!("{} not found, using built-in defaults", path.display());
            return Ok(Config::default());
        }

        let file = File::open(path)?;
        from_reader(file).map_err(|err| ConfigError(format!("{}: {}", path.display(), err)))
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Upstream {
    pub query: UpstreamQuery,
    /// Used verbatim instead of `query` when set.
    pub raw_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Upstream {
    pub fn url(&self) -> String {
        match &self.raw_url {
            Some(url) => url.clone(),
            None => self.query.to_url(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct UpstreamQuery {
    pub endpoint: String,
    pub content_types: Vec<String>,
    pub sort: String,
    pub operator: String,
    pub included_tags: Vec<String>,
    pub excluded_tags: Vec<String>,
    pub excluded_guids: Vec<String>,
    pub page_size: u32,
    pub page: u32,
    pub offset: u32,
}

impl Default for UpstreamQuery {
    fn default() -> UpstreamQuery {
        UpstreamQuery {
            endpoint: ENDPOINT.to_string(),
            content_types: DEFAULT_CONTENT_TYPES.clone(),
            sort: "newest".to_string(),
            operator: "or".to_string(),
            included_tags: vec![],
            excluded_tags: vec![
                "ngs_genres:reference".to_string(),
                "ngs_series:expedition_antarctica".to_string(),
                "ngs_visibility:omit_from_hp".to_string(),
            ],
            excluded_guids: vec!["beda7baa-e63b-4276-8122-34e47a4e653e".to_string()],
            page_size: 12,
            page: 0,
            offset: 0,
        }
    }
}

fn encode_list(values: &[String]) -> String {
    utf8_percent_encode(&values.join(","), QUERY_VALUE).to_string()
}

impl UpstreamQuery {
    pub fn to_url(&self) -> String {
        format!(
            "{endpoint}?contentTypes={types}&sort={sort}&operator={op}&includedTags={inc}&excludedTags={exc}&excludedGuids={guids}&pageSize={size}&page={page}&offset={offset}",
            endpoint = self.endpoint,
            types = encode_list(&self.content_types),
            sort = utf8_percent_encode(&self.sort, QUERY_VALUE),
            op = utf8_percent_encode(&self.operator, QUERY_VALUE),
            inc = encode_list(&self.included_tags),
            exc = encode_list(&self.excluded_tags),
            guids = encode_list(&self.excluded_guids),
            size = self.page_size,
            page = self.page,
            offset = self.offset,
        )
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct FeedMeta {
    pub title: String,
    pub link: String,
    pub description: String,
    pub author_name: String,
    pub author_email: Option<String>,
    /// Credited on every item; stories carry no author of their own.
    pub item_author: String,
}

impl Default for FeedMeta {
    fn default() -> FeedMeta {
        FeedMeta {
            title: "National Geographic".to_string(),
            link: "https://github.com/chmllr/ng2rss".to_string(),
            description: "National Geographic".to_string(),
            author_name: "Christian Müller".to_string(),
            author_email: Some("@drmllr".to_string()),
            item_author: "National Geographic".to_string(),
        }
    }
}

impl FeedMeta {
    /// `email (name)` when an email is known, otherwise just the name.
    pub fn managing_editor(&self) -> String {
        match &self.author_email {
            Some(email) if !email.is_empty() => format!("{} ({})", email, self.author_name),
            _ => self.author_name.clone(),
        }
    }
}
