use crate::common::*;
use serde::{Deserialize, Deserializer};

/// One entry of the upstream content query.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Story {
    #[serde(deserialize_with = "nullable")]
    pub url: String,
    #[serde(deserialize_with = "nullable")]
    pub title: String,
    #[serde(rename = "abstract", deserialize_with = "nullable")]
    pub summary: String,
    #[serde(rename = "publishDate", deserialize_with = "nullable")]
    pub publish_date: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct PageWrapper {
    page: Option<PageBody>,
}

// Stories come either nested as `page.story` or flattened straight into `page`.
#[derive(Deserialize, Debug, Default)]
struct PageBody {
    #[serde(default)]
    story: Option<Story>,
    #[serde(flatten)]
    flat: Story,
}

impl PageBody {
    fn into_story(self) -> Story {
        self.story.unwrap_or(self.flat)
    }
}

fn nullable<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Unwraps `[{"page": {"story": {...}}}, ...]` (or the flat `[{"page": {...}}]`)
/// into stories, keeping upstream order.
pub fn decode_stories(body: &[u8]) -> RssResult<Vec<Story>> {
    use RssError::*;

    let pages: Vec<Option<PageWrapper>> = serde_json::from_slice(body).map_err(DecodeError)?;

    Ok(pages
        .into_iter()
        .map(|wrapper| {
            wrapper
                .and_then(|w| w.page)
                .map(PageBody::into_story)
                .unwrap_or_default()
        })
        .collect())
}
