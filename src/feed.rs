use crate::common::*;
use crate::config::FeedMeta;
use crate::story::Story;
use chrono::prelude::*;
use rss::{Channel, ChannelBuilder, ItemBuilder};

/// Layout the content API uses for `publishDate`, e.g. `Thu Dec 21 21:10:00 EST 2017`.
pub const PUBLISH_DATE_FORMAT: &str = "%a %b %e %H:%M:%S %Z %Y";

// Same layout after the weekday token, which must name a day but need not match the date.
const DATE_AFTER_WEEKDAY: &str = "%b %e %H:%M:%S %Z %Y";

lazy_static! {
    pub static ref FALLBACK_DATE: DateTime<Utc> = Utc
        .with_ymd_and_hms(2017, 12, 21, 21, 10, 0)
        .single()
        .expect("fallback date is a valid UTC instant");
}

/// The zone abbreviation is skipped, so every date is read as UTC.
pub fn parse_publish_date(raw: &str) -> RssResult<DateTime<Utc>> {
    use RssError::*;

    let raw = raw.trim();
    let parsed = match raw.split_once(char::is_whitespace) {
        Some((day, rest)) if day.parse::<Weekday>().is_ok() => {
            NaiveDateTime::parse_from_str(rest.trim_start(), DATE_AFTER_WEEKDAY)
        }
        _ => NaiveDateTime::parse_from_str(raw, PUBLISH_DATE_FORMAT),
    };

    parsed
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(DateParseError)
}

pub fn story_to_item(story: Story, meta: &FeedMeta) -> rss::Item {
    let date = parse_publish_date(&story.publish_date).unwrap_or_else(|err| {
        warn!(
            "couldn't parse story publishing date {:?} ({}), using {}",
            story.publish_date, err, *FALLBACK_DATE
        );
        *FALLBACK_DATE
    });

    ItemBuilder::default()
        .title(story.title)
        .link(story.url)
        .description(story.summary)
        .author(meta.item_author.clone())
        .pub_date(date.to_rfc2822())
        .build()
}

pub fn stories_to_channel(stories: Vec<Story>, meta: &FeedMeta, created: DateTime<Utc>) -> Channel {
    let items: Vec<rss::Item> = stories
        .into_iter()
        .map(|story| story_to_item(story, meta))
        .collect();

    ChannelBuilder::default()
        .title(meta.title.clone())
        .link(meta.link.clone())
        .description(meta.description.clone())
        .managing_editor(meta.managing_editor())
        .pub_date(created.to_rfc2822())
        .items(items)
        .build()
}

pub fn render_channel(channel: &Channel) -> RssResult<Vec<u8>> {
    use RssError::*;

    channel.write_to(Vec::new()).map_err(SerializeError)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story(title: &str, date: &str) -> Story {
        Story {
            url: format!("https://ng.test/{}", title.to_lowercase()),
            title: title.to_string(),
            summary: format!("About {}", title),
            publish_date: date.to_string(),
        }
    }

    fn created() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2018, 1, 2, 3, 4, 5).unwrap()
    }

    fn read_back(body: &[u8]) -> Channel {
        Channel::read_from(body).unwrap()
    }

    #[test]
    fn parses_unix_date_layout() {
        let date = parse_publish_date("Fri Dec 22 08:30:15 EST 2017").unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2017, 12, 22, 8, 30, 15).unwrap());
    }

    #[test]
    fn weekday_is_read_but_not_checked() {
        let date = parse_publish_date("Fri Dec 21 21:10:00 EST 2017").unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2017, 12, 21, 21, 10, 0).unwrap());

        let date = parse_publish_date("Tue Jan  2 15:04:05 MST 2018").unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2018, 1, 2, 15, 4, 5).unwrap());
    }

    #[test]
    fn weekday_token_must_name_a_day() {
        assert!(parse_publish_date("Xyz Dec 21 21:10:00 EST 2017").is_err());
        assert!(parse_publish_date("Dec 21 21:10:00 EST 2017").is_err());
    }

    #[test]
    fn rejects_other_layouts() {
        match parse_publish_date("2017-12-22T08:30:15Z") {
            Err(RssError::DateParseError(_)) => {}
            other => panic!("expected a date parse error, got {:?}", other),
        }
        assert!(parse_publish_date("").is_err());
    }

    #[test]
    fn item_mirrors_story() {
        let meta = FeedMeta::default();
        let item = story_to_item(story("Lions", "Thu Dec 21 10:00:00 UTC 2017"), &meta);

        assert_eq!(item.title(), Some("Lions"));
        assert_eq!(item.link(), Some("https://ng.test/lions"));
        assert_eq!(item.description(), Some("About Lions"));
        assert_eq!(item.author(), Some("National Geographic"));
        assert_eq!(item.pub_date(), Some("Thu, 21 Dec 2017 10:00:00 +0000"));
    }

    #[test]
    fn bad_date_falls_back() {
        let meta = FeedMeta::default();
        let item = story_to_item(story("Whales", "yesterday-ish"), &meta);

        assert_eq!(item.title(), Some("Whales"));
        assert_eq!(item.pub_date(), Some(FALLBACK_DATE.to_rfc2822().as_str()));
        assert_eq!(item.pub_date(), Some("Thu, 21 Dec 2017 21:10:00 +0000"));
    }

    #[test]
    fn channel_keeps_count_and_order() {
        let meta = FeedMeta::default();
        let stories = vec![
            story("Old", "Mon Dec 18 10:00:00 UTC 2017"),
            story("Newest", "Sat Dec 23 10:00:00 UTC 2017"),
            story("Broken", "not a date"),
            story("Middle", "Wed Dec 20 10:00:00 UTC 2017"),
        ];

        let channel = stories_to_channel(stories, &meta, created());
        let titles: Vec<_> = channel.items().iter().filter_map(|i| i.title()).collect();
        assert_eq!(titles, vec!["Old", "Newest", "Broken", "Middle"]);
    }

    #[test]
    fn channel_metadata_comes_from_config() {
        let meta = FeedMeta::default();
        let channel = stories_to_channel(vec![], &meta, created());

        assert_eq!(channel.title(), "National Geographic");
        assert_eq!(channel.link(), "https://github.com/chmllr/ng2rss");
        assert_eq!(channel.description(), "National Geographic");
        assert_eq!(channel.managing_editor(), Some("@drmllr (Christian Müller)"));
        assert_eq!(channel.pub_date(), Some("Tue, 2 Jan 2018 03:04:05 +0000"));
        assert!(channel.items().is_empty());
    }

    #[test]
    fn rendered_fields_survive_escaping() {
        let meta = FeedMeta::default();
        let tricky = Story {
            url: "https://ng.test/a?b=1&c=2".to_string(),
            title: "Cats & <Dogs>".to_string(),
            summary: "\"Quoted\" & 'single' <b>bold</b>".to_string(),
            publish_date: "Thu Dec 21 10:00:00 UTC 2017".to_string(),
        };

        let body = render_channel(&stories_to_channel(vec![tricky.clone()], &meta, created())).unwrap();
        let channel = read_back(&body);
        let item = &channel.items()[0];

        assert_eq!(item.title(), Some(tricky.title.as_str()));
        assert_eq!(item.link(), Some(tricky.url.as_str()));
        assert_eq!(item.description(), Some(tricky.summary.as_str()));
    }

    #[test]
    fn rendering_is_deterministic_for_a_fixed_creation_time() {
        let meta = FeedMeta::default();
        let stories = vec![story("A", "Thu Dec 21 10:00:00 UTC 2017"), story("B", "bogus")];

        let first = render_channel(&stories_to_channel(stories.clone(), &meta, created())).unwrap();
        let second = render_channel(&stories_to_channel(stories, &meta, created())).unwrap();
        assert_eq!(first, second);
    }
}
