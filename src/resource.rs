//! Resource name templates.
//!
//! Names are hierarchical paths such as
//! `projects/{project}/locations/{location}/cdnKeys/{cdn_key}`. Literal
//! segments must match exactly; a variable segment is any non-empty string
//! without a `/`.

use crate::errors::{Result, StitcherError};

/// A resource name pattern made of literal and `{variable}` segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathTemplate {
    pattern: &'static str,
}

impl PathTemplate {
    pub const fn new(pattern: &'static str) -> Self {
        Self { pattern }
    }

    pub fn pattern(&self) -> &'static str {
        self.pattern
    }

    /// Fill the variables in order.
    ///
    /// # Panics
    ///
    /// If `values` does not have one entry per variable.
    pub fn render(&self, values: &[&str]) -> String {
        let mut values = values.iter().copied();
        let rendered: Vec<&str> = self
            .segments()
            .map(|segment| match segment {
                Segment::Literal(literal) => literal,
                Segment::Variable(variable) => values
                    .next()
                    .unwrap_or_else(|| panic!("missing value for {{{variable}}} in {}", self.pattern)),
            })
            .collect();
        assert!(
            values.next().is_none(),
            "too many values for {}",
            self.pattern
        );
        rendered.join("/")
    }

    /// Extract the variable values of `name`, or `None` if it does not match.
    pub fn parse<'a>(&self, name: &'a str) -> Option<Vec<&'a str>> {
        let mut parts = name.split('/');
        let mut values = Vec::new();

        for segment in self.segments() {
            let part = parts.next()?;
            match segment {
                Segment::Literal(literal) if part == literal => {}
                Segment::Variable(_) if !part.is_empty() => values.push(part),
                _ => return None,
            }
        }

        match parts.next() {
            Some(_) => None,
            None => Some(values),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        self.parse(name).is_some()
    }

    /// Fail with [`StitcherError::InvalidResourceName`] unless `name` matches.
    pub fn validate(&self, name: &str) -> Result<()> {
        if self.matches(name) {
            Ok(())
        } else {
            Err(StitcherError::InvalidResourceName {
                name: name.to_string(),
                expected: self.pattern,
            })
        }
    }

    fn segments(&self) -> impl Iterator<Item = Segment<'static>> {
        self.pattern.split('/').map(|segment| {
            match segment
                .strip_prefix('{')
                .and_then(|rest| rest.strip_suffix('}'))
            {
                Some(variable) => Segment::Variable(variable),
                None => Segment::Literal(segment),
            }
        })
    }
}

enum Segment<'a> {
    Literal(&'a str),
    Variable(&'a str),
}

pub const LOCATION: PathTemplate = PathTemplate::new("projects/{project}/locations/{location}");

pub const CDN_KEY: PathTemplate =
    PathTemplate::new("projects/{project}/locations/{location}/cdnKeys/{cdn_key}");

pub const SLATE: PathTemplate =
    PathTemplate::new("projects/{project}/locations/{location}/slates/{slate}");

pub const VOD_SESSION: PathTemplate =
    PathTemplate::new("projects/{project}/locations/{location}/vodSessions/{vod_session}");

pub const VOD_STITCH_DETAIL: PathTemplate = PathTemplate::new(
    "projects/{project}/locations/{location}/vodSessions/{vod_session}/vodStitchDetails/{vod_stitch_detail}",
);

pub const VOD_AD_TAG_DETAIL: PathTemplate = PathTemplate::new(
    "projects/{project}/locations/{location}/vodSessions/{vod_session}/vodAdTagDetails/{vod_ad_tag_detail}",
);

pub const LIVE_SESSION: PathTemplate =
    PathTemplate::new("projects/{project}/locations/{location}/liveSessions/{live_session}");

pub const LIVE_AD_TAG_DETAIL: PathTemplate = PathTemplate::new(
    "projects/{project}/locations/{location}/liveSessions/{live_session}/liveAdTagDetails/{live_ad_tag_detail}",
);

pub const LIVE_CONFIG: PathTemplate =
    PathTemplate::new("projects/{project}/locations/{location}/liveConfigs/{live_config}");

pub const OPERATION: PathTemplate =
    PathTemplate::new("projects/{project}/locations/{location}/operations/{operation}");

pub fn location_path(project: &str, location: &str) -> String {
    LOCATION.render(&[project, location])
}

pub fn cdn_key_path(project: &str, location: &str, cdn_key: &str) -> String {
    CDN_KEY.render(&[project, location, cdn_key])
}

pub fn slate_path(project: &str, location: &str, slate: &str) -> String {
    SLATE.render(&[project, location, slate])
}

pub fn vod_session_path(project: &str, location: &str, vod_session: &str) -> String {
    VOD_SESSION.render(&[project, location, vod_session])
}

pub fn vod_stitch_detail_path(
    project: &str,
    location: &str,
    vod_session: &str,
    vod_stitch_detail: &str,
) -> String {
    VOD_STITCH_DETAIL.render(&[project, location, vod_session, vod_stitch_detail])
}

pub fn vod_ad_tag_detail_path(
    project: &str,
    location: &str,
    vod_session: &str,
    vod_ad_tag_detail: &str,
) -> String {
    VOD_AD_TAG_DETAIL.render(&[project, location, vod_session, vod_ad_tag_detail])
}

pub fn live_session_path(project: &str, location: &str, live_session: &str) -> String {
    LIVE_SESSION.render(&[project, location, live_session])
}

pub fn live_ad_tag_detail_path(
    project: &str,
    location: &str,
    live_session: &str,
    live_ad_tag_detail: &str,
) -> String {
    LIVE_AD_TAG_DETAIL.render(&[project, location, live_session, live_ad_tag_detail])
}

pub fn live_config_path(project: &str, location: &str, live_config: &str) -> String {
    LIVE_CONFIG.render(&[project, location, live_config])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_nested_names() {
        assert_eq!(
            vod_ad_tag_detail_path("my-project", "us-central1", "sess-1", "detail-9"),
            "projects/my-project/locations/us-central1/vodSessions/sess-1/vodAdTagDetails/detail-9"
        );
        assert_eq!(
            cdn_key_path("123", "us-west1", "key"),
            "projects/123/locations/us-west1/cdnKeys/key"
        );
    }

    #[test]
    fn parse_extracts_variables() {
        let name = "projects/p/locations/l/liveSessions/s/liveAdTagDetails/d";
        assert_eq!(LIVE_AD_TAG_DETAIL.parse(name), Some(vec!["p", "l", "s", "d"]));
    }

    #[test]
    fn rejects_wrong_collection_and_shape() {
        assert!(!SLATE.matches("projects/p/locations/l/cdnKeys/k"));
        assert!(!SLATE.matches("projects/p/locations/l/slates"));
        assert!(!SLATE.matches("projects/p/locations/l/slates/s/extra"));
        assert!(!SLATE.matches("projects//locations/l/slates/s"));
        assert!(LOCATION.matches("projects/p/locations/l"));
    }

    #[test]
    fn validate_reports_expected_pattern() {
        let err = CDN_KEY.validate("cdnKeys/k").unwrap_err();
        match err {
            StitcherError::InvalidResourceName { name, expected } => {
                assert_eq!(name, "cdnKeys/k");
                assert_eq!(expected, CDN_KEY.pattern());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    #[should_panic(expected = "missing value")]
    fn render_requires_every_variable() {
        SLATE.render(&["p", "l"]);
    }
}
