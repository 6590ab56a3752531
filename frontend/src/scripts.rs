pub mod api;
pub mod components;

use crate::error::ValidationError;
use crate::utils::format_duration;
use chrono::NaiveDate;
use serde::Deserialize;
use url::Url;

pub const MIN_VIDEO_COUNT: u32 = 1;
pub const MAX_VIDEO_COUNT: u32 = 50;
pub const DEFAULT_VIDEO_COUNT: u32 = 10;
const PREVIEW_CHARS: usize = 200;
const MISSING_SCRIPT: &str = "(no script available)";

/// Checked input of the script extractor form.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptRequest {
    pub channel_url: String,
    pub video_count: u32,
    pub auto_translate: bool,
}

impl ScriptRequest {
    pub fn new(
        channel_url: &str,
        video_count: &str,
        auto_translate: bool,
    ) -> Result<Self, ValidationError> {
        let channel_url = channel_url.trim();
        if channel_url.is_empty() {
            return Err(ValidationError::Required {
                field: "Channel URL",
            });
        }
        if !is_channel_reference(channel_url) {
            return Err(ValidationError::InvalidChannelUrl(channel_url.to_string()));
        }

        let out_of_range = ValidationError::OutOfRange {
            field: "Video count",
            min: MIN_VIDEO_COUNT.into(),
            max: MAX_VIDEO_COUNT.into(),
        };
        let video_count: u32 = video_count.trim().parse().map_err(|_| out_of_range.clone())?;
        if !(MIN_VIDEO_COUNT..=MAX_VIDEO_COUNT).contains(&video_count) {
            return Err(out_of_range);
        }

        Ok(Self {
            channel_url: channel_url.to_string(),
            video_count,
            auto_translate,
        })
    }

    /// Fields of the form-encoded `POST /api/scripts/extract`.
    pub fn to_form_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("channel_url", self.channel_url.clone()),
            ("video_count", self.video_count.to_string()),
            ("auto_translate", self.auto_translate.to_string()),
        ]
    }
}

/// `@handle`, or a youtube.com channel page (`/@handle`, `/channel/ID`,
/// `/c/name`, `/user/name`).
fn is_channel_reference(input: &str) -> bool {
    if let Some(handle) = input.strip_prefix('@') {
        return !handle.is_empty() && !handle.contains(char::is_whitespace);
    }

    let Ok(parsed) = Url::parse(input) else {
        return false;
    };
    if !matches!(
        parsed.host_str(),
        Some("www.youtube.com" | "youtube.com" | "m.youtube.com")
    ) {
        return false;
    }
    let mut segments = parsed.path_segments().into_iter().flatten();
    match segments.next() {
        Some(first) if first.len() > 1 && first.starts_with('@') => true,
        Some("channel" | "c" | "user") => segments.next().is_some_and(|s| !s.is_empty()),
        _ => false,
    }
}

/// One video's transcript as returned by the backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedScript {
    pub title: String,
    pub video_url: String,
    #[serde(default)]
    pub text: Option<String>,
    /// Seconds.
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub channel_title: Option<String>,
}

impl ExtractedScript {
    fn body(&self) -> &str {
        self.text
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(MISSING_SCRIPT)
    }

    /// First 200 characters of the transcript.
    pub fn preview(&self) -> String {
        let body = self.body();
        match body.char_indices().nth(PREVIEW_CHARS) {
            Some((cut, _)) => format!("{}...", &body[..cut]),
            None => body.to_string(),
        }
    }

    pub fn duration_label(&self) -> String {
        let seconds = self.duration.filter(|d| d.is_finite() && *d > 0.0).unwrap_or(0.0);
        format_duration(seconds as u32)
    }

    /// Title, link and transcript, as copied or downloaded for one video.
    pub fn to_text(&self) -> String {
        format!("[{}]\n{}\n\n{}", self.title, self.video_url, self.body())
    }

    pub fn file_name(&self) -> String {
        format!("script_{}.txt", file_name_part(&self.title))
    }
}

/// Every transcript numbered and separated by a rule.
pub fn combined_text(scripts: &[ExtractedScript]) -> String {
    scripts
        .iter()
        .enumerate()
        .map(|(i, script)| {
            format!(
                "[{}] {}\n{}\n\n{}\n\n{}\n\n",
                i + 1,
                script.title,
                script.video_url,
                script.body(),
                "=".repeat(50)
            )
        })
        .collect()
}

pub fn bundle_file_name(scripts: &[ExtractedScript], date: NaiveDate) -> String {
    let channel = scripts
        .first()
        .and_then(|s| s.channel_title.as_deref())
        .filter(|t| !t.trim().is_empty())
        .unwrap_or("youtube_channel");
    format!("scripts_{}_{}.txt", file_name_part(channel), date.format("%Y-%m-%d"))
}

/// Drops characters file systems reject, turns whitespace runs into `_`
/// and keeps at most 50 characters.
pub fn file_name_part(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        .collect();
    let joined = cleaned.split_whitespace().collect::<Vec<_>>().join("_");
    let part: String = joined.chars().take(50).collect();
    if part.is_empty() {
        "script".to_string()
    } else {
        part
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(title: &str, text: Option<&str>) -> ExtractedScript {
        ExtractedScript {
            title: title.to_string(),
            video_url: "https://www.youtube.com/watch?v=abc".to_string(),
            text: text.map(str::to_string),
            duration: Some(75.0),
            thumbnail: None,
            channel_title: Some("Cook Daily".to_string()),
        }
    }

    #[test]
    fn test_request_builds_form_fields() {
        let request = ScriptRequest::new(" https://www.youtube.com/@cookdaily ", "12", true).unwrap();
        assert_eq!(
            request.to_form_pairs(),
            vec![
                ("channel_url", "https://www.youtube.com/@cookdaily".to_string()),
                ("video_count", "12".to_string()),
                ("auto_translate", "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_video_count_must_be_within_range() {
        let url = "https://youtube.com/channel/UC123";
        assert!(ScriptRequest::new(url, "1", false).is_ok());
        assert!(ScriptRequest::new(url, "50", false).is_ok());
        for bad in ["0", "51", "ten", ""] {
            assert_eq!(
                ScriptRequest::new(url, bad, false),
                Err(ValidationError::OutOfRange {
                    field: "Video count",
                    min: 1,
                    max: 50
                }),
                "video count {bad:?}"
            );
        }
    }

    #[test]
    fn test_channel_url_is_checked() {
        assert_eq!(
            ScriptRequest::new("  ", "5", false),
            Err(ValidationError::Required {
                field: "Channel URL"
            })
        );
        for ok in [
            "@cookdaily",
            "https://m.youtube.com/c/cookdaily",
            "https://www.youtube.com/user/cook/videos",
        ] {
            assert!(ScriptRequest::new(ok, "5", false).is_ok(), "{ok}");
        }
        for bad in [
            "@",
            "cook daily",
            "https://vimeo.com/@cookdaily",
            "https://www.youtube.com/watch?v=abc",
            "https://www.youtube.com/channel/",
        ] {
            assert!(
                matches!(
                    ScriptRequest::new(bad, "5", false),
                    Err(ValidationError::InvalidChannelUrl(_))
                ),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_script_text_and_preview() {
        let long = "a".repeat(250);
        let with_text = script("Soup", Some(&long));
        assert_eq!(with_text.preview().len(), 203);
        assert!(with_text.to_text().starts_with("[Soup]\nhttps://www.youtube.com/watch?v=abc\n\n"));
        assert_eq!(with_text.duration_label(), "01:15");

        let without = script("Bread", Some("   "));
        assert_eq!(without.preview(), MISSING_SCRIPT);
        assert!(without.to_text().ends_with(MISSING_SCRIPT));
    }

    #[test]
    fn test_combined_text_numbers_each_script() {
        let text = combined_text(&[script("Soup", Some("hot")), script("Bread", None)]);
        assert!(text.starts_with("[1] Soup\n"));
        assert!(text.contains("[2] Bread\n"));
        assert_eq!(text.matches(&"=".repeat(50)).count(), 2);
    }

    #[test]
    fn test_file_names_are_sanitized() {
        assert_eq!(file_name_part("What? A  <great> soup"), "What_A_great_soup");
        assert_eq!(file_name_part("///"), "script");
        assert_eq!(file_name_part(&"x".repeat(80)).len(), 50);
        assert_eq!(script("Soup: part 1", None).file_name(), "script_Soup_part_1.txt");

        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(
            bundle_file_name(&[script("Soup", None)], date),
            "scripts_Cook_Daily_2024-05-01.txt"
        );
        assert_eq!(bundle_file_name(&[], date), "scripts_youtube_channel_2024-05-01.txt");
    }
}
