use crate::error::ValidationError;
use crate::models::SelectedChannel;
use serde::{Deserialize, Serialize};

pub const MAX_RESULTS_LIMIT: u32 = 500;
pub const MAX_DAYS_AGO: u32 = 365;
pub const MAX_DURATION: u32 = 60;

/// Values of the search form. Persisted as the preference snapshot and
/// recorded in the search history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchForm {
    pub keyword: String,
    pub title_contains: String,
    pub min_views: u64,
    pub max_views: Option<u64>,
    pub days_ago: u32,
    pub max_results: u32,
    pub category_id: String,
    pub region_code: String,
    pub language: String,
    /// Seconds.
    pub duration_max: u32,
    pub channels: Vec<SelectedChannel>,
}

impl Default for SearchForm {
    fn default() -> Self {
        Self {
            keyword: String::new(),
            title_contains: String::new(),
            min_views: 1_000_000,
            max_views: None,
            days_ago: 3,
            max_results: 50,
            category_id: "any".to_string(),
            region_code: "US".to_string(),
            language: "en".to_string(),
            duration_max: MAX_DURATION,
            channels: Vec::new(),
        }
    }
}

impl SearchForm {
    /// Rejects values the backend would refuse. `min_views_floor` of 0 skips
    /// the minimum-views check.
    pub fn validate(&self, min_views_floor: u64) -> Result<(), ValidationError> {
        if self.min_views < min_views_floor {
            return Err(ValidationError::OutOfRange {
                field: "Minimum views",
                min: min_views_floor,
                max: u64::MAX,
            });
        }
        if let Some(max_views) = self.max_views {
            if max_views < self.min_views {
                return Err(ValidationError::InvertedViewRange);
            }
        }
        check_range("Max results", self.max_results, 1, MAX_RESULTS_LIMIT)?;
        check_range("Days ago", self.days_ago, 1, MAX_DAYS_AGO)?;
        check_range("Max duration", self.duration_max, 1, MAX_DURATION)?;
        Ok(())
    }

    pub fn channel_ids(&self) -> String {
        self.channels
            .iter()
            .map(|c| c.id.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Field pairs for the form-encoded `POST /search`. Empty optional
    /// fields are left out.
    pub fn to_form_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("keyword", self.keyword.trim().to_string()),
            ("title_contains", self.title_contains.trim().to_string()),
            ("min_views", self.min_views.to_string()),
            ("days_ago", self.days_ago.to_string()),
            ("max_results", self.max_results.to_string()),
            ("category_id", self.category_id.clone()),
            ("region_code", self.region_code.clone()),
            ("language", self.language.clone()),
            ("duration_max", self.duration_max.to_string()),
        ];
        if let Some(max_views) = self.max_views {
            pairs.push(("max_views", max_views.to_string()));
        }
        if !self.channels.is_empty() {
            pairs.push(("channel_ids", self.channel_ids()));
        }
        pairs
    }
}

fn check_range(field: &'static str, value: u32, min: u32, max: u32) -> Result<(), ValidationError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field,
            min: min.into(),
            max: max.into(),
        })
    }
}

/// Parses an optional numeric input; blank means "not set".
pub fn parse_optional_number(
    field: &'static str,
    raw: &str,
) -> Result<Option<u64>, ValidationError> {
    let trimmed = raw.trim().replace(',', "");
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse()
        .map(Some)
        .map_err(|_| ValidationError::NotANumber { field })
}

/// Numeric inputs of the form. They are edited as free text, so a value
/// that does not parse is reported next to the input instead of dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericField {
    MinViews,
    MaxViews,
    DaysAgo,
    MaxResults,
    DurationMax,
}

impl NumericField {
    pub fn label(&self) -> &'static str {
        match self {
            NumericField::MinViews => "Min views",
            NumericField::MaxViews => "Max views",
            NumericField::DaysAgo => "Days ago",
            NumericField::MaxResults => "Max results",
            NumericField::DurationMax => "Max seconds",
        }
    }
}

impl SearchForm {
    pub fn numeric_text(&self, field: NumericField) -> String {
        match field {
            NumericField::MinViews => self.min_views.to_string(),
            NumericField::MaxViews => self.max_views.map(|v| v.to_string()).unwrap_or_default(),
            NumericField::DaysAgo => self.days_ago.to_string(),
            NumericField::MaxResults => self.max_results.to_string(),
            NumericField::DurationMax => self.duration_max.to_string(),
        }
    }

    /// Stores `raw` in `field`. Only max views may be left blank. On error
    /// the form is unchanged.
    pub fn set_numeric(&mut self, field: NumericField, raw: &str) -> Result<(), ValidationError> {
        let label = field.label();
        let value = parse_optional_number(label, raw)?;
        if field == NumericField::MaxViews {
            self.max_views = value;
            return Ok(());
        }
        let value = value.ok_or(ValidationError::Required { field: label })?;
        let small = || u32::try_from(value).map_err(|_| ValidationError::NotANumber { field: label });
        match field {
            NumericField::MinViews => self.min_views = value,
            NumericField::DaysAgo => self.days_ago = small()?,
            NumericField::MaxResults => self.max_results = small()?,
            NumericField::DurationMax => self.duration_max = small()?,
            NumericField::MaxViews => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::channel;

    #[test]
    fn test_default_form_is_valid() {
        assert!(SearchForm::default().validate(0).is_ok());
    }

    #[test]
    fn test_min_views_floor_is_configurable() {
        let form = SearchForm {
            min_views: 500,
            ..SearchForm::default()
        };
        assert!(form.validate(0).is_ok());
        assert!(matches!(
            form.validate(1_000),
            Err(ValidationError::OutOfRange { field: "Minimum views", .. })
        ));
    }

    #[test]
    fn test_inverted_view_range_rejected() {
        let form = SearchForm {
            min_views: 10_000,
            max_views: Some(5_000),
            ..SearchForm::default()
        };
        assert_eq!(form.validate(0), Err(ValidationError::InvertedViewRange));
    }

    #[test]
    fn test_out_of_range_fields_rejected() {
        let form = SearchForm {
            max_results: 0,
            ..SearchForm::default()
        };
        assert!(form.validate(0).is_err());

        let form = SearchForm {
            duration_max: 61,
            ..SearchForm::default()
        };
        assert!(form.validate(0).is_err());
    }

    #[test]
    fn test_form_pairs_skip_empty_optionals() {
        let pairs = SearchForm::default().to_form_pairs();
        assert!(pairs.iter().all(|(k, _)| *k != "max_views" && *k != "channel_ids"));
        assert!(pairs.contains(&("min_views", "1000000".to_string())));
    }

    #[test]
    fn test_form_pairs_join_channel_ids() {
        let form = SearchForm {
            max_views: Some(2_000_000),
            channels: vec![channel("UC1"), channel("UC2")],
            ..SearchForm::default()
        };
        let pairs = form.to_form_pairs();
        assert!(pairs.contains(&("channel_ids", "UC1,UC2".to_string())));
        assert!(pairs.contains(&("max_views", "2000000".to_string())));
    }

    #[test]
    fn test_parse_optional_number() {
        assert_eq!(parse_optional_number("Views", "  "), Ok(None));
        assert_eq!(parse_optional_number("Views", "1,000,000"), Ok(Some(1_000_000)));
        assert_eq!(
            parse_optional_number("Views", "lots"),
            Err(ValidationError::NotANumber { field: "Views" })
        );
    }

    #[test]
    fn test_unparsable_numeric_input_is_reported() {
        let mut form = SearchForm::default();
        assert_eq!(
            form.set_numeric(NumericField::MinViews, "1m"),
            Err(ValidationError::NotANumber { field: "Min views" })
        );
        assert_eq!(
            form.set_numeric(NumericField::DaysAgo, ""),
            Err(ValidationError::Required { field: "Days ago" })
        );
        assert_eq!(
            form.set_numeric(NumericField::MaxResults, "99999999999"),
            Err(ValidationError::NotANumber { field: "Max results" })
        );
        assert_eq!(form, SearchForm::default());
    }

    #[test]
    fn test_numeric_input_updates_form() {
        let mut form = SearchForm::default();
        form.set_numeric(NumericField::MinViews, "250,000").unwrap();
        form.set_numeric(NumericField::MaxViews, "900000").unwrap();
        form.set_numeric(NumericField::DaysAgo, " 7 ").unwrap();
        assert_eq!(form.min_views, 250_000);
        assert_eq!(form.max_views, Some(900_000));
        assert_eq!(form.numeric_text(NumericField::DaysAgo), "7");

        form.set_numeric(NumericField::MaxViews, "").unwrap();
        assert_eq!(form.max_views, None);
        assert_eq!(form.numeric_text(NumericField::MaxViews), "");
    }

    #[test]
    fn test_old_snapshots_fill_missing_fields() {
        let form: SearchForm = serde_json::from_str(r#"{"keyword":"cats"}"#).unwrap();
        assert_eq!(form.keyword, "cats");
        assert_eq!(form.region_code, "US");
        assert_eq!(form.max_results, 50);
    }
}
