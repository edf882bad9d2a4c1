//! Presentation preferences held by the template store.
//!
//! Every knob is a string; the empty string means "use the template's built-in default".

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TemplatePreferences {
    pub template_number: String,
    pub resume_name: String,
    pub font_family: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub text_color: String,
    pub background_color: String,
    pub name_font_size: String,
    pub heading_font_size: String,
    pub body_font_size: String,
    pub spacing: String,
    pub alignment: String,
    pub title_case: String,
    pub project_link_mode: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TemplateField {
    TemplateNumber,
    ResumeName,
    FontFamily,
    PrimaryColor,
    SecondaryColor,
    TextColor,
    BackgroundColor,
    NameFontSize,
    HeadingFontSize,
    BodyFontSize,
    Spacing,
    Alignment,
    TitleCase,
    ProjectLinkMode,
}

impl TemplateField {
    pub const ALL: [TemplateField; 14] = [
        TemplateField::TemplateNumber,
        TemplateField::ResumeName,
        TemplateField::FontFamily,
        TemplateField::PrimaryColor,
        TemplateField::SecondaryColor,
        TemplateField::TextColor,
        TemplateField::BackgroundColor,
        TemplateField::NameFontSize,
        TemplateField::HeadingFontSize,
        TemplateField::BodyFontSize,
        TemplateField::Spacing,
        TemplateField::Alignment,
        TemplateField::TitleCase,
        TemplateField::ProjectLinkMode,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateField::TemplateNumber => "templateNumber",
            TemplateField::ResumeName => "resumeName",
            TemplateField::FontFamily => "fontFamily",
            TemplateField::PrimaryColor => "primaryColor",
            TemplateField::SecondaryColor => "secondaryColor",
            TemplateField::TextColor => "textColor",
            TemplateField::BackgroundColor => "backgroundColor",
            TemplateField::NameFontSize => "nameFontSize",
            TemplateField::HeadingFontSize => "headingFontSize",
            TemplateField::BodyFontSize => "bodyFontSize",
            TemplateField::Spacing => "spacing",
            TemplateField::Alignment => "alignment",
            TemplateField::TitleCase => "titleCase",
            TemplateField::ProjectLinkMode => "projectLinkMode",
        }
    }

    /// Colour knobs take a `#rgb`/`#rrggbb` hex string or the empty default.
    pub fn is_color(self) -> bool {
        matches!(
            self,
            TemplateField::PrimaryColor
                | TemplateField::SecondaryColor
                | TemplateField::TextColor
                | TemplateField::BackgroundColor
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown template preference '{0}'")]
pub struct UnknownTemplateField(pub String);

impl FromStr for TemplateField {
    type Err = UnknownTemplateField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemplateField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| UnknownTemplateField(s.to_string()))
    }
}

impl fmt::Display for TemplateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TemplatePreferences {
    pub fn get(&self, field: TemplateField) -> &str {
        match field {
            TemplateField::TemplateNumber => &self.template_number,
            TemplateField::ResumeName => &self.resume_name,
            TemplateField::FontFamily => &self.font_family,
            TemplateField::PrimaryColor => &self.primary_color,
            TemplateField::SecondaryColor => &self.secondary_color,
            TemplateField::TextColor => &self.text_color,
            TemplateField::BackgroundColor => &self.background_color,
            TemplateField::NameFontSize => &self.name_font_size,
            TemplateField::HeadingFontSize => &self.heading_font_size,
            TemplateField::BodyFontSize => &self.body_font_size,
            TemplateField::Spacing => &self.spacing,
            TemplateField::Alignment => &self.alignment,
            TemplateField::TitleCase => &self.title_case,
            TemplateField::ProjectLinkMode => &self.project_link_mode,
        }
    }

    fn slot(&mut self, field: TemplateField) -> &mut String {
        match field {
            TemplateField::TemplateNumber => &mut self.template_number,
            TemplateField::ResumeName => &mut self.resume_name,
            TemplateField::FontFamily => &mut self.font_family,
            TemplateField::PrimaryColor => &mut self.primary_color,
            TemplateField::SecondaryColor => &mut self.secondary_color,
            TemplateField::TextColor => &mut self.text_color,
            TemplateField::BackgroundColor => &mut self.background_color,
            TemplateField::NameFontSize => &mut self.name_font_size,
            TemplateField::HeadingFontSize => &mut self.heading_font_size,
            TemplateField::BodyFontSize => &mut self.body_font_size,
            TemplateField::Spacing => &mut self.spacing,
            TemplateField::Alignment => &mut self.alignment,
            TemplateField::TitleCase => &mut self.title_case,
            TemplateField::ProjectLinkMode => &mut self.project_link_mode,
        }
    }

    /// Returns a copy with `field` set to `value`.
    pub fn with(&self, field: TemplateField, value: String) -> Self {
        let mut next = self.clone();
        *next.slot(field) = value;
        next
    }
}

/// Accepts `""`, `#rgb` and `#rrggbb`.
pub fn is_valid_color(value: &str) -> bool {
    if value.is_empty() {
        return true;
    }
    match value.strip_prefix('#') {
        Some(hex) => matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_empty_sentinels() {
        let prefs = TemplatePreferences::default();
        assert!(TemplateField::ALL.iter().all(|f| prefs.get(*f).is_empty()));
    }

    #[test]
    fn test_with_sets_single_field() {
        let prefs = TemplatePreferences::default().with(TemplateField::PrimaryColor, "#112233".into());
        assert_eq!(prefs.primary_color, "#112233");
        assert_eq!(prefs.get(TemplateField::PrimaryColor), "#112233");
        assert!(prefs.secondary_color.is_empty());
    }

    #[test]
    fn test_field_names_match_wire_keys() {
        let value = serde_json::to_value(TemplatePreferences::default()).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), TemplateField::ALL.len());
        for field in TemplateField::ALL {
            assert!(object.contains_key(field.as_str()), "missing {field}");
            assert_eq!(field.as_str().parse::<TemplateField>().unwrap(), field);
        }
    }

    #[test]
    fn test_color_validation() {
        assert!(is_valid_color(""));
        assert!(is_valid_color("#fff"));
        assert!(is_valid_color("#A0b1C2"));
        assert!(!is_valid_color("red"));
        assert!(!is_valid_color("#12345"));
        assert!(!is_valid_color("#ggg"));
    }
}
