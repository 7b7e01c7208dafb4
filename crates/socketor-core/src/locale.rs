//! Display locale, passed explicitly to every formatting call.
//!
//! The locale is an ordinary value: the caller picks one (from the config
//! file, a command-line flag, or a UI setting) and hands it to whatever
//! formats timestamps.  Changing the locale for one view never changes it for
//! another, and there is no process-wide "current culture" to race on.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocaleError {
    /// The tag is not of the form `ll` or `ll-RR`.
    #[error("malformed locale tag `{0}`: expected language[-REGION], e.g. en-US")]
    Malformed(String),
}

/// A language tag such as `en-US` or `zh-CN`.
///
/// Stored normalised: lowercase language, uppercase region.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale {
    language: String,
    region: Option<String>,
}

impl Locale {
    /// Parses `language[-REGION]`; `_` is accepted as the separator too.
    ///
    /// # Errors
    ///
    /// Returns [`LocaleError::Malformed`] unless the language is 2-3 ASCII
    /// letters and the optional region is exactly 2 ASCII letters.
    pub fn parse(tag: &str) -> Result<Self, LocaleError> {
        let malformed = || LocaleError::Malformed(tag.to_string());
        let mut parts = tag.trim().split(['-', '_']);

        let language = parts.next().filter(|l| is_alpha(l, 2..=3)).ok_or_else(malformed)?;
        let region = match parts.next() {
            Some(r) if is_alpha(r, 2..=2) => Some(r.to_ascii_uppercase()),
            Some(_) => return Err(malformed()),
            None => None,
        };
        if parts.next().is_some() {
            return Err(malformed());
        }

        Ok(Self {
            language: language.to_ascii_lowercase(),
            region,
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// The `strftime` pattern used for message timestamps in this locale.
    pub fn time_pattern(&self) -> &'static str {
        match (self.language.as_str(), self.region()) {
            ("en", Some("US")) | ("en", None) => "%m/%d/%Y %I:%M:%S %p",
            ("en", _) => "%d/%m/%Y %H:%M:%S",
            ("zh" | "ja", _) => "%Y/%m/%d %H:%M:%S",
            ("ko", _) => "%Y. %m. %d. %H:%M:%S",
            ("de" | "ru" | "pl", _) => "%d.%m.%Y %H:%M:%S",
            ("fr" | "es" | "it" | "pt", _) => "%d/%m/%Y %H:%M:%S",
            _ => "%Y-%m-%d %H:%M:%S",
        }
    }

    /// Formats a timestamp for display in this locale.
    pub fn format_time(&self, time: &DateTime<Local>) -> String {
        time.format(self.time_pattern()).to_string()
    }
}

impl Default for Locale {
    /// `en-US`.
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            region: Some("US".to_string()),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.region {
            Some(region) => write!(f, "{}-{}", self.language, region),
            None => f.write_str(&self.language),
        }
    }
}

impl FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Locale {
    type Error = LocaleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.to_string()
    }
}

fn is_alpha(s: &str, len: std::ops::RangeInclusive<usize>) -> bool {
    len.contains(&s.len()) && s.bytes().all(|b| b.is_ascii_alphabetic())
}
