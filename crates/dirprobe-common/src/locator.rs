//! Locators and ordered candidate lists.
//!
//! A [`Locator`] pairs a lookup strategy with a pattern. A [`CandidateList`]
//! groups the locators that may identify one logical target ("the login
//! submit button"), ordered from most specific to most generic. The first
//! locator that matches wins, even when a later one would also match.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How a locator pattern is interpreted by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Css,
    XPath,
    LinkText,
    TagName,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Css => "css",
            Strategy::XPath => "xpath",
            Strategy::LinkText => "linkText",
            Strategy::TagName => "tagName",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocatorParseError {
    #[error("Unknown locator strategy '{0}'")]
    UnknownStrategy(String),
    #[error("Locator pattern is empty")]
    EmptyPattern,
}

/// A strategy plus pattern, e.g. `css=button[type='submit']`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locator {
    strategy: Strategy,
    pattern: String,
}

impl Locator {
    pub fn new(strategy: Strategy, pattern: impl Into<String>) -> Self {
        Self {
            strategy,
            pattern: pattern.into(),
        }
    }

    pub fn css(pattern: impl Into<String>) -> Self {
        Self::new(Strategy::Css, pattern)
    }

    pub fn xpath(pattern: impl Into<String>) -> Self {
        Self::new(Strategy::XPath, pattern)
    }

    pub fn link_text(text: impl Into<String>) -> Self {
        Self::new(Strategy::LinkText, text)
    }

    pub fn tag_name(tag: impl Into<String>) -> Self {
        Self::new(Strategy::TagName, tag)
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy.as_str(), self.pattern)
    }
}

impl FromStr for Locator {
    type Err = LocatorParseError;

    /// Parses `strategy=pattern`. A string without a recognised prefix is
    /// taken as a CSS selector, so `input[name='q']` stays usable as-is.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(LocatorParseError::EmptyPattern);
        }

        if let Some((prefix, pattern)) = s.split_once('=')
            && !prefix.is_empty()
            && prefix.chars().all(|c| c.is_ascii_alphabetic())
        {
            let strategy = match prefix.to_ascii_lowercase().as_str() {
                "css" => Strategy::Css,
                "xpath" => Strategy::XPath,
                "link" | "linktext" => Strategy::LinkText,
                "tag" | "tagname" => Strategy::TagName,
                other => return Err(LocatorParseError::UnknownStrategy(other.to_string())),
            };
            let pattern = pattern.trim();
            if pattern.is_empty() {
                return Err(LocatorParseError::EmptyPattern);
            }
            return Ok(Self::new(strategy, pattern));
        }

        Ok(Self::css(s))
    }
}

impl TryFrom<String> for Locator {
    type Error = LocatorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Locator> for String {
    fn from(locator: Locator) -> Self {
        locator.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CandidateListError {
    #[error("Candidate list for '{0}' has no locators")]
    Empty(String),
}

/// Ordered fallback locators for one logical UI target. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateList {
    name: String,
    locators: Vec<Locator>,
}

impl CandidateList {
    /// Starts a list with its preferred locator.
    pub fn new(name: impl Into<String>, first: Locator) -> Self {
        Self {
            name: name.into(),
            locators: vec![first],
        }
    }

    /// Appends a fallback, tried only if every earlier locator misses.
    pub fn or(mut self, locator: Locator) -> Self {
        self.locators.push(locator);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn locators(&self) -> &[Locator] {
        &self.locators
    }

    pub fn len(&self) -> usize {
        self.locators.len()
    }

    /// Always false; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.locators.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Locator> {
        self.locators.iter()
    }
}

impl TryFrom<(String, Vec<Locator>)> for CandidateList {
    type Error = CandidateListError;

    fn try_from((name, locators): (String, Vec<Locator>)) -> Result<Self, Self::Error> {
        if locators.is_empty() {
            return Err(CandidateListError::Empty(name));
        }
        Ok(Self { name, locators })
    }
}

impl fmt::Display for CandidateList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
