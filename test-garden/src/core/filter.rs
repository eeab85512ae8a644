//! Hierarchical topic filter.
//!
//! Matcher `i` constrains the topic at depth `i`. A topic stack shorter than
//! the matcher list is not yet constrained by the extra matchers; matchers
//! are unanchored and case-insensitive.

use regex::{Regex, RegexBuilder};

use crate::error::GardenError;

#[derive(Debug, Clone, Default)]
pub struct PatternFilter {
    matchers: Vec<Regex>,
}

impl PatternFilter {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, GardenError> {
        let matchers = patterns
            .iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| GardenError::InvalidPattern {
                        pattern: pattern.to_string(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { matchers })
    }

    /// True if every matcher that applies at this depth matches its topic.
    pub fn allows<S: AsRef<str>>(&self, topics: &[S]) -> bool {
        self.matchers
            .iter()
            .zip(topics)
            .all(|(matcher, topic)| matcher.is_match(topic.as_ref()))
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}
