//! `keyword_check`: required keywords first, then `results_match`.

use super::{ResultsMatch, ValidationStrategy, Verdict};
use crate::content::LessonSpec;
use crate::db::DatasetStore;
use crate::error::Result;
use async_trait::async_trait;

/// Requires every keyword in `required_keywords` to appear in the query text
/// (case-insensitive substring match on the raw text, so a keyword inside a
/// string literal or comment also counts), then grades like [`ResultsMatch`].
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordCheck;

impl KeywordCheck {
    /// Returns the first required keyword, in declared order, missing from
    /// the query.
    pub fn first_missing<'a>(query: &str, keywords: &'a [String]) -> Option<&'a str> {
        let query = query.to_lowercase();
        keywords
            .iter()
            .find(|keyword| !query.contains(&keyword.to_lowercase()))
            .map(String::as_str)
    }
}

#[async_trait(?Send)]
impl ValidationStrategy for KeywordCheck {
    async fn evaluate(
        &self,
        datasets: &DatasetStore,
        dataset: &str,
        query: &str,
        lesson: &LessonSpec,
    ) -> Result<Verdict> {
        if let Some(keyword) = Self::first_missing(query, &lesson.required_keywords) {
            return Ok(Verdict::fail(format!(
                "Hint: You must use the `{}` keyword for this exercise.",
                keyword.to_uppercase()
            )));
        }

        ResultsMatch.evaluate(datasets, dataset, query, lesson).await
    }
}
