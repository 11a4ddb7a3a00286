//! Search term classifier.

use crate::model::task::{format_storage_date, parse_search_date};

/// Interpretation of a non-empty search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchTerm {
    /// Term was a `DD.MM.YYYY` date; carries the `YYYYMMDD` storage form.
    ExactDate(String),
    /// Term is matched as a case-sensitive substring of title or comment.
    TextFragment(String),
}

/// Classifies `term` as an exact date or a text fragment.
///
/// Empty terms are not special-cased here; callers skip classification and
/// list everything instead.
pub fn classify(term: &str) -> SearchTerm {
    match parse_search_date(term) {
        Some(date) => SearchTerm::ExactDate(format_storage_date(date)),
        None => SearchTerm::TextFragment(term.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::{classify, SearchTerm};

    #[test]
    fn dotted_date_becomes_storage_date() {
        assert_eq!(
            classify("25.12.2024"),
            SearchTerm::ExactDate("20241225".to_string())
        );
    }

    #[test]
    fn plain_text_is_fragment() {
        assert_eq!(
            classify("buy milk"),
            SearchTerm::TextFragment("buy milk".to_string())
        );
    }

    #[test]
    fn near_dates_fall_back_to_text() {
        for term in ["32.01.2024", "2024-12-25", "25.12.24", "25/12/2024", " 25.12.2024"] {
            assert_eq!(classify(term), SearchTerm::TextFragment(term.to_string()));
        }
    }
}
