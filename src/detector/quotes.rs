// WHY: Narration (matrix) and quoted speech are judged separately, so they must be pulled apart first

use super::lexicon::{Lexicon, QUOTE_PLACEHOLDER};

/// A document partitioned into narration and quoted speech
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteSplit {
    /// Document with every quotation span (marks included) replaced by the placeholder
    pub matrix: String,
    /// Interiors of every quotation span joined by the placeholder
    pub quotes: String,
    /// Number of quotation spans found
    pub quote_count: usize,
}

impl QuoteSplit {
    /// True when nothing but placeholders and whitespace is left outside the quotes
    pub fn matrix_is_placeholder_only(&self) -> bool {
        !self.matrix.is_empty()
            && self
                .matrix
                .chars()
                .all(|ch| ch == QUOTE_PLACEHOLDER || ch.is_whitespace())
    }
}

/// Partition a document into matrix and quotes. Total: unbalanced or absent quotation
/// marks simply stay in the matrix.
pub fn separate_quotes(lexicon: &Lexicon, document: &str) -> QuoteSplit {
    let spans = lexicon.quotation_spans(document);

    let mut matrix = String::with_capacity(document.len());
    let mut quotes = String::new();
    let mut last_end = 0;

    for (index, span) in spans.iter().enumerate() {
        matrix.push_str(&document[last_end..span.start]);
        matrix.push(QUOTE_PLACEHOLDER);

        if index > 0 {
            quotes.push(QUOTE_PLACEHOLDER);
        }
        quotes.push_str(interior(&document[span.clone()]));

        last_end = span.end;
    }
    matrix.push_str(&document[last_end..]);

    QuoteSplit {
        matrix,
        quotes,
        quote_count: spans.len(),
    }
}

/// Strip the single opening and closing mark from a matched quotation
fn interior(quotation: &str) -> &str {
    let mut chars = quotation.chars();
    chars.next();
    chars.next_back();
    chars.as_str()
}
