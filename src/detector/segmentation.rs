// WHY: Delimiter-based clause splitting; the only segmentation the engine performs

use super::lexicon::Lexicon;

/// Split text on sentence delimiters, dropping blank and whitespace-only pieces.
/// Pieces borrow from the input and keep their original surrounding whitespace.
pub fn split_segments<'a>(lexicon: &Lexicon, text: &'a str) -> Vec<&'a str> {
    let mut segments = Vec::new();
    let mut start = 0;

    for delimiter in lexicon.delimiter_spans(text) {
        push_non_blank(&mut segments, &text[start..delimiter.start]);
        start = delimiter.end;
    }
    push_non_blank(&mut segments, &text[start..]);

    segments
}

fn push_non_blank<'a>(segments: &mut Vec<&'a str>, piece: &'a str) {
    if !piece.trim().is_empty() {
        segments.push(piece);
    }
}
