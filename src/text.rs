//! Text assembly and reference-section stripping
//!
//! The conversion pipeline joins per-page text fragments into a single blob,
//! then cuts everything from the bibliography heading onward before the text
//! is written out as a Word document.

/// Returned in place of an empty extraction result so callers can tell
/// "nothing extracted" apart from an empty document.
pub const NO_TEXT_SENTINEL: &str = "No text could be extracted from the PDF.";

/// Heading lines recognized as the start of a reference/bibliography section.
/// Compared case-insensitively against the trimmed line content.
pub const REFERENCE_HEADINGS: &[&str] = &[
    "references",
    "bibliography",
    "works cited",
    // Korean equivalents
    "참고문헌",
    "참고 문헌",
    "참고 자료",
    "참고서적",
];

/// Join per-page text fragments in page order, each followed by a newline,
/// and trim the result. All-empty input yields [`NO_TEXT_SENTINEL`].
pub fn join_page_texts<'a>(pages: impl IntoIterator<Item = &'a str>) -> String {
    let mut text = String::new();
    for page in pages {
        text.push_str(page);
        text.push('\n');
    }

    let trimmed = text.trim();
    if trimmed.is_empty() {
        NO_TEXT_SENTINEL.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Truncate `text` at the first reference-section heading.
///
/// A heading is a whole line (after trimming) that equals one of
/// [`REFERENCE_HEADINGS`], ignoring case. Recognized line breaks are `\r\n`,
/// `\n`, and a lone `\r`. The heading must be preceded by a line break; the
/// cut removes that leading break and everything after it. A heading that is
/// the final line still truncates even without a trailing break. Only the
/// first match in document order is used, so a heading appearing mid-document
/// truncates early. Without a match the input is returned unchanged.
pub fn strip_reference_section(text: &str) -> &str {
    let bytes = text.as_bytes();
    let mut line_start = 0;
    // Start of the line break preceding the current line; the very first
    // line has none and is never a cut point.
    let mut delim_start: Option<usize> = None;

    loop {
        let mut line_end = line_start;
        while line_end < bytes.len() && bytes[line_end] != b'\n' && bytes[line_end] != b'\r' {
            line_end += 1;
        }

        if let Some(cut) = delim_start {
            if is_reference_heading(&text[line_start..line_end]) {
                return &text[..cut];
            }
        }

        if line_end >= bytes.len() {
            break;
        }

        let break_end = if bytes[line_end] == b'\r'
            && line_end + 1 < bytes.len()
            && bytes[line_end + 1] == b'\n'
        {
            line_end + 2
        } else {
            line_end + 1
        };
        delim_start = Some(line_end);
        line_start = break_end;
    }

    text
}

fn is_reference_heading(line: &str) -> bool {
    let candidate = line.trim().to_lowercase();
    REFERENCE_HEADINGS.iter().any(|h| *h == candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn join_preserves_page_order() {
        let pages = ["first page", "second page", "third page"];
        assert_eq!(
            join_page_texts(pages),
            "first page\nsecond page\nthird page"
        );
    }

    #[test]
    fn join_keeps_empty_pages_in_place() {
        let pages = ["first", "", "third"];
        assert_eq!(join_page_texts(pages), "first\n\nthird");
    }

    #[test]
    fn join_all_empty_pages_yields_sentinel() {
        assert_eq!(join_page_texts(["", "", ""]), NO_TEXT_SENTINEL);
        assert_eq!(join_page_texts([]), NO_TEXT_SENTINEL);
        assert_eq!(join_page_texts(["   ", "\n"]), NO_TEXT_SENTINEL);
    }

    #[test]
    fn strip_cuts_before_heading_line() {
        let text = "Introduction\nBody text.\nReferences\n[1] Some paper.";
        assert_eq!(strip_reference_section(text), "Introduction\nBody text.");
    }

    #[rstest]
    #[case("References")]
    #[case("REFERENCES")]
    #[case("references")]
    #[case("Bibliography")]
    #[case("Works Cited")]
    #[case("WORKS CITED")]
    #[case("참고문헌")]
    #[case("참고 문헌")]
    #[case("참고 자료")]
    #[case("참고서적")]
    fn strip_recognizes_heading_variants(#[case] heading: &str) {
        let text = format!("Body text.\n{}\n[1] Some paper.", heading);
        assert_eq!(strip_reference_section(&text), "Body text.");
    }

    #[test]
    fn strip_matches_heading_with_surrounding_whitespace() {
        let text = "Body text.\n  References  \n[1] Some paper.";
        assert_eq!(strip_reference_section(text), "Body text.");
    }

    #[test]
    fn strip_handles_crlf_delimiters() {
        let text = "Body text.\r\nReferences\r\n[1] Some paper.";
        assert_eq!(strip_reference_section(text), "Body text.");
    }

    #[test]
    fn strip_handles_lone_cr_delimiters() {
        let text = "Body text.\rReferences\r[1] Some paper.";
        assert_eq!(strip_reference_section(text), "Body text.");
    }

    #[test]
    fn strip_handles_mixed_line_breaks() {
        let text = "Intro\r\nBody text.\rMore body.\nReferences\n[1] Some paper.";
        assert_eq!(
            strip_reference_section(text),
            "Intro\r\nBody text.\rMore body."
        );
    }

    #[test]
    fn strip_without_heading_is_identity() {
        let text = "Body text.\nMore body text referencing things.";
        assert_eq!(strip_reference_section(text), text);
    }

    #[test]
    fn strip_ignores_heading_embedded_in_a_line() {
        let text = "See the References section below.\nBody continues.";
        assert_eq!(strip_reference_section(text), text);
    }

    #[test]
    fn strip_requires_leading_line_break() {
        // A heading as the very first line has no leading delimiter.
        let text = "References\n[1] Some paper.";
        assert_eq!(strip_reference_section(text), text);
    }

    #[test]
    fn strip_uses_first_match_only() {
        let text = "Intro\nReferences\nmid-document use\nBibliography\ntail";
        assert_eq!(strip_reference_section(text), "Intro");
    }

    #[test]
    fn strip_matches_heading_as_last_line() {
        let text = "Body text.\nReferences";
        assert_eq!(strip_reference_section(text), "Body text.");
    }

    #[test]
    fn strip_is_idempotent() {
        let text = "Intro\nBody.\nReferences\n[1] A paper.\n[2] Another.";
        let once = strip_reference_section(text);
        let twice = strip_reference_section(once);
        assert_eq!(once, twice);
    }
}
