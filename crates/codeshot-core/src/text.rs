use crate::TRUNCATE_BOUNDARY_RATIO;

/// Marker that opens the notice appended to code cut for rendering.
pub(crate) const RENDER_TRUNCATION_MARKER: &str = "[truncated";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Truncated {
    pub(crate) text: String,
    pub(crate) original_lines: usize,
    pub(crate) original_chars: usize,
}

/// Cuts `text` to at most `max_lines` lines and `max_chars` characters.
/// Returns `None` when the text already fits. A character cut backs up to the
/// previous newline when that newline sits in the last fifth of the cap.
pub(crate) fn truncate_code(text: &str, max_chars: usize, max_lines: usize) -> Option<Truncated> {
    let original_lines = line_count(text);
    let original_chars = text.chars().count();
    if original_lines <= max_lines && original_chars <= max_chars {
        return None;
    }

    let mut cut = if original_lines > max_lines {
        text.split('\n').take(max_lines).collect::<Vec<_>>().join("\n")
    } else {
        text.to_string()
    };

    if cut.chars().count() > max_chars {
        let end = cut
            .char_indices()
            .nth(max_chars)
            .map(|(idx, _)| idx)
            .unwrap_or(cut.len());
        cut.truncate(end);
        if let Some(newline) = cut.rfind('\n') {
            let newline_chars = cut[..newline].chars().count();
            if newline_chars as f32 >= max_chars as f32 * TRUNCATE_BOUNDARY_RATIO {
                cut.truncate(newline);
            }
        }
    }

    let trimmed_len = cut.trim_end_matches(['\n', '\r']).len();
    cut.truncate(trimmed_len);
    Some(Truncated {
        text: cut,
        original_lines,
        original_chars,
    })
}

pub(crate) fn render_truncation_notice(truncated: &Truncated) -> String {
    format!(
        "\n\n{RENDER_TRUNCATION_MARKER}: {} lines, {} characters in total]",
        truncated.original_lines, truncated.original_chars
    )
}

pub(crate) fn line_count(text: &str) -> usize {
    text.split('\n').count()
}

pub(crate) fn detab(text: &str, tab_width: usize) -> String {
    let mut out = String::with_capacity(text.len());
    let mut col = 0usize;
    for ch in text.chars() {
        if ch == '\t' {
            let mut count = tab_width - col % tab_width;
            if count == 0 {
                count = tab_width;
            }
            out.extend(std::iter::repeat_n(' ', count));
            col += count;
        } else {
            if ch == '\n' {
                col = 0;
            } else {
                col += unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
            }
            out.push(ch);
        }
    }
    out
}

/// Upper-cases the first character and lower-cases the rest.
pub(crate) fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Upper-cases every letter that follows a non-letter, lower-cases the rest:
/// `one-dark` becomes `One-Dark`, `base16-ocean.dark` becomes `Base16-Ocean.Dark`.
pub(crate) fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_letter = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if prev_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_letter = true;
        } else {
            out.push(ch);
            prev_letter = false;
        }
    }
    out
}
