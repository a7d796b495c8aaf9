use crate::{Error, Line, Result, Span, TextStyle};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::str::FromStr;
use syntect::easy::HighlightLines;
use syntect::highlighting::{
    Color, FontStyle, ScopeSelectors, StyleModifier, Theme, ThemeItem, ThemeSet, ThemeSettings,
};
use syntect::parsing::{SyntaxReference, SyntaxSet};

static SYNTAX_SET: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: Lazy<ThemeSet> = Lazy::new(ThemeSet::load_defaults);
static CUSTOM_THEMES: Lazy<HashMap<&'static str, Theme>> = Lazy::new(|| {
    CUSTOM_THEME_SPECS
        .iter()
        .map(|spec| (spec.name, build_theme(spec)))
        .collect()
});

const FALLBACK_THEME: &str = "base16-ocean.dark";

/// Highlighted code plus the theme's default foreground and background.
pub(crate) struct Highlighted {
    pub(crate) lines: Vec<Line>,
    pub(crate) foreground: String,
    pub(crate) background: String,
}

pub(crate) fn highlight_code(text: &str, language: &str, theme_name: &str) -> Result<Highlighted> {
    let ps = &*SYNTAX_SET;
    let theme = resolve_theme(theme_name)?;
    let syntax = find_syntax(ps, language);

    let foreground = color_to_hex(theme.settings.foreground.unwrap_or(Color::WHITE));
    let background = color_to_hex(theme.settings.background.unwrap_or(Color::BLACK));

    let mut highlighter = HighlightLines::new(syntax, theme);
    let mut lines = Vec::new();

    let raw_lines: Vec<&str> = text.split('\n').collect();
    for (idx, raw) in raw_lines.iter().enumerate() {
        let mut line_with_end = raw.to_string();
        if idx + 1 < raw_lines.len() {
            line_with_end.push('\n');
        }

        let regions = highlighter
            .highlight_line(&line_with_end, ps)
            .map_err(|err| Error::Render(format!("highlight: {err}")))?;
        let mut line = Line::default();

        for (style, piece) in regions {
            let text_piece = piece.trim_end_matches(['\n', '\r']);
            if text_piece.is_empty() {
                continue;
            }

            let mut span_style = TextStyle::default();
            if style.foreground.a > 0 {
                span_style.fg = Some(color_to_hex(style.foreground));
            }
            if style.background.a > 0 && style.background != theme_background(theme) {
                span_style.bg = Some(color_to_hex(style.background));
            }
            span_style.bold = style.font_style.contains(FontStyle::BOLD);
            span_style.italic = style.font_style.contains(FontStyle::ITALIC);
            span_style.underline = style.font_style.contains(FontStyle::UNDERLINE);

            push_span(&mut line.spans, text_piece.to_string(), span_style);
        }
        lines.push(line);
    }

    Ok(Highlighted {
        lines,
        foreground,
        background,
    })
}

/// Name of the syntax the highlighter would pick from the first line alone.
pub(crate) fn guess_syntax_name(code: &str) -> Option<String> {
    let first_line = code.lines().next().unwrap_or("");
    SYNTAX_SET
        .find_syntax_by_first_line(first_line)
        .map(|syntax| syntax.name.clone())
}

/// Token, then extension, then case-insensitive name, then plain text.
fn find_syntax<'a>(ps: &'a SyntaxSet, language: &str) -> &'a SyntaxReference {
    ps.find_syntax_by_token(language)
        .or_else(|| ps.find_syntax_by_extension(language))
        .or_else(|| {
            ps.syntaxes()
                .iter()
                .find(|syntax| syntax.name.eq_ignore_ascii_case(language))
        })
        .unwrap_or_else(|| ps.find_syntax_plain_text())
}

fn resolve_theme(name: &str) -> Result<&'static Theme> {
    if let Some(theme) = CUSTOM_THEMES.get(name) {
        return Ok(theme);
    }
    let ts = &*THEME_SET;
    ts.themes
        .get(name)
        .or_else(|| ts.themes.get(FALLBACK_THEME))
        .or_else(|| ts.themes.values().next())
        .ok_or_else(|| Error::Render("no themes available".to_string()))
}

fn theme_background(theme: &Theme) -> Color {
    theme.settings.background.unwrap_or(Color::BLACK)
}

fn push_span(spans: &mut Vec<Span>, text: String, style: TextStyle) {
    if let Some(last) = spans.last_mut() {
        if last.style == style {
            last.text.push_str(&text);
            return;
        }
    }
    spans.push(Span { text, style });
}

fn color_to_hex(color: Color) -> String {
    format!("#{:02X}{:02X}{:02X}", color.r, color.g, color.b)
}

struct ThemeSpec {
    name: &'static str,
    foreground: &'static str,
    background: &'static str,
    /// (scope selector, color, bold, italic)
    scopes: &'static [(&'static str, &'static str, bool, bool)],
}

const CUSTOM_THEME_SPECS: &[ThemeSpec] = &[
    ThemeSpec {
        name: "dracula",
        foreground: "#F8F8F2",
        background: "#282A36",
        scopes: &[
            ("comment", "#6272A4", false, true),
            ("string", "#F1FA8C", false, false),
            ("constant.numeric, constant.language", "#BD93F9", false, false),
            ("keyword, storage", "#FF79C6", false, false),
            ("storage.type", "#8BE9FD", false, true),
            ("entity.name.function, support.function", "#50FA7B", false, false),
            ("entity.name.class, entity.name.type, support.class", "#8BE9FD", false, false),
            ("variable.parameter", "#FFB86C", false, true),
            ("entity.other.attribute-name", "#50FA7B", false, true),
            ("entity.name.tag", "#FF79C6", false, false),
        ],
    },
    ThemeSpec {
        name: "monokai",
        foreground: "#F8F8F2",
        background: "#272822",
        scopes: &[
            ("comment", "#75715E", false, false),
            ("string", "#E6DB74", false, false),
            ("constant.numeric, constant.language, constant.character", "#AE81FF", false, false),
            ("keyword, storage", "#F92672", false, false),
            ("storage.type", "#66D9EF", false, true),
            ("entity.name.function, support.function", "#A6E22E", false, false),
            ("entity.name.class, entity.name.type", "#A6E22E", false, false),
            ("variable.parameter", "#FD971F", false, true),
            ("entity.name.tag", "#F92672", false, false),
            ("entity.other.attribute-name", "#A6E22E", false, false),
        ],
    },
    ThemeSpec {
        name: "nord",
        foreground: "#D8DEE9",
        background: "#2E3440",
        scopes: &[
            ("comment", "#616E88", false, true),
            ("string", "#A3BE8C", false, false),
            ("constant.numeric", "#B48EAD", false, false),
            ("constant.language", "#81A1C1", false, false),
            ("keyword, storage", "#81A1C1", false, false),
            ("entity.name.function, support.function", "#88C0D0", false, false),
            ("entity.name.class, entity.name.type, support.class", "#8FBCBB", false, false),
            ("punctuation", "#ECEFF4", false, false),
            ("entity.name.tag", "#81A1C1", false, false),
        ],
    },
    ThemeSpec {
        name: "one-dark",
        foreground: "#ABB2BF",
        background: "#282C34",
        scopes: &[
            ("comment", "#5C6370", false, true),
            ("string", "#98C379", false, false),
            ("constant.numeric, constant.language", "#D19A66", false, false),
            ("keyword, storage", "#C678DD", false, false),
            ("entity.name.function, support.function", "#61AFEF", false, false),
            ("entity.name.class, entity.name.type, support.class", "#E5C07B", false, false),
            ("variable.parameter", "#E06C75", false, false),
            ("entity.name.tag", "#E06C75", false, false),
            ("entity.other.attribute-name", "#D19A66", false, false),
        ],
    },
    ThemeSpec {
        name: "gruvbox-dark",
        foreground: "#EBDBB2",
        background: "#282828",
        scopes: &[
            ("comment", "#928374", false, true),
            ("string", "#B8BB26", false, false),
            ("constant.numeric, constant.language", "#D3869B", false, false),
            ("keyword, storage", "#FB4934", false, false),
            ("storage.type", "#FABD2F", false, false),
            ("entity.name.function, support.function", "#B8BB26", true, false),
            ("entity.name.class, entity.name.type", "#FABD2F", false, false),
            ("variable.parameter", "#83A598", false, false),
            ("keyword.operator", "#FE8019", false, false),
        ],
    },
    ThemeSpec {
        name: "github-dark",
        foreground: "#C9D1D9",
        background: "#0D1117",
        scopes: &[
            ("comment", "#8B949E", false, false),
            ("string", "#A5D6FF", false, false),
            ("constant.numeric, constant.language", "#79C0FF", false, false),
            ("keyword, storage", "#FF7B72", false, false),
            ("entity.name.function, support.function", "#D2A8FF", false, false),
            ("entity.name.class, entity.name.type", "#FFA657", false, false),
            ("variable.parameter", "#FFA657", false, false),
            ("entity.name.tag", "#7EE787", false, false),
        ],
    },
    ThemeSpec {
        name: "vs",
        foreground: "#000000",
        background: "#FFFFFF",
        scopes: &[
            ("comment", "#008000", false, false),
            ("string", "#A31515", false, false),
            ("constant.numeric", "#000000", false, false),
            ("keyword, storage, constant.language", "#0000FF", false, false),
            ("entity.name.class, entity.name.type, support.class", "#2B91AF", false, false),
            ("entity.name.tag", "#A31515", false, false),
            ("entity.other.attribute-name", "#FF0000", false, false),
        ],
    },
];

fn build_theme(spec: &ThemeSpec) -> Theme {
    let mut theme = Theme {
        name: Some(spec.name.to_string()),
        author: Some("codeshot".to_string()),
        settings: ThemeSettings {
            foreground: Some(hex_to_color(spec.foreground)),
            background: Some(hex_to_color(spec.background)),
            ..ThemeSettings::default()
        },
        scopes: Vec::new(),
    };

    for (scope, fg, bold, italic) in spec.scopes {
        let Ok(scope) = ScopeSelectors::from_str(scope) else {
            continue;
        };
        let mut font_style = FontStyle::empty();
        if *bold {
            font_style |= FontStyle::BOLD;
        }
        if *italic {
            font_style |= FontStyle::ITALIC;
        }
        theme.scopes.push(ThemeItem {
            scope,
            style: StyleModifier {
                foreground: Some(hex_to_color(fg)),
                background: None,
                font_style: Some(font_style),
            },
        });
    }

    theme
}

fn hex_to_color(hex: &str) -> Color {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return Color::WHITE;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
    let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
    let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
    Color { r, g, b, a: 0xFF }
}
