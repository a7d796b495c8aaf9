//! Static option domains: themes, frames, backgrounds, fonts and effect presets.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameStyle {
    Macos,
    Windows,
    Floating,
    Minimal,
    None,
}

impl FrameStyle {
    pub const ALL: [FrameStyle; 5] = [
        FrameStyle::Macos,
        FrameStyle::Windows,
        FrameStyle::Floating,
        FrameStyle::Minimal,
        FrameStyle::None,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FrameStyle::Macos => "macos",
            FrameStyle::Windows => "windows",
            FrameStyle::Floating => "floating",
            FrameStyle::Minimal => "minimal",
            FrameStyle::None => "none",
        }
    }

    pub fn parse(value: &str) -> Option<FrameStyle> {
        Self::ALL.into_iter().find(|style| style.as_str() == value)
    }

    /// Every style except `none` reserves title-bar space, even the ones that
    /// draw no chrome.
    pub fn reserves_title_bar(self) -> bool {
        !matches!(self, FrameStyle::None)
    }
}

impl fmt::Display for FrameStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontFamily {
    FiraCode,
    JetbrainsMono,
    SourceCodePro,
    System,
}

impl FontFamily {
    pub const ALL: [FontFamily; 4] = [
        FontFamily::FiraCode,
        FontFamily::JetbrainsMono,
        FontFamily::SourceCodePro,
        FontFamily::System,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FontFamily::FiraCode => "fira-code",
            FontFamily::JetbrainsMono => "jetbrains-mono",
            FontFamily::SourceCodePro => "source-code-pro",
            FontFamily::System => "system",
        }
    }

    pub fn parse(value: &str) -> Option<FontFamily> {
        Self::ALL.into_iter().find(|family| family.as_str() == value)
    }

    /// Directory and file stem of the bundled font files, plus the file extension.
    pub(crate) fn bundle(self) -> Option<(&'static str, &'static str)> {
        match self {
            FontFamily::FiraCode => Some(("FiraCode", "ttf")),
            FontFamily::JetbrainsMono => Some(("JetBrainsMono", "ttf")),
            FontFamily::SourceCodePro => Some(("SourceCodePro", "otf")),
            FontFamily::System => None,
        }
    }
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Line-number gutter colors and the accent used for highlighted lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Palette {
    pub(crate) line_number_bg: &'static str,
    pub(crate) line_number_fg: &'static str,
    pub(crate) highlight: &'static str,
}

pub(crate) const DEFAULT_PALETTE: Palette = Palette {
    line_number_bg: "#2d2d2d",
    line_number_fg: "#8f8f8f",
    highlight: "#FF6B9D",
};

const DRACULA: Palette = Palette {
    line_number_bg: "#1a1b26",
    line_number_fg: "#565f89",
    highlight: "#FFE066",
};
const ONE_DARK: Palette = Palette {
    line_number_bg: "#282c34",
    line_number_fg: "#5c6370",
    highlight: "#61dafb",
};
const NORD: Palette = Palette {
    line_number_bg: "#2e3440",
    line_number_fg: "#616e88",
    highlight: "#4ECDC4",
};
const NORD_DARKER: Palette = Palette {
    line_number_bg: "#1e222a",
    line_number_fg: "#4c566a",
    highlight: "#88c0d0",
};
const GRUVBOX_DARK: Palette = Palette {
    line_number_bg: "#282828",
    line_number_fg: "#7c6f64",
    highlight: "#fabd2f",
};
const MATERIAL: Palette = Palette {
    line_number_bg: "#263238",
    line_number_fg: "#546e7a",
    highlight: "#ff5722",
};
const GITHUB_DARK: Palette = Palette {
    line_number_bg: "#0d1117",
    line_number_fg: "#6e7681",
    highlight: "#ffa657",
};
const SOLARIZED_DARK: Palette = Palette {
    line_number_bg: "#002b36",
    line_number_fg: "#586e75",
    highlight: "#2aa198",
};
const ZENBURN: Palette = Palette {
    line_number_bg: "#3f3f3f",
    line_number_fg: "#7f9f7f",
    highlight: "#dca3a3",
};
const TERMINAL_GREEN: Palette = Palette {
    line_number_bg: "#000000",
    line_number_fg: "#404040",
    highlight: "#00ff00",
};
const FRUITY: Palette = Palette {
    line_number_bg: "#111111",
    line_number_fg: "#ffffff",
    highlight: "#ff0080",
};
const RRT: Palette = Palette {
    line_number_bg: "#1e0010",
    line_number_fg: "#ff0080",
    highlight: "#00ffff",
};
const PARAISO_DARK: Palette = Palette {
    line_number_bg: "#2f1e2e",
    line_number_fg: "#776e71",
    highlight: "#ef6155",
};
const EMACS: Palette = Palette {
    line_number_bg: "#000000",
    line_number_fg: "#b2b2b2",
    highlight: "#00d4aa",
};
const SOLARIZED_LIGHT: Palette = Palette {
    line_number_bg: "#fafafa",
    line_number_fg: "#93a1a1",
    highlight: "#268bd2",
};
const CLASSIC_LIGHT: Palette = Palette {
    line_number_bg: "#ffffff",
    line_number_fg: "#2b91af",
    highlight: "#0000ff",
};
const FRIENDLY: Palette = Palette {
    line_number_bg: "#f8f8f8",
    line_number_fg: "#888888",
    highlight: "#d73a49",
};
const TANGO: Palette = Palette {
    line_number_bg: "#f5f5f5",
    line_number_fg: "#666666",
    highlight: "#ff6347",
};
const GRUVBOX_LIGHT: Palette = Palette {
    line_number_bg: "#fbf1c7",
    line_number_fg: "#7c6f64",
    highlight: "#af3a03",
};

pub(crate) struct ThemeEntry {
    pub(crate) name: &'static str,
    /// Highlighter theme the option renders with.
    pub(crate) style: &'static str,
    pub(crate) palette: Palette,
}

const fn theme(name: &'static str, style: &'static str, palette: Palette) -> ThemeEntry {
    ThemeEntry {
        name,
        style,
        palette,
    }
}

pub(crate) const THEMES: &[ThemeEntry] = &[
    theme("dracula", "dracula", DRACULA),
    theme("nord", "nord", NORD),
    theme("monokai", "monokai", DEFAULT_PALETTE),
    theme("material", "base16-ocean.dark", MATERIAL),
    theme("one-dark", "one-dark", ONE_DARK),
    theme("gruvbox-dark", "gruvbox-dark", GRUVBOX_DARK),
    theme("tokyo-night", "monokai", GRUVBOX_DARK),
    theme("catppuccin", "dracula", DRACULA),
    theme("github-dark", "github-dark", GITHUB_DARK),
    theme("solarized-dark", "Solarized (dark)", SOLARIZED_DARK),
    theme("zenburn", "base16-eighties.dark", ZENBURN),
    theme("vim", "base16-mocha.dark", TERMINAL_GREEN),
    theme("native", "base16-mocha.dark", TERMINAL_GREEN),
    theme("fruity", "monokai", FRUITY),
    theme("rrt", "base16-eighties.dark", RRT),
    theme("paraiso-dark", "base16-eighties.dark", PARAISO_DARK),
    theme("stata-dark", "base16-ocean.dark", PARAISO_DARK),
    theme("nord-darker", "nord", NORD_DARKER),
    theme("emacs", "base16-mocha.dark", EMACS),
    theme("terminal", "base16-mocha.dark", GITHUB_DARK),
    theme("hacker", "base16-mocha.dark", ONE_DARK),
    theme("cyberpunk", "monokai", FRUITY),
    theme("solarized-light", "Solarized (light)", SOLARIZED_LIGHT),
    theme("vs", "vs", CLASSIC_LIGHT),
    theme("github-light", "InspiredGitHub", SOLARIZED_LIGHT),
    theme("xcode", "InspiredGitHub", SOLARIZED_LIGHT),
    theme("atom-light", "base16-ocean.light", CLASSIC_LIGHT),
    theme("intellij-light", "InspiredGitHub", SOLARIZED_LIGHT),
    theme("sublime-light", "base16-ocean.light", CLASSIC_LIGHT),
    theme("friendly", "InspiredGitHub", FRIENDLY),
    theme("pastie", "InspiredGitHub", FRIENDLY),
    theme("tango", "base16-ocean.light", TANGO),
    theme("murphy", "base16-ocean.light", TANGO),
    theme("colorful", "InspiredGitHub", FRIENDLY),
    theme("gruvbox-light", "base16-ocean.light", GRUVBOX_LIGHT),
    theme("paraiso-light", "base16-ocean.light", GRUVBOX_LIGHT),
    theme("stata-light", "InspiredGitHub", GRUVBOX_LIGHT),
];

pub static AVAILABLE_THEMES: once_cell::sync::Lazy<Vec<&'static str>> =
    once_cell::sync::Lazy::new(|| THEMES.iter().map(|entry| entry.name).collect());

pub(crate) fn theme_entry(name: &str) -> Option<&'static ThemeEntry> {
    THEMES.iter().find(|entry| entry.name == name)
}

/// Highlighter theme for an option name; unknown names pass through as-is.
pub(crate) fn highlighter_style(name: &str) -> &str {
    theme_entry(name).map(|entry| entry.style).unwrap_or(name)
}

pub(crate) fn theme_palette(name: &str) -> Palette {
    theme_entry(name)
        .map(|entry| entry.palette)
        .unwrap_or(DEFAULT_PALETTE)
}

pub const AVAILABLE_BACKGROUNDS: &[&str] = &[
    "purple",
    "cyan",
    "orange",
    "pink",
    "green",
    "blue",
    "red",
    "yellow",
    "magenta",
    "teal",
    "lime",
    "indigo",
    "violet",
    "coral",
    "turquoise",
    "neon-purple",
    "transparent",
    "#1a1a2e",
    "#16213e",
    "#0f3460",
    "#533483",
    "#7209b7",
    "#2d1b69",
    "#0c0c0c",
    "#1e1e1e",
    "#2d2d2d",
    "#3c3c3c",
    "#4a4a4a",
];

pub(crate) const BACKGROUND_COLORS: &[(&str, &str)] = &[
    ("purple", "#8B5CF6"),
    ("cyan", "#06B6D4"),
    ("orange", "#F97316"),
    ("pink", "#EC4899"),
    ("green", "#10B981"),
    ("blue", "#3B82F6"),
    ("red", "#EF4444"),
    ("yellow", "#F59E0B"),
    ("magenta", "#D946EF"),
    ("teal", "#14B8A6"),
    ("lime", "#84CC16"),
    ("indigo", "#6366F1"),
    ("violet", "#8B5CF6"),
    ("coral", "#FF6B6B"),
    ("turquoise", "#17A2B8"),
];

pub(crate) const NEUTRAL_BACKGROUND: &str = "#1a1a2e";

pub(crate) fn named_background(name: &str) -> Option<&'static str> {
    BACKGROUND_COLORS
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, hex)| *hex)
}

pub(crate) fn is_hex_color(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct ShadowLayer {
    pub(crate) offset: (f32, f32),
    pub(crate) blur: f32,
    pub(crate) opacity: f32,
}

pub(crate) const SHADOW_LAYERS: [ShadowLayer; 3] = [
    ShadowLayer {
        offset: (15.0, 15.0),
        blur: 30.0,
        opacity: 0.4,
    },
    ShadowLayer {
        offset: (8.0, 8.0),
        blur: 18.0,
        opacity: 0.3,
    },
    ShadowLayer {
        offset: (4.0, 4.0),
        blur: 10.0,
        opacity: 0.25,
    },
];

pub(crate) const FALLBACK_FONTS: &[&str] = &[
    "DejaVu Sans Mono",
    "Consolas",
    "Monaco",
    "Lucida Console",
    "Liberation Mono",
    "Courier New",
];
