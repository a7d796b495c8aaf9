use log::{debug, warn};
use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::options::is_hex_color;
use crate::{
    FontFamily, FrameStyle, GenerationRequest, AVAILABLE_BACKGROUNDS, AVAILABLE_THEMES,
    MAX_FONT_SIZE, MIN_FONT_SIZE, RANDOM_FONT_SIZE_MAX, RANDOM_FONT_SIZE_MIN,
};

/// Corrections and random fills recorded while resolving one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub random_selections: Vec<String>,
    pub fallback_notices: Vec<String>,
}

/// A request after validation: every option holds an in-domain value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedParameters {
    pub theme: String,
    pub frame_style: FrameStyle,
    pub background: String,
    pub font_family: FontFamily,
    pub font_size: u32,
    pub line_numbers: bool,
    pub shadow: bool,
    pub reflection: bool,
    pub rounded_corners: bool,
    pub border_glow: bool,
    pub window_title: Option<String>,
    pub watermark: Option<String>,
    pub highlight_lines: Vec<usize>,
}

type Draw<T> = Box<dyn Fn(&mut dyn RngCore) -> T>;

/// How one option is resolved: what it accepts, what replaces an invalid
/// value, and how an unset value is filled.
pub(crate) struct Rule<T> {
    label: &'static str,
    default: T,
    accept: fn(&Value) -> Option<T>,
    draw: Option<Draw<T>>,
}

impl<T: Clone + fmt::Display + 'static> Rule<T> {
    pub(crate) fn new(label: &'static str, default: T, accept: fn(&Value) -> Option<T>) -> Self {
        Self {
            label,
            default,
            accept,
            draw: None,
        }
    }

    pub(crate) fn random(mut self, draw: impl Fn(&mut dyn RngCore) -> T + 'static) -> Self {
        self.draw = Some(Box::new(draw));
        self
    }
}

impl ValidationResult {
    /// Resolves one option. Unset values are drawn at random when the rule has
    /// a draw, otherwise they take the default silently; invalid values take
    /// the default and leave a fallback notice.
    pub(crate) fn resolve<T: Clone + fmt::Display + 'static>(
        &mut self,
        raw: Option<&Value>,
        rule: &Rule<T>,
        rng: &mut dyn RngCore,
    ) -> T {
        let raw = raw.filter(|value| !value.is_null());
        let Some(raw) = raw else {
            return match &rule.draw {
                Some(draw) => {
                    let value = draw(rng);
                    debug!("randomly selected {}: {}", rule.label, value);
                    self.random_selections.push(rule.label.to_string());
                    value
                }
                None => rule.default.clone(),
            };
        };
        match (rule.accept)(raw) {
            Some(value) => value,
            None => {
                let shown = display_value(raw);
                warn!(
                    "invalid {} '{}', falling back to '{}'",
                    rule.label.to_ascii_lowercase(),
                    shown,
                    rule.default
                );
                self.fallback_notices.push(format!(
                    "Invalid {} '{}', using '{}'",
                    rule.label.to_ascii_lowercase(),
                    shown,
                    rule.default
                ));
                rule.default.clone()
            }
        }
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn pick(rng: &mut dyn RngCore, domain: &[&'static str], default: &'static str) -> String {
    domain.choose(rng).copied().unwrap_or(default).to_string()
}

fn accept_theme(value: &Value) -> Option<String> {
    let name = value.as_str()?;
    AVAILABLE_THEMES
        .iter()
        .any(|candidate| *candidate == name)
        .then(|| name.to_string())
}

fn accept_frame(value: &Value) -> Option<FrameStyle> {
    FrameStyle::parse(value.as_str()?)
}

fn accept_background(value: &Value) -> Option<String> {
    let name = value.as_str()?;
    let listed = AVAILABLE_BACKGROUNDS.iter().any(|candidate| *candidate == name);
    (listed || is_hex_color(name)).then(|| name.to_string())
}

fn accept_font(value: &Value) -> Option<FontFamily> {
    FontFamily::parse(value.as_str()?)
}

fn accept_font_size(value: &Value) -> Option<u32> {
    let size = value.as_i64()?;
    (MIN_FONT_SIZE as i64..=MAX_FONT_SIZE as i64)
        .contains(&size)
        .then_some(size as u32)
}

fn accept_bool(value: &Value) -> Option<bool> {
    value.as_bool()
}

fn coin(label: &'static str, default: bool, weight: f64) -> Rule<bool> {
    Rule::new(label, default, accept_bool).random(move |rng| rng.random_bool(weight))
}

fn optional_text(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Validates every style option of `request`, filling unset options from `rng`.
pub fn validate(
    request: &GenerationRequest,
    rng: &mut dyn RngCore,
) -> (ResolvedParameters, ValidationResult) {
    let mut result = ValidationResult::default();

    let theme = Rule::new("Theme", "dracula".to_string(), accept_theme)
        .random(|rng| pick(rng, &AVAILABLE_THEMES, "dracula"));
    let frame = Rule::new("Frame", FrameStyle::Macos, accept_frame).random(|rng| {
        FrameStyle::ALL
            .choose(rng)
            .copied()
            .unwrap_or(FrameStyle::Macos)
    });
    let background = Rule::new("Background", "purple".to_string(), accept_background)
        .random(|rng| pick(rng, AVAILABLE_BACKGROUNDS, "purple"));
    let font = Rule::new("Font", FontFamily::FiraCode, accept_font).random(|rng| {
        FontFamily::ALL
            .choose(rng)
            .copied()
            .unwrap_or(FontFamily::FiraCode)
    });
    let font_size = Rule::new("Font Size", 14u32, accept_font_size)
        .random(|rng| rng.random_range(RANDOM_FONT_SIZE_MIN..=RANDOM_FONT_SIZE_MAX));
    let line_numbers = Rule::new("Line Numbers", true, accept_bool);
    let reflection = Rule::new("Reflection", false, accept_bool);
    let shadow = coin("Shadow", true, 0.5);
    let rounded = coin("Rounded Corners", true, 0.5);
    let glow = coin("Border Glow", false, 0.2);

    let params = ResolvedParameters {
        theme: result.resolve(request.theme.as_ref(), &theme, rng),
        frame_style: result.resolve(request.frame_style.as_ref(), &frame, rng),
        background: result.resolve(request.background.as_ref(), &background, rng),
        font_family: result.resolve(request.font_family.as_ref(), &font, rng),
        font_size: result.resolve(request.font_size.as_ref(), &font_size, rng),
        line_numbers: result.resolve(request.line_numbers.as_ref(), &line_numbers, rng),
        shadow: result.resolve(request.shadow.as_ref(), &shadow, rng),
        reflection: result.resolve(request.reflection.as_ref(), &reflection, rng),
        rounded_corners: result.resolve(request.rounded_corners.as_ref(), &rounded, rng),
        border_glow: result.resolve(request.border_glow.as_ref(), &glow, rng),
        window_title: optional_text(request.window_title.as_ref()),
        watermark: optional_text(request.watermark.as_ref()),
        highlight_lines: request.highlight_lines.clone(),
    };
    (params, result)
}
