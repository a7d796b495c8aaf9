use base64::Engine;
use serde_json::Value;

use crate::{RenderInfo, ResolvedParameters, ValidationResult};

/// One screenshot request. Style options are kept as raw JSON values so that
/// wrong-typed input reaches the validator instead of failing deserialization.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    pub code: String,
    pub language: Option<String>,
    pub theme: Option<Value>,
    pub frame_style: Option<Value>,
    pub background: Option<Value>,
    pub font_family: Option<Value>,
    pub font_size: Option<Value>,
    pub line_numbers: Option<Value>,
    pub shadow: Option<Value>,
    pub reflection: Option<Value>,
    pub rounded_corners: Option<Value>,
    pub border_glow: Option<Value>,
    pub window_title: Option<Value>,
    pub watermark: Option<Value>,
    pub highlight_lines: Vec<usize>,
}

impl GenerationRequest {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Self::default()
        }
    }

    pub fn language(mut self, language: &str) -> Self {
        self.language = Some(language.to_string());
        self
    }

    pub fn theme(mut self, theme: &str) -> Self {
        self.theme = Some(Value::from(theme));
        self
    }

    pub fn frame_style(mut self, frame_style: &str) -> Self {
        self.frame_style = Some(Value::from(frame_style));
        self
    }

    pub fn background(mut self, background: &str) -> Self {
        self.background = Some(Value::from(background));
        self
    }

    pub fn font_family(mut self, font_family: &str) -> Self {
        self.font_family = Some(Value::from(font_family));
        self
    }

    pub fn font_size(mut self, font_size: i64) -> Self {
        self.font_size = Some(Value::from(font_size));
        self
    }

    pub fn line_numbers(mut self, enabled: bool) -> Self {
        self.line_numbers = Some(Value::Bool(enabled));
        self
    }

    pub fn shadow(mut self, enabled: bool) -> Self {
        self.shadow = Some(Value::Bool(enabled));
        self
    }

    pub fn reflection(mut self, enabled: bool) -> Self {
        self.reflection = Some(Value::Bool(enabled));
        self
    }

    pub fn rounded_corners(mut self, enabled: bool) -> Self {
        self.rounded_corners = Some(Value::Bool(enabled));
        self
    }

    pub fn border_glow(mut self, enabled: bool) -> Self {
        self.border_glow = Some(Value::Bool(enabled));
        self
    }

    pub fn window_title(mut self, title: &str) -> Self {
        self.window_title = Some(Value::from(title));
        self
    }

    pub fn watermark(mut self, text: &str) -> Self {
        self.watermark = Some(Value::from(text));
        self
    }

    pub fn highlight_lines(mut self, lines: Vec<usize>) -> Self {
        self.highlight_lines = lines;
        self
    }
}

#[derive(Debug, Clone)]
pub struct GenerationOutput {
    pub summary: String,
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub language: String,
    pub parameters: ResolvedParameters,
    pub effects: Vec<&'static str>,
    pub render: RenderInfo,
    pub validation: ValidationResult,
}

impl GenerationOutput {
    pub fn png_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.png)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unsupported: {0}")]
    Unsupported(String),
    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("render error: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, Error>;
