//! The `codeshot` tool call: JSON arguments in, a text part and an image
//! part out, or a structured error.

use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{fetch_code, Error, GenerationOutput, GenerationRequest, Generator};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ToolArguments {
    pub code: Option<String>,
    pub code_url: Option<String>,
    pub from_image: bool,
    pub language: Option<String>,
    pub theme: Option<Value>,
    pub frame_style: Option<Value>,
    pub background: Option<Value>,
    pub font_family: Option<Value>,
    pub font_size: Option<Value>,
    pub line_numbers: Option<Value>,
    pub window_title: Option<Value>,
    pub shadow: Option<Value>,
    pub reflection: Option<Value>,
    pub rounded_corners: Option<Value>,
    pub watermark: Option<Value>,
    pub border_glow: Option<Value>,
    pub highlight_lines: Vec<usize>,
}

impl ToolArguments {
    fn into_request(self, code: String) -> GenerationRequest {
        GenerationRequest {
            code,
            language: self.language.filter(|lang| !lang.trim().is_empty()),
            theme: self.theme,
            frame_style: self.frame_style,
            background: self.background,
            font_family: self.font_family,
            font_size: self.font_size,
            line_numbers: self.line_numbers,
            shadow: self.shadow,
            reflection: self.reflection,
            rounded_corners: self.rounded_corners,
            border_glow: self.border_glow,
            window_title: self.window_title,
            watermark: self.watermark,
            highlight_lines: self.highlight_lines,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentPart {
    Text {
        text: String,
    },
    Image {
        #[serde(rename = "mimeType")]
        mime_type: String,
        data: String,
    },
}

impl ContentPart {
    fn from_output(output: &GenerationOutput) -> Vec<ContentPart> {
        vec![
            ContentPart::Text {
                text: output.summary.clone(),
            },
            ContentPart::Image {
                mime_type: "image/png".to_string(),
                data: output.png_base64(),
            },
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidParams,
    InternalError,
}

impl ErrorCode {
    /// JSON-RPC error code.
    pub fn rpc_code(self) -> i32 {
        match self {
            ErrorCode::InvalidParams => -32602,
            ErrorCode::InternalError => -32603,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{message}")]
pub struct ToolError {
    pub code: ErrorCode,
    pub message: String,
}

impl ToolError {
    fn invalid(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::InvalidParams,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::InternalError,
            message: message.into(),
        }
    }
}

impl From<Error> for ToolError {
    fn from(err: Error) -> Self {
        match err {
            Error::InvalidInput(message) | Error::Unsupported(message) => ToolError::invalid(message),
            fetch @ Error::Fetch { .. } => ToolError::internal(fetch.to_string()),
            other => ToolError::internal(format!("Failed to generate code screenshot: {other}")),
        }
    }
}

/// Resolves the code source of `args` and runs the generator. A URL wins
/// over inline code.
pub fn generate_from_arguments(
    args: ToolArguments,
    generator: &Generator,
) -> Result<GenerationOutput, ToolError> {
    if args.from_image {
        warn!("image-based generation requested, which is not supported");
        return Err(ToolError::invalid(
            "Image-based code generation is not currently supported. Please provide code text or a code URL instead.",
        ));
    }

    let code = match (args.code_url.as_deref(), args.code.as_deref()) {
        (Some(url), _) if !url.trim().is_empty() => {
            info!("fetching code from {url}");
            fetch_code(url.trim(), &generator.settings().fetch).map_err(|err| {
                error!("{err}");
                ToolError::from(err)
            })?
        }
        (_, Some(code)) if !code.is_empty() => code.to_string(),
        _ => {
            return Err(ToolError::invalid(
                "Please provide either code text or a code URL.",
            ))
        }
    };

    let request = args.into_request(code);
    generator.generate(&request).map_err(|err| {
        error!("screenshot generation failed: {err}");
        ToolError::from(err)
    })
}

/// Handles one tool call: a summary part followed by the PNG as base64.
pub fn codeshot(args: ToolArguments, generator: &Generator) -> Result<Vec<ContentPart>, ToolError> {
    let output = generate_from_arguments(args, generator)?;
    Ok(ContentPart::from_output(&output))
}
