use crate::args::Args;
use crate::config::load_settings;
use crate::io::{read_input_file, read_stdin_with, write_output_with_tty};
use crate::parse::{parse_font_dirs, parse_highlight_lines, parse_timeout_ms};
use clap::{CommandFactory, Parser};
use codeshot_core::{
    codeshot, generate_from_arguments, Generator, Settings, ToolArguments, AVAILABLE_BACKGROUNDS,
    AVAILABLE_THEMES,
};
use log::debug;
use serde_json::{json, Value};
use std::error::Error;
use std::path::Path;

pub(crate) fn run() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    run_with(
        args,
        atty::is(atty::Stream::Stdin),
        atty::is(atty::Stream::Stdout),
        None,
    )
}

pub(crate) fn run_with(
    args: Args,
    stdin_is_tty: bool,
    stdout_is_tty: bool,
    stdin_override: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    if args.list_themes {
        for theme in AVAILABLE_THEMES.iter() {
            println!("{theme}");
        }
        return Ok(());
    }
    if args.list_backgrounds {
        for background in AVAILABLE_BACKGROUNDS {
            println!("{background}");
        }
        return Ok(());
    }

    let settings = build_settings(&args)?;

    let code = if args.url.is_some() {
        None
    } else if let Some(input) = args.input.as_deref() {
        if input == "-" {
            Some(read_stdin_with(stdin_override)?)
        } else {
            Some(read_input_file(Path::new(input))?)
        }
    } else if !stdin_is_tty || stdin_override.is_some() {
        Some(read_stdin_with(stdin_override)?)
    } else {
        let mut cmd = Args::command();
        cmd.print_help()?;
        println!();
        return Ok(());
    };

    let tool_args = build_tool_arguments(&args, code)?;
    let generator = Generator::new(settings);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&tool_response(tool_args, &generator))?);
        return Ok(());
    }

    let output = generate_from_arguments(tool_args, &generator)?;
    debug!(
        "generated {}x{} screenshot ({} bytes)",
        output.width,
        output.height,
        output.png.len()
    );
    write_output_with_tty(&output.png, args.output.as_ref(), stdout_is_tty)?;
    eprintln!("{}", output.summary);
    Ok(())
}

/// Settings file first, then flag overrides.
fn build_settings(args: &Args) -> Result<Settings, Box<dyn Error>> {
    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(timeout) = args.fetch_timeout.as_deref() {
        settings.fetch.timeout_ms = parse_timeout_ms(timeout)?;
    }
    if let Some(dirs) = args.font_dirs.as_deref() {
        settings.font_dirs = parse_font_dirs(dirs);
    }
    if let Some(system_fonts) = args.system_fonts {
        settings.system_fonts = system_fonts;
    }
    if let Some(max_pixels) = args.max_pixels {
        settings.max_pixels = max_pixels;
    }
    if let Some(optimize) = args.png_opt {
        settings.png.optimize = optimize;
    }
    if let Some(level) = args.png_opt_level {
        settings.png.level = level;
    }
    if let Some(strip) = args.png_strip {
        settings.png.strip = strip.into();
    }
    Ok(settings)
}

/// Maps flags onto tool arguments. Style values pass through unchecked so the
/// validator reports bad ones as fallbacks.
fn build_tool_arguments(args: &Args, code: Option<String>) -> Result<ToolArguments, Box<dyn Error>> {
    let text = |value: &Option<String>| value.as_deref().map(Value::from);
    let flag = |value: Option<bool>| value.map(Value::Bool);
    let highlight_lines = match args.highlight_lines.as_deref() {
        Some(lines) => parse_highlight_lines(lines)?,
        None => Vec::new(),
    };
    Ok(ToolArguments {
        code,
        code_url: args.url.clone(),
        from_image: false,
        language: args.language.clone(),
        theme: text(&args.theme),
        frame_style: text(&args.frame),
        background: text(&args.background),
        font_family: text(&args.font),
        font_size: args.font_size.map(Value::from),
        line_numbers: flag(args.line_numbers),
        window_title: text(&args.title),
        shadow: flag(args.shadow),
        reflection: flag(args.reflection),
        rounded_corners: flag(args.rounded_corners),
        watermark: text(&args.watermark),
        border_glow: flag(args.border_glow),
        highlight_lines,
    })
}

/// JSON-RPC style result: `{"content": [...]}` or `{"error": {...}}`.
fn tool_response(args: ToolArguments, generator: &Generator) -> Value {
    match codeshot(args, generator) {
        Ok(content) => json!({ "content": content }),
        Err(err) => json!({
            "error": {
                "code": err.code.rpc_code(),
                "message": err.message,
            }
        }),
    }
}
