extern crate png as png_crate;

use super::*;
use crate::background::{build_background, parse_hex_color};
use crate::chrome::window_title;
use crate::effects::reflection_alpha;
use crate::fonts::dirs::parse_font_dir_list;
use crate::fonts::FontSet;
use crate::layout::*;
use crate::options::{highlighter_style, theme_palette, DEFAULT_PALETTE};
use crate::png::flatten_over_white;
use crate::raster::unpremultiply_rgba;
use crate::render::raster_scale;
use crate::svg::{escape_attr, escape_text};
use crate::syntax::highlight_code;
use crate::text::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use std::io::{Cursor, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;

const SAMPLE_PYTHON: &str = "def greet(name):\n    print(f\"Hello, {name}!\")\n\ngreet(\"world\")";

fn test_settings() -> Settings {
    let missing = std::env::temp_dir().join(format!("codeshot-no-fonts-{}", std::process::id()));
    Settings {
        font_dirs: vec![missing.to_string_lossy().to_string()],
        system_fonts: false,
        png: PngOptions {
            optimize: false,
            ..PngOptions::default()
        },
        ..Settings::default()
    }
}

fn test_generator() -> Generator {
    Generator::new(test_settings())
}

fn seeded() -> StdRng {
    StdRng::seed_from_u64(7)
}

/// Every style option set, every effect off.
fn plain_request(code: &str) -> GenerationRequest {
    GenerationRequest::new(code)
        .theme("dracula")
        .frame_style("macos")
        .background("purple")
        .font_family("fira-code")
        .font_size(14)
        .shadow(false)
        .reflection(false)
        .rounded_corners(false)
        .border_glow(false)
}

struct DecodedPng {
    width: u32,
    height: u32,
    color: png_crate::ColorType,
    pixels: Vec<u8>,
}

fn decode_png(bytes: &[u8]) -> DecodedPng {
    let decoder = png_crate::Decoder::new(Cursor::new(bytes));
    let mut reader = decoder.read_info().expect("png header");
    let buffer_size = reader.output_buffer_size().expect("buffer size");
    let mut buf = vec![0; buffer_size];
    let info = reader.next_frame(&mut buf).expect("png frame");
    buf.truncate(info.buffer_size());
    DecodedPng {
        width: info.width,
        height: info.height,
        color: info.color_type,
        pixels: buf,
    }
}

#[test]
fn validate_keeps_valid_values() {
    let request = plain_request("x = 1")
        .background("#abc")
        .line_numbers(false)
        .window_title("main.py")
        .watermark("@me");
    let (params, result) = validate(&request, &mut seeded());
    assert_eq!(params.theme, "dracula");
    assert_eq!(params.frame_style, FrameStyle::Macos);
    assert_eq!(params.background, "#abc");
    assert_eq!(params.font_family, FontFamily::FiraCode);
    assert_eq!(params.font_size, 14);
    assert!(!params.line_numbers);
    assert_eq!(params.window_title.as_deref(), Some("main.py"));
    assert_eq!(params.watermark.as_deref(), Some("@me"));
    assert!(result.random_selections.is_empty());
    assert!(result.fallback_notices.is_empty());
}

#[test]
fn validate_replaces_invalid_values_with_defaults() {
    let mut request = GenerationRequest::new("x = 1")
        .theme("nope")
        .frame_style("round")
        .background("plaid")
        .font_family("comic-sans")
        .font_size(999)
        .reflection(false)
        .rounded_corners(true)
        .border_glow(false);
    request.shadow = Some(json!("yes"));
    let (params, result) = validate(&request, &mut seeded());

    assert_eq!(params.theme, "dracula");
    assert_eq!(params.frame_style, FrameStyle::Macos);
    assert_eq!(params.background, "purple");
    assert_eq!(params.font_family, FontFamily::FiraCode);
    assert_eq!(params.font_size, 14);
    assert!(params.shadow);
    assert!(result.random_selections.is_empty());
    assert_eq!(
        result.fallback_notices,
        vec![
            "Invalid theme 'nope', using 'dracula'",
            "Invalid frame 'round', using 'macos'",
            "Invalid background 'plaid', using 'purple'",
            "Invalid font 'comic-sans', using 'fira-code'",
            "Invalid font size '999', using '14'",
            "Invalid shadow 'yes', using 'true'",
        ]
    );
}

#[test]
fn validate_rejects_malformed_hex_and_wrong_types() {
    let mut request = plain_request("x = 1").background("#abcd");
    request.font_size = Some(json!("14"));
    request.window_title = Some(json!(42));
    let (params, result) = validate(&request, &mut seeded());
    assert_eq!(params.background, "purple");
    assert_eq!(params.font_size, 14);
    assert_eq!(params.window_title, None);
    assert_eq!(result.fallback_notices.len(), 2);
    assert!(result.fallback_notices[0].contains("'#abcd'"));
}

#[test]
fn validate_font_size_bounds() {
    for (size, expected, fallback) in [(8, 8, false), (32, 32, false), (7, 14, true), (33, 14, true)] {
        let request = plain_request("x").font_size(size);
        let (params, result) = validate(&request, &mut seeded());
        assert_eq!(params.font_size, expected, "size {size}");
        assert_eq!(!result.fallback_notices.is_empty(), fallback, "size {size}");
    }
}

#[test]
fn validate_draws_unset_values_from_domains() {
    let request = GenerationRequest::new("x = 1");
    for seed in 0..20 {
        let (params, result) = validate(&request, &mut StdRng::seed_from_u64(seed));
        assert_eq!(
            result.random_selections,
            vec![
                "Theme",
                "Frame",
                "Background",
                "Font",
                "Font Size",
                "Shadow",
                "Rounded Corners",
                "Border Glow",
            ]
        );
        assert!(result.fallback_notices.is_empty());
        assert!(AVAILABLE_THEMES.iter().any(|name| *name == params.theme));
        assert!(AVAILABLE_BACKGROUNDS.iter().any(|name| *name == params.background));
        assert!((RANDOM_FONT_SIZE_MIN..=RANDOM_FONT_SIZE_MAX).contains(&params.font_size));
        assert!(params.line_numbers);
        assert!(!params.reflection);
    }
}

#[test]
fn validate_is_deterministic_for_a_seed() {
    let request = GenerationRequest::new("x = 1");
    let first = validate(&request, &mut StdRng::seed_from_u64(99));
    let second = validate(&request, &mut StdRng::seed_from_u64(99));
    assert_eq!(first, second);
}

#[test]
fn detect_language_prefers_explicit_language() {
    assert_eq!(detect_language("def f(): pass", Some("go")), "go");
}

#[test]
fn detect_language_keyword_samples() {
    assert_eq!(
        detect_language("def foo():\n    import os\n    return 1", None),
        "python"
    );
    assert_eq!(
        detect_language("const add = (a, b) => {\n  return a + b;\n};", None),
        "javascript"
    );
    assert_eq!(
        detect_language(
            "public class Main {\n  public static void main(String[] args) {\n    System.out.println(\"hi\");\n  }\n}",
            None
        ),
        "java"
    );
    assert_eq!(
        detect_language("fn main() {\n    let mut x = 5;\n    println!(\"{}\", x);\n}", None),
        "rust"
    );
}

#[test]
fn detect_language_defaults_to_python() {
    assert_eq!(detect_language("hello there", None), "python");
    assert_eq!(detect_language("", None), "python");
}

#[test]
fn detect_language_uses_highlighter_guess() {
    let guessed = detect_language("#!/bin/bash\necho hi", None);
    assert!(guessed.contains("bash") || guessed.contains("shell"), "{guessed}");
}

#[test]
fn truncate_code_leaves_small_input_alone() {
    assert_eq!(truncate_code("a".repeat(15_000).as_str(), 15_000, 150), None);
    let lines = vec!["x"; 150].join("\n");
    assert_eq!(truncate_code(&lines, 15_000, 150), None);
}

#[test]
fn truncate_code_cuts_long_single_line() {
    let code = "abcd".repeat(5_000);
    let cut = truncate_code(&code, MAX_RENDER_CHARS, MAX_RENDER_LINES).expect("truncated");
    assert_eq!(cut.text.chars().count(), MAX_RENDER_CHARS);
    assert_eq!(cut.original_chars, 20_000);
    assert_eq!(cut.original_lines, 1);
    assert!(render_truncation_notice(&cut).contains(RENDER_TRUNCATION_MARKER));
}

#[test]
fn truncate_code_cuts_to_line_cap() {
    let code = (0..200).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
    let cut = truncate_code(&code, MAX_RENDER_CHARS, MAX_RENDER_LINES).expect("truncated");
    assert_eq!(line_count(&cut.text), MAX_RENDER_LINES);
    assert!(cut.text.ends_with("line 149"));
}

#[test]
fn truncate_code_backs_up_to_late_newline() {
    let code = format!("{}\n{}", "a".repeat(13_000), "b".repeat(5_000));
    let cut = truncate_code(&code, 15_000, 150).expect("truncated");
    assert_eq!(cut.text, "a".repeat(13_000));

    let code = format!("{}\n{}", "a".repeat(100), "b".repeat(20_000));
    let cut = truncate_code(&code, 15_000, 150).expect("truncated");
    assert_eq!(cut.text.chars().count(), 15_000);
}

#[test]
fn truncate_code_respects_char_boundaries() {
    let code = "é".repeat(20);
    let cut = truncate_code(&code, 10, 5).expect("truncated");
    assert_eq!(cut.text, "é".repeat(10));
}

#[test]
fn detab_expands() {
    assert_eq!(detab("a\tb", 4), "a   b");
    assert_eq!(detab("\tx\n\ty", 4), "    x\n    y");
}

#[test]
fn title_case_matches_summary_style() {
    assert_eq!(title_case("dracula"), "Dracula");
    assert_eq!(title_case("one-dark"), "One-Dark");
    assert_eq!(title_case("base16-ocean.dark"), "Base16-Ocean.Dark");
    assert_eq!(title_case("#1a1a2e"), "#1A1A2E");
    assert_eq!(title_case("fira-code"), "Fira-Code");
    assert_eq!(capitalize("javascript"), "Javascript");
    assert_eq!(capitalize("RUST"), "Rust");
    assert_eq!(capitalize(""), "");
}

#[test]
fn quality_tiers_follow_input_size() {
    assert_eq!(Quality::for_code("x = 1"), Quality::Full);
    let medium = vec!["x"; 150].join("\n");
    assert_eq!(Quality::for_code(&medium), Quality::Medium);
    let low = vec!["x"; 250].join("\n");
    assert_eq!(Quality::for_code(&low), Quality::Low);
    assert_eq!(Quality::for_code(&"a".repeat(20_001)), Quality::Low);
    assert_eq!(Quality::Low.font_size(14), 10);
    assert_eq!(Quality::Medium.font_size(14), 12);
    assert_eq!(Quality::Low.font_size(10), MIN_FONT_SIZE);
}

#[test]
fn raster_scale_clamps_to_pixel_budget() {
    assert_eq!(raster_scale(4, 100, 100, 24_000_000), 4);
    assert_eq!(raster_scale(4, 1_000, 1_000, 4_000_000), 2);
    assert_eq!(raster_scale(4, 10_000, 10_000, 1_000), 1);
    assert_eq!(raster_scale(0, 10, 10, 0), 1);
}

#[test]
fn frame_geometry_plain_and_with_effects() {
    let plain = FrameGeometry::new(100, 50, true, false, false);
    assert_eq!((plain.width, plain.height), (280, 280));
    assert_eq!((plain.code_x, plain.code_y), (90, 130));

    let no_bar = FrameGeometry::new(100, 50, false, false, false);
    assert_eq!(no_bar.height, 230);
    assert_eq!(no_bar.code_y, PADDING);

    let shadow = FrameGeometry::new(100, 50, true, true, false);
    let reflection = FrameGeometry::new(100, 50, true, true, true);
    assert_eq!(shadow.width, 300);
    assert_eq!(reflection.height - shadow.height, 25);
    assert_eq!(reflection.code_x, 100);
}

#[test]
fn code_layout_uses_fixed_metrics() {
    let layout = CodeLayout::new(14, 3, 10, true);
    let char_w = 14.0 / FONT_HEIGHT_TO_WIDTH_RATIO;
    let gutter = 4.0 * char_w + 30.0;
    assert!((layout.gutter_width - gutter).abs() < 1e-3);
    assert_eq!(layout.width, (gutter + 25.0 + 10.0 * char_w + 25.0).ceil() as u32);
    assert_eq!(layout.height, (50.0 + 3.0 * (14.0f32 * 1.2 + 2.0)).ceil() as u32);
    assert!((layout.baseline(0) - 39.0).abs() < 1e-3);

    let empty = CodeLayout::new(14, 0, 0, false);
    assert_eq!(empty.gutter_width, 0.0);
    assert_eq!(empty.height, 69);
}

#[test]
fn truncate_to_cells_edge_cases() {
    assert_eq!(truncate_to_cells("abc", 0, "…"), "");
    assert_eq!(truncate_to_cells("abc", 5, "…"), "abc");
    assert_eq!(truncate_to_cells("abcdef", 4, "…"), "abc…");
    assert_eq!(truncate_to_cells("abcdef", 1, "…"), "…");
}

#[test]
fn scale_dimension_rejects_zero() {
    assert!(scale_dimension(0, 4).is_err());
    assert_eq!(scale_dimension(10, 4).expect("scaled"), 40);
}

#[test]
fn highlight_code_uses_custom_theme_colors() {
    let highlighted = highlight_code("fn main() {}", "rust", "dracula").expect("highlight");
    assert_eq!(highlighted.lines.len(), 1);
    assert_eq!(highlighted.background, "#282A36");
    assert_eq!(highlighted.foreground, "#F8F8F2");
    let text: String = highlighted.lines[0]
        .spans
        .iter()
        .map(|span| span.text.as_str())
        .collect();
    assert_eq!(text, "fn main() {}");
}

#[test]
fn highlight_code_falls_back_for_unknown_language_and_theme() {
    let highlighted = highlight_code("a\nb", "klingon", "no-such-theme").expect("highlight");
    assert_eq!(highlighted.lines.len(), 2);
}

#[test]
fn every_theme_highlights() {
    for theme in AVAILABLE_THEMES.iter() {
        let style = highlighter_style(theme);
        highlight_code(SAMPLE_PYTHON, "python", style)
            .unwrap_or_else(|err| panic!("theme {theme}: {err}"));
    }
}

#[test]
fn theme_palette_defaults_for_unmapped_names() {
    assert_eq!(theme_palette("no-such-theme"), DEFAULT_PALETTE);
    assert_ne!(theme_palette("vs"), DEFAULT_PALETTE);
    assert_eq!(highlighter_style("no-such-theme"), "no-such-theme");
    assert_eq!(highlighter_style("solarized-dark"), "Solarized (dark)");
}

#[test]
fn escape_helpers() {
    assert_eq!(escape_text("a<b>&c"), "a&lt;b&gt;&amp;c");
    assert_eq!(escape_text("x\u{0}y\tz"), "xy z");
    assert_eq!(escape_attr("\"q\""), "&quot;q&quot;");
}

#[test]
fn parse_hex_color_forms() {
    assert_eq!(
        parse_hex_color("#abc"),
        Some(tiny_skia::Color::from_rgba8(0xaa, 0xbb, 0xcc, 255))
    );
    assert_eq!(
        parse_hex_color("#102030"),
        Some(tiny_skia::Color::from_rgba8(0x10, 0x20, 0x30, 255))
    );
    assert_eq!(parse_hex_color("#12"), None);
    assert_eq!(parse_hex_color("red"), None);
}

#[test]
fn background_variants() {
    let db = Arc::new(usvg::fontdb::Database::new());
    let transparent = build_background("transparent", 4, 4, &db).expect("transparent");
    assert!(transparent.data().iter().all(|b| *b == 0));

    let hex = build_background("#ff0000", 4, 4, &db).expect("hex");
    assert_eq!(&hex.data()[..4], &[255, 0, 0, 255]);

    let named = build_background("purple", 4, 4, &db).expect("named");
    assert_eq!(&named.data()[..4], &[0x8B, 0x5C, 0xF6, 255]);

    let unknown = build_background("gradient-sunset", 4, 4, &db).expect("unknown");
    assert_eq!(&unknown.data()[..4], &[0x1a, 0x1a, 0x2e, 255]);

    let neon = build_background("neon-purple", 120, 120, &db).expect("neon");
    assert!(neon.data().chunks_exact(4).all(|px| px[3] == 255));
    assert!(neon.data().chunks_exact(4).any(|px| px[1] > 0));
}

#[test]
fn reflection_fade_eases_out() {
    assert_eq!(reflection_alpha(0, 100), 102);
    assert!(reflection_alpha(50, 100) < reflection_alpha(10, 100));
    assert_eq!(reflection_alpha(100, 100), 0);
    assert_eq!(reflection_alpha(0, 0), 0);
}

#[test]
fn flatten_and_unpremultiply() {
    assert_eq!(flatten_over_white(&[0, 0, 0, 0]), vec![255, 255, 255]);
    assert_eq!(flatten_over_white(&[10, 20, 30, 255]), vec![10, 20, 30]);
    assert_eq!(flatten_over_white(&[64, 0, 0, 128]), vec![191, 127, 127]);
    assert_eq!(unpremultiply_rgba(&[0, 0, 0, 0]), vec![0, 0, 0, 0]);
    assert_eq!(unpremultiply_rgba(&[128, 0, 0, 128]), vec![255, 0, 0, 128]);
}

#[test]
fn window_title_defaults_to_language() {
    assert_eq!(window_title(None, "python"), "Python Code");
    assert_eq!(window_title(Some("main.rs\n"), "rust"), "main.rs");
}

#[test]
fn font_set_without_fonts_uses_generic_family() {
    let fonts = FontSet::load(FontFamily::FiraCode, &test_settings());
    assert_eq!(fonts.bundled, None);
    assert_eq!(fonts.family_list, "monospace");
}

#[test]
fn parse_font_dir_list_skips_blanks() {
    let dirs = parse_font_dir_list("/a, ,/b");
    assert_eq!(
        dirs,
        vec![std::path::PathBuf::from("/a"), std::path::PathBuf::from("/b")]
    );
}

#[test]
fn settings_deserialize_with_defaults() {
    let settings: Settings =
        serde_json::from_str(r#"{"fetch":{"timeout_ms":500},"png":{"strip":"all"}}"#)
            .expect("parse settings");
    assert_eq!(settings.fetch.timeout_ms, 500);
    assert_eq!(settings.fetch.max_lines, DEFAULT_FETCH_MAX_LINES);
    assert!(matches!(settings.png.strip, PngStrip::All));
    assert!(settings.system_fonts);
    assert_eq!(settings.max_pixels, DEFAULT_RASTER_MAX_PIXELS);
}

#[test]
fn example_scenario_summary_and_dimensions() {
    let output = test_generator()
        .generate_with_rng(&plain_request("print('hi')"), &mut seeded())
        .expect("generate");

    assert!(output.summary.starts_with("🎨 **Code Screenshot Generated!**"));
    assert!(output.summary.contains("**Language**: Python"));
    assert!(output.summary.contains("**Theme**: Dracula"));
    assert!(output.summary.contains("**Frame**: Macos"));
    assert!(output.summary.contains("**Background**: Purple"));
    assert!(output.summary.contains("**Font**: Fira-Code (14px)"));
    assert!(!output.summary.contains("Random selections"));
    assert!(!output.summary.contains("Fallbacks"));
    assert!(output.summary.ends_with("Perfect for sharing! 🚀"));
    assert!(output.effects.is_empty());

    let layout = CodeLayout::new(14, 1, "print('hi')".len(), true);
    assert_eq!(output.width, layout.width + 2 * PADDING + EXTRA_SPACE_PLAIN);
    assert_eq!(
        output.height,
        layout.height + 2 * PADDING + TITLE_BAR_HEIGHT + EXTRA_SPACE_PLAIN
    );
    assert!(output
        .summary
        .contains(&format!("**Size**: {}×{}px", output.width, output.height)));

    let png = decode_png(&output.png);
    assert_eq!((png.width, png.height), (output.width, output.height));
    assert_eq!(png.color, png_crate::ColorType::Rgb);
    // Top-left corner is title bar, bottom-right is the purple background.
    assert_eq!(&png.pixels[..3], &[0x2d, 0x2d, 0x2d]);
    let last = png.pixels.len() - 3;
    assert_eq!(&png.pixels[last..], &[0x8B, 0x5C, 0xF6]);
}

#[test]
fn generation_reports_effects_and_random_selections() {
    let request = GenerationRequest::new(SAMPLE_PYTHON)
        .shadow(true)
        .reflection(true)
        .rounded_corners(true)
        .border_glow(true)
        .watermark("codeshot");
    let output = test_generator()
        .generate_with_rng(&request, &mut seeded())
        .expect("generate");
    assert_eq!(output.effects, vec!["Shadow", "Reflection", "Glow", "Rounded"]);
    assert!(output
        .summary
        .contains(" • Effects: Shadow, Reflection, Glow, Rounded"));
    assert!(output
        .summary
        .contains("Random selections: Theme, Frame, Background, Font, Font Size"));
    let png = decode_png(&output.png);
    assert!(png.width > 0 && png.height > 0);
}

#[test]
fn fallbacks_appear_in_summary() {
    let request = plain_request(SAMPLE_PYTHON).theme("invalid_theme");
    let output = test_generator()
        .generate_with_rng(&request, &mut seeded())
        .expect("generate");
    assert!(output
        .summary
        .contains("⚠️ **Fallbacks Applied**: Invalid theme 'invalid_theme', using 'dracula'"));
    assert_eq!(output.parameters.theme, "dracula");
}

#[test]
fn generation_is_idempotent_when_fully_specified() {
    let generator = Generator::new(Settings {
        png: PngOptions::default(),
        ..test_settings()
    });
    let request = plain_request(SAMPLE_PYTHON)
        .shadow(true)
        .rounded_corners(true)
        .line_numbers(true);
    let first = generator.generate(&request).expect("first");
    let second = generator.generate(&request).expect("second");
    assert_eq!(first.png, second.png);
    assert_eq!(first.summary, second.summary);
}

#[test]
fn reflection_adds_half_the_code_height() {
    let generator = test_generator();
    let base = plain_request(SAMPLE_PYTHON).shadow(true);
    let without = generator
        .generate_with_rng(&base, &mut seeded())
        .expect("without reflection");
    let with = generator
        .generate_with_rng(&base.clone().reflection(true), &mut seeded())
        .expect("with reflection");
    let code_height = without.height - 2 * PADDING - TITLE_BAR_HEIGHT - EXTRA_SPACE_EFFECTS;
    assert_eq!(with.height - without.height, code_height / 2);
    assert_eq!(with.width, without.width);
}

#[test]
fn dark_and_light_themes_differ() {
    let generator = test_generator();
    let dark = generator
        .generate_with_rng(&plain_request(SAMPLE_PYTHON), &mut seeded())
        .expect("dark");
    let light = generator
        .generate_with_rng(&plain_request(SAMPLE_PYTHON).theme("vs"), &mut seeded())
        .expect("light");
    assert_ne!(dark.png, light.png);
}

#[test]
fn transparent_background_keeps_alpha() {
    let generator = test_generator();
    let output = generator
        .generate_with_rng(
            &plain_request("x = 1").background("transparent"),
            &mut seeded(),
        )
        .expect("generate");
    let png = decode_png(&output.png);
    assert_eq!(png.color, png_crate::ColorType::Rgba);
    let last_alpha = png.pixels[png.pixels.len() - 1];
    assert_eq!(last_alpha, 0);
}

#[test]
fn large_input_renders_with_reduced_font() {
    let generator = test_generator();
    let long = (0..250).map(|i| format!("x = {i}")).collect::<Vec<_>>().join("\n");
    let short = (0..50).map(|i| format!("x = {i}")).collect::<Vec<_>>().join("\n");

    let long_out = generator
        .generate_with_rng(&plain_request(&long).frame_style("none"), &mut seeded())
        .expect("long");
    let short_out = generator
        .generate_with_rng(&plain_request(&short).frame_style("none"), &mut seeded())
        .expect("short");

    assert_eq!(long_out.render.quality, Quality::Low);
    assert_eq!(long_out.render.font_size, 10);
    assert!(long_out.render.truncated);
    assert_eq!(short_out.render.quality, Quality::Full);
    assert_eq!(short_out.render.font_size, 14);
    assert!(!short_out.render.truncated);
    // Summary reports the requested size, not the reduced one.
    assert!(long_out.summary.contains("(14px)"));
}

#[test]
fn highlighted_lines_change_output() {
    let generator = test_generator();
    let plain = generator
        .generate_with_rng(&plain_request(SAMPLE_PYTHON), &mut seeded())
        .expect("plain");
    let marked = generator
        .generate_with_rng(
            &plain_request(SAMPLE_PYTHON).highlight_lines(vec![2, 99]),
            &mut seeded(),
        )
        .expect("marked");
    assert_eq!((plain.width, plain.height), (marked.width, marked.height));
    assert_ne!(plain.png, marked.png);
}

#[test]
fn empty_code_is_rejected() {
    let err = test_generator()
        .generate(&GenerationRequest::new(""))
        .expect_err("empty code");
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[test]
fn tool_rejects_image_input() {
    let args = ToolArguments {
        code: Some("x = 1".to_string()),
        from_image: true,
        ..ToolArguments::default()
    };
    let err = codeshot(args, &test_generator()).expect_err("from_image");
    assert_eq!(err.code, ErrorCode::InvalidParams);
    assert_eq!(
        err.message,
        "Image-based code generation is not currently supported. Please provide code text or a code URL instead."
    );
}

#[test]
fn tool_requires_a_code_source() {
    let err = codeshot(ToolArguments::default(), &test_generator()).expect_err("no code");
    assert_eq!(err.code, ErrorCode::InvalidParams);
    assert_eq!(err.message, "Please provide either code text or a code URL.");
    assert_eq!(err.code.rpc_code(), -32602);
}

#[test]
fn tool_returns_text_and_image_parts() {
    let args: ToolArguments = serde_json::from_value(json!({
        "code": "print('hi')",
        "theme": "nord",
        "frame_style": "windows",
        "background": "#123456",
        "font_family": "system",
        "font_size": 12,
        "shadow": false,
        "rounded_corners": false,
        "border_glow": false,
        "window_title": "hello.py"
    }))
    .expect("arguments");
    let parts = codeshot(args, &test_generator()).expect("tool call");
    assert_eq!(parts.len(), 2);
    match &parts[0] {
        ContentPart::Text { text } => assert!(text.contains("**Frame**: Windows")),
        other => panic!("unexpected part {other:?}"),
    }
    match &parts[1] {
        ContentPart::Image { mime_type, data } => {
            assert_eq!(mime_type, "image/png");
            use base64::Engine;
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(data)
                .expect("base64");
            assert!(bytes.starts_with(b"\x89PNG"));
        }
        other => panic!("unexpected part {other:?}"),
    }
    let value = serde_json::to_value(&parts[1]).expect("serialize");
    assert_eq!(value["type"], "image");
    assert_eq!(value["mimeType"], "image/png");
}

#[test]
fn internal_errors_carry_context() {
    let err = ToolError::from(Error::Render("boom".to_string()));
    assert_eq!(err.code, ErrorCode::InternalError);
    assert_eq!(err.message, "Failed to generate code screenshot: render error: boom");

    let err = ToolError::from(Error::Fetch {
        url: "http://x".to_string(),
        reason: "status code 500".to_string(),
    });
    assert_eq!(err.code, ErrorCode::InternalError);
    assert_eq!(err.message, "Failed to fetch http://x: status code 500");
}

#[test]
fn fetch_code_reports_status_errors() {
    let server = spawn_server(404, b"missing".to_vec());
    let err = fetch_code(&server.url("/gist.py"), &FetchSettings::default()).expect_err("404");
    server.join();
    match err {
        Error::Fetch { url, reason } => {
            assert!(url.ends_with("/gist.py"));
            assert_eq!(reason, "status code 404");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn fetch_code_truncates_large_bodies() {
    let body = (0..400).map(|i| format!("x = {i}")).collect::<Vec<_>>().join("\n");
    let server = spawn_server(200, body.clone().into_bytes());
    let settings = FetchSettings {
        max_lines: 300,
        ..FetchSettings::default()
    };
    let code = fetch_code(&server.url("/big.py"), &settings).expect("fetch");
    server.join();
    let expected_tail = format!("# codeshot:truncated lines=400 chars={}", body.chars().count());
    assert!(code.ends_with(&expected_tail), "{}", &code[code.len() - 60..]);
    assert!(code.starts_with("x = 0\n"));
    assert!(code.contains("x = 299\n"));
    assert!(!code.contains("x = 300"));
}

#[test]
fn tool_fetches_code_from_url() {
    let server = spawn_server(200, b"fn main() {\n    let mut x = 1;\n}".to_vec());
    let args = ToolArguments {
        code_url: Some(server.url("/main.rs")),
        theme: Some(json!("monokai")),
        shadow: Some(json!(false)),
        ..ToolArguments::default()
    };
    let parts = codeshot(args, &test_generator()).expect("tool call");
    server.join();
    match &parts[0] {
        ContentPart::Text { text } => assert!(text.contains("**Language**: Rust")),
        other => panic!("unexpected part {other:?}"),
    }
}

#[test]
fn tool_surfaces_fetch_failures() {
    let server = spawn_server(500, Vec::new());
    let args = ToolArguments {
        code_url: Some(server.url("/broken")),
        ..ToolArguments::default()
    };
    let err = codeshot(args, &test_generator()).expect_err("fetch failure");
    server.join();
    assert_eq!(err.code, ErrorCode::InternalError);
    assert!(err.message.starts_with("Failed to fetch http://"));
    assert!(err.message.ends_with("status code 500"));
}

struct TestServer {
    addr: String,
    handle: thread::JoinHandle<()>,
}

impl TestServer {
    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    fn join(self) {
        self.handle.join().expect("server thread");
    }
}

/// Answers exactly one request with `status` and `body`.
fn spawn_server(status: u16, body: Vec<u8>) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let _ = read_request(&mut stream);
        write_response(&mut stream, status, &body);
    });
    TestServer {
        addr: addr.to_string(),
        handle,
    }
}

fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = [0u8; 4096];
    let mut data = Vec::new();
    loop {
        let read = stream.read(&mut buf).unwrap_or(0);
        if read == 0 {
            break;
        }
        data.extend_from_slice(&buf[..read]);
        if data.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }
    String::from_utf8_lossy(&data).to_string()
}

fn write_response(stream: &mut TcpStream, status: u16, body: &[u8]) {
    let status_text = match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "OK",
    };
    let mut response = format!("HTTP/1.1 {status} {status_text}\r\n");
    response.push_str(&format!("Content-Length: {}\r\n", body.len()));
    response.push_str("Content-Type: text/plain\r\n");
    response.push_str("Connection: close\r\n\r\n");
    stream.write_all(response.as_bytes()).expect("write");
    stream.write_all(body).expect("write body");
}
