use log::{debug, info, warn};
use rand::RngCore;
use std::fmt;
use std::time::Instant;

use crate::background::build_background;
use crate::chrome::{draw_chrome, window_title};
use crate::effects::{apply_glow, apply_reflection, apply_shadow, apply_watermark, round_corners};
use crate::fonts::FontSet;
use crate::png::encode_canvas;
use crate::raster::draw;
use crate::render::render_code_image;
use crate::{
    detect_language, format_summary, validate, Error, FrameGeometry, FrameStyle,
    GenerationOutput, GenerationRequest, Result, Settings,
};

/// Per-request logging handle: every line carries the request id.
pub(crate) struct RequestLog {
    id: u32,
    started: Instant,
}

impl RequestLog {
    fn start() -> Self {
        Self {
            id: rand::random::<u32>(),
            started: Instant::now(),
        }
    }

    fn timer(&self) -> GenerationTimer<'_> {
        GenerationTimer {
            log: self,
            completed: false,
        }
    }
}

impl fmt::Display for RequestLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[req {:08x}]", self.id)
    }
}

/// Logs the elapsed time when dropped, on success and failure alike.
struct GenerationTimer<'a> {
    log: &'a RequestLog,
    completed: bool,
}

impl GenerationTimer<'_> {
    fn complete(&mut self) {
        self.completed = true;
    }
}

impl Drop for GenerationTimer<'_> {
    fn drop(&mut self) {
        let elapsed = self.log.started.elapsed();
        if self.completed {
            info!("{} generation finished in {:.2?}", self.log, elapsed);
        } else {
            warn!("{} generation failed after {:.2?}", self.log, elapsed);
        }
    }
}

/// Runs the screenshot pipeline. Holds process-wide settings only; every
/// call is independent.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    settings: Settings,
}

impl Generator {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Generates a screenshot, drawing unset options from the thread RNG.
    pub fn generate(&self, request: &GenerationRequest) -> Result<GenerationOutput> {
        self.generate_with_rng(request, &mut rand::rng())
    }

    pub fn generate_with_rng(
        &self,
        request: &GenerationRequest,
        rng: &mut dyn RngCore,
    ) -> Result<GenerationOutput> {
        let log = RequestLog::start();
        let mut timer = log.timer();
        let output = self.run(&log, request, rng)?;
        timer.complete();
        Ok(output)
    }

    fn run(
        &self,
        log: &RequestLog,
        request: &GenerationRequest,
        rng: &mut dyn RngCore,
    ) -> Result<GenerationOutput> {
        if request.code.is_empty() {
            return Err(Error::InvalidInput(
                "Please provide either code text or a code URL.".to_string(),
            ));
        }
        info!(
            "{log} generating screenshot for {} chars of code",
            request.code.chars().count()
        );

        let (params, validation) = validate(request, rng);
        for notice in &validation.fallback_notices {
            debug!("{log} fallback: {notice}");
        }
        let language = detect_language(&request.code, request.language.as_deref());
        debug!("{log} language {language}, theme {}", params.theme);

        let fonts = FontSet::load(params.font_family, &self.settings);
        match &fonts.bundled {
            Some(name) => debug!("{log} using bundled font {name}"),
            None => debug!("{log} font families: {}", fonts.family_list),
        }
        let max_pixels = self.settings.max_pixels;

        let rendered = render_code_image(&request.code, &language, &params, &fonts, max_pixels)?;
        let mut code = rendered.pixmap;
        debug!("{log} code image {}x{}", code.width(), code.height());
        if params.rounded_corners {
            round_corners(&mut code, &fonts.db, max_pixels)?;
        }

        let geometry = FrameGeometry::new(
            code.width(),
            code.height(),
            params.frame_style.reserves_title_bar(),
            params.shadow,
            params.reflection,
        );
        debug!("{log} frame {}x{}", geometry.width, geometry.height);

        let mut canvas =
            build_background(&params.background, geometry.width, geometry.height, &fonts.db)?;
        let title = window_title(params.window_title.as_deref(), &language);
        draw_chrome(
            &mut canvas,
            params.frame_style,
            geometry.title_bar_height,
            &title,
            &fonts,
        )?;

        let code_pos = (geometry.code_x, geometry.code_y);
        if params.shadow && params.frame_style != FrameStyle::None {
            apply_shadow(
                &mut canvas,
                (code.width(), code.height()),
                code_pos,
                params.rounded_corners,
                &fonts.db,
            )?;
        }
        draw(&mut canvas, &code, code_pos.0 as i32, code_pos.1 as i32);
        if params.reflection {
            apply_reflection(&mut canvas, &code, code_pos)?;
        }
        if params.border_glow {
            apply_glow(&mut canvas, &fonts.db)?;
        }
        if let Some(text) = params.watermark.as_deref() {
            apply_watermark(&mut canvas, text, &fonts)?;
        }

        let keep_alpha = params.background == "transparent";
        let png = encode_canvas(&canvas, keep_alpha, &self.settings.png)?;
        debug!("{log} encoded {} bytes of png", png.len());

        let mut effects = Vec::new();
        if params.shadow {
            effects.push("Shadow");
        }
        if params.reflection {
            effects.push("Reflection");
        }
        if params.border_glow {
            effects.push("Glow");
        }
        if params.rounded_corners {
            effects.push("Rounded");
        }

        let summary = format_summary(
            &language,
            &params,
            (geometry.width, geometry.height),
            &effects,
            &validation,
        );
        Ok(GenerationOutput {
            summary,
            png,
            width: geometry.width,
            height: geometry.height,
            language,
            parameters: params,
            effects,
            render: rendered.info,
            validation,
        })
    }
}
