use crate::text::{capitalize, title_case};
use crate::{ResolvedParameters, ValidationResult};

/// Markdown summary returned next to the image.
pub fn format_summary(
    language: &str,
    params: &ResolvedParameters,
    size: (u32, u32),
    effects: &[&str],
    validation: &ValidationResult,
) -> String {
    let mut details = String::new();
    if !effects.is_empty() {
        details.push_str(&format!(" • Effects: {}", effects.join(", ")));
    }
    if !validation.random_selections.is_empty() {
        details.push_str(&format!(
            " • Random selections: {} 🎲",
            validation.random_selections.join(", ")
        ));
    }
    if !validation.fallback_notices.is_empty() {
        details.push_str(&format!(
            "\n⚠️ **Fallbacks Applied**: {}",
            validation.fallback_notices.join("; ")
        ));
    }

    format!(
        "🎨 **Code Screenshot Generated!**\n\n\
         **Language**: {}\n\
         **Theme**: {}\n\
         **Frame**: {}\n\
         **Background**: {}\n\
         **Font**: {} ({}px)\n\
         **Size**: {}×{}px{}\n\n\
         Perfect for sharing! 🚀",
        capitalize(language),
        title_case(&params.theme),
        title_case(params.frame_style.as_str()),
        title_case(&params.background),
        title_case(params.font_family.as_str()),
        params.font_size,
        size.0,
        size.1,
        details
    )
}
