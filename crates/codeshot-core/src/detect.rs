use crate::syntax::guess_syntax_name;

const PYTHON_HINTS: &[&str] = &[
    "def ", "import ", "from ", "class ", "print(", "__init__", "elif ", "try:", "except:",
    "finally:", "lambda ", "with ", "yield",
];
const JAVASCRIPT_HINTS: &[&str] = &[
    "function ",
    "const ",
    "let ",
    "var ",
    "console.log",
    "=>",
    "return ",
    "typeof",
    "null",
    "undefined",
];
const JAVA_HINTS: &[&str] = &[
    "public class",
    "private ",
    "public ",
    "static ",
    "void main",
    "system.out.println",
    "string[]",
];
const RUST_HINTS: &[&str] = &[
    "fn ", "let mut", "match ", "impl ", "struct ", "enum ", "println!",
];

const HINT_SETS: [(&str, &[&str]); 4] = [
    ("python", PYTHON_HINTS),
    ("javascript", JAVASCRIPT_HINTS),
    ("java", JAVA_HINTS),
    ("rust", RUST_HINTS),
];

const MIN_HINT_SCORE: usize = 2;
const DEFAULT_LANGUAGE: &str = "python";

fn hint_score(code_lower: &str, hints: &[&str]) -> usize {
    hints.iter().filter(|hint| code_lower.contains(*hint)).count()
}

/// Guesses the language of `code` unless `language` is given, in which case it
/// is returned unchanged. Keyword hints win when one set scores at least two;
/// otherwise the highlighter's own guess is used, with noisy results remapped.
pub fn detect_language(code: &str, language: Option<&str>) -> String {
    if let Some(language) = language.filter(|lang| !lang.trim().is_empty()) {
        return language.to_string();
    }

    let code_lower = code.to_lowercase();
    let mut best: Option<(&str, usize)> = None;
    for (name, hints) in HINT_SETS {
        let score = hint_score(&code_lower, hints);
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((name, score));
        }
    }
    if let Some((name, score)) = best {
        if score >= MIN_HINT_SCORE {
            return name.to_string();
        }
    }

    let python_score = hint_score(&code_lower, PYTHON_HINTS);
    match guess_syntax_name(code.trim()) {
        Some(name) => remap_guess(&name.to_lowercase(), python_score),
        None => DEFAULT_LANGUAGE.to_string(),
    }
}

fn remap_guess(name: &str, python_score: usize) -> String {
    match name {
        "plain text" | "text" => DEFAULT_LANGUAGE.to_string(),
        "common lisp" if python_score > 0 => DEFAULT_LANGUAGE.to_string(),
        "common lisp" => "text".to_string(),
        other => other.to_string(),
    }
}
