use grep::regex::RegexMatcher;
use grep::searcher::{Searcher, Sink, SinkMatch};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

// Directories holding this crate's own Rust sources.
const SOURCE_ROOTS: &[&str] = &["src", "tests", "benches"];

// A lint rule: a line regex plus an optional refinement on the matched line.
struct Rule {
    name: &'static str,
    pattern: &'static str,
    advice: &'static str,
    refine: fn(&str) -> bool,
}

// Collects every matching line of one file for one rule.
struct RuleCollector<'r> {
    rule: &'r Rule,
    violations: Vec<String>,
    file_path: PathBuf,
}

impl<'r> RuleCollector<'r> {
    fn new(rule: &'r Rule, file_path: &Path) -> Self {
        Self {
            rule,
            violations: Vec::new(),
            file_path: file_path.to_path_buf(),
        }
    }

    fn check_and_get_error_message(&self) -> Option<String> {
        if self.violations.is_empty() {
            return None;
        }

        let file_name = self.file_path.to_str().unwrap_or("?");
        let mut error_msg = format!(
            "\n❌ ERROR: Found {} {} in {}:\n",
            self.violations.len(),
            self.rule.name,
            file_name
        );
        for violation in &self.violations {
            error_msg.push_str(&format!("   {violation}\n"));
        }
        error_msg.push_str(&format!("\n⚠️ {}\n", self.rule.advice));
        Some(error_msg)
    }
}

impl Sink for RuleCollector<'_> {
    type Error = std::io::Error;

    fn matched(&mut self, _: &Searcher, mat: &SinkMatch) -> Result<bool, Self::Error> {
        let line_number = mat.line_number().unwrap_or(0);
        let line_text = std::str::from_utf8(mat.bytes()).unwrap_or("").trim_end();
        if (self.rule.refine)(line_text) {
            self.violations.push(format!("{line_number}:{line_text}"));
        }
        Ok(true)
    }
}

fn is_word_byte(b: u8) -> bool {
    matches!(b, b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' | b'_')
}

fn contains_underscore_ident(text: &str) -> bool {
    let bytes = text.as_bytes();
    (0..bytes.len()).any(|i| {
        bytes[i] == b'_'
            && (i == 0 || !is_word_byte(bytes[i - 1]))
            && i + 1 < bytes.len()
            && is_word_byte(bytes[i + 1])
    })
}

// Underscore-prefixed names in code, ignoring comments and string literals.
fn underscore_ident_in_code(line_text: &str) -> bool {
    if line_text.trim_start().starts_with("//") {
        return false;
    }
    let code = line_text.split("//").next().unwrap_or("");
    code.split('"')
        .enumerate()
        .any(|(i, part)| i % 2 == 0 && contains_underscore_ident(part))
}

fn any_line(line_text: &str) -> bool {
    !line_text.is_empty()
}

fn not_in_comment(line_text: &str) -> bool {
    !line_text.trim_start().starts_with("//")
}

const RULES: &[Rule] = &[
    Rule {
        name: "underscore-prefixed variables",
        pattern: r"\b(_[a-zA-Z0-9_]+)\b",
        advice: "Underscore-prefixed variable names are not allowed. Use the binding or remove it.",
        refine: underscore_ident_in_code,
    },
    Rule {
        name: "#[allow(dead_code)] attributes",
        pattern: r"#\s*\[\s*allow\s*\(\s*dead_code\s*\)\s*\]",
        advice: "Dead code must be deleted, not silenced.",
        refine: any_line,
    },
    Rule {
        name: "#[ignore] test attributes",
        pattern: r"#\s*\[\s*ignore\s*\]",
        advice: "Ignored tests are not allowed. Fix the test or remove it.",
        refine: any_line,
    },
    Rule {
        name: "debug_assert! usages",
        pattern: r"\bdebug_assert(_eq|_ne)?!\s*\(",
        advice: "debug_assert! is forbidden in this project. Use assert! instead.",
        refine: not_in_comment,
    },
    Rule {
        name: "changelog-style comments",
        pattern: r"(//|/\*).*\b(FIXED|CORRECTED|FIX|CHANGED|MODIFIED|UPDATED|NEW)\b",
        advice: "Comments describe the code as it is, not its edit history.",
        refine: any_line,
    },
];

fn is_in_hidden_directory(path: &Path) -> bool {
    path.components().any(|component| {
        matches!(component, Component::Normal(name) if name.to_string_lossy().starts_with('.'))
    })
}

fn rust_sources() -> Vec<PathBuf> {
    SOURCE_ROOTS
        .iter()
        .filter(|root| Path::new(root).is_dir())
        .flat_map(|root| WalkDir::new(root).into_iter().filter_map(Result::ok))
        .filter(|e| !is_in_hidden_directory(e.path()))
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "rs"))
        .map(|e| e.path().to_path_buf())
        .collect()
}

fn scan(rule: &Rule, files: &[PathBuf]) -> Vec<String> {
    let matcher = match RegexMatcher::new_line_matcher(rule.pattern) {
        Ok(matcher) => matcher,
        Err(e) => return vec![format!("Error creating regex for {}: {}", rule.name, e)],
    };
    let mut searcher = Searcher::new();
    let mut violations = Vec::new();
    for path in files {
        let mut collector = RuleCollector::new(rule, path);
        if searcher.search_path(&matcher, path, &mut collector).is_err() {
            continue;
        }
        if let Some(error_message) = collector.check_and_get_error_message() {
            violations.push(error_message);
        }
    }
    violations
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    for root in SOURCE_ROOTS.iter().filter(|root| Path::new(root).is_dir()) {
        println!("cargo:rerun-if-changed={root}");
    }

    if std::env::var("EQUILIBRIUM_SKIP_LINT_CHECKS").is_ok() || std::env::var("DOCS_RS").is_ok() {
        return;
    }

    let files = rust_sources();
    let all_violations: Vec<String> = RULES.iter().flat_map(|rule| scan(rule, &files)).collect();

    if !all_violations.is_empty() {
        eprintln!("\n❌ VALIDATION ERRORS");
        eprintln!("====================");
        let violation_count = all_violations.len();
        for violation in all_violations {
            eprintln!("{violation}");
            eprintln!("--------------------");
        }
        eprintln!(
            "\n⚠️ Found {} total code quality violations. Fix all issues before committing.",
            violation_count
        );
        std::process::exit(1);
    }
}
