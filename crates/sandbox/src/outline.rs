//! Source outlines for `analyze_code_structure`.
//!
//! Line-oriented: top-level items are recognized by pattern, nesting by brace
//! depth (JavaScript, TypeScript, Rust) or indentation (Python). Good enough to
//! orient a planner in an unfamiliar file; not a parser.

use std::path::Path;
use std::sync::LazyLock;

use regex_lite::Regex;
use serde::Serialize;

/// Languages with an outline implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    JavaScript,
    Python,
    Rust,
}

impl Language {
    /// Pick a language from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "js" | "jsx" | "mjs" | "cjs" | "ts" | "tsx" | "mts" | "cts" => Some(Self::JavaScript),
            "py" | "pyi" => Some(Self::Python),
            "rs" => Some(Self::Rust),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Outline {
    pub functions: Vec<FunctionInfo>,
    pub classes: Vec<ClassInfo>,
    pub variables: Vec<String>,
    pub imports: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionInfo {
    pub name: String,
    pub params: Vec<String>,
}

/// A class, or for Rust a struct/enum/trait together with its impl methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassInfo {
    pub name: String,
    pub methods: Vec<FunctionInfo>,
}

pub fn outline(language: Language, source: &str) -> Outline {
    match language {
        Language::JavaScript => outline_js(source),
        Language::Python => outline_python(source),
        Language::Rust => outline_rust(source),
    }
}

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("outline patterns are valid")
}

static JS_IMPORT: LazyLock<Regex> =
    LazyLock::new(|| re(r#"^\s*import\s+(?:[^'"]*?\s+from\s+)?['"]([^'"]+)['"]"#));
static JS_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    re(r"^\s*(?:export\s+)?(?:default\s+)?(?:async\s+)?function\s*\*?\s*([A-Za-z_$][\w$]*)?\s*(?:<[^(]*>)?\(([^)]*)\)?")
});
static JS_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    re(r"^\s*(?:export\s+)?(?:default\s+)?(?:abstract\s+)?class\s+([A-Za-z_$][\w$]*)")
});
static JS_METHOD: LazyLock<Regex> = LazyLock::new(|| {
    re(r"^\s*(?:(?:static|async|get|set|public|private|protected|readonly|override)\s+)*\*?#?([A-Za-z_$][\w$]*)\s*(?:<[^(]*>)?\(([^)]*)\)?")
});
static JS_VARIABLE: LazyLock<Regex> =
    LazyLock::new(|| re(r"^\s*(?:export\s+)?(?:const|let|var)\s+([A-Za-z_$][\w$]*)"));

static PY_IMPORT: LazyLock<Regex> = LazyLock::new(|| re(r"^import\s+(.+)$"));
static PY_FROM: LazyLock<Regex> = LazyLock::new(|| re(r"^from\s+([\w.]+)\s+import\b"));
static PY_DEF: LazyLock<Regex> =
    LazyLock::new(|| re(r"^(\s*)(?:async\s+)?def\s+(\w+)\s*\(([^)]*)\)?"));
static PY_CLASS: LazyLock<Regex> = LazyLock::new(|| re(r"^class\s+(\w+)"));
static PY_VARIABLE: LazyLock<Regex> =
    LazyLock::new(|| re(r"^([A-Za-z_]\w*)\s*(?::[^=]+)?=(?:[^=]|$)"));

static RS_USE: LazyLock<Regex> =
    LazyLock::new(|| re(r"^\s*(?:pub(?:\([^)]*\))?\s+)?use\s+([^;]+);?"));
static RS_FN: LazyLock<Regex> = LazyLock::new(|| {
    re(r#"^\s*(?:pub(?:\([^)]*\))?\s+)?(?:(?:const|async|unsafe|extern\s+"[^"]*")\s+)*fn\s+(\w+)\s*(?:<[^(]*>)?\(([^)]*)\)?"#)
});
static RS_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    re(r"^\s*(?:pub(?:\([^)]*\))?\s+)?(?:unsafe\s+)?(?:struct|enum|union|trait)\s+(\w+)")
});
static RS_TRAIT: LazyLock<Regex> =
    LazyLock::new(|| re(r"^\s*(?:pub(?:\([^)]*\))?\s+)?(?:unsafe\s+)?trait\s"));
static RS_IMPL: LazyLock<Regex> = LazyLock::new(|| {
    re(r"^\s*(?:unsafe\s+)?impl\b(?:<[^{]*?>)?\s+(?:[^{]*?\s+for\s+)?(?:[\w]+::)*(\w+)")
});
static RS_STATIC: LazyLock<Regex> = LazyLock::new(|| {
    re(r"^\s*(?:pub(?:\([^)]*\))?\s+)?(?:static|const)\s+(?:mut\s+)?([A-Za-z_]\w*)\s*:")
});

const JS_KEYWORDS: &[&str] = &["if", "for", "while", "switch", "catch", "function", "return"];

fn outline_js(source: &str) -> Outline {
    let mut out = Outline::default();
    let mut depth = 0i32;
    let mut open_class: Option<usize> = None;

    for line in source.lines() {
        let code = strip_line_comment(line);
        let start_depth = depth;
        depth = (depth + brace_delta(code, &['"', '\'', '`'])).max(0);

        if start_depth == 0 {
            if let Some(caps) = JS_IMPORT.captures(code) {
                out.imports.push(caps[1].to_string());
            } else if let Some(caps) = JS_CLASS.captures(code) {
                out.classes.push(ClassInfo {
                    name: caps[1].to_string(),
                    methods: Vec::new(),
                });
                open_class = Some(out.classes.len() - 1);
            } else if let Some(caps) = JS_FUNCTION.captures(code) {
                out.functions.push(FunctionInfo {
                    name: caps
                        .get(1)
                        .map_or_else(|| "[anonymous]".to_string(), |m| m.as_str().to_string()),
                    params: split_params(caps.get(2).map_or("", |m| m.as_str()), js_param),
                });
            } else if let Some(caps) = JS_VARIABLE.captures(code) {
                out.variables.push(caps[1].to_string());
            }
        } else if start_depth == 1 {
            if let (Some(idx), Some(caps)) = (open_class, JS_METHOD.captures(code)) {
                let name = &caps[1];
                if !JS_KEYWORDS.contains(&name) && code.trim_end().ends_with('{') {
                    out.classes[idx].methods.push(FunctionInfo {
                        name: name.to_string(),
                        params: split_params(caps.get(2).map_or("", |m| m.as_str()), js_param),
                    });
                }
            }
        }

        if depth == 0 && start_depth > 0 {
            open_class = None;
        }
    }
    out
}

fn outline_python(source: &str) -> Outline {
    let mut out = Outline::default();
    let mut open_class: Option<usize> = None;
    let mut body_indent: Option<usize> = None;

    for line in source.lines() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let indent = line.len() - trimmed.len();

        if indent == 0 {
            open_class = None;
            body_indent = None;

            if let Some(caps) = PY_IMPORT.captures(line) {
                for module in caps[1].split(',') {
                    let module = module.split(" as ").next().unwrap_or("").trim();
                    if !module.is_empty() {
                        out.imports.push(module.to_string());
                    }
                }
            } else if let Some(caps) = PY_FROM.captures(line) {
                out.imports.push(caps[1].to_string());
            } else if let Some(caps) = PY_CLASS.captures(line) {
                out.classes.push(ClassInfo {
                    name: caps[1].to_string(),
                    methods: Vec::new(),
                });
                open_class = Some(out.classes.len() - 1);
            } else if let Some(caps) = PY_DEF.captures(line) {
                out.functions.push(FunctionInfo {
                    name: caps[2].to_string(),
                    params: split_params(caps.get(3).map_or("", |m| m.as_str()), py_param),
                });
            } else if let Some(caps) = PY_VARIABLE.captures(line) {
                out.variables.push(caps[1].to_string());
            }
            continue;
        }

        let Some(idx) = open_class else { continue };
        let body = *body_indent.get_or_insert(indent);
        if indent != body {
            continue;
        }
        if let Some(caps) = PY_DEF.captures(line) {
            out.classes[idx].methods.push(FunctionInfo {
                name: caps[2].to_string(),
                params: split_params(caps.get(3).map_or("", |m| m.as_str()), py_param),
            });
        }
    }
    out
}

fn outline_rust(source: &str) -> Outline {
    let mut out = Outline::default();
    let mut depth = 0i32;
    let mut open_block: Option<usize> = None;

    for line in source.lines() {
        let code = strip_line_comment(line);
        let start_depth = depth;
        depth = (depth + brace_delta(code, &['"'])).max(0);

        if start_depth == 0 {
            if let Some(caps) = RS_USE.captures(code) {
                out.imports.push(caps[1].trim().to_string());
            } else if let Some(caps) = RS_FN.captures(code) {
                out.functions.push(FunctionInfo {
                    name: caps[1].to_string(),
                    params: split_params(caps.get(2).map_or("", |m| m.as_str()), rust_param),
                });
            } else if let Some(caps) = RS_IMPL.captures(code) {
                let idx = class_index(&mut out.classes, &caps[1]);
                open_block = Some(idx);
            } else if let Some(caps) = RS_TYPE.captures(code) {
                let idx = class_index(&mut out.classes, &caps[1]);
                open_block = RS_TRAIT.is_match(code).then_some(idx);
            } else if let Some(caps) = RS_STATIC.captures(code) {
                out.variables.push(caps[1].to_string());
            }
        } else if start_depth == 1 {
            if let (Some(idx), Some(caps)) = (open_block, RS_FN.captures(code)) {
                out.classes[idx].methods.push(FunctionInfo {
                    name: caps[1].to_string(),
                    params: split_params(caps.get(2).map_or("", |m| m.as_str()), rust_param),
                });
            }
        }

        if depth == 0 && start_depth > 0 {
            open_block = None;
        }
    }
    out
}

/// Index of the class named `name`, appending it if absent.
fn class_index(classes: &mut Vec<ClassInfo>, name: &str) -> usize {
    if let Some(idx) = classes.iter().position(|c| c.name == name) {
        return idx;
    }
    classes.push(ClassInfo {
        name: name.to_string(),
        methods: Vec::new(),
    });
    classes.len() - 1
}

/// Net `{`/`}` count of one line, ignoring braces inside quoted strings.
fn brace_delta(line: &str, quotes: &[char]) -> i32 {
    let mut delta = 0;
    let mut in_quote: Option<char> = None;
    let mut escaped = false;

    for ch in line.chars() {
        if let Some(q) = in_quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == q {
                in_quote = None;
            }
            continue;
        }
        match ch {
            '{' => delta += 1,
            '}' => delta -= 1,
            c if quotes.contains(&c) => in_quote = Some(c),
            _ => {}
        }
    }
    delta
}

fn strip_line_comment(line: &str) -> &str {
    match line.find("//") {
        Some(idx) if !line[..idx].contains(['"', '\'', '`']) => &line[..idx],
        _ => line,
    }
}

/// Split a parameter list on top-level commas and name each parameter.
fn split_params(list: &str, name_of: fn(&str) -> Option<String>) -> Vec<String> {
    let mut params = Vec::new();
    let mut depth = 0i32;
    let mut current = String::new();

    for ch in list.chars() {
        match ch {
            '(' | '[' | '{' | '<' => depth += 1,
            ')' | ']' | '}' | '>' => depth -= 1,
            ',' if depth == 0 => {
                params.extend(name_of(current.trim()));
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(ch);
    }
    params.extend(name_of(current.trim()));
    params
}

fn js_param(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }
    if raw.starts_with('{') || raw.starts_with('[') {
        return Some("...".into());
    }
    let name = raw.split(['=', ':']).next().unwrap_or(raw).trim();
    let name = name.trim_start_matches("...").trim_end_matches('?');
    Some(name.to_string())
}

fn py_param(raw: &str) -> Option<String> {
    let name = raw.split(['=', ':']).next().unwrap_or(raw).trim();
    match name {
        "" | "self" | "cls" | "*" | "/" => None,
        _ => Some(name.to_string()),
    }
}

fn rust_param(raw: &str) -> Option<String> {
    let pattern = raw.split(':').next().unwrap_or(raw).trim();
    let pattern = pattern.strip_prefix("mut ").unwrap_or(pattern).trim();
    if pattern.is_empty() || pattern.trim_start_matches(['&', '\'']).contains("self") {
        return None;
    }
    Some(pattern.to_string())
}
