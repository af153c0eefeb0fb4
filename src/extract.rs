//! Line-oriented lexical feature extraction for JavaScript-family sources.
//!
//! Every category is matched independently on each physical line with a
//! fixed pattern. There is no parsing: text inside strings or comments that
//! looks like a declaration is reported as one.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static COMMENT: Lazy<Regex> = Lazy::new(|| compile(r"//(.+)|/\*(.+)\*/"));
static FUNCTION: Lazy<Regex> = Lazy::new(|| compile(r"\bfunction\s+([a-zA-Z_$][\w$]*)\s*\("));
static CLASS: Lazy<Regex> = Lazy::new(|| compile(r"\bclass\s+([a-zA-Z_$][\w$]*)"));
static ARROW_FUNCTION: Lazy<Regex> =
    Lazy::new(|| compile(r"([a-zA-Z_$][\w$]*)\s*=\s*\(\)\s*=>"));
static GLOBAL_VARIABLE: Lazy<Regex> = Lazy::new(|| compile(r"\bvar\s+([a-zA-Z_$][\w$]*)\s*="));
static STRUCT_TYPE: Lazy<Regex> = Lazy::new(|| compile(r"\bstruct\s+([a-zA-Z_$][\w$]*)"));
static CONSTANT: Lazy<Regex> = Lazy::new(|| compile(r"\bconst\s+([a-zA-Z_$][\w$]*)\s*="));
static TYPE_DEFINITION: Lazy<Regex> =
    Lazy::new(|| compile(r"\b(?:type|interface)\s+([a-zA-Z_$][\w$]*)"));
/// JavaScript line terminators: CRLF, CR, LF and the Unicode line and
/// paragraph separators.
static LINE_BREAK: Lazy<Regex> = Lazy::new(|| compile("\r\n|[\r\n\u{2028}\u{2029}]"));
static DEFAULT_EXPORT: Lazy<Regex> = Lazy::new(|| {
    compile(r"\bexport\s+default\s+(?:async\s+)?(?:function|const|class)\s+([A-Z_$][\w$]*)")
});

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("feature patterns are valid")
}

/// One extracted token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    /// Identifier, or the body of a comment.
    ///
    /// Comment bodies are trimmed, so `// note` and `//note` both record
    /// `note` and the flattened summary keeps single spacing.
    pub name: String,
    /// 1-based line number.
    pub line: usize,
}

/// Everything extracted from one file, by category.
///
/// Field order is the category order used when rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureRecord {
    /// `//` and `/* */` comment bodies.
    pub comments: Vec<Feature>,
    /// `function name(` declarations.
    pub functions: Vec<Feature>,
    /// `class Name` declarations.
    pub classes: Vec<Feature>,
    /// `name = () =>` assignments.
    pub arrow_functions: Vec<Feature>,
    /// `var name =` declarations.
    pub global_variables: Vec<Feature>,
    /// `struct Name` occurrences.
    pub struct_types: Vec<Feature>,
    /// `const name =` declarations.
    pub constants: Vec<Feature>,
    /// `type Name` and `interface Name` declarations.
    pub type_definitions: Vec<Feature>,
    /// UI components; only populated for `.jsx`/`.tsx` files.
    pub components: Vec<Feature>,
    /// `use`-prefixed functions; only populated for `.jsx`/`.tsx` files.
    pub hooks: Vec<Feature>,
}

impl FeatureRecord {
    /// Categories with their rendered names, in declaration order.
    #[must_use]
    pub fn categories(&self) -> [(&'static str, &[Feature]); 10] {
        [
            ("comments", &self.comments),
            ("functions", &self.functions),
            ("classes", &self.classes),
            ("arrowFunctions", &self.arrow_functions),
            ("globalVariables", &self.global_variables),
            ("structTypes", &self.struct_types),
            ("constants", &self.constants),
            ("typeDefinitions", &self.type_definitions),
            ("components", &self.components),
            ("hooks", &self.hooks),
        ]
    }

    /// Whether nothing at all was extracted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories().iter().all(|(_, items)| items.is_empty())
    }
}

/// Whether a file name enables the component and hook heuristics.
#[must_use]
pub fn is_ui_file(name: &str) -> bool {
    name.ends_with(".tsx") || name.ends_with(".jsx")
}

fn push_matches(
    into: &mut Vec<Feature>,
    pattern: &Regex,
    line: &str,
    number: usize,
    exported: &[String],
) {
    into.extend(
        pattern
            .captures_iter(line)
            .filter_map(|caps| caps.get(1))
            .filter(|m| !exported.iter().any(|name| name == m.as_str()))
            .map(|m| Feature { name: m.as_str().to_string(), line: number }),
    );
}

fn starts_uppercase(feature: &Feature) -> bool {
    feature.name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

/// Splits on every line terminator. A trailing terminator does not start
/// another line.
fn physical_lines(content: &str) -> impl Iterator<Item = &str> {
    let mut lines: Vec<&str> = LINE_BREAK.split(content).collect();
    if lines.last().is_some_and(|last| last.is_empty()) {
        lines.pop();
    }
    lines.into_iter()
}

/// Scans `content` line by line and returns its features.
///
/// For UI files (see [`is_ui_file`]) default exports become components
/// instead of functions, classes or constants, and `use`-prefixed functions
/// and arrow functions are also recorded as hooks.
/// Without a default export, components fall back to the capitalized names
/// of the first of functions, arrow functions, or classes that has any.
#[must_use]
pub fn extract(file_name: &str, content: &str) -> FeatureRecord {
    let ui = is_ui_file(file_name);
    let mut record = FeatureRecord::default();

    for (index, line) in physical_lines(content).enumerate() {
        let number = index + 1;

        for caps in COMMENT.captures_iter(line) {
            if let Some(body) = caps.get(1).or_else(|| caps.get(2)) {
                record
                    .comments
                    .push(Feature { name: body.as_str().trim().to_string(), line: number });
            }
        }

        // A default export on this line is reported as a component only.
        let exported: Vec<String> = if ui {
            DEFAULT_EXPORT
                .captures_iter(line)
                .filter_map(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
                .collect()
        } else {
            Vec::new()
        };

        push_matches(&mut record.functions, &FUNCTION, line, number, &exported);
        push_matches(&mut record.classes, &CLASS, line, number, &exported);
        push_matches(&mut record.arrow_functions, &ARROW_FUNCTION, line, number, &exported);
        push_matches(&mut record.global_variables, &GLOBAL_VARIABLE, line, number, &[]);
        push_matches(&mut record.struct_types, &STRUCT_TYPE, line, number, &[]);
        push_matches(&mut record.constants, &CONSTANT, line, number, &exported);
        push_matches(&mut record.type_definitions, &TYPE_DEFINITION, line, number, &[]);
        record
            .components
            .extend(exported.into_iter().map(|name| Feature { name, line: number }));
    }

    if ui {
        record.hooks = record
            .functions
            .iter()
            .chain(&record.arrow_functions)
            .filter(|f| f.name.starts_with("use"))
            .cloned()
            .collect();

        if record.components.is_empty() {
            let tiers = [&record.functions, &record.arrow_functions, &record.classes];
            record.components = tiers
                .iter()
                .map(|tier| tier.iter().filter(|f| starts_uppercase(f)).cloned().collect::<Vec<_>>())
                .find(|capitalized| !capitalized.is_empty())
                .unwrap_or_default();
        }
    }

    record
}
