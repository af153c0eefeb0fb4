//! Plain-text rendering of extracted features.
//!
//! The output keeps names and line numbers only. It is meant to be small
//! enough to hand to a language model as context.
//!
//! Headers read `<path> file contains:`. Summaries are not byte-compatible
//! with ones produced under the older `file contain:` wording.

use crate::analysis::AnalysedFile;
use crate::extract::FeatureRecord;

/// Renders files in order: a header naming each path, then one line per
/// non-empty category listing `name at line N` items.
#[must_use]
pub fn render(files: &[AnalysedFile]) -> String {
    let mut lines = Vec::new();
    for file in files {
        lines.push(format!("{} file contains:", file.path));
        render_record(&file.features, &mut lines);
    }
    lines.join("\n")
}

fn render_record(record: &FeatureRecord, lines: &mut Vec<String>) {
    for (category, items) in record.categories() {
        let listed: Vec<String> = items
            .iter()
            .filter(|item| !item.name.is_empty())
            .map(|item| format!("{} at line {}", item.name, item.line))
            .collect();
        if !listed.is_empty() {
            lines.push(format!("  {category}: {}", listed.join(", ")));
        }
    }
}
