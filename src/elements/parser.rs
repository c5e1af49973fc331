use super::error::ElementError;
use super::types::OrbitalElementSet;

const LINES_PER_OBJECT: usize = 3;

#[derive(Debug)]
pub struct SkippedEntry {
    /// 1-based line number of the group's name line.
    pub line: usize,
    pub name: String,
    pub reason: ElementError,
}

#[derive(Debug, Default)]
pub struct ParseReport {
    pub elements: Vec<OrbitalElementSet>,
    pub skipped: Vec<SkippedEntry>,
}

/// Parse three-line element text for one category, skipping malformed groups.
pub fn parse_elements(text: &str, category: &str) -> Vec<OrbitalElementSet> {
    parse_report(text, category).elements
}

/// Like [`parse_elements`], but keeps the reason for every skipped group.
pub fn parse_report(text: &str, category: &str) -> ParseReport {
    let lines: Vec<&str> = text.trim().lines().collect();
    let mut report = ParseReport::default();

    for (group, chunk) in lines.chunks(LINES_PER_OBJECT).enumerate() {
        let line = group * LINES_PER_OBJECT + 1;
        let name = chunk[0].trim();

        if chunk.len() < LINES_PER_OBJECT {
            log::debug!("{category}: dropping trailing group at line {line} ({name})");
            report.skipped.push(SkippedEntry {
                line,
                name: name.to_string(),
                reason: ElementError::Incomplete(chunk.len()),
            });
            continue;
        }

        let line1 = chunk[1].trim();
        let line2 = chunk[2].trim();
        if name.is_empty() || line1.is_empty() || line2.is_empty() {
            report.skipped.push(SkippedEntry {
                line,
                name: name.to_string(),
                reason: ElementError::EmptyLine,
            });
            continue;
        }

        match OrbitalElementSet::from_tle(name, line1, line2, category) {
            Ok(set) => report.elements.push(set),
            Err(e) => {
                log::warn!("{category}: failed to parse elements for {name}: {e}");
                report.skipped.push(SkippedEntry {
                    line,
                    name: name.to_string(),
                    reason: e,
                });
            }
        }
    }

    report
}
