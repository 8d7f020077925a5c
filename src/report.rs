use crate::diff::BuildChanges;
use crate::utils::{pretty_bytes, pretty_bytes_signed};

pub const NO_CHANGES_NOTICE: &str = "#### :raised_hands:   No changes.";

/// Deltas within this many bytes of zero are folded into the collapsed
/// minor section.
const MAJOR_THRESHOLD: i64 = 100;

/// Rendered change report: a headline section and a collapsed section for
/// minor changes. Built locally per run, never accumulated globally.
#[derive(Debug, Default, Clone)]
pub struct Report {
    major: String,
    minor: String,
}

impl Report {
    fn push_major(&mut self, line: &str) {
        self.major.push('\n');
        self.major.push_str(line);
    }

    fn push_minor(&mut self, line: &str) {
        self.minor.push('\n');
        self.minor.push_str(line);
    }

    pub fn major(&self) -> &str {
        &self.major
    }

    pub fn minor(&self) -> &str {
        &self.minor
    }

    /// Full comment body: the major section, then the minor rows inside a
    /// collapsible block when there are any.
    pub fn to_markdown(&self) -> String {
        if self.minor.is_empty() {
            return self.major.clone();
        }
        format!(
            "{}\n<details><summary>Minor Changes</summary>\n{}\n</details>",
            self.major, self.minor
        )
    }
}

struct ChunkRow {
    bytes_diff: i64,
    size_diff: String,
    size: String,
    status: &'static str,
    name: String,
}

impl ChunkRow {
    fn new(old_gzip: u64, new_gzip: u64, name: &str) -> Self {
        let bytes_diff = new_gzip as i64 - old_gzip as i64;
        let status = if bytes_diff > 0 {
            ":small_red_triangle:"
        } else if bytes_diff < 0 {
            ":arrow_down:"
        } else {
            ":o:"
        };
        Self {
            bytes_diff,
            size_diff: pretty_bytes_signed(bytes_diff),
            size: pretty_bytes(new_gzip),
            status,
            name: name.to_string(),
        }
    }
}

/// Render a build diff as a categorized, deterministically sorted report.
///
/// Major rows are changed artifacts whose gzip delta exceeds the threshold:
/// increases sorted largest-growth-first, then decreases sorted
/// largest-shrinkage-first. The collapsed section lists renames in input
/// order, then minor increases (descending) and minor decreases (ascending).
pub fn render_changes(changes: &BuildChanges) -> Report {
    let mut report = Report::default();

    if changes.new_items.is_empty()
        && changes.deleted_items.is_empty()
        && changes.changed_items.is_empty()
    {
        report.push_major(NO_CHANGES_NOTICE);
        return report;
    }

    let mut increased: Vec<ChunkRow> = Vec::new();
    let mut decreased: Vec<ChunkRow> = Vec::new();
    let mut minor_increased: Vec<ChunkRow> = Vec::new();
    let mut minor_decreased: Vec<ChunkRow> = Vec::new();
    let mut renamed: Vec<ChunkRow> = Vec::new();

    for (old, new) in &changes.changed_items {
        let row = ChunkRow::new(old.gzip_size, new.gzip_size, &new.name);
        if row.bytes_diff > MAJOR_THRESHOLD {
            increased.push(row);
        } else if row.bytes_diff > 0 {
            minor_increased.push(row);
        } else if row.bytes_diff < -MAJOR_THRESHOLD {
            decreased.push(row);
        } else if row.bytes_diff < 0 {
            minor_decreased.push(row);
        } else {
            renamed.push(row);
        }
    }

    increased.sort_by(|a, b| b.bytes_diff.cmp(&a.bytes_diff));
    decreased.sort_by(|a, b| a.bytes_diff.cmp(&b.bytes_diff));
    minor_increased.sort_by(|a, b| b.bytes_diff.cmp(&a.bytes_diff));
    minor_decreased.sort_by(|a, b| a.bytes_diff.cmp(&b.bytes_diff));

    report.push_major("### Changes in existing chunks :pencil2:");
    report.push_major("| Size Change | Current Size | Status | Chunk");
    report.push_major("| --- | --- | :---: | :--- |");
    for row in increased.iter().chain(decreased.iter()) {
        report.push_major(&format!(
            "| **{}** | {} | {} | {}",
            row.size_diff, row.size, row.status, row.name
        ));
    }

    report.push_major("### New chunks :heavy_plus_sign:");
    report.push_major("Size | Status | Chunk");
    report.push_major("| --- | :---: | :--- |");
    for file in &changes.new_items {
        report.push_major(&format!(
            "| **{}** | :exclamation: | {}",
            pretty_bytes(file.gzip_size),
            file.name
        ));
    }

    report.push_major("### Removed chunks :heavy_minus_sign:");
    report.push_major("Size | Status | Chunk");
    report.push_major("| --- | :---: | :--- |");
    for file in &changes.deleted_items {
        report.push_major(&format!(
            "| **{}** | :negative_squared_cross_mark: | {}",
            pretty_bytes(file.gzip_size),
            file.name
        ));
    }

    report.push_minor("| Size Change | Current Size | Status | Chunk");
    report.push_minor("| --- | --- | :---: | :--- |");
    for row in renamed
        .iter()
        .chain(minor_increased.iter())
        .chain(minor_decreased.iter())
    {
        report.push_minor(&format!(
            "| {} | {} | {} | {}",
            row.size_diff, row.size, row.status, row.name
        ));
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::FileData;

    fn file(path: &str, gzip_size: u64) -> FileData {
        FileData {
            name: crate::artifact::display_name(path),
            path: path.to_string(),
            size: gzip_size,
            gzip_size,
        }
    }

    fn changed(name: &str, old_gzip: u64, new_gzip: u64) -> (FileData, FileData) {
        (
            file(&format!("/d/{name}-old.js"), old_gzip),
            file(&format!("/d/{name}-new.js"), new_gzip),
        )
    }

    #[test]
    fn empty_diff_is_just_the_notice() {
        let report = render_changes(&BuildChanges::default());
        assert_eq!(report.to_markdown(), format!("\n{NO_CHANGES_NOTICE}"));
        assert!(!report.to_markdown().contains('|'));
        assert!(!report.to_markdown().contains("<details>"));
    }

    #[test]
    fn major_and_minor_split_and_sort() {
        // Deltas: +50 (minor), +300 (major), -20 (minor), -500 (major).
        let changes = BuildChanges {
            new_items: vec![],
            deleted_items: vec![],
            changed_items: vec![
                changed("small_up", 1000, 1050),
                changed("big_up", 1000, 1300),
                changed("small_down", 1000, 980),
                changed("big_down", 1000, 500),
            ],
        };

        let report = render_changes(&changes);

        let major_rows: Vec<&str> = report
            .major()
            .lines()
            .filter(|l| l.starts_with("| **"))
            .collect();
        assert_eq!(major_rows.len(), 2);
        assert!(major_rows[0].contains("+300 B"));
        assert!(major_rows[1].contains("-500 B"));

        let minor = report.minor();
        let plus_idx = minor.find("+50 B").unwrap();
        let minus_idx = minor.find("-20 B").unwrap();
        assert!(plus_idx < minus_idx);
        assert!(!minor.contains("+300 B"));
        assert!(!minor.contains("-500 B"));
    }

    #[test]
    fn major_increases_sort_descending_and_decreases_ascending() {
        let changes = BuildChanges {
            new_items: vec![],
            deleted_items: vec![],
            changed_items: vec![
                changed("up_small", 1000, 1200),
                changed("up_big", 1000, 2000),
                changed("down_small", 1000, 800),
                changed("down_big", 1000, 100),
            ],
        };

        let report = render_changes(&changes);
        let major = report.major();
        let up_big = major.find("+1 kB").unwrap();
        let up_small = major.find("+200 B").unwrap();
        let down_big = major.find("-900 B").unwrap();
        let down_small = major.find("-200 B").unwrap();
        assert!(up_big < up_small);
        assert!(up_small < down_big);
        assert!(down_big < down_small);
    }

    #[test]
    fn renamed_rows_lead_the_minor_section() {
        let changes = BuildChanges {
            new_items: vec![],
            deleted_items: vec![],
            changed_items: vec![
                changed("bumped", 1000, 1050),
                changed("moved", 1000, 1000),
            ],
        };

        let report = render_changes(&changes);
        let minor = report.minor();
        let renamed_idx = minor.find(":o:").unwrap();
        let bumped_idx = minor.find("+50 B").unwrap();
        assert!(renamed_idx < bumped_idx);
        assert!(minor.contains(" 0 B"));
    }

    #[test]
    fn new_and_removed_tables_list_names_and_sizes() {
        let changes = BuildChanges {
            new_items: vec![file("/d/fresh-abc.js", 1200)],
            deleted_items: vec![file("/d/stale-def.js", 800)],
            changed_items: vec![],
        };

        let report = render_changes(&changes);
        let major = report.major();
        assert!(major.contains("### New chunks :heavy_plus_sign:"));
        assert!(major.contains("| **1.2 kB** | :exclamation: | fresh"));
        assert!(major.contains("### Removed chunks :heavy_minus_sign:"));
        assert!(major.contains("| **800 B** | :negative_squared_cross_mark: | stale"));
    }

    #[test]
    fn markdown_wraps_minor_section_in_details() {
        let changes = BuildChanges {
            new_items: vec![file("/d/fresh-abc.js", 1200)],
            deleted_items: vec![],
            changed_items: vec![],
        };

        let markdown = render_changes(&changes).to_markdown();
        assert!(markdown.contains("<details><summary>Minor Changes</summary>"));
        assert!(markdown.ends_with("</details>"));
    }
}
