//! Table rendering for planning operations, with a plain-line fallback for
//! non-tty output or `--plain`.

use comfy_table::{ContentArrangement, Table as ComfyTable, presets};

/// A simple headered table that can render as a bordered table or as plain
/// whitespace-separated lines.
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    #[must_use]
    pub fn new(headers: &[&str]) -> Self {
        Self { headers: headers.iter().map(|h| (*h).to_string()).collect(), rows: Vec::new() }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn render(&self, plain: bool) -> String {
        if plain {
            self.render_plain()
        } else {
            self.render_boxed()
        }
    }

    fn render_boxed(&self) -> String {
        let mut table = ComfyTable::new();
        table.load_preset(presets::UTF8_BORDERS_ONLY);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(self.headers.clone());
        for row in &self.rows {
            table.add_row(row.clone());
        }
        table.to_string()
    }

    fn render_plain(&self) -> String {
        let mut out = String::new();
        for row in &self.rows {
            out.push_str(&row.join("  "));
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boxed_rendering_includes_headers_and_rows() {
        let mut table = Table::new(&["name", "version"]);
        table.push(vec!["hello".into(), "1.0".into()]);
        let rendered = table.render(false);
        assert!(rendered.contains("name"));
        assert!(rendered.contains("hello"));
    }

    #[test]
    fn plain_rendering_has_no_box_characters() {
        let mut table = Table::new(&["name", "version"]);
        table.push(vec!["hello".into(), "1.0".into()]);
        let rendered = table.render(true);
        assert_eq!(rendered.trim(), "hello  1.0");
    }
}
