//! HTML snapshot report

use crate::storage::MetricsSnapshot;

/// Renders a snapshot as `<html>name: value<br>...</html>`.
///
/// Entries are sorted by type, then by name.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageBuilder;

impl PageBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build_metrics_page(&self, snapshot: &MetricsSnapshot) -> String {
        let mut page = String::from("<html>");
        for by_name in snapshot.values() {
            for (name, value) in by_name {
                push_escaped(&mut page, name);
                page.push_str(": ");
                push_escaped(&mut page, value);
                page.push_str("<br>");
            }
        }
        page.push_str("</html>");
        page
    }
}

fn push_escaped(page: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '<' => page.push_str("&lt;"),
            '>' => page.push_str("&gt;"),
            '&' => page.push_str("&amp;"),
            _ => page.push(c),
        }
    }
}
