//! Rendering for `--output`: tables for people, serde formats for scripts.
//!
//! Toasts queued by the core views are printed here too, after the
//! command's own output.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use libseat_core::{Toast, ToastLevel};

use crate::cli::{ColorMode, OutputFormat};

// ── Color helpers ────────────────────────────────────────────────────

/// Color is on for a terminal unless `NO_COLOR` is set.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Good,
    Active,
    Muted,
    Bad,
}

/// Colors status labels when the terminal allows it.
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    enabled: bool,
}

impl Painter {
    pub fn new(mode: ColorMode) -> Self {
        Self {
            enabled: should_color(mode),
        }
    }

    pub fn paint(self, text: &str, tone: Tone) -> String {
        if !self.enabled {
            return text.to_owned();
        }
        match tone {
            Tone::Good => text.green().to_string(),
            Tone::Active => text.cyan().to_string(),
            Tone::Muted => text.dimmed().to_string(),
            Tone::Bad => text.red().to_string(),
        }
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render rows. Tables go through `to_row`; json and yaml serialize the DTOs
/// themselves; plain prints one `id_fn` value per line.
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Render one entity. Table mode prints the `detail_fn` text block.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize + ?Sized,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => id_fn(data),
    }
}

/// Footer under a table page: "page 2/5 (93 total)".
pub fn page_footer(format: OutputFormat, page: u32, total_pages: u64, count: u64) -> String {
    if format == OutputFormat::Table && total_pages > 1 {
        format!("page {page}/{total_pages} ({count} total)")
    } else {
        String::new()
    }
}

/// Write to stdout unless quiet or empty.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// Drain queued toasts to stderr. Error toasts are skipped: the error
/// itself is reported on exit.
pub fn flush_toasts(toasts: Vec<Toast>, quiet: bool, painter: Painter) {
    if quiet {
        return;
    }
    let mut stderr = io::stderr().lock();
    for toast in toasts {
        let line = match toast.level {
            ToastLevel::Success => painter.paint(&toast.message, Tone::Good),
            ToastLevel::Info => toast.message,
            ToastLevel::Warning => painter.paint(&toast.message, Tone::Active),
            ToastLevel::Error => continue,
        };
        let _ = writeln!(stderr, "{line}");
    }
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    let result = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    result.unwrap_or_else(|e| format!("{{\"error\": \"serialization failed: {e}\"}}"))
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).unwrap_or_else(|e| format!("error: serialization failed: {e}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Serialize;
    use tabled::Tabled;

    use super::*;

    #[derive(Serialize)]
    struct Item {
        id: u32,
        name: &'static str,
    }

    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "ID")]
        id: u32,
        #[tabled(rename = "Name")]
        name: String,
    }

    fn items() -> Vec<Item> {
        vec![
            Item { id: 1, name: "Central" },
            Item { id: 2, name: "Annex" },
        ]
    }

    fn render(format: OutputFormat) -> String {
        render_list(
            format,
            &items(),
            |i| Row {
                id: i.id,
                name: i.name.into(),
            },
            |i| i.id.to_string(),
        )
    }

    #[test]
    fn plain_emits_one_identifier_per_line() {
        assert_eq!(render(OutputFormat::Plain), "1\n2");
    }

    #[test]
    fn compact_json_is_single_line() {
        assert_eq!(
            render(OutputFormat::JsonCompact),
            r#"[{"id":1,"name":"Central"},{"id":2,"name":"Annex"}]"#
        );
    }

    #[test]
    fn table_has_headers() {
        let table = render(OutputFormat::Table);
        assert!(table.contains("ID"));
        assert!(table.contains("Annex"));
    }

    #[test]
    fn footer_only_for_multi_page_tables() {
        assert_eq!(page_footer(OutputFormat::Table, 1, 1, 3), "");
        assert_eq!(page_footer(OutputFormat::Json, 1, 4, 70), "");
        assert_eq!(
            page_footer(OutputFormat::Table, 2, 4, 70),
            "page 2/4 (70 total)"
        );
    }

    #[test]
    fn disabled_painter_leaves_text_alone() {
        let painter = Painter::new(ColorMode::Never);
        assert_eq!(painter.paint("CONFIRMED", Tone::Good), "CONFIRMED");
    }
}
