use std::fmt::Write as _;

const MIN_WIDTH: usize = 4;
const GAP: &str = "  ";

#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

/// Column-aligned plain-text table.
#[derive(Debug, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    #[must_use]
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    #[must_use]
    pub fn row(mut self, cells: Vec<String>) -> Self {
        self.rows.push(cells);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn render(&self, options: TableOptions) -> String {
        let widths = self.widths(options.max_width);

        let mut out = self
            .headers
            .iter()
            .zip(&widths)
            .map(|(header, width)| pad(&truncate(header, *width), *width, false))
            .collect::<Vec<_>>()
            .join(GAP)
            .trim_end()
            .to_string();
        let rule_len = widths.iter().sum::<usize>() + GAP.len() * widths.len().saturating_sub(1);
        let _ = write!(out, "\n{}", "-".repeat(rule_len));

        for row in &self.rows {
            let line = widths
                .iter()
                .enumerate()
                .map(|(index, width)| {
                    let text = truncate(row.get(index).map_or("-", String::as_str), *width);
                    let padded = pad(&text, *width, is_numeric(&text));
                    if options.color {
                        colorize(&text, padded)
                    } else {
                        padded
                    }
                })
                .collect::<Vec<_>>()
                .join(GAP);
            let _ = write!(out, "\n{}", line.trim_end());
        }
        out
    }

    fn widths(&self, max_width: Option<usize>) -> Vec<usize> {
        let mut widths: Vec<usize> = self
            .headers
            .iter()
            .enumerate()
            .map(|(index, header)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(index))
                    .map(|cell| cell.chars().count())
                    .chain([header.chars().count(), MIN_WIDTH])
                    .max()
                    .unwrap_or(MIN_WIDTH)
            })
            .collect();

        let Some(max_width) = max_width else {
            return widths;
        };
        let gaps = GAP.len() * widths.len().saturating_sub(1);
        // Shave the widest column one character at a time until it fits.
        while widths.iter().sum::<usize>() + gaps > max_width {
            let Some((index, _)) = widths
                .iter()
                .enumerate()
                .filter(|(_, width)| **width > MIN_WIDTH)
                .max_by_key(|(_, width)| **width)
            else {
                break;
            };
            widths[index] -= 1;
        }
        widths
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut out: String = value.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn pad(value: &str, width: usize, right_align: bool) -> String {
    if right_align {
        format!("{value:>width$}")
    } else {
        format!("{value:<width$}")
    }
}

fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.parse::<f64>().is_ok()
}

/// Color processing states and booleans. `padded` keeps its alignment
/// because the escape codes wrap the already padded cell.
fn colorize(text: &str, padded: String) -> String {
    let code = match text {
        "completed" | "true" | "ok" | "healthy" => "32",
        "uploading" | "queued" | "processing" => "33",
        "failed" | "false" | "error" => "31",
        _ => return padded,
    };
    format!("\u{1b}[{code}m{padded}\u{1b}[0m")
}
