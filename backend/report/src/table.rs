//! Plain-text table rendering.

/// Column alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// A table column definition.
#[derive(Debug, Clone)]
pub struct Column {
    pub header: String,
    pub align: Align,
    pub max_width: Option<usize>,
}

impl Column {
    pub fn left(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            align: Align::Left,
            max_width: None,
        }
    }

    pub fn right(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            align: Align::Right,
            max_width: None,
        }
    }

    pub fn max_width(mut self, width: usize) -> Self {
        self.max_width = Some(width);
        self
    }
}

fn width_of(s: &str) -> usize {
    s.chars().count()
}

/// Cut a cell to `width` characters, marking the cut with `…`.
fn clip(s: &str, width: usize) -> String {
    if width_of(s) <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Render rows under a header and a dashed separator; missing cells are blank.
pub fn render_table(columns: &[Column], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = columns.iter().map(|c| width_of(&c.header)).collect();
    for row in rows {
        for (i, column) in columns.iter().enumerate() {
            let w = row.get(i).map(|c| width_of(c)).unwrap_or(0);
            let w = column.max_width.map_or(w, |max| w.min(max));
            widths[i] = widths[i].max(w);
        }
    }

    let line = |cells: Vec<String>| -> String {
        let joined = cells.join("  ");
        format!("  {}\n", joined.trim_end())
    };

    let mut out = line(
        columns
            .iter()
            .enumerate()
            .map(|(i, c)| pad_cell(&c.header, widths[i], c.align))
            .collect(),
    );
    out.push_str(&line(widths.iter().map(|w| "-".repeat(*w)).collect()));
    for row in rows {
        out.push_str(&line(
            columns
                .iter()
                .enumerate()
                .map(|(i, c)| {
                    let cell = clip(row.get(i).map(String::as_str).unwrap_or(""), widths[i]);
                    pad_cell(&cell, widths[i], c.align)
                })
                .collect(),
        ));
    }
    out
}

fn pad_cell(s: &str, width: usize, align: Align) -> String {
    let pad = width.saturating_sub(width_of(s));
    match align {
        Align::Left => format!("{s}{}", " ".repeat(pad)),
        Align::Right => format!("{}{s}", " ".repeat(pad)),
    }
}
