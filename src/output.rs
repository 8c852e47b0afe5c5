use std::io::Write as _;
use std::path::PathBuf;

use csv_core::WriteResult;

/// Notes in the text format are wrapped to this many columns.
const NOTE_WIDTH: usize = 95;
const NOTE_INDENT: &str = "        ";

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Text,
    Table,
    Jsonl,
    Csv,
}

#[derive(clap::Parser, Clone, Debug)]
#[group(id = "output::Args")]
pub struct Args {
    /// Write the results into this file instead of the terminal.
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
    #[arg(long, short='f', value_enum, default_value_t = Format::Text)]
    format: Format,
    /// With `--output`, also print the results to the terminal.
    #[arg(long, requires = "output")]
    tee: bool,
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("could not open the specified output file at {1:?}")]
    OpenOutputFile(#[source] std::io::Error, PathBuf),
    #[error("could not write data to the output file at {1:?}")]
    WriteFile(#[source] std::io::Error, PathBuf),
    #[error("could not write data to the terminal")]
    WriteStdout(#[source] std::io::Error),
    #[error("could not serialize results to JSON")]
    SerializeJson(#[source] serde_json::Error),
}

impl Args {
    pub fn to_output(self) -> Result<Output, Error> {
        let io = match &self.output {
            None => Box::new(std::io::stdout().lock()) as Box<dyn std::io::Write>,
            Some(path) => {
                let file = std::fs::OpenOptions::new()
                    .write(true)
                    .create(true)
                    .truncate(true)
                    .open(path)
                    .map_err(|e| Error::OpenOutputFile(e, path.clone()))?;
                if self.tee {
                    Box::new(Tee { file, stdout: std::io::stdout().lock() }) as Box<_>
                } else {
                    Box::new(file) as Box<_>
                }
            }
        };
        let formatter = match &self.format {
            Format::Text => Formatter::Text { lines: Vec::new() },
            Format::Table => Formatter::Table { header: Vec::new(), tables: vec![(None, table())] },
            Format::Jsonl => Formatter::Jsonl,
            Format::Csv => Formatter::Csv { written_records: false },
        };
        Ok(Output { args: self, io, formatter })
    }
}

fn table() -> comfy_table::Table {
    let mut comfy = comfy_table::Table::new();
    comfy.set_content_arrangement(comfy_table::ContentArrangement::Dynamic);
    comfy
}

/// Writes everything into the file and the terminal both.
struct Tee<W> {
    file: std::fs::File,
    stdout: W,
}

impl<W: std::io::Write> std::io::Write for Tee<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.file.write_all(buf)?;
        self.stdout.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.file.flush()?;
        self.stdout.flush()
    }
}

pub struct Output {
    args: Args,
    io: Box<dyn std::io::Write>,
    formatter: Formatter,
}

enum Formatter {
    Text { lines: Vec<TextLine> },
    Csv { written_records: bool },
    Table { header: Vec<&'static str>, tables: Vec<(Option<String>, comfy_table::Table)> },
    Jsonl,
}

enum TextLine {
    Header(Vec<&'static str>),
    Row(Vec<String>),
    Section(String),
    Note(String),
}

impl Output {
    pub fn table_headers(&mut self, hdrs: Vec<&'static str>) -> Result<(), Error> {
        match &mut self.formatter {
            Formatter::Csv { written_records } => {
                if *written_records {
                    panic!("table headers for csv must be written very first!");
                }
                *written_records = true;
                self.write_csv_row(&hdrs)?;
            }
            Formatter::Table { header, tables } => {
                for (_, comfy) in tables {
                    comfy.set_header(hdrs.clone());
                }
                *header = hdrs;
            }
            Formatter::Text { lines } => lines.push(TextLine::Header(hdrs)),
            Formatter::Jsonl => {}
        }
        Ok(())
    }

    /// Start a new titled group of rows.
    ///
    /// Only the human-oriented formats show the title, CSV and JSON lines keep a flat sequence
    /// of records.
    pub fn section(&mut self, title: impl Into<String>) {
        match &mut self.formatter {
            Formatter::Text { lines } => lines.push(TextLine::Section(title.into())),
            Formatter::Table { header, tables } => {
                let mut comfy = table();
                if !header.is_empty() {
                    comfy.set_header(header.clone());
                }
                tables.push((Some(title.into()), comfy));
            }
            Formatter::Csv { .. } | Formatter::Jsonl => {}
        }
    }

    /// Free-form text attached to the preceding row.
    pub fn note(&mut self, text: &str) {
        match &mut self.formatter {
            Formatter::Text { lines } => lines.push(TextLine::Note(text.to_string())),
            Formatter::Table { header, tables } => {
                if let Some((_, comfy)) = tables.last_mut() {
                    let mut row = vec![String::new(); header.len().saturating_sub(1)];
                    row.push(text.to_string());
                    comfy.add_row(row);
                }
            }
            Formatter::Csv { .. } | Formatter::Jsonl => {}
        }
    }

    fn write_csv_row<V: std::ops::Deref<Target = str>>(
        &mut self,
        values: &[V],
    ) -> Result<(), Error> {
        let max_len = 2 + 2 * values.iter().map(|v| v.len()).max().unwrap_or(0);
        let mut output = vec![0; max_len];
        let mut writer = csv_core::Writer::new();
        for (index, value) in values.iter().enumerate() {
            if index != 0 {
                let (WriteResult::InputEmpty, ob) = writer.delimiter(&mut output) else {
                    panic!("something wrong with csv output");
                };
                self.io.write_all(&output[..ob]).map_err(|e| self.write_error(e))?;
            }
            let inp = value.as_bytes();
            let (WriteResult::InputEmpty, ib, ob) = writer.field(inp, &mut output) else {
                panic!("something wrong with csv output");
            };
            assert_eq!(value.len(), ib);
            self.io.write_all(&output[..ob]).map_err(|e| self.write_error(e))?;
        }
        let (WriteResult::InputEmpty, ob) = writer.terminator(&mut output) else {
            panic!("something wrong with csv output");
        };
        self.io.write_all(&output[..ob]).map_err(|e| self.write_error(e))
    }

    pub fn result<R: serde::Serialize>(
        &mut self,
        table_row: impl FnOnce() -> Vec<String>,
        serde_record: impl FnOnce() -> R,
    ) -> Result<(), Error> {
        match &mut self.formatter {
            Formatter::Csv { written_records } => {
                *written_records = true;
                let values = table_row();
                self.write_csv_row(&values)?;
            }
            Formatter::Table { tables, .. } => {
                if let Some((_, comfy)) = tables.last_mut() {
                    comfy.add_row(table_row());
                }
            }
            Formatter::Text { lines } => lines.push(TextLine::Row(table_row())),
            Formatter::Jsonl => {
                serde_json::to_writer(&mut self.io, &serde_record())
                    .map_err(Error::SerializeJson)?;
                writeln!(self.io).map_err(|e| self.write_error(e))?
            }
        }
        Ok(())
    }

    fn write_error(&self, e: std::io::Error) -> Error {
        match &self.args.output {
            None => Error::WriteStdout(e),
            Some(p) => Error::WriteFile(e, p.into()),
        }
    }

    pub fn commit(mut self) -> Result<(), Error> {
        let rendered = match &self.formatter {
            Formatter::Csv { written_records: _ } | Formatter::Jsonl => String::new(),
            Formatter::Table { header: _, tables } => {
                let mut rendered = String::new();
                for (title, comfy) in tables {
                    if let Some(title) = title {
                        rendered.push_str(&format!("\n{title}\n"));
                    }
                    rendered.push_str(&format!("{comfy}\n"));
                }
                rendered
            }
            Formatter::Text { lines } => render_text(lines),
        };
        self.io.write_all(rendered.as_bytes()).map_err(|e| self.write_error(e))?;
        self.io.flush().map_err(|e| self.write_error(e))
    }
}

fn render_text(lines: &[TextLine]) -> String {
    let mut widths = Vec::<usize>::new();
    let mut grow = |cells: &mut dyn Iterator<Item = usize>| {
        for (index, width) in cells.enumerate() {
            match widths.get_mut(index) {
                Some(w) => *w = (*w).max(width),
                None => widths.push(width),
            }
        }
    };
    for line in lines {
        match line {
            TextLine::Header(cells) => grow(&mut cells.iter().map(|c| c.chars().count())),
            TextLine::Row(cells) => grow(&mut cells.iter().map(|c| c.chars().count())),
            TextLine::Section(_) | TextLine::Note(_) => {}
        }
    }
    let row = |cells: &mut dyn Iterator<Item = &str>| {
        let mut result = String::new();
        for (index, cell) in cells.enumerate() {
            let width = widths.get(index).copied().unwrap_or(0);
            result.push_str(&format!("{cell:<width$}  "));
        }
        result.truncate(result.trim_end().len());
        result.push('\n');
        result
    };
    let mut rendered = String::new();
    for line in lines {
        match line {
            TextLine::Header(cells) => {
                rendered.push_str(&row(&mut cells.iter().copied()));
                let total = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
                rendered.push_str(&"-".repeat(total));
                rendered.push('\n');
            }
            TextLine::Row(cells) => rendered.push_str(&row(&mut cells.iter().map(|c| &**c))),
            TextLine::Section(title) => {
                rendered.push_str(&format!("\n{title}\n{}\n", "-".repeat(title.chars().count())));
            }
            TextLine::Note(text) => {
                for wrapped in wrap(text, NOTE_WIDTH - NOTE_INDENT.len()) {
                    rendered.push_str(&format!("{NOTE_INDENT}{wrapped}\n"));
                }
            }
        }
    }
    rendered
}

/// Break `text` into lines of at most `width` characters at whitespace.
///
/// Words longer than `width` get a line of their own.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let line_width = line.chars().count();
        if line_width != 0 && line_width + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_at_word_boundaries() {
        assert_eq!(wrap("a bb ccc dddd", 6), ["a bb", "ccc", "dddd"]);
        assert_eq!(wrap("  spaced   out  ", 80), ["spaced out"]);
        assert_eq!(wrap("overlong word", 4), ["overlong", "word"]);
        assert!(wrap("", 10).is_empty());
    }

    #[test]
    fn text_columns_align() {
        let lines = [
            TextLine::Header(vec!["Addr", "Name", "Value"]),
            TextLine::Row(vec!["2".into(), "T1S".into(), "7708 (Zone1=28, Zone2=30)".into()]),
            TextLine::Note("Packed.".into()),
            TextLine::Section("Totals".into()),
            TextLine::Row(vec!["143/144".into(), "Energy".into(), "1311.00 kWh".into()]),
        ];
        let rendered = render_text(&lines);
        let expected = "\
Addr     Name    Value
------------------------------------------
2        T1S     7708 (Zone1=28, Zone2=30)
        Packed.

Totals
------
143/144  Energy  1311.00 kWh
";
        assert_eq!(rendered, expected);
    }
}
