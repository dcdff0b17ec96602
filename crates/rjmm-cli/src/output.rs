use std::io::Write;

use owo_colors::OwoColorize;
use rjmm_core::{ArticleRecord, FormatTag};
use rjmm_parsing::PageText;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print records as JSON: a single object for one record, an array otherwise.
pub fn print_json(w: &mut dyn Write, records: &[ArticleRecord]) -> std::io::Result<()> {
    match records {
        [record] => serde_json::to_writer_pretty(&mut *w, record)?,
        _ => serde_json::to_writer_pretty(&mut *w, records)?,
    }
    writeln!(w)?;
    Ok(())
}

fn label(w: &mut dyn Write, name: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        write!(w, "{:<16}", format!("{name}:").bold())
    } else {
        write!(w, "{:<16}", format!("{name}:"))
    }
}

fn field(w: &mut dyn Write, name: &str, value: &str, color: ColorMode) -> std::io::Result<()> {
    label(w, name, color)?;
    if value.is_empty() {
        if color.enabled() {
            writeln!(w, "{}", "(none)".dimmed())
        } else {
            writeln!(w, "(none)")
        }
    } else {
        writeln!(w, "{value}")
    }
}

/// Print one record as aligned, human-readable fields.
pub fn print_record_text(
    w: &mut dyn Write,
    record: &ArticleRecord,
    color: ColorMode,
) -> std::io::Result<()> {
    if !record.article_file.is_empty() {
        if color.enabled() {
            writeln!(w, "{}", record.article_file.bold().cyan())?;
        } else {
            writeln!(w, "{}", record.article_file)?;
        }
    }

    field(w, "Format", record.format_detected.as_str(), color)?;
    field(w, "Article type", &record.article_type, color)?;
    field(w, "Title", &record.title, color)?;
    field(w, "DOI", &record.doi, color)?;

    label(w, "Authors", color)?;
    writeln!(w, "{}", record.authors.len())?;
    for author in &record.authors {
        let orders = if author.orders.is_empty() {
            String::new()
        } else {
            format!(" [{}]", author.orders)
        };
        let profile = match (author.exists, color.enabled()) {
            (true, true) => format!(" {}", "(profile)".green()),
            (true, false) => " (profile)".to_string(),
            (false, _) => String::new(),
        };
        writeln!(w, "  {}{orders}{profile}", author.name)?;
    }

    label(w, "Affiliations", color)?;
    writeln!(w, "{}", record.affiliations.len())?;
    for affiliation in &record.affiliations {
        writeln!(w, "  {}. {}", affiliation.number, affiliation.institution)?;
    }

    field(w, "Correspondence", &record.correspondence_full, color)?;
    field(w, "E-mail", &record.correspondence_email, color)?;
    field(w, "Academic editor", &record.academic_editor, color)?;
    field(w, "Received", &record.received, color)?;
    field(w, "Revised", &record.revised, color)?;
    field(w, "Accepted", &record.accepted, color)?;
    field(w, "Issue", &record.issue, color)?;
    field(w, "Year", &record.year, color)?;
    field(w, "Keywords", &record.keywords, color)?;
    field(w, "Abstract", &record.abstract_text, color)?;
    writeln!(w)?;
    Ok(())
}

/// `<tag>\t<input>`, one line per classified input.
pub fn print_classification(w: &mut dyn Write, tag: FormatTag, input: &str) -> std::io::Result<()> {
    writeln!(w, "{tag}\t{input}")
}

/// Numbered page lines, as a layout-analysis aid. Numbers are the line
/// indexes the extractors see.
pub fn print_numbered_lines(w: &mut dyn Write, page: &PageText, color: ColorMode) -> std::io::Result<()> {
    for (i, line) in page.lines().iter().enumerate() {
        if color.enabled() {
            writeln!(w, "{} {line}", format!("{i:>4}:").dimmed())?;
        } else {
            writeln!(w, "{i:>4}: {line}")?;
        }
    }
    Ok(())
}

/// Report one failed input.
pub fn print_failure(
    w: &mut dyn Write,
    input: &str,
    error: &dyn std::error::Error,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} {input}: {error}", "error:".red().bold())
    } else {
        writeln!(w, "error: {input}: {error}")
    }
}
