use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use crossterm::style::Stylize;

use entry_archive::data::paginator::Page;
use entry_archive::data::record::Record;
use entry_archive::data::summary::{MonthlyCount, RecordSetSummary};
use entry_archive::data::timestamp::format_timestamp;

pub struct DisplayOptions {
    pub show_row_numbers: bool,
    pub body_preview_chars: usize,
}

fn header(names: &[&str]) -> Vec<Cell> {
    names
        .iter()
        .map(|name| Cell::new(name).add_attribute(Attribute::Bold))
        .collect()
}

/// Collapse whitespace and cut to `max_chars` (0 = keep everything)
pub fn preview(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if max_chars == 0 || flat.chars().count() <= max_chars {
        return flat;
    }

    let mut cut: String = flat.chars().take(max_chars.saturating_sub(1)).collect();
    cut.push('~');
    cut
}

pub fn display_page(page: &Page<Record>, options: &DisplayOptions) {
    if page.is_empty() {
        println!("{}", "No entries match.".yellow());
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let mut columns = Vec::with_capacity(6);
    if options.show_row_numbers {
        columns.push("#");
    }
    columns.extend(["Date", "Score", "Title", "Entry", "Deleted"]);
    table.set_header(header(&columns));

    for (offset, record) in page.entries.iter().enumerate() {
        let mut row = Vec::with_capacity(columns.len());
        if options.show_row_numbers {
            row.push(
                Cell::new(page.first_entry_number() + offset).set_alignment(CellAlignment::Right),
            );
        }
        row.push(Cell::new(format_timestamp(&record.timestamp)));
        row.push(Cell::new(record.score).set_alignment(CellAlignment::Right));
        row.push(Cell::new(&record.title));
        row.push(Cell::new(preview(&record.body, options.body_preview_chars)));
        row.push(if record.deleted {
            Cell::new("yes").fg(Color::Red)
        } else {
            Cell::new("no")
        });
        table.add_row(row);
    }

    println!("{table}");
}

pub fn status_line(page: &Page<Record>, rejected: usize) -> String {
    let last_entry = if page.is_empty() {
        0
    } else {
        page.first_entry_number() + page.entries.len() - 1
    };

    let mut line = format!(
        "Page {}/{} | entries {}-{} of {}",
        page.page_number,
        page.total_pages,
        page.first_entry_number(),
        last_entry,
        page.total_entries
    );
    if rejected > 0 {
        line.push_str(&format!(" | {} row(s) rejected on load", rejected));
    }
    line
}

pub fn display_summary(summary: &RecordSetSummary, monthly: &[MonthlyCount], top: &[&Record]) {
    let mut table = Table::new();
    table.set_header(header(&["Archive", ""]));
    table.add_row(vec!["Entries".to_string(), summary.total.to_string()]);
    table.add_row(vec!["Deleted".to_string(), summary.deleted.to_string()]);
    if let Some((lo, hi)) = summary.score_bounds {
        table.add_row(vec!["Scores".to_string(), format!("{} .. {}", lo, hi)]);
    }
    if let Some((first, last)) = summary.timestamp_bounds {
        table.add_row(vec![
            "Dates".to_string(),
            format!("{} .. {}", format_timestamp(&first), format_timestamp(&last)),
        ]);
    }
    println!("{table}");

    if !monthly.is_empty() {
        let mut table = Table::new();
        table.set_header(header(&["Month", "Entries"]));
        for bucket in monthly {
            table.add_row(vec![
                Cell::new(format!("{:04}-{:02}", bucket.year, bucket.month)),
                Cell::new(bucket.count).set_alignment(CellAlignment::Right),
            ]);
        }
        println!("\n{table}");
    }

    if !top.is_empty() {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(header(&["Score", "Title", "Date"]));
        for record in top {
            table.add_row(vec![
                Cell::new(record.score).set_alignment(CellAlignment::Right),
                Cell::new(&record.title),
                Cell::new(format_timestamp(&record.timestamp)),
            ]);
        }
        println!("\n{table}");
    }
}
