//! Text table of lifecycle records

use chrono::NaiveDate;
use crossterm::style::Stylize;

use crate::lifecycle::dates::{parse_lifecycle_date, today};
use crate::lifecycle::product::Products;
use crate::output::Column;

/// Builds a table whose columns are the known fields present in any record
pub struct TableBuilder {
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
    today: NaiveDate,
}

impl TableBuilder {
    pub fn new(products: &Products) -> Self {
        let mut columns: Vec<Column> = Column::ALL
            .into_iter()
            .filter(|column| products.iter().any(|product| column.is_filled(product)))
            .collect();
        columns.sort_by_key(|column| column.name());

        let rows = products
            .iter()
            .map(|product| columns.iter().map(|column| column.cell(product)).collect())
            .collect();

        Self {
            columns,
            rows,
            today: today(),
        }
    }

    /// Reference day for coloring date cells
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn headers(&self) -> Vec<&'static str> {
        self.columns.iter().map(|column| column.name()).collect()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Render the table; `color` enables ANSI styling of headers and dates
    pub fn render(&self, color: bool) -> String {
        let titles: Vec<String> = self
            .columns
            .iter()
            .map(|column| column.name().to_uppercase())
            .collect();

        let widths: Vec<usize> = titles
            .iter()
            .enumerate()
            .map(|(i, title)| {
                self.rows
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(title.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let border = border_line(&widths);
        let mut out = String::new();

        out.push_str(&border);
        out.push_str(&row_line(&titles, &widths, |_, text| {
            if color {
                text.bold().yellow().to_string()
            } else {
                text.to_string()
            }
        }));
        out.push_str(&border);

        for row in &self.rows {
            out.push_str(&row_line(row, &widths, |i, text| {
                if color && self.columns[i].is_dated() {
                    self.color_date(text)
                } else {
                    text.to_string()
                }
            }));
        }
        out.push_str(&border);

        out
    }

    /// Red when the date has passed, green when it is still ahead
    fn color_date(&self, text: &str) -> String {
        match parse_lifecycle_date(text) {
            Some(date) if date <= self.today => text.red().to_string(),
            Some(_) => text.green().to_string(),
            None => text.to_string(),
        }
    }
}

fn border_line(widths: &[usize]) -> String {
    let mut line = String::from("+");
    for width in widths {
        line.push_str(&"-".repeat(width + 2));
        line.push('+');
    }
    line.push('\n');
    line
}

fn row_line<F>(cells: &[String], widths: &[usize], style: F) -> String
where
    F: Fn(usize, &str) -> String,
{
    let mut line = String::from("|");
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        // Pad on plain text so escape codes never count towards the width
        let padding = width - cell.chars().count();
        let left = padding / 2;
        let right = padding - left;
        line.push(' ');
        line.push_str(&" ".repeat(left));
        line.push_str(&style(i, cell));
        line.push_str(&" ".repeat(right));
        line.push_str(" |");
    }
    line.push('\n');
    line
}
