use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Cell, Row, Table, Widget};
use rust_decimal::Decimal;

use crate::products::Product;

const HEADERS: [&str; 8] = [
    "#", "Title", "Price", "Taxes", "Ads", "Discount", "Total", "Category",
];

/// One rendered line of the products table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRow {
    pub number: usize,
    pub title: String,
    pub price: Decimal,
    pub taxes: Decimal,
    pub ads: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub category: String,
}

impl ProductRow {
    pub fn new(index: usize, product: &Product) -> Self {
        Self {
            number: index + 1,
            title: product.title.clone(),
            price: product.price,
            taxes: product.taxes,
            ads: product.ads,
            discount: product.discount,
            total: product.total,
            category: product.category.clone(),
        }
    }

    fn cells(&self, currency: char) -> [String; 8] {
        let amount = |d: Decimal| format!("{:.2}{}", d, currency);
        [
            self.number.to_string(),
            self.title.clone(),
            amount(self.price),
            amount(self.taxes),
            amount(self.ads),
            amount(self.discount),
            amount(self.total),
            self.category.clone(),
        ]
    }
}

pub fn rows(positions: &[(usize, &Product)]) -> Vec<ProductRow> {
    positions
        .iter()
        .map(|&(index, product)| ProductRow::new(index, product))
        .collect()
}

/// Label of the delete-all control, hidden when there is nothing to delete.
pub fn delete_all_label(len: usize) -> Option<String> {
    (len > 0).then(|| format!("Delete All ({len})"))
}

const COLUMN_SPACING: u16 = 1;

fn is_left_aligned(col: usize) -> bool {
    col == 1 || col == 7
}

fn text_width(s: &str) -> u16 {
    u16::try_from(s.chars().count()).unwrap_or(u16::MAX)
}

fn cell(col: usize, text: &str) -> Cell<'_> {
    if is_left_aligned(col) {
        Cell::from(text)
    } else {
        Cell::from(Line::from(text).alignment(Alignment::Right))
    }
}

/// Draws the rows into an off-screen buffer and returns its text, one line per row.
pub fn render_table(rows: &[ProductRow], currency: char) -> String {
    let cells: Vec<[String; 8]> = rows.iter().map(|row| row.cells(currency)).collect();
    let mut widths = HEADERS.map(text_width);
    for row in &cells {
        for (col, text) in row.iter().enumerate() {
            widths[col] = widths[col].max(text_width(text));
        }
    }
    let width = widths
        .iter()
        .fold(COLUMN_SPACING * (HEADERS.len() as u16 - 1), |acc, &w| {
            acc.saturating_add(w)
        })
        .max(1);
    let constraints = widths.map(Constraint::Length);
    let header = Row::new(HEADERS).style(Style::new().add_modifier(Modifier::BOLD));

    // a buffer holds at most u16::MAX cells, so long lists are drawn in pages
    let per_page = (usize::from(u16::MAX) / usize::from(width))
        .saturating_sub(1)
        .max(1);
    let empty: &[[String; 8]] = &[];
    let pages: Vec<&[[String; 8]]> = if cells.is_empty() {
        vec![empty]
    } else {
        cells.chunks(per_page).collect()
    };

    let mut lines = Vec::with_capacity(cells.len() + 1);
    for (i, page) in pages.into_iter().enumerate() {
        let body = page
            .iter()
            .map(|row| Row::new(row.iter().enumerate().map(|(col, text)| cell(col, text))));
        let mut table = Table::new(body, constraints).column_spacing(COLUMN_SPACING);
        let mut height = page.len() as u16;
        if i == 0 {
            table = table.header(header.clone());
            height += 1;
        }
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        Widget::render(table, area, &mut buf);
        lines.extend(buf.content.chunks(usize::from(width)).map(|line| {
            line.iter()
                .map(|c| c.symbol())
                .collect::<String>()
                .trim_end()
                .to_string()
        }));
    }
    lines.join("\n")
}
