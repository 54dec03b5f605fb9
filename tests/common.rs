//! Shared fixtures: a small in-memory workbook laid out like the production sheet.
#![allow(dead_code)]

use std::sync::Arc;

use pricebot::catalog::{Catalog, WorksheetNames};
use pricebot::sheets::{MemorySheets, Rows};

pub fn rows(data: &[&[&str]]) -> Rows {
    data.iter()
        .map(|row| row.iter().map(|c| c.to_string()).collect())
        .collect()
}

/// Calculations row with only the given (column, value) cells filled.
pub fn sparse_row(cells: &[(usize, &str)]) -> Vec<String> {
    let width = cells.iter().map(|(c, _)| c + 1).max().unwrap_or(0);
    let mut row = vec![String::new(); width];
    for (col, value) in cells {
        row[*col] = value.to_string();
    }
    row
}

pub fn item_rows() -> Rows {
    rows(&[
        &["Name", "Preis", "Marge"],
        &["Holz", "5", "0%"],
        &["Eisenbarren", "125,00 €", "25%"],
        &["Eisenerz", "1.000", "25 %"],
        &["Brett", "12,50 €", "7,5%"],
        &["Schiff", "10.000,00 €", "20%"],
        &["Kaputt", "abc", "xyz"],
        &["Fluch", "100", "-100%"],
    ])
}

pub fn recipe_rows() -> Rows {
    vec![
        vec!["Einfach".to_string()],
        sparse_row(&[
            (0, "Brett"),
            (1, "Holz"),
            (2, "2"),
            (3, ""),
            (4, "5"),
            (5, "Nagel"),
            (6, "4"),
            (9, "3"),
            (11, "Werkbank"),
            (12, "Brett"),
            (13, "6"),
        ]),
        sparse_row(&[
            (23, "Schiff"),
            (24, "Brett"),
            (25, "40"),
            (26, "Segel"),
            (27, "2"),
            (40, "Anker"),
            (41, "1"),
        ]),
    ]
}

pub fn workbook() -> MemorySheets {
    let names = WorksheetNames::default();
    MemorySheets::new()
        .with_worksheet(&names.items, item_rows())
        .with_worksheet(
            &names.price_suggestions,
            rows(&[&["Zeitpunkt", "Item", "Alter Preis", "Neuer Preis", "Von"]]),
        )
        .with_worksheet(
            &names.item_suggestions,
            rows(&[
                &["Zeitpunkt", "Item", "Von"],
                &["2024-05-01 10:00:00", "Drachenschuppe", "carol"],
            ]),
        )
        .with_worksheet(&names.recipes, recipe_rows())
}

pub fn catalog() -> Arc<Catalog<MemorySheets>> {
    Arc::new(Catalog::new(workbook(), WorksheetNames::default()))
}
