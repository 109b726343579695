pub mod classify;
pub mod config;

use colored::Colorize;
use comfy_table::{Table, presets::UTF8_FULL};

/// Render rows as a UTF-8 table
pub fn print_table(columns: &[&str], rows: &[Vec<String>]) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(columns.to_vec());

    for row in rows {
        table.add_row(row.clone());
    }

    println!("{table}");
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}
