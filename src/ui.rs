//! Terminal UI utilities.
//!
//! Status/warning helpers used across the crate, the diagnostic line
//! colorizer for streamed tool output, and a small width-aware table for
//! `px list`.

use colored::*;
use regex::Regex;
use std::cmp;
use std::sync::OnceLock;

pub fn status(message: impl AsRef<str>) {
    println!("{} {}", "✓".green(), message.as_ref());
}

pub fn note(message: impl AsRef<str>) {
    println!("{} {}", "·".blue(), message.as_ref());
}

pub fn warn(message: impl AsRef<str>) {
    println!("{} {}", "!".yellow(), message.as_ref());
}

pub fn error(message: impl AsRef<str>) {
    println!("{} {}", "✗".red(), message.as_ref());
}

fn error_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)\berror\b|CMake Error|ninja: error").unwrap())
}

fn warning_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)\bwarning\b|CMake Warning").unwrap())
}

/// Color a line of compiler/CMake output: errors red, warnings yellow,
/// everything else untouched.
pub fn color_diagnostic_line(line: &str) -> String {
    if error_pattern().is_match(line) {
        line.red().to_string()
    } else if warning_pattern().is_match(line) {
        line.yellow().to_string()
    } else {
        line.to_string()
    }
}

/// A terminal-width-aware table with Unicode rules between header and body.
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        if row.len() == self.headers.len() {
            self.rows.push(row);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn print(&self) {
        if self.headers.is_empty() {
            return;
        }

        let (_, term_width) = console::Term::stdout().size();
        let max_width = term_width as usize;

        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = cmp::max(widths[i], cell.chars().count());
            }
        }

        // Shave the widest column until the table fits the terminal.
        let overhead = 2 + 3 * self.headers.len();
        while widths.iter().sum::<usize>() + overhead > max_width {
            let Some((widest, _)) = widths
                .iter()
                .enumerate()
                .max_by_key(|(_, width)| **width)
                .filter(|(_, width)| **width > 8)
            else {
                break;
            };
            widths[widest] -= 1;
        }

        print!("  ");
        for (i, header) in self.headers.iter().enumerate() {
            let text = console::truncate_str(header, widths[i], "...");
            print!("{}{}   ", text.bold(), pad(&text, widths[i]));
        }
        println!();
        print!("  ");
        for width in &widths {
            print!("{}   ", "─".repeat(*width));
        }
        println!();

        for row in &self.rows {
            print!("  ");
            for (i, cell) in row.iter().enumerate() {
                let text = console::truncate_str(cell, widths[i], "...");
                print!("{}{}   ", text, pad(&text, widths[i]));
            }
            println!();
        }
    }
}

fn pad(text: &str, width: usize) -> String {
    " ".repeat(width.saturating_sub(text.chars().count()))
}
