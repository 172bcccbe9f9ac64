#![no_std]

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// Format revision written into every table file.
pub const TABLE_FORMAT_VERSION: u16 = 1;

/// A persisted EBL table: named sections, each a table of named columns.
///
/// The standard layout has two sections, one holding redshifts with one
/// intensity row per redshift, and one holding the wavelength list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableFile {
    pub version: u16,
    pub sections: Vec<TableSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSection {
    pub name: String,
    pub columns: Vec<TableColumn>,
}

/// A single column. Each table row holds `width` consecutive values of
/// `data`, so `data.len() == rows * width`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableColumn {
    pub name: String,
    pub unit: Option<String>,
    pub width: u32,
    pub data: Vec<f64>,
}

impl TableFile {
    pub fn new(sections: Vec<TableSection>) -> Self {
        TableFile {
            version: TABLE_FORMAT_VERSION,
            sections,
        }
    }

    pub fn section(&self, name: &str) -> Option<&TableSection> {
        self.sections.iter().find(|s| s.name == name)
    }
}

impl TableSection {
    pub fn column(&self, name: &str) -> Option<&TableColumn> {
        self.columns.iter().find(|c| c.name == name)
    }
}

impl TableColumn {
    /// Number of table rows in this column.
    pub fn rows(&self) -> usize {
        match self.width {
            0 => 0,
            w => self.data.len() / w as usize,
        }
    }

    /// Values of row `i`.
    pub fn row(&self, i: usize) -> &[f64] {
        let w = self.width as usize;
        &self.data[i * w..(i + 1) * w]
    }
}
