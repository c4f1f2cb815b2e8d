//! Test fixtures: real xlsx bytes authored in memory

use rust_xlsxwriter::{Format, Workbook};

pub struct SheetFixture {
    name: String,
    rows: Vec<Vec<String>>,
    merges: Vec<((u32, u16), (u32, u16))>,
}

impl SheetFixture {
    pub fn new<R: AsRef<[&'static str]>>(name: &str, rows: &[R]) -> Self {
        Self {
            name: name.to_string(),
            rows: rows
                .iter()
                .map(|row| row.as_ref().iter().map(|v| v.to_string()).collect())
                .collect(),
            merges: Vec::new(),
        }
    }

    pub fn with_merge(mut self, start: (u32, u16), end: (u32, u16)) -> Self {
        self.merges.push((start, end));
        self
    }

    fn in_merge(&self, row: u32, col: u16) -> bool {
        self.merges
            .iter()
            .any(|(s, e)| row >= s.0 && row <= e.0 && col >= s.1 && col <= e.1)
    }

    fn value(&self, row: u32, col: u16) -> &str {
        self.rows
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .map(String::as_str)
            .unwrap_or("")
    }
}

pub fn xlsx_bytes(sheets: &[SheetFixture]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let format = Format::new();

    for fixture in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(fixture.name.as_str()).unwrap();

        for (r, row) in fixture.rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                let (r, c) = (r as u32, c as u16);
                if value.is_empty() || fixture.in_merge(r, c) {
                    continue;
                }
                worksheet.write_string(r, c, value.as_str()).unwrap();
            }
        }

        for (start, end) in &fixture.merges {
            let anchor = fixture.value(start.0, start.1);
            worksheet
                .merge_range(start.0, start.1, end.0, end.1, anchor, &format)
                .unwrap();
        }
    }

    workbook.save_to_buffer().unwrap()
}
