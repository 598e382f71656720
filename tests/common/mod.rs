#![allow(dead_code)]

use rust_xlsxwriter::Workbook;

pub enum Cell<'a> {
    S(&'a str),
    N(f64),
    B(bool),
    Blank,
}

/// Writes the grid into the first sheet of a fresh workbook.
pub fn workbook_bytes(grid: &[Vec<Cell>]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (r, row) in grid.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let (r, c) = (r as u32, c as u16);
            match cell {
                Cell::S(s) => {
                    worksheet.write_string(r, c, *s).unwrap();
                }
                Cell::N(n) => {
                    worksheet.write_number(r, c, *n).unwrap();
                }
                Cell::B(b) => {
                    worksheet.write_boolean(r, c, *b).unwrap();
                }
                Cell::Blank => {}
            }
        }
    }

    workbook.save_to_buffer().unwrap()
}

pub fn sales_workbook() -> Vec<u8> {
    use Cell::*;
    workbook_bytes(&[
        vec![S("Category"), S("Amount")],
        vec![S("A"), N(10.0)],
        vec![S("B"), N(20.0)],
        vec![S("C"), N(30.0)],
    ])
}
