use crate::data::dataset::{row_from, Row, Sheet, Workbook};

pub const EXAMPLE_SHEET: &str = "Example Data";
pub const EXAMPLE_TITLE: &str = "Gaussian Ripple Example Data";

const GRID_SIZE: usize = 35;
/// Half-width of the sampled square, before scaling.
const RANGE: f64 = 4.0;
const SCALE: f64 = 1000.0;

/// Workbook shown before the user loads their own data: a Gaussian-damped
/// cosine ripple sampled on a square grid.
pub fn example_workbook() -> Workbook {
    let mut rows: Vec<Row> = Vec::with_capacity(GRID_SIZE * GRID_SIZE);
    let last = (GRID_SIZE - 1) as f64;

    for i in 0..GRID_SIZE {
        for j in 0..GRID_SIZE {
            let x = ((i as f64 / last) * 2.0 * RANGE - RANGE) * SCALE;
            let y = ((j as f64 / last) * 2.0 * RANGE - RANGE) * SCALE;
            let r = (x * x + y * y).sqrt();
            let z = (r / SCALE * 1.5).cos() * (-r * r / (SCALE * SCALE * 8.0)).exp() * SCALE;

            rows.push(row_from([
                ("X", x),
                ("Y", y),
                ("Z", z),
                ("Radius", r),
                ("Amplitude", z),
            ]));
        }
    }

    let columns = ["X", "Y", "Z", "Radius", "Amplitude"]
        .iter()
        .map(|c| c.to_string())
        .collect();
    Workbook::new(vec![Sheet::new(EXAMPLE_SHEET, columns, rows)])
}
