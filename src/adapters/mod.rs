// Adapters layer: concrete implementations for files on disk and image output.

pub mod chart;
pub mod csv_sheet;
mod font;
pub mod ods;
pub mod workbook;

pub use chart::PngDoughnutRenderer;
pub use workbook::WorkbookReader;
