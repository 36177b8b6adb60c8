pub mod exporter;
pub mod serializer;

pub use exporter::{ExportReport, ExportSettings, Exporter};
