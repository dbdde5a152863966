/// Data layer: table model, ingest, cleaning, charting and export.
///
/// Architecture:
/// ```text
///  .csv / .xlsx bytes
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse bytes → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  store   │  file name → Table (first load wins)
///   └──────────┘
///        │
///        ├──────────────┬──────────────┐
///        ▼              ▼              ▼
///   ┌─────────┐    ┌─────────┐    ┌─────────┐
///   │  clean  │    │  chart  │    │ export  │
///   └─────────┘    └─────────┘    └─────────┘
///   dedup / fill   bar/line/pie   CSV / XLSX bytes
/// ```

pub mod chart;
pub mod clean;
pub mod error;
pub mod export;
pub mod loader;
pub mod model;
pub mod store;
