/// Data layer: core types, loading, parsing, analysis and the session.
///
/// Architecture:
/// ```text
///  .csv / .txt (curve tracer export)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read bytes → UTF-8 text (parallel per batch)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  parser   │  rows → Vec<Sample> + irradiance / temperature
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ analysis  │  Vec<Sample> → Curve (Voc, Isc, MPP, STC MPP)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  session  │  source name → Curve, selected curve
///   └──────────┘
/// ```

pub mod analysis;
pub mod loader;
pub mod model;
pub mod parser;
pub mod session;
