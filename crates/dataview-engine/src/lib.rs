//! The DataView filter engine: pure, synchronous projection of an
//! in-memory record collection through search, filter and sort stages,
//! plus saved presets and CSV/JSON export of the result.

pub mod export;
pub mod filter;
pub mod pipeline;
pub mod presets;
pub mod resolve;
pub mod search;
pub mod sort;
pub mod view;

pub use export::{export_as, ExportFormat};
pub use pipeline::project;
pub use presets::PresetStore;
pub use view::{ChangeListener, DataView};
