//! Deterministic synthetic series for the site's charts.
//!
//! Pipeline: seeded source -> regime-driven walk -> endpoint rescaling ->
//! assembly onto a labelled time axis.

pub mod assembly;
pub mod chart;
pub mod labels;
pub mod random;
pub mod regime;
pub mod rescale;
pub mod stats;
pub mod walk;

pub use assembly::{NamedSeries, SeriesPoint, assemble};
pub use chart::{Chart, ChartSpec, GeneratedSeries, SeriesSpec};
pub use labels::{StepUnit, TimeLabel, generate_labels};
pub use random::{Mulberry32, ParkMiller, RandomScheme, UniformSource};
pub use regime::{NoiseModel, RegimeEntry, RegimeSchedule, RegimeSpan, RegimeTable, Shock};
pub use rescale::{FlatPathPolicy, RescaledPath, rescale};
pub use walk::{BASELINE, RawPath, WalkParams, walk};
