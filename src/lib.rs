pub mod bind;
pub mod chart;
pub mod config;
pub mod dataset;
pub mod fetch;
pub mod pages;
pub mod telemetry;

pub use bind::{recompute, Binder, GraphHost, Selection};
pub use chart::ChartSpec;
pub use config::Config;
pub use dataset::{PermitRecord, PermitTable};
pub use pages::{Block, Page};
