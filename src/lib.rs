//! # tiergraph - Pay Tier / Experience Relationships
//!
//! Reads an employee CSV and relates two categorical columns, pay tier and
//! years of experience in the current domain, in two independent ways.
//!
//! ## Pipelines
//!
//! 1. **Adjacency list** - every row adds one unit of weight to the edge
//!    `"Tier {tier}" -> "{years} years"`. The grouped view (destinations
//!    sorted by count) is served as an HTML page.
//! 2. **Chart report** - the row-normalized cross-tabulation of the two
//!    columns is drawn as a stacked percentage bar chart (PNG) and wrapped
//!    in a static HTML report.
//!
//! ## Usage
//!
//! ```bash
//! # Serve the adjacency list at http://127.0.0.1:5000/
//! tiergraph serve
//!
//! # Export tier_experience_chart.png + tier_experience_report.html
//! tiergraph chart
//!
//! # Print the grouped view
//! tiergraph list --json
//! ```

pub mod chart;
pub mod config;
pub mod crosstab;
pub mod dataset;
pub mod export;
pub mod graph;
pub mod report;
pub mod web;

pub use chart::{ChartError, render_stacked_bar};
pub use config::{ConfigError, TierGraphConfig, find_config_file, load_config, load_config_file};
pub use crosstab::{CrossTab, CrossTabError};
pub use dataset::{Dataset, DatasetError, FieldPair, RelationshipRecord};
pub use export::{ExportError, ExportPaths, ExportSummary, export_chart_report};
pub use graph::{AdjacencyGraph, GroupedView, Neighbor, SourceGroup, build_graph};
pub use report::{
    generate_chart_report, generate_graph_page, render_chart_report, render_graph_page,
};
