//! Weighted adjacency between pay tiers and experience values
//!
//! Every row of the input contributes one unit of weight to the edge
//! `"Tier {tier}" -> "{years} years"`. The grouped view lists, for each tier,
//! its destinations ordered by count.

use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::dataset::{Dataset, DatasetError, FieldPair};

/// Prefix shared by every source label
pub const SOURCE_LABEL_PREFIX: &str = "Tier ";

/// Suffix shared by every destination label
pub const DESTINATION_LABEL_SUFFIX: &str = " years";

/// Label for a pay tier vertex
pub fn source_label(value: &str) -> String {
    format!("{}{}", SOURCE_LABEL_PREFIX, value)
}

/// Label for an experience vertex
pub fn destination_label(value: &str) -> String {
    format!("{}{}", value, DESTINATION_LABEL_SUFFIX)
}

/// Two-level ordered map: source label -> destination label -> count.
///
/// Iteration follows first-insertion order at both levels.
#[derive(Debug, Clone, Default)]
pub struct AdjacencyGraph {
    adj_list: IndexMap<String, IndexMap<String, u64>>,
    vertices: IndexSet<String>,
}

/// A destination and the number of records pointing at it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Neighbor {
    pub destination: String,
    pub count: u64,
}

/// One source vertex with its sorted neighbors
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceGroup {
    pub source: String,
    pub neighbors: Vec<Neighbor>,
}

/// Read-only projection of an [`AdjacencyGraph`] for display
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupedView {
    pub groups: Vec<SourceGroup>,
}

impl GroupedView {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, source: &str) -> Option<&[Neighbor]> {
        self.groups
            .iter()
            .find(|g| g.source == source)
            .map(|g| g.neighbors.as_slice())
    }
}

impl AdjacencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `weight` to the edge `source -> destination`
    pub fn add_edge(&mut self, source: &str, destination: &str, weight: u64) {
        if weight == 0 {
            return;
        }
        self.vertices.insert(source.to_string());
        *self
            .adj_list
            .entry(source.to_string())
            .or_default()
            .entry(destination.to_string())
            .or_insert(0) += weight;
    }

    pub fn weight(&self, source: &str, destination: &str) -> Option<u64> {
        self.adj_list.get(source)?.get(destination).copied()
    }

    pub fn neighbors(&self, source: &str) -> Option<&IndexMap<String, u64>> {
        self.adj_list.get(source)
    }

    /// Vertices that have at least one outgoing edge
    pub fn vertices(&self) -> impl Iterator<Item = &str> {
        self.vertices.iter().map(String::as_str)
    }

    pub fn edge_count(&self) -> usize {
        self.adj_list.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.adj_list.is_empty()
    }

    /// Build from every well-formed row of `dataset`.
    ///
    /// Rows with a blank or missing value are skipped. A row that fails to
    /// parse makes the whole input unavailable; no partial graph is returned.
    pub fn from_dataset(dataset: &Dataset, fields: &FieldPair) -> Result<Self, DatasetError> {
        let relationships = dataset.relationships(fields)?;
        if let Some(column) = relationships.missing_column() {
            tracing::debug!(column, "column absent, no edges will be counted");
        }

        let mut graph = Self::new();
        let mut skipped = 0usize;

        for item in relationships {
            match item {
                Ok(Some(record)) => {
                    graph.add_edge(
                        &source_label(&record.source),
                        &destination_label(&record.destination),
                        1,
                    );
                }
                Ok(None) => skipped += 1,
                Err(e) => {
                    tracing::debug!(error = %e, "unreadable row, input unavailable");
                    return Err(e);
                }
            }
        }

        tracing::debug!(
            edges = graph.edge_count(),
            skipped,
            "built adjacency graph"
        );
        Ok(graph)
    }

    /// Sorted neighbor lists for every pay tier vertex.
    ///
    /// Counts are non-increasing; equal counts keep first-appearance order.
    pub fn grouped_adjacencies(&self) -> GroupedView {
        let groups = self
            .adj_list
            .iter()
            .filter(|(source, _)| source.starts_with(SOURCE_LABEL_PREFIX))
            .map(|(source, neighbors)| {
                let mut neighbors: Vec<Neighbor> = neighbors
                    .iter()
                    .map(|(destination, &count)| Neighbor {
                        destination: destination.clone(),
                        count,
                    })
                    .collect();
                // stable
                neighbors.sort_by(|a, b| b.count.cmp(&a.count));
                SourceGroup {
                    source: source.clone(),
                    neighbors,
                }
            })
            .collect();

        GroupedView { groups }
    }
}

/// Read `path` and build its adjacency graph.
///
/// `Err` means the input is unavailable (missing file, or a header or row
/// that fails to parse); no partial graph is returned in that case.
pub fn build_graph(path: &Path, fields: &FieldPair) -> Result<AdjacencyGraph, DatasetError> {
    let dataset = Dataset::open(path)?;
    AdjacencyGraph::from_dataset(&dataset, fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "PaymentTier,ExperienceInCurrentDomain\n1,2\n1,2\n1,5\n2,2\n";

    fn sample_graph() -> AdjacencyGraph {
        AdjacencyGraph::from_dataset(&Dataset::from_bytes(SAMPLE), &FieldPair::default()).unwrap()
    }

    #[test]
    fn test_labels() {
        assert_eq!(source_label("3"), "Tier 3");
        assert_eq!(destination_label("7"), "7 years");
    }

    #[test]
    fn test_counts_equal_record_multiplicity() {
        let graph = sample_graph();

        assert_eq!(graph.weight("Tier 1", "2 years"), Some(2));
        assert_eq!(graph.weight("Tier 1", "5 years"), Some(1));
        assert_eq!(graph.weight("Tier 2", "2 years"), Some(1));
        assert_eq!(graph.weight("Tier 2", "5 years"), None);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.vertices().collect::<Vec<_>>(), vec!["Tier 1", "Tier 2"]);
    }

    #[test]
    fn test_blank_rows_do_not_change_structure() {
        let with_blanks = format!("{}, 4\n3,\n  ,  \n9\n", SAMPLE);
        let graph =
            AdjacencyGraph::from_dataset(&Dataset::from_bytes(with_blanks), &FieldPair::default())
                .unwrap();

        assert_eq!(graph.edge_count(), sample_graph().edge_count());
        assert!(graph.neighbors("Tier 3").is_none());
        assert!(graph.neighbors("Tier 9").is_none());
    }

    #[test]
    fn test_missing_column_gives_empty_graph() {
        let dataset = Dataset::from_bytes("PaymentTier,Age\n1,30\n2,40\n");
        let graph = AdjacencyGraph::from_dataset(&dataset, &FieldPair::default()).unwrap();
        assert!(graph.is_empty());
        assert!(graph.grouped_adjacencies().is_empty());
    }

    #[test]
    fn test_unreadable_row_makes_input_unavailable() {
        let mut bytes = SAMPLE.as_bytes().to_vec();
        bytes.extend_from_slice(&[b'1', b',', 0xff, b'\n']);
        let result =
            AdjacencyGraph::from_dataset(&Dataset::from_bytes(bytes), &FieldPair::default());
        assert!(matches!(result, Err(DatasetError::Csv(_))));
    }

    #[test]
    fn test_grouped_view_sorted_descending() {
        let view = sample_graph().grouped_adjacencies();

        assert_eq!(
            view.get("Tier 1").unwrap(),
            &[
                Neighbor {
                    destination: "2 years".to_string(),
                    count: 2
                },
                Neighbor {
                    destination: "5 years".to_string(),
                    count: 1
                },
            ]
        );
        assert_eq!(view.get("Tier 2").unwrap().len(), 1);
    }

    #[test]
    fn test_grouped_view_ties_keep_first_appearance() {
        let dataset = Dataset::from_bytes(
            "PaymentTier,ExperienceInCurrentDomain\n3,7\n3,1\n3,4\n3,1\n3,7\n",
        );
        let view = AdjacencyGraph::from_dataset(&dataset, &FieldPair::default())
            .unwrap()
            .grouped_adjacencies();

        let order: Vec<&str> = view
            .get("Tier 3")
            .unwrap()
            .iter()
            .map(|n| n.destination.as_str())
            .collect();
        assert_eq!(order, vec!["7 years", "1 years", "4 years"]);
    }

    #[test]
    fn test_grouped_view_matches_structure() {
        let graph = sample_graph();
        let view = graph.grouped_adjacencies();

        for group in &view.groups {
            let neighbors = graph.neighbors(&group.source).unwrap();
            assert_eq!(group.neighbors.len(), neighbors.len());
            for n in &group.neighbors {
                assert_eq!(neighbors.get(&n.destination), Some(&n.count));
            }
            assert!(group.neighbors.windows(2).all(|w| w[0].count >= w[1].count));
        }
    }

    #[test]
    fn test_grouped_view_only_includes_tier_sources() {
        let mut graph = sample_graph();
        graph.add_edge("2 years", "Tier 1", 4);

        let view = graph.grouped_adjacencies();
        assert!(view.get("2 years").is_none());
        assert!(view.groups.iter().all(|g| g.source.starts_with("Tier ")));
        assert_eq!(view.groups.len(), 2);
    }

    #[test]
    fn test_add_edge_accumulates() {
        let mut graph = AdjacencyGraph::new();
        graph.add_edge("Tier 1", "3 years", 2);
        graph.add_edge("Tier 1", "3 years", 3);
        graph.add_edge("Tier 1", "4 years", 0);

        assert_eq!(graph.weight("Tier 1", "3 years"), Some(5));
        assert_eq!(graph.weight("Tier 1", "4 years"), None);
    }

    #[test]
    fn test_build_graph_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = build_graph(&dir.path().join("missing.csv"), &FieldPair::default());
        assert!(result.unwrap_err().is_not_found());
    }

    #[test]
    fn test_rebuild_is_deterministic() {
        assert_eq!(
            sample_graph().grouped_adjacencies(),
            sample_graph().grouped_adjacencies()
        );
    }
}
