//! RelationGraph — directed ticker → related-ticker adjacency.
//!
//! Materialized by the relationship-discovery collaborator and loaded once
//! per run; read-only during feature computation. Self-relations are dropped
//! on insert. A ticker absent from the map has no known relations.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Adjacency map from a ticker to the set of tickers it is related to.
///
/// The graph is directed: `A → B` does not imply `B → A`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationGraph {
    relations: HashMap<String, BTreeSet<String>>,
}

impl RelationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a directed relation. A self-relation is ignored.
    pub fn add(&mut self, parent: &str, related: &str) {
        if parent == related {
            return;
        }
        self.relations
            .entry(parent.to_string())
            .or_default()
            .insert(related.to_string());
    }

    /// Build a graph from `(parent, related)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        let mut graph = Self::new();
        for (parent, related) in pairs {
            graph.add(parent.as_ref(), related.as_ref());
        }
        graph
    }

    /// The related set for a ticker, if any relation is known.
    pub fn related(&self, ticker: &str) -> Option<&BTreeSet<String>> {
        self.relations.get(ticker)
    }

    /// Number of tickers with at least one outgoing relation.
    pub fn parent_count(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }
}
