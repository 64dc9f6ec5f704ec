//! Knowledge graph derived from the pages of a finished crawl.
//!
//! Two edge rules are available. [`GraphMode::DepthAdjacency`] connects every
//! page at depth `d` to every page at depth `d + 1`, whether or not one links
//! to the other, and is the default. [`GraphMode::ParentLinks`]
//! only adds an edge from the page a link was discovered on to the page it
//! led to.

use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use wikigraph_scanner::PageRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphMode {
    #[default]
    DepthAdjacency,
    ParentLinks,
}

impl GraphMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "depth" | "depth-adjacency" => Some(GraphMode::DepthAdjacency),
            "parent" | "parent-links" => Some(GraphMode::ParentLinks),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub depth: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl KnowledgeGraph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges_from<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a GraphEdge> + 'a {
        self.edges.iter().filter(move |e| e.source == id)
    }

    pub fn to_digraph(&self) -> DiGraph<GraphNode, ()> {
        let mut graph = DiGraph::new();
        let mut index: HashMap<&str, NodeIndex> = HashMap::new();

        for node in &self.nodes {
            let idx = graph.add_node(node.clone());
            index.insert(node.id.as_str(), idx);
        }

        for edge in &self.edges {
            if let (Some(&from), Some(&to)) =
                (index.get(edge.source.as_str()), index.get(edge.target.as_str()))
            {
                graph.add_edge(from, to, ());
            }
        }

        graph
    }

    /// Graphviz rendering, nodes labelled with page titles.
    pub fn to_dot(&self) -> String {
        let graph = self.to_digraph().map(|_, node| node.label.clone(), |_, _| "");
        format!("{}", Dot::with_config(&graph, &[Config::EdgeNoLabel]))
    }
}

/// Builds the graph once from the complete list of collected pages.
pub fn build_knowledge_graph(records: &[PageRecord], mode: GraphMode) -> KnowledgeGraph {
    let nodes = records
        .iter()
        .map(|r| GraphNode {
            id: r.url.clone(),
            label: r.title.clone(),
            depth: r.depth,
        })
        .collect();

    let edges = match mode {
        GraphMode::DepthAdjacency => depth_adjacency_edges(records),
        GraphMode::ParentLinks => parent_link_edges(records),
    };

    KnowledgeGraph { nodes, edges }
}

fn depth_adjacency_edges(records: &[PageRecord]) -> Vec<GraphEdge> {
    let mut edges = Vec::new();
    for source in records {
        for target in records {
            if target.depth == source.depth + 1 {
                edges.push(GraphEdge {
                    source: source.url.clone(),
                    target: target.url.clone(),
                });
            }
        }
    }
    edges
}

fn parent_link_edges(records: &[PageRecord]) -> Vec<GraphEdge> {
    let collected: HashSet<&str> = records.iter().map(|r| r.url.as_str()).collect();

    records
        .iter()
        .filter_map(|target| {
            let source = target.source_url.as_deref()?;
            collected.contains(source).then(|| GraphEdge {
                source: source.to_string(),
                target: target.url.clone(),
            })
        })
        .collect()
}
