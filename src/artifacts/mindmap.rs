//! Mind-map builder
//!
//! Turns an ordered concept list into a three-tier tree rooted at node `"0"`.
//! The first concept is the core, the next (up to three) are categories, and
//! the rest are subconcepts assigned to categories round-robin.

use crate::error::{Error, Result};
use serde::Serialize;

/// Node colors, indexed by node position
pub const PALETTE: [&str; 7] = [
    "#8b5cf6", "#ec4899", "#f59e0b", "#10b981", "#3b82f6", "#ef4444", "#06b6d4",
];

/// Upper bound on category nodes
pub const MAX_CATEGORIES: usize = 3;

const CORE_ANCHOR: Position = Position { x: 400.0, y: 50.0 };
const CATEGORY_X: f64 = 200.0;
const CATEGORY_Y: f64 = 200.0;
const SUBCONCEPT_X: f64 = 150.0;
const SUBCONCEPT_Y: f64 = 350.0;
const COLUMN_SPACING: f64 = 300.0;
const SUBCONCEPT_SPACING: f64 = 150.0;

/// Depth level in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Core,
    Category,
    Subconcept,
}

impl Tier {
    fn description(self) -> &'static str {
        match self {
            Tier::Core => "Main Topic",
            Tier::Category => "Key Concept",
            Tier::Subconcept => "Detail",
        }
    }

    fn badge(self) -> &'static str {
        match self {
            Tier::Core => "Core",
            Tier::Category => "Category",
            Tier::Subconcept => "Subconcept",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MindMapNode {
    pub id: String,
    pub label: String,
    pub tier: Tier,
    pub color: &'static str,
    pub parent_id: Option<String>,
    pub position: Position,
    pub description: &'static str,
    pub badge: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStyle {
    Solid,
    Dashed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MindMapEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub style: EdgeStyle,
    pub animated: bool,
}

/// Node/edge graph ready for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MindMap {
    pub nodes: Vec<MindMapNode>,
    pub edges: Vec<MindMapEdge>,
}

impl MindMap {
    /// Look up a node by id
    pub fn node(&self, id: &str) -> Option<&MindMapNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Nodes of one tier, in id order
    pub fn tier(&self, tier: Tier) -> impl Iterator<Item = &MindMapNode> {
        self.nodes.iter().filter(move |n| n.tier == tier)
    }

    /// Children of a node
    pub fn children<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a MindMapNode> {
        self.nodes
            .iter()
            .filter(move |n| n.parent_id.as_deref() == Some(id))
    }
}

fn node(
    index: usize,
    label: &str,
    tier: Tier,
    parent: Option<usize>,
    position: Position,
) -> MindMapNode {
    MindMapNode {
        id: index.to_string(),
        label: label.to_string(),
        tier,
        color: PALETTE[index % PALETTE.len()],
        parent_id: parent.map(|p| p.to_string()),
        position,
        description: tier.description(),
        badge: tier.badge(),
    }
}

fn edge(parent: usize, child: usize, style: EdgeStyle) -> MindMapEdge {
    MindMapEdge {
        id: format!("e{}-{}", parent, child),
        source: parent.to_string(),
        target: child.to_string(),
        style,
        animated: style == EdgeStyle::Solid,
    }
}

/// Lay out concepts as a core/category/subconcept tree
pub fn build_mind_map(concepts: &[String]) -> Result<MindMap> {
    let Some((core, rest)) = concepts.split_first() else {
        return Err(Error::NoConceptsFound);
    };

    let categories = rest.len().min(MAX_CATEGORIES);
    let (category_labels, subconcept_labels) = rest.split_at(categories);

    let mut nodes = Vec::with_capacity(concepts.len());
    let mut edges = Vec::with_capacity(concepts.len().saturating_sub(1));

    nodes.push(node(0, core, Tier::Core, None, CORE_ANCHOR));

    for (i, label) in category_labels.iter().enumerate() {
        let id = i + 1;
        let position = Position {
            x: CATEGORY_X + i as f64 * COLUMN_SPACING,
            y: CATEGORY_Y,
        };
        nodes.push(node(id, label, Tier::Category, Some(0), position));
        edges.push(edge(0, id, EdgeStyle::Solid));
    }

    for (i, label) in subconcept_labels.iter().enumerate() {
        let id = categories + i + 1;
        let column = i % categories;
        let parent = column + 1;
        let position = Position {
            x: SUBCONCEPT_X
                + column as f64 * COLUMN_SPACING
                + (i as f64 / categories as f64) * SUBCONCEPT_SPACING,
            y: SUBCONCEPT_Y,
        };
        nodes.push(node(id, label, Tier::Subconcept, Some(parent), position));
        edges.push(edge(parent, id, EdgeStyle::Dashed));
    }

    tracing::debug!(nodes = nodes.len(), categories, "Built mind map");
    Ok(MindMap { nodes, edges })
}
