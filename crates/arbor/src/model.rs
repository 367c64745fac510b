//! Input records and the node/edge labels stored in the layout graph.

use arbor_graph::NodeIx;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordinal tech level. Higher levels are laid out further right.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TechLevel(pub u32);

impl fmt::Display for TechLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One prerequisite record as handed over by a data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Definition {
    pub id: String,
    #[serde(default, alias = "prerequisite_ids", alias = "prerequisiteIds")]
    pub prerequisites: Vec<String>,
    #[serde(default, alias = "tech_level")]
    pub tech_level: TechLevel,
    #[serde(default)]
    pub cost: f64,
}

impl Definition {
    pub fn new(id: impl Into<String>, tech_level: u32) -> Self {
        Self {
            id: id.into(),
            prerequisites: Vec::new(),
            tech_level: TechLevel(tech_level),
            cost: 0.0,
        }
    }

    pub fn with_prerequisites<I, S>(mut self, prerequisites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prerequisites = prerequisites.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = cost;
        self
    }

    /// Parses a JSON array of records.
    pub fn list_from_json(json: &str) -> crate::Result<Vec<Self>> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContentNode {
    pub id: String,
    pub tech_level: TechLevel,
    pub cost: f64,
    /// Direct prerequisites in listed order; a repeated id stays repeated. Repaired in place by the
    /// consistency checker.
    pub prerequisites: Vec<NodeIx>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Content(ContentNode),
    /// Carries a long edge through an intermediate layer.
    Routing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub kind: NodeKind,
    /// Layer, `>= 1` once layering ran; `0` means unassigned.
    pub x: i32,
    /// Fractional row. The integer row is its truncation.
    pub yf: f64,
}

impl LayoutNode {
    pub fn content(node: ContentNode) -> Self {
        Self {
            kind: NodeKind::Content(node),
            x: 0,
            yf: 1.0,
        }
    }

    pub fn routing(x: i32, yf: f64) -> Self {
        Self {
            kind: NodeKind::Routing,
            x,
            yf,
        }
    }

    pub fn y(&self) -> i32 {
        self.yf as i32
    }

    pub fn set_y(&mut self, y: i32) {
        self.yf = f64::from(y);
    }

    pub fn is_routing(&self) -> bool {
        matches!(self.kind, NodeKind::Routing)
    }

    pub fn as_content(&self) -> Option<&ContentNode> {
        match &self.kind {
            NodeKind::Content(c) => Some(c),
            NodeKind::Routing => None,
        }
    }

    pub fn as_content_mut(&mut self) -> Option<&mut ContentNode> {
        match &mut self.kind {
            NodeKind::Content(c) => Some(c),
            NodeKind::Routing => None,
        }
    }
}

/// Label of a layout edge: the content nodes of the prerequisite link it belongs to. A link
/// split into a routing chain keeps the same `source`/`target` on every segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutEdge {
    pub source: NodeIx,
    pub target: NodeIx,
}
