//! The fixed sequence of layout steps.

use crate::config::LayoutOptions;
use crate::error::Result;
use crate::model::Definition;
use crate::tree::Tree;
use crate::{builder, compact, consistency, edges, length, normalize, order, prune, rank};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    BuildNodes,
    CheckPrerequisites,
    CreateEdges,
    AssignLayers,
    NormalizeEdges,
    Collapse,
    MinimizeCrossings,
    MinimizeEdgeLength,
    RemoveEmptyRows,
}

impl Step {
    pub const ALL: [Step; 9] = [
        Step::BuildNodes,
        Step::CheckPrerequisites,
        Step::CreateEdges,
        Step::AssignLayers,
        Step::NormalizeEdges,
        Step::Collapse,
        Step::MinimizeCrossings,
        Step::MinimizeEdgeLength,
        Step::RemoveEmptyRows,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Step::BuildNodes => "BuildNodes",
            Step::CheckPrerequisites => "CheckPrerequisites",
            Step::CreateEdges => "CreateEdges",
            Step::AssignLayers => "AssignLayers",
            Step::NormalizeEdges => "NormalizeEdges",
            Step::Collapse => "Collapse",
            Step::MinimizeCrossings => "MinimizeCrossings",
            Step::MinimizeEdgeLength => "MinimizeEdgeLength",
            Step::RemoveEmptyRows => "RemoveEmptyRows",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runs one step against `tree`. `BuildNodes` replaces the tree with a fresh one built from
/// `definitions`; the other steps ignore them.
pub fn run_step(
    tree: &mut Tree,
    step: Step,
    definitions: &[Definition],
    opts: &LayoutOptions,
) -> Result<()> {
    tracing::info!(step = %step, "running layout step");
    match step {
        Step::BuildNodes => *tree = builder::build(definitions),
        Step::CheckPrerequisites => {
            consistency::run(tree, opts.max_consistency_passes);
        }
        Step::CreateEdges => {
            edges::run(tree);
        }
        Step::AssignLayers => rank::run(tree, opts.max_layering_passes)?,
        Step::NormalizeEdges => {
            normalize::run(tree)?;
        }
        Step::Collapse => compact::run(tree),
        Step::MinimizeCrossings => {
            order::minimize_crossings(tree, opts)?;
        }
        Step::MinimizeEdgeLength => {
            length::minimize_edge_length(tree, opts)?;
        }
        Step::RemoveEmptyRows => {
            prune::run(tree);
        }
    }
    Ok(())
}

/// Runs every step in order on the current thread.
pub fn run(definitions: &[Definition], opts: &LayoutOptions) -> Result<Tree> {
    let mut tree = Tree::new();
    for step in Step::ALL {
        run_step(&mut tree, step, definitions, opts)?;
    }
    Ok(tree)
}
