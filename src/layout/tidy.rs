//! Built-in layered tree layout.
//!
//! Nodes are ranked by depth along the flow axis. Along the cross axis,
//! leaves take consecutive slots in depth-first order and every parent is
//! centered over the span of its children. Nodes without a parent start their
//! own tree after the previous one, so unreachable nodes are still placed.

use std::collections::HashMap;

use crate::types::{NodeId, Position};

use super::{LayoutEngine, LayoutError, LayoutRequest, LayoutResult};

/// Deterministic tidy tree engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct TidyTreeLayout;

impl TidyTreeLayout {
    /// Create the engine.
    pub fn new() -> Self {
        Self
    }
}

struct Walk<'r> {
    request: &'r LayoutRequest,
    children: Vec<Vec<usize>>,
    visited: Vec<bool>,
    cross_center: Vec<f64>,
    depth: Vec<usize>,
    /// Cross-axis centers of the first and last placed child.
    child_span: Vec<Option<(f64, f64)>>,
    cursor: f64,
}

impl Walk<'_> {
    fn cross_extent(&self, idx: usize) -> f64 {
        let node = &self.request.nodes[idx];
        if self.request.direction.is_horizontal() {
            node.height
        } else {
            node.width
        }
    }

    /// Place the subtree under `root`.
    ///
    /// Depth-first with an explicit stack: children are entered in edge
    /// order and a node is centered once all of its children are placed, so
    /// tree depth is bounded by memory rather than the call stack.
    fn place(&mut self, root: usize) {
        self.visited[root] = true;
        self.depth[root] = 0;

        // (node, index of the next child to enter)
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
        while let Some(frame) = stack.last_mut() {
            let idx = frame.0;
            if let Some(&child) = self.children[idx].get(frame.1) {
                frame.1 += 1;
                if !self.visited[child] {
                    self.visited[child] = true;
                    self.depth[child] = self.depth[idx] + 1;
                    stack.push((child, 0));
                }
                continue;
            }

            stack.pop();
            let center = match self.child_span[idx] {
                Some((first, last)) => (first + last) / 2.0,
                None => {
                    let extent = self.cross_extent(idx);
                    let center = self.cursor + extent / 2.0;
                    self.cursor += extent + self.request.node_sep;
                    center
                }
            };
            self.cross_center[idx] = center;

            if let Some(&(parent, _)) = stack.last() {
                let span = self.child_span[parent].get_or_insert((center, center));
                span.1 = center;
            }
        }
    }
}

impl LayoutEngine for TidyTreeLayout {
    fn layout(&self, request: &LayoutRequest) -> Result<LayoutResult, LayoutError> {
        let n = request.nodes.len();
        let index: HashMap<&NodeId, usize> = request
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (&node.id, i))
            .collect();

        let mut children = vec![Vec::new(); n];
        let mut has_parent = vec![false; n];
        for (source, target) in &request.edges {
            let (Some(&s), Some(&t)) = (index.get(source), index.get(target)) else {
                return Err(LayoutError::Engine(format!(
                    "edge {} -> {} references an unknown node",
                    source, target
                )));
            };
            if s != t {
                children[s].push(t);
                has_parent[t] = true;
            }
        }

        let mut walk = Walk {
            request,
            children,
            visited: vec![false; n],
            cross_center: vec![0.0; n],
            depth: vec![0; n],
            child_span: vec![None; n],
            cursor: 0.0,
        };

        // Parentless nodes first, then anything a cycle kept unreachable.
        let roots = (0..n).filter(|&i| !has_parent[i]).chain(0..n);
        for idx in roots {
            if !walk.visited[idx] {
                walk.place(idx);
            }
        }

        let horizontal = request.direction.is_horizontal();
        let main_extent = request
            .nodes
            .iter()
            .map(|node| if horizontal { node.width } else { node.height })
            .fold(0.0_f64, f64::max);
        let rank_step = main_extent + request.rank_sep;

        let centers = request
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| {
                let main = walk.depth[i] as f64 * rank_step + main_extent / 2.0;
                let cross = walk.cross_center[i];
                let position = if horizontal {
                    Position::new(main, cross)
                } else {
                    Position::new(cross, main)
                };
                (node.id.clone(), position)
            })
            .collect();

        Ok(LayoutResult { centers })
    }
}
