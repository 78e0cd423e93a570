//! Transitive dependency closure over a loaded catalog.
//!
//! The part of the manifest reachable from the requested submodule is built
//! into a directed graph (edge from a submodule to each of its dependencies).
//! A topological sort rejects cycles; the closure itself is the depth-first
//! post-order from the root, so every dependency's own dependencies come
//! before it and siblings keep their declaration order. A name reachable
//! along several paths is emitted once.

use crate::cache::Catalog;
use crate::CoreError;
use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::DfsPostOrder;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{trace, warn};
use vimius_schema::{SubmoduleName, SubmoduleRecord};

type DependencyGraph<'a> = DiGraph<&'a SubmoduleRecord, ()>;

/// Names `name` transitively depends on, excluding `name` itself.
pub fn dependency_closure(catalog: &Catalog, name: &str) -> Result<Vec<SubmoduleName>, CoreError> {
    let (graph, root) = reachable_graph(catalog, name)?;

    if let Err(cycle) = toposort(&graph, None) {
        return Err(CoreError::DependencyCycle {
            cycle: cycle_path(&graph, cycle.node_id()),
        });
    }

    let mut order = Vec::with_capacity(graph.node_count().saturating_sub(1));
    let mut dfs = DfsPostOrder::new(&graph, root);
    while let Some(idx) = dfs.next(&graph) {
        if idx != root {
            order.push(graph[idx].name.clone());
        }
    }
    trace!("closure of {name}: {} dependencies", order.len());
    Ok(order)
}

/// Graph of every record reachable from `name`, rooted at index 0.
///
/// Nodes are added in the order they are first referenced. Edges are added
/// in declaration order: `neighbors` yields the newest edge first and
/// `DfsPostOrder` descends into the last pushed neighbor first, so the walk
/// visits dependencies as they are declared.
fn reachable_graph<'a>(
    catalog: &'a Catalog,
    name: &str,
) -> Result<(DependencyGraph<'a>, NodeIndex), CoreError> {
    let record = catalog
        .get(name)
        .ok_or_else(|| CoreError::SubmoduleNotFound(name.to_owned()))?;

    let mut graph = DependencyGraph::new();
    let mut indices: HashMap<&str, NodeIndex> = HashMap::new();
    let root = graph.add_node(record);
    indices.insert(record.name.as_str(), root);

    let mut to_visit = vec![root];
    while let Some(current) = to_visit.pop() {
        let record = graph[current];
        for dep in &record.dependencies {
            let idx = if let Some(&idx) = indices.get(dep.as_str()) {
                idx
            } else {
                let Some(dep_record) = catalog.get(dep) else {
                    warn!(
                        "submodule '{}' depends on unknown submodule '{dep}'",
                        record.name
                    );
                    return Err(CoreError::SubmoduleNotFound(dep.to_string()));
                };
                let idx = graph.add_node(dep_record);
                indices.insert(dep_record.name.as_str(), idx);
                to_visit.push(idx);
                idx
            };
            graph.add_edge(current, idx, ());
        }
    }
    Ok((graph, root))
}

/// A closed path through the cycle containing `member`, starting and ending
/// at the cycle node first reached from the root.
fn cycle_path(graph: &DependencyGraph<'_>, member: NodeIndex) -> Vec<String> {
    let component: HashSet<NodeIndex> = tarjan_scc(graph)
        .into_iter()
        .find(|scc| scc.contains(&member))
        .unwrap_or_else(|| vec![member])
        .into_iter()
        .collect();
    let start = component.iter().copied().min().unwrap_or(member);

    // Breadth-first inside the component for the shortest way back to `start`.
    let mut parent: HashMap<NodeIndex, NodeIndex> = HashMap::new();
    let mut queue = VecDeque::from([start]);
    let mut closing = start;
    'search: while let Some(node) = queue.pop_front() {
        for succ in graph.neighbors(node) {
            if succ == start {
                closing = node;
                break 'search;
            }
            if component.contains(&succ) && !parent.contains_key(&succ) {
                parent.insert(succ, node);
                queue.push_back(succ);
            }
        }
    }

    let mut path = vec![graph[start].name.to_string()];
    let mut node = closing;
    while node != start {
        path.push(graph[node].name.to_string());
        match parent.get(&node) {
            Some(&prev) => node = prev,
            None => break,
        }
    }
    path.push(graph[start].name.to_string());
    path.reverse();
    path
}
