//! Graph traversal orderings.
//!
//! Provides the post-order and reverse post-order visitations data flow analysis needs.
//! Reverse post-order is the preferred iteration order for forward analyses: in a DAG a
//! node is visited before any of its successors, so most values are available when a
//! block is first processed and the worklist converges quickly.

use crate::utils::graph::{NodeId, Successors};

/// Computes the postorder traversal of nodes reachable from `start`.
///
/// Uses an explicit stack; nodes unreachable from `start` do not appear in the result.
///
/// # Complexity
///
/// - Time: O(V + E)
/// - Space: O(V)
#[must_use]
pub fn postorder<G: Successors>(graph: &G, start: NodeId) -> Vec<NodeId> {
    let node_count = graph.node_count();
    if start.index() >= node_count {
        return Vec::new();
    }

    #[derive(Clone, Copy)]
    enum State {
        Enter,
        Exit,
    }

    let mut visited = vec![false; node_count];
    let mut result = Vec::with_capacity(node_count);
    let mut stack = vec![(start, State::Enter)];

    while let Some((node, state)) = stack.pop() {
        match state {
            State::Enter => {
                if visited[node.index()] {
                    continue;
                }
                visited[node.index()] = true;

                // Exit entry is processed after all children.
                stack.push((node, State::Exit));

                let successors: Vec<NodeId> = graph.successors(node).collect();
                for &succ in successors.iter().rev() {
                    if !visited[succ.index()] {
                        stack.push((succ, State::Enter));
                    }
                }
            }
            State::Exit => {
                result.push(node);
            }
        }
    }

    result
}

/// Computes the reverse postorder traversal of nodes reachable from `start`.
#[must_use]
pub fn reverse_postorder<G: Successors>(graph: &G, start: NodeId) -> Vec<NodeId> {
    let mut result = postorder(graph, start);
    result.reverse();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::graph::DirectedGraph;

    fn diamond() -> (DirectedGraph<&'static str, ()>, [NodeId; 4]) {
        let mut graph = DirectedGraph::new();
        let a = graph.add_node("A");
        let b = graph.add_node("B");
        let c = graph.add_node("C");
        let d = graph.add_node("D");
        graph.add_edge(a, b, ()).unwrap();
        graph.add_edge(a, c, ()).unwrap();
        graph.add_edge(b, d, ()).unwrap();
        graph.add_edge(c, d, ()).unwrap();
        (graph, [a, b, c, d])
    }

    #[test]
    fn test_postorder_linear() {
        let mut graph: DirectedGraph<(), ()> = DirectedGraph::new();
        let a = graph.add_node(());
        let b = graph.add_node(());
        let c = graph.add_node(());
        graph.add_edge(a, b, ()).unwrap();
        graph.add_edge(b, c, ()).unwrap();

        assert_eq!(postorder(&graph, a), vec![c, b, a]);
        assert_eq!(reverse_postorder(&graph, a), vec![a, b, c]);
    }

    #[test]
    fn test_rpo_diamond_respects_dominance() {
        let (graph, [a, b, c, d]) = diamond();
        let order = reverse_postorder(&graph, a);
        assert_eq!(order.len(), 4);
        assert_eq!(order[0], a);
        assert_eq!(order[3], d);
        let pos = |n: NodeId| order.iter().position(|&x| x == n).unwrap();
        assert!(pos(b) < pos(d));
        assert!(pos(c) < pos(d));
    }

    #[test]
    fn test_cycle_terminates() {
        let mut graph: DirectedGraph<(), ()> = DirectedGraph::new();
        let a = graph.add_node(());
        let b = graph.add_node(());
        graph.add_edge(a, b, ()).unwrap();
        graph.add_edge(b, a, ()).unwrap();

        let order = postorder(&graph, a);
        assert_eq!(order.len(), 2);
    }

    #[test]
    fn test_unreachable_excluded() {
        let mut graph: DirectedGraph<(), ()> = DirectedGraph::new();
        let a = graph.add_node(());
        let _isolated = graph.add_node(());
        let order = postorder(&graph, a);
        assert_eq!(order, vec![a]);
    }

    #[test]
    fn test_invalid_start() {
        let graph: DirectedGraph<(), ()> = DirectedGraph::new();
        assert!(postorder(&graph, NodeId::new(0)).is_empty());
    }
}
