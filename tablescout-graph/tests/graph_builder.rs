use serde::{Deserialize, Serialize};
use tablescout_core::{Runnable, ScoutError};
use tablescout_graph::{GraphBuilder, GraphState, StateSchema, StateUpdate};

#[derive(Clone, Default, Debug, Serialize, Deserialize, PartialEq)]
struct DemoState {
    count: i32,
    visited: Vec<String>,
}

impl StateSchema for DemoState {
    type Update = Self;
    fn apply(current: &Self, update: Self) -> Self {
        let mut visited = current.visited.clone();
        visited.extend(update.visited);
        Self {
            count: update.count,
            visited,
        }
    }
}

struct AddOne {
    name: &'static str,
}

#[async_trait::async_trait]
impl Runnable<GraphState<DemoState>, StateUpdate<DemoState>> for AddOne {
    async fn invoke(
        &self,
        input: GraphState<DemoState>,
    ) -> Result<StateUpdate<DemoState>, ScoutError> {
        Ok(StateUpdate::new(DemoState {
            count: input.data.count + 1,
            visited: vec![self.name.to_string()],
        }))
    }
}

#[tokio::test]
async fn graph_builder_compiles_single_node() {
    let graph = GraphBuilder::default()
        .add_node("add", AddOne { name: "add" })
        .set_entry("add")
        .build();

    let state = GraphState::new(DemoState::default());
    let out = graph.invoke_graph(state).await.expect("invoke");
    assert_eq!(out.data.count, 1);
}

#[tokio::test]
async fn graph_runs_linear_chain_in_edge_order() {
    let graph = GraphBuilder::new()
        .add_node("c", AddOne { name: "c" })
        .add_node("a", AddOne { name: "a" })
        .add_node("b", AddOne { name: "b" })
        .set_entry("a")
        .add_edge("a", "b")
        .add_edge("b", "c")
        .build();

    let out = graph
        .invoke_graph(GraphState::new(DemoState::default()))
        .await
        .expect("invoke");
    assert_eq!(out.data.count, 3);
    assert_eq!(out.data.visited, vec!["a", "b", "c"]);
}
