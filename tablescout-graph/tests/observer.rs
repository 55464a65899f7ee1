use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tablescout_core::{Runnable, ScoutError};
use tablescout_graph::{GraphBuilder, GraphState, Observer, StateSchema, StateUpdate};

#[derive(Clone, Default, Debug, Serialize, Deserialize, PartialEq)]
struct DemoState {
    count: i32,
    failed: bool,
}

#[derive(Clone, Default, Debug, Serialize, Deserialize, PartialEq)]
struct DemoUpdate {
    add: i32,
    fail: bool,
}

impl StateSchema for DemoState {
    type Update = DemoUpdate;

    fn apply(current: &Self, update: DemoUpdate) -> Self {
        Self {
            count: current.count + update.add,
            failed: current.failed || update.fail,
        }
    }

    fn is_halted(&self) -> bool {
        self.failed
    }
}

struct Step {
    fail: bool,
}

#[async_trait::async_trait]
impl Runnable<GraphState<DemoState>, StateUpdate<DemoState>> for Step {
    async fn invoke(
        &self,
        _input: GraphState<DemoState>,
    ) -> Result<StateUpdate<DemoState>, ScoutError> {
        Ok(StateUpdate::new(DemoUpdate {
            add: 1,
            fail: self.fail,
        }))
    }
}

#[derive(Default)]
struct CollectingObserver {
    events: Mutex<Vec<String>>,
}

impl Observer for CollectingObserver {
    fn on_node_enter(&self, node: &str) {
        self.events.lock().unwrap().push(format!("enter:{node}"));
    }

    fn on_node_exit(&self, node: &str) {
        self.events.lock().unwrap().push(format!("exit:{node}"));
    }

    fn on_halt(&self, node: &str) {
        self.events.lock().unwrap().push(format!("halt:{node}"));
    }
}

fn three_step_graph(
    fail_at_second: bool,
    observer: Arc<CollectingObserver>,
) -> tablescout_graph::ExecutableGraph<DemoState> {
    GraphBuilder::new()
        .add_node("first", Step { fail: false })
        .add_node("second", Step { fail: fail_at_second })
        .add_node("third", Step { fail: false })
        .set_entry("first")
        .add_edge("first", "second")
        .add_edge("second", "third")
        .with_observer(observer)
        .build()
}

#[tokio::test]
async fn observer_sees_every_node_in_order() {
    let observer = Arc::new(CollectingObserver::default());
    let graph = three_step_graph(false, observer.clone());

    let out = graph
        .invoke_graph(GraphState::new(DemoState::default()))
        .await
        .expect("invoke");

    assert_eq!(out.data.count, 3);
    let events = observer.events.lock().unwrap().clone();
    assert_eq!(
        events,
        vec![
            "enter:first",
            "exit:first",
            "enter:second",
            "exit:second",
            "enter:third",
            "exit:third"
        ]
    );
}

#[tokio::test]
async fn halted_state_stops_remaining_nodes() {
    let observer = Arc::new(CollectingObserver::default());
    let graph = three_step_graph(true, observer.clone());

    let out = graph
        .invoke_graph(GraphState::new(DemoState::default()))
        .await
        .expect("invoke");

    assert_eq!(out.data.count, 2);
    assert!(out.data.failed);
    let events = observer.events.lock().unwrap().clone();
    assert_eq!(
        events,
        vec![
            "enter:first",
            "exit:first",
            "enter:second",
            "exit:second",
            "halt:second"
        ]
    );
}

#[tokio::test]
async fn already_halted_state_runs_nothing() {
    let observer = Arc::new(CollectingObserver::default());
    let graph = three_step_graph(false, observer.clone());

    let initial = DemoState {
        count: 7,
        failed: true,
    };
    let out = graph
        .invoke_graph(GraphState::new(initial.clone()))
        .await
        .expect("invoke");

    assert_eq!(out.data, initial);
    assert!(observer.events.lock().unwrap().is_empty());
}
