use std::collections::HashMap;
use std::sync::Arc;

use tablescout_core::{GraphState, Runnable, StateSchema, StateUpdate};

use crate::{ExecutionConfig, ExecutionOptions, GraphError, Observer};

type BoxedNode<S> = Box<dyn Runnable<GraphState<S>, StateUpdate<S>> + Send + Sync>;

pub struct GraphBuilder<S: StateSchema> {
    nodes: HashMap<String, BoxedNode<S>>,
    edges: HashMap<String, String>,
    entry: Option<String>,
    config: ExecutionConfig,
    observers: Vec<Arc<dyn Observer>>,
}

impl<S: StateSchema> Default for GraphBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: StateSchema> GraphBuilder<S> {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            edges: HashMap::new(),
            entry: None,
            config: ExecutionConfig::default(),
            observers: Vec::new(),
        }
    }

    pub fn add_node<R>(mut self, name: &str, node: R) -> Self
    where
        R: Runnable<GraphState<S>, StateUpdate<S>> + Send + Sync + 'static,
    {
        self.nodes.insert(name.to_string(), Box::new(node));
        self
    }

    pub fn set_entry(mut self, name: &str) -> Self {
        self.entry = Some(name.to_string());
        self
    }

    pub fn add_edge(mut self, from: &str, to: &str) -> Self {
        self.edges.insert(from.to_string(), to.to_string());
        self
    }

    pub fn with_config(mut self, config: ExecutionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn build(self) -> ExecutableGraph<S> {
        ExecutableGraph {
            nodes: self.nodes,
            edges: self.edges,
            entry: self.entry,
            config: self.config,
            observers: self.observers,
        }
    }
}

pub struct ExecutableGraph<S: StateSchema> {
    nodes: HashMap<String, BoxedNode<S>>,
    edges: HashMap<String, String>,
    entry: Option<String>,
    config: ExecutionConfig,
    observers: Vec<Arc<dyn Observer>>,
}

impl<S: StateSchema> ExecutableGraph<S> {
    pub async fn invoke_graph(&self, state: GraphState<S>) -> Result<GraphState<S>, GraphError> {
        self.invoke_graph_with_options(state, ExecutionOptions::default())
            .await
    }

    pub async fn invoke_graph_with_options(
        &self,
        mut state: GraphState<S>,
        options: ExecutionOptions,
    ) -> Result<GraphState<S>, GraphError> {
        let config = self.config.merge(&options);
        let mut current = self.entry.clone().ok_or(GraphError::MissingEntry)?;

        if state.data.is_halted() {
            tracing::debug!(node = %current, "state already halted; skipping graph");
            return Ok(state);
        }

        let mut steps = 0usize;
        loop {
            if let Some(max) = config.max_steps {
                if steps >= max {
                    return Err(GraphError::MaxStepsExceeded {
                        max,
                        reached: steps,
                    });
                }
            }

            let node = self
                .nodes
                .get(&current)
                .ok_or_else(|| GraphError::MissingNode {
                    node: current.clone(),
                })?;

            tracing::debug!(node = %current, step = steps, "entering node");
            for observer in &self.observers {
                observer.on_node_enter(&current);
            }

            let update = node
                .invoke(state.clone())
                .await
                .map_err(|err| GraphError::NodeFailed {
                    node: current.clone(),
                    source: Box::new(err),
                })?;
            state = state.apply_update(update);
            steps += 1;

            for observer in &self.observers {
                observer.on_node_exit(&current);
            }

            if state.data.is_halted() {
                tracing::debug!(node = %current, "state halted; stopping graph");
                for observer in &self.observers {
                    observer.on_halt(&current);
                }
                break;
            }

            match self.edges.get(&current) {
                Some(next) => current = next.clone(),
                None => break,
            }
        }

        Ok(state)
    }
}
