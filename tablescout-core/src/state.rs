use serde::{de::DeserializeOwned, Deserialize, Serialize};

pub trait StateSchema:
    Serialize + DeserializeOwned + Clone + Default + Send + Sync + std::fmt::Debug + 'static
{
    type Update: Serialize + DeserializeOwned + Clone + Default + Send + Sync + std::fmt::Debug + 'static;

    fn apply(current: &Self, update: Self::Update) -> Self;

    /// Returns true once the state has reached a terminal condition and no further
    /// node should run. Graph execution checks this after every merged update.
    fn is_halted(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(bound = "S: StateSchema")]
pub struct GraphState<S: StateSchema> {
    pub data: S,
}

impl<S: StateSchema> GraphState<S> {
    pub fn new(data: S) -> Self {
        Self { data }
    }

    pub fn apply_update(self, update: StateUpdate<S>) -> Self {
        Self {
            data: S::apply(&self.data, update.data),
        }
    }

    pub fn into_inner(self) -> S {
        self.data
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(bound = "S: StateSchema")]
pub struct StateUpdate<S: StateSchema> {
    pub data: S::Update,
}

impl<S: StateSchema> StateUpdate<S> {
    pub fn new(data: S::Update) -> Self {
        Self { data }
    }

    pub fn empty() -> Self {
        Self {
            data: S::Update::default(),
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod state_tests;
