pub trait Observer: Send + Sync {
    fn on_node_enter(&self, _node: &str) {}
    fn on_node_exit(&self, _node: &str) {}
    /// Called when the state reports itself halted right after `node` ran.
    fn on_halt(&self, _node: &str) {}
}
