pub struct AppendVec;
impl AppendVec {
    pub fn merge<T: Clone>(current: &[T], mut update: Vec<T>) -> Vec<T> {
        let mut out = current.to_vec();
        out.append(&mut update);
        out
    }
}

/// Replaces an optional field when the update carries a value; an absent update keeps the current one.
pub struct OverrideOption;
impl OverrideOption {
    pub fn merge<T: Clone>(current: &Option<T>, update: Option<T>) -> Option<T> {
        update.or_else(|| current.clone())
    }
}
