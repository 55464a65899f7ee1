use tablescout_graph::{AppendVec, OverrideOption};

#[test]
fn append_vec_keeps_existing_entries_first() {
    let current = vec!["a".to_string()];
    let merged = AppendVec::merge(&current, vec!["b".to_string(), "c".to_string()]);
    assert_eq!(merged, vec!["a", "b", "c"]);
}

#[test]
fn override_option_keeps_current_when_update_absent() {
    let current = Some("SELECT 1".to_string());
    assert_eq!(OverrideOption::merge(&current, None), current);
    assert_eq!(
        OverrideOption::merge(&None, Some("SELECT 2".to_string())),
        Some("SELECT 2".to_string())
    );
}
