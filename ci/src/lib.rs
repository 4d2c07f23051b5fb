//! Checks shared by the registry download tests.

use vk_lists::ExtensionLists;

/// Panics unless both lists are strictly ascending and have no name in
/// common.
pub fn check_lists(lists: &ExtensionLists) {
    for (kind, list) in [("device", &lists.device), ("instance", &lists.instance)] {
        if let Some(pair) = list.windows(2).find(|w| w[0] >= w[1]) {
            panic!("{} list out of order: {:?}", kind, pair);
        }
    }

    let shared: Vec<&String> = lists
        .device
        .iter()
        .filter(|name| lists.instance.contains(*name))
        .collect();
    if !shared.is_empty() {
        panic!("extensions in both lists: {:?}", shared);
    }
}
