/// The benchmark scene folders every experiment root is expected to contain.
///
/// Order matters: a scene's 1-based position in this list is the ordinal used
/// as the numeric suffix of composite keys, so reordering the list renumbers
/// every downstream key.
pub const SCENE_NAMES: [&str; 13] = [
    "bicycle", "bonsai", "counter", "drjohnson", "flowers", "garden", "kitchen", "playroom",
    "room", "stump", "train", "treehill", "truck",
];

/// 1-based ordinal of a scene name, or `None` for names outside the list.
pub fn scene_ordinal(name: &str) -> Option<usize> {
    SCENE_NAMES
        .iter()
        .position(|scene| *scene == name)
        .map(|idx| idx + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals_are_one_based_positions() {
        assert_eq!(scene_ordinal("bicycle"), Some(1));
        assert_eq!(scene_ordinal("garden"), Some(6));
        assert_eq!(scene_ordinal("truck"), Some(13));
    }

    #[test]
    fn unknown_scene_has_no_ordinal() {
        assert_eq!(scene_ordinal("warehouse"), None);
        assert_eq!(scene_ordinal(""), None);
    }

    #[test]
    fn ordinal_round_trips_through_the_list() {
        for (idx, name) in SCENE_NAMES.iter().enumerate() {
            assert_eq!(scene_ordinal(name), Some(idx + 1));
        }
    }
}
