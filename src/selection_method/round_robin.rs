use std::fmt;

/// Decides whether two entries denote the same logical element when a candidate
/// sequence is compared against the held one.
pub type SamePredicate<T> = Box<dyn Fn(&T, &T) -> bool + Send + Sync>;

/// Circular selector: an ordered sequence plus a cursor that advances modulo the
/// sequence length, handing out elements in round-robin order.
///
/// The sequence is only ever replaced wholesale via [`rebuild`](Self::rebuild),
/// which resets the cursor to the start; a cursor carried over from a previous
/// sequence has no correspondence to a reordered one.
pub struct RoundRobin<T> {
    items: Vec<T>,
    cursor: usize,
    is_same: SamePredicate<T>,
}

impl<T> RoundRobin<T> {
    /// Creates an empty selector. `is_same` is the equivalence relation used by
    /// [`is_consistent`](Self::is_consistent); elements it considers equal count
    /// as one member for comparison purposes.
    pub fn new(is_same: impl Fn(&T, &T) -> bool + Send + Sync + 'static) -> Self {
        Self {
            items: Vec::new(),
            cursor: 0,
            is_same: Box::new(is_same),
        }
    }

    /// Replaces the held sequence and resets the cursor to the first element.
    /// An empty sequence is accepted; the selector then has no next element
    /// until rebuilt non-empty.
    pub fn rebuild(&mut self, items: Vec<T>) {
        self.items = items;
        self.cursor = 0;
    }

    /// Returns the element at the cursor and advances `(cursor + 1) % len`,
    /// or `None` when the held sequence is empty.
    pub fn next(&mut self) -> Option<&T> {
        if self.items.is_empty() {
            return None;
        }

        let index = self.cursor;
        self.cursor = (self.cursor + 1) % self.items.len();
        Some(&self.items[index])
    }

    /// Whether the candidate sequence denotes the same membership as the held
    /// one. Comparison is set-based under the equivalence relation: order is
    /// ignored, and entries that are equivalent to an earlier entry collapse
    /// into one representative on both sides before the sets are compared.
    ///
    /// Pure read; never touches the cursor, so it can be called repeatedly
    /// before deciding to rebuild.
    pub fn is_consistent(&self, candidate: &[T]) -> bool {
        let held = self.distinct(&self.items);
        let fresh = self.distinct(candidate);

        held.len() == fresh.len()
            && fresh
                .iter()
                .all(|f| held.iter().any(|h| (self.is_same)(h, f)))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// First representative of each equivalence class, in sequence order.
    fn distinct<'a>(&self, items: &'a [T]) -> Vec<&'a T> {
        let mut kept: Vec<&'a T> = Vec::new();
        for item in items {
            if !kept.iter().any(|k| (self.is_same)(k, item)) {
                kept.push(item);
            }
        }
        kept
    }
}

impl<T: fmt::Debug> fmt::Debug for RoundRobin<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoundRobin")
            .field("items", &self.items)
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use proptest::collection::vec;
    use proptest::prelude::*;

    use super::*;

    fn rotation_of(items: Vec<&'static str>) -> RoundRobin<&'static str> {
        let mut rotation = RoundRobin::new(|l: &&str, r: &&str| l == r);
        rotation.rebuild(items);
        rotation
    }

    #[test]
    fn cycles_members_in_rebuild_order() {
        let mut rotation = rotation_of(vec!["a", "b", "c"]);

        assert_eq!(rotation.next(), Some(&"a"));
        assert_eq!(rotation.next(), Some(&"b"));
        assert_eq!(rotation.next(), Some(&"c"));
        assert_eq!(rotation.next(), Some(&"a"));
    }

    #[test]
    fn empty_rotation_has_no_next() {
        let mut rotation: RoundRobin<&str> = RoundRobin::new(|l: &&str, r: &&str| l == r);
        assert!(rotation.is_empty());
        assert_eq!(rotation.next(), None);

        rotation.rebuild(vec!["a"]);
        assert_eq!(rotation.next(), Some(&"a"));

        rotation.rebuild(Vec::new());
        assert_eq!(rotation.next(), None);
        assert_eq!(rotation.next(), None);
    }

    #[test]
    fn rebuild_resets_cursor() {
        let mut rotation = rotation_of(vec!["a", "b", "c"]);
        rotation.next();
        rotation.next();

        rotation.rebuild(vec!["a", "b", "c"]);
        assert_eq!(rotation.next(), Some(&"a"));
    }

    #[test]
    fn consistency_ignores_order() {
        let rotation = rotation_of(vec!["a", "b", "c"]);

        assert!(rotation.is_consistent(&["c", "a", "b"]));
        assert!(rotation.is_consistent(&["a", "b", "c"]));
    }

    #[test]
    fn consistency_detects_membership_changes() {
        let rotation = rotation_of(vec!["a", "b", "c"]);

        assert!(!rotation.is_consistent(&["a", "b"]));
        assert!(!rotation.is_consistent(&["a", "b", "c", "d"]));
        assert!(!rotation.is_consistent(&["a", "b", "d"]));
        assert!(!rotation.is_consistent(&[]));
    }

    #[test]
    fn empty_against_empty_is_consistent() {
        let rotation: RoundRobin<&str> = RoundRobin::new(|l: &&str, r: &&str| l == r);
        assert!(rotation.is_consistent(&[]));
    }

    #[test]
    fn duplicates_collapse_for_consistency_only() {
        let mut rotation = rotation_of(vec!["a", "a", "b"]);

        // One representative per equivalence class when comparing...
        assert!(rotation.is_consistent(&["a", "b"]));
        assert!(rotation_of(vec!["a", "b"]).is_consistent(&["a", "a", "b"]));

        // ...but the rotation itself keeps the sequence as given.
        assert_eq!(rotation.len(), 3);
        assert_eq!(rotation.next(), Some(&"a"));
        assert_eq!(rotation.next(), Some(&"a"));
        assert_eq!(rotation.next(), Some(&"b"));
    }

    #[test]
    fn consistency_check_is_pure() {
        let mut rotation = rotation_of(vec!["a", "b"]);

        assert!(rotation.is_consistent(&["b", "a"]));
        assert!(rotation.is_consistent(&["b", "a"]));
        assert!(!rotation.is_consistent(&["b"]));

        // The cursor never moved.
        assert_eq!(rotation.next(), Some(&"a"));
    }

    fn numeric_rotation(items: Vec<u8>) -> RoundRobin<u8> {
        let mut rotation = RoundRobin::new(|l: &u8, r: &u8| l == r);
        rotation.rebuild(items);
        rotation
    }

    proptest! {
        #[test]
        fn reordering_never_breaks_consistency(
            (items, shuffled) in vec(0u8..32, 0..12)
                .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
        ) {
            let rotation = numeric_rotation(items);
            prop_assert!(rotation.is_consistent(&shuffled));
        }

        #[test]
        fn unknown_member_breaks_consistency(items in vec(0u8..32, 0..12)) {
            let rotation = numeric_rotation(items.clone());
            let mut extended = items;
            extended.push(99);
            prop_assert!(!rotation.is_consistent(&extended));
        }

        #[test]
        fn duplicate_of_held_member_keeps_consistency(items in vec(0u8..32, 1..12)) {
            let rotation = numeric_rotation(items.clone());
            let mut extended = items.clone();
            extended.push(items[0]);
            prop_assert!(rotation.is_consistent(&extended));
        }

        #[test]
        fn full_cycle_returns_sequence_then_wraps(items in vec(0u8..32, 1..12)) {
            let mut rotation = numeric_rotation(items.clone());
            let cycle: Vec<u8> = (0..items.len())
                .map(|_| *rotation.next().expect("non-empty rotation"))
                .collect();
            prop_assert_eq!(cycle, items.clone());
            prop_assert_eq!(rotation.next().copied(), items.first().copied());
        }
    }
}
