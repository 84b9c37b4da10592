use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use super::store::NodeStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuickFindHit {
    pub index: usize,
    pub score: i64,
}

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

/// Best fuzzy name matches for jumping to a node. Does not affect visibility.
pub fn quick_find(store: &NodeStore, query: &str, limit: usize) -> Vec<QuickFindHit> {
    let query = query.trim();
    if query.is_empty() || limit == 0 {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default();
    let mut hits = store
        .nodes()
        .iter()
        .enumerate()
        .filter_map(|(index, node)| {
            fuzzy_match_score(&matcher, &node.name, query).map(|score| QuickFindHit { index, score })
        })
        .collect::<Vec<_>>();

    hits.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| store.nodes()[a.index].name.len().cmp(&store.nodes()[b.index].name.len()))
            .then_with(|| a.index.cmp(&b.index))
    });
    hits.truncate(limit);
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::ingest::{Entry, ingest};

    #[test]
    fn ranks_closer_names_first() {
        let state = ingest(&[
            Entry::new("rootfs/etc/init.d/rcS", 1),
            Entry::new("rootfs/etc/inittab", 1),
            Entry::new("rootfs/bin/busybox", 1),
        ]);
        let hits = quick_find(&state.store, "init", 10);
        let names = hits
            .iter()
            .map(|hit| state.store.nodes()[hit.index].name.as_str())
            .collect::<Vec<_>>();
        assert!(names.contains(&"init.d"));
        assert!(names.contains(&"inittab"));
        assert!(!names.contains(&"busybox"));
    }

    #[test]
    fn blank_query_or_zero_limit_finds_nothing() {
        let state = ingest(&[Entry::new("a/b", 1)]);
        assert!(quick_find(&state.store, "   ", 5).is_empty());
        assert!(quick_find(&state.store, "b", 0).is_empty());
        assert_eq!(quick_find(&state.store, "B", 5).len(), 1);
    }
}
