use std::collections::BTreeMap;

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use row_forest::{Forest, NodeId, TreeId};

/// Plain nested-vector model of what the forest should contain.
#[derive(Default)]
struct Mirror {
    levels: BTreeMap<TreeId, Vec<NodeId>>,
    heights: BTreeMap<NodeId, u32>,
    children: BTreeMap<NodeId, TreeId>,
}

impl Mirror {
    fn flatten(&self, tree: TreeId, out: &mut Vec<(TreeId, NodeId)>) {
        for n in &self.levels[&tree] {
            out.push((tree, *n));
            if let Some(c) = self.children.get(n) {
                self.flatten(*c, out);
            }
        }
    }

    fn drop_tree(&mut self, tree: TreeId) {
        for n in self.levels.remove(&tree).unwrap_or_default() {
            self.drop_node(n);
        }
    }

    fn drop_node(&mut self, n: NodeId) {
        self.heights.remove(&n);
        if let Some(c) = self.children.remove(&n) {
            self.drop_tree(c);
        }
    }

    fn parent_of(&self, tree: TreeId) -> Option<NodeId> {
        self.children.iter().find(|(_, t)| **t == tree).map(|(n, _)| *n)
    }
}

fn pick<T: Copy>(rng: &mut StdRng, items: &[T]) -> Option<T> {
    if items.is_empty() {
        None
    } else {
        Some(items[rng.gen_range(0..items.len())])
    }
}

fn check(forest: &Forest, mirror: &Mirror, top: TreeId) {
    forest.validate(top).unwrap_or_else(|e| panic!("{e}\n{}", forest.dump(top)));

    for (tree, nodes) in &mirror.levels {
        assert_eq!(forest.count(*tree) as usize, nodes.len());
        let mut curr = forest.first(*tree);
        for n in nodes {
            assert_eq!(curr, Some(*n));
            curr = forest.next(*tree, *n);
        }
        assert_eq!(curr, None);
    }

    let mut expected = Vec::new();
    mirror.flatten(top, &mut expected);
    assert_eq!(forest.total_rows(top), expected.len() as u64);

    let mut y = 0u64;
    let mut curr = forest.first(top).map(|n| (top, n));
    for (i, (t, n)) in expected.iter().enumerate() {
        assert_eq!(curr, Some((*t, *n)), "display position {i}");
        assert_eq!(forest.find_index(top, i as u64), Some((*t, *n)));
        assert_eq!(forest.node_get_index(*t, *n), i as u64);
        assert_eq!(forest.node_absolute_offset(*t, *n), y);
        let h = mirror.heights[n];
        if h > 0 {
            let hit = forest.find_offset(top, y + u64::from(h) - 1).unwrap();
            assert_eq!((hit.tree, hit.node, hit.within), (*t, *n, h - 1));
        }
        y += u64::from(h);
        curr = forest.next_full(*t, *n);
    }
    assert_eq!(curr, None);
    assert_eq!(forest.total_height(top), y);
    assert_eq!(forest.find_offset(top, y), None);

    let mut back = Vec::new();
    let mut curr = forest.last(top).map(|n| {
        let mut at = (top, n);
        while let Some(c) = forest.children(at.1) {
            match forest.last(c) {
                Some(l) => at = (c, l),
                None => break,
            }
        }
        at
    });
    while let Some(at) = curr {
        back.push(at);
        curr = forest.prev_full(at.0, at.1);
    }
    back.reverse();
    assert_eq!(back, expected);
}

fn run(seed: u64, steps: usize) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut forest = Forest::new();
    let mut mirror = Mirror::default();
    let top = forest.new_tree();
    mirror.levels.insert(top, Vec::new());

    for step in 0..steps {
        let trees: Vec<TreeId> = mirror.levels.keys().copied().collect();
        let tree = pick(&mut rng, &trees).unwrap();
        let len = mirror.levels[&tree].len();
        match rng.gen_range(0..10) {
            0..=2 => {
                let h = rng.gen_range(0..40);
                let pos = rng.gen_range(0..=len);
                let after = if pos == 0 { None } else { Some(mirror.levels[&tree][pos - 1]) };
                let n = forest.insert_after(tree, after, h);
                mirror.levels.get_mut(&tree).unwrap().insert(pos, n);
                mirror.heights.insert(n, h);
            }
            3..=4 => {
                let h = rng.gen_range(0..40);
                let pos = rng.gen_range(0..=len);
                let before = mirror.levels[&tree].get(pos).copied();
                let n = forest.insert_before(tree, before, h);
                mirror.levels.get_mut(&tree).unwrap().insert(pos, n);
                mirror.heights.insert(n, h);
            }
            5..=6 if len > 0 => {
                let pos = rng.gen_range(0..len);
                let n = mirror.levels.get_mut(&tree).unwrap().remove(pos);
                forest.remove_node(tree, n);
                mirror.drop_node(n);
            }
            7 if len > 0 => {
                let n = mirror.levels[&tree][rng.gen_range(0..len)];
                if !mirror.children.contains_key(&n) && forest.nesting_level(tree) < 4 {
                    let kids = forest.new_children(tree, n);
                    mirror.children.insert(n, kids);
                    let mut rows = Vec::new();
                    for _ in 0..rng.gen_range(0..6) {
                        let h = rng.gen_range(1..20);
                        let k = forest.insert_before(kids, None, h);
                        mirror.heights.insert(k, h);
                        rows.push(k);
                    }
                    mirror.levels.insert(kids, rows);
                }
            }
            8 if tree != top => {
                let parent = mirror.parent_of(tree).expect("nested tree has a parent row");
                mirror.children.remove(&parent);
                mirror.drop_tree(tree);
                forest.remove_subtree(tree);
                assert_eq!(forest.children(parent), None);
            }
            9 if len > 0 => {
                let n = mirror.levels[&tree][rng.gen_range(0..len)];
                let h = rng.gen_range(0..40);
                forest.node_set_height(tree, n, h);
                mirror.heights.insert(n, h);
            }
            _ => {}
        }
        if step % 7 == 0 {
            check(&forest, &mirror, top);
        }
    }
    check(&forest, &mirror, top);
    assert_eq!(forest.node_count(), mirror.heights.len());
    assert_eq!(forest.tree_count(), mirror.levels.len());
}

#[test]
fn random_operation_sequences_matrix() {
    for seed in 0..24 {
        run(seed, 400);
    }
}

#[test]
fn long_random_sequence() {
    run(0xfeed_beef, 4000);
}

proptest! {
    #[test]
    fn count_index_round_trip(heights in proptest::collection::vec(0u32..50, 1..200)) {
        let mut forest = Forest::new();
        let tree = forest.new_tree();
        let ids: Vec<_> = heights.iter().map(|h| forest.insert_before(tree, None, *h)).collect();

        let mut curr = forest.first(tree);
        for (i, id) in ids.iter().enumerate() {
            prop_assert_eq!(forest.find_count(tree, i as u32 + 1), Some(*id));
            prop_assert_eq!(curr, Some(*id));
            curr = forest.next(tree, *id);
        }
        prop_assert_eq!(forest.find_count(tree, ids.len() as u32 + 1), None);
    }

    #[test]
    fn offset_index_round_trip(heights in proptest::collection::vec(0u32..50, 1..120)) {
        let mut forest = Forest::new();
        let tree = forest.new_tree();
        for h in &heights {
            forest.insert_before(tree, None, *h);
        }
        let total: u64 = heights.iter().map(|h| u64::from(*h)).sum();
        prop_assert_eq!(forest.total_height(tree), total);
        for y in 0..total {
            let hit = forest.find_offset(tree, y).unwrap();
            let top = forest.node_find_offset(tree, hit.node);
            prop_assert!(top <= y && y < top + u64::from(forest.height(hit.node)));
            prop_assert_eq!(y - top, u64::from(hit.within));
        }
    }

    #[test]
    fn removal_shrinks_by_one(len in 1usize..150, victim in any::<prop::sample::Index>()) {
        let mut forest = Forest::new();
        let tree = forest.new_tree();
        let ids: Vec<_> = (0..len).map(|_| forest.insert_before(tree, None, 3)).collect();
        let gone = ids[victim.index(len)];
        forest.remove_node(tree, gone);
        prop_assert_eq!(forest.count(tree) as usize, len - 1);
        prop_assert!(!forest.contains(tree, gone));
        let mut curr = forest.first(tree);
        while let Some(n) = curr {
            prop_assert_ne!(n, gone);
            curr = forest.next(tree, n);
        }
        prop_assert!(forest.validate(tree).is_ok());
    }
}
