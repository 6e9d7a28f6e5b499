use rand::prelude::*;
use rand::rngs::StdRng;
use wordtree::{WordTree, MIN_DEGREE};

fn keys(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn in_order(tree: &WordTree) -> Vec<String> {
    tree.iter().cloned().collect()
}

fn height_bound(len: usize) -> usize {
    let levels = ((len as f64 + 1.0) / 2.0).log(MIN_DEGREE as f64).ceil();
    levels.max(0.0) as usize + 1
}

fn random_word(rng: &mut StdRng, alphabet: &[u8]) -> String {
    let len = rng.gen_range(1..=3);
    (0..len)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())] as char)
        .collect()
}

#[test]
fn scenario_a_sixth_insert_splits_root() {
    let mut tree = WordTree::new();
    for key in keys(&["a", "b", "c", "d", "e"]) {
        tree.insert(key);
    }
    assert_eq!(tree.height(), 1);
    assert_eq!(tree.node_count(), 1);

    tree.insert("f".to_string());

    assert_eq!(tree.node_count(), 3);
    assert_eq!(
        tree.levels(),
        vec![
            vec![keys(&["c"])],
            vec![keys(&["a", "b"]), keys(&["d", "e", "f"])],
        ]
    );
    tree.validate().unwrap();
}

#[test]
fn scenario_b_merge_collapses_root_into_leaf() {
    let mut tree: WordTree = keys(&["a", "b", "c", "d", "e", "f"]).into_iter().collect();
    tree.remove("f");
    assert_eq!(
        tree.levels(),
        vec![vec![keys(&["c"])], vec![keys(&["a", "b"]), keys(&["d", "e"])]]
    );

    assert!(tree.remove("c"));

    assert_eq!(tree.levels(), vec![vec![keys(&["a", "b", "d", "e"])]]);
    assert_eq!(tree.node_count(), 1);
    tree.validate().unwrap();
}

#[test]
fn scenario_c_missing_key_is_noop() {
    let mut tree: WordTree = keys(&["a", "b", "c", "d", "e", "f"]).into_iter().collect();
    let before = tree.levels();

    assert!(!tree.remove("z"));

    assert_eq!(tree.levels(), before);
    assert_eq!(tree.node_count(), 3);
    assert_eq!(tree.len(), 6);
}

#[test]
fn scenario_d_remove_everything_in_random_order() {
    let count = MIN_DEGREE * 400;
    let words: Vec<String> = (0..count).map(|i| format!("w{i:06}")).collect();
    let mut tree: WordTree = words.iter().cloned().collect();
    tree.validate().unwrap();
    assert!(tree.height() > 2);

    let mut order = words.clone();
    order.shuffle(&mut StdRng::seed_from_u64(2024));
    for (removed, word) in order.iter().enumerate() {
        assert!(tree.remove(word.as_str()), "missing {word}");
        if removed % 97 == 0 {
            tree.validate().unwrap();
        }
    }

    assert!(tree.is_empty());
    assert_eq!(tree.height(), 1);
    assert_eq!(tree.node_count(), 1);
    tree.validate().unwrap();
}

#[test]
fn random_workload_keeps_invariants_and_multiset() {
    let mut rng = StdRng::seed_from_u64(99);
    let alphabet = b"abcdef";
    let mut tree = WordTree::new();
    let mut expected: Vec<String> = Vec::new();

    for step in 0..3000 {
        let word = random_word(&mut rng, alphabet);
        if rng.gen_bool(0.6) {
            tree.insert(word.clone());
            let at = expected.partition_point(|w| *w <= word);
            expected.insert(at, word);
        } else {
            let present = expected.iter().position(|w| *w == word);
            assert_eq!(tree.remove(word.as_str()), present.is_some());
            if let Some(at) = present {
                expected.remove(at);
            }
        }

        if step % 50 == 0 {
            tree.validate().unwrap();
            assert_eq!(in_order(&tree), expected);
        }
    }

    tree.validate().unwrap();
    assert_eq!(in_order(&tree), expected);
    assert_eq!(tree.len(), expected.len());
}

#[test]
fn insert_then_remove_restores_in_order_sequence() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut tree = WordTree::new();
    for _ in 0..500 {
        tree.insert(random_word(&mut rng, b"lmnopq"));
    }
    let before = in_order(&tree);

    for probe in ["m", "zz", "lmn", "a", "q"] {
        tree.insert(probe.to_string());
        assert!(tree.remove(probe));
        assert_eq!(in_order(&tree), before);
        tree.validate().unwrap();
    }
}

#[test]
fn duplicate_removed_once_leaves_one() {
    let mut tree = WordTree::new();
    tree.insert("a".to_string());
    tree.insert("a".to_string());

    tree.remove("a");

    assert_eq!(in_order(&tree), keys(&["a"]));
}

#[test]
fn many_duplicates_across_splits() {
    let mut tree = WordTree::new();
    for _ in 0..40 {
        tree.insert("same".to_string());
        tree.insert("other".to_string());
    }
    tree.validate().unwrap();
    assert!(tree.height() > 1);

    for remaining in (0..40).rev() {
        assert!(tree.remove("same"));
        tree.validate().unwrap();
        assert_eq!(tree.iter().filter(|k| *k == "same").count(), remaining);
    }
    assert!(!tree.contains("same"));
    assert_eq!(tree.len(), 40);
}

#[test]
fn height_stays_within_bound() {
    let mut rng = StdRng::seed_from_u64(17);
    let mut tree = WordTree::new();

    for n in 1..=2000 {
        tree.insert(format!("{:08}", rng.gen::<u32>()));
        if n % 100 == 0 {
            assert!(
                tree.height() <= height_bound(tree.len()),
                "height {} over bound for {} keys",
                tree.height(),
                tree.len()
            );
        }
    }

    let mut words: Vec<String> = tree.iter().cloned().collect();
    words.shuffle(&mut rng);
    for word in words.iter().take(1500) {
        tree.remove(word.as_str());
        assert!(tree.height() <= height_bound(tree.len()));
    }
}
