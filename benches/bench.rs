use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use bstree::Tree;

/// Returns how many nodes are needed to fill a binary tree with `num_levels` levels.
fn num_nodes_in_full_tree(num_levels: u32) -> i64 {
    2i64.pow(num_levels) - 1
}

/// Builds a tree by inserting keys in ascending order. Without balancing this is a chain as deep
/// as it is long.
fn get_unbalanced_tree(num_levels: u32) -> Tree {
    let mut tree = Tree::new();
    for x in 0..num_nodes_in_full_tree(num_levels) {
        tree.insert(x).unwrap();
    }

    tree
}

/// Builds a tree by inserting keys so that, without any balancing, every one of the `num_levels`
/// levels is full.
fn get_balanced_tree(num_levels: u32) -> Tree {
    let xs = (0..num_nodes_in_full_tree(num_levels)).collect::<Vec<_>>();
    let mut tree = Tree::new();
    // Midpoints first, breadth first, so no recursion is needed.
    let mut ranges = std::collections::VecDeque::from([&xs[..]]);
    while let Some(range) = ranges.pop_front() {
        if range.is_empty() {
            continue;
        }
        let mid = range.len() / 2;
        tree.insert(range[mid]).unwrap();
        ranges.push_back(&range[..mid]);
        ranges.push_back(&range[mid + 1..]);
    }
    tree
}

/// Helper to bench a function on a BST.
/// It creates a group for the given name and closure and runs tests for various sizes and
/// shapes of BSTs before finishing the group.
fn bench_helper(c: &mut Criterion, name: &str, f: impl Fn(&mut Tree, i64)) {
    let mut group = c.benchmark_group(name);

    // The unbalanced tree gets slow to build quickly so stay at modest sizes.
    for num_levels in [3, 7, 11] {
        let tree_tests = [
            ("unbalanced", get_unbalanced_tree(num_levels)),
            ("balanced", get_balanced_tree(num_levels)),
        ];
        let largest_element_in_tree = num_nodes_in_full_tree(num_levels) - 1;
        for (name, tree) in tree_tests {
            debug_assert_eq!(tree.max(), Some(largest_element_in_tree));
            let id = BenchmarkId::new(name, largest_element_in_tree);

            group.bench_function(id, |b| {
                b.iter_custom(|iters| {
                    let mut time = std::time::Duration::ZERO;
                    for _ in 0..iters {
                        let mut tree = black_box(tree.clone());
                        let instant = std::time::Instant::now();
                        f(&mut tree, black_box(largest_element_in_tree));
                        let elapsed = instant.elapsed();
                        time += elapsed;
                    }
                    time
                })
            });
        }
    }

    group.finish();
}

pub fn criterion_benchmark(c: &mut Criterion) {
    bench_helper(c, "search", |tree, i| {
        let _node = black_box(tree.search(i).map(|n| n.key()));
    });
    bench_helper(c, "delete", |tree, i| {
        tree.delete(i);
    });
    bench_helper(c, "delete-root", |tree, _| {
        if let Some(root) = tree.root().map(|n| n.key()) {
            tree.delete(root);
        }
    });
    bench_helper(c, "insert", |tree, i| {
        let _ = tree.insert(i + 1);
    });
    bench_helper(c, "successor", |tree, i| {
        let _node = black_box(tree.successor(i - 1).map(|n| n.key()));
    });
    bench_helper(c, "search-miss", |tree, i| {
        let _node = black_box(tree.search(i + 1).map(|n| n.key()));
    });
    bench_helper(c, "iter", |tree, _| {
        black_box(tree.iter().sum::<i64>());
    });
    bench_helper(c, "depth", |tree, _| {
        black_box(tree.depth());
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
