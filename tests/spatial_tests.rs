//! Spatial index behavior over larger entry sets.

use lefdef_core::{BBox, NameId, NameInterner, RTree};

#[test]
fn test_window_query_selects_only_intersecting() {
    let names = NameInterner::new();
    let a = names.intern("a");
    let b = names.intern("b");
    let c = names.intern("c");
    let tree = RTree::build(&[
        (a, BBox::new(0.0, 0.0, 1.0, 1.0)),
        (b, BBox::new(5.0, 5.0, 6.0, 6.0)),
        (c, BBox::new(2.0, 2.0, 3.0, 3.0)),
    ]);

    assert_eq!(tree.query(&BBox::new(1.5, 1.5, 4.0, 4.0)), vec![c]);
}

#[test]
fn test_boundary_touch_counts_as_hit() {
    let names = NameInterner::new();
    let a = names.intern("touch");
    let tree = RTree::build(&[(a, BBox::new(0.0, 0.0, 1.0, 1.0))]);

    // Window corner exactly on the entry corner.
    assert_eq!(tree.query(&BBox::new(1.0, 1.0, 2.0, 2.0)), vec![a]);
    // Just past it.
    assert!(tree.query(&BBox::new(1.001, 1.001, 2.0, 2.0)).is_empty());
}

#[test]
fn test_grid_of_entries_exhaustive_queries() {
    let names = NameInterner::new();
    let mut items: Vec<(NameId, BBox)> = Vec::new();
    for row in 0..20 {
        for col in 0..20 {
            let x = col as f64 * 10.0;
            let y = row as f64 * 10.0;
            items.push((
                names.intern(&format!("g_{row}_{col}")),
                BBox::new(x, y, x + 4.0, y + 4.0),
            ));
        }
    }
    let tree = RTree::build(&items);
    assert_eq!(tree.len(), 400);

    // A window covering exactly a 3x3 patch of cells.
    let hits = tree.query(&BBox::new(50.0, 50.0, 74.0, 74.0));
    assert_eq!(hits.len(), 9);
    for key in &hits {
        let name = names.resolve(*key).unwrap();
        let (row, col) = name
            .strip_prefix("g_")
            .and_then(|s| s.split_once('_'))
            .map(|(r, c)| (r.parse::<i32>().unwrap(), c.parse::<i32>().unwrap()))
            .unwrap();
        assert!((5..=7).contains(&row), "unexpected hit {name}");
        assert!((5..=7).contains(&col), "unexpected hit {name}");
    }

    // Brute-force check against a random-ish window.
    let window = BBox::new(33.0, 47.0, 121.0, 88.0);
    let mut expected: Vec<NameId> = items
        .iter()
        .filter(|(_, b)| b.intersects(&window))
        .map(|&(k, _)| k)
        .collect();
    let mut got = tree.query(&window);
    expected.sort();
    got.sort();
    assert_eq!(got, expected);
}

#[test]
fn test_incremental_insert_equals_bulk_build() {
    let names = NameInterner::new();
    let items: Vec<(NameId, BBox)> = (0..200)
        .map(|i| {
            let x = (i * 37 % 500) as f64;
            let y = (i * 91 % 500) as f64;
            (
                names.intern(&format!("r{i}")),
                BBox::new(x, y, x + 5.0, y + 5.0),
            )
        })
        .collect();

    let bulk = RTree::build(&items);
    let mut grown = RTree::new();
    for &(key, bbox) in &items {
        grown.insert(key, bbox);
    }

    assert_eq!(bulk.len(), grown.len());
    assert_eq!(bulk.bounds(), grown.bounds());
    for window in [
        BBox::new(0.0, 0.0, 100.0, 100.0),
        BBox::new(250.0, 250.0, 400.0, 260.0),
        BBox::new(499.0, 0.0, 505.0, 505.0),
    ] {
        let mut a = bulk.query(&window);
        let mut b = grown.query(&window);
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }
}

#[test]
fn test_empty_and_single_entry() {
    let names = NameInterner::new();
    let empty = RTree::build(&[]);
    assert!(empty.is_empty());
    assert_eq!(empty.bounds(), None);

    let only = names.intern("only");
    let mut tree = RTree::new();
    tree.insert(only, BBox::new(3.0, 4.0, 5.0, 6.0));
    assert_eq!(tree.bounds(), Some(BBox::new(3.0, 4.0, 5.0, 6.0)));
    assert_eq!(tree.query(&BBox::new(0.0, 0.0, 10.0, 10.0)), vec![only]);
}
