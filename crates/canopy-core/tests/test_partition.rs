use canopy_core::partition::{plan_rows, RowRange};

// ---------------------------------------------------------------------------
// Covering properties
// ---------------------------------------------------------------------------

#[test]
fn test_ranges_ordered_disjoint_and_covering() {
    for height in 0..=24 {
        for children in 0..=9 {
            let plan = plan_rows(height, children);

            if children == 0 || height == 0 {
                assert!(plan.is_empty(), "h={height} c={children}");
                continue;
            }

            assert_eq!(
                plan.len(),
                children.min(height),
                "h={height} c={children}: one range per active child"
            );

            let mut next = 1;
            for range in &plan {
                assert!(range.len > 0, "h={height} c={children}: empty range");
                assert_eq!(
                    range.start, next,
                    "h={height} c={children}: gap or overlap at {next}"
                );
                next = range.start + range.len;
            }
            assert_eq!(next, height + 1, "h={height} c={children}: union != [1,{height}]");
        }
    }
}

// ---------------------------------------------------------------------------
// Step rule
// ---------------------------------------------------------------------------

#[test]
fn test_even_split_with_remainder_child() {
    // 10 rows, 3 children: step = 3, last child absorbs the remainder
    let plan = plan_rows(10, 3);
    assert_eq!(
        plan,
        vec![
            RowRange { start: 1, len: 3 },
            RowRange { start: 4, len: 3 },
            RowRange { start: 7, len: 4 },
        ]
    );
}

#[test]
fn test_remainder_may_exceed_step() {
    // 11 rows, 4 children: step = 2, last child gets 5 rows
    let plan = plan_rows(11, 4);
    assert_eq!(plan.len(), 4);
    assert_eq!(plan[0], RowRange { start: 1, len: 2 });
    assert_eq!(plan[3], RowRange { start: 7, len: 5 });
}

#[test]
fn test_single_child_takes_everything() {
    let plan = plan_rows(7, 1);
    assert_eq!(plan, vec![RowRange { start: 1, len: 7 }]);
}

// ---------------------------------------------------------------------------
// More children than rows
// ---------------------------------------------------------------------------

#[test]
fn test_more_children_than_rows() {
    // 5 children, 2 rows: first two children get one row each, the
    // rest get no range at all
    let plan = plan_rows(2, 5);
    assert_eq!(
        plan,
        vec![RowRange { start: 1, len: 1 }, RowRange { start: 2, len: 1 }]
    );
}

#[test]
fn test_children_equal_rows() {
    let plan = plan_rows(3, 3);
    assert_eq!(plan.len(), 3);
    assert!(plan.iter().all(|r| r.len == 1));
}

#[test]
fn test_range_end_is_inclusive() {
    let range = RowRange { start: 4, len: 3 };
    assert_eq!(range.end(), 6);
}
