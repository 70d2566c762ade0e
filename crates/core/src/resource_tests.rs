// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn set(names: &[&str]) -> ResourceSet {
    names.iter().map(|n| Resource::from(*n)).collect()
}

#[test]
fn union_merges_without_duplicates() {
    let merged = set(&["arm", "elevator"]).union(&set(&["elevator", "intake"]));
    assert_eq!(merged, set(&["arm", "elevator", "intake"]));
    assert_eq!(merged.len(), 3);
}

#[test]
fn overlap_reports_shared_resources() {
    let a = set(&["arm", "drivebase"]);
    let b = set(&["drivebase", "intake"]);
    assert!(a.intersects(&b));
    assert_eq!(a.overlap(&b), set(&["drivebase"]));
}

#[test]
fn disjoint_sets_do_not_intersect() {
    assert!(!set(&["arm"]).intersects(&set(&["elevator"])));
    assert!(!ResourceSet::new().intersects(&set(&["arm"])));
}

#[test]
fn subset_check() {
    assert!(set(&["arm"]).is_subset(&set(&["arm", "elevator"])));
    assert!(!set(&["arm", "intake"]).is_subset(&set(&["arm", "elevator"])));
}

#[test]
fn display_lists_names_in_order() {
    assert_eq!(set(&["intake", "arm"]).to_string(), "{arm, intake}");
}
