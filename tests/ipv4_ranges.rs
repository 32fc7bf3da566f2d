use ipv4_range_union::{AddressError, Interval, Ipv4RangeUnion};

use std::ops::RangeInclusive;

fn merged_pairs(union_obj: &Ipv4RangeUnion) -> Vec<(u32, u32)> {
    union_obj.merged_intervals().iter()
        .map(|iv| (iv.start, iv.end))
        .collect()
}

fn permutations(items: &[(u32, u32)]) -> Vec<Vec<(u32, u32)>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }
    let mut out = Vec::new();
    for (idx, &item) in items.iter().enumerate() {
        let mut rest = items.to_vec();
        rest.remove(idx);
        for mut perm in permutations(&rest) {
            perm.insert(0, item);
            out.push(perm);
        }
    }
    out
}

#[test]
fn add_range_membership() {
    let mut union_obj = Ipv4RangeUnion::new();
    union_obj.add_range("10.0.0.1", "10.0.0.9").unwrap();
    assert!(union_obj.contains_address("10.0.0.1"));
    assert!(union_obj.contains_address("10.0.0.5"));
    assert!(union_obj.contains_address("10.0.0.9"));
    assert!(!union_obj.contains_address("10.0.0.0"));
    assert!(!union_obj.contains_address("10.0.0.10"));
}

#[test]
fn add_range_rejects_malformed_addresses() {
    let mut union_obj = Ipv4RangeUnion::new();
    assert_eq!(union_obj.add_range("10.0.0", "10.0.0.9"),
        Err(AddressError::InvalidAddress));
    assert_eq!(union_obj.add_range("10.0.0.1", "10.0.0.256"),
        Err(AddressError::InvalidAddress));
    assert_eq!(union_obj.add_range("300", "400"),
        Err(AddressError::InvalidAddress));
}

#[test]
fn failed_add_leaves_union_unchanged() {
    let mut union_obj = Ipv4RangeUnion::new();
    union_obj.add_range("10.0.0.1", "10.0.0.9").unwrap();
    let before = merged_pairs(&union_obj);

    union_obj.add_range("10.0.0.20", "not an address").unwrap_err();
    union_obj.add_cidr("10.0.0.0/99").unwrap_err();
    union_obj.add_cidr("no dots here").unwrap_err();

    assert_eq!(merged_pairs(&union_obj), before);
    union_obj.merge();
    assert_eq!(merged_pairs(&union_obj), before);
}

#[test]
fn add_cidr_block_range() {
    let mut union_obj = Ipv4RangeUnion::new();
    union_obj.add_cidr("192.168.1.0/24").unwrap();
    // 192.168.1.0 = 3232235776, /24 covers through 192.168.1.255
    assert_eq!(merged_pairs(&union_obj), vec![(3232235776, 3232236031)]);
    assert!(union_obj.contains_address("192.168.1.0"));
    assert!(union_obj.contains_address("192.168.1.77"));
    assert!(union_obj.contains_address("192.168.1.255"));
    assert!(!union_obj.contains_address("192.168.0.255"));
    assert!(!union_obj.contains_address("192.168.2.0"));
}

#[test]
fn add_cidr_without_prefix_is_single_host() {
    let mut union_obj = Ipv4RangeUnion::new();
    union_obj.add_cidr("10.1.2.3").unwrap();
    assert!(union_obj.contains_address("10.1.2.3"));
    assert!(!union_obj.contains_address("10.1.2.2"));
    assert!(!union_obj.contains_address("10.1.2.4"));
}

#[test]
fn add_cidr_zero_prefix_covers_everything() {
    let mut union_obj = Ipv4RangeUnion::new();
    union_obj.add_cidr("203.0.113.9/0").unwrap();
    assert!(union_obj.contains(0));
    assert!(union_obj.contains(u32::MAX));
    assert!(union_obj.contains_address("8.8.8.8"));
}

#[test]
fn add_cidr_requires_interior_dot() {
    let mut union_obj = Ipv4RangeUnion::new();
    assert_eq!(union_obj.add_cidr(""), Err(AddressError::InvalidAddress));
    assert_eq!(union_obj.add_cidr("1024/24"),
        Err(AddressError::InvalidAddress));
    assert_eq!(union_obj.add_cidr(".1.2.3/8"),
        Err(AddressError::InvalidAddress));
}

#[test]
fn adjacent_cidr_blocks_stay_split() {
    let mut union_obj = Ipv4RangeUnion::new();
    union_obj.add_cidr("10.0.0.0/25").unwrap();
    union_obj.add_cidr("10.0.0.128/25").unwrap();
    // 10.0.0.127 and 10.0.0.128 do not share a value, so the halves are
    // adjacent but not touching under the merge rule
    assert_eq!(union_obj.merged_intervals().len(), 2);
    assert!(union_obj.contains_address("10.0.0.127"));
    assert!(union_obj.contains_address("10.0.0.128"));
}

#[test]
fn overlapping_sources_coalesce() {
    let mut union_obj = Ipv4RangeUnion::new();
    union_obj.add_cidr("192.168.1.0/24").unwrap();
    union_obj.add_range("192.168.1.200", "192.168.2.20").unwrap();
    // Merged upper bound lands at 192.168.2.20 = 3232236052
    assert_eq!(merged_pairs(&union_obj), vec![(3232235776, 3232236052)]);
}

#[test]
fn contains_address_swallows_parse_errors() {
    let mut union_obj = Ipv4RangeUnion::new();
    union_obj.add_range("0.0.0.0", "255.255.255.255").unwrap();
    assert!(union_obj.contains_address("1.2.3.4"));
    assert!(!union_obj.contains_address("not an address"));
    assert!(!union_obj.contains_address("1.2.3"));
    assert!(!union_obj.contains_address(""));
}

#[test]
fn bulk_merge_is_order_independent() {
    let intervals = [(5u32, 10u32), (1, 3), (8, 15), (20, 30)];
    let expected = vec![(1u32, 3u32), (5, 15), (20, 30)];
    for perm in permutations(&intervals) {
        let mut union_obj = Ipv4RangeUnion::new();
        for &(start, end) in &perm {
            union_obj.insert(Interval::new(start, end));
        }
        union_obj.merge();
        assert_eq!(merged_pairs(&union_obj), expected,
            "insertion order {:?}", perm);
    }
}

#[test]
fn incremental_matches_bulk_for_any_order() {
    let intervals = [(5u32, 10u32), (1, 3), (8, 15), (3, 4)];
    for perm in permutations(&intervals) {
        let mut union_obj = Ipv4RangeUnion::new();
        for &(start, end) in &perm {
            union_obj.insert(Interval::new(start, end));
        }
        let incremental = merged_pairs(&union_obj);
        union_obj.merge();
        assert_eq!(merged_pairs(&union_obj), incremental,
            "insertion order {:?}", perm);
    }
}

#[test]
fn merged_view_as_collection() {
    let mut union_obj = Ipv4RangeUnion::new();
    union_obj.add_cidr("10.0.0.0/30").unwrap();
    union_obj.add_range("10.0.0.8", "10.0.0.11").unwrap();
    let ranges: Vec<RangeInclusive<u32>> = union_obj.to_collection();
    assert_eq!(ranges, vec![167772160..=167772163, 167772168..=167772171]);
}
