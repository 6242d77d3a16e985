//! Property-based tests for the address tree.
//!
//! Random VPC blocks are populated with random non-overlapping subnets and the
//! free ranges are checked against the allocation.

use awsnetaudit::{AddressRange, AddressTree, Coalesce};
use proptest::prelude::*;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/*-------------------------------------------------------------------------------------------------
  Strategies
-------------------------------------------------------------------------------------------------*/

fn overlaps(a: &AddressRange, b: &AddressRange) -> bool {
    a.contains(b) || b.contains(a)
}

fn ipv4_network(base: u32, prefix: u8) -> AddressRange {
    AddressRange::new(IpAddr::V4(Ipv4Addr::from(base)), prefix).unwrap()
}

/// A VPC block and a set of non-overlapping subnets inside it.
fn vpc_and_subnets() -> impl Strategy<Value = (AddressRange, Vec<AddressRange>)> {
    (
        any::<u32>(),
        8u8..=28,
        prop::collection::vec((0u8..=8, any::<u32>()), 0..24),
    )
        .prop_map(|(base, vpc_prefix, candidates)| {
            let vpc = ipv4_network(base, vpc_prefix);
            let vpc_base = match vpc.network() {
                IpAddr::V4(addr) => u32::from(addr),
                IpAddr::V6(_) => unreachable!(),
            };
            let host_mask = u32::MAX >> vpc_prefix;

            let mut subnets: Vec<AddressRange> = Vec::new();
            for (extra, offset) in candidates {
                let prefix = (vpc_prefix + extra).min(32);
                let subnet = ipv4_network(vpc_base | (offset & host_mask), prefix);
                if !subnets.iter().any(|existing| overlaps(existing, &subnet)) {
                    subnets.push(subnet);
                }
            }

            (vpc, subnets)
        })
}

fn build_tree(vpc: AddressRange, subnets: &[AddressRange], coalesce: Coalesce) -> AddressTree {
    let mut tree = AddressTree::from_range(vpc).with_coalesce(coalesce);
    for subnet in subnets {
        tree.mark_used(subnet).unwrap();
    }
    tree
}

/*-------------------------------------------------------------------------------------------------
  Properties
-------------------------------------------------------------------------------------------------*/

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn free_ranges_and_subnets_partition_the_vpc((vpc, subnets) in vpc_and_subnets()) {
        let tree = build_tree(vpc, &subnets, Coalesce::Preserve);
        let free = tree.unused_ranges();

        let mut blocks: Vec<AddressRange> = free.iter().chain(subnets.iter()).copied().collect();
        for block in &blocks {
            prop_assert!(vpc.contains(block), "{} is outside of {}", block, vpc);
        }

        let total: u128 = blocks.iter().map(AddressRange::size).sum();
        prop_assert_eq!(total, vpc.size());

        blocks.sort();
        for pair in blocks.windows(2) {
            prop_assert!(!overlaps(&pair[0], &pair[1]), "{} overlaps {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn free_ranges_avoid_every_subnet((vpc, subnets) in vpc_and_subnets()) {
        let tree = build_tree(vpc, &subnets, Coalesce::Preserve);
        for free in tree.unused_ranges() {
            for subnet in &subnets {
                prop_assert!(!overlaps(&free, subnet), "{} overlaps subnet {}", free, subnet);
            }
        }
    }

    #[test]
    fn marking_twice_is_idempotent((vpc, subnets) in vpc_and_subnets()) {
        let once = build_tree(vpc, &subnets, Coalesce::Preserve);

        let mut twice = build_tree(vpc, &subnets, Coalesce::Preserve);
        for subnet in &subnets {
            twice.mark_used(subnet).unwrap();
        }

        prop_assert_eq!(once.unused_ranges(), twice.unused_ranges());
    }

    #[test]
    fn merge_matches_preserve_after_marks_only((vpc, subnets) in vpc_and_subnets()) {
        let preserve = build_tree(vpc, &subnets, Coalesce::Preserve);
        let merge = build_tree(vpc, &subnets, Coalesce::Merge);
        prop_assert_eq!(preserve.unused_ranges(), merge.unused_ranges());
    }

    #[test]
    fn ipv4_cidr_round_trip(base in any::<u32>(), prefix in 0u8..=32) {
        let range = ipv4_network(base, prefix);
        let parsed: AddressRange = range.to_string().parse().unwrap();
        prop_assert_eq!(parsed, range);
    }

    #[test]
    fn ipv6_cidr_round_trip(base in any::<u128>(), prefix in 0u8..=128) {
        let range = AddressRange::new(IpAddr::V6(Ipv6Addr::from(base)), prefix).unwrap();
        let parsed: AddressRange = range.to_string().parse().unwrap();
        prop_assert_eq!(parsed, range);
    }
}
