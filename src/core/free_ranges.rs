use crate::core::address_range::AddressRange;
use crate::core::address_tree::{AddressTree, Coalesce};
use crate::core::errors::{Error, Result};
use crate::core::inventory::{Subnet, Vpc};
use log::{debug, warn};
use std::collections::{HashMap, HashSet};

/*-------------------------------------------------------------------------------------------------
  Free Ranges Calculator
-------------------------------------------------------------------------------------------------*/

/// Free address ranges of one VPC CIDR block plus the subnet CIDRs that could
/// not be marked.
#[derive(Debug, Default)]
pub struct FreeRanges {
    /// Free ranges, lowest address first.
    pub free: Vec<AddressRange>,

    /// One error per subnet CIDR that was skipped.
    pub errors: Vec<Error>,
}

/// Calculate the free ranges of `vpc_cidr` after allocating `subnet_cidrs`.
///
/// Subnet CIDRs that do not parse, or that lie outside `vpc_cidr`, are skipped
/// and reported in [FreeRanges::errors]; the remaining subnets are still
/// applied. Fails only when `vpc_cidr` itself is invalid.
///
/// ```
/// let free = awsnetaudit::free_ranges::calculate(
///     "10.0.0.0/24",
///     ["10.0.0.128/25", "not-a-cidr"],
///     awsnetaudit::Coalesce::Preserve,
/// )
/// .unwrap();
///
/// let expected: awsnetaudit::AddressRange = "10.0.0.0/25".parse().unwrap();
/// assert_eq!(free.free, vec![expected]);
/// assert_eq!(free.errors.len(), 1);
/// ```
pub fn calculate<I, S>(vpc_cidr: &str, subnet_cidrs: I, coalesce: Coalesce) -> Result<FreeRanges>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tree = AddressTree::new(vpc_cidr)?.with_coalesce(coalesce);

    let errors: Vec<Error> = subnet_cidrs
        .into_iter()
        .filter_map(|cidr| tree.mark_used_cidr(cidr.as_ref()).err())
        .collect();

    Ok(FreeRanges {
        free: tree.unused_ranges(),
        errors,
    })
}

/*-------------------------------------------------------------------------------------------------
  Free Ranges Report
-------------------------------------------------------------------------------------------------*/

/// Options applied when building a [FreeRangesReport].
#[derive(Clone, Debug, Default)]
pub struct ReportOptions {
    /// Reporting mode for subdivided free space.
    pub coalesce: Coalesce,

    /// Restrict the report to these VPC IDs (case-insensitive); empty means
    /// all VPCs.
    pub vpc_ids: Vec<String>,
}

/// Report row: the free ranges of one VPC CIDR block.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VpcFreeRanges {
    pub vpc_id: String,
    pub vpc_name: String,
    pub vpc_cidr: AddressRange,

    /// Number of distinct subnet ranges allocated in this CIDR block. A
    /// subnet listed more than once is counted once.
    pub subnet_count: usize,

    pub free_ranges: Vec<AddressRange>,
}

impl VpcFreeRanges {
    /// Total number of free addresses in the block.
    pub fn free_addresses(&self) -> u128 {
        self.free_ranges
            .iter()
            .fold(0u128, |total, range| total.saturating_add(range.size()))
    }
}

/// A VPC left out of the report because its primary CIDR block is invalid.
#[derive(Debug)]
pub struct SkippedVpc {
    pub vpc_id: String,
    pub error: Error,
}

/// A subnet that could not be marked in its VPC.
#[derive(Debug)]
pub struct SkippedSubnet {
    pub subnet_id: String,
    pub vpc_id: String,
    pub error: Error,
}

/// Free ranges of every VPC CIDR block, in inventory order, plus the records
/// that had to be skipped.
#[derive(Debug, Default)]
pub struct FreeRangesReport {
    pub rows: Vec<VpcFreeRanges>,
    pub skipped_vpcs: Vec<SkippedVpc>,
    pub skipped_subnets: Vec<SkippedSubnet>,
}

impl FreeRangesReport {
    /// Number of distinct VPCs with at least one row.
    pub fn vpc_count(&self) -> usize {
        let mut vpc_ids: Vec<&str> = self.rows.iter().map(|row| row.vpc_id.as_str()).collect();
        vpc_ids.dedup();
        vpc_ids.len()
    }

    /// Number of free ranges across all rows.
    pub fn free_range_count(&self) -> usize {
        self.rows.iter().map(|row| row.free_ranges.len()).sum()
    }
}

/// Build the free-range report for `vpcs` from the allocated `subnets`.
///
/// One address tree is built per VPC CIDR block (the primary block and every
/// other associated block). Each subnet is marked in the block that contains
/// it. Invalid or out-of-bounds subnets are recorded in
/// [FreeRangesReport::skipped_subnets] and do not affect the rest of their
/// VPC; a VPC whose primary block is invalid is recorded in
/// [FreeRangesReport::skipped_vpcs].
pub fn report(vpcs: &[Vpc], subnets: &[Subnet], options: &ReportOptions) -> FreeRangesReport {
    let mut subnets_by_vpc: HashMap<&str, Vec<&Subnet>> = HashMap::new();
    for subnet in subnets {
        subnets_by_vpc
            .entry(subnet.vpc_id.as_str())
            .or_default()
            .push(subnet);
    }

    let mut report = FreeRangesReport::default();

    for vpc in vpcs.iter().filter(|vpc| includes_vpc(&options.vpc_ids, &vpc.vpc_id)) {
        let vpc_subnets = subnets_by_vpc
            .get(vpc.vpc_id.as_str())
            .map(Vec::as_slice)
            .unwrap_or_default();

        let mut trees = match build_trees(vpc, options.coalesce) {
            Ok(trees) => trees,
            Err(error) => {
                report.skipped_vpcs.push(SkippedVpc {
                    vpc_id: vpc.vpc_id.clone(),
                    error,
                });
                continue;
            }
        };
        let mut allocated: Vec<HashSet<AddressRange>> = vec![HashSet::new(); trees.len()];

        for subnet in vpc_subnets {
            match mark_subnet(&mut trees, subnet) {
                Ok((index, range)) => {
                    allocated[index].insert(range);
                }
                Err(error) => report.skipped_subnets.push(SkippedSubnet {
                    subnet_id: subnet.subnet_id.clone(),
                    vpc_id: vpc.vpc_id.clone(),
                    error,
                }),
            }
        }

        for (tree, subnet_count) in trees.iter().zip(allocated.iter().map(HashSet::len)) {
            debug!(
                "{} {}: {} subnet(s) allocated",
                vpc.vpc_id,
                tree.range(),
                subnet_count
            );
            report.rows.push(VpcFreeRanges {
                vpc_id: vpc.vpc_id.clone(),
                vpc_name: vpc.name().to_string(),
                vpc_cidr: *tree.range(),
                subnet_count,
                free_ranges: tree.unused_ranges(),
            });
        }
    }

    report
}

/*-------------------------------------------------------------------------------------------------
  Helper Functions
-------------------------------------------------------------------------------------------------*/

/// `true` when `vpc_ids` is empty or names `vpc_id` (case-insensitive).
pub(crate) fn includes_vpc(vpc_ids: &[String], vpc_id: &str) -> bool {
    vpc_ids.is_empty()
        || vpc_ids
            .iter()
            .any(|included| included.eq_ignore_ascii_case(vpc_id))
}

/// One tree per VPC CIDR block; the primary block comes first. Secondary blocks
/// that fail to parse are skipped with a warning.
fn build_trees(vpc: &Vpc, coalesce: Coalesce) -> Result<Vec<AddressTree>> {
    let cidr_blocks = vpc.cidr_blocks();
    let primary = AddressTree::new(cidr_blocks[0])?.with_coalesce(coalesce);

    let mut trees = vec![primary];
    for cidr_block in &cidr_blocks[1..] {
        match AddressTree::new(cidr_block) {
            Ok(tree) => {
                if trees.iter().any(|existing| existing.range() == tree.range()) {
                    continue;
                }
                trees.push(tree.with_coalesce(coalesce));
            }
            Err(error) => warn!("{}: skipping secondary CIDR block: {}", vpc.vpc_id, error),
        }
    }

    Ok(trees)
}

/// Mark `subnet` in the tree whose range contains it, falling back to the
/// primary tree. Returns the index of the tree that was marked and the range.
fn mark_subnet(trees: &mut [AddressTree], subnet: &Subnet) -> Result<(usize, AddressRange)> {
    let range: AddressRange = subnet.cidr_block.parse()?;
    let index = trees
        .iter()
        .position(|tree| tree.range().contains(&range))
        .unwrap_or(0);

    trees[index].mark_used(&range)?;
    Ok((index, range))
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::inventory::tests::{test_subnet, test_vpc};
    use crate::core::inventory::CidrBlockAssociation;

    /*----------------------------------------------------------------------------------
      Test Helper Functions
    ----------------------------------------------------------------------------------*/

    fn cidrs(ranges: &[AddressRange]) -> Vec<String> {
        ranges.iter().map(|range| range.to_string()).collect()
    }

    /*----------------------------------------------------------------------------------
      Calculate
    ----------------------------------------------------------------------------------*/

    #[test]
    fn test_calculate() {
        let free = calculate(
            "10.0.0.0/16",
            ["10.0.0.0/24", "10.0.1.0/24"],
            Coalesce::Preserve,
        )
        .unwrap();

        assert!(free.errors.is_empty());
        assert_eq!(free.free.first().unwrap().to_string(), "10.0.2.0/23");
        assert_eq!(free.free.last().unwrap().to_string(), "10.0.128.0/17");
        assert_eq!(free.free.len(), 7);
    }

    #[test]
    fn test_calculate_skips_invalid_subnet() {
        let free = calculate(
            "10.0.0.0/24",
            ["10.0.0.0/26", "not-a-cidr", "10.0.0.64/26"],
            Coalesce::Preserve,
        )
        .unwrap();

        assert_eq!(cidrs(&free.free), vec!["10.0.0.128/25"]);
        assert_eq!(free.errors.len(), 1);
        assert!(matches!(free.errors[0], Error::InvalidCidr { .. }));
    }

    #[test]
    fn test_calculate_skips_out_of_bounds_subnet() {
        let free = calculate(
            "10.0.0.0/24",
            ["192.168.0.0/24", "10.0.0.0/25"],
            Coalesce::Preserve,
        )
        .unwrap();

        assert_eq!(cidrs(&free.free), vec!["10.0.0.128/25"]);
        assert!(matches!(free.errors[0], Error::RangeOutOfBounds { .. }));
    }

    #[test]
    fn test_calculate_invalid_vpc() {
        let result = calculate("10.0.0/99", Vec::<String>::new(), Coalesce::Preserve);
        assert!(matches!(result, Err(Error::InvalidCidr { .. })));
    }

    /*----------------------------------------------------------------------------------
      Report
    ----------------------------------------------------------------------------------*/

    #[test]
    fn test_report() {
        let vpcs = vec![
            test_vpc("vpc-1", "10.0.0.0/24"),
            test_vpc("vpc-2", "10.1.0.0/24"),
        ];
        let subnets = vec![
            test_subnet("subnet-1", "vpc-1", "10.0.0.128/25"),
            test_subnet("subnet-2", "vpc-2", "10.1.0.0/24"),
            test_subnet("subnet-3", "vpc-unknown", "10.9.0.0/24"),
        ];

        let report = report(&vpcs, &subnets, &ReportOptions::default());

        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0].vpc_id, "vpc-1");
        assert_eq!(report.rows[0].vpc_name, "vpc-1");
        assert_eq!(report.rows[0].subnet_count, 1);
        assert_eq!(cidrs(&report.rows[0].free_ranges), vec!["10.0.0.0/25"]);
        assert_eq!(report.rows[0].free_addresses(), 128);

        assert_eq!(report.rows[1].subnet_count, 1);
        assert!(report.rows[1].free_ranges.is_empty());

        assert!(report.skipped_vpcs.is_empty());
        assert!(report.skipped_subnets.is_empty());
        assert_eq!(report.vpc_count(), 2);
        assert_eq!(report.free_range_count(), 1);
    }

    #[test]
    fn test_report_counts_repeated_subnet_once() {
        let vpcs = vec![test_vpc("vpc-1", "10.0.0.0/24")];
        let subnets = vec![
            test_subnet("subnet-1", "vpc-1", "10.0.0.128/25"),
            test_subnet("subnet-1", "vpc-1", "10.0.0.128/25"),
            test_subnet("subnet-2", "vpc-1", "10.0.0.0/26"),
        ];

        let report = report(&vpcs, &subnets, &ReportOptions::default());

        assert_eq!(report.rows[0].subnet_count, 2);
        assert_eq!(cidrs(&report.rows[0].free_ranges), vec!["10.0.0.64/26"]);
        assert!(report.skipped_subnets.is_empty());
    }

    #[test]
    fn test_report_vpc_without_subnets() {
        let vpcs = vec![test_vpc("vpc-1", "10.0.0.0/16")];
        let report = report(&vpcs, &[], &ReportOptions::default());
        assert_eq!(cidrs(&report.rows[0].free_ranges), vec!["10.0.0.0/16"]);
    }

    #[test]
    fn test_report_skips_invalid_records() {
        let vpcs = vec![
            test_vpc("vpc-bad", "10.300.0.0/16"),
            test_vpc("vpc-1", "10.0.0.0/24"),
        ];
        let subnets = vec![
            test_subnet("subnet-bad", "vpc-1", "not-a-cidr"),
            test_subnet("subnet-outside", "vpc-1", "192.168.0.0/24"),
            test_subnet("subnet-1", "vpc-1", "10.0.0.128/25"),
            test_subnet("subnet-2", "vpc-bad", "10.300.1.0/24"),
        ];

        let report = report(&vpcs, &subnets, &ReportOptions::default());

        assert_eq!(report.rows.len(), 1);
        assert_eq!(cidrs(&report.rows[0].free_ranges), vec!["10.0.0.0/25"]);

        assert_eq!(report.skipped_vpcs.len(), 1);
        assert_eq!(report.skipped_vpcs[0].vpc_id, "vpc-bad");
        assert!(matches!(
            report.skipped_vpcs[0].error,
            Error::InvalidCidr { .. }
        ));

        assert_eq!(report.skipped_subnets.len(), 2);
        assert_eq!(report.skipped_subnets[0].subnet_id, "subnet-bad");
        assert!(matches!(
            report.skipped_subnets[0].error,
            Error::InvalidCidr { .. }
        ));
        assert_eq!(report.skipped_subnets[1].subnet_id, "subnet-outside");
        assert!(matches!(
            report.skipped_subnets[1].error,
            Error::RangeOutOfBounds { .. }
        ));
    }

    #[test]
    fn test_report_secondary_cidr_blocks() {
        let vpc = Vpc {
            cidr_block_associations: vec![
                CidrBlockAssociation {
                    cidr_block: "10.2.0.0/16".to_string(),
                    state: Some("associated".to_string()),
                },
                CidrBlockAssociation {
                    cidr_block: "100.64.0.0/24".to_string(),
                    state: Some("associated".to_string()),
                },
                CidrBlockAssociation {
                    cidr_block: "bogus".to_string(),
                    state: Some("associated".to_string()),
                },
            ],
            ..test_vpc("vpc-1", "10.2.0.0/16")
        };
        let subnets = vec![test_subnet("subnet-1", "vpc-1", "100.64.0.0/26")];

        let report = report(&[vpc], &subnets, &ReportOptions::default());

        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0].vpc_cidr.to_string(), "10.2.0.0/16");
        assert_eq!(report.rows[0].subnet_count, 0);
        assert_eq!(cidrs(&report.rows[0].free_ranges), vec!["10.2.0.0/16"]);

        assert_eq!(report.rows[1].vpc_cidr.to_string(), "100.64.0.0/24");
        assert_eq!(report.rows[1].subnet_count, 1);
        assert_eq!(
            cidrs(&report.rows[1].free_ranges),
            vec!["100.64.0.64/26", "100.64.0.128/25"]
        );
        assert_eq!(report.vpc_count(), 1);
    }

    #[test]
    fn test_report_vpc_filter() {
        let vpcs = vec![
            test_vpc("vpc-1", "10.0.0.0/24"),
            test_vpc("vpc-2", "10.1.0.0/24"),
        ];
        let options = ReportOptions {
            vpc_ids: vec!["VPC-2".to_string()],
            ..Default::default()
        };

        let report = report(&vpcs, &[], &options);
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].vpc_id, "vpc-2");
    }
}
