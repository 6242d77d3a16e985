use awsnetaudit::empty_subnets::EmptySubnet;
use awsnetaudit::free_ranges::FreeRangesReport;
use log::{error, info};

/*-------------------------------------------------------------------------------------------------
  Logging Functions
-------------------------------------------------------------------------------------------------*/

/*--------------------------------------------------------------------------------------
  Free Ranges Report
--------------------------------------------------------------------------------------*/

pub fn free_ranges_report(report: &FreeRangesReport) {
    for skipped in &report.skipped_vpcs {
        error!("Skipped VPC {}: {}", skipped.vpc_id, skipped.error);
    }

    for skipped in &report.skipped_subnets {
        error!(
            "Skipped subnet {} in VPC {}: {}",
            skipped.subnet_id, skipped.vpc_id, skipped.error
        );
    }

    let vpc_count = report.vpc_count();
    let free_range_count = report.free_range_count();
    info!("Found {free_range_count} free range(s) in {vpc_count} VPC(s)");

    let skipped_count = report.skipped_vpcs.len() + report.skipped_subnets.len();
    if skipped_count > 0 {
        info!("Skipped {skipped_count} record(s)");
    }
}

/*--------------------------------------------------------------------------------------
  Empty Subnets Report
--------------------------------------------------------------------------------------*/

pub fn empty_subnets_report(empty_subnets: &[EmptySubnet]) {
    let count_empty_subnets = empty_subnets.len();
    info!("Found {count_empty_subnets} empty subnet(s)");
}
