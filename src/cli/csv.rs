use awsnetaudit::empty_subnets::EmptySubnet;
use awsnetaudit::free_ranges::FreeRangesReport;
use awsnetaudit::Result;
use std::path::Path;

/*-------------------------------------------------------------------------------------------------
  Save Reports to CSV Files
-------------------------------------------------------------------------------------------------*/

/*--------------------------------------------------------------------------------------
  Free Ranges
--------------------------------------------------------------------------------------*/

pub fn save_free_ranges(report: &FreeRangesReport, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    // Write header
    writer.serialize(["VPC ID", "VPC Name", "VPC CIDR", "Free Range", "Addresses"])?;

    // Write one record per free range
    for row in &report.rows {
        for free_range in &row.free_ranges {
            let record = (
                &row.vpc_id,
                &row.vpc_name,
                row.vpc_cidr,
                free_range,
                free_range.size().to_string(),
            );
            writer.serialize(record)?;
        }
    }

    writer.flush()?;

    Ok(())
}

/*--------------------------------------------------------------------------------------
  Empty Subnets
--------------------------------------------------------------------------------------*/

pub fn save_empty_subnets(empty_subnets: &[EmptySubnet], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    // Write header
    writer.serialize([
        "ID",
        "Name",
        "CIDR",
        "Available IPs",
        "Subnet Size",
        "State",
        "VPC ID",
    ])?;

    // Write subnet records
    for subnet in empty_subnets {
        let record = (
            &subnet.subnet_id,
            &subnet.name,
            subnet.cidr,
            subnet.available_addresses,
            subnet.subnet_size.to_string(),
            &subnet.state,
            &subnet.vpc_id,
        );
        writer.serialize(record)?;
    }

    writer.flush()?;

    Ok(())
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
