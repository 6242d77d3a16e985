use awsnetaudit::empty_subnets::EmptySubnet;
use awsnetaudit::free_ranges::FreeRangesReport;
use awsnetaudit::AddressRange;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::{NOTHING, UTF8_FULL};
use comfy_table::*;

/*-------------------------------------------------------------------------------------------------
  Output Functions
-------------------------------------------------------------------------------------------------*/

fn new_table<const COUNT: usize>(headers: [&str; COUNT]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(headers.map(|header| {
        Cell::new(header)
            .add_attribute(Attribute::Bold)
            .fg(Color::Green)
    }));

    table
}

fn print_summary(rows: &[(usize, &str)]) {
    let mut summary_table = Table::new();
    summary_table
        .load_preset(NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic);

    for (count, label) in rows {
        summary_table.add_row(vec![Cell::new(count), Cell::new(label)]);
    }

    if let Some(column) = summary_table.column_mut(0) {
        column.set_cell_alignment(CellAlignment::Right);
    }

    println!("{summary_table}");
}

/*--------------------------------------------------------------------------------------
  Free Ranges Table
--------------------------------------------------------------------------------------*/

pub fn free_ranges_table(report: &FreeRangesReport) {
    let mut table = new_table(["VPC ID", "VPC Name", "VPC CIDR", "Available Subnets"]);

    for row in &report.rows {
        let available_subnets = row
            .free_ranges
            .iter()
            .map(|range| range.to_string())
            .collect::<Vec<String>>()
            .join("\n");

        table.add_row(vec![
            Cell::new(&row.vpc_id).add_attribute(Attribute::Bold),
            Cell::new(&row.vpc_name),
            Cell::new(row.vpc_cidr),
            Cell::new(available_subnets),
        ]);
    }

    println!("{table}");

    print_summary(&[
        (report.vpc_count(), "VPCs"),
        (report.rows.len(), "VPC CIDR Blocks"),
        (report.free_range_count(), "Free Ranges"),
        (report.skipped_vpcs.len(), "Skipped VPCs"),
        (report.skipped_subnets.len(), "Skipped Subnets"),
    ]);
}

/*--------------------------------------------------------------------------------------
  Empty Subnets Table
--------------------------------------------------------------------------------------*/

pub fn empty_subnets_table(empty_subnets: &[EmptySubnet]) {
    let mut table = new_table([
        "ID",
        "Name",
        "CIDR",
        "Available IPs",
        "Subnet Size",
        "State",
        "VPC ID",
    ]);

    for subnet in empty_subnets {
        table.add_row(vec![
            Cell::new(&subnet.subnet_id).add_attribute(Attribute::Bold),
            Cell::new(&subnet.name),
            Cell::new(subnet.cidr),
            Cell::new(subnet.available_addresses),
            Cell::new(subnet.subnet_size),
            Cell::new(&subnet.state),
            Cell::new(&subnet.vpc_id),
        ]);
    }

    // Right-align the numeric columns
    for index in [3, 4] {
        if let Some(column) = table.column_mut(index) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }

    println!("{table}");

    print_summary(&[(empty_subnets.len(), "Empty Subnets")]);
}

/*--------------------------------------------------------------------------------------
  Ranges In CIDR Format
--------------------------------------------------------------------------------------*/

pub fn ranges_in_cidr_format<'r>(ranges: impl IntoIterator<Item = &'r AddressRange>) {
    for range in ranges {
        println!("{range}");
    }
}

/*--------------------------------------------------------------------------------------
  Ranges In Netmask Format
--------------------------------------------------------------------------------------*/

pub fn ranges_in_netmask_format<'r>(ranges: impl IntoIterator<Item = &'r AddressRange>) {
    for range in ranges {
        println!("{} {}", range.network(), range.mask());
    }
}
