use crate::cli::{self, Command};
use awsnetaudit::free_ranges::ReportOptions;
use awsnetaudit::{ClientBuilder, Coalesce, Inventory, Result};
use log::info;

/*-------------------------------------------------------------------------------------------------
  Core functions
-------------------------------------------------------------------------------------------------*/

/*--------------------------------------------------------------------------------------
  Build the AWS CLI client from CLI arguments
--------------------------------------------------------------------------------------*/

pub fn build_client(args: &cli::Args) -> awsnetaudit::Client {
    let mut builder = ClientBuilder::new();
    if let Some(profile) = &args.profile {
        builder.profile(profile);
    }
    if let Some(region) = &args.region {
        builder.region(region);
    }
    builder.build()
}

/*--------------------------------------------------------------------------------------
  Load or fetch the VPC and subnet inventory
--------------------------------------------------------------------------------------*/

pub fn get_inventory(args: &cli::Args) -> Result<Inventory> {
    let inventory = match &args.inventory {
        Some(path) => Inventory::from_file(path)?,
        None => Inventory::fetch(&build_client(args))?,
    };

    info!(
        "Inventory contains {} VPC(s) and {} subnet(s)",
        inventory.vpcs.len(),
        inventory.subnets.len()
    );

    if let Some(path) = &args.save_inventory {
        inventory.save(path)?;
    }

    Ok(inventory)
}

/*--------------------------------------------------------------------------------------
  Build the free-range report options from CLI arguments
--------------------------------------------------------------------------------------*/

pub fn report_options(args: &cli::Args) -> ReportOptions {
    let coalesce = match &args.command {
        Command::FreeRanges(free_ranges_args) if free_ranges_args.merge_free => Coalesce::Merge,
        _ => Coalesce::Preserve,
    };

    ReportOptions {
        coalesce,
        vpc_ids: args.vpc_ids.clone(),
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
