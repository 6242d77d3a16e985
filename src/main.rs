use awsnetaudit::{empty_subnets, free_ranges, Result};
use clap::Parser;
use log::error;
use std::process::ExitCode;

mod cli;

use cli::{Command, OutputFormat};

/*-------------------------------------------------------------------------------------------------
  Main
-------------------------------------------------------------------------------------------------*/

fn main() -> ExitCode {
    let args = cli::Args::parse();

    if let Err(error) = stderrlog::new()
        .module(module_path!())
        .verbosity(args.verbose.log_level_filter())
        .init()
    {
        eprintln!("Unable to initialize logging: {error}");
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!("{error}");
            ExitCode::from(2)
        }
    }
}

fn run(args: &cli::Args) -> Result<()> {
    let inventory = cli::get_inventory(args)?;

    match &args.command {
        Command::FreeRanges(_) => {
            let options = cli::report_options(args);
            let report = free_ranges::report(&inventory.vpcs, &inventory.subnets, &options);

            cli::log::free_ranges_report(&report);

            let free_ranges = report.rows.iter().flat_map(|row| row.free_ranges.iter());
            match args.output {
                OutputFormat::Table => cli::output::free_ranges_table(&report),
                OutputFormat::Cidr => cli::output::ranges_in_cidr_format(free_ranges),
                OutputFormat::Netmask => cli::output::ranges_in_netmask_format(free_ranges),
            }

            if let Some(path) = &args.csv_file {
                cli::csv::save_free_ranges(&report, path)?;
            }
        }

        Command::EmptySubnets => {
            let empty = empty_subnets::report(&inventory.subnets, &args.vpc_ids);

            cli::log::empty_subnets_report(&empty);

            let cidrs = empty.iter().map(|subnet| &subnet.cidr);
            match args.output {
                OutputFormat::Table => cli::output::empty_subnets_table(&empty),
                OutputFormat::Cidr => cli::output::ranges_in_cidr_format(cidrs),
                OutputFormat::Netmask => cli::output::ranges_in_netmask_format(cidrs),
            }

            if let Some(path) = &args.csv_file {
                cli::csv::save_empty_subnets(&empty, path)?;
            }
        }
    }

    Ok(())
}
