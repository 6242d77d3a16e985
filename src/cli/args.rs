use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/*-------------------------------------------------------------------------------------------------
  Command Line Interface (CLI) Arguments
-------------------------------------------------------------------------------------------------*/

#[derive(Parser, Debug)]
#[command(author, version, about="Audit AWS VPC address space.", long_about = None)]
pub struct Args {
    /// Audit to run
    #[command(subcommand)]
    pub command: Command,

    /// Read VPCs and subnets from this JSON inventory file instead of the AWS CLI
    #[arg(short = 'i', long, global = true)]
    pub inventory: Option<PathBuf>,

    /// Save the VPC and subnet inventory to this JSON file
    #[arg(long, global = true)]
    pub save_inventory: Option<PathBuf>,

    /// AWS CLI named profile
    #[arg(long, global = true)]
    pub profile: Option<String>,

    /// AWS region
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Only include these VPCs
    #[arg(long = "vpc", global = true)]
    pub vpc_ids: Vec<String>,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub output: OutputFormat,

    /// Save the report to a CSV file
    #[arg(long = "csv", global = true)]
    pub csv_file: Option<PathBuf>,

    /// Logging verbosity
    #[command(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity,
}

/*--------------------------------------------------------------------------------------
  Commands
--------------------------------------------------------------------------------------*/

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Free CIDR ranges available for new subnets in each VPC
    FreeRanges(FreeRangesArgs),

    /// Subnets with no allocated IP addresses
    EmptySubnets,
}

#[derive(ClapArgs, Debug, Default)]
pub struct FreeRangesArgs {
    /// Report a subdivided block as one range when all of it is free
    #[arg(long)]
    pub merge_free: bool,
}

/*--------------------------------------------------------------------------------------
  Output Format
--------------------------------------------------------------------------------------*/

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Table of report rows
    #[default]
    Table,

    /// List of (RFC4632) CIDR-format prefixes
    Cidr,

    /// List of IP networks in network mask format (n.n.n.n m.m.m.m)
    Netmask,
}
