/*-------------------------------------------------------------------------------------------------
  Core Modules
-------------------------------------------------------------------------------------------------*/

pub mod address_range;
pub mod address_tree;
pub mod client;
pub mod empty_subnets;
pub mod errors;
pub mod free_ranges;
pub mod inventory;
pub mod json;
pub mod prefix_type;
