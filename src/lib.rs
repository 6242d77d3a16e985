//! Audit the address space of AWS VPCs.
//!
//! The heart of the crate is [AddressTree], a binary subdivision tree over a
//! VPC's CIDR block. Subnets are marked as used and the tree reports the free
//! blocks that remain available for new subnets:
//!
//! ```
//! let free = awsnetaudit::free_ranges::calculate(
//!     "10.0.0.0/16",
//!     ["10.0.0.0/24", "10.0.1.0/24"],
//!     awsnetaudit::Coalesce::Preserve,
//! )?;
//!
//! assert_eq!(free.free[0].to_string(), "10.0.2.0/23");
//! # Ok::<(), awsnetaudit::Error>(())
//! ```
//!
//! VPC and subnet records come from an [InventoryProvider]: the AWS CLI backed
//! [Client], or an [Inventory] snapshot loaded from JSON.

/*-------------------------------------------------------------------------------------------------
  Modules
-------------------------------------------------------------------------------------------------*/

mod core;

/*-------------------------------------------------------------------------------------------------
  Library Interface
-------------------------------------------------------------------------------------------------*/

pub use crate::core::address_range::AddressRange;
pub use crate::core::address_tree::{AddressTree, Coalesce, Node};
pub use crate::core::client::{Client, ClientBuilder};
pub use crate::core::empty_subnets;
pub use crate::core::errors::{Error, Result};
pub use crate::core::free_ranges;
pub use crate::core::inventory::{
    tag_value, CidrBlockAssociation, Inventory, InventoryProvider, Subnet, Tag, Vpc,
};
pub use crate::core::prefix_type::PrefixType;

// Re-export ipnetwork
pub use ipnetwork;
