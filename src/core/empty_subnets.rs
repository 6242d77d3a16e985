use crate::core::address_range::AddressRange;
use crate::core::errors::Result;
use crate::core::free_ranges::includes_vpc;
use crate::core::inventory::Subnet;

/*-------------------------------------------------------------------------------------------------
  Empty Subnets
-------------------------------------------------------------------------------------------------*/

/// Addresses AWS reserves in every subnet (network, VPC router, DNS, future
/// use and broadcast).
pub const AWS_RESERVED_ADDRESSES: u128 = 5;

/// Report row for a subnet with no allocated addresses.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmptySubnet {
    pub subnet_id: String,
    pub name: String,
    pub vpc_id: String,
    pub cidr: AddressRange,
    pub available_addresses: u64,
    pub subnet_size: u128,
    pub state: String,
}

/// Number of addresses in the `cidr` network.
pub fn subnet_size(cidr: &str) -> Result<u128> {
    Ok(cidr.parse::<AddressRange>()?.size())
}

/// A subnet is empty when every address except the AWS-reserved ones is
/// available. Subnets with an unparseable CIDR or no reported count are never
/// considered empty.
pub fn is_subnet_empty(subnet: &Subnet) -> bool {
    let (Ok(size), Some(available)) = (
        subnet_size(&subnet.cidr_block),
        subnet.available_ip_address_count,
    ) else {
        return false;
    };

    size.checked_sub(AWS_RESERVED_ADDRESSES) == Some(u128::from(available))
}

/// Empty subnets, in inventory order, optionally restricted to `vpc_ids`.
pub fn report(subnets: &[Subnet], vpc_ids: &[String]) -> Vec<EmptySubnet> {
    subnets
        .iter()
        .filter(|subnet| includes_vpc(vpc_ids, &subnet.vpc_id))
        .filter(|subnet| is_subnet_empty(subnet))
        .filter_map(|subnet| {
            let cidr: AddressRange = subnet.cidr_block.parse().ok()?;
            Some(EmptySubnet {
                subnet_id: subnet.subnet_id.clone(),
                name: subnet.name().to_string(),
                vpc_id: subnet.vpc_id.clone(),
                cidr,
                available_addresses: subnet.available_ip_address_count.unwrap_or_default(),
                subnet_size: cidr.size(),
                state: subnet.state.clone().unwrap_or_default(),
            })
        })
        .collect()
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
