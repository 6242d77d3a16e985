use crate::core::errors::{Error, Result};
use crate::core::prefix_type::PrefixType;
use ipnetwork::IpNetwork;
use serde::{Serialize, Serializer};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/*-------------------------------------------------------------------------------------------------
  Address Range
-------------------------------------------------------------------------------------------------*/

/// An IPv4 or IPv6 network expressed as a base address and a prefix length.
///
/// The base address is always the canonical network address: the low-order
/// `(bits - prefix)` bits are zero. Parsing a CIDR with host bits set (for
/// example `10.0.0.5/24`) yields the network that contains it (`10.0.0.0/24`).
///
/// ```
/// let range: awsnetaudit::AddressRange = "10.0.0.0/16".parse().unwrap();
/// let (lower, upper) = range.halves().unwrap();
/// assert_eq!(lower.to_string(), "10.0.0.0/17");
/// assert_eq!(upper.to_string(), "10.0.128.0/17");
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct AddressRange {
    addr: IpAddr,
    prefix: u8,
}

/*--------------------------------------------------------------------------------------
  Address Range Implementation
--------------------------------------------------------------------------------------*/

impl AddressRange {
    /// Create an [AddressRange] from an address and prefix length. Host bits in
    /// `addr` are cleared.
    pub fn new(addr: IpAddr, prefix: u8) -> Result<Self> {
        let prefix_type = prefix_type_of(&addr);
        if prefix > prefix_type.bits() {
            return Err(Error::invalid_cidr(
                &format!("{addr}/{prefix}"),
                format!("{prefix_type} prefix length must be <= {}", prefix_type.bits()),
            ));
        }

        Ok(Self::from_bits(prefix_type, to_bits(&addr), prefix))
    }

    /*-------------------------------------------------------------------------
      Getters
    -------------------------------------------------------------------------*/

    /// Network (base) address.
    pub fn network(&self) -> IpAddr {
        self.addr
    }

    /// Prefix length in bits.
    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    pub fn prefix_type(&self) -> PrefixType {
        prefix_type_of(&self.addr)
    }

    /// Network mask (`255.255.255.0` for a `/24`).
    pub fn mask(&self) -> IpAddr {
        let prefix_type = self.prefix_type();
        to_addr(prefix_type, !host_mask(prefix_type, self.prefix))
    }

    /// Last address in the range.
    pub fn last_address(&self) -> IpAddr {
        let prefix_type = self.prefix_type();
        to_addr(
            prefix_type,
            self.base_bits() | host_mask(prefix_type, self.prefix),
        )
    }

    /// Number of addresses in the range; saturates at `u128::MAX` for `::/0`.
    pub fn size(&self) -> u128 {
        host_mask(self.prefix_type(), self.prefix).saturating_add(1)
    }

    /*-------------------------------------------------------------------------
      Range Arithmetic
    -------------------------------------------------------------------------*/

    /// Returns `true` when `other` is the same family and lies entirely within
    /// this range (a range contains itself).
    pub fn contains(&self, other: &AddressRange) -> bool {
        let prefix_type = self.prefix_type();
        prefix_type == other.prefix_type()
            && self.prefix <= other.prefix
            && other.base_bits() & !host_mask(prefix_type, self.prefix) == self.base_bits()
    }

    /// Split the range into its lower and upper halves (prefix length + 1).
    /// Returns `None` for a single-address range.
    pub fn halves(&self) -> Option<(AddressRange, AddressRange)> {
        let prefix_type = self.prefix_type();
        if self.prefix >= prefix_type.bits() {
            return None;
        }

        let prefix = self.prefix + 1;
        let upper_bit = 1u128 << (prefix_type.bits() - prefix);
        Some((
            Self::from_bits(prefix_type, self.base_bits(), prefix),
            Self::from_bits(prefix_type, self.base_bits() | upper_bit, prefix),
        ))
    }

    /*-------------------------------------------------------------------------
      Private Methods
    -------------------------------------------------------------------------*/

    pub(crate) fn base_bits(&self) -> u128 {
        to_bits(&self.addr)
    }

    fn from_bits(prefix_type: PrefixType, bits: u128, prefix: u8) -> Self {
        Self {
            addr: to_addr(prefix_type, bits & !host_mask(prefix_type, prefix)),
            prefix,
        }
    }
}

/*--------------------------------------------------------------------------------------
  Conversions
--------------------------------------------------------------------------------------*/

impl From<IpNetwork> for AddressRange {
    fn from(value: IpNetwork) -> Self {
        Self {
            addr: value.network(),
            prefix: value.prefix(),
        }
    }
}

impl FromStr for AddressRange {
    type Err = Error;

    /// Parse a CIDR string (`10.0.0.0/16`, `2600:1f18::/56`). The prefix
    /// length is required.
    fn from_str(s: &str) -> Result<Self> {
        let cidr = s.trim();
        let Some((_, prefix)) = cidr.split_once('/') else {
            return Err(Error::invalid_cidr(s, "missing prefix length"));
        };
        if !prefix.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(Error::invalid_cidr(s, "prefix length must be a decimal number"));
        }

        cidr.parse::<IpNetwork>()
            .map(AddressRange::from)
            .map_err(|error| Error::invalid_cidr(s, error))
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix)
    }
}

impl Serialize for AddressRange {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/*-------------------------------------------------------------------------------------------------
  Helper Functions
-------------------------------------------------------------------------------------------------*/

fn prefix_type_of(addr: &IpAddr) -> PrefixType {
    match addr {
        IpAddr::V4(_) => PrefixType::IPv4,
        IpAddr::V6(_) => PrefixType::IPv6,
    }
}

fn to_bits(addr: &IpAddr) -> u128 {
    match addr {
        IpAddr::V4(addr) => u128::from(u32::from(*addr)),
        IpAddr::V6(addr) => u128::from(*addr),
    }
}

fn to_addr(prefix_type: PrefixType, bits: u128) -> IpAddr {
    match prefix_type {
        PrefixType::IPv4 => IpAddr::V4(Ipv4Addr::from(bits as u32)),
        PrefixType::IPv6 => IpAddr::V6(Ipv6Addr::from(bits)),
    }
}

/// Bit mask covering the host portion of a prefix.
fn host_mask(prefix_type: PrefixType, prefix: u8) -> u128 {
    let host_bits = u32::from(prefix_type.bits() - prefix);
    if host_bits == 0 {
        0
    } else {
        u128::MAX >> (128 - host_bits)
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
