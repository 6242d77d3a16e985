use std::fmt;

/*-------------------------------------------------------------------------------------------------
  Prefix Type
-------------------------------------------------------------------------------------------------*/

/// IP prefix type (IPv4 or IPv6) of an [AddressRange](crate::AddressRange).
#[derive(Debug, Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum PrefixType {
    IPv4,
    IPv6,
}

impl PrefixType {
    pub fn is_ipv4(&self) -> bool {
        match self {
            PrefixType::IPv4 => true,
            PrefixType::IPv6 => false,
        }
    }

    pub fn is_ipv6(&self) -> bool {
        match self {
            PrefixType::IPv4 => false,
            PrefixType::IPv6 => true,
        }
    }

    /// Number of bits in an address of this type.
    pub fn bits(&self) -> u8 {
        match self {
            PrefixType::IPv4 => 32,
            PrefixType::IPv6 => 128,
        }
    }
}

impl fmt::Display for PrefixType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefixType::IPv4 => write!(f, "IPv4"),
            PrefixType::IPv6 => write!(f, "IPv6"),
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

#[cfg(test)]
mod tests {
    use super::*;

    /*----------------------------------------------------------------------------------
      PrefixType
    ----------------------------------------------------------------------------------*/

    #[test]
    fn test_prefix_type_is_ipv4() {
        let ipv4 = PrefixType::IPv4;
        assert!(ipv4.is_ipv4());
        assert!(!ipv4.is_ipv6());
        assert_eq!(ipv4.bits(), 32);
    }

    #[test]
    fn test_prefix_type_is_ipv6() {
        let ipv6 = PrefixType::IPv6;
        assert!(!ipv6.is_ipv4());
        assert!(ipv6.is_ipv6());
        assert_eq!(ipv6.bits(), 128);
    }

    #[test]
    fn test_prefix_type_display() {
        assert_eq!(PrefixType::IPv4.to_string(), "IPv4");
        assert_eq!(PrefixType::IPv6.to_string(), "IPv6");
    }
}
