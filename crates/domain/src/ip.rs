//! IPv4 / CIDR utilities backing the PAC `isInNet` and `convert_addr` helpers.

use crate::errors::DomainError;
use ipnetwork::Ipv4Network;
use std::net::Ipv4Addr;

/// Count the mask bits of a dotted-quad netmask.
///
/// Each octet is rendered in binary without leading zeros and the pieces are
/// concatenated; the result is the length of the leading run of `1`s. Only
/// left-contiguous masks are meaningful; a discontiguous mask still yields
/// the leading-run length.
pub fn count_mask_bits(mask: &str) -> Result<u32, DomainError> {
    let mut binary = String::new();
    for octet in mask.split('.') {
        let value: u32 = octet
            .parse()
            .map_err(|_| DomainError::InvalidNetmask(mask.to_string()))?;
        binary.push_str(&format!("{value:b}"));
    }
    Ok(binary.chars().take_while(|c| *c == '1').count() as u32)
}

/// Build the CIDR network containing `ip` under the dotted-quad `mask`,
/// normalized to its base address.
pub fn net_from_ip_and_mask(ip: &str, mask: &str) -> Result<Ipv4Network, DomainError> {
    let bits = count_mask_bits(mask)?;
    let prefix =
        u8::try_from(bits).map_err(|_| DomainError::InvalidNetmask(mask.to_string()))?;
    let addr: Ipv4Addr = ip
        .parse()
        .map_err(|_| DomainError::InvalidIpAddress(ip.to_string()))?;
    let net = Ipv4Network::new(addr, prefix)
        .map_err(|_| DomainError::InvalidNetmask(mask.to_string()))?;
    Ipv4Network::new(net.network(), prefix)
        .map_err(|_| DomainError::InvalidNetmask(mask.to_string()))
}

/// True iff `ip` lies inside the network formed from `pattern`/`mask`.
pub fn is_ip_in_range(ip: &str, pattern: &str, mask: &str) -> Result<bool, DomainError> {
    let addr: Ipv4Addr = ip
        .parse()
        .map_err(|_| DomainError::InvalidIpAddress(ip.to_string()))?;
    let net = net_from_ip_and_mask(pattern, mask)?;
    Ok(net.contains(addr))
}

/// Big-endian 32-bit value of a dotted-quad address; `0` on parse failure.
pub fn ip_to_decimal(ip: &str) -> i64 {
    match ip.parse::<Ipv4Addr>() {
        Ok(addr) => i64::from(u32::from(addr)),
        Err(_) => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contiguous_mask(prefix: u32) -> String {
        let value = if prefix == 0 {
            0u32
        } else {
            u32::MAX << (32 - prefix)
        };
        Ipv4Addr::from(value).to_string()
    }

    #[test]
    fn mask_bits_for_common_masks() {
        assert_eq!(count_mask_bits("255.255.255.255").unwrap(), 32);
        assert_eq!(count_mask_bits("255.255.255.0").unwrap(), 24);
        assert_eq!(count_mask_bits("255.255.0.0").unwrap(), 16);
        assert_eq!(count_mask_bits("255.255.248.0").unwrap(), 21);
        assert_eq!(count_mask_bits("0.0.0.0").unwrap(), 0);
    }

    #[test]
    fn mask_bits_for_every_contiguous_prefix() {
        for prefix in 0..=32u32 {
            assert_eq!(
                count_mask_bits(&contiguous_mask(prefix)).unwrap(),
                prefix,
                "prefix /{prefix}"
            );
        }
    }

    #[test]
    fn mask_bits_rejects_non_numeric_octets() {
        assert!(count_mask_bits("255.abc.0.0").is_err());
        assert!(count_mask_bits("").is_err());
    }

    #[test]
    fn net_normalizes_to_base_address() {
        let net = net_from_ip_and_mask("10.0.1.20", "255.255.255.0").unwrap();
        assert_eq!(net.to_string(), "10.0.1.0/24");
    }

    #[test]
    fn range_membership() {
        assert!(is_ip_in_range("10.0.1.5", "10.0.1.1", "255.255.255.0").unwrap());
        assert!(!is_ip_in_range("10.0.2.5", "10.0.1.1", "255.255.255.0").unwrap());
    }

    #[test]
    fn same_network_means_membership() {
        // Two addresses share a network under `mask` iff each contains the other.
        for prefix in [8u32, 16, 21, 24, 30] {
            let mask = contiguous_mask(prefix);
            assert!(is_ip_in_range("192.168.144.7", "192.168.144.9", &mask).unwrap());
        }
        assert!(!is_ip_in_range("192.168.144.7", "192.169.144.7", "255.255.0.0").unwrap());
    }

    #[test]
    fn malformed_inputs_error() {
        assert!(is_ip_in_range("10.0.1.256", "10.0.1.1", "255.255.255.0").is_err());
        assert!(is_ip_in_range("10.0.1.2", "bogus", "255.255.255.0").is_err());
        assert!(is_ip_in_range("10.0.1.2", "10.0.1.1", "255.255.255.x").is_err());
    }

    #[test]
    fn decimal_conversion() {
        assert_eq!(ip_to_decimal("104.16.41.2"), 1_745_889_538);
        assert_eq!(ip_to_decimal("192.168.1.1"), 3_232_235_777);
        assert_eq!(ip_to_decimal("300.16.41.2"), 0);
        assert_eq!(ip_to_decimal(""), 0);
    }
}
