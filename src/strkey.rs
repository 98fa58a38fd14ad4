//! StrKey text form of keys: version byte + payload + CRC16-XModem (little-endian),
//! base32 without padding.

use byteorder::{ByteOrder, LittleEndian};
use data_encoding::BASE32_NOPAD;

/// Version bytes; the first base32 character of the key follows from these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    /// `G...`
    AccountId,
    /// `M...`
    MuxedAccount,
    /// `S...`
    Seed,
    /// `T...`
    PreAuthTx,
    /// `X...`
    HashX,
}

impl Version {
    fn byte(self) -> u8 {
        match self {
            Version::AccountId => 6 << 3,
            Version::MuxedAccount => 12 << 3,
            Version::Seed => 18 << 3,
            Version::PreAuthTx => 19 << 3,
            Version::HashX => 23 << 3,
        }
    }

    fn from_byte(b: u8) -> Option<Self> {
        [
            Version::AccountId,
            Version::MuxedAccount,
            Version::Seed,
            Version::PreAuthTx,
            Version::HashX,
        ]
        .into_iter()
        .find(|v| v.byte() == b)
    }

    fn payload_len(self) -> usize {
        match self {
            Version::MuxedAccount => 40,
            _ => 32,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StrKeyError {
    #[error("Invalid base32 in StrKey")]
    InvalidBase32,
    #[error("StrKey has wrong length")]
    InvalidLength,
    #[error("Unknown StrKey version byte")]
    UnknownVersion,
    #[error("Invalid StrKey checksum")]
    BadChecksum,
}

const XMODEM: crc::Crc<u16> = crc::Crc::<u16>::new(&crc::CRC_16_XMODEM);

pub fn crc16_xmodem(data: &[u8]) -> u16 {
    XMODEM.checksum(data)
}

pub fn encode(version: Version, payload: &[u8]) -> String {
    let mut raw = Vec::with_capacity(payload.len() + 3);
    raw.push(version.byte());
    raw.extend_from_slice(payload);
    let mut crc = [0u8; 2];
    LittleEndian::write_u16(&mut crc, crc16_xmodem(&raw));
    raw.extend_from_slice(&crc);
    BASE32_NOPAD.encode(&raw)
}

/// Decode any known StrKey, returning its version and payload.
pub fn decode(s: &str) -> Result<(Version, Vec<u8>), StrKeyError> {
    let raw = BASE32_NOPAD
        .decode(s.as_bytes())
        .map_err(|_| StrKeyError::InvalidBase32)?;
    if raw.len() < 3 {
        return Err(StrKeyError::InvalidLength);
    }
    let (body, crc) = raw.split_at(raw.len() - 2);
    if LittleEndian::read_u16(crc) != crc16_xmodem(body) {
        return Err(StrKeyError::BadChecksum);
    }
    let version = Version::from_byte(body[0]).ok_or(StrKeyError::UnknownVersion)?;
    let payload = &body[1..];
    if payload.len() != version.payload_len() {
        return Err(StrKeyError::InvalidLength);
    }
    Ok((version, payload.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crc16_xmodem_check_value() {
        assert_eq!(crc16_xmodem(b"123456789"), 0x31c3);
    }

    #[test]
    fn zero_account_id() {
        let s = encode(Version::AccountId, &[0u8; 32]);
        assert_eq!(s, "GAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAWHF");
        let (v, payload) = decode(&s).expect("decode");
        assert_eq!(v, Version::AccountId);
        assert_eq!(payload, vec![0u8; 32]);
    }

    #[test]
    fn known_account_and_muxed_keys() {
        let key: Vec<u8> = (1..=32).collect();
        let g = "GAAQEAYEAUDAOCAJBIFQYDIOB4IBCEQTCQKRMFYYDENBWHA5DYPSABOV";
        assert_eq!(encode(Version::AccountId, &key), g);
        assert_eq!(decode(g), Ok((Version::AccountId, key.clone())));

        let mut muxed = key;
        muxed.extend_from_slice(&1234u64.to_be_bytes());
        let m = "MAAQEAYEAUDAOCAJBIFQYDIOB4IBCEQTCQKRMFYYDENBWHA5DYPSAAAAAAAAAAAE2LAOE";
        assert_eq!(encode(Version::MuxedAccount, &muxed), m);
        assert_eq!(decode(&m[..m.len() - 2]), Err(StrKeyError::InvalidBase32));
    }

    #[test]
    fn version_prefixes() {
        assert!(encode(Version::PreAuthTx, &[7u8; 32]).starts_with('T'));
        assert!(encode(Version::HashX, &[7u8; 32]).starts_with('X'));
        assert!(encode(Version::Seed, &[7u8; 32]).starts_with('S'));
        assert!(encode(Version::MuxedAccount, &[7u8; 40]).starts_with('M'));
    }

    #[test]
    fn rejects_corrupted_key() {
        let mut s = encode(Version::AccountId, &[9u8; 32]).into_bytes();
        s[10] = if s[10] == b'A' { b'B' } else { b'A' };
        let s = String::from_utf8(s).expect("ascii");
        assert_eq!(decode(&s), Err(StrKeyError::BadChecksum));
    }

    #[test]
    fn rejects_lowercase() {
        let s = encode(Version::AccountId, &[1u8; 32]).to_lowercase();
        assert_eq!(decode(&s), Err(StrKeyError::InvalidBase32));
    }
}
