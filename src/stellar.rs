//! Specialized aggregates of the Stellar transaction format, each with its own one-line
//! text form: accounts, signer keys, decorated signatures and assets.

use crate::render::{render_code, scan_code, CodeError};
use crate::strkey::{self, StrKeyError, Version};
use byteorder::{BigEndian, ByteOrder};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    #[error("{0}")]
    StrKey(#[from] StrKeyError),
    #[error("{0}")]
    Code(#[from] CodeError),
    #[error("StrKey is not {0}")]
    WrongKind(&'static str),
    #[error("Invalid asset {0:?}")]
    BadAsset(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyType {
    Ed25519,
    MuxedEd25519,
}

/// An account address: a plain Ed25519 key (`G...`) or a multiplexed one (`M...`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountId {
    Ed25519([u8; 32]),
    MuxedEd25519 { id: u64, ed25519: [u8; 32] },
}

impl Default for AccountId {
    fn default() -> Self {
        AccountId::Ed25519([0; 32])
    }
}

impl AccountId {
    pub fn key_type(&self) -> KeyType {
        match self {
            AccountId::Ed25519(_) => KeyType::Ed25519,
            AccountId::MuxedEd25519 { .. } => KeyType::MuxedEd25519,
        }
    }

    pub fn ed25519(&self) -> &[u8; 32] {
        match self {
            AccountId::Ed25519(k) => k,
            AccountId::MuxedEd25519 { ed25519, .. } => ed25519,
        }
    }

    /// Last four key bytes, as carried in a decorated signature.
    pub fn hint(&self) -> [u8; 4] {
        hint_of(self.ed25519())
    }
}

fn hint_of(key: &[u8; 32]) -> [u8; 4] {
    [key[28], key[29], key[30], key[31]]
}

fn key32(payload: &[u8]) -> Result<[u8; 32], KeyError> {
    payload
        .try_into()
        .map_err(|_| KeyError::StrKey(StrKeyError::InvalidLength))
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountId::Ed25519(k) => f.write_str(&strkey::encode(Version::AccountId, k)),
            AccountId::MuxedEd25519 { id, ed25519 } => {
                let mut payload = [0u8; 40];
                payload[..32].copy_from_slice(ed25519);
                BigEndian::write_u64(&mut payload[32..], *id);
                f.write_str(&strkey::encode(Version::MuxedAccount, &payload))
            }
        }
    }
}

impl FromStr for AccountId {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match strkey::decode(s)? {
            (Version::AccountId, payload) => Ok(AccountId::Ed25519(key32(&payload)?)),
            (Version::MuxedAccount, payload) => Ok(AccountId::MuxedEd25519 {
                ed25519: key32(&payload[..32])?,
                id: BigEndian::read_u64(&payload[32..]),
            }),
            _ => Err(KeyError::WrongKind("an account")),
        }
    }
}

/// Key authorized to sign for an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignerKey {
    Ed25519([u8; 32]),
    PreAuthTx([u8; 32]),
    HashX([u8; 32]),
}

impl Default for SignerKey {
    fn default() -> Self {
        SignerKey::Ed25519([0; 32])
    }
}

impl fmt::Display for SignerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SignerKey::Ed25519(k) => strkey::encode(Version::AccountId, k),
            SignerKey::PreAuthTx(k) => strkey::encode(Version::PreAuthTx, k),
            SignerKey::HashX(k) => strkey::encode(Version::HashX, k),
        };
        f.write_str(&s)
    }
}

impl FromStr for SignerKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (version, payload) = strkey::decode(s)?;
        let key = key32(&payload);
        match version {
            Version::AccountId => Ok(SignerKey::Ed25519(key?)),
            Version::PreAuthTx => Ok(SignerKey::PreAuthTx(key?)),
            Version::HashX => Ok(SignerKey::HashX(key?)),
            _ => Err(KeyError::WrongKind("a signer key")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecoratedSignature {
    pub hint: [u8; 4],
    /// At most [`DecoratedSignature::MAX_SIGNATURE`] bytes.
    pub signature: Vec<u8>,
}

impl DecoratedSignature {
    pub const MAX_SIGNATURE: u32 = 64;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Asset {
    #[default]
    Native,
    AlphaNum4 { code: [u8; 4], issuer: [u8; 32] },
    AlphaNum12 { code: [u8; 12], issuer: [u8; 32] },
}

impl Asset {
    pub fn is_native(&self) -> bool {
        matches!(self, Asset::Native)
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (code, issuer) = match self {
            Asset::Native => return f.write_str("native"),
            Asset::AlphaNum4 { code, issuer } => (render_code(code), issuer),
            Asset::AlphaNum12 { code, issuer } => (render_code(code), issuer),
        };
        write!(f, "{}:{}", code, strkey::encode(Version::AccountId, issuer))
    }
}

impl FromStr for Asset {
    type Err = KeyError;

    /// `native`, or `CODE:ISSUER` with a 1–4 byte (alphanum4) or 5–12 byte
    /// (alphanum12) code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "native" {
            return Ok(Asset::Native);
        }
        let (code, issuer) = s
            .rsplit_once(':')
            .ok_or_else(|| KeyError::BadAsset(s.to_string()))?;
        if code.is_empty() {
            return Err(KeyError::BadAsset(s.to_string()));
        }
        let issuer = match issuer.parse::<AccountId>()? {
            AccountId::Ed25519(k) => k,
            AccountId::MuxedEd25519 { .. } => return Err(KeyError::WrongKind("an issuer")),
        };
        match scan_code(code, 4) {
            Ok(c) => Ok(Asset::AlphaNum4 {
                code: c.try_into().map_err(|_| CodeError::TooLong)?,
                issuer,
            }),
            Err(CodeError::TooLong) => Ok(Asset::AlphaNum12 {
                code: scan_code(code, 12)?
                    .try_into()
                    .map_err(|_| CodeError::TooLong)?,
                issuer,
            }),
            Err(e) => Err(e.into()),
        }
    }
}
