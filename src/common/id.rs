//! Kademlia node Id or a lookup target
use rand::Rng;
use std::{
    convert::TryInto,
    fmt::{self, Debug, Display, Formatter},
    str::FromStr,
};

use sha1_smol::Sha1;

use crate::{Error, Result};

/// The size of node IDs in bytes.
pub const ID_SIZE: usize = 20;
/// The size of node IDs in bits, which is also the number of routing table slots.
pub const ID_BITS: usize = ID_SIZE * 8;

#[derive(Clone, Copy, PartialEq, Ord, PartialOrd, Eq, Hash)]
/// Kademlia node Id or a lookup target
pub struct Id([u8; ID_SIZE]);

impl Id {
    /// Generate a uniformly random Id from the given source of randomness.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Id {
        let random_bytes: [u8; ID_SIZE] = rng.gen();

        Id(random_bytes)
    }

    /// Create a new Id from some bytes. Returns Err if `bytes` is not of length
    /// [ID_SIZE](crate::common::ID_SIZE).
    pub fn from_bytes<T: AsRef<[u8]>>(bytes: T) -> Result<Id> {
        let bytes = bytes.as_ref();

        let tmp: [u8; ID_SIZE] = bytes
            .try_into()
            .map_err(|_| Error::InvalidIdSize(bytes.len()))?;

        Ok(Id(tmp))
    }

    /// The SHA-1 digest of a raw key, read as an Id.
    pub fn from_key(key: &[u8]) -> Id {
        let mut hasher = Sha1::new();
        hasher.update(key);

        Id(hasher.digest().bytes())
    }

    /// Big-endian bytes of this Id.
    pub fn as_bytes(&self) -> &[u8; ID_SIZE] {
        &self.0
    }

    /// XOR distance between this Id and a target Id.
    pub fn xor(&self, other: &Id) -> Id {
        let mut result = [0_u8; ID_SIZE];

        for (i, (a, b)) in self.0.iter().zip(other.0.iter()).enumerate() {
            result[i] = a ^ b;
        }

        Id(result)
    }

    /// Number of leading zero bits, [ID_BITS] for the zero Id.
    pub fn leading_zeros(&self) -> usize {
        for (i, byte) in self.0.iter().enumerate() {
            if *byte != 0 {
                return i * 8 + byte.leading_zeros() as usize;
            }
        }

        ID_BITS
    }

    /// Routing table slot for `target` as seen from this Id.
    ///
    /// The index is the length of the common prefix of both Ids, so peers that
    /// differ in the highest bit land in slot 0 and peers sharing 159 leading
    /// bits land in slot 159.
    ///
    /// Identical Ids have no differing bit at all; they are clamped to the
    /// last slot (159), keeping every result inside the table.
    pub fn bucket_index(&self, target: &Id) -> usize {
        self.xor(target).leading_zeros().min(ID_BITS - 1)
    }
}

impl From<[u8; ID_SIZE]> for Id {
    fn from(bytes: [u8; ID_SIZE]) -> Id {
        Id(bytes)
    }
}

impl FromStr for Id {
    type Err = Error;

    fn from_str(s: &str) -> Result<Id> {
        let mut bytes = [0_u8; ID_SIZE];

        hex::decode_to_slice(s, &mut bytes)
            .map_err(|_| Error::InvalidIdEncoding(s.to_string()))?;

        Ok(Id(bytes))
    }
}

impl Display for Id {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl Debug for Id {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self)
    }
}
