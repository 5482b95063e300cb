const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

const POLY_BASE: u64 = 31;
const POLY_MODULUS: u64 = 1_000_000_009;

/**
    Hash function used to place keys into slots.

    Both variants are pure functions of the key bytes. The slot is derived by taking the
    hash modulo the current capacity, so a resize only changes the range, never the hash.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashKind {
    /// 64 bit FNV-1a, xor then multiply per byte.
    #[default]
    Fnv1a,
    /// Polynomial rolling hash with base 31 over a large prime.
    Polynomial,
}

impl HashKind {
    pub fn hash(self, key: &[u8]) -> u64 {
        match self {
            HashKind::Fnv1a => key.iter().fold(FNV_OFFSET, |hash, &b| {
                (hash ^ u64::from(b)).wrapping_mul(FNV_PRIME)
            }),
            HashKind::Polynomial => {
                let mut hash = 0;
                let mut power = 1;
                for &b in key {
                    // letters map onto 1..=26, anything below 'a' wraps within the modulus
                    let digit = (u64::from(b) + POLY_MODULUS - u64::from(b'a' - 1)) % POLY_MODULUS;
                    hash = (hash + digit * power) % POLY_MODULUS;
                    power = (power * POLY_BASE) % POLY_MODULUS;
                }
                hash
            }
        }
    }

    #[inline]
    pub fn slot(self, key: &[u8], capacity: usize) -> usize {
        debug_assert!(capacity > 0);
        (self.hash(key) % capacity as u64) as usize
    }
}
