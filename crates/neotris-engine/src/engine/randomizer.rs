use std::fmt::Write as _;

use arrayvec::ArrayVec;
use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::PieceKind;

/// How the next piece kind is chosen.
#[derive(
    Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize, derive_more::IsVariant,
)]
#[serde(rename_all = "kebab-case")]
pub enum RandomizerPolicy {
    /// Independent uniform choice per piece. A kind may repeat any number of
    /// times in a row.
    #[default]
    Uniform,
    /// Shuffled bags holding each of the 7 kinds once.
    SevenBag,
    /// A fixed sequence, repeated forever. An empty sequence behaves like
    /// [`RandomizerPolicy::Uniform`].
    Sequence(Vec<PieceKind>),
}

/// Seed for deterministic piece generation.
///
/// This is a 128-bit (16-byte) seed used to initialize the random number
/// generator for piece generation. Using the same seed will produce the same
/// sequence of pieces. Serialized as a 32-character hex string.
///
/// # Example
///
/// ```
/// use neotris_engine::{PieceRandomizer, PieceSeed, RandomizerPolicy};
/// use rand::Rng as _;
///
/// let seed: PieceSeed = rand::rng().random();
///
/// let mut a = PieceRandomizer::with_seed(RandomizerPolicy::Uniform, seed);
/// let mut b = PieceRandomizer::with_seed(RandomizerPolicy::Uniform, seed);
/// assert_eq!(a.next_kind(), b.next_kind());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }

    /// Parses a seed from up to 32 hex digits.
    #[must_use]
    pub fn from_hex(hex_str: &str) -> Option<Self> {
        if hex_str.is_empty() || hex_str.len() > 32 {
            return None;
        }
        let num = u128::from_str_radix(hex_str, 16).ok()?;
        Some(Self(num.to_be_bytes()))
    }

    #[must_use]
    pub fn to_hex(self) -> String {
        let num = u128::from_be_bytes(self.0);
        let mut hex_str = String::with_capacity(2 * self.0.len());
        let _ = write!(&mut hex_str, "{num:032x}");
        hex_str
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        if hex_str.len() != 32 {
            return Err(serde::de::Error::custom(format!(
                "invalid hex: expected 32 characters, got {}",
                hex_str.len()
            )));
        }
        Self::from_hex(&hex_str)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex: {hex_str}")))
    }
}

/// Allows generating random `PieceSeed` values using the standard random distribution.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
enum Source {
    Uniform,
    SevenBag(ArrayVec<PieceKind, { PieceKind::LEN }>),
    Sequence { kinds: Vec<PieceKind>, next: usize },
}

/// Produces the kind of each new piece according to a [`RandomizerPolicy`].
///
/// The full generator state, including the undealt rest of a 7-bag, is
/// serializable so a saved game continues the same sequence.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PieceRandomizer {
    rng: Pcg32,
    source: Source,
}

impl Default for PieceRandomizer {
    fn default() -> Self {
        Self::new(RandomizerPolicy::Uniform)
    }
}

impl PieceRandomizer {
    /// Creates a randomizer with a random seed.
    ///
    /// For deterministic piece generation, use [`Self::with_seed`] instead.
    #[must_use]
    pub fn new(policy: RandomizerPolicy) -> Self {
        Self::with_seed(policy, rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for deterministic piece generation.
    #[must_use]
    pub fn with_seed(policy: RandomizerPolicy, seed: PieceSeed) -> Self {
        let source = match policy {
            RandomizerPolicy::Uniform => Source::Uniform,
            RandomizerPolicy::SevenBag => Source::SevenBag(ArrayVec::new()),
            RandomizerPolicy::Sequence(kinds) if kinds.is_empty() => Source::Uniform,
            RandomizerPolicy::Sequence(kinds) => Source::Sequence { kinds, next: 0 },
        };
        Self {
            rng: Pcg32::from_seed(seed.0),
            source,
        }
    }

    /// Draws the next piece kind.
    pub fn next_kind(&mut self) -> PieceKind {
        match &mut self.source {
            Source::Uniform => self.rng.random(),
            Source::SevenBag(bag) => {
                if let Some(kind) = bag.pop() {
                    return kind;
                }
                let mut new_bag = PieceKind::ALL;
                new_bag.shuffle(&mut self.rng);
                let [first, rest @ ..] = new_bag;
                // Popped from the back, so reverse to draw in shuffled order.
                bag.extend(rest.into_iter().rev());
                first
            }
            Source::Sequence { kinds, next } => {
                let kind = kinds[*next % kinds.len()];
                *next = (*next + 1) % kinds.len();
                kind
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn seed_from_bytes(bytes: [u8; 16]) -> PieceSeed {
        PieceSeed(bytes)
    }

    #[test]
    fn test_seed_known_value_sequential_bytes() {
        let seed = seed_from_bytes([
            0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54,
            0x32, 0x10,
        ]);
        let serialized = serde_json::to_string(&seed).unwrap();
        assert_eq!(serialized, "\"0123456789abcdeffedcba9876543210\"");

        let deserialized: PieceSeed = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, seed);
    }

    #[test]
    fn test_seed_deserialize_errors() {
        for json in [
            "\"\"",
            "\"0123456789abcdef0123456789abcde\"",
            "\"0123456789abcdef0123456789abcdef0\"",
            "\"ghijklmnopqrstuvwxyzghijklmnopqr\"",
        ] {
            let result: Result<PieceSeed, _> = serde_json::from_str(json);
            let err_msg = result.unwrap_err().to_string();
            assert!(err_msg.contains("invalid hex"), "{json}: {err_msg}");
        }
    }

    #[test]
    fn test_seed_from_short_hex() {
        let seed = PieceSeed::from_hex("ff").unwrap();
        assert_eq!(seed.to_hex(), format!("{:032x}", 0xff));
        assert!(PieceSeed::from_hex("").is_none());
        assert!(PieceSeed::from_hex("xyz").is_none());
    }

    #[test]
    fn test_deterministic_piece_generation() {
        let seed = seed_from_bytes([0x42; 16]);
        for policy in [RandomizerPolicy::Uniform, RandomizerPolicy::SevenBag] {
            let mut a = PieceRandomizer::with_seed(policy.clone(), seed);
            let mut b = PieceRandomizer::with_seed(policy, seed);
            for _ in 0..50 {
                assert_eq!(a.next_kind(), b.next_kind());
            }
        }
    }

    #[test]
    fn test_seven_bag_yields_each_kind_once_per_bag() {
        let seed = seed_from_bytes([9; 16]);
        let mut randomizer = PieceRandomizer::with_seed(RandomizerPolicy::SevenBag, seed);
        for _ in 0..10 {
            let bag: HashSet<_> = (0..PieceKind::LEN).map(|_| randomizer.next_kind()).collect();
            assert_eq!(bag.len(), PieceKind::LEN);
        }
    }

    #[test]
    fn test_seven_bag_continues_after_serialization() {
        let seed = seed_from_bytes([4; 16]);
        let mut randomizer = PieceRandomizer::with_seed(RandomizerPolicy::SevenBag, seed);
        let mut drawn: Vec<_> = (0..5).map(|_| randomizer.next_kind()).collect();

        let json = serde_json::to_string(&randomizer).unwrap();
        let mut resumed: PieceRandomizer = serde_json::from_str(&json).unwrap();
        assert_eq!(resumed, randomizer);
        drawn.extend((0..9).map(|_| resumed.next_kind()));

        for bag in drawn.chunks(PieceKind::LEN) {
            let kinds: HashSet<_> = bag.iter().collect();
            assert_eq!(kinds.len(), PieceKind::LEN);
        }
    }

    #[test]
    fn test_uniform_produces_every_kind() {
        let seed = seed_from_bytes([3; 16]);
        let mut randomizer = PieceRandomizer::with_seed(RandomizerPolicy::Uniform, seed);
        let seen: HashSet<_> = (0..1000).map(|_| randomizer.next_kind()).collect();
        assert_eq!(seen.len(), PieceKind::LEN);
    }

    #[test]
    fn test_sequence_repeats() {
        let policy = RandomizerPolicy::Sequence(vec![PieceKind::I, PieceKind::O]);
        let mut randomizer = PieceRandomizer::new(policy);
        let drawn: Vec<_> = (0..5).map(|_| randomizer.next_kind()).collect();
        assert_eq!(
            drawn,
            [PieceKind::I, PieceKind::O, PieceKind::I, PieceKind::O, PieceKind::I]
        );
    }

    #[test]
    fn test_policy_serialization() {
        assert_eq!(
            serde_json::to_string(&RandomizerPolicy::SevenBag).unwrap(),
            "\"seven-bag\""
        );
        let policy: RandomizerPolicy =
            serde_json::from_str(r#"{"sequence":["T","I"]}"#).unwrap();
        assert_eq!(
            policy,
            RandomizerPolicy::Sequence(vec![PieceKind::T, PieceKind::I])
        );
    }
}
