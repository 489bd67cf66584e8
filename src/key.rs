use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::hash::BuildHasher;
use core::hash::Hasher;
use core::ops::Deref;

/// The capability every key of a [`HashMap`](crate::HashMap) or element of a
/// [`HashSet`](crate::HashSet) provides.
///
/// Implementations must be consistent: if `a.key_eq(&b)` then
/// `a.hash_key() == b.hash_key()`. A key whose hash disagrees with its
/// equality leads to lost or duplicated entries; the containers cannot detect
/// it.
///
/// Hashes are computed under a process-wide random seed (see [`KeyHasher`]),
/// so they differ from one run of the program to the next and must never be
/// persisted.
///
/// # Examples
///
/// ```rust
/// use shift_hash::HashKey;
/// use shift_hash::HashMap;
/// use shift_hash::KeyHasher;
///
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl HashKey for Point {
///     fn hash_key(&self) -> u64 {
///         let mut hasher = KeyHasher::new();
///         hasher.write_key(&self.x);
///         hasher.write_key(&self.y);
///         hasher.finish()
///     }
///
///     fn key_eq(&self, other: &Self) -> bool {
///         self.x == other.x && self.y == other.y
///     }
/// }
///
/// let mut map = HashMap::new();
/// map.insert(Point { x: 1, y: 2 }, "a");
/// assert_eq!(map.get(&Point { x: 1, y: 2 }), Some(&"a"));
/// assert_eq!(map.get(&Point { x: 2, y: 1 }), None);
/// ```
pub trait HashKey {
    /// Returns the 64-bit hash of the key's logical value.
    fn hash_key(&self) -> u64;

    /// Returns `true` if `self` and `other` are the same key.
    fn key_eq(&self, other: &Self) -> bool;
}

cfg_if::cfg_if! {
    if #[cfg(all(feature = "foldhash", feature = "std"))] {
        use std::sync::OnceLock;

        use foldhash::quality::FixedState;

        type SeedState = FixedState;

        static SEED: OnceLock<u64> = OnceLock::new();

        // `std`'s `RandomState` keys come from the OS entropy source.
        #[inline]
        fn process_seed() -> u64 {
            *SEED.get_or_init(|| std::hash::RandomState::new().hash_one(0x5eed_u64) | 1)
        }

        #[inline]
        fn seed_state() -> SeedState {
            FixedState::with_seed(process_seed())
        }
    } else if #[cfg(feature = "foldhash")] {
        use core::sync::atomic::Ordering;

        use foldhash::quality::FixedState;

        cfg_if::cfg_if! {
            if #[cfg(target_has_atomic = "64")] {
                type SeedWord = u64;
                type SeedCell = core::sync::atomic::AtomicU64;
            } else {
                type SeedWord = usize;
                type SeedCell = core::sync::atomic::AtomicUsize;
            }
        }

        type SeedState = FixedState;

        static SEED: SeedCell = SeedCell::new(0);

        #[inline]
        fn process_seed() -> u64 {
            let seed = SEED.load(Ordering::Relaxed);
            if seed == 0 { init_seed() } else { seed as u64 }
        }

        #[inline]
        fn seed_state() -> SeedState {
            FixedState::with_seed(process_seed())
        }

        // Without `std` the only entropy is foldhash's own global seed. Zero
        // marks "not yet drawn"; the first writer wins.
        #[cold]
        #[inline(never)]
        fn init_seed() -> u64 {
            let candidate =
                (foldhash::quality::RandomState::default().hash_one(0x5eed_u64) | 1) as SeedWord;
            match SEED.compare_exchange(0, candidate, Ordering::Relaxed, Ordering::Relaxed) {
                Ok(_) => candidate as u64,
                Err(existing) => existing as u64,
            }
        }
    } else if #[cfg(feature = "std")] {
        use std::hash::RandomState;
        use std::sync::OnceLock;

        type SeedState = RandomState;

        static STATE: OnceLock<RandomState> = OnceLock::new();

        #[inline]
        fn seed_state() -> SeedState {
            STATE.get_or_init(RandomState::new).clone()
        }

        #[cfg(test)]
        fn process_seed() -> u64 {
            seed_state().hash_one(0x5eed_u64) | 1
        }
    } else {
        compile_error!("shift-hash needs either the `foldhash` or the `std` feature for its hash seed");
    }
}

type Inner = <SeedState as BuildHasher>::Hasher;

/// A hasher keyed by the process-wide seed.
///
/// The seed is drawn from a random source the first time any key is hashed
/// and stays fixed for the lifetime of the process. Composite keys combine
/// their parts by feeding each part's [`HashKey::hash_key`] into one
/// `KeyHasher` in order, so `[a, b]` and `[b, a]` hash differently.
///
/// `KeyHasher` also implements [`Hasher`], which lets types deriving
/// [`Hash`](core::hash::Hash) hash themselves through it.
///
/// # Examples
///
/// ```rust
/// use shift_hash::KeyHasher;
///
/// let mut a = KeyHasher::new();
/// a.write_key("left");
/// a.write_key("right");
///
/// let mut b = KeyHasher::new();
/// b.write_key("right");
/// b.write_key("left");
///
/// assert_ne!(a.finish(), b.finish());
/// ```
pub struct KeyHasher {
    inner: Inner,
}

impl KeyHasher {
    /// Creates a hasher keyed by the process-wide seed.
    #[inline]
    pub fn new() -> Self {
        Self {
            inner: seed_state().build_hasher(),
        }
    }

    /// Mixes the hash of `key` into this hasher.
    #[inline]
    pub fn write_key<K: HashKey + ?Sized>(&mut self, key: &K) {
        self.inner.write_u64(key.hash_key());
    }

    /// Returns the hash of everything written so far.
    #[inline]
    pub fn finish(&self) -> u64 {
        self.inner.finish()
    }
}

impl Default for KeyHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for KeyHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.inner.finish()
    }

    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        self.inner.write(bytes);
    }

    #[inline]
    fn write_u64(&mut self, value: u64) {
        self.inner.write_u64(value);
    }
}

/// Hashes a single `u64` under the process-wide seed.
#[inline]
pub fn hash_u64(value: u64) -> u64 {
    let mut hasher = KeyHasher::new();
    hasher.write_u64(value);
    hasher.finish()
}

/// Hashes a byte string under the process-wide seed.
#[inline]
pub fn hash_bytes(bytes: &[u8]) -> u64 {
    let mut hasher = KeyHasher::new();
    hasher.write(bytes);
    hasher.finish()
}

// Integers up to 64 bits hash exactly like `hash_u64` of their widened value.
macro_rules! word_keys {
    ($($t:ty),* $(,)?) => {
        $(
            impl HashKey for $t {
                #[inline]
                fn hash_key(&self) -> u64 {
                    hash_u64(*self as u64)
                }

                #[inline]
                fn key_eq(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

word_keys!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

macro_rules! wide_keys {
    ($($t:ty),* $(,)?) => {
        $(
            impl HashKey for $t {
                #[inline]
                fn hash_key(&self) -> u64 {
                    hash_bytes(&self.to_le_bytes())
                }

                #[inline]
                fn key_eq(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

wide_keys!(u128, i128);

impl HashKey for bool {
    #[inline]
    fn hash_key(&self) -> u64 {
        hash_bytes(&[*self as u8])
    }

    #[inline]
    fn key_eq(&self, other: &Self) -> bool {
        self == other
    }
}

impl HashKey for char {
    #[inline]
    fn hash_key(&self) -> u64 {
        (*self as u32).hash_key()
    }

    #[inline]
    fn key_eq(&self, other: &Self) -> bool {
        self == other
    }
}

// Floats are keyed by their IEEE 754 bit pattern: NaN equals itself and
// 0.0 differs from -0.0.
macro_rules! float_keys {
    ($($t:ty),* $(,)?) => {
        $(
            impl HashKey for $t {
                #[inline]
                fn hash_key(&self) -> u64 {
                    self.to_bits().hash_key()
                }

                #[inline]
                fn key_eq(&self, other: &Self) -> bool {
                    self.to_bits() == other.to_bits()
                }
            }
        )*
    };
}

float_keys!(f32, f64);

impl HashKey for str {
    #[inline]
    fn hash_key(&self) -> u64 {
        hash_bytes(self.as_bytes())
    }

    #[inline]
    fn key_eq(&self, other: &Self) -> bool {
        self == other
    }
}

impl HashKey for String {
    #[inline]
    fn hash_key(&self) -> u64 {
        self.as_str().hash_key()
    }

    #[inline]
    fn key_eq(&self, other: &Self) -> bool {
        self == other
    }
}

/// An owned byte string keyed by its raw contents.
///
/// `Vec<u8>` is also a valid key, but it hashes element by element like any
/// other sequence. `Bytes` hashes the whole buffer in one pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Bytes(pub Vec<u8>);

impl Deref for Bytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(bytes: Vec<u8>) -> Self {
        Bytes(bytes)
    }
}

impl From<&[u8]> for Bytes {
    fn from(bytes: &[u8]) -> Self {
        Bytes(bytes.to_vec())
    }
}

impl HashKey for Bytes {
    #[inline]
    fn hash_key(&self) -> u64 {
        hash_bytes(&self.0)
    }

    #[inline]
    fn key_eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T: HashKey> HashKey for [T] {
    fn hash_key(&self) -> u64 {
        let mut hasher = KeyHasher::new();
        for item in self {
            hasher.write_key(item);
        }
        hasher.finish()
    }

    fn key_eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.key_eq(b))
    }
}

impl<T: HashKey, const N: usize> HashKey for [T; N] {
    #[inline]
    fn hash_key(&self) -> u64 {
        self.as_slice().hash_key()
    }

    #[inline]
    fn key_eq(&self, other: &Self) -> bool {
        self.as_slice().key_eq(other.as_slice())
    }
}

impl<T: HashKey> HashKey for Vec<T> {
    #[inline]
    fn hash_key(&self) -> u64 {
        self.as_slice().hash_key()
    }

    #[inline]
    fn key_eq(&self, other: &Self) -> bool {
        self.as_slice().key_eq(other.as_slice())
    }
}

impl<T: HashKey> HashKey for Option<T> {
    fn hash_key(&self) -> u64 {
        let mut hasher = KeyHasher::new();
        match self {
            None => hasher.write_u64(0),
            Some(value) => {
                hasher.write_u64(1);
                hasher.write_key(value);
            }
        }
        hasher.finish()
    }

    fn key_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (None, None) => true,
            (Some(a), Some(b)) => a.key_eq(b),
            _ => false,
        }
    }
}

impl<T: HashKey + ?Sized> HashKey for Box<T> {
    #[inline]
    fn hash_key(&self) -> u64 {
        (**self).hash_key()
    }

    #[inline]
    fn key_eq(&self, other: &Self) -> bool {
        (**self).key_eq(other)
    }
}

impl<T: HashKey + ?Sized> HashKey for &T {
    #[inline]
    fn hash_key(&self) -> u64 {
        (**self).hash_key()
    }

    #[inline]
    fn key_eq(&self, other: &Self) -> bool {
        (**self).key_eq(other)
    }
}

macro_rules! tuple_keys {
    ($(($($name:ident $idx:tt),+))*) => {
        $(
            impl<$($name: HashKey),+> HashKey for ($($name,)+) {
                fn hash_key(&self) -> u64 {
                    let mut hasher = KeyHasher::new();
                    $(hasher.write_key(&self.$idx);)+
                    hasher.finish()
                }

                fn key_eq(&self, other: &Self) -> bool {
                    $(self.$idx.key_eq(&other.$idx))&&+
                }
            }
        )*
    };
}

tuple_keys! {
    (A 0)
    (A 0, B 1)
    (A 0, B 1, C 2)
    (A 0, B 1, C 2, D 3)
    (A 0, B 1, C 2, D 3, E 4)
    (A 0, B 1, C 2, D 3, E 4, F 5)
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec;

    use super::*;

    #[test]
    fn hashes_are_deterministic_within_process() {
        assert_eq!(42u64.hash_key(), 42u64.hash_key());
        assert_eq!("hello".hash_key(), "hello".to_string().hash_key());
        assert_eq!(hash_u64(7), hash_u64(7));
        assert_eq!(hash_bytes(b"abc"), Bytes(b"abc".to_vec()).hash_key());
    }

    #[test]
    fn distinct_values_hash_apart() {
        assert_ne!(1u64.hash_key(), 2u64.hash_key());
        assert_ne!("a".hash_key(), "b".hash_key());
        assert_ne!(true.hash_key(), false.hash_key());
    }

    #[test]
    fn sequences_are_order_sensitive() {
        let ab = vec![1u32, 2];
        let ba = vec![2u32, 1];
        assert!(!ab.key_eq(&ba));
        assert_ne!(ab.hash_key(), ba.hash_key());
        assert!(ab.key_eq(&vec![1, 2]));
        assert_eq!(ab.hash_key(), [1u32, 2].hash_key());

        let shorter = vec![1u32];
        assert!(!ab.key_eq(&shorter));
    }

    #[test]
    fn tuples_combine_in_order() {
        let a = (1u8, "x".to_string(), 3i64);
        let b = (1u8, "x".to_string(), 3i64);
        let c = (3u8, "x".to_string(), 1i64);
        assert!(a.key_eq(&b));
        assert_eq!(a.hash_key(), b.hash_key());
        assert!(!a.key_eq(&c));
        assert_ne!(a.hash_key(), c.hash_key());
    }

    #[test]
    fn floats_compare_by_bits() {
        assert!(f64::NAN.key_eq(&f64::NAN));
        assert_eq!(f64::NAN.hash_key(), f64::NAN.hash_key());
        assert!(!0.0f64.key_eq(&-0.0));
        assert!(1.5f32.key_eq(&1.5));
    }

    #[test]
    fn option_and_box_delegate() {
        assert!(Some(3u16).key_eq(&Some(3)));
        assert!(!Some(3u16).key_eq(&None));
        assert_ne!(Some(0u64).hash_key(), None::<u64>.hash_key());

        let boxed: Box<str> = "boxed".into();
        assert_eq!(boxed.hash_key(), "boxed".hash_key());
        assert!((&5u32).key_eq(&&5u32));
    }

    #[test]
    fn key_hasher_accepts_derived_hash() {
        use core::hash::Hash;

        #[derive(Hash)]
        struct Derived {
            id: u32,
            name: &'static str,
        }

        let hash = |d: &Derived| {
            let mut hasher = KeyHasher::new();
            d.hash(&mut hasher);
            hasher.finish()
        };

        let a = Derived { id: 1, name: "a" };
        let b = Derived { id: 1, name: "a" };
        let c = Derived { id: 2, name: "a" };
        assert_eq!(hash(&a), hash(&b));
        assert_ne!(hash(&a), hash(&c));
    }

    #[test]
    fn seed_is_drawn_once() {
        let seed = process_seed();
        assert_ne!(seed, 0);
        assert_eq!(process_seed(), seed);
        assert_eq!(hash_u64(11), hash_u64(11));
    }

    #[cfg(feature = "std")]
    #[test]
    fn seed_is_shared_across_threads() {
        let here = (process_seed(), 42u64.hash_key());
        let elsewhere: std::vec::Vec<(u64, u64)> = (0..4)
            .map(|_| std::thread::spawn(|| (process_seed(), 42u64.hash_key())))
            .collect::<std::vec::Vec<_>>()
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect();
        for pair in elsewhere {
            assert_eq!(pair, here);
        }
    }

    #[test]
    fn word_integers_match_hash_u64() {
        assert_eq!(7u64.hash_key(), hash_u64(7));
        assert_eq!(7u8.hash_key(), hash_u64(7));
        assert_eq!(7usize.hash_key(), hash_u64(7));
        assert_eq!((-1i32).hash_key(), hash_u64(u64::MAX));
        assert_ne!(7u128.hash_key(), 0);
    }
}
