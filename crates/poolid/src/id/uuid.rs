use core::fmt;

/// Byte holding the version nibble (high 4 bits).
const VERSION_BYTE: usize = 6;
/// Byte holding the variant bits (top 2 bits).
const VARIANT_BYTE: usize = 8;

const VERSION_4: u8 = 0x40;
const VARIANT_RFC4122: u8 = 0x80;

/// Stamps the version 4 and RFC 4122 variant bits onto 16 raw bytes.
///
/// Byte 6 gets its high nibble set to `0100`, byte 8 gets its top two bits set
/// to `10`. The remaining 122 bits are left untouched. Applying this twice is
/// the same as applying it once.
///
/// # Example
/// ```
/// use poolid::apply_version_v4;
///
/// let mut bytes = [0xff; 16];
/// apply_version_v4(&mut bytes);
/// assert_eq!(bytes[6], 0x4f);
/// assert_eq!(bytes[8], 0xbf);
/// ```
#[inline]
pub const fn apply_version_v4(bytes: &mut [u8; 16]) {
    bytes[VERSION_BYTE] = (bytes[VERSION_BYTE] & 0x0f) | VERSION_4;
    bytes[VARIANT_BYTE] = (bytes[VARIANT_BYTE] & 0x3f) | VARIANT_RFC4122;
}

/// A 128-bit RFC 4122 identifier.
///
/// `Uuid` is a plain value. It owns its bytes and never aliases the arena it
/// was drawn from. Bytes are stored in network order, so [`Uuid::to_u128`]
/// yields the big-endian integer a hyphenated UUID string spells out.
///
/// ```text
///  Byte:    0       4   6   8                  15
///          +-------+---+---+---+--------------+
///  Field:  | rand  |rnd|ver|var|    random    |
///          +-------+---+---+---+--------------+
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Uuid {
    bytes: [u8; 16],
}

impl Uuid {
    /// The all-zero UUID. Not a valid version 4 UUID.
    pub const NIL: Self = Self { bytes: [0; 16] };

    /// Wraps 16 bytes as-is, without touching the version or variant bits.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self { bytes }
    }

    /// Builds a version 4 UUID from 16 random bytes.
    ///
    /// # Example
    /// ```
    /// use poolid::Uuid;
    ///
    /// let id = Uuid::from_random_bytes([0; 16]);
    /// // 00000000-0000-4000-8000-000000000000
    /// assert_eq!(id.to_u128(), 0x0000_0000_0000_4000_8000_0000_0000_0000);
    /// assert!(id.is_valid());
    /// ```
    #[must_use]
    pub const fn from_random_bytes(mut bytes: [u8; 16]) -> Self {
        apply_version_v4(&mut bytes);
        Self { bytes }
    }

    /// Converts a big-endian integer into this type.
    #[must_use]
    pub const fn from_u128(raw: u128) -> Self {
        Self {
            bytes: raw.to_be_bytes(),
        }
    }

    /// Returns the big-endian integer representation.
    #[must_use]
    pub const fn to_u128(&self) -> u128 {
        u128::from_be_bytes(self.bytes)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.bytes
    }

    #[must_use]
    pub const fn into_bytes(self) -> [u8; 16] {
        self.bytes
    }

    /// Returns the version nibble (4 for anything this crate generates).
    #[must_use]
    pub const fn version(&self) -> u8 {
        self.bytes[VERSION_BYTE] >> 4
    }

    /// Returns `true` if the version is 4 and the variant is RFC 4122.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.bytes[VERSION_BYTE] & 0xf0 == VERSION_4
            && self.bytes[VARIANT_BYTE] & 0xc0 == VARIANT_RFC4122
    }

    /// Returns a copy with the version and variant bits forced to version 4,
    /// RFC 4122.
    #[must_use]
    pub const fn into_valid(self) -> Self {
        Self::from_random_bytes(self.bytes)
    }
}

impl From<[u8; 16]> for Uuid {
    fn from(bytes: [u8; 16]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<Uuid> for [u8; 16] {
    fn from(id: Uuid) -> Self {
        id.bytes
    }
}

impl From<Uuid> for u128 {
    fn from(id: Uuid) -> Self {
        id.to_u128()
    }
}

impl fmt::Debug for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Uuid")
            .field("raw", &format_args!("{:#034x}", self.to_u128()))
            .field("version", &self.version())
            .finish()
    }
}
