use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Serializes a [`Uuid`] as its native big-endian `u128` and rejects values
/// without version 4 bits on the way back in.
///
/// Use with `#[serde(with = "poolid::as_native_uuid")]`.
///
/// [`Uuid`]: crate::Uuid
pub mod as_native_uuid {
    use super::*;
    use crate::{SerdeError, Uuid};

    pub fn serialize<S>(id: &Uuid, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        id.to_u128().serialize(s)
    }

    pub fn deserialize<'de, D>(d: D) -> Result<Uuid, D::Error>
    where
        D: Deserializer<'de>,
    {
        let n = u128::deserialize(d)?;
        let id = Uuid::from_u128(n);
        if !id.is_valid() {
            return Err(serde::de::Error::custom(SerdeError::NotVersion4 { id }));
        }
        Ok(id)
    }
}
