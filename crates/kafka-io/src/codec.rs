use crate::error::{Error, Result};

/// Wire encoding of a Kafka key or value.
///
/// Absence is not part of the codec: records carry `Option<K>` / `Option<V>`
/// and a `None` is sent as a null key or payload, never as empty bytes.
pub trait KeyValueCodec: Sized + Send + 'static {
    fn encode(&self) -> Vec<u8>;

    fn decode(bytes: &[u8]) -> Result<Self>;
}

impl KeyValueCodec for Vec<u8> {
    fn encode(&self) -> Vec<u8> {
        self.clone()
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(bytes.to_vec())
    }
}

impl KeyValueCodec for String {
    fn encode(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        String::from_utf8(bytes.to_vec())
            .map_err(|e| Error::Decode(format!("invalid UTF-8 string: {e}")))
    }
}

/// Four bytes, big-endian, as written by Kafka's `IntegerSerializer`.
impl KeyValueCodec for i32 {
    fn encode(&self) -> Vec<u8> {
        self.to_be_bytes().to_vec()
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        let array: [u8; 4] = bytes.try_into().map_err(|_| {
            Error::Decode(format!(
                "expected 4 bytes for an integer, got {}",
                bytes.len()
            ))
        })?;
        Ok(i32::from_be_bytes(array))
    }
}

/// Decode an optional field, keeping `None` as `None`.
pub(crate) fn decode_optional<T: KeyValueCodec>(bytes: Option<&[u8]>) -> Result<Option<T>> {
    bytes.map(T::decode).transpose()
}
