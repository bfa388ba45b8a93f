use rkyv::api::high::{HighDeserializer, HighSerializer, HighValidator};
use rkyv::bytecheck::CheckBytes;
use rkyv::rancor::Error;
use rkyv::ser::allocator::ArenaHandle;
use rkyv::util::AlignedVec;
use rkyv::{Archive, Deserialize, Serialize};
use thiserror::Error as ThisError;

use crate::snapshot::{SessionSnapshot, SESSION_SNAPSHOT_VERSION};

#[derive(Debug, ThisError)]
pub enum CodecError {
    #[error("failed to encode: {0}")]
    Encode(#[source] Error),
    #[error("failed to decode: {0}")]
    Decode(#[source] Error),
    #[error("unsupported snapshot version {found}, expected {expected}")]
    Version { expected: u32, found: u32 },
}

pub fn encode<T>(value: &T) -> Result<Vec<u8>, CodecError>
where
    T: for<'a> Serialize<HighSerializer<AlignedVec, ArenaHandle<'a>, Error>>,
{
    rkyv::to_bytes::<Error>(value)
        .map(|bytes| bytes.into_vec())
        .map_err(CodecError::Encode)
}

pub fn decode<T>(bytes: &[u8]) -> Result<T, CodecError>
where
    T: Archive,
    T::Archived:
        for<'a> CheckBytes<HighValidator<'a, Error>> + Deserialize<T, HighDeserializer<Error>>,
{
    // Archived data must be aligned; byte buffers from the host carry no such guarantee.
    let mut aligned = AlignedVec::<16>::with_capacity(bytes.len());
    aligned.extend_from_slice(bytes);
    rkyv::from_bytes::<T, Error>(&aligned).map_err(CodecError::Decode)
}

pub fn decode_snapshot(bytes: &[u8]) -> Result<SessionSnapshot, CodecError> {
    let snapshot: SessionSnapshot = decode(bytes)?;
    if snapshot.version != SESSION_SNAPSHOT_VERSION {
        return Err(CodecError::Version {
            expected: SESSION_SNAPSHOT_VERSION,
            found: snapshot.version,
        });
    }
    Ok(snapshot)
}
