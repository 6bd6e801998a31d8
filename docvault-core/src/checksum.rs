//! Content hashes used to detect silent corruption of stored artifacts.

use md5::{Digest, Md5};
use tokio::io::{AsyncRead, AsyncReadExt};

const CHUNK_SIZE: usize = 64 * 1024;

/// Hash everything `reader` yields and render the digest as lowercase hex.
pub async fn md5_hex<R>(reader: &mut R) -> std::io::Result<String>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut hasher = Md5::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let read = reader.read(&mut buf).await?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
    }
    Ok(hex::encode(hasher.finalize()))
}

pub fn md5_hex_bytes(bytes: &[u8]) -> String {
    hex::encode(Md5::digest(bytes))
}

/// Read `reader` to the end, discarding the bytes.
pub async fn drain<R>(reader: &mut R) -> std::io::Result<u64>
where
    R: AsyncRead + Unpin + ?Sized,
{
    tokio::io::copy(reader, &mut tokio::io::sink()).await
}

/// Stored checksums may have been written in either case.
pub fn checksums_match(stored: &str, actual: &str) -> bool {
    stored.trim().eq_ignore_ascii_case(actual.trim())
}
