//! Yaz0 (SZS) decompression.
//!
//! Yaz0 is the run-length compression Nintendo wraps around many Wii U-era
//! container files, BFRES included. The stream starts with a 16-byte header
//! (magic, big-endian decompressed size, 8 bytes of padding), followed by
//! groups of eight chunks announced by a configuration byte: a set bit copies
//! one literal byte, a clear bit is a back-reference into the bytes produced
//! so far.
//!
//! # Example
//!
//! ```no_run
//! let data = std::fs::read("model.szs")?;
//! if latte_yaz0::is_yaz0(&data) {
//!     let raw = latte_yaz0::decompress(&data)?;
//!     println!("{} bytes decompressed", raw.len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;

pub use error::{Error, Result};

/// Magic bytes at the start of every Yaz0 stream.
pub const MAGIC: &[u8; 4] = b"Yaz0";

/// Size of the stream header (magic + decompressed size + padding).
const HEADER_SIZE: usize = 16;

/// Check whether a buffer starts with the Yaz0 magic.
#[inline]
pub fn is_yaz0(data: &[u8]) -> bool {
    data.len() >= MAGIC.len() && &data[..MAGIC.len()] == MAGIC
}

/// Read the declared decompressed size from a Yaz0 header.
pub fn decompressed_size(data: &[u8]) -> Result<usize> {
    if data.len() < HEADER_SIZE {
        return Err(Error::Truncated { offset: data.len() });
    }
    if !is_yaz0(data) {
        return Err(Error::InvalidMagic {
            actual: [data[0], data[1], data[2], data[3]],
        });
    }
    Ok(u32::from_be_bytes([data[4], data[5], data[6], data[7]]) as usize)
}

/// Decompress a complete Yaz0 stream into a new buffer.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let size = decompressed_size(data)?;
    let mut out = Vec::with_capacity(size);
    let mut pos = HEADER_SIZE;

    while out.len() < size {
        let group = read_byte(data, &mut pos)?;
        for bit in (0..8).rev() {
            if out.len() >= size {
                break;
            }
            if group & (1 << bit) != 0 {
                // Literal byte.
                let byte = read_byte(data, &mut pos)?;
                out.push(byte);
            } else {
                // Back-reference, 2 or 3 bytes long. A zero count nibble means
                // the real count follows in a third byte, biased by 0x12.
                let hi = read_byte(data, &mut pos)? as usize;
                let lo = read_byte(data, &mut pos)? as usize;
                let token = (hi << 8) | lo;

                let count = match token >> 12 {
                    0 => read_byte(data, &mut pos)? as usize + 0x12,
                    nibble => nibble + 0x02,
                };
                let distance = (token & 0x0FFF) + 1;
                if distance > out.len() {
                    return Err(Error::InvalidBackReference {
                        distance,
                        produced: out.len(),
                    });
                }

                // Copy byte-by-byte so overlapping runs repeat correctly.
                for _ in 0..count {
                    let byte = out[out.len() - distance];
                    out.push(byte);
                }
            }
        }
    }

    // The last back-reference of a group may overshoot the declared size.
    out.truncate(size);
    Ok(out)
}

#[inline]
fn read_byte(data: &[u8], pos: &mut usize) -> Result<u8> {
    let byte = *data.get(*pos).ok_or(Error::Truncated { offset: *pos })?;
    *pos += 1;
    Ok(byte)
}
