//! Utility types for Bitcoin binary serialization.
//!
//! Provides VarInt encoding and a `ByteWriter` used to assemble
//! length-prefixed preimages such as the signed-message digest input.

// ---------------------------------------------------------------------------
// VarInt
// ---------------------------------------------------------------------------

/// A Bitcoin protocol variable-length integer.
///
/// The encoding uses 1, 3, 5, or 9 bytes depending on the magnitude of the
/// value; multi-byte forms are a marker byte (`0xfd`, `0xfe`, `0xff`)
/// followed by the value in little-endian order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarInt(pub u64);

impl VarInt {
    /// Return the wire-format byte length of this VarInt.
    ///
    /// # Returns
    /// 1, 3, 5, or 9 depending on the value.
    pub fn length(&self) -> usize {
        if self.0 < 0xfd {
            1
        } else if self.0 <= 0xffff {
            3
        } else if self.0 <= 0xffff_ffff {
            5
        } else {
            9
        }
    }

    /// Encode the VarInt into a new byte vector.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = vec![0u8; self.length()];
        self.put_bytes(&mut buf);
        buf
    }

    /// Write the VarInt into a destination buffer.
    ///
    /// The buffer must be at least `self.length()` bytes long.
    ///
    /// # Arguments
    /// * `dst` - Destination buffer to write into.
    ///
    /// # Returns
    /// The number of bytes written.
    pub fn put_bytes(&self, dst: &mut [u8]) -> usize {
        let v = self.0;
        if v < 0xfd {
            dst[0] = v as u8;
            1
        } else if v <= 0xffff {
            dst[0] = 0xfd;
            dst[1..3].copy_from_slice(&(v as u16).to_le_bytes());
            3
        } else if v <= 0xffff_ffff {
            dst[0] = 0xfe;
            dst[1..5].copy_from_slice(&(v as u32).to_le_bytes());
            5
        } else {
            dst[0] = 0xff;
            dst[1..9].copy_from_slice(&v.to_le_bytes());
            9
        }
    }
}

impl From<usize> for VarInt {
    fn from(v: usize) -> Self {
        VarInt(v as u64)
    }
}

// ---------------------------------------------------------------------------
// ByteWriter
// ---------------------------------------------------------------------------

/// An append-only buffer for Bitcoin protocol binary data.
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    /// Create a new empty writer.
    pub fn new() -> Self {
        ByteWriter { buf: Vec::new() }
    }

    /// Create a new writer with a pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        ByteWriter {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Append raw bytes to the buffer.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Append a VarInt to the buffer.
    pub fn write_varint(&mut self, varint: VarInt) {
        let mut tmp = [0u8; 9];
        let n = varint.put_bytes(&mut tmp);
        self.buf.extend_from_slice(&tmp[..n]);
    }

    /// Append `bytes` prefixed by its length as a VarInt.
    pub fn write_var_bytes(&mut self, bytes: &[u8]) {
        self.write_varint(VarInt::from(bytes.len()));
        self.write_bytes(bytes);
    }

    /// Return a reference to the current buffer contents.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }
}

impl Default for ByteWriter {
    fn default() -> Self {
        Self::new()
    }
}
