//! Embedding encoding and decoding.
//!
//! Two on-disk formats, selected once per deployment by
//! [`EmbeddingEncoding`]:
//!
//! - **Text**: values joined by `,`, each written with Rust's shortest
//!   round-trip `f64` formatting. Rows written by other tools in plain
//!   decimal or exponent notation (`1e-05`) decode too.
//! - **Binary**: little-endian IEEE-754 doubles, 8 bytes each, concatenated
//!   in vector order.
//!
//! Decoding never truncates or pads: any payload that is not exactly a
//! non-empty sequence of finite values is a
//! [`StoreError::CorruptEncoding`].

use facegate_core::Embedding;
pub use facegate_settings::EmbeddingEncoding;
use rusqlite::types::{ToSql, ToSqlOutput, ValueRef};

use crate::errors::{Result, StoreError};

/// Width of one encoded element in the binary format.
pub const F64_WIDTH: usize = std::mem::size_of::<f64>();

/// An embedding ready to bind as a SQL parameter.
#[derive(Clone, Debug, PartialEq)]
pub enum EncodedEmbedding {
    /// Bound as a TEXT value.
    Text(String),
    /// Bound as a BLOB value.
    Binary(Vec<u8>),
}

impl ToSql for EncodedEmbedding {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Self::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Self::Binary(b) => ToSqlOutput::Borrowed(ValueRef::Blob(b)),
        })
    }
}

/// Encode with the given format.
pub fn encode(encoding: EmbeddingEncoding, embedding: &Embedding) -> EncodedEmbedding {
    match encoding {
        EmbeddingEncoding::Text => EncodedEmbedding::Text(encode_text(embedding.as_slice())),
        EmbeddingEncoding::Binary => EncodedEmbedding::Binary(encode_binary(embedding.as_slice())),
    }
}

/// Decode a stored column value with the given format.
///
/// The value's SQLite storage class must match the format: TEXT for
/// [`EmbeddingEncoding::Text`], BLOB for [`EmbeddingEncoding::Binary`].
pub fn decode(encoding: EmbeddingEncoding, value: ValueRef<'_>) -> Result<Embedding> {
    match (encoding, value) {
        (EmbeddingEncoding::Text, ValueRef::Text(bytes)) => {
            let raw = std::str::from_utf8(bytes)
                .map_err(|e| StoreError::corrupt(format!("embedding text is not UTF-8: {e}")))?;
            decode_text(raw)
        }
        (EmbeddingEncoding::Binary, ValueRef::Blob(bytes)) => decode_binary(bytes),
        (encoding, other) => Err(StoreError::corrupt(format!(
            "expected {encoding} embedding, found {} value",
            other.data_type()
        ))),
    }
}

/// Comma-join the values in shortest round-trip decimal form.
pub fn encode_text(values: &[f64]) -> String {
    let mut out = String::with_capacity(values.len() * 20);
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&v.to_string());
    }
    out
}

/// Parse a comma-joined decimal list.
pub fn decode_text(raw: &str) -> Result<Embedding> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(StoreError::corrupt("embedding text is empty"));
    }
    let values = raw
        .split(',')
        .enumerate()
        .map(|(i, token)| {
            let token = token.trim();
            token.parse::<f64>().map_err(|_| {
                StoreError::corrupt(format!("unparsable value {token:?} at index {i}"))
            })
        })
        .collect::<Result<Vec<f64>>>()?;
    Embedding::new(values).map_err(StoreError::corrupt)
}

/// Concatenate little-endian doubles.
pub fn encode_binary(values: &[f64]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Split a blob into little-endian doubles.
pub fn decode_binary(blob: &[u8]) -> Result<Embedding> {
    if blob.is_empty() || blob.len() % F64_WIDTH != 0 {
        return Err(StoreError::corrupt(format!(
            "blob length {} is not a positive multiple of {F64_WIDTH}",
            blob.len()
        )));
    }
    let values = blob
        .chunks_exact(F64_WIDTH)
        .map(|chunk| {
            let mut bytes = [0_u8; F64_WIDTH];
            bytes.copy_from_slice(chunk);
            f64::from_le_bytes(bytes)
        })
        .collect();
    Embedding::new(values).map_err(StoreError::corrupt)
}
