use crate::binary::{ByteOrder, Width, layout_from_key};
use crate::error::{Error, Result};
use crate::model::DataType;

/// Layout used when the key carries no width or byte order
const DEFAULT_LAYOUT: (Width, ByteOrder) = (Width::Int32, ByteOrder::Le);

fn encode(
    new_value: &str,
    width: Width,
    order: ByteOrder,
    data_type: DataType,
) -> Result<Vec<u8>> {
    let invalid = || Error::InvalidValue {
        value: new_value.to_string(),
        data_type,
    };
    let text = new_value.trim();

    macro_rules! to_bytes {
        ($value:expr) => {
            match order {
                ByteOrder::Le => $value.to_le_bytes().to_vec(),
                ByteOrder::Be => $value.to_be_bytes().to_vec(),
            }
        };
    }

    let bytes = match width {
        Width::Int32 => {
            let value: i32 = text.parse().map_err(|_| invalid())?;
            to_bytes!(value)
        }
        Width::Int64 => {
            let value: i64 = text.parse().map_err(|_| invalid())?;
            to_bytes!(value)
        }
        Width::Float32 => {
            let value: f32 = text.parse().map_err(|_| invalid())?;
            if !value.is_finite() {
                return Err(invalid());
            }
            to_bytes!(value)
        }
        Width::Float64 => {
            let value: f64 = text.parse().map_err(|_| invalid())?;
            if !value.is_finite() {
                return Err(invalid());
            }
            to_bytes!(value)
        }
    };
    Ok(bytes)
}

/// Overwrite the number at `offset` in place, leaving every other byte as is.
pub(crate) fn rewrite_number(
    bytes: &[u8],
    offset: usize,
    key: &str,
    new_value: &str,
    data_type: DataType,
) -> Result<Vec<u8>> {
    let (width, order) = layout_from_key(key).unwrap_or(DEFAULT_LAYOUT);
    let encoded = encode(new_value, width, order, data_type)?;

    let end = offset
        .checked_add(encoded.len())
        .filter(|end| *end <= bytes.len())
        .ok_or(Error::OffsetOutOfBounds {
            offset,
            width: encoded.len(),
            len: bytes.len(),
        })?;

    let mut out = bytes.to_vec();
    out[offset..end].copy_from_slice(&encoded);
    Ok(out)
}

/// Replace printable text embedded in binary data.
///
/// Surrounding bytes are often fixed-size records, so the replacement must
/// have the same byte length as the current value.
pub(crate) fn rewrite_embedded(
    bytes: &[u8],
    offset: usize,
    current: &str,
    new_value: &str,
) -> Result<Vec<u8>> {
    let end = offset
        .checked_add(current.len())
        .filter(|end| *end <= bytes.len())
        .ok_or(Error::OffsetOutOfBounds {
            offset,
            width: current.len(),
            len: bytes.len(),
        })?;
    if &bytes[offset..end] != current.as_bytes() {
        return Err(Error::LocationNotFound(format!(
            "Offset {} (embedded)",
            offset
        )));
    }
    if new_value.len() != current.len() || !new_value.is_ascii() {
        return Err(Error::NotRewritable(format!(
            "embedded value at {} must stay {} ASCII bytes",
            offset,
            current.len()
        )));
    }

    let mut out = bytes.to_vec();
    out[offset..end].copy_from_slice(new_value.as_bytes());
    Ok(out)
}
