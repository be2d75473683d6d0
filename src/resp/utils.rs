use bytes::Bytes;
use redis_protocol::resp2::types::OwnedFrame as RespFrame;

use crate::error::ParseError;

/// Reads a UTF-8 argument. Invalid UTF-8 is rejected rather than rewritten,
/// so two distinct byte strings can never map to the same name.
pub fn extract_string(frame: &RespFrame, what: &'static str) -> Result<String, ParseError> {
    match frame {
        RespFrame::BulkString(data) | RespFrame::SimpleString(data) => {
            String::from_utf8(data.clone()).map_err(|_| ParseError::InvalidUtf8(what))
        }
        _ => Err(ParseError::InvalidArgument(what)),
    }
}

pub fn extract_bytes(frame: &RespFrame, what: &'static str) -> Result<Bytes, ParseError> {
    match frame {
        RespFrame::BulkString(data) | RespFrame::SimpleString(data) => {
            Ok(Bytes::copy_from_slice(data))
        }
        _ => Err(ParseError::InvalidArgument(what)),
    }
}

/// Reads a timeout in seconds. Sign is kept; rejecting negatives is up to
/// the broker.
pub fn extract_timeout(frame: &RespFrame) -> Result<i64, ParseError> {
    match frame {
        RespFrame::Integer(n) => Ok(*n),
        RespFrame::BulkString(data) | RespFrame::SimpleString(data) => {
            let text = String::from_utf8_lossy(data);
            let text = text.trim();
            if text.is_empty() {
                return Ok(0);
            }
            text.parse::<i64>()
                .map_err(|_| ParseError::InvalidTimeout(text.to_string()))
        }
        other => Err(ParseError::InvalidTimeout(format!("{other:?}"))),
    }
}
