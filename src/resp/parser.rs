use redis_protocol::resp2::types::OwnedFrame as RespFrame;

use super::utils::{extract_bytes, extract_string, extract_timeout};
use crate::broker::Command;
use crate::error::ParseError;

/// A decoded client request.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Broker(Command),
    Ping(Option<RespFrame>),
    CommandDocs,
}

/// Command names understood by the server, as reported by `COMMAND`.
pub const SUPPORTED_COMMANDS: &[&str] = &["PUT", "GET", "PING", "COMMAND"];

/// Turns a RESP array such as `PUT orders hello` or `GET orders 2` into a
/// [`Request`]. Command names are case-insensitive.
pub fn parse_request(frame: RespFrame) -> Result<Request, ParseError> {
    let args = match frame {
        RespFrame::Array(args) => args,
        _ => return Err(ParseError::NotAnArray),
    };

    let Some(name) = args.first() else {
        return Err(ParseError::Empty);
    };
    let name = extract_string(name, "command name")?.to_uppercase();

    match name.as_str() {
        "PUT" => {
            if args.len() != 3 {
                return Err(ParseError::WrongArity("put"));
            }
            let queue = extract_string(&args[1], "queue name")?;
            let payload = extract_bytes(&args[2], "payload")?;
            Ok(Request::Broker(Command::push(queue, payload)))
        }
        "GET" => {
            if !(2..=3).contains(&args.len()) {
                return Err(ParseError::WrongArity("get"));
            }
            let queue = extract_string(&args[1], "queue name")?;
            let timeout_seconds = match args.get(2) {
                Some(frame) => extract_timeout(frame)?,
                None => 0,
            };
            Ok(Request::Broker(Command::pop(queue, timeout_seconds)))
        }
        "PING" => match args.len() {
            1 => Ok(Request::Ping(None)),
            2 => Ok(Request::Ping(args.into_iter().nth(1))),
            _ => Err(ParseError::WrongArity("ping")),
        },
        "COMMAND" => Ok(Request::CommandDocs),
        _ => Err(ParseError::UnknownCommand(name)),
    }
}
