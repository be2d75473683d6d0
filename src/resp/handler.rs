use redis_protocol::resp2::types::OwnedFrame as RespFrame;

use super::parser::{parse_request, Request, SUPPORTED_COMMANDS};
use crate::broker::{BrokerResult, BrokerService};

pub async fn handle_command(frame: RespFrame, broker: &BrokerService) -> RespFrame {
    let request = match parse_request(frame) {
        Ok(request) => request,
        Err(err) => {
            tracing::debug!("rejected request: {}", err);
            return to_frame(BrokerResult::from(err));
        }
    };

    match request {
        Request::Broker(command) => to_frame(broker.execute(command).await),
        Request::Ping(None) => RespFrame::SimpleString(b"PONG".to_vec()),
        Request::Ping(Some(echo)) => echo,
        Request::CommandDocs => RespFrame::Array(
            SUPPORTED_COMMANDS
                .iter()
                .map(|name| RespFrame::BulkString(name.as_bytes().to_vec()))
                .collect(),
        ),
    }
}

/// Maps a broker outcome to its RESP reply.
pub fn to_frame(result: BrokerResult) -> RespFrame {
    match result {
        BrokerResult::Ack => RespFrame::SimpleString(b"OK".to_vec()),
        BrokerResult::Ok(payload) => RespFrame::BulkString(payload.to_vec()),
        BrokerResult::NotFound => RespFrame::Null,
        BrokerResult::BadRequest(reason) => RespFrame::Error(format!("ERR bad request: {reason}")),
        BrokerResult::InternalError(reason) => {
            RespFrame::Error(format!("ERR internal error: {reason}"))
        }
    }
}
