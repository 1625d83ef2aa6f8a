//! Synchronous request handling over whole frames.

use tracing::{error, warn};

use lldp_protocol::{decode_request, encode_response, Response};

use crate::inventory::Inventory;

/// Decodes one request frame, answers it from `inventory` and returns the
/// encoded reply.
///
/// Frames that do not decode get a failure reply naming the problem.
pub fn handle_frame(inventory: &mut Inventory, frame: &[u8]) -> Vec<u8> {
    let response = match decode_request(frame) {
        Ok(request) => inventory.answer(request),
        Err(e) => {
            warn!(error = %e, len = frame.len(), "Rejecting malformed request");
            Response::failure(e.to_string())
        }
    };
    encode_reply(&response)
}

/// Encodes a reply, falling back to a bare failure if it cannot be framed.
pub fn encode_reply(response: &Response) -> Vec<u8> {
    match encode_response(response) {
        Ok(frame) => frame,
        Err(e) => {
            error!(error = %e, kind = %response.message_type(), "Failed to encode reply");
            encode_response(&Response::failure(e.to_string())).unwrap_or_default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lldp_core::Hardware;
    use lldp_protocol::{decode_response, encode_request, Request};

    #[test]
    fn test_list_interfaces_frame() {
        let mut inventory = Inventory::new(vec![Hardware::new("eth0", 1)]);
        let frame = encode_request(&Request::ListInterfaces).unwrap();

        let reply = decode_response(&handle_frame(&mut inventory, &frame)).unwrap();

        match reply {
            Response::Interfaces(list) => assert_eq!(list.len(), 1),
            other => panic!("unexpected reply: {other:?}"),
        }
    }

    #[test]
    fn test_garbage_gets_failure_reply() {
        let mut inventory = Inventory::default();
        let reply = decode_response(&handle_frame(&mut inventory, &[0xff; 3])).unwrap();
        assert!(matches!(reply, Response::Failure { .. }));
    }
}
