// src/proto/parser.rs
use super::command::Command;
use super::response::{
    HEADER_LEN, IDX_LEN, Response, ResponseKind, SYNC, SYNC_REGULAR, checksum,
};

/// Header bytes before the payload of an outbound packet.
const COMMAND_HEADER_LEN: usize = 6;

/// Result of looking for a packet at the front of a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Complete { response: Response, consumed: usize },
    NeedMoreBytes,
}

/// Public API: serialize a command into one outbound packet.
///
/// `FF FF <device> <command> <seq> <len+1> <payload..> <checksum>`
pub fn encode_command(cmd: &Command, seq: u8) -> Vec<u8> {
    let kind = cmd.kind();
    let payload = cmd.payload();
    let mut out = Vec::with_capacity(COMMAND_HEADER_LEN + payload.len() + 1);

    out.push(SYNC);
    out.push(SYNC_REGULAR);
    out.push(kind.device_id());
    out.push(kind.command_code());
    out.push(seq);
    // length byte counts the checksum too
    out.push((payload.len() + 1) as u8);
    out.extend_from_slice(payload);
    out.push(checksum(&out[2..]));
    out
}

/// Public API: frame the packet at the front of `buf`.
///
/// Never checks the checksum, so a damaged packet still frames and the stream
/// can move on to the next one.
pub fn parse_response(buf: &[u8]) -> ParseOutcome {
    let [a, b, ..] = *buf else {
        return ParseOutcome::NeedMoreBytes;
    };

    let kind = ResponseKind::classify(a, b);
    if kind == ResponseKind::Unknown {
        return ParseOutcome::Complete {
            response: Response::unknown(a, b),
            consumed: 2,
        };
    }

    if buf.len() < HEADER_LEN {
        return ParseOutcome::NeedMoreBytes;
    }
    let total = HEADER_LEN + buf[IDX_LEN] as usize;
    if buf.len() < total {
        return ParseOutcome::NeedMoreBytes;
    }

    ParseOutcome::Complete {
        response: Response::framed(buf[..total].to_vec(), kind),
        consumed: total,
    }
}

/* ---------- tests ---------- */

#[cfg(test)]
mod tests {
    use super::super::command::CommandKind;
    use super::super::response::{InformationKind, ResponseCode};
    use super::*;

    fn complete(buf: &[u8]) -> (Response, usize) {
        match parse_response(buf) {
            ParseOutcome::Complete { response, consumed } => (response, consumed),
            ParseOutcome::NeedMoreBytes => panic!("expected a packet in {:02X?}", buf),
        }
    }

    /// Regular response built with the same checksum routine as the encoder.
    fn regular(code: u8, seq: u8, data: &[u8]) -> Vec<u8> {
        let mut p = vec![0xFF, 0xFF, code, seq, (data.len() + 1) as u8];
        p.extend_from_slice(data);
        p.push(checksum(&p[2..]));
        p
    }

    #[test]
    fn encode_rgb_led() {
        let cmd = Command::new(CommandKind::RgbLedOutput, vec![10, 20, 30]);
        let pkt = encode_command(&cmd, 0);
        let sum: u32 = 0x02 + 0x20 + 0x00 + 0x04 + 0x0A + 0x14 + 0x1E;
        let chk = !(sum as u8);
        assert_eq!(
            pkt,
            vec![0xFF, 0xFF, 0x02, 0x20, 0x00, 0x04, 0x0A, 0x14, 0x1E, chk]
        );
    }

    #[test]
    fn encode_empty_payload() {
        let pkt = encode_command(&Command::bare(CommandKind::Ping), 9);
        assert_eq!(pkt[..6], [0xFF, 0xFF, 0x00, 0x00, 0x09, 0x01]);
        assert_eq!(pkt.len(), 7);
        assert_eq!(pkt[6], checksum(&pkt[2..6]));
    }

    #[test]
    fn encoded_checksum_validates_for_every_kind() {
        for (i, kind) in CommandKind::ALL.into_iter().enumerate() {
            let payload: Vec<u8> = (0..i as u8).map(|b| b.wrapping_mul(37)).collect();
            let cmd = Command::new(kind, payload.clone());
            let pkt = encode_command(&cmd, i as u8);
            let n = pkt.len();
            assert_eq!(n, 7 + payload.len());
            assert_eq!(pkt[n - 1], checksum(&pkt[2..n - 1]), "{}", kind);
            assert_eq!(pkt[2], kind.device_id());
            assert_eq!(pkt[3], kind.command_code());
        }
    }

    #[test]
    fn encode_full_payload() {
        let cmd = Command::new(CommandKind::Macro, vec![0xAB; 255]);
        let pkt = encode_command(&cmd, 1);
        // 255 + 1 wraps the length byte
        assert_eq!(pkt[5], 0x00);
        assert_eq!(pkt.len(), 6 + 255 + 1);
        let n = pkt.len();
        assert_eq!(pkt[n - 1], checksum(&pkt[2..n - 1]));
    }

    #[test]
    fn sequence_wraparound() {
        let cmd = Command::bare(CommandKind::Ping);
        let seqs: [u32; 2] = [255, 256];
        let wire: Vec<u8> = seqs
            .iter()
            .map(|&s| encode_command(&cmd, (s % 256) as u8)[4])
            .collect();
        assert_eq!(wire, vec![255, 0]);
    }

    #[test]
    fn parse_regular_ok() {
        let buf = [0xFF, 0xFF, 0x00, 0x05, 0x00, 0xFA];
        let (r, consumed) = complete(&buf);
        assert_eq!(r.kind(), ResponseKind::Regular);
        assert_eq!(r.code(), ResponseCode::Ok);
        assert_eq!(r.sequence_number(), Some(5));
        assert_eq!(consumed, 5);
        assert_eq!(r.raw(), &buf[..5]);
    }

    #[test]
    fn parse_regular_with_checksum() {
        let good = regular(0, 5, &[]);
        assert_eq!(good, vec![0xFF, 0xFF, 0x00, 0x05, 0x01, 0xF9]);
        let (r, consumed) = complete(&good);
        assert_eq!(consumed, good.len());
        assert!(!r.is_corrupt());

        let mut bad = good.clone();
        bad[5] ^= 0xFF;
        let (r, consumed) = complete(&bad);
        assert_eq!(consumed, bad.len());
        assert!(r.is_corrupt());
    }

    #[test]
    fn built_responses_frame_exactly() {
        for len in [0usize, 1, 2, 17, 200, 254] {
            let data: Vec<u8> = (0..len).map(|i| (i * 7) as u8).collect();
            let pkt = regular(0, len as u8, &data);
            let (r, consumed) = complete(&pkt);
            assert_eq!(consumed, pkt.len());
            assert_eq!(r.data(), &data[..]);
            assert!(!r.is_corrupt());
        }
    }

    #[test]
    fn parse_information() {
        let mut pkt = vec![0xFF, 0xFE, 0x03, 0x00, 0x05, 0x00, 0x10, 0xFF, 0xF0];
        pkt.push(checksum(&pkt[2..]));
        let (r, consumed) = complete(&pkt);
        assert_eq!(consumed, 10);
        assert_eq!(r.kind(), ResponseKind::Information);
        assert_eq!(r.code(), ResponseCode::Ok);
        assert_eq!(r.information_kind(), InformationKind::Data);
        assert_eq!(r.sequence_number(), None);
        assert_eq!(r.data_words().collect::<Vec<_>>(), vec![16, -16]);
    }

    #[test]
    fn information_code_offset_differs() {
        // byte 2 would be a failure code for a regular response
        let mut pkt = vec![0xFF, 0xFE, 0x06, 0x07, 0x01];
        pkt.push(checksum(&pkt[2..]));
        let (r, _) = complete(&pkt);
        assert_eq!(r.code(), ResponseCode::Invalid);
        assert_eq!(r.information_kind(), InformationKind::Emit);
    }

    #[test]
    fn unknown_prefix_consumes_two() {
        let buf = [0xAA, 0xBB, 0xFF, 0xFF, 0x00];
        let (r, consumed) = complete(&buf);
        assert_eq!(consumed, 2);
        assert_eq!(r.kind(), ResponseKind::Unknown);
        assert_eq!(r.code(), ResponseCode::ErrorBadMessage);
        assert_eq!(r.raw(), &[0xAA, 0xBB]);
        assert_eq!(parse_response(&buf[consumed..]), ParseOutcome::NeedMoreBytes);
    }

    #[test]
    fn truncated_needs_more() {
        let pkt = regular(0, 1, &[1, 2, 3]);
        for cut in 0..pkt.len() {
            assert_eq!(
                parse_response(&pkt[..cut]),
                ParseOutcome::NeedMoreBytes,
                "cut at {}",
                cut
            );
        }
    }

    #[test]
    fn trailing_bytes_left_alone() {
        let mut buf = regular(1, 2, &[3]);
        let first = buf.len();
        buf.extend_from_slice(&[0xFF, 0xFF, 0x00]);
        let (r, consumed) = complete(&buf);
        assert_eq!(consumed, first);
        assert_eq!(r.code(), ResponseCode::ErrorGeneral);
    }
}
