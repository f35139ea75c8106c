use crate::proto::{ParseOutcome, Response, parse_response};

/// Recovers whole responses from a byte stream with no message boundaries.
///
/// Bytes go in with [`ingest`](Self::ingest) in whatever sizes the transport
/// hands them over; [`drain`](Self::drain) then yields every complete packet
/// at the front, in order. A trailing partial packet stays buffered until the
/// rest of it arrives.
#[derive(Debug, Default)]
pub struct Reassembler {
    buf: Vec<u8>,
    // start of the unconsumed bytes in `buf`
    head: usize,
}

impl Reassembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ingest(&mut self, bytes: &[u8]) {
        if self.head > 0 {
            self.buf.drain(..self.head);
            self.head = 0;
        }
        self.buf.extend_from_slice(bytes);
    }

    /// Lazily extract complete responses. Ends at the first incomplete packet;
    /// call again after the next `ingest`.
    pub fn drain(&mut self) -> Drain<'_> {
        Drain { inner: self }
    }

    /// Bytes received but not yet handed out as a response.
    pub fn pending(&self) -> usize {
        self.buf.len() - self.head
    }

    pub fn pending_bytes(&self) -> &[u8] {
        &self.buf[self.head..]
    }

    pub fn clear(&mut self) {
        self.buf.clear();
        self.head = 0;
    }
}

pub struct Drain<'a> {
    inner: &'a mut Reassembler,
}

impl Iterator for Drain<'_> {
    type Item = Response;

    fn next(&mut self) -> Option<Response> {
        let r = &mut *self.inner;
        match parse_response(&r.buf[r.head..]) {
            ParseOutcome::Complete { response, consumed } => {
                r.head += consumed;
                if r.head == r.buf.len() {
                    r.buf.clear();
                    r.head = 0;
                }
                Some(response)
            }
            ParseOutcome::NeedMoreBytes => None,
        }
    }
}
