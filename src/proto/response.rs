use std::fmt;

/// Bytes before the payload in every known response framing.
pub const HEADER_LEN: usize = 5;

pub(crate) const SYNC: u8 = 0xFF;
pub(crate) const SYNC_REGULAR: u8 = 0xFF;
pub(crate) const SYNC_INFORMATION: u8 = 0xFE;

pub(crate) const IDX_CODE: usize = 2;
pub(crate) const IDX_SEQ: usize = 3;
pub(crate) const IDX_LEN: usize = 4;
pub(crate) const IDX_INFO_KIND: usize = 2;
pub(crate) const IDX_INFO_CODE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    Regular,
    Information,
    Unknown,
}

impl ResponseKind {
    pub fn classify(a: u8, b: u8) -> Self {
        match (a, b) {
            (SYNC, SYNC_REGULAR) => ResponseKind::Regular,
            (SYNC, SYNC_INFORMATION) => ResponseKind::Information,
            _ => ResponseKind::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResponseKind::Regular => "REGULAR",
            ResponseKind::Information => "INFORMATION",
            ResponseKind::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    Ok,
    ErrorGeneral,
    ErrorChecksum,
    ErrorFragment,
    ErrorBadCommand,
    ErrorUnsupported,
    ErrorBadMessage,
    ErrorParameter,
    ErrorExecute,
    ErrorMainAppCorrupt,
    ErrorTimeOut,
    ErrorUnknown,
    UnknownResponse,
    Invalid,
}

impl ResponseCode {
    /// Status byte of a regular response.
    pub fn from_regular(b: u8) -> Self {
        match b {
            0 => ResponseCode::Ok,
            1 => ResponseCode::ErrorGeneral,
            2 => ResponseCode::ErrorChecksum,
            3 => ResponseCode::ErrorFragment,
            4 => ResponseCode::ErrorBadCommand,
            5 => ResponseCode::ErrorUnsupported,
            6 => ResponseCode::ErrorBadMessage,
            7 => ResponseCode::ErrorParameter,
            8 => ResponseCode::ErrorExecute,
            52 => ResponseCode::ErrorMainAppCorrupt,
            53 => ResponseCode::ErrorUnknown,
            254 => ResponseCode::UnknownResponse,
            255 => ResponseCode::ErrorTimeOut,
            _ => ResponseCode::Invalid,
        }
    }

    /// Status byte of an information response.
    pub fn from_information(b: u8) -> Self {
        match b {
            0 => ResponseCode::Ok,
            _ => ResponseCode::Invalid,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResponseCode::Ok => "OK",
            ResponseCode::ErrorGeneral => "ERROR_GENERAL",
            ResponseCode::ErrorChecksum => "ERROR_CHECKSUM",
            ResponseCode::ErrorFragment => "ERROR_FRAGMENT",
            ResponseCode::ErrorBadCommand => "ERROR_BAD_COMMAND",
            ResponseCode::ErrorUnsupported => "ERROR_UNSUPPORTED",
            ResponseCode::ErrorBadMessage => "ERROR_BAD_MESSAGE",
            ResponseCode::ErrorParameter => "ERROR_PARAMETER",
            ResponseCode::ErrorExecute => "ERROR_EXECUTE",
            ResponseCode::ErrorMainAppCorrupt => "ERROR_MAIN_APP_CORRUPT",
            ResponseCode::ErrorTimeOut => "ERROR_TIME_OUT",
            ResponseCode::ErrorUnknown => "ERROR_UNKNOWN",
            ResponseCode::UnknownResponse => "UNKNOWN_RESPONSE",
            ResponseCode::Invalid => "INVALID",
        }
    }
}

/// What an information (asynchronous) packet carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InformationKind {
    Emit,
    Data,
    Invalid,
}

impl InformationKind {
    pub fn from_byte(b: u8) -> Self {
        match b {
            6 => InformationKind::Emit,
            3 => InformationKind::Data,
            _ => InformationKind::Invalid,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InformationKind::Emit => "EMIT",
            InformationKind::Data => "DATA",
            InformationKind::Invalid => "INVALID",
        }
    }
}

macro_rules! display_as_str {
    ($($t:ty),*) => {$(
        impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    )*};
}

display_as_str!(ResponseKind, ResponseCode, InformationKind);

/// One's complement of the 8-bit sum of `bytes`.
pub fn checksum(bytes: &[u8]) -> u8 {
    !bytes.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}

/// One framed inbound packet.
///
/// Framing never looks at the checksum; use [`Response::is_corrupt`] to decide
/// what to do with a damaged packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    raw: Vec<u8>,
    kind: ResponseKind,
    code: ResponseCode,
}

impl Response {
    /// Two-byte stub for a packet whose sync bytes were not recognised.
    pub(crate) fn unknown(a: u8, b: u8) -> Self {
        Self {
            raw: vec![a, b],
            kind: ResponseKind::Unknown,
            code: ResponseCode::ErrorBadMessage,
        }
    }

    /// `raw` must be a complete Regular or Information packet.
    pub(crate) fn framed(raw: Vec<u8>, kind: ResponseKind) -> Self {
        let code = match kind {
            ResponseKind::Regular => ResponseCode::from_regular(raw[IDX_CODE]),
            ResponseKind::Information => ResponseCode::from_information(raw[IDX_INFO_CODE]),
            ResponseKind::Unknown => ResponseCode::ErrorBadMessage,
        };
        Self { raw, kind, code }
    }

    pub fn kind(&self) -> ResponseKind {
        self.kind
    }

    pub fn code(&self) -> ResponseCode {
        self.code
    }

    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Echo of the command sequence number; regular responses only.
    pub fn sequence_number(&self) -> Option<u8> {
        match self.kind {
            ResponseKind::Regular => self.raw.get(IDX_SEQ).copied(),
            _ => None,
        }
    }

    pub fn information_kind(&self) -> InformationKind {
        match self.kind {
            ResponseKind::Information => self
                .raw
                .get(IDX_INFO_KIND)
                .map_or(InformationKind::Invalid, |&b| InformationKind::from_byte(b)),
            _ => InformationKind::Invalid,
        }
    }

    pub fn header_length(&self) -> usize {
        HEADER_LEN
    }

    /// Declared length byte; counts the data bytes plus the checksum byte.
    pub fn payload_length(&self) -> usize {
        self.raw.get(IDX_LEN).map_or(0, |&b| b as usize)
    }

    /// Everything after the header, checksum included.
    pub fn payload(&self) -> &[u8] {
        self.raw.get(HEADER_LEN..).unwrap_or(&[])
    }

    /// Payload without the trailing checksum byte.
    pub fn data(&self) -> &[u8] {
        match self.payload() {
            [] => &[],
            [data @ .., _] => data,
        }
    }

    /// Streamed sensor samples are big-endian signed 16-bit words.
    pub fn data_words(&self) -> impl Iterator<Item = i16> + '_ {
        self.data()
            .chunks_exact(2)
            .map(|w| i16::from_be_bytes([w[0], w[1]]))
    }

    pub fn claimed_checksum(&self) -> u8 {
        self.raw.last().copied().unwrap_or(0)
    }

    pub fn actual_checksum(&self) -> u8 {
        match self.raw.len() {
            0..=2 => checksum(&[]),
            n => checksum(&self.raw[2..n - 1]),
        }
    }

    /// Unknown stubs have no checksum and always count as corrupt.
    pub fn is_corrupt(&self) -> bool {
        self.kind == ResponseKind::Unknown || self.claimed_checksum() != self.actual_checksum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regular(code: u8, seq: u8, data: &[u8]) -> Vec<u8> {
        let mut p = vec![0xFF, 0xFF, code, seq, (data.len() + 1) as u8];
        p.extend_from_slice(data);
        p.push(checksum(&p[2..]));
        p
    }

    #[test]
    fn code_tables() {
        assert_eq!(ResponseCode::from_regular(0), ResponseCode::Ok);
        assert_eq!(ResponseCode::from_regular(6), ResponseCode::ErrorBadMessage);
        assert_eq!(ResponseCode::from_regular(52), ResponseCode::ErrorMainAppCorrupt);
        assert_eq!(ResponseCode::from_regular(53), ResponseCode::ErrorUnknown);
        assert_eq!(ResponseCode::from_regular(254), ResponseCode::UnknownResponse);
        assert_eq!(ResponseCode::from_regular(255), ResponseCode::ErrorTimeOut);
        assert_eq!(ResponseCode::from_regular(9), ResponseCode::Invalid);
        assert_eq!(ResponseCode::from_information(0), ResponseCode::Ok);
        assert_eq!(ResponseCode::from_information(1), ResponseCode::Invalid);
    }

    #[test]
    fn classify_sync() {
        assert_eq!(ResponseKind::classify(0xFF, 0xFF), ResponseKind::Regular);
        assert_eq!(ResponseKind::classify(0xFF, 0xFE), ResponseKind::Information);
        assert_eq!(ResponseKind::classify(0xFE, 0xFF), ResponseKind::Unknown);
        assert_eq!(ResponseKind::classify(0xAA, 0xBB), ResponseKind::Unknown);
    }

    #[test]
    fn accessors() {
        let r = Response::framed(regular(0, 7, &[0x01, 0x02, 0xFF, 0xFE]), ResponseKind::Regular);
        assert_eq!(r.code(), ResponseCode::Ok);
        assert_eq!(r.sequence_number(), Some(7));
        assert_eq!(r.payload_length(), 5);
        assert_eq!(r.len(), HEADER_LEN + 5);
        assert_eq!(r.data(), &[0x01, 0x02, 0xFF, 0xFE]);
        assert_eq!(r.data_words().collect::<Vec<_>>(), vec![0x0102, -2]);
        assert!(!r.is_corrupt());
    }

    #[test]
    fn every_flipped_byte_is_corrupt() {
        let good = regular(0, 3, &[9, 8, 7]);
        for i in 2..good.len() - 1 {
            let mut bad = good.clone();
            bad[i] ^= 0x01;
            let r = Response::framed(bad, ResponseKind::Regular);
            assert!(r.is_corrupt(), "flip at {} not detected", i);
        }
    }

    #[test]
    fn information_fields() {
        let mut p = vec![0xFF, 0xFE, 0x03, 0x00, 0x01];
        p.push(checksum(&p[2..]));
        let r = Response::framed(p, ResponseKind::Information);
        assert_eq!(r.code(), ResponseCode::Ok);
        assert_eq!(r.information_kind(), InformationKind::Data);
        assert_eq!(r.sequence_number(), None);
        assert!(!r.is_corrupt());
    }

    #[test]
    fn unknown_stub() {
        let r = Response::unknown(0xAA, 0xBB);
        assert_eq!(r.kind(), ResponseKind::Unknown);
        assert_eq!(r.code(), ResponseCode::ErrorBadMessage);
        assert_eq!(r.len(), 2);
        assert_eq!(r.sequence_number(), None);
        assert_eq!(r.payload_length(), 0);
        assert!(r.data().is_empty());
        assert!(r.is_corrupt());
    }
}
