use std::time::Instant;

use crate::proto::{Response, ResponseKind};

/// Running counters over received responses.
#[derive(Debug, Clone)]
pub struct Stats {
    pub regular: u64,
    pub information: u64,
    pub unknown: u64,
    pub corrupt: u64,
    pub bytes: u64,
    t0: Instant,
    last: Instant,
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

impl Stats {
    pub fn new() -> Self {
        Self {
            regular: 0,
            information: 0,
            unknown: 0,
            corrupt: 0,
            bytes: 0,
            t0: Instant::now(),
            last: Instant::now(),
        }
    }

    pub fn record(&mut self, response: &Response) {
        self.bytes += response.len() as u64;
        match response.kind() {
            ResponseKind::Regular => self.regular += 1,
            ResponseKind::Information => self.information += 1,
            ResponseKind::Unknown => self.unknown += 1,
        }
        if response.is_corrupt() {
            self.corrupt += 1;
        }
    }

    pub fn total(&self) -> u64 {
        self.regular + self.information + self.unknown
    }

    pub fn maybe_print(&mut self, stats_int: f64) {
        if self.last.elapsed().as_secs_f64() >= stats_int {
            self.print();
        }
    }

    pub fn print(&mut self) {
        let dur = self.t0.elapsed().as_secs_f64().max(1e-3);
        log::info!(
            "[rx] regular={} info={} unknown={} corrupt={} bytes={} over {:.1}s => {:.1}B/s",
            self.regular,
            self.information,
            self.unknown,
            self.corrupt,
            self.bytes,
            dur,
            (self.bytes as f64) / dur,
        );
        self.last = Instant::now();
        self.t0 = Instant::now();
        self.bytes = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::{ParseOutcome, checksum, parse_response};

    fn parse(buf: &[u8]) -> Response {
        match parse_response(buf) {
            ParseOutcome::Complete { response, .. } => response,
            ParseOutcome::NeedMoreBytes => panic!("incomplete"),
        }
    }

    #[test]
    fn counts_by_kind() {
        let mut good = vec![0xFF, 0xFF, 0x00, 0x01, 0x01];
        good.push(checksum(&good[2..]));
        let mut bad = good.clone();
        bad[3] = 0x02;

        let mut s = Stats::new();
        s.record(&parse(&good));
        s.record(&parse(&bad));
        s.record(&parse(&[0x00, 0x00]));
        assert_eq!(s.regular, 2);
        assert_eq!(s.unknown, 1);
        assert_eq!(s.corrupt, 2);
        assert_eq!(s.total(), 3);
        assert_eq!(s.bytes, 6 + 6 + 2);
    }
}
