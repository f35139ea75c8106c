use crate::proto::{Command, CommandKind};

/// Last commanded robot state, as far as this host knows.
///
/// This is an optimistic echo of outbound commands, not a read-back: it is
/// updated before the bytes hit the wire, so a failed or partial send leaves
/// it ahead of the real device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceState {
    /// Degrees, 0..360.
    pub heading: u16,
    pub velocity: u8,
    pub rotation_rate: u8,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    /// Front LED.
    pub brightness: u8,
    pub stopped: bool,
}

impl Default for DeviceState {
    fn default() -> Self {
        Self {
            heading: 0,
            velocity: 0,
            rotation_rate: 0,
            red: 0,
            green: 0,
            blue: 0,
            brightness: 255,
            stopped: true,
        }
    }
}

impl DeviceState {
    /// Fold an outbound command into the mirror. Kinds that carry no tracked
    /// state, and payloads too short for their layout, are ignored.
    pub fn apply(&mut self, cmd: &Command) {
        match (cmd.kind(), cmd.payload()) {
            (CommandKind::Roll, &[speed, hi, lo, go, ..]) => {
                self.velocity = speed;
                self.heading = u16::from_be_bytes([hi, lo]);
                self.stopped = go == 0;
            }
            (CommandKind::RotationRate, &[rate, ..]) => {
                self.rotation_rate = rate;
            }
            (CommandKind::RgbLedOutput, &[r, g, b, ..]) => {
                self.red = r;
                self.green = g;
                self.blue = b;
            }
            (CommandKind::FrontLedOutput, &[brightness, ..]) => {
                self.brightness = brightness;
            }
            (
                kind @ (CommandKind::Roll
                | CommandKind::RotationRate
                | CommandKind::RgbLedOutput
                | CommandKind::FrontLedOutput),
                payload,
            ) => {
                log::warn!(
                    "state: {} payload too short ({} bytes), not mirrored",
                    kind,
                    payload.len()
                );
            }
            _ => {}
        }
    }

    pub fn color(&self) -> (u8, u8, u8) {
        (self.red, self.green, self.blue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = DeviceState::default();
        assert_eq!(s.brightness, 255);
        assert!(s.stopped);
        assert_eq!(s.color(), (0, 0, 0));
    }

    #[test]
    fn roll_updates_motion() {
        let mut s = DeviceState::default();
        s.apply(&Command::roll(270, 90, false));
        assert_eq!(s.heading, 270);
        assert_eq!(s.velocity, 90);
        assert!(!s.stopped);

        s.apply(&Command::roll(270, 0, true));
        assert_eq!(s.velocity, 0);
        assert!(s.stopped);
    }

    #[test]
    fn led_and_rate() {
        let mut s = DeviceState::default();
        s.apply(&Command::rgb_led(10, 20, 30));
        s.apply(&Command::front_led(7));
        s.apply(&Command::rotation_rate(200));
        assert_eq!(s.color(), (10, 20, 30));
        assert_eq!(s.brightness, 7);
        assert_eq!(s.rotation_rate, 200);
    }

    #[test]
    fn untracked_kinds_are_ignored() {
        let mut s = DeviceState::default();
        let before = s;
        s.apply(&Command::ping());
        s.apply(&Command::spin_left(100));
        s.apply(&Command::set_data_streaming(1, 1, 0, 0));
        // shares the FRONT_LED wire code but is a different kind
        s.apply(&Command::new(CommandKind::CustomPing, vec![1]));
        assert_eq!(s, before);
    }

    #[test]
    fn short_payload_leaves_state() {
        let mut s = DeviceState::default();
        let before = s;
        s.apply(&Command::new(CommandKind::Roll, vec![1, 2]));
        s.apply(&Command::new(CommandKind::RgbLedOutput, vec![]));
        assert_eq!(s, before);
    }
}
