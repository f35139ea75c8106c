//! Named constructors for the commands the robot understands.
//!
//! Each one only picks a [`CommandKind`] and lays out the payload bytes;
//! multi-byte fields are big-endian.

use super::command::{Command, CommandKind};

/// Fixed size of the name field in SET_BLUETOOTH_NAME.
pub const BLUETOOTH_NAME_LEN: usize = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorMode {
    Forward = 1,
    Reverse = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockSpecifier {
    Factory = 0,
    User = 1,
}

/// Sensor selection bits for [`Command::set_data_streaming`].
pub mod streaming {
    pub const OFF: u32 = 0;

    pub const MOTOR_BACK_EMF_LEFT_FILTERED: u32 = 32;
    pub const MOTOR_BACK_EMF_RIGHT_FILTERED: u32 = 64;
    pub const MOTOR_BACK_EMF_LEFT_RAW: u32 = MOTOR_BACK_EMF_LEFT_FILTERED << 16;
    pub const MOTOR_BACK_EMF_RIGHT_RAW: u32 = MOTOR_BACK_EMF_RIGHT_FILTERED << 16;
    pub const MOTOR_BACK_EMF_FILTERED: u32 =
        MOTOR_BACK_EMF_LEFT_FILTERED | MOTOR_BACK_EMF_RIGHT_FILTERED;
    pub const MOTOR_BACK_EMF_RAW: u32 = MOTOR_BACK_EMF_LEFT_RAW | MOTOR_BACK_EMF_RIGHT_RAW;

    pub const MAGNETOMETER_Z_FILTERED: u32 = 128;
    pub const MAGNETOMETER_Y_FILTERED: u32 = 256;
    pub const MAGNETOMETER_X_FILTERED: u32 = 512;
    pub const MAGNETOMETER_X_RAW: u32 = MAGNETOMETER_X_FILTERED << 16;
    pub const MAGNETOMETER_Y_RAW: u32 = MAGNETOMETER_Y_FILTERED << 16;
    pub const MAGNETOMETER_Z_RAW: u32 = MAGNETOMETER_Z_FILTERED << 16;
    pub const MAGNETOMETER_FILTERED: u32 =
        MAGNETOMETER_X_FILTERED | MAGNETOMETER_Y_FILTERED | MAGNETOMETER_Z_FILTERED;
    pub const MAGNETOMETER_RAW: u32 = MAGNETOMETER_X_RAW | MAGNETOMETER_Y_RAW | MAGNETOMETER_Z_RAW;

    pub const GYRO_Z_FILTERED: u32 = 1024;
    pub const GYRO_Y_FILTERED: u32 = 2048;
    pub const GYRO_X_FILTERED: u32 = 4096;
    pub const GYRO_X_RAW: u32 = GYRO_X_FILTERED << 16;
    pub const GYRO_Y_RAW: u32 = GYRO_Y_FILTERED << 16;
    pub const GYRO_Z_RAW: u32 = GYRO_Z_FILTERED << 16;
    pub const GYRO_FILTERED: u32 = GYRO_X_FILTERED | GYRO_Y_FILTERED | GYRO_Z_FILTERED;
    pub const GYRO_RAW: u32 = GYRO_X_RAW | GYRO_Y_RAW | GYRO_Z_RAW;

    pub const ACCELEROMETER_Z_FILTERED: u32 = 8192;
    pub const ACCELEROMETER_Y_FILTERED: u32 = 16384;
    pub const ACCELEROMETER_X_FILTERED: u32 = 32768;
    pub const ACCELEROMETER_X_RAW: u32 = ACCELEROMETER_X_FILTERED << 16;
    pub const ACCELEROMETER_Y_RAW: u32 = ACCELEROMETER_Y_FILTERED << 16;
    pub const ACCELEROMETER_Z_RAW: u32 = ACCELEROMETER_Z_FILTERED << 16;
    pub const ACCELEROMETER_FILTERED: u32 =
        ACCELEROMETER_X_FILTERED | ACCELEROMETER_Y_FILTERED | ACCELEROMETER_Z_FILTERED;
    pub const ACCELEROMETER_RAW: u32 =
        ACCELEROMETER_X_RAW | ACCELEROMETER_Y_RAW | ACCELEROMETER_Z_RAW;

    pub const IMU_YAW_FILTERED: u32 = 65536;
    pub const IMU_ROLL_FILTERED: u32 = 131072;
    pub const IMU_PITCH_FILTERED: u32 = 262144;
    pub const IMU_FILTERED: u32 = IMU_YAW_FILTERED | IMU_ROLL_FILTERED | IMU_PITCH_FILTERED;

    /// Look up a mask by its lower-case name (`"gyro-raw"`, `"imu-filtered"`, ...).
    pub fn by_name(name: &str) -> Option<u32> {
        let mask = match name.to_ascii_lowercase().replace('_', "-").as_str() {
            "off" => OFF,
            "motor-back-emf-filtered" => MOTOR_BACK_EMF_FILTERED,
            "motor-back-emf-raw" => MOTOR_BACK_EMF_RAW,
            "magnetometer-filtered" => MAGNETOMETER_FILTERED,
            "magnetometer-raw" => MAGNETOMETER_RAW,
            "gyro-filtered" => GYRO_FILTERED,
            "gyro-raw" => GYRO_RAW,
            "accelerometer-filtered" => ACCELEROMETER_FILTERED,
            "accelerometer-raw" => ACCELEROMETER_RAW,
            "imu-filtered" => IMU_FILTERED,
            _ => return None,
        };
        Some(mask)
    }
}

impl Command {
    pub fn ping() -> Self {
        Command::bare(CommandKind::Ping)
    }

    pub fn version() -> Self {
        Command::bare(CommandKind::Versioning)
    }

    /// Name is truncated or zero padded to [`BLUETOOTH_NAME_LEN`] bytes.
    pub fn set_bluetooth_name(name: &str) -> Self {
        let mut payload = vec![0u8; BLUETOOTH_NAME_LEN];
        let bytes = name.as_bytes();
        let n = bytes.len().min(BLUETOOTH_NAME_LEN);
        payload[..n].copy_from_slice(&bytes[..n]);
        Command::new(CommandKind::SetBluetoothName, payload)
    }

    pub fn get_bluetooth_info() -> Self {
        Command::bare(CommandKind::GetBluetoothInfo)
    }

    /// Device drops the connection when it goes to sleep.
    pub fn sleep(seconds: u16, macro_id: u8) -> Self {
        let [hi, lo] = seconds.to_be_bytes();
        Command::new(CommandKind::GoToSleep, vec![hi, lo, macro_id])
    }

    pub fn jump_to_bootloader() -> Self {
        Command::bare(CommandKind::JumpToBootloader)
    }

    pub fn jump_to_main() -> Self {
        Command::bare(CommandKind::JumpToMain)
    }

    pub fn level1_diagnostics() -> Self {
        Command::bare(CommandKind::Level1Diagnostics)
    }

    /// Makes `heading` (degrees) the new zero heading.
    pub fn calibrate(heading: i32) -> Self {
        let [hi, lo] = (heading.rem_euclid(360) as u16).to_be_bytes();
        Command::new(CommandKind::Calibrate, vec![hi, lo])
    }

    pub fn enable_stabilizer(on: bool) -> Self {
        Command::new(CommandKind::Stabilization, vec![on as u8])
    }

    pub fn rotation_rate(rate: u8) -> Self {
        Command::new(CommandKind::RotationRate, vec![rate])
    }

    pub fn rgb_led(red: u8, green: u8, blue: u8) -> Self {
        Command::new(CommandKind::RgbLedOutput, vec![red, green, blue])
    }

    pub fn front_led(brightness: u8) -> Self {
        Command::new(CommandKind::FrontLedOutput, vec![brightness])
    }

    /// `heading` in degrees (0..360), `speed` 0..=255. The last payload byte
    /// is 0 for stop and 1 for go.
    pub fn roll(heading: u16, speed: u8, stop: bool) -> Self {
        let [hi, lo] = heading.to_be_bytes();
        Command::new(CommandKind::Roll, vec![speed, hi, lo, if stop { 0 } else { 1 }])
    }

    pub fn raw_motor(left: MotorMode, left_speed: u8, right: MotorMode, right_speed: u8) -> Self {
        Command::new(
            CommandKind::RawMotor,
            vec![left as u8, left_speed, right as u8, right_speed],
        )
    }

    pub fn spin_left(speed: u8) -> Self {
        Command::new(
            CommandKind::SpinLeft,
            vec![MotorMode::Reverse as u8, speed, MotorMode::Forward as u8, speed],
        )
    }

    pub fn spin_right(speed: u8) -> Self {
        Command::new(
            CommandKind::SpinRight,
            vec![MotorMode::Forward as u8, speed, MotorMode::Reverse as u8, speed],
        )
    }

    pub fn get_configuration_block(block: BlockSpecifier) -> Self {
        Command::new(CommandKind::GetConfigurationBlock, vec![block as u8])
    }

    pub fn run_macro(macro_id: u8) -> Self {
        Command::new(CommandKind::RunMacro, vec![macro_id])
    }

    pub fn abort_macro() -> Self {
        Command::bare(CommandKind::AbortMacro)
    }

    /// Ask the robot to stream sensor frames back as information packets.
    ///
    /// `divisor` divides the 400 Hz sample rate, `frames` is samples per
    /// packet, `mask` is built from [`streaming`], `count` is packets to send
    /// (0 = forever).
    pub fn set_data_streaming(divisor: u16, frames: u16, mask: u32, count: u8) -> Self {
        let mut payload = Vec::with_capacity(9);
        payload.extend_from_slice(&divisor.to_be_bytes());
        payload.extend_from_slice(&frames.to_be_bytes());
        payload.extend_from_slice(&mask.to_be_bytes());
        payload.push(count);
        Command::new(CommandKind::SetDataStreaming, payload)
    }
}
