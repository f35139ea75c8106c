use std::fmt;

/// Largest payload the one-byte length field can describe.
pub const MAX_PAYLOAD_LEN: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    // ---- Core device (id 0) ----
    Ping,
    Versioning,
    SetBluetoothName,
    GetBluetoothInfo,
    GoToSleep,
    JumpToBootloader,
    Level1Diagnostics,

    // ---- Bootloader (id 1) ----
    JumpToMain,

    // ---- Robot (id 2) ----
    Calibrate,
    Stabilization,
    RotationRate,
    RgbLedOutput,
    FrontLedOutput,
    Roll,
    Boost,
    RawMotor,
    GetConfigurationBlock,
    RunMacro,
    Macro,
    SaveMacro,
    AbortMacro,
    SetDataStreaming,
    SpinLeft,
    SpinRight,
    CustomPing,
}

impl CommandKind {
    pub const ALL: [CommandKind; 25] = [
        CommandKind::Ping,
        CommandKind::Versioning,
        CommandKind::SetBluetoothName,
        CommandKind::GetBluetoothInfo,
        CommandKind::GoToSleep,
        CommandKind::JumpToBootloader,
        CommandKind::Level1Diagnostics,
        CommandKind::JumpToMain,
        CommandKind::Calibrate,
        CommandKind::Stabilization,
        CommandKind::RotationRate,
        CommandKind::RgbLedOutput,
        CommandKind::FrontLedOutput,
        CommandKind::Roll,
        CommandKind::Boost,
        CommandKind::RawMotor,
        CommandKind::GetConfigurationBlock,
        CommandKind::RunMacro,
        CommandKind::Macro,
        CommandKind::SaveMacro,
        CommandKind::AbortMacro,
        CommandKind::SetDataStreaming,
        CommandKind::SpinLeft,
        CommandKind::SpinRight,
        CommandKind::CustomPing,
    ];

    /// Virtual device the command is addressed to.
    pub fn device_id(self) -> u8 {
        use CommandKind::*;
        match self {
            Ping | Versioning | SetBluetoothName | GetBluetoothInfo | GoToSleep
            | JumpToBootloader | Level1Diagnostics => 0,
            JumpToMain => 1,
            Calibrate | Stabilization | RotationRate | RgbLedOutput | FrontLedOutput | Roll
            | Boost | RawMotor | GetConfigurationBlock | RunMacro | Macro | SaveMacro
            | AbortMacro | SetDataStreaming | SpinLeft | SpinRight | CustomPing => 2,
        }
    }

    /// Command byte on the wire. Several kinds share a code with another kind.
    pub fn command_code(self) -> u8 {
        use CommandKind::*;
        match self {
            Ping => 0,
            Versioning => 2,
            SetBluetoothName => 16,
            GetBluetoothInfo => 17,
            GoToSleep => 34,
            JumpToBootloader => 48,
            Level1Diagnostics => 64,
            JumpToMain => 4,
            Calibrate => 1,
            Stabilization => 2,
            RotationRate => 3,
            RgbLedOutput => 32,
            FrontLedOutput => 33,
            Roll => 48,
            Boost => 49,
            RawMotor => 51,
            GetConfigurationBlock => 64,
            RunMacro => 80,
            Macro => 81,
            SaveMacro => 82,
            AbortMacro => 85,
            SetDataStreaming => 17,
            // same wire command as RawMotor
            SpinLeft | SpinRight => 51,
            // same wire command as FrontLedOutput
            CustomPing => 33,
        }
    }

    pub fn as_str(self) -> &'static str {
        use CommandKind::*;
        match self {
            Ping => "PING",
            Versioning => "VERSIONING",
            SetBluetoothName => "SET_BLUETOOTH_NAME",
            GetBluetoothInfo => "GET_BLUETOOTH_INFO",
            GoToSleep => "GO_TO_SLEEP",
            JumpToBootloader => "JUMP_TO_BOOTLOADER",
            Level1Diagnostics => "LEVEL_1_DIAGNOSTICS",
            JumpToMain => "JUMP_TO_MAIN",
            Calibrate => "CALIBRATE",
            Stabilization => "STABILIZATION",
            RotationRate => "ROTATION_RATE",
            RgbLedOutput => "RGB_LED_OUTPUT",
            FrontLedOutput => "FRONT_LED_OUTPUT",
            Roll => "ROLL",
            Boost => "BOOST",
            RawMotor => "RAW_MOTOR",
            GetConfigurationBlock => "GET_CONFIGURATION_BLOCK",
            RunMacro => "RUN_MACRO",
            Macro => "MACRO",
            SaveMacro => "SAVE_MACRO",
            AbortMacro => "ABORT_MACRO",
            SetDataStreaming => "SET_DATA_STREAMING",
            SpinLeft => "SPIN_LEFT",
            SpinRight => "SPIN_RIGHT",
            CustomPing => "CUSTOM_PING",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One outbound command: what to do plus its argument bytes.
///
/// The sequence number is not part of the command; it is chosen by whoever
/// serializes it (see [`Command::to_packet`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    kind: CommandKind,
    payload: Vec<u8>,
}

impl Command {
    /// # Panics
    ///
    /// Panics if `payload` is longer than [`MAX_PAYLOAD_LEN`]; the wire length
    /// field cannot describe it.
    pub fn new(kind: CommandKind, payload: Vec<u8>) -> Self {
        assert!(
            payload.len() <= MAX_PAYLOAD_LEN,
            "{} payload is {} bytes, max {}",
            kind,
            payload.len(),
            MAX_PAYLOAD_LEN
        );
        Self { kind, payload }
    }

    /// Command without arguments.
    pub fn bare(kind: CommandKind) -> Self {
        Self {
            kind,
            payload: Vec::new(),
        }
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Serialize with the given sequence number.
    pub fn to_packet(&self, seq: u8) -> Vec<u8> {
        super::parser::encode_command(self, seq)
    }
}
