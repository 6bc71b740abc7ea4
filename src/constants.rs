//! Shared crate-wide constants.

use std::time::Duration;

use indoc::indoc;

/// Quiet period after the last keystroke before the active pane is sent for
/// translation.
pub const DEFAULT_IDLE_THRESHOLD: Duration = Duration::from_millis(3000);

/// Cadence of the idle poll. Must stay below `DEFAULT_IDLE_THRESHOLD`.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// How long the UI loop waits for input before redrawing. Short enough that
/// a translation answer shows up promptly after it arrives.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(50);

pub const DEFAULT_SERVER: &str = "http://127.0.0.1:5000";

pub const DEFAULT_STATE_FILE: &str = ".dmnt-sync.json";

/// Shown in the diagnostics area when the service could not be reached or
/// answered with garbage.
pub const TRANSLATION_FAILED_NOTICE: &str =
    "translation request failed; it will be retried once the pane is idle";

/// File names used by the save action.
pub const SOURCE_EXPORT_NAME: &str = "NxDmntAsm.txt";
pub const DERIVED_EXPORT_NAME: &str = "NxDmntAsm.asm";

/// Spaces inserted by Tab inside an editor pane.
pub const INDENT: &str = "    ";

/// Rows reserved for the diagnostics area.
pub const DIAGNOSTICS_HEIGHT: u16 = 6;

/// Loaded into the cheat pane when no saved session exists.
pub const EXAMPLE_CHEATS: &str = indoc! {"
    [Moon Jump]
    80000002
    580F0000 05C3FA50
    580F1000 00000260
    580F1000 00000058
    580F1000 00000110
    580F1000 00000050
    780F0000 0000002C
    640F0000 00000000 C3500000
    20000000

    [Inf HP]
    580F0000 05C3FA50
    580F1000 00000260
    580F1000 00000058
    780F0000 00000160
    640F0000 00000000 00000050

    [Invincible]
    580F0000 05C3FA50
    580F1000 00000260
    580F1000 00000058
    780F0000 00000250
    680F0000 50000000 50000000

    [Inf Ammo]
    580F0000 05C3FA50
    580F1000 00000260
    580F1000 00000058
    580F1000 00000390
    780F1000 000005E0
    300E0000 0000000B
    640F0000 00000000 000003E8
    780F0000 000000E0
    310E0000
    20000000

    [MAX Ammo]
    580F0000 05C3FA50
    580F1000 00000260
    580F1000 00000058
    580F1000 00000390
    780F1000 0000056C
    300E0000 0000000B
    640F0000 00000000 000003E8
    780F0000 000000E0
    310E0000
    20000000

    [Weapon ATK]
    580F0000 05C3FA50
    580F1000 00000260
    580F1000 00000058
    580F1000 00000390
    780F1000 0000055C
    300E0000 0000000B
    640F0000 00000000 461C3C00
    780F0000 000000E0
    310E0000
    20000000
"};
