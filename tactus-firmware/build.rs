//! Build script for tactus-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates device.toml and turns it into `$OUT_DIR/device_config.rs`

use std::collections::BTreeMap;
use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// GPIOs wired to the companion UART (UART0 TX/RX)
const RESERVED_PINS: [u8; 2] = [0, 1];

/// Highest user GPIO on the RP2040
const MAX_PIN: u8 = 29;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DeviceConfig {
    haptic: HapticSection,
    buttons: ButtonSection,
    companion: CompanionSection,
    metronome: MetronomeSection,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct HapticSection {
    pin: u8,
    #[serde(default)]
    active_low: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ButtonSection {
    up: u8,
    select: u8,
    down: u8,
    back: u8,
    #[serde(default = "default_hold_delay")]
    hold_delay_ms: u64,
    #[serde(default = "default_repeat")]
    repeat_ms: u64,
    #[serde(default = "default_debounce")]
    debounce_ms: u64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CompanionSection {
    #[serde(default = "default_baud")]
    baud: u32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MetronomeSection {
    #[serde(default = "default_policy")]
    policy: String,
}

fn default_hold_delay() -> u64 {
    400
}

fn default_repeat() -> u64 {
    30
}

fn default_debounce() -> u64 {
    20
}

fn default_baud() -> u32 {
    115_200
}

fn default_policy() -> String {
    "configured".into()
}

fn main() {
    setup_linker();
    let config = load_config();
    validate_config(&config);
    generate_config(&config);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Read and parse device.toml
fn load_config() -> DeviceConfig {
    println!("cargo:rerun-if-changed=device.toml");

    let config_path = Path::new("device.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: device.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a device.toml describing the board.       ║\n\
            ║  Please create one in the tactus-firmware directory.             ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read device.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    match toml::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid device.toml                                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    }
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            // toml errors quote user input, which may be non-ASCII
            let truncated = if line.chars().count() > 64 {
                format!("{}...", line.chars().take(61).collect::<String>())
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Check pins, timings and policy
fn validate_config(config: &DeviceConfig) {
    let mut errors = Vec::new();

    let pins = [
        ("haptic.pin", config.haptic.pin),
        ("buttons.up", config.buttons.up),
        ("buttons.select", config.buttons.select),
        ("buttons.down", config.buttons.down),
        ("buttons.back", config.buttons.back),
    ];

    let mut used: BTreeMap<u8, &str> = BTreeMap::new();
    for (name, pin) in pins {
        if pin > MAX_PIN {
            errors.push(format!("{} = {} is not a GPIO (0-{})", name, pin, MAX_PIN));
        }
        if RESERVED_PINS.contains(&pin) {
            errors.push(format!("{} = {} is taken by the companion UART", name, pin));
        }
        if let Some(other) = used.insert(pin, name) {
            errors.push(format!("{} and {} both use GPIO{}", other, name, pin));
        }
    }

    if config.buttons.repeat_ms == 0 {
        errors.push("buttons.repeat_ms must be greater than 0".to_string());
    }
    if config.buttons.debounce_ms >= config.buttons.hold_delay_ms {
        errors.push("buttons.debounce_ms must be below buttons.hold_delay_ms".to_string());
    }
    if !(1200..=1_000_000).contains(&config.companion.baud) {
        errors.push("companion.baud must be 1200-1000000".to_string());
    }
    if policy_variant(&config.metronome.policy).is_none() {
        errors.push(format!(
            "metronome.policy must be 'configured' or 'threshold', got '{}'",
            config.metronome.policy
        ));
    }

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid device configuration                             ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=device.toml validated successfully");
}

fn policy_variant(policy: &str) -> Option<&'static str> {
    match policy {
        "configured" => Some("Configured"),
        "threshold" => Some("Threshold"),
        _ => None,
    }
}

/// Write constants and pin macros for `src/config.rs`
fn generate_config(config: &DeviceConfig) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let mut out = String::new();

    out.push_str("// Generated by build.rs from device.toml. Do not edit.\n\n");
    out.push_str(&format!(
        "/// Motor runs while the pin is low\npub const HAPTIC_ACTIVE_LOW: bool = {};\n",
        config.haptic.active_low
    ));
    out.push_str(&format!(
        "/// Hold time before Up/Down start repeating\npub const BUTTON_HOLD_DELAY_MS: u64 = {};\n",
        config.buttons.hold_delay_ms
    ));
    out.push_str(&format!(
        "/// Up/Down repeat interval while held\npub const BUTTON_REPEAT_MS: u64 = {};\n",
        config.buttons.repeat_ms
    ));
    out.push_str(&format!(
        "/// Button debounce time\npub const BUTTON_DEBOUNCE_MS: u64 = {};\n",
        config.buttons.debounce_ms
    ));
    out.push_str(&format!(
        "/// Companion UART baud rate\npub const COMPANION_BAUD: u32 = {};\n",
        config.companion.baud
    ));
    out.push_str(&format!(
        "/// Vibration policy\npub const POLICY: tactus_core::vibe::PolicyKind = tactus_core::vibe::PolicyKind::{};\n\n",
        policy_variant(&config.metronome.policy).unwrap()
    ));

    let macros = [
        ("haptic_pin", config.haptic.pin),
        ("button_up_pin", config.buttons.up),
        ("button_select_pin", config.buttons.select),
        ("button_down_pin", config.buttons.down),
        ("button_back_pin", config.buttons.back),
    ];
    for (name, pin) in macros {
        out.push_str(&format!(
            "macro_rules! {} {{\n    ($p:ident) => {{\n        $p.PIN_{}\n    }};\n}}\n",
            name, pin
        ));
    }

    fs::write(out_dir.join("device_config.rs"), out).unwrap();
}
