//! Tactus - Haptic Metronome Firmware
//!
//! Main firmware binary for RP2040-based wearables. A vibration motor on
//! the wrist marks the beat; four buttons change the tempo, start/stop the
//! metronome and leave it; a companion device configures the pulse length
//! over UART.
//!
//! Task layout:
//! ```text
//! buttons ──intents──►            ──HAPTIC_CMD──► haptic (VibeMotor)
//!                      controller
//! companion_rx ─cfg──►            ──TX_CHANNEL──► companion_tx
//! ```

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use tactus_core::state::Intent;
use tactus_hal_rp2040::flash::FlashStorage;

#[macro_use]
mod config;
mod channels;
mod haptic;
mod storage;
mod tasks;

use crate::config::{haptic_polarity, ButtonTiming, COMPANION_BAUD, HAPTIC_ACTIVE_LOW};
use crate::storage::SettingsStore;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Tactus firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Settings are loaded before anything can change them
    let mut store = SettingsStore::new(FlashStorage::new(p.FLASH, p.DMA_CH0));
    let snapshot = store.load().await;
    info!("Settings loaded");

    // Companion link on UART0 (GPIO0 TX, GPIO1 RX)
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = COMPANION_BAUD;

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();
    info!("UART initialized at {} baud", COMPANION_BAUD);

    // Motor starts off whatever its polarity
    let motor_pin = Output::new(haptic_pin!(p), Level::from(HAPTIC_ACTIVE_LOW));

    let up = Input::new(button_up_pin!(p), Pull::Up);
    let select = Input::new(button_select_pin!(p), Pull::Up);
    let down = Input::new(button_down_pin!(p), Pull::Up);
    let back = Input::new(button_back_pin!(p), Pull::Up);
    let timing = ButtonTiming::from_config();

    spawner.spawn(tasks::haptic_task(motor_pin, haptic_polarity())).unwrap();
    spawner.spawn(tasks::companion_rx_task(rx)).unwrap();
    spawner.spawn(tasks::companion_tx_task(tx)).unwrap();
    spawner
        .spawn(tasks::repeat_button_task(up, Intent::Increase, timing))
        .unwrap();
    spawner
        .spawn(tasks::repeat_button_task(down, Intent::Decrease, timing))
        .unwrap();
    spawner.spawn(tasks::select_button_task(select, timing)).unwrap();
    spawner.spawn(tasks::back_button_task(back, timing)).unwrap();
    spawner.spawn(tasks::controller_task(store, snapshot)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
