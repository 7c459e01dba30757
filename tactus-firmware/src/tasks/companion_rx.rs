//! Companion UART receive task
//!
//! Parses frames from the companion, forwards configuration to the
//! controller and answers each CONFIG frame with ACK or NACK.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;
use heapless::String;

use tactus_protocol::dictionary::INT_TEXT_LEN;
use tactus_protocol::{CompanionMessage, ConfigMessage, DeviceMessage, FrameParser};

use crate::channels::{ConfigRequest, CONFIG_CHANNEL, CONFIG_TEXT_LEN, TX_CHANNEL};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Companion RX task - receives and parses frames
#[embassy_executor::task]
pub async fn companion_rx_task(mut rx: BufferedUartRx) {
    info!("Companion RX task started");

    let mut parser = FrameParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    match parser.feed(byte) {
                        Ok(Some(frame)) => match CompanionMessage::from_frame(&frame) {
                            Ok(message) => handle_message(message).await,
                            Err(e) => {
                                warn!("Rejected companion frame: {:?}", e);
                                reply(DeviceMessage::Nack { reason: e.code() });
                            }
                        },
                        Ok(None) => {}
                        Err(e) => {
                            warn!("Frame parse error: {:?}", e);
                        }
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}

/// Handle a parsed companion message
async fn handle_message(message: CompanionMessage<'_>) {
    match message {
        CompanionMessage::Ping => {
            trace!("PING received");
            reply(DeviceMessage::Pong);
        }
        CompanionMessage::Config(config) => {
            debug!("Config received: {:?}", config);
            CONFIG_CHANNEL.send(to_request(&config)).await;
            reply(DeviceMessage::Ack);
        }
    }
}

/// Own the borrowed config so it can cross the channel
fn to_request(config: &ConfigMessage<'_>) -> ConfigRequest {
    let vibe_duration = config.vibe_duration.map(|value| {
        let mut scratch = String::<INT_TEXT_LEN>::new();
        let mut text = String::<CONFIG_TEXT_LEN>::new();
        // Text too long to be a number is forwarded empty and rejected there
        if text.push_str(value.as_text(&mut scratch)).is_err() {
            warn!("Pulse length text too long");
            text.clear();
        }
        text
    });
    ConfigRequest { vibe_duration }
}

fn reply(message: DeviceMessage) {
    if TX_CHANNEL.try_send(message).is_err() {
        warn!("TX channel full, dropping {:?}", message);
    }
}
