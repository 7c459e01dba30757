//! Companion UART transmit task
//!
//! Sends acknowledgements, status reports and heartbeat responses.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use tactus_protocol::frame::MAX_FRAME_SIZE;

use crate::channels::TX_CHANNEL;

/// Companion TX task - encodes and sends queued messages
#[embassy_executor::task]
pub async fn companion_tx_task(mut tx: BufferedUartTx) {
    info!("Companion TX task started");

    let mut buf = [0u8; MAX_FRAME_SIZE];

    loop {
        let message = TX_CHANNEL.receive().await;
        let frame = message.to_frame();

        match frame.encode(&mut buf) {
            Ok(len) => {
                if let Err(e) = tx.write_all(&buf[..len]).await {
                    warn!("Failed to send {:?}: {:?}", message, e);
                } else {
                    trace!("Sent {:?}", message);
                }
            }
            Err(e) => warn!("Failed to encode {:?}: {:?}", message, e),
        }
    }
}
