//! Serial console task
//!
//! Receives command lines over UART, applies them to the configuration and
//! writes responses back. This task is the only mutator of the
//! configuration and the only user of the configuration store.

use core::fmt::Write as _;

use defmt::*;
use embassy_rp::uart::BufferedUart;
use embedded_io_async::{Read, Write};
use heapless::String;

use airsense_console::{handle_line, LineReader};
use airsense_core::config::Configuration;
use airsense_core::store::ConfigStore;
use airsense_hal_rp2040::Rp2040FlashFs;

use crate::channels::CONFIG_CHANGED;
use crate::config::persistence::log_config_summary;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Largest response to a single command
const RESPONSE_SIZE: usize = 1024;

const PROMPT: &[u8] = b"> ";

/// Console task - reads command lines and executes them
#[embassy_executor::task]
pub async fn console_task(
    mut uart: BufferedUart,
    mut store: ConfigStore<Rp2040FlashFs<'static>>,
    config: &'static mut Configuration,
) {
    info!("Console task started");

    let mut reader = LineReader::new();
    let mut buf = [0u8; RX_BUF_SIZE];
    send(&mut uart, PROMPT).await;

    loop {
        let n = match uart.read(&mut buf).await {
            Ok(n) => n,
            Err(e) => {
                warn!("UART read error: {:?}", e);
                continue;
            }
        };
        trace!("RX: {} bytes", n);

        for &byte in &buf[..n] {
            match reader.feed(byte) {
                Ok(Some(line)) => {
                    handle(&mut uart, &line, &mut store, config).await;
                    send(&mut uart, PROMPT).await;
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("Console line error: {:?}", e);
                    let mut response: String<64> = String::new();
                    let _ = writeln!(response, "error: {}", e);
                    send(&mut uart, response.as_bytes()).await;
                    send(&mut uart, PROMPT).await;
                }
            }
        }
    }
}

/// Execute one line and send the response
async fn handle(
    uart: &mut BufferedUart,
    line: &str,
    store: &mut ConfigStore<Rp2040FlashFs<'static>>,
    config: &mut Configuration,
) {
    let mut response: String<RESPONSE_SIZE> = String::new();

    match handle_line(line, config, store, &mut response) {
        Ok(outcome) => {
            debug!("Console command done: {:?}", outcome);
            if outcome.is_persistence_event() {
                log_config_summary(config);
                CONFIG_CHANGED.signal(outcome);
            }
        }
        Err(_) => {
            warn!("Console response truncated");
        }
    }

    send(uart, response.as_bytes()).await;
}

async fn send(uart: &mut BufferedUart, bytes: &[u8]) {
    if let Err(e) = uart.write_all(bytes).await {
        warn!("UART write error: {:?}", e);
    }
}
