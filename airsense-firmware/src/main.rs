//! Airsense - Particle Sensor Firmware
//!
//! Main firmware binary for RP2040-based particle sensors. Loads the device
//! configuration from flash at boot and exposes a serial console for
//! editing and persisting it.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use airsense_core::config::Configuration;
use airsense_core::document::MAX_DOCUMENT_SIZE;
use airsense_core::store::ConfigStore;
use airsense_hal_rp2040::flash_fs::MAX_FILE_SIZE;
use airsense_hal_rp2040::Rp2040FlashFs;

use crate::channels::CONFIG_CHANGED;

mod channels;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

/// Console baud rate
const CONSOLE_BAUDRATE: u32 = 115_200;

// Any encodable configuration fits one flash file
const _: () = core::assert!(MAX_DOCUMENT_SIZE <= MAX_FILE_SIZE);

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

// The one configuration instance, lent to the console task
static CONFIGURATION: StaticCell<Configuration> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Airsense firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Load configuration from flash (or use defaults)
    let flash_fs = Rp2040FlashFs::new(p.FLASH, p.DMA_CH0);
    let mut store = ConfigStore::new(flash_fs);
    let configuration = CONFIGURATION.init(config::load_at_boot(&mut store));

    // Setup UART for the console
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = CONSOLE_BAUDRATE;

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);

    info!("UART initialized for console at {} baud", CONSOLE_BAUDRATE);

    spawner
        .spawn(tasks::console_task(uart, store, configuration))
        .unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        let outcome = CONFIG_CHANGED.wait().await;
        info!("Configuration changed: {:?}", outcome);
    }
}
