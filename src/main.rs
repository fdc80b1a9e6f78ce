//! Mash/lauter controller firmware: main entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter      SerialConsole        MonotonicClock      │
//! │  (Sensor+Actuator)    (EventSink+Resume)   (tick timing)       │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              ControlLoop (pure logic)                  │    │
//! │  │  Script · PID · Pump governor                          │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pin map (ESP32-S3):
//!
//! | Signal              | GPIO |
//! |---------------------|------|
//! | HLT MAX6675 CS/SCK/SO  | 4 / 5 / 6   |
//! | Mash MAX6675 CS/SCK/SO | 7 / 15 / 16 |
//! | Mash tun bobber     | 17   |
//! | Kettle bobber       | 18   |
//! | Heater relay (240 V)| 8    |
//! | Pump relay (120 V)  | 9    |
//! | Host UART1 TX / RX  | 1 / 2 |
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::{Ets, FreeRtos};
use esp_idf_hal::gpio::{AnyIOPin, InputPin, OutputPin, PinDriver, Pull};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::uart::{UartDriver, config::Config as UartConfig};
use esp_idf_hal::units::Hertz;
use log::{info, warn};

use mashlauter::adapters::hardware::HardwareAdapter;
use mashlauter::adapters::serial_console::SerialConsole;
use mashlauter::adapters::time::MonotonicClock;
use mashlauter::adapters::uart_link::UartLink;
use mashlauter::app::commands::AppCommand;
use mashlauter::app::control_loop::{ControlLoop, TickOutcome};
use mashlauter::config::SystemConfig;
use mashlauter::drivers::Relay;
use mashlauter::error::Vessel;
use mashlauter::protocol::{ScriptLoader, SetpointLimits};
use mashlauter::sensors::{FloatSwitchSensor, Max6675};

/// Poll interval while waiting for a script.
const IDLE_POLL_MS: u32 = 20;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  MashLauter v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = SystemConfig::default();
    config.validate()?;

    // ── 3. Hardware ───────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let pins = peripherals.pins;

    let hlt = Max6675::new(
        Vessel::HotLiquor,
        PinDriver::output(pins.gpio4.downgrade_output())?,
        PinDriver::output(pins.gpio5.downgrade_output())?,
        PinDriver::input(pins.gpio6.downgrade_input())?,
        Ets,
    );
    let mash = Max6675::new(
        Vessel::Mash,
        PinDriver::output(pins.gpio7.downgrade_output())?,
        PinDriver::output(pins.gpio15.downgrade_output())?,
        PinDriver::input(pins.gpio16.downgrade_input())?,
        Ets,
    );

    let mut mash_tun_bobber = PinDriver::input(pins.gpio17.downgrade_input())?;
    mash_tun_bobber.set_pull(Pull::Down)?;
    let mut kettle_bobber = PinDriver::input(pins.gpio18.downgrade_input())?;
    kettle_bobber.set_pull(Pull::Down)?;

    let heater = Relay::new(PinDriver::output(pins.gpio8.downgrade_output())?, "heater");
    let pump = Relay::new(PinDriver::output(pins.gpio9.downgrade_output())?, "pump");

    let mut hw = HardwareAdapter::new(
        hlt,
        mash,
        FloatSwitchSensor::new(mash_tun_bobber),
        FloatSwitchSensor::new(kettle_bobber),
        heater,
        pump,
        FreeRtos,
    );

    // MAX6675 conversions are invalid until the converter settles.
    FreeRtos::delay_ms(config.sensor_settle_ms);

    // ── 4. Host link ──────────────────────────────────────────
    let uart = UartDriver::new(
        peripherals.uart1,
        pins.gpio1,
        pins.gpio2,
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &UartConfig::default().baudrate(Hertz(config.link_baud)),
    )?;
    let limits = SetpointLimits {
        min_c: config.min_setpoint_c,
        max_c: config.max_setpoint_c,
    };
    let loader = ScriptLoader::new(limits, config.thermal_model());
    let mut console = SerialConsole::new(UartLink::new(uart), FreeRtos, loader);

    // ── 5. Control loop ───────────────────────────────────────
    let heater_period_ms = config.heater_period_ms;
    let mut control = ControlLoop::new(config);
    let mut clock = MonotonicClock::new();
    info!("Ready, waiting for a script");

    loop {
        if !control.is_running() {
            match console.poll_script() {
                Ok(Some(script)) => {
                    control.handle_command(AppCommand::LoadScript(script), &mut hw, &mut console);
                    clock.lap_ms();
                }
                Ok(None) => FreeRtos::delay_ms(IDLE_POLL_MS),
                Err(e) => {
                    warn!("Link error while loading: {}", e);
                    FreeRtos::delay_ms(IDLE_POLL_MS);
                }
            }
            continue;
        }

        // The heater window blocks inside the tick, so the tick itself
        // paces the loop.
        let elapsed = clock.lap_ms();
        match control.tick(elapsed, &mut hw, &mut console) {
            Ok(TickOutcome::Resumed { paused_ms }) => {
                // Only the operator wait is kept out of the next hold.
                clock.discount_ms(paused_ms);
            }
            Ok(_) => {}
            Err(e) => {
                warn!("Tick failed: {}", e);
                FreeRtos::delay_ms(heater_period_ms);
            }
        }
    }
}
