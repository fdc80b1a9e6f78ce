//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter          | Implements         | Connects to               |
//! |------------------|--------------------|---------------------------|
//! | `hardware`       | SensorPort         | MAX6675, float switches   |
//! |                  | ActuatorPort       | heater + pump relays      |
//! | `log_sink`       | EventSink          | Serial log output         |
//! | `serial_console` | EventSink          | Host link (status lines)  |
//! |                  | ResumePort         |                           |
//! | `time`           | -                  | ESP32 system timer        |
//! | `uart_link`      | Link               | ESP-IDF UART driver       |

pub mod hardware;
pub mod log_sink;
pub mod serial_console;
pub mod time;
#[cfg(feature = "espidf")]
pub mod uart_link;
