//! Thermobath firmware — main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  Adapters (outer ring)                   │
//! │                                                          │
//! │  HardwareAdapter        HttpApi          LogEventSink    │
//! │  (SensorBus+Output)     (/ /data /update)  (EventSink)   │
//! │                                                          │
//! │  ────────────── Port Trait Boundary ──────────────────   │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │           ControlService (pure logic)              │  │
//! │  │  ParameterStore · SensorCache · channel FSM        │  │
//! │  └────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The control loop and the httpd task share the leaked `ParameterStore`
//! and `SensorCache` statics; both are safe for that by construction.

use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use esp_idf_hal::gpio::{AnyIOPin, AnyOutputPin, PinDriver};
use esp_idf_hal::modem::Modem;
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi};
use log::{info, warn};

use thermobath::adapters::hardware::{HardwareAdapter, HeaterPin};
use thermobath::adapters::http::HttpApi;
use thermobath::adapters::log_sink::LogEventSink;
use thermobath::app::service::ControlService;
use thermobath::config::{SystemConfig, CHANNEL_COUNT, SENSOR_ROM_CODES};
use thermobath::drivers::ds18b20::Ds18b20Bus;
use thermobath::drivers::heater::HeaterBank;
use thermobath::pins;
use thermobath::sensors::{SensorAddress, SensorCache};
use thermobath::store::ParameterStore;

// Station credentials are baked in at build time; without them the
// controller still runs, headless.
const WIFI_SSID: Option<&str> = option_env!("THERMOBATH_WIFI_SSID");
const WIFI_PASS: Option<&str> = option_env!("THERMOBATH_WIFI_PASS");

/// How often the main loop polls the periodic gates.
const LOOP_POLL_MS: u64 = 50;

static BOOT: OnceLock<Instant> = OnceLock::new();

/// The monotonic clock every timer in the system runs on.
fn uptime_ms() -> u64 {
    BOOT.get_or_init(Instant::now).elapsed().as_millis() as u64
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;
    let _ = uptime_ms(); // pin the clock origin to boot

    info!("thermobath v{}", env!("CARGO_PKG_VERSION"));

    let config = SystemConfig::default();
    let peripherals = Peripherals::take()?;

    // ── 2. Hardware: relays LOW first, then the probe bus ─────
    let mut bank_pins = heapless::Vec::<HeaterPin, CHANNEL_COUNT>::new();
    for gpio in pins::HEATER_GPIOS {
        // SAFETY: board-fixed GPIO numbers, each claimed exactly once here.
        let pin = unsafe { AnyOutputPin::new(gpio) };
        bank_pins
            .push(PinDriver::output(pin)?)
            .map_err(|_| anyhow!("too many heater pins"))?;
    }
    let heaters = HeaterBank::new(
        bank_pins
            .into_array()
            .map_err(|_| anyhow!("heater pin count mismatch"))?,
    );

    // SAFETY: the 1-Wire bus GPIO is claimed exactly once here.
    let onewire = unsafe { AnyIOPin::new(pins::ONEWIRE_BUS_GPIO) };
    let mut hw = HardwareAdapter::new(Ds18b20Bus::new(onewire)?, heaters);

    // ── 3. Shared state (lives for the whole process) ─────────
    let store: &'static ParameterStore = Box::leak(Box::new(ParameterStore::new(&config)));
    let cache: &'static SensorCache =
        Box::leak(Box::new(SensorCache::new(SENSOR_ROM_CODES.map(SensorAddress))));

    // ── 4. WiFi + web interface (optional) ────────────────────
    let mut net = None;
    match WIFI_SSID {
        Some(ssid) if !ssid.is_empty() => {
            let wifi = connect_wifi(peripherals.modem, ssid, WIFI_PASS.unwrap_or(""))?;
            let http = HttpApi::start(store, cache, uptime_ms)?;
            net = Some((wifi, http));
        }
        _ => warn!("no WiFi credentials baked in — running headless"),
    }

    // ── 5. Control loop ───────────────────────────────────────
    let mut service = ControlService::new(&config, store, cache);
    let mut sink = LogEventSink::new();
    service.start(&mut sink);

    loop {
        service.tick(uptime_ms(), &mut hw, &mut sink);
        std::thread::sleep(Duration::from_millis(LOOP_POLL_MS));
        let _ = &net; // keep WiFi and httpd alive
    }
}

fn connect_wifi(modem: Modem, ssid: &str, pass: &str) -> Result<BlockingWifi<EspWifi<'static>>> {
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    let mut wifi = BlockingWifi::wrap(EspWifi::new(modem, sysloop.clone(), Some(nvs))?, sysloop)?;
    wifi.set_configuration(&Configuration::Client(ClientConfiguration {
        ssid: ssid.try_into().map_err(|()| anyhow!("SSID too long"))?,
        password: pass.try_into().map_err(|()| anyhow!("password too long"))?,
        auth_method: if pass.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        },
        ..Default::default()
    }))?;

    wifi.start()?;
    wifi.connect()?;
    wifi.wait_netif_up()?;

    info!("WiFi connected: {:?}", wifi.wifi().sta_netif().get_ip_info()?);
    Ok(wifi)
}
