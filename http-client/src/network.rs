use embassy_net::{Runner, Stack, StackResources, StaticConfigV4};
use embassy_time::{Duration, Timer};
use esp_hal::rng::Rng;
use esp_radio::wifi::{
    AuthMethod, ClientConfig, ModeConfig, WifiController, WifiDevice, WifiEvent, WifiStaState,
};
use iot_sketches::config::WIFI_POLL_INTERVAL_MS;
use iot_sketches::wifi::Credentials;
use log::{debug, error, info};

const SSID: &str = env!("SSID");
const PASSWORD: Option<&str> = option_env!("PASSWORD");

pub fn credentials() -> Credentials {
    Credentials::new(SSID, PASSWORD.unwrap_or_default()).expect("Invalid WiFi credentials")
}

pub fn create_stack(
    device: WifiDevice<'static>,
) -> (Stack<'static>, Runner<'static, WifiDevice<'static>>) {
    let config = embassy_net::Config::dhcpv4(Default::default());

    let rng = Rng::new();
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;

    static STACK_RESOURCES_CELL: static_cell::StaticCell<StackResources<3>> =
        static_cell::StaticCell::new();
    embassy_net::new(
        device,
        config,
        STACK_RESOURCES_CELL
            .uninit()
            .write(StackResources::<3>::new()),
        seed,
    )
}

/// Block until the station has a DHCP lease. There is no upper bound.
pub async fn wait_for_ip(stack: Stack<'static>) -> StaticConfigV4 {
    info!("Connecting to WiFi network {SSID}...");
    loop {
        if stack.is_link_up() {
            if let Some(config) = stack.config_v4() {
                info!("Connected, local IP: {}", config.address.address());
                return config;
            }
        }
        debug!(".");
        Timer::after(Duration::from_millis(WIFI_POLL_INTERVAL_MS)).await;
    }
}

fn client_config(credentials: &Credentials) -> ModeConfig {
    let config = ClientConfig::default().with_ssid(credentials.ssid.as_str().into());
    let config = if credentials.is_open() {
        config.with_auth_method(AuthMethod::None)
    } else {
        config.with_password(credentials.password.as_str().into())
    };
    ModeConfig::Client(config)
}

#[embassy_executor::task]
pub async fn connection(mut controller: WifiController<'static>, credentials: Credentials) {
    debug!("start connection task");
    debug!("Device capabilities: {:?}", controller.capabilities());
    loop {
        if esp_radio::wifi::sta_state() == WifiStaState::Connected {
            controller.wait_for_event(WifiEvent::StaDisconnected).await;
            info!("WiFi disconnected, reconnecting...");
            Timer::after(Duration::from_millis(5000)).await;
        }
        if !matches!(controller.is_started(), Ok(true)) {
            controller
                .set_config(&client_config(&credentials))
                .expect("Failed to set WiFi configuration");
            debug!("Starting wifi");
            controller
                .start_async()
                .await
                .expect("Failed to start WiFi");
            debug!("Wifi started!");
        }
        debug!("About to connect...");

        match controller.connect_async().await {
            Ok(_) => info!("Wifi connected!"),
            Err(e) => {
                error!("Failed to connect to wifi: {e:?}");
                Timer::after(Duration::from_millis(5000)).await
            }
        }
    }
}

#[embassy_executor::task]
pub async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) {
    runner.run().await
}
