use embassy_net::{IpAddress, Stack, dns::DnsQueryType, tcp::TcpSocket};
use embassy_time::{Duration, Timer};
use esp_hal::gpio::Output;
use esp_hal::rng::Rng;
use iot_sketches::Error;
use iot_sketches::config::{
    CONNECT_RETRY_DELAY_MS, DEFAULT_DWEET_HOST, DEFAULT_DWEET_PORT, DEFAULT_THING_NAME,
    POST_INTERVAL_MS, RESPONSE_TIMEOUT_MS, parse_port,
};
use iot_sketches::dweet::{self, ResponseSummary, Target};
use iot_sketches::sensor::{Entropy, Reading};
use log::{debug, error, info, warn};

const DWEET_HOST: Option<&str> = option_env!("DWEET_HOST");
const DWEET_PORT: Option<&str> = option_env!("DWEET_PORT");
const THING_NAME: Option<&str> = option_env!("THING_NAME");

/// Hardware RNG as a source for simulated readings.
pub struct HardwareEntropy(pub Rng);

impl Entropy for HardwareEntropy {
    fn next_u32(&mut self) -> u32 {
        self.0.random()
    }
}

fn target() -> Target<'static> {
    Target {
        host: DWEET_HOST.unwrap_or(DEFAULT_DWEET_HOST),
        port: parse_port(DWEET_PORT, DEFAULT_DWEET_PORT),
        thing: THING_NAME.unwrap_or(DEFAULT_THING_NAME),
    }
}

async fn resolve(stack: Stack<'static>, host: &str) -> Option<IpAddress> {
    debug!("Resolving {}...", host);
    match stack.dns_query(host, DnsQueryType::A).await {
        Ok(addresses) => {
            let address = addresses.first().copied();
            match address {
                Some(address) => debug!("Resolved {} to {}", host, address),
                None => error!("DNS query returned no addresses for {}", host),
            }
            address
        }
        Err(e) => {
            error!("DNS lookup failed for {}: {:?}", host, e);
            None
        }
    }
}

async fn exchange(
    socket: &mut TcpSocket<'_>,
    target: &Target<'_>,
    reading: &Reading,
) -> iot_sketches::Result<ResponseSummary> {
    dweet::send_reading(socket, target, reading).await?;
    dweet::read_response(socket, || {
        Timer::after(Duration::from_millis(RESPONSE_TIMEOUT_MS))
    })
    .await
}

#[embassy_executor::task]
pub async fn dweet_task(stack: Stack<'static>, mut led: Output<'static>, mut rng: HardwareEntropy) {
    let target = target();
    info!(
        "Publishing to http://{}:{}/dweet/for/{}",
        target.host, target.port, target.thing
    );

    let mut rx_buffer = [0; 4096];
    let mut tx_buffer = [0; 1024];

    loop {
        let Some(remote_ip) = resolve(stack, target.host).await else {
            Timer::after(Duration::from_millis(CONNECT_RETRY_DELAY_MS)).await;
            continue;
        };

        let mut socket = TcpSocket::new(stack, &mut rx_buffer, &mut tx_buffer);
        socket.set_timeout(Some(Duration::from_secs(10)));
        debug!("connecting to {} ({}:{})...", target.host, remote_ip, target.port);
        if let Err(e) = socket.connect((remote_ip, target.port)).await {
            error!("connect error: {:?}", e);
            Timer::after(Duration::from_millis(CONNECT_RETRY_DELAY_MS)).await;
            continue;
        }

        let reading = Reading::sample(&mut rng);
        info!(
            "temperature: {} °C | humidity: {} %",
            reading.temperature, reading.humidity
        );

        // LED stays lit while the request is in flight.
        led.set_high();
        let result = exchange(&mut socket, &target, &reading).await;
        led.set_low();
        socket.close();

        match result {
            Ok(summary) => {
                info!(
                    "Reading sent (status {:?}, {} bytes)",
                    summary.status, summary.bytes
                );
                Timer::after(Duration::from_millis(POST_INTERVAL_MS)).await;
            }
            Err(Error::Timeout) => {
                warn!("Response timeout");
                socket.abort();
            }
            Err(e) => {
                error!("HTTP exchange failed: {}", e);
            }
        }
    }
}
