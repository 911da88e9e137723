use embassy_net::{Stack, tcp::TcpSocket};
use embassy_time::{Duration, Timer};
use esp_hal::gpio::Output;
use iot_sketches::config::{ACCEPT_RETRY_DELAY_MS, SERVER_PORT};
use iot_sketches::server::handle_client;
use log::{debug, error, info, warn};

const RX_BUFFER_SIZE: usize = 1536;
const TX_BUFFER_SIZE: usize = 1536;

/// Serve clients one at a time, switching `led` on `GET /H` and `GET /L`.
#[embassy_executor::task]
pub async fn led_server_task(stack: Stack<'static>, mut led: Output<'static>) {
    let mut rx_buffer = [0u8; RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TX_BUFFER_SIZE];

    info!("Starting HTTP server on port {SERVER_PORT}");
    loop {
        let mut socket = TcpSocket::new(stack, &mut rx_buffer, &mut tx_buffer);
        socket.set_timeout(Some(Duration::from_secs(10)));

        if let Err(e) = socket.accept(SERVER_PORT).await {
            error!("accept error: {:?}", e);
            Timer::after(Duration::from_millis(ACCEPT_RETRY_DELAY_MS)).await;
            continue;
        }
        info!("Client connected: {:?}", socket.remote_endpoint());

        match handle_client(&mut socket, &mut led).await {
            Ok(outcome) => debug!(
                "commands: {}, led: {:?}, answered: {}",
                outcome.commands, outcome.state, outcome.answered
            ),
            Err(e) => warn!("client error: {}", e),
        }

        socket.close();
        if let Err(e) = socket.flush().await {
            debug!("flush after close: {:?}", e);
        }
        info!("Connection closed");
    }
}
