use crate::modbus::{self, ModbusTCPCodec, Operation, Response};
use futures::{SinkExt as _, StreamExt as _};
use tokio::net::TcpStream;
use tokio::time::Instant;
use tokio_util::codec::Framed;
use tracing::{debug, info, trace, warn};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("lookup of `{1}` failed")]
    LookupHost(#[source] std::io::Error, String),
    #[error("could not connect to `{1}` over TCP")]
    Connect(#[source] std::io::Error, String),
    #[error("connecting to `{0}` did not complete in time")]
    ConnectTimeout(String),
    #[error("could not send out the request")]
    Send(#[source] std::io::Error),
    #[error("could not read data from the stream")]
    Receive(#[source] std::io::Error),
    #[error("the device closed the connection")]
    Disconnected,
    #[error("could not shut down the connection")]
    Shutdown(#[source] std::io::Error),
}

#[derive(clap::Parser, Clone, Debug)]
#[group(id = "connection::Args")]
pub struct Args {
    /// Connect to the heat pump controller (or the RS-485 gateway in front of it) over Modbus
    /// TCP, e.g. `192.168.1.20:502`.
    #[arg(long, env = "MTHERMAL_MODBUS_TCP")]
    tcp: String,

    /// The modbus device ID.
    #[arg(long, short = 'i', env = "MTHERMAL_MODBUS_DEVICE_ID")]
    device_id: u8,

    /// Give up if the TCP connection can't be established in this amount of time.
    #[arg(long, default_value = "5s")]
    connect_timeout: humantime::Duration,

    /// If the modbus response isn't received in this amount of time, consider the request failed.
    ///
    /// Scans skip the affected registers, writes report an error.
    #[arg(long, default_value = "5s")]
    read_timeout: humantime::Duration,

    /// The amount of additional time to wait before sending each request.
    ///
    /// Interacting too fast can make some Modbus TCP gateways behave poorly.
    #[arg(long, default_value = "0ms")]
    tcp_send_delay: humantime::Duration,
}

/// Something that can carry one modbus request at a time to the device.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Send the operation and wait for the matching response.
    ///
    /// `Ok(None)` means the device did not respond in time. Errors mean the connection is no
    /// longer usable.
    async fn send(&mut self, operation: Operation) -> Result<Option<Response>, Error>;
}

type TcpIo = Framed<TcpStream, ModbusTCPCodec>;

pub struct Connection {
    io: TcpIo,
    args: Args,
    next_transaction_id: u16,
}

impl Connection {
    pub async fn new(args: Args) -> Result<Connection, Error> {
        let address = args.tcp.as_str();
        info!(message = "connecting...", address);
        let connect = async {
            let addresses = tokio::net::lookup_host(address)
                .await
                .map_err(|e| Error::LookupHost(e, address.to_string()))?
                .collect::<Vec<_>>();
            debug!(message = "resolved", ?addresses);
            TcpStream::connect(&*addresses).await.map_err(|e| Error::Connect(e, address.to_string()))
        };
        let socket = tokio::time::timeout(*args.connect_timeout, connect)
            .await
            .map_err(|_| Error::ConnectTimeout(address.to_string()))??;
        let nodelay_result = socket.set_nodelay(true);
        trace!(message = "setting nodelay", is_error = ?nodelay_result.err());
        info!(message = "connected");
        Ok(Self { io: Framed::new(socket, ModbusTCPCodec {}), args, next_transaction_id: 0 })
    }

    pub fn device_id(&self) -> u8 {
        self.args.device_id
    }

    pub async fn close(mut self) -> Result<(), Error> {
        self.io.close().await.map_err(Error::Shutdown)
    }

    fn new_transaction_id(&mut self) -> u16 {
        let id = self.next_transaction_id;
        self.next_transaction_id = id.wrapping_add(1);
        id
    }
}

impl Transport for Connection {
    async fn send(&mut self, operation: Operation) -> Result<Option<Response>, Error> {
        if !self.args.tcp_send_delay.is_zero() {
            tokio::time::sleep(*self.args.tcp_send_delay).await;
        }
        let transaction_id = self.new_transaction_id();
        let request = modbus::Request { device_id: self.args.device_id, transaction_id, operation };
        trace!(message = "sending", ?request);
        self.io.send(request).await.map_err(Error::Send)?;
        let deadline = Instant::now() + *self.args.read_timeout;
        loop {
            let Ok(next) = tokio::time::timeout_at(deadline, self.io.next()).await else {
                debug!(message = "request timed out", transaction_id, ?operation);
                return Ok(None);
            };
            let response = match next {
                None => return Err(Error::Disconnected),
                Some(Err(e)) => return Err(Error::Receive(e)),
                Some(Ok(response)) => response,
            };
            trace!(message = "decoded a response", transaction = response.transaction_id);
            if response.transaction_id != transaction_id {
                // Most likely a late answer to a request that already timed out.
                debug!(
                    message = "a response we were not expecting",
                    transaction = response.transaction_id
                );
                continue;
            }
            if response.device_id != request.device_id {
                warn!(
                    message = "ignoring a response from another device",
                    expected = request.device_id,
                    actual = response.device_id
                );
                continue;
            }
            return Ok(Some(response));
        }
    }
}

/// Connect, run `f` and close the connection regardless of how `f` went.
pub async fn with_connection<T, E>(
    args: Args,
    f: impl AsyncFnOnce(&mut Connection) -> Result<T, E>,
) -> Result<T, E>
where
    E: From<Error>,
{
    let mut connection = Connection::new(args).await?;
    let result = f(&mut connection).await;
    let closed = connection.close().await;
    match (result, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(e)) => Err(e.into()),
        (Err(e), closed) => {
            if let Err(close_error) = closed {
                warn!(
                    message = "could not shut down the connection",
                    error = (&close_error as &dyn std::error::Error)
                );
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modbus::ResponseKind;
    use tokio::io::{AsyncReadExt as _, AsyncWriteExt as _};
    use tokio::net::TcpListener;

    fn args(address: std::net::SocketAddr, read_timeout: &str) -> Args {
        Args {
            tcp: address.to_string(),
            device_id: 1,
            connect_timeout: "1s".parse().unwrap(),
            read_timeout: read_timeout.parse().unwrap(),
            tcp_send_delay: "0ms".parse().unwrap(),
        }
    }

    async fn read_request(socket: &mut TcpStream) -> [u8; 12] {
        let mut frame = [0; 12];
        socket.read_exact(&mut frame).await.unwrap();
        frame
    }

    #[tokio::test]
    async fn reads_through_tcp() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            assert_eq!(&request[2..], [0, 0, 0, 6, 1, 3, 0, 2, 0, 1]);
            // A stale response first, which must be ignored.
            socket.write_all(&[0x55, 0x55, 0, 0, 0, 5, 1, 3, 2, 0, 9]).await.unwrap();
            let response = vec![request[0], request[1], 0, 0, 0, 5, 1, 3, 2, 0x1E, 0x1C];
            socket.write_all(&response).await.unwrap();
        });
        let mut connection = Connection::new(args(address, "1s")).await.unwrap();
        let response = connection
            .send(Operation::GetHoldings { address: 2, count: 1 })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(response.kind, ResponseKind::GetHoldings { values: vec![7708] });
        server.await.unwrap();
        connection.close().await.unwrap();
    }

    #[tokio::test]
    async fn other_devices_are_ignored() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let foreign = [request[0], request[1], 0, 0, 0, 5, 9, 3, 2, 0, 99];
            socket.write_all(&foreign).await.unwrap();
            let response = [request[0], request[1], 0, 0, 0, 5, 1, 3, 2, 0, 42];
            socket.write_all(&response).await.unwrap();
        });
        let mut connection = Connection::new(args(address, "1s")).await.unwrap();
        let response = connection
            .send(Operation::GetHoldings { address: 104, count: 1 })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(response.device_id, 1);
        assert_eq!(response.kind, ResponseKind::GetHoldings { values: vec![42] });
        server.await.unwrap();
        connection.close().await.unwrap();
    }

    #[tokio::test]
    async fn silence_is_a_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;
            tokio::time::sleep(std::time::Duration::from_millis(500)).await;
        });
        let mut connection = Connection::new(args(address, "50ms")).await.unwrap();
        let response = connection.send(Operation::GetHoldings { address: 200, count: 1 }).await;
        assert!(matches!(response, Ok(None)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn closed_socket_is_an_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;
        });
        let mut connection = Connection::new(args(address, "1s")).await.unwrap();
        let response = connection.send(Operation::SetHolding { address: 0, value: 1 }).await;
        server.await.unwrap();
        assert!(matches!(response, Err(Error::Disconnected | Error::Receive(_))));
    }
}
