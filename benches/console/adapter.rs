use core::cell::Cell;
use core::fmt::Write;
use criterion::{Criterion, Throughput};
use fwconsole::console::{Dispatcher, HandlerResult, TransportAdapter};
use fwconsole::network::UdpSocket;
use fwconsole::network::error::Error;
use std::io::ErrorKind;
use std::net::{SocketAddr, UdpSocket as StdUdpSocket};
use std::time::Duration;

/// Largest datagram the bench socket reads whole.
const MAX_DATAGRAM: usize = 1500;

/// `std` socket adapter. `std` only reports the copied length, so datagrams
/// are read into `scratch` first to learn their full size.
struct NetSocket {
    socket: StdUdpSocket,
    scratch: [u8; MAX_DATAGRAM],
}

impl NetSocket {
    fn new(socket: StdUdpSocket) -> Self {
        Self {
            socket,
            scratch: [0; MAX_DATAGRAM],
        }
    }
}

impl UdpSocket for NetSocket {
    type Address = SocketAddr;
    type Error = Error;

    fn recv_from(&mut self, buf: &mut [u8]) -> Result<Option<(usize, SocketAddr)>, Error> {
        match self.socket.recv_from(&mut self.scratch) {
            Ok((len, from)) => {
                let n = len.min(buf.len());
                buf[..n].copy_from_slice(&self.scratch[..n]);
                Ok(Some((len, from)))
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => Ok(None),
            Err(_) => Err(Error::ReceiveError),
        }
    }

    fn send_to(&mut self, remote: &SocketAddr, buf: &[u8]) -> Result<usize, Error> {
        self.socket
            .send_to(buf, remote)
            .map_err(|_| Error::SendError)
    }
}

fn bind_loopback() -> StdUdpSocket {
    StdUdpSocket::bind("127.0.0.1:0").expect("Failed to bind loopback socket")
}

pub fn bench_poll_loopback(c: &mut Criterion) {
    let device = bind_loopback();
    device.set_nonblocking(true).unwrap();
    let device_addr = device.local_addr().unwrap();

    let host = bind_loopback();
    host.set_read_timeout(Some(Duration::from_secs(1))).unwrap();

    let setpoint = Cell::new(0.0f32);
    let mut ping = |_: &str, out: &mut dyn Write| -> HandlerResult {
        out.write_str("pong\r\n")?;
        Ok(())
    };
    let mut dispatcher = Dispatcher::new();
    dispatcher.add_command("ping", &mut ping).unwrap();
    dispatcher.add_variable("setpoint", &setpoint).unwrap();

    let mut console: TransportAdapter<'_, _, 4, 4, 60> =
        TransportAdapter::new(NetSocket::new(device), dispatcher);

    let request = b"setpoint=21.5\nping\n";
    let mut reply = [0u8; 64];

    let mut group = c.benchmark_group("poll");
    group.throughput(Throughput::Bytes(request.len() as u64));
    group.bench_function("loopback_round_trip", |b| {
        b.iter(|| {
            host.send_to(request, device_addr).expect("Failed to send");
            let mut records = 0;
            while records == 0 {
                records = console.poll().expect("Failed to poll");
            }
            let (n, _) = host.recv_from(&mut reply).expect("Failed to receive");
            assert_eq!(&reply[..n], b"pong\r\n");
        })
    });
    group.finish();
}
