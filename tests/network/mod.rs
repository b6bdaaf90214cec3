//! Transport adapter tests over a mock datagram socket


use core::cell::Cell;
use core::fmt::Write;
use fwconsole::console::{Dispatcher, HandlerResult, ReadOnly, TransportAdapter};
use fwconsole::network::error::Error;
use mock::MockSocket;

const HOST: u16 = 4000;
const OTHER_HOST: u16 = 5000;

type Console<'a> = TransportAdapter<'a, MockSocket, 4, 4, 16>;

#[test]
fn test_poll_without_data_has_no_side_effects() {
    let calls = Cell::new(0);
    let mut ping = |_: &str, _: &mut dyn Write| -> HandlerResult {
        calls.set(calls.get() + 1);
        Ok(())
    };
    let mut dispatcher = Dispatcher::new();
    dispatcher.add_command("ping", &mut ping).unwrap();

    let mut console: Console = TransportAdapter::new(MockSocket::new(), dispatcher);
    assert_eq!(console.poll(), Ok(0));
    assert_eq!(console.poll(), Ok(0));
    assert!(console.socket().sent.is_empty());
    assert_eq!(console.parser().pending(), 0);
    drop(console);
    assert_eq!(calls.get(), 0);
}

#[test]
fn test_float_variable_round_trip() {
    let temp = Cell::new(0.0f32);
    let mut dispatcher = Dispatcher::new();
    dispatcher.add_variable("temp", &temp).unwrap();

    let mut console: Console = TransportAdapter::new(MockSocket::new(), dispatcher);
    console.socket_mut().deliver(HOST, b"temp=21.5");
    console.socket_mut().deliver(HOST, b"temp");

    assert_eq!(console.poll(), Ok(1));
    assert!(console.socket().sent.is_empty());
    assert_eq!(console.poll(), Ok(1));
    assert_eq!(console.socket().sent_to(), [(HOST, "21.5\r\n")]);
    assert_eq!(temp.get(), 21.5);
}

#[test]
fn test_unknown_name_invokes_nothing() {
    let calls = Cell::new(0);
    let mut led = |_: &str, _: &mut dyn Write| -> HandlerResult {
        calls.set(calls.get() + 1);
        Ok(())
    };
    let mut dispatcher = Dispatcher::new();
    dispatcher.add_command("led", &mut led).unwrap();

    let mut console: Console = TransportAdapter::new(MockSocket::new(), dispatcher);
    console.socket_mut().deliver(HOST, b"blink\n");

    assert_eq!(console.poll(), Ok(1));
    assert_eq!(console.socket().replies(), ["error: unknown name\r\n"]);
    drop(console);
    assert_eq!(calls.get(), 0);
}

#[test]
fn test_invalid_value_keeps_previous_value() {
    let count = Cell::new(7i32);
    let mut dispatcher = Dispatcher::new();
    dispatcher.add_variable("count", &count).unwrap();

    let mut console: Console = TransportAdapter::new(MockSocket::new(), dispatcher);
    console.socket_mut().deliver(HOST, b"count=abc\n");
    console.socket_mut().deliver(HOST, b"count\n");

    console.poll().unwrap();
    console.poll().unwrap();
    assert_eq!(
        console.socket().replies(),
        ["error: invalid value\r\n", "7\r\n"]
    );
    assert_eq!(count.get(), 7);
}

#[test]
fn test_read_only_variable_rejects_assignment() {
    let serial = ReadOnly(Cell::new(1234i32));
    let mut dispatcher = Dispatcher::new();
    dispatcher.add_variable("serial", &serial).unwrap();

    let mut console: Console = TransportAdapter::new(MockSocket::new(), dispatcher);
    console.socket_mut().deliver(HOST, b"serial=1\nserial\n");

    assert_eq!(console.poll(), Ok(2));
    assert_eq!(console.socket().replies(), ["error: read only\r\n", "1234\r\n"]);
    assert_eq!(serial.0.get(), 1234);
}

#[test]
fn test_truncated_datagram_recovers() {
    let calls = Cell::new(0);
    let mut led = |_: &str, _: &mut dyn Write| -> HandlerResult {
        calls.set(calls.get() + 1);
        Ok(())
    };
    let mut dispatcher = Dispatcher::new();
    dispatcher.add_command("led", &mut led).unwrap();

    let mut console: Console = TransportAdapter::new(MockSocket::new(), dispatcher);
    let oversized = [b'x'; 40];
    console.socket_mut().deliver(HOST, &oversized);
    console.socket_mut().deliver(HOST, b"led on\n");

    assert_eq!(console.poll(), Ok(1));
    assert_eq!(console.socket().replies(), ["error: buffer overflow\r\n"]);
    assert_eq!(console.parser().pending(), 0);

    assert_eq!(console.poll(), Ok(1));
    drop(console);
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_non_utf8_record_is_reported_and_skipped() {
    let calls = Cell::new(0);
    let mut led = |_: &str, _: &mut dyn Write| -> HandlerResult {
        calls.set(calls.get() + 1);
        Ok(())
    };
    let mut dispatcher = Dispatcher::new();
    dispatcher.add_command("led", &mut led).unwrap();

    let mut console: Console = TransportAdapter::new(MockSocket::new(), dispatcher);
    console.socket_mut().deliver(HOST, b"\xff\xfe\x80\nled on\n");

    assert_eq!(console.poll(), Ok(2));
    assert_eq!(console.socket().replies(), ["error: malformed record\r\n"]);
    assert_eq!(console.parser().pending(), 0);
    drop(console);
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_oversized_record_across_datagrams() {
    let calls = Cell::new(0);
    let mut led = |_: &str, _: &mut dyn Write| -> HandlerResult {
        calls.set(calls.get() + 1);
        Ok(())
    };
    let mut dispatcher = Dispatcher::new();
    dispatcher.add_command("led", &mut led).unwrap();

    let mut console: Console = TransportAdapter::new(MockSocket::new(), dispatcher);
    console.set_datagram_terminates(false);
    console.socket_mut().deliver(HOST, b"0123456789");
    console.socket_mut().deliver(HOST, b"0123456789");
    console.socket_mut().deliver(HOST, b"\nled\n");

    assert_eq!(console.poll(), Ok(0));
    assert_eq!(console.poll(), Ok(0));
    assert_eq!(console.poll(), Ok(2));
    assert_eq!(console.socket().replies(), ["error: buffer overflow\r\n"]);
    drop(console);
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_record_split_over_datagrams() {
    let temp = Cell::new(3.5f32);
    let mut dispatcher = Dispatcher::new();
    dispatcher.add_variable("temp", &temp).unwrap();

    let mut console: Console = TransportAdapter::new(MockSocket::new(), dispatcher);
    console.set_datagram_terminates(false);
    console.socket_mut().deliver(HOST, b"te");
    console.socket_mut().deliver(HOST, b"mp\r\n");

    assert_eq!(console.poll(), Ok(0));
    assert_eq!(console.parser().pending(), 2);
    assert_eq!(console.poll(), Ok(1));
    assert_eq!(console.socket().replies(), ["3.5\r\n"]);
}

#[test]
fn test_replies_follow_record_order() {
    let mut first = |_: &str, out: &mut dyn Write| -> HandlerResult {
        out.write_str("one\r\n")?;
        Ok(())
    };
    let mut second = |_: &str, out: &mut dyn Write| -> HandlerResult {
        out.write_str("two\r\n")?;
        Ok(())
    };
    let mut dispatcher = Dispatcher::new();
    dispatcher.add_command("first", &mut first).unwrap();
    dispatcher.add_command("second", &mut second).unwrap();

    let mut console: Console = TransportAdapter::new(MockSocket::new(), dispatcher);
    console.socket_mut().deliver(HOST, b"second\nfirst\n");

    assert_eq!(console.poll(), Ok(2));
    assert_eq!(console.socket().replies(), ["two\r\n", "one\r\n"]);
}

#[test]
fn test_reply_goes_to_sender() {
    let level = Cell::new(true);
    let mut dispatcher = Dispatcher::new();
    dispatcher.add_variable("level", &level).unwrap();

    let mut console: Console = TransportAdapter::new(MockSocket::new(), dispatcher);
    console.socket_mut().deliver(HOST, b"level");
    console.socket_mut().deliver(OTHER_HOST, b"level");

    console.poll().unwrap();
    console.poll().unwrap();
    assert_eq!(
        console.socket().sent_to(),
        [(HOST, "true\r\n"), (OTHER_HOST, "true\r\n")]
    );
}

#[test]
fn test_same_command_runs_every_time() {
    let calls = Cell::new(0);
    let mut ping = |args: &str, out: &mut dyn Write| -> HandlerResult {
        calls.set(calls.get() + 1);
        write!(out, "pong {}\r\n", args)?;
        Ok(())
    };
    let mut dispatcher = Dispatcher::new();
    dispatcher.add_command("ping", &mut ping).unwrap();

    let mut console: Console = TransportAdapter::new(MockSocket::new(), dispatcher);
    console.socket_mut().deliver(HOST, b"ping 1");
    console.socket_mut().deliver(HOST, b"ping 1");

    console.poll().unwrap();
    console.poll().unwrap();
    assert_eq!(console.socket().replies(), ["pong 1\r\n", "pong 1\r\n"]);
    drop(console);
    assert_eq!(calls.get(), 2);
}

#[test]
fn test_send_failure_does_not_skip_records() {
    let calls = Cell::new(0);
    let mut ping = |_: &str, out: &mut dyn Write| -> HandlerResult {
        calls.set(calls.get() + 1);
        out.write_str("pong\r\n")?;
        Ok(())
    };
    let mut dispatcher = Dispatcher::new();
    dispatcher.add_command("ping", &mut ping).unwrap();

    let mut console: Console = TransportAdapter::new(MockSocket::new(), dispatcher);
    console.socket_mut().fail_sends = true;
    console.socket_mut().deliver(HOST, b"ping\nping\nping");

    assert_eq!(console.poll(), Err(Error::SendError));
    console.socket_mut().fail_sends = false;
    assert_eq!(console.poll(), Ok(0));
    drop(console);
    assert_eq!(calls.get(), 3);
}

#[test]
fn test_error_replies_disabled() {
    let dispatcher: Dispatcher<'_, 4, 4> = Dispatcher::new();
    let mut console: Console = TransportAdapter::new(MockSocket::new(), dispatcher);
    console.set_error_replies(false);
    console.socket_mut().deliver(HOST, b"nothing\n");

    assert_eq!(console.poll(), Ok(1));
    assert!(console.socket().sent.is_empty());
}

#[cfg(feature = "async")]
#[test]
fn test_poll_async_round_trip() {
    use futures::executor::block_on;

    let temp = Cell::new(0.0f32);
    let mut dispatcher = Dispatcher::new();
    dispatcher.add_variable("temp", &temp).unwrap();

    let mut console: Console = TransportAdapter::new(MockSocket::new(), dispatcher);
    console.socket_mut().deliver(HOST, b"temp=21.5\ntemp\n");

    assert_eq!(block_on(console.poll_async()), Ok(2));
    assert_eq!(block_on(console.poll_async()), Ok(0));
    assert_eq!(console.socket().replies(), ["21.5\r\n"]);
}
