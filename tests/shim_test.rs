/*!
 * Shim Tests
 * POSIX pipe and USB entry points driven through a plugin session
 */

use nix::errno::Errno;
use nix::fcntl::OFlag;
use nix::libc;
use plugin_bridge::bridge::{envelope, FramedTransport};
use plugin_bridge::{Dispatcher, EventLoop, PluginConfig, PluginSession, Side};
use pretty_assertions::assert_eq;
use std::thread;
use std::time::Duration;

fn session_with_echo_host(config: PluginConfig) -> (EventLoop, PluginSession) {
    let event_loop = EventLoop::spawn("designated").unwrap();
    let dispatcher = event_loop.handle();
    let (to_host, host_inbox) = flume::unbounded::<String>();

    let session = PluginSession::new(
        config,
        dispatcher.clone(),
        FramedTransport::new(move |message| {
            let _ = to_host.send(message);
        }),
    )
    .unwrap();

    let bridge = session.bridge().clone();
    thread::spawn(move || {
        while let Ok(message) = host_inbox.recv_timeout(Duration::from_secs(2)) {
            let (id, request) = envelope::decode(&message).unwrap();
            let reply = envelope::encode(id, &format!("[] for {}", request));
            let bridge = bridge.clone();
            dispatcher.post(Box::new(move || {
                bridge.handle_reply_message(&reply).unwrap();
            }));
        }
    });

    (event_loop, session)
}

#[test]
fn test_posix_pipe_round_trip() {
    let (event_loop, session) = session_with_echo_host(PluginConfig::default());
    let posix = session.posix();

    let [read_fd, write_fd] = posix.pipe().unwrap();
    assert_eq!(posix.write(write_fd, b"sane"), Ok(4));

    let mut buf = [0u8; 4];
    assert_eq!(posix.read(read_fd, &mut buf), Ok(4));
    assert_eq!(&buf, b"sane");

    assert_eq!(posix.close(write_fd), Ok(Side::Write));
    assert_eq!(posix.read(read_fd, &mut buf), Ok(0));
    event_loop.shutdown();
}

#[test]
fn test_posix_nonblocking_errno() {
    let config = PluginConfig::default().with_pipe_capacity(2);
    let (event_loop, session) = session_with_echo_host(config);
    let posix = session.posix();
    let [read_fd, write_fd] = posix.pipe().unwrap();

    posix.fcntl_setfl(read_fd, OFlag::O_NONBLOCK).unwrap();
    posix
        .fcntl(write_fd, libc::F_SETFL, libc::O_NONBLOCK as libc::c_long)
        .unwrap();

    let mut buf = [0u8; 4];
    assert_eq!(posix.read(read_fd, &mut buf), Err(Errno::EAGAIN));
    assert_eq!(posix.write(write_fd, b"abc"), Ok(2));
    assert_eq!(posix.write(write_fd, b"c"), Err(Errno::EAGAIN));

    // Clearing the flag restores blocking mode on that end only
    posix.fcntl_setfl(read_fd, OFlag::empty()).unwrap();
    let stats = posix.registry().stats(read_fd).unwrap();
    assert!(!stats.read_nonblocking);
    assert!(stats.write_nonblocking);
    event_loop.shutdown();
}

#[test]
fn test_posix_errno_for_bad_descriptors() {
    let config = PluginConfig::default().with_handle_limit(2);
    let (event_loop, session) = session_with_echo_host(config);
    let posix = session.posix();

    let [read_fd, write_fd] = posix.pipe().unwrap();
    assert_eq!(posix.pipe(), Err(Errno::EMFILE));
    assert_eq!(posix.write(read_fd, b"x"), Err(Errno::EBADF));

    posix.close(read_fd).unwrap();
    assert_eq!(posix.write(write_fd, b"x"), Err(Errno::EPIPE));
    event_loop.shutdown();
}

#[test]
fn test_usb_find_devices_goes_through_host() {
    let (event_loop, session) = session_with_echo_host(PluginConfig::default());
    let usb = session.usb();

    let reply = thread::spawn(move || usb.find_devices())
        .join()
        .unwrap()
        .unwrap();
    assert_eq!(reply, "[] for USB:FIND_DEVICES");
    event_loop.shutdown();
}
