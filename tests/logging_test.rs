/*!
 * Logging Tests
 * `log` records from the registry and POSIX shim reach the tracing subscriber
 */

use nix::errno::Errno;
use nix::libc;
use parking_lot::Mutex;
use plugin_bridge::{ChannelRegistry, PosixPipes};
use std::io;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_log_records_reach_subscriber() {
    let captured = Captured::default();
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_ansi(false)
        .with_writer({
            let captured = captured.clone();
            move || captured.clone()
        })
        .finish()
        .try_init()
        .unwrap();

    assert!(log::log_enabled!(log::Level::Warn));

    let registry = ChannelRegistry::new(8, 2);
    registry.create_pair().unwrap();
    assert!(registry.create_pair().is_err());

    let posix = PosixPipes::new(registry.clone());
    assert_eq!(posix.fcntl(0, libc::F_GETFL, 0), Err(Errno::EINVAL));

    let output = String::from_utf8_lossy(&captured.0.lock()).into_owned();
    assert!(output.contains("ran out of handles"), "got: {}", output);
    assert!(output.contains("Unhandled fcntl"), "got: {}", output);
    assert!(output.contains("Created pipe"), "got: {}", output);
}
