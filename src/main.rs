/*!
 * Plugin Bridge - Demo Entry Point
 *
 * Wires a session to a loopback "host page":
 * - a designated thread standing in for the host event loop
 * - a host thread that answers framed requests
 * - worker threads using fake pipes and blocking bridge calls
 */

use anyhow::Context;
use plugin_bridge::bridge::{envelope, FramedTransport};
use plugin_bridge::{init_tracing, Dispatcher, EventLoop, PluginConfig, PluginSession};
use std::thread;
use tracing::{info, warn};

enum HostMessage {
    Request(String),
    Shutdown,
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = PluginConfig::from_env().context("invalid plugin configuration")?;
    let event_loop = EventLoop::spawn("designated").context("failed to spawn designated thread")?;
    let dispatcher = event_loop.handle();

    // Outbound messages leave the designated thread for the host page
    let (to_host, host_inbox) = flume::unbounded::<HostMessage>();
    let host_control = to_host.clone();
    let transport = FramedTransport::new(move |message| {
        if to_host.send(HostMessage::Request(message)).is_err() {
            warn!("Host page is gone; request dropped");
        }
    });

    let session = PluginSession::new(config, dispatcher.clone(), transport)?;

    // Host page: answer every request, delivering replies on the designated thread
    let host = {
        let bridge = session.bridge().clone();
        thread::Builder::new()
            .name("host-page".to_string())
            .spawn(move || {
                for message in host_inbox.iter() {
                    let message = match message {
                        HostMessage::Request(message) => message,
                        HostMessage::Shutdown => break,
                    };
                    let (id, request) = match envelope::decode(&message) {
                        Ok(parts) => parts,
                        Err(e) => {
                            warn!(error = %e, "Host dropped malformed request");
                            continue;
                        }
                    };
                    let reply = envelope::encode(id, &format!("ACK {}", request));
                    let bridge = bridge.clone();
                    dispatcher.post(Box::new(move || {
                        if let Err(e) = bridge.handle_reply_message(&reply) {
                            warn!(error = %e, "Reply rejected");
                        }
                    }));
                }
            })
            .context("failed to spawn host thread")?
    };

    // Pipe round trip between two workers
    let posix = session.posix();
    let [read_fd, write_fd] = posix.pipe()?;
    let producer = {
        let posix = posix.clone();
        thread::spawn(move || posix.write(write_fd, b"scanline 0001"))
    };
    let mut buf = [0u8; 13];
    let n = posix.read(read_fd, &mut buf)?;
    info!(
        bytes = n,
        data = %String::from_utf8_lossy(&buf[..n]),
        "Worker read from fake pipe"
    );
    producer
        .join()
        .map_err(|_| anyhow::anyhow!("producer thread panicked"))??;

    // Blocking call onto the designated thread
    let usb = session.usb();
    let devices = thread::spawn(move || usb.find_devices())
        .join()
        .map_err(|_| anyhow::anyhow!("usb worker panicked"))??;
    info!(reply = %devices, "USB enumeration answered");

    posix.close(write_fd)?;
    posix.close(read_fd)?;
    info!(stats = ?session.bridge().stats(), "Demo complete");

    let _ = host_control.send(HostMessage::Shutdown);
    if host.join().is_err() {
        warn!("Host thread panicked");
    }
    event_loop.shutdown();
    Ok(())
}
