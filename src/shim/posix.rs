/*!
 * POSIX Pipe Shim
 * pipe()/read()/write()/fcntl()/close() semantics over the channel registry
 */

use crate::core::types::{Handle, Size};
use crate::pipe::{ChannelError, ChannelRegistry, Side};
use log::warn;
use nix::errno::Errno;
use nix::fcntl::OFlag;
use nix::libc;

impl From<ChannelError> for Errno {
    fn from(err: ChannelError) -> Self {
        match err {
            ChannelError::WouldBlock => Errno::EAGAIN,
            ChannelError::NotFound(_) => Errno::EBADF,
            ChannelError::ResourceExhausted { .. } => Errno::EMFILE,
            ChannelError::BrokenPipe => Errno::EPIPE,
            ChannelError::InvalidCapacity(_) => Errno::EINVAL,
        }
    }
}

/// Descriptor-level facade for library code written against real pipes
#[derive(Clone)]
pub struct PosixPipes {
    registry: ChannelRegistry,
}

impl PosixPipes {
    pub fn new(registry: ChannelRegistry) -> Self {
        Self { registry }
    }

    /// Returns `[read_fd, write_fd]`
    pub fn pipe(&self) -> Result<[Handle; 2], Errno> {
        let (read, write) = self.registry.create_pair()?;
        Ok([read, write])
    }

    pub fn read(&self, fd: Handle, buf: &mut [u8]) -> Result<Size, Errno> {
        Ok(self.registry.read_from(fd, buf)?)
    }

    pub fn write(&self, fd: Handle, buf: &[u8]) -> Result<Size, Errno> {
        Ok(self.registry.write_to(fd, buf)?)
    }

    /// `fcntl(fd, F_SETFL, flags)`; only `O_NONBLOCK` has an effect
    pub fn fcntl_setfl(&self, fd: Handle, flags: OFlag) -> Result<(), Errno> {
        self.registry
            .set_nonblocking(fd, flags.contains(OFlag::O_NONBLOCK))?;
        Ok(())
    }

    /// Raw `fcntl`; `F_SETFL` is the only supported command
    pub fn fcntl(&self, fd: Handle, cmd: libc::c_int, arg: libc::c_long) -> Result<(), Errno> {
        match cmd {
            libc::F_SETFL => {
                self.fcntl_setfl(fd, OFlag::from_bits_truncate(arg as libc::c_int))
            }
            _ => {
                warn!("Unhandled fcntl(fd={}, cmd={})", fd, cmd);
                Err(Errno::EINVAL)
            }
        }
    }

    pub fn close(&self, fd: Handle) -> Result<Side, Errno> {
        Ok(self.registry.close(fd)?)
    }

    pub fn registry(&self) -> &ChannelRegistry {
        &self.registry
    }
}
