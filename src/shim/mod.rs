/*!
 * Shim Module
 * Library-facing entry points translated onto pipes and the call bridge
 */

pub mod posix;
pub mod usb;

pub use posix::PosixPipes;
pub use usb::UsbShim;
