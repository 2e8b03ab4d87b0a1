//! Utilities used by the forwarding protocol: addresses, header layout, the tagged pointer
//! codec, and the forwarding header view itself.

#[macro_use]
mod macros;

/// Address and object reference types.
pub mod address;
/// The tagged pointer codec.
pub mod codec;
/// Size constants.
pub mod constants;
/// The object model's header layout.
pub mod layout;
/// Logger initialization
pub mod logger;
/// Claiming an object for evacuation and reading its forwarding pointer.
pub mod object_forwarding;
/// Options, read from the environment.
pub mod options;
/// Claim counters.
pub mod statistics;
/// Header tag bits.
pub mod tags;

#[cfg(test)]
pub(crate) mod test_util;

pub use self::address::Address;
pub use self::address::ObjectReference;
