pub mod error;

/// Identity of a group member, fixed for the duration of a run.
pub type MemberId = u64;

/// SHA-512 digest, used as the unique identity of a multicast message.
pub type Digest = [u8; 64];
