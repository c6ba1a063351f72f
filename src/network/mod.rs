pub mod driver;
pub mod transport;

pub use driver::*;
pub use transport::*;

/*
    The transport model: communication is point-to-point, asynchronous
    and reliable: a member receives a message if and only if another
    member sent it that message, exactly once (no loss, no duplication).
    Sends between the same (sender, receiver) pair arrive in send order;
    nothing is guaranteed about interleaving across distinct pairs, which
    is precisely what the ordering protocol has to tolerate. "Broadcast"
    means the sender posting the same point-to-point message to every
    member of the group, including itself.
*/
