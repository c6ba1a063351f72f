use super::MemberId;

/// Failures that can surface from the multicast machinery.
///
/// The protocol itself absorbs everything it tolerates (duplicate receipt,
/// out-of-order announcements, unknown senders); these variants only cover
/// the wiring around it.
#[derive(Debug, thiserror::Error)]
pub enum MulticastError {
    #[error("mailbox closed for member {0}")]
    MailboxClosed(MemberId),

    #[error("delivery sink closed for member {0}")]
    DeliverySinkClosed(MemberId),

    #[error("unknown member {0}")]
    UnknownMember(MemberId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_mailbox_closed() {
        let err = MulticastError::MailboxClosed(3);
        assert_eq!(err.to_string(), "mailbox closed for member 3");
    }

    #[test]
    fn test_display_unknown_member() {
        let err = MulticastError::UnknownMember(7);
        assert_eq!(err.to_string(), "unknown member 7");
    }
}
