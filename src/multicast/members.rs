use crate::common::MemberId;

/// The fixed group membership, known to every member before any
/// message flows. The member with the lowest id plays the sequencer.
#[derive(Debug, Clone)]
pub struct GroupMembers {
    members: Vec<MemberId>,
    sequencer: MemberId,
}

impl GroupMembers {
    pub fn new(members: Vec<MemberId>) -> Self {
        assert!(!members.is_empty(), "a group needs at least one member");
        let sequencer = members.iter().copied().min().unwrap_or_default();
        GroupMembers { members, sequencer }
    }

    pub fn sequencer(&self) -> MemberId {
        self.sequencer
    }

    pub fn is_member(&self, id: MemberId) -> bool {
        self.members.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = MemberId> + '_ {
        self.members.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }
}
