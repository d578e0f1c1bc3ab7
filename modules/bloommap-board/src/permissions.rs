use bloommap_common::{AuthSession, SightingRecord};

/// Only the author may change a note.
pub fn can_edit(session: &AuthSession, sighting: &SightingRecord) -> bool {
    session.owns(sighting)
}

/// The author or a privileged user may delete.
pub fn can_delete(session: &AuthSession, sighting: &SightingRecord) -> bool {
    session.owns(sighting) || session.is_privileged
}

pub fn can_moderate(session: &AuthSession) -> bool {
    session.is_privileged
}
