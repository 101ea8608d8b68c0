use opus_vault_spec::{ArtefactRecord, Identity};

/// Owner-or-admin access control over artefact records.
///
/// Admins may act on any record and list across owners. Every other caller
/// is confined to records they own.
#[derive(Debug, Default, Clone, Copy)]
pub struct AccessPolicy;

impl AccessPolicy {
    /// Determine whether the caller may decrypt and read a record.
    pub fn can_read(&self, identity: &Identity, record: &ArtefactRecord) -> bool {
        self.evaluate(Action::Read, identity, record)
    }

    /// Determine whether the caller may change a record's content or name.
    pub fn can_write(&self, identity: &Identity, record: &ArtefactRecord) -> bool {
        self.evaluate(Action::Write, identity, record)
    }

    /// Determine whether the caller may remove a record.
    pub fn can_delete(&self, identity: &Identity, record: &ArtefactRecord) -> bool {
        self.evaluate(Action::Delete, identity, record)
    }

    /// Determine whether the caller may see records across all owners.
    pub fn can_list_all(&self, identity: &Identity) -> bool {
        identity.is_admin()
    }

    fn evaluate(&self, action: Action, identity: &Identity, record: &ArtefactRecord) -> bool {
        match action {
            Action::Read | Action::Write | Action::Delete => {
                identity.is_admin() || identity.user_id() == &record.owner_id
            }
        }
    }
}

#[derive(Clone, Copy)]
enum Action {
    Read,
    Write,
    Delete,
}
