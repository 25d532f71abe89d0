//! Sync Reducer
//!
//! Merges envelopes into the local state, one field at a time. A field is
//! taken from an envelope only when the envelope's version is newer and the
//! field has no unsaved local edit.
//!
//! An envelope carrying an *older* version of a clean field than the one
//! held locally means storage lost that write (the stored value was wiped or
//! replaced). The field is marked dirty again so the next flush rewrites it.

use crate::actions::SyncAction;
use crate::state::{AdminState, DirtyFields, SyncField};

pub fn reduce(mut state: AdminState, action: &SyncAction) -> AdminState {
    match action {
        SyncAction::Hydrate(envelope) => {
            log::info!("Hydrating admin state from envelope #{}", envelope.sequence);
            let mut hydrated = envelope.state.clone();
            hydrated.dirty = DirtyFields::empty();
            hydrated.applied_sequence = envelope.sequence;
            return hydrated;
        }

        SyncAction::Committed(envelope) => {
            for field in SyncField::ALL {
                state.adopt_field(&envelope.state, field);
            }
            state.dirty = DirtyFields::empty();
            state.applied_sequence = state.applied_sequence.max(envelope.sequence);
        }

        SyncAction::Received {
            envelope,
            foreign,
            at,
        } => {
            if envelope.sequence <= state.applied_sequence {
                log::trace!("Envelope #{} already applied", envelope.sequence);
                return state;
            }

            let mut adopted = Vec::new();
            for field in SyncField::ALL {
                let incoming = envelope.state.versions.get(field);
                let local = state.versions.get(field);
                if incoming < local && !state.dirty.contains(field.flag()) {
                    log::warn!(
                        "Envelope #{} lost {:?} (v{} < v{}), rewriting local copy",
                        envelope.sequence,
                        field,
                        incoming,
                        local
                    );
                    state.dirty.insert(field.flag());
                    continue;
                }
                if incoming <= local {
                    continue;
                }
                if state.dirty.contains(field.flag()) {
                    log::debug!("Keeping local edit of {:?} over envelope #{}", field, envelope.sequence);
                    continue;
                }
                state.adopt_field(&envelope.state, field);
                adopted.push(field);
            }
            state.applied_sequence = envelope.sequence;

            if !adopted.is_empty() {
                log::info!(
                    "Merged {:?} from envelope #{} ({})",
                    adopted,
                    envelope.sequence,
                    envelope.origin
                );
                if *foreign {
                    state.sync_status.last_sync = Some(*at);
                    state.sync_status.pending_changes = 0;
                }
            }
        }

        SyncAction::RemoteStarted => {
            state.sync_status.is_online = true;
        }

        SyncAction::RemoteCompleted { at } => {
            state.sync_status.last_sync = Some(*at);
            state.sync_status.pending_changes = 0;
        }

        SyncAction::RemoteFailed { .. } => {
            state.sync_status.is_online = false;
        }
    }
    state
}
