//! Novel Catalog Reducer

use crate::actions::NovelAction;
use crate::state::{AdminState, Novel, SyncField};

pub fn reduce(mut state: AdminState, action: &NovelAction) -> AdminState {
    match action {
        NovelAction::Add(novel) => {
            state.novels.push(novel.clone());
            state.record_admin_change(SyncField::Novels);
        }

        NovelAction::Update(novel) => match state.novels.iter_mut().find(|n| n.id == novel.id) {
            Some(existing) => {
                *existing = Novel {
                    created_at: existing.created_at,
                    ..novel.clone()
                };
                state.record_admin_change(SyncField::Novels);
            }
            None => log::warn!("Update of unknown novel {} ignored", novel.id),
        },

        NovelAction::Delete(id) => {
            let before = state.novels.len();
            state.novels.retain(|novel| novel.id != *id);
            if state.novels.len() < before {
                state.record_admin_change(SyncField::Novels);
            } else {
                log::warn!("Delete of unknown novel {} ignored", id);
            }
        }
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{DirtyFields, NewNovel};
    use chrono::{Duration, Utc};

    #[test]
    fn test_novel_lifecycle() {
        let created = Utc::now();
        let novel = Novel::create(7, NewNovel::new("Café con aroma de mujer", "Drama", 80, 1994), created);
        let state = reduce(AdminState::default(), &NovelAction::Add(novel.clone()));
        assert_eq!(state.novels.len(), 1);
        assert!(state.dirty.contains(DirtyFields::NOVELS));

        let mut edited = novel;
        edited.chapters = 90;
        edited.updated_at = created + Duration::seconds(1);
        let state = reduce(state, &NovelAction::Update(edited));
        assert_eq!(state.find_novel(7).unwrap().chapters, 90);
        assert_eq!(state.find_novel(7).unwrap().created_at, created);

        let state = reduce(state, &NovelAction::Delete(7));
        assert!(state.novels.is_empty());
        assert_eq!(state.sync_status.pending_changes, 3);
    }

    #[test]
    fn test_unknown_novel_is_noop() {
        let state = reduce(AdminState::default(), &NovelAction::Delete(1));
        assert_eq!(state, AdminState::default());
    }
}
