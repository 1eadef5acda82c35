use crate::file::FileRecord;
use crate::notebook::{FileSourceRecord, NotebookAction, NotebookInfo};

/// Apply a single action to the notebook state.
///
/// These are the only mutations the broker performs on the file collection:
/// add-or-replace by filename, and remove by id.
/// An added record also evicts any other record holding the same id, so ids
/// stay unique.
pub fn reduce(state: &mut NotebookInfo, action: &NotebookAction) {
    match action {
        NotebookAction::AddFileToNotebook {
            filename,
            last_updated,
            file_id,
        } => {
            // Also drop any stale record holding the same id so ids stay unique.
            state
                .files
                .retain(|f| f.filename != *filename && f.id != *file_id);
            state
                .files
                .push(FileRecord::new(*file_id, filename.clone(), last_updated.clone()));
        }
        NotebookAction::DeleteFileFromNotebook { file_id } => {
            state.files.retain(|f| f.id != *file_id);
        }
        NotebookAction::AddFileSourceToNotebook {
            source_url,
            file_source_id,
            destination_filename,
            frequency,
        } => {
            state.file_sources.retain(|s| s.id != *file_source_id);
            state.file_sources.push(FileSourceRecord {
                id: *file_source_id,
                source_url: source_url.clone(),
                destination_filename: destination_filename.clone(),
                frequency: *frequency,
            });
        }
        NotebookAction::DeleteFileSourceFromNotebook { file_source_id } => {
            state.file_sources.retain(|s| s.id != *file_source_id);
        }
    }
}
