use tracing::info;

use crate::config::CleanupConfig;
use crate::item::{Folder, VaultItem};
use crate::model::{FolderAssignment, Rename};
use crate::uri::{is_app_link, normalize_uri};

/// Personal entries split by whether they can take part in reconciliation.
#[derive(Debug, Clone, Default)]
pub struct NormalizedEntries {
    /// Have a login block and at least one URI; names and folders fixed up.
    pub reconcilable: Vec<VaultItem>,
    /// Everything else, untouched.
    pub skipped: Vec<VaultItem>,
    pub renames: Vec<Rename>,
    pub folder_assignments: Vec<FolderAssignment>,
}

/// Display name for `item`: unchanged unless it is the placeholder, in which
/// case it is derived from the first URI's target.
pub fn normalize_name(item: &VaultItem, config: &CleanupConfig) -> String {
    let name = item.name().unwrap_or_default();
    if name != config.placeholder_name {
        return name.to_string();
    }
    let Some(uri) = item.first_uri() else {
        return name.to_string();
    };
    let target = normalize_uri(uri, &config.app_schemes);
    let derived = if is_app_link(uri, &config.app_schemes) {
        // com.example.app -> app
        target.rsplit('.').next()
    } else {
        // mail.example.com -> mail
        target.split('.').next()
    };
    derived.unwrap_or_default().to_string()
}

/// First folder, in list order, whose name occurs in the username.
///
/// Only entries without a folder and with a non-empty username qualify. A
/// first match with a blank id assigns nothing.
pub fn assign_folder<'a>(item: &VaultItem, folders: &'a [Folder]) -> Option<&'a Folder> {
    if item.has_folder() {
        return None;
    }
    let username = item.username().filter(|u| !u.is_empty())?;
    folders
        .iter()
        .find(|folder| username.contains(folder.name.as_str()))
        .filter(|folder| !folder.id.is_empty())
}

/// Route entries into reconcilable/skipped and fix names and folders of the former.
pub fn normalize_entries(
    items: Vec<VaultItem>,
    folders: &[Folder],
    config: &CleanupConfig,
) -> NormalizedEntries {
    let mut out = NormalizedEntries::default();

    for mut item in items {
        if !item.is_reconcilable() {
            out.skipped.push(item);
            continue;
        }

        let original = item.name().unwrap_or_default().to_string();
        let name = normalize_name(&item, config);
        if name != original {
            info!(id = item.id(), from = %original, to = %name, "renamed entry");
            out.renames.push(Rename {
                id: item.id().to_string(),
                from: original,
                to: name.clone(),
            });
            item.set_name(name);
        }

        if config.assign_folders {
            if let Some(folder) = assign_folder(&item, folders) {
                info!(id = item.id(), folder = %folder.name, "assigned folder");
                out.folder_assignments.push(FolderAssignment {
                    id: item.id().to_string(),
                    name: item.name().unwrap_or_default().to_string(),
                    folder_id: folder.id.clone(),
                    folder_name: folder.name.clone(),
                });
                item.set_folder_id(folder.id.clone());
            }
        }

        out.reconcilable.push(item);
    }

    out
}
