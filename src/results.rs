use log::debug;

use crate::{
    icons::{IconCache, IconLoader},
    models::{ApplicationRecord, IconHandle, ResultItem},
};

/// Wrap a ranked record for the UI, resolving its icon through the cache.
/// A loader failure leaves a placeholder in the cache so it is not retried.
pub fn build_result(
    record: &ApplicationRecord,
    icons: &mut IconCache,
    loader: &dyn IconLoader,
) -> ResultItem {
    let icon = match icons.get(&record.desktop_file) {
        Some(icon) => icon.clone(),
        None => {
            let icon = loader.load_icon(&record.desktop_file).unwrap_or_else(|err| {
                debug!("no icon for {}: {err:#}", record.desktop_file);
                IconHandle::Placeholder
            });
            icons.insert(record.desktop_file.clone(), icon.clone());
            icon
        }
    };

    ResultItem {
        name: record.name.clone(),
        description: record.description.clone(),
        desktop_file: record.desktop_file.clone(),
        icon,
    }
}
