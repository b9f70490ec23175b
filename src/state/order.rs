//! Ordering Policy used inside each directory group

use std::cmp::Ordering;

use super::data::ImageRecord;

/// The focused record first, everything else by file name.
///
/// Ties on `file_name` compare equal, so a stable sort keeps catalog order.
pub fn compare(a: &ImageRecord, b: &ImageRecord, focus: Option<&str>) -> Ordering {
    if let Some(focus) = focus {
        let a_focused = a.full_path == focus;
        let b_focused = b.full_path == focus;
        if a_focused != b_focused {
            return if a_focused {
                Ordering::Less
            } else {
                Ordering::Greater
            };
        }
    }
    a.file_name.cmp(&b.file_name)
}

/// Sort one group's records in place
pub fn sort_group(records: &mut [&ImageRecord], focus: Option<&str>) {
    records.sort_by(|a, b| compare(a, b, focus));
}
