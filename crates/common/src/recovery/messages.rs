//! User-facing text for terminal failures.
//!
//! Messages depend only on the category. Suggestions depend on the category,
//! and on the operation kind only when the category is unknown. Every list
//! holds one to three entries.

use super::types::{ErrorCategory, OperationKind};

/// Human-readable description of a failure.
///
/// `raw` is the error's own text; it is only echoed for validation and
/// unknown failures, where it usually names the offending field.
pub fn failure_message(category: ErrorCategory, raw: &str) -> String {
    match category {
        ErrorCategory::NetworkFailure => {
            "Network connection problem. Please check your connection and try again.".to_owned()
        }
        ErrorCategory::StorageFailure => {
            "Could not access local storage. Your changes may not have been saved.".to_owned()
        }
        ErrorCategory::PermissionDenied => {
            "Permission denied. The app is not allowed to perform this action.".to_owned()
        }
        ErrorCategory::ValidationFailure => format!("Invalid data: {raw}"),
        ErrorCategory::TransientFailure => {
            "The resource is temporarily busy. Please try again in a moment.".to_owned()
        }
        ErrorCategory::Unknown => format!("Operation failed: {raw}"),
    }
}

/// Actionable next steps for a failure.
pub fn suggestions(category: ErrorCategory, kind: OperationKind) -> Vec<String> {
    let lines: &[&str] = match category {
        ErrorCategory::NetworkFailure => &[
            "Check your internet connection",
            "Try again in a few moments",
            "Work offline and sync later",
        ],
        ErrorCategory::StorageFailure => &[
            "Make sure the device has free storage space",
            "Restart the app and try again",
        ],
        ErrorCategory::PermissionDenied => &[
            "Grant the app access in your system settings",
            "Sign in again if your session has expired",
        ],
        ErrorCategory::ValidationFailure => &[
            "Review the highlighted fields and correct them",
            "Make sure required fields are filled in",
        ],
        ErrorCategory::TransientFailure => &["Wait a moment and try again"],
        ErrorCategory::Unknown => unknown_suggestions(kind),
    };

    lines.iter().map(|line| (*line).to_owned()).collect()
}

fn unknown_suggestions(kind: OperationKind) -> &'static [&'static str] {
    match kind {
        OperationKind::Save => {
            &["Try saving again", "Copy your changes somewhere safe before retrying"]
        }
        OperationKind::Load => {
            &["Refresh and try again", "Restart the app if the problem persists"]
        }
        OperationKind::Delete => {
            &["Try deleting again", "Refresh the list to check whether it was removed"]
        }
        OperationKind::Upload => &["Try a smaller or different file", "Try uploading again"],
        OperationKind::Download => {
            &["Try downloading again", "Check that the source is still available"]
        }
        OperationKind::Validation => &["Review your input and try again"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATEGORIES: [ErrorCategory; 6] = [
        ErrorCategory::PermissionDenied,
        ErrorCategory::ValidationFailure,
        ErrorCategory::NetworkFailure,
        ErrorCategory::StorageFailure,
        ErrorCategory::TransientFailure,
        ErrorCategory::Unknown,
    ];

    #[test]
    fn test_every_combination_has_one_to_three_suggestions() {
        for category in CATEGORIES {
            for kind in OperationKind::ALL {
                let list = suggestions(category, kind);
                assert!((1..=3).contains(&list.len()), "{category}/{kind}: {list:?}");
            }
        }
    }

    #[test]
    fn test_kind_only_matters_for_unknown() {
        for category in CATEGORIES.into_iter().filter(|c| *c != ErrorCategory::Unknown) {
            let save = suggestions(category, OperationKind::Save);
            for kind in OperationKind::ALL {
                assert_eq!(suggestions(category, kind), save);
            }
        }

        assert_ne!(
            suggestions(ErrorCategory::Unknown, OperationKind::Save),
            suggestions(ErrorCategory::Unknown, OperationKind::Load)
        );
    }

    #[test]
    fn test_network_message_mentions_connection() {
        let message = failure_message(ErrorCategory::NetworkFailure, "connect timeout");
        assert!(message.contains("Network connection"));
        assert!(!message.contains("connect timeout"));
    }

    #[test]
    fn test_validation_message_echoes_raw_error() {
        assert_eq!(
            failure_message(ErrorCategory::ValidationFailure, "validation: title required"),
            "Invalid data: validation: title required"
        );
    }
}
