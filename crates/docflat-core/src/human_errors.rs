// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable failure reasons for pages and batches.
//
// Every technical error is mapped to plain English with a clear suggestion,
// so a host UI can show a failed page next to its siblings without parsing
// error strings.

use crate::error::{PageError, ScanError};

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The user can fix it (retake the photo, move the corners).
    ActionRequired,
    /// Retrying the same input will fail the same way.
    Permanent,
    /// Something inside the app went wrong; trying again may help.
    Internal,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Severity level (drives icon/colour in UI).
    pub severity: Severity,
}

impl HumanError {
    /// Single-line label, e.g. for a failed page thumbnail.
    pub fn label(&self) -> String {
        format!("{} {}", self.message, self.suggestion)
    }
}

/// Convert a page failure into something a user can act on.
pub fn humanize_page_error(err: &PageError) -> HumanError {
    match err {
        PageError::ImageTooSmall { width, height, .. } => HumanError {
            message: "This photo is too small to find a page in.".into(),
            suggestion: format!(
                "Take the photo again closer to the document. (Photo size: {width}x{height})"
            ),
            severity: Severity::ActionRequired,
        },

        PageError::DegenerateQuad => HumanError {
            message: "The page corners don't form a shape.".into(),
            suggestion: "Drag the four corners so they sit on the corners of the page.".into(),
            severity: Severity::ActionRequired,
        },

        PageError::SourceImageUnreadable(_) => HumanError {
            message: "This photo couldn't be opened.".into(),
            suggestion: "The file may be damaged or in an unusual format. Try a JPEG or PNG."
                .into(),
            severity: Severity::Permanent,
        },

        PageError::TransformSingular => HumanError {
            message: "The page couldn't be straightened.".into(),
            suggestion: "Move the corners slightly and try again.".into(),
            severity: Severity::Internal,
        },

        PageError::OutputTooLarge { .. } => HumanError {
            message: "The page corners are too narrow to straighten.".into(),
            suggestion: "Drag the corners out so they cover the whole page.".into(),
            severity: Severity::ActionRequired,
        },

        PageError::WorkerPanicked(_) => HumanError {
            message: "Something went wrong while processing this page.".into(),
            suggestion: "Try again. If this keeps happening, please report it.".into(),
            severity: Severity::Internal,
        },

        PageError::EncodeFailure(detail) => {
            let lower = detail.to_ascii_lowercase();
            if lower.contains("no space") || lower.contains("storage full") {
                HumanError {
                    message: "There's no room to save the scanned page.".into(),
                    suggestion: "Free up some storage on your device, then try again.".into(),
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "The scanned page couldn't be saved.".into(),
                    suggestion: "Try again. If this keeps happening, please report it.".into(),
                    severity: Severity::Internal,
                }
            }
        }
    }
}

/// Convert a batch-level failure into a plain English message.
pub fn humanize_scan_error(err: &ScanError) -> HumanError {
    match err {
        ScanError::PipelineEmptyInput => HumanError {
            message: "No photos were chosen.".into(),
            suggestion: "Pick or take at least one photo of a document.".into(),
            severity: Severity::ActionRequired,
        },

        ScanError::TooManyDocuments { max, .. } => HumanError {
            message: "Too many photos at once.".into(),
            suggestion: format!("Choose at most {max} photos, then scan the rest separately."),
            severity: Severity::ActionRequired,
        },

        ScanError::AdjustableBatchSize(_) => HumanError {
            message: "Corners can only be adjusted one page at a time.".into(),
            suggestion: "Pick a single page to adjust.".into(),
            severity: Severity::ActionRequired,
        },

        ScanError::InvalidConfig(detail) => HumanError {
            message: "The scanner settings aren't valid.".into(),
            suggestion: format!("Check the settings and try again. ({detail})"),
            severity: Severity::ActionRequired,
        },

        ScanError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => HumanError {
            message: "The file couldn't be found.".into(),
            suggestion: "It may have been moved or deleted. Try choosing the file again.".into(),
            severity: Severity::ActionRequired,
        },

        ScanError::Io(io_err) if io_err.kind() == std::io::ErrorKind::PermissionDenied => {
            HumanError {
                message: "The app doesn't have permission to use that file.".into(),
                suggestion: "Check the file permissions, or choose a different folder.".into(),
                severity: Severity::ActionRequired,
            }
        }

        ScanError::WorkerPool(_)
        | ScanError::Pdf(_)
        | ScanError::Io(_)
        | ScanError::Serialization(_) => HumanError {
            message: "The scanner had an internal problem.".into(),
            suggestion: "Try again. If this keeps happening, please report it.".into(),
            severity: Severity::Internal,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_small_is_action_required() {
        let err = PageError::ImageTooSmall {
            width: 120,
            height: 90,
            margin: 100.0,
        };
        let human = humanize_page_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(human.suggestion.contains("120x90"));
    }

    #[test]
    fn unreadable_is_permanent() {
        let human = humanize_page_error(&PageError::SourceImageUnreadable("bad magic".into()));
        assert_eq!(human.severity, Severity::Permanent);
    }

    #[test]
    fn full_disk_is_action_required() {
        let err = PageError::EncodeFailure("No space left on device (os error 28)".into());
        assert_eq!(humanize_page_error(&err).severity, Severity::ActionRequired);
    }

    #[test]
    fn sliver_corners_ask_for_new_corners() {
        let err = PageError::OutputTooLarge {
            width: 500,
            height: 500_000_000,
        };
        let human = humanize_page_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(human.suggestion.contains("corners"));
    }

    #[test]
    fn worker_panic_is_internal() {
        let err = PageError::WorkerPanicked("index out of bounds".into());
        assert_eq!(humanize_page_error(&err).severity, Severity::Internal);
    }

    #[test]
    fn label_joins_message_and_suggestion() {
        let human = humanize_scan_error(&ScanError::PipelineEmptyInput);
        assert!(human.label().starts_with("No photos were chosen."));
    }
}
