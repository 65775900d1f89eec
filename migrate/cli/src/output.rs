//! Terminal output for migration runs.
//!
//! Logs go to stderr through `tracing`; everything here goes to stdout and is
//! meant to be read by the person supervising the run.

use migrate_lib::{HeheReport, MeetingReport, SkippedFile, UploadSummary};
use owo_colors::OwoColorize;

/// Prints `WARNING: <msg>` with the label in bold red.
pub fn print_warning(msg: &str) {
    println!("{}: {msg}", "WARNING".bold().red());
}

fn print_skipped(skipped: &[SkippedFile]) {
    for file in skipped {
        print_warning(&format!(
            "Skipped {} ({}), consider uploading manually",
            file.path.display(),
            file.reason
        ));
    }
}

fn print_failures(summary: &UploadSummary) {
    for failure in &summary.failures {
        print_warning(&format!(
            "Could not {} for {}: {}",
            failure.stage,
            failure.path.display(),
            failure.message
        ));
    }
}

/// Prints the outcome of a meeting-document run.
pub fn print_meeting_report(report: &MeetingReport) {
    match &report.upload {
        None => {
            for doc in &report.scan.documents {
                println!(
                    "{:<14} {:<14} {}",
                    doc.meeting_key(),
                    doc.document_type(),
                    doc.path().display()
                );
            }
            println!("{} meeting documents classified", report.scan.documents.len());
        }
        Some(summary) => {
            println!(
                "Uploaded {} files, created {} meetings, attached {}",
                summary.files_uploaded, summary.meetings_created, summary.files_registered
            );
            print_failures(summary);
        }
    }

    print_skipped(&report.scan.skipped);
    for duplicate in &report.duplicates {
        print_warning(&format!(
            "Duplicate document found! Check {} ({} and {})",
            duplicate.id(),
            duplicate.first.display(),
            duplicate.duplicate.display()
        ));
    }
}

/// Prints the outcome of a HeHE run.
pub fn print_hehe_report(report: &HeheReport) {
    match &report.upload {
        None => {
            for paper in &report.scan.papers {
                println!("{:<10} {}", paper.to_string(), paper.path().display());
            }
            println!("{} HeHE papers found", report.scan.papers.len());
        }
        Some(summary) => {
            println!(
                "Uploaded {} files, registered {}",
                summary.files_uploaded, summary.files_registered
            );
            print_failures(summary);
        }
    }

    print_skipped(&report.scan.skipped);
    for duplicate in &report.scan.duplicates {
        print_warning(&format!(
            "Duplicate file found! Check {duplicate} ({})",
            duplicate.path().display()
        ));
    }
}
