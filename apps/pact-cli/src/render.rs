// render.rs — terminal output for previews, errors, notices and stats.

use pact_client::DashboardStats;
use pact_draft::FieldErrors;
use pact_workflow::{AgreementSummary, Notice};

fn row(label: &str, value: &str) {
    println!("  {label:<20} {value}");
}

fn opt(value: &Option<String>, fallback: &str) -> String {
    value.clone().unwrap_or_else(|| fallback.to_string())
}

/// Print the normalized confirmation view.
pub fn print_summary(summary: &AgreementSummary) {
    println!("Agreement details");
    println!("-----------------");
    row(
        "Agreement ID",
        &opt(&summary.agreement_code, "Not assigned yet"),
    );
    row("Created by", &opt(&summary.creator_name, "Not specified"));
    row("Title", &summary.title);
    row("Reference", &summary.agreement_reference);
    row(
        "Agreement type",
        &opt(&summary.agreement_type_name, "Not specified"),
    );
    row(
        "Department",
        &opt(&summary.department_name, "Not specified"),
    );
    row("Party", &opt(&summary.party_name, "Not specified"));
    row(
        "Start date",
        &summary
            .start_date
            .map(|d| d.to_string())
            .unwrap_or_default(),
    );
    row(
        "Expiry date",
        &summary
            .expiry_date
            .map(|d| d.to_string())
            .unwrap_or_default(),
    );
    row(
        "Reminder date",
        &summary
            .reminder_date
            .map(|d| d.to_string())
            .unwrap_or_default(),
    );
    row(
        "Attachment",
        &opt(&summary.attachment_name, "No file uploaded"),
    );
    if summary.remarks.is_empty() {
        row("Remarks", "No remarks provided");
    } else {
        row("Remarks", &summary.remarks);
    }
    if summary.users_with_access.is_empty() {
        row("Users with access", "No users found");
    } else {
        let names: Vec<String> = summary
            .users_with_access
            .iter()
            .map(|u| match &u.department_name {
                Some(dept) => format!("{} ({dept})", u.full_name),
                None => u.full_name.clone(),
            })
            .collect();
        row("Users with access", &names.join(", "));
    }
}

/// Print field errors, general message first.
pub fn print_errors(errors: &FieldErrors) {
    if let Some(general) = errors.general() {
        eprintln!("error: {general}");
    }
    for (field, message) in errors.iter() {
        if field != "general" {
            eprintln!("  {field}: {message}");
        }
    }
}

/// Print a toast-style notice.
pub fn print_notice(notice: &Notice) {
    match notice {
        Notice::SubmitSucceeded {
            title,
            agreement_id,
        } => match agreement_id {
            Some(id) => println!("'{title}' saved (id {id})."),
            None => println!("'{title}' saved."),
        },
        Notice::SubmitFailed { title, message } => {
            eprintln!("'{title}' failed to save: {message}");
        }
        Notice::ReminderSent { email } => match email {
            Some(email) => println!("Test reminder sent to {email}."),
            None => println!("Test reminder sent."),
        },
        Notice::ReminderFailed { message } => {
            eprintln!("Test reminder failed: {message}");
        }
    }
}

/// Print a dashboard snapshot.
pub fn print_stats(stats: &DashboardStats) {
    println!(
        "active: {}  expiring soon: {}  expired: {}",
        stats.active, stats.expiring_soon, stats.expired
    );
    for slice in &stats.by_department {
        println!("  dept {:<24} {}", slice.name, slice.value);
    }
    for slice in &stats.by_status {
        println!("  status {:<22} {}", slice.name, slice.value);
    }
}
