//! Terminal output for pass reports, plans and the configured volume set.
//!
//! Render functions build strings so they can be checked without a terminal; the CLI
//! handlers print them.

use colored::*;
use volumizer::api::{Action, CmdMessage, InstanceOutcome, MessageLevel, PassReport};
use volumizer::commands::plan::Plan;
use volumizer::model::VolumeSet;

const ACTION_WIDTH: usize = 9;

pub fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

fn action_label(action: Action) -> ColoredString {
    let label = format!("{:<width$}", action_name(action), width = ACTION_WIDTH);
    match action {
        Action::Created | Action::Mounted => label.green(),
        Action::Removed => label.yellow(),
        Action::Failed => label.red(),
        Action::Verified | Action::Absent => label.dimmed(),
    }
}

fn action_name(action: Action) -> &'static str {
    match action {
        Action::Created => "created",
        Action::Mounted => "mounted",
        Action::Verified => "ok",
        Action::Removed => "removed",
        Action::Absent => "absent",
        Action::Failed => "failed",
    }
}

/// Lines for instances that changed or need attention. Quiet outcomes are only counted.
fn render_outcomes(outcomes: &[InstanceOutcome], out: &mut String) {
    for outcome in outcomes {
        let noteworthy = !matches!(outcome.action, Action::Verified | Action::Absent)
            || outcome.has_warnings();
        if !noteworthy {
            continue;
        }
        out.push_str(&format!(
            "  {} {}\n",
            action_label(outcome.action),
            outcome.instance
        ));
        for message in &outcome.messages {
            let content = match message.level {
                MessageLevel::Warning => message.content.yellow(),
                MessageLevel::Error => message.content.red(),
                _ => message.content.dimmed(),
            };
            out.push_str(&format!("      {}\n", content));
        }
    }
}

pub fn render_report(report: &PassReport) -> String {
    let mut out = String::new();

    if !report.reconciled.is_empty() {
        out.push_str(&format!("{}\n", "Provisioning".bold()));
        render_outcomes(&report.reconciled, &mut out);
    }
    if !report.swept.is_empty() {
        out.push_str(&format!("{}\n", "Retention".bold()));
        render_outcomes(&report.swept, &mut out);
    }

    let failed = report.failures().count();
    let summary = format!(
        "{} created, {} mounted, {} verified, {} removed, {} failed",
        report.count(Action::Created),
        report.count(Action::Mounted),
        report.count(Action::Verified),
        report.count(Action::Removed),
        failed
    );
    let summary = if failed > 0 {
        summary.red()
    } else if report.is_clean() {
        summary.green()
    } else {
        summary.yellow()
    };
    out.push_str(&format!("{}\n", summary));
    out
}

pub fn render_plan(plan: &Plan) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} {} (padding {})\n",
        "Plan for".bold(),
        plan.today,
        plan.padding
    ));

    out.push_str(&format!(
        "\n{} ({})\n",
        "Provision".bold(),
        plan.provision.len()
    ));
    for planned in &plan.provision {
        out.push_str(&format!(
            "  {:<8} {:<9} {}\n",
            planned.rotation.to_string().dimmed(),
            planned.volume_type.to_string().dimmed(),
            planned.instance
        ));
    }

    out.push_str(&format!(
        "\n{} ({})\n",
        "Sweep".bold(),
        plan.removal_candidates()
    ));
    for sweep in &plan.sweeps {
        out.push_str(&format!(
            "  {} {}\n",
            sweep.volume,
            format!("days [{}, {})", sweep.from_offset, sweep.to_offset).dimmed()
        ));
        for candidate in &sweep.candidates {
            out.push_str(&format!("    {}\n", candidate.name.yellow()));
        }
    }
    out
}

pub fn render_volume_set(specs: &VolumeSet) -> String {
    let mut out = String::new();
    for spec in specs.iter() {
        let retention = if spec.expires() {
            format!("{}d", spec.retention)
        } else {
            "forever".to_string()
        };
        out.push_str(&format!(
            "  {:<8} {:<9} {} {} {}\n",
            spec.rotation.to_string(),
            spec.volume_type.to_string(),
            spec.name.bold(),
            spec.path,
            format!("retention={}", retention).dimmed()
        ));
    }
    out.push_str(&format!(
        "{}\n",
        format!("Configuration OK: {} volumes", specs.len()).green()
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use volumizer::model::VolumeInstance;

    fn outcome(name: &str, action: Action) -> InstanceOutcome {
        InstanceOutcome::new(
            VolumeInstance {
                name: name.to_string(),
                path: format!("/{}", name),
            },
            action,
        )
    }

    #[test]
    fn report_lists_changes_and_hides_quiet_outcomes() {
        let report = PassReport {
            reconciled: vec![
                outcome("logs.2024.06.10", Action::Created),
                outcome("home", Action::Verified),
            ],
            swept: vec![outcome("logs.2024.06.01", Action::Removed)],
        };

        let out = render_report(&report);

        assert!(out.contains("logs.2024.06.10"));
        assert!(out.contains("logs.2024.06.01"));
        assert!(!out.contains("home (/home)"));
        assert!(out.contains("1 created"));
        assert!(out.contains("1 verified"));
        assert!(out.contains("1 removed"));
    }

    #[test]
    fn failure_messages_are_shown() {
        let report = PassReport {
            reconciled: vec![outcome("logs.scratch", Action::Failed)
                .with_message(CmdMessage::error("status check failed: timeout"))],
            swept: Vec::new(),
        };

        let out = render_report(&report);

        assert!(out.contains("status check failed: timeout"));
        assert!(out.contains("1 failed"));
    }
}
