use colored::Colorize;

use crate::core::{format_mmss, format_seconds};
use crate::features::breathing::{
    Preset, SessionRecord, StopOutcome, StoredSession, Timeline, BREATHING_TIPS,
};

/// Format the preset list as a pretty table
pub fn format_presets_pretty(presets: &[Preset], default_id: &str) -> String {
    if presets.is_empty() {
        return "Presets (0)\n  No presets".to_string();
    }

    let mut output = format!("Presets ({})\n", presets.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for preset in presets {
        let marker = if preset.id == default_id {
            "*".green().to_string()
        } else {
            " ".to_string()
        };

        output.push_str(&format!(
            "{} {:<18} {:<10} {}\n",
            marker,
            preset.id.bold(),
            preset.pattern().cyan(),
            preset.title
        ));
        if !preset.description.is_empty() {
            output.push_str(&format!("    {}\n", preset.description.dimmed()));
        }
    }

    output.push_str(&format!("\n{} default preset", "*".green()));
    output
}

/// Format a single preset with its phases
pub fn format_preset_pretty(preset: &Preset) -> String {
    let mut output = format!("{}\n", preset.title.bold());
    output.push_str(&format!("  {}: {}\n", "ID".dimmed(), preset.id));
    if !preset.description.is_empty() {
        output.push_str(&format!("  {}: {}\n", "About".dimmed(), preset.description));
    }
    output.push_str(&format!("  {}: {}\n", "Pattern".dimmed(), preset.pattern()));
    output.push_str(&format!(
        "  {}: {}\n",
        "Cycle".dimmed(),
        format_seconds(preset.cycle_seconds())
    ));
    output.push_str(&format!("  {}:\n", "Phases".dimmed()));

    for (i, phase) in preset.phases.iter().enumerate() {
        output.push_str(&format!(
            "    {}. {:<8} {:>3}s  {}\n",
            i + 1,
            phase.name.yellow(),
            phase.duration_seconds,
            phase.instruction
        ));
    }

    output.push_str(&format!("\n{}\n", "Breathing Tips".bold()));
    for (i, tip) in BREATHING_TIPS.iter().enumerate() {
        output.push_str(&format!("  {}. {}\n", i + 1, tip));
    }

    output
}

/// Format recorded sessions, most recent first
pub fn format_history_pretty(sessions: &[StoredSession]) -> String {
    if sessions.is_empty() {
        return "No breathing sessions recorded.\n\nStart one with: breathe start".to_string();
    }

    let mut output = Vec::new();
    output.push("Breathing Session History".bold().to_string());
    output.push("═".repeat(60));
    output.push(format!(
        "{:<17} {:>8}  {:<20} {}",
        "Started", "Length", "Preset", "Done"
    ));
    output.push("─".repeat(60));

    for session in sessions {
        let started = session
            .record
            .started_at
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M");
        let status = if session.record.completed {
            "✓".green().to_string()
        } else {
            "✗".red().to_string()
        };
        output.push(format!(
            "{:<17} {:>8}  {:<20} {}",
            started,
            format_mmss(session.record.duration_seconds),
            session.record.preset_id,
            status
        ));
    }

    let total: u64 = sessions.iter().map(|s| s.record.duration_seconds).sum();
    output.push("─".repeat(60));
    output.push(format!(
        "{} sessions, {}",
        sessions.len(),
        format_seconds(total)
    ));

    output.join("\n")
}

/// Format a dry-run timeline, one line per second
pub fn format_timeline_pretty(timeline: &Timeline) -> String {
    let mut output = Vec::new();
    output.push(format!(
        "{} ({}), {}s preview",
        timeline.title.bold(),
        timeline.preset_id,
        timeline.seconds
    ));
    output.push("─".repeat(50));

    let mut last_phase = None;
    for row in &timeline.rows {
        let changed = last_phase != Some(row.phase_index);
        last_phase = Some(row.phase_index);

        let phase = if changed {
            row.phase.yellow().bold().to_string()
        } else {
            row.phase.dimmed().to_string()
        };
        let instruction = if changed { row.instruction.as_str() } else { "" };

        output.push(format!(
            "{:>5}  {:<8} {:>3}  {}",
            format_mmss(row.second),
            phase,
            row.remaining_seconds,
            instruction
        ));
    }

    if let Some(summary) = &timeline.summary {
        output.push(String::new());
        output.push(format_record_summary(summary));
    }

    output.join("\n")
}

/// One line describing a finished session
pub fn format_record_summary(record: &SessionRecord) -> String {
    let state = if record.completed {
        "completed".green()
    } else {
        "stopped early".yellow()
    };
    format!(
        "{} {} after {}",
        record.preset_id.bold(),
        state,
        format_seconds(record.duration_seconds)
    )
}

/// Summary printed after an interactive session ends
pub fn format_stop_pretty(outcomes: &[StopOutcome]) -> String {
    if outcomes.is_empty() {
        return "No session recorded.".dimmed().to_string();
    }

    let mut output = Vec::new();
    for outcome in outcomes {
        output.push(format_record_summary(&outcome.record));
        if let Some(err) = &outcome.recorder_error {
            output.push(format!("  {} {}", "not saved:".red(), err));
        }
    }

    let saved = outcomes.iter().filter(|o| o.is_recorded()).count();
    if saved > 0 {
        output.push(String::new());
        output.push("See your progress with: breathe report".dimmed().to_string());
    }

    output.join("\n")
}
