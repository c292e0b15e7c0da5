//! Status-grouped task listing shared by `list` and sweep reports.

use super::status::TaskStatus;
use super::task::Task;

const INDENT: &str = "   ";

/// Renders tasks grouped under status section headers.
///
/// Without a filter, all three sections are printed in workflow order. With a
/// filter, only that section is printed. Empty sections say so explicitly.
pub fn render_sections(tasks: &[Task], filter: Option<TaskStatus>) -> String {
    let sections: Vec<TaskStatus> = match filter {
        Some(status) => vec![status],
        None => TaskStatus::ALL.to_vec(),
    };

    let mut out = String::new();
    for status in sections {
        out.push_str(&format!("-- {}:\n", status.label()));
        let mut found = false;
        for task in tasks.iter().filter(|task| task.status() == status) {
            for line in task.to_string().lines() {
                out.push_str(INDENT);
                out.push_str(line);
                out.push('\n');
            }
            out.push('\n');
            found = true;
        }
        if !found {
            out.push_str(INDENT);
            out.push_str("No tasks found.\n\n");
        }
    }
    out
}
