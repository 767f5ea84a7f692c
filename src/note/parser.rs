//! Checkbox line parsing and rewriting.
//!
//! Recognized task lines look like `- [ ] Title`, with `*` or `+` accepted as
//! bullets and `x`/`X` as checked marks. Two trailing annotations are understood
//! and kept out of the title:
//!
//! - `✅ 2024-03-02`: the completion date
//! - `<!-- todo-id:ID -->`: the remote task this line is linked to

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use super::LocalTask;
use crate::constants::{COMPLETION_MARKER, REMOTE_ID_PREFIX};
use crate::utils::datetime;

static TASK_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)([-*+]) \[([ xX])\](?:\s+(.*))?$").expect("task line pattern is valid"));

static COMPLETION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*✅\s*(\d{4}-\d{2}-\d{2})").expect("completion pattern is valid"));

static REMOTE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*<!--\s*todo-id:(\S+?)\s*-->").expect("remote id pattern is valid"));

/// Title as it reads back from a task line.
///
/// Control characters become spaces so the title stays on one line, and text
/// that would parse as a completion stamp or remote id is dropped.
pub fn clean_title(title: &str) -> String {
    let single_line: String = title
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    let title = REMOTE_ID.replace_all(&single_line, "");
    let title = COMPLETION.replace_all(&title, "");
    title.trim().to_string()
}

/// A task line broken into its parts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskLine {
    pub indent: String,
    pub bullet: char,
    pub completed: bool,
    pub title: String,
    pub completion_date: Option<NaiveDate>,
    pub remote_id: Option<String>,
}

impl TaskLine {
    /// An unchecked top-level task.
    pub fn new(title: &str, remote_id: Option<&str>) -> Self {
        Self {
            indent: String::new(),
            bullet: '-',
            completed: false,
            title: clean_title(title),
            completion_date: None,
            remote_id: remote_id.map(str::to_string),
        }
    }

    /// Parse a single line, returning `None` for anything that is not a checkbox.
    pub fn parse(line: &str) -> Option<Self> {
        let caps = TASK_LINE.captures(line)?;
        let body = caps.get(4).map(|m| m.as_str()).unwrap_or_default();

        let completion_date = COMPLETION
            .captures(body)
            .and_then(|c| datetime::parse_date(&c[1]).ok());
        let remote_id = REMOTE_ID.captures(body).map(|c| c[1].to_string());

        let title = REMOTE_ID.replace_all(body, "");
        let title = COMPLETION.replace_all(&title, "");

        Some(Self {
            indent: caps[1].to_string(),
            bullet: caps[2].chars().next().unwrap_or('-'),
            completed: &caps[3] != " ",
            title: title.trim().to_string(),
            completion_date,
            remote_id,
        })
    }

    /// Render the line in canonical form.
    pub fn compose(&self) -> String {
        let mut line = format!(
            "{}{} [{}] {}",
            self.indent,
            self.bullet,
            if self.completed { 'x' } else { ' ' },
            self.title
        );
        if let Some(date) = self.completion_date {
            line.push_str(&format!(" {} {}", COMPLETION_MARKER, datetime::format_ymd(date)));
        }
        if let Some(id) = &self.remote_id {
            line.push_str(&format!(" <!-- {}{} -->", REMOTE_ID_PREFIX, id));
        }
        line
    }
}

/// Parse every task line of a note.
pub fn parse_tasks(content: &str) -> Vec<LocalTask> {
    content
        .lines()
        .enumerate()
        .filter_map(|(i, line)| {
            TaskLine::parse(line).map(|task| LocalTask {
                title: task.title,
                completed: task.completed,
                line_index: i,
                completion_date: task.completion_date,
                remote_id: task.remote_id,
            })
        })
        .collect()
}

/// Level of a markdown ATX heading (`## Tasks` is 2), `None` for other lines.
pub fn heading_level(line: &str) -> Option<usize> {
    let trimmed = line.trim_start();
    let level = trimmed.chars().take_while(|c| *c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    match trimmed[level..].chars().next() {
        None | Some(' ') | Some('\t') => Some(level),
        _ => None,
    }
}

/// Index at which a new line belongs at the end of `section`.
///
/// The section runs until the next heading of the same or a higher level.
/// Trailing blank lines stay after the inserted line.
pub fn section_insert_index(lines: &[String], section: &str) -> Option<usize> {
    let section = section.trim();
    let start = lines.iter().position(|l| l.trim() == section)?;
    let level = heading_level(&lines[start]).unwrap_or(1);

    let mut end = lines[start + 1..]
        .iter()
        .position(|l| heading_level(l).is_some_and(|lvl| lvl <= level))
        .map(|offset| start + 1 + offset)
        .unwrap_or(lines.len());

    while end > start + 1 && lines[end - 1].trim().is_empty() {
        end -= 1;
    }
    Some(end)
}

/// Insert `line` at the end of `section`, appending the section if it is missing.
pub fn insert_into_section(lines: &mut Vec<String>, section: &str, line: String) {
    match section_insert_index(lines, section) {
        Some(index) => lines.insert(index, line),
        None => {
            if lines.last().is_some_and(|l| !l.trim().is_empty()) {
                lines.push(String::new());
            }
            lines.push(section.trim().to_string());
            lines.push(line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    #[test]
    fn test_parse_plain_task() {
        let task = TaskLine::parse("- [ ] Buy milk").unwrap();
        assert!(!task.completed);
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.completion_date, None);
        assert_eq!(task.remote_id, None);
    }

    #[test]
    fn test_parse_annotations() {
        let task = TaskLine::parse("  * [X] Task A ✅ 2024-03-02 <!-- todo-id:AAMk= -->").unwrap();
        assert!(task.completed);
        assert_eq!(task.indent, "  ");
        assert_eq!(task.bullet, '*');
        assert_eq!(task.title, "Task A");
        assert_eq!(task.completion_date, NaiveDate::from_ymd_opt(2024, 3, 2));
        assert_eq!(task.remote_id.as_deref(), Some("AAMk="));
    }

    #[test]
    fn test_non_task_lines() {
        assert!(TaskLine::parse("# 2024-03-02").is_none());
        assert!(TaskLine::parse("- plain bullet").is_none());
        assert!(TaskLine::parse("-[ ] missing space").is_none());
    }

    #[test]
    fn test_empty_title_is_still_a_task() {
        let task = TaskLine::parse("- [ ]").unwrap();
        assert_eq!(task.title, "");
    }

    #[test]
    fn test_compose_keeps_indent_and_bullet() {
        let mut task = TaskLine::parse("    + [ ] Nested <!-- todo-id:7 -->").unwrap();
        task.completed = true;
        task.completion_date = NaiveDate::from_ymd_opt(2024, 1, 1);
        assert_eq!(task.compose(), "    + [x] Nested ✅ 2024-01-01 <!-- todo-id:7 -->");
    }

    #[test]
    fn test_new_line_reads_back_its_title() {
        let task = TaskLine::new("Buy milk\r\nand eggs", Some("1"));
        let parsed = TaskLine::parse(&task.compose()).unwrap();
        assert_eq!(parsed.title, "Buy milk  and eggs");
        assert_eq!(parsed.remote_id.as_deref(), Some("1"));

        let task = TaskLine::new("Pay rent ✅ 2024-01-01 <!-- todo-id:x -->", None);
        assert_eq!(task.compose(), "- [ ] Pay rent");
    }

    #[test]
    fn test_heading_level() {
        assert_eq!(heading_level("## Tasks"), Some(2));
        assert_eq!(heading_level("#"), Some(1));
        assert_eq!(heading_level("#tag"), None);
        assert_eq!(heading_level("text"), None);
    }

    #[test]
    fn test_insert_after_last_task_in_section() {
        let mut note = lines("# Day\n\n## Tasks\n- [ ] One\n\n## Notes\nsome text");
        insert_into_section(&mut note, "## Tasks", "- [ ] Two".to_string());
        assert_eq!(
            note,
            lines("# Day\n\n## Tasks\n- [ ] One\n- [ ] Two\n\n## Notes\nsome text")
        );
    }

    #[test]
    fn test_subheadings_stay_in_section() {
        let mut note = lines("## Tasks\n### Work\n- [ ] One\n## Notes");
        insert_into_section(&mut note, "## Tasks", "- [ ] Two".to_string());
        assert_eq!(note, lines("## Tasks\n### Work\n- [ ] One\n- [ ] Two\n## Notes"));
    }

    #[test]
    fn test_missing_section_is_appended() {
        let mut note = lines("# Day\nJust notes");
        insert_into_section(&mut note, "## Tasks", "- [ ] One".to_string());
        assert_eq!(note, lines("# Day\nJust notes\n\n## Tasks\n- [ ] One"));
    }
}
