//! Diff parsing and size reduction before prompting

/// Upper bound on diff characters sent to the model
pub const MAX_DIFF_CHARS: usize = 8000;

const SUMMARY_HEADER: &str = "\n--- FILES SUMMARIZED (diff too large) ---\n";

/// Estimated room needed per summarized file line
const CHARS_PER_SUMMARY: usize = 60;

/// A single file's section of a unified diff
#[derive(Debug)]
struct DiffSection {
    file_path: String,
    content: String,
    additions: usize,
    deletions: usize,
    is_binary: bool,
}

impl DiffSection {
    fn new(file_path: String) -> Self {
        Self {
            file_path,
            content: String::new(),
            additions: 0,
            deletions: 0,
            is_binary: false,
        }
    }

    fn summary_line(&self) -> String {
        if self.is_binary {
            format!("{} (binary file)\n", self.file_path)
        } else {
            format!(
                "{} (+{}/-{} lines)\n",
                self.file_path, self.additions, self.deletions
            )
        }
    }
}

/// Split a unified diff into per-file sections
fn parse_diff_sections(diff: &str) -> Vec<DiffSection> {
    let mut sections = Vec::new();
    let mut current: Option<DiffSection> = None;

    for line in diff.lines() {
        if let Some(header) = line.strip_prefix("diff --git ") {
            if let Some(done) = current.take() {
                sections.push(done);
            }
            // "a/path b/path" -> "path"; renames keep the new name
            let path = header.rsplit(" b/").next().unwrap_or(header);
            current = Some(DiffSection::new(path.to_string()));
        }

        let Some(section) = current.as_mut() else {
            continue;
        };

        if line.starts_with("Binary files") || line.contains("GIT binary patch") {
            section.is_binary = true;
        }
        if line.starts_with('+') && !line.starts_with("+++") {
            section.additions += 1;
        } else if line.starts_with('-') && !line.starts_with("---") {
            section.deletions += 1;
        }

        section.content.push_str(line);
        section.content.push('\n');
    }

    if let Some(done) = current {
        sections.push(done);
    }

    sections
}

/// Shrink a diff to `max_chars`, keeping whole files and summarizing the rest
pub fn smart_truncate_diff(diff: &str, max_chars: usize) -> String {
    if diff.len() <= max_chars {
        return diff.to_string();
    }

    let sections = parse_diff_sections(diff);
    if sections.is_empty() {
        return truncate_lines(diff, max_chars);
    }

    let mut result = String::new();
    let mut summarized: Vec<&DiffSection> = Vec::new();

    for (index, section) in sections.iter().enumerate() {
        let remaining = sections.len() - index + summarized.len();
        let reserved = SUMMARY_HEADER.len() + remaining * CHARS_PER_SUMMARY;
        let available = max_chars.saturating_sub(result.len() + reserved);

        if section.content.len() <= available {
            result.push_str(&section.content);
        } else {
            summarized.push(section);
        }
    }

    if !summarized.is_empty() {
        result.push_str(SUMMARY_HEADER);
        for section in summarized {
            result.push_str(&section.summary_line());
        }
    }

    result
}

/// Line-based truncation for text that is not a unified diff
fn truncate_lines(diff: &str, max_chars: usize) -> String {
    let mut result = String::with_capacity(max_chars);

    for line in diff.lines() {
        let separator = usize::from(!result.is_empty());
        if result.len() + separator + line.len() > max_chars {
            result.push_str("\n... (diff truncated)");
            break;
        }
        if separator == 1 {
            result.push('\n');
        }
        result.push_str(line);
    }

    result
}
