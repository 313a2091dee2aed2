//! Renders the help screen of an [`OptionsCont`].

use std::io::{self, Write};

use crate::container::{OptionId, OptionsCont};

/// Layout of the help screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelpFormatter {
    /// Column limit for wrapped descriptions.
    pub max_width: usize,
    /// Spaces before each option's names.
    pub option_indent: usize,
    /// Spaces between the widest name cluster and the descriptions.
    pub divider: usize,
    /// Spaces before section titles.
    pub section_indent: usize,
}

impl Default for HelpFormatter {
    fn default() -> Self {
        Self {
            max_width: 80,
            option_indent: 2,
            divider: 2,
            section_indent: 1,
        }
    }
}

impl HelpFormatter {
    pub fn new(max_width: usize, option_indent: usize, divider: usize, section_indent: usize) -> Self {
        Self {
            max_width,
            option_indent,
            divider,
            section_indent,
        }
    }

    /// Renders head, options grouped by section, and tail.
    ///
    /// Descriptions are wrapped at spaces. A word longer than the available
    /// width is never split; it gets a line of its own and may overflow.
    pub fn render(&self, options: &OptionsCont) -> String {
        let clusters: Vec<String> = options
            .iter()
            .map(|(id, _)| name_cluster(options, id))
            .collect();
        let opt_max_width = clusters
            .iter()
            .map(|cluster| cluster.chars().count())
            .max()
            .unwrap_or(0);
        let desc_col = self.option_indent + opt_max_width + self.divider;
        let desc_width = self.max_width.saturating_sub(desc_col);

        let mut out = String::new();
        if let Some(head) = options.help_head() {
            out.push_str(head);
            out.push('\n');
        }
        let mut last_section: Option<&str> = None;
        for ((id, option), cluster) in options.iter().zip(&clusters) {
            if let Some(section) = options.section_of(id).filter(|s| !s.is_empty())
                && last_section != Some(section)
            {
                last_section = Some(section);
                push_spaces(&mut out, self.section_indent);
                out.push_str(section);
                out.push('\n');
            }
            push_spaces(&mut out, self.option_indent);
            out.push_str(cluster);
            let lines = option
                .description()
                .map(|description| wrap(description, desc_width))
                .unwrap_or_default();
            for (index, line) in lines.iter().enumerate() {
                if index == 0 {
                    push_spaces(&mut out, desc_col - self.option_indent - cluster.chars().count());
                } else {
                    out.push('\n');
                    push_spaces(&mut out, desc_col);
                }
                out.push_str(line);
            }
            out.push('\n');
        }
        if let Some(tail) = options.help_tail() {
            out.push_str(tail);
            out.push('\n');
        }
        out
    }

    pub fn write(&self, options: &OptionsCont, out: &mut impl Write) -> io::Result<()> {
        out.write_all(self.render(options).as_bytes())
    }
}

/// All names of an option, shortest first: `-x, --long`.
pub fn name_cluster(options: &OptionsCont, id: OptionId) -> String {
    options
        .synonyms_of(id)
        .iter()
        .map(|name| {
            if name.chars().count() == 1 {
                format!("-{name}")
            } else {
                format!("--{name}")
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Greedy word wrap; words are never split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
        } else if line.chars().count() + 1 + word.chars().count() <= width {
            line.push(' ');
            line.push_str(word);
        } else {
            lines.push(std::mem::take(&mut line));
            line.push_str(word);
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

fn push_spaces(out: &mut String, count: usize) {
    out.extend(std::iter::repeat_n(' ', count));
}
