//! Terminal frontend built on dialoguer.

use std::io;
use std::path::Path;

use arcpick::{ArchiveFormat, Error, Prompt, Result, SelectionSource, validate_archive_name};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, MultiSelect, Select};

/// Rows shown at once in the checkbox list.
const PAGE_SIZE: usize = 10;

/// Interactive prompts on the controlling terminal.
#[derive(Default)]
pub struct TerminalPrompt {
    theme: ColorfulTheme,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self::default()
    }
}

fn prompt_error(error: dialoguer::Error) -> Error {
    match error {
        dialoguer::Error::IO(e) if e.kind() == io::ErrorKind::Interrupted => Error::Io(e),
        other => Error::Prompt(other.to_string()),
    }
}

impl Prompt for TerminalPrompt {
    fn archive_name(&mut self) -> Result<String> {
        Input::<String>::with_theme(&self.theme)
            .with_prompt("Archive name (without extension)")
            .validate_with(|input: &String| -> std::result::Result<(), String> {
                validate_archive_name(input)
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            })
            .interact_text()
            .map_err(prompt_error)
    }

    fn select(&mut self, source: &SelectionSource<'_>) -> Result<Vec<String>> {
        if source.candidates().is_empty() {
            eprintln!("Nothing to select here.");
            return Ok(Vec::new());
        }

        let mut chosen: Vec<String> = Vec::new();
        loop {
            let query: String = Input::with_theme(&self.theme)
                .with_prompt("Search (empty lists everything)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_error)?;

            let matches = source.filter(Some(query.trim()));
            if matches.is_empty() {
                eprintln!("No matches for {:?}", query.trim());
            } else {
                let defaults: Vec<bool> = matches
                    .iter()
                    .map(|m| chosen.iter().any(|c| c == m))
                    .collect();
                let picked = MultiSelect::with_theme(&self.theme)
                    .with_prompt(format!("Select items ({} chosen so far)", chosen.len()))
                    .items(&matches)
                    .defaults(&defaults)
                    .max_length(PAGE_SIZE)
                    .interact()
                    .map_err(prompt_error)?;
                merge_picks(&mut chosen, &matches, &defaults, &picked);
            }

            let again = Confirm::with_theme(&self.theme)
                .with_prompt(format!("{} item(s) chosen. Search again?", chosen.len()))
                .default(false)
                .interact()
                .map_err(prompt_error)?;
            if !again {
                return Ok(chosen);
            }
        }
    }

    fn archive_format(&mut self) -> Result<ArchiveFormat> {
        let labels: Vec<String> = ArchiveFormat::ALL.iter().map(|f| f.to_string()).collect();
        let index = Select::with_theme(&self.theme)
            .with_prompt("Archive format")
            .items(&labels)
            .default(0)
            .interact()
            .map_err(prompt_error)?;
        ArchiveFormat::ALL
            .get(index)
            .copied()
            .ok_or_else(|| Error::Prompt(format!("no format at index {index}")))
    }

    fn confirm_overwrite(&mut self, path: &Path) -> Result<bool> {
        Confirm::with_theme(&self.theme)
            .with_prompt(format!("{} already exists. Overwrite?", path.display()))
            .default(false)
            .interact()
            .map_err(prompt_error)
    }
}

/// Applies one round of checkbox changes to `chosen`, keeping pick order:
/// unticked items are removed, newly ticked ones appended.
fn merge_picks(chosen: &mut Vec<String>, shown: &[&str], was_ticked: &[bool], ticked: &[usize]) {
    for (index, item) in shown.iter().enumerate() {
        let before = was_ticked.get(index).copied().unwrap_or(false);
        let after = ticked.contains(&index);
        if before && !after {
            chosen.retain(|c| c != item);
        } else if !before && after {
            chosen.push(item.to_string());
        }
    }
}
