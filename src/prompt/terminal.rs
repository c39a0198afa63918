//! Interactive terminal prompt

use dialoguer::{theme::ColorfulTheme, Select};

use super::{RolloverChoice, RolloverPrompt};
use crate::error::{RolloverError, RolloverResult};
use crate::services::detector::{MarkerState, RolloverCheck};
use crate::services::period::format_period_range;

const CHOICES: [(&str, RolloverChoice); 2] = [
    ("Archive previous period", RolloverChoice::Archive),
    ("Continue with current data", RolloverChoice::Continue),
];

/// `RolloverPrompt` backed by a dialoguer selection list
pub struct TerminalPrompt {
    theme: ColorfulTheme,
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl RolloverPrompt for TerminalPrompt {
    fn choose(&mut self, check: &RolloverCheck) -> RolloverResult<Option<RolloverChoice>> {
        println!(
            "A new budget period has started: {}",
            format_period_range(&check.current_period)
        );
        if let MarkerState::Stale(previous) = &check.marker {
            println!("Last acknowledged period: {}", previous);
        }
        println!("  Press Esc to decide later.");

        let labels: Vec<&str> = CHOICES.iter().map(|(label, _)| *label).collect();
        let selection = Select::with_theme(&self.theme)
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact_opt()
            .map_err(|e| RolloverError::Io(format!("Prompt failed: {}", e)))?;

        Ok(selection.and_then(|index| CHOICES.get(index).map(|(_, choice)| *choice)))
    }

    fn close(&mut self) {
        println!();
    }
}
