//! Observer pattern for the training loop
//!
//! Observers allow composable progress reporting during training without
//! coupling the training loop to specific output formats.

use indicatif::{ProgressBar, ProgressStyle};

use crate::error::Result;

/// Training observer - receives episode-level progress events
///
/// All hooks default to no-ops, so implementations only override what they
/// need.
pub trait Observer {
    /// Called once before the first episode
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called after each episode with its 0-based index and step count
    fn on_episode_end(&mut self, _episode: usize, _steps: usize) -> Result<()> {
        Ok(())
    }

    /// Called once after the last episode
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Prints one line per completed episode
pub struct EpisodeLogObserver;

impl Observer for EpisodeLogObserver {
    fn on_episode_end(&mut self, episode: usize, steps: usize) -> Result<()> {
        println!("Episode {}: reached goal in {} steps.", episode + 1, steps);
        Ok(())
    }
}

/// Progress bar observer - shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self { progress_bar: None }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, steps: usize) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.set_position((episode + 1) as u64);
            pb.set_message(format!("last: {steps} steps"));
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message("done");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_hooks_are_no_ops() {
        struct Silent;
        impl Observer for Silent {}

        let mut observer = Silent;
        observer.on_training_start(10).unwrap();
        observer.on_episode_end(0, 5).unwrap();
        observer.on_training_end().unwrap();
    }
}
