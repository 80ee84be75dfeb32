use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use nanorefine::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

/// Renders engine progress events on stderr with a single shared `indicatif` bar.
#[derive(Clone)]
pub struct CliProgressHandler {
    bar: Arc<Mutex<ProgressBar>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    /// A handler that tracks state without drawing anything.
    #[cfg(test)]
    pub fn hidden() -> Self {
        Self::with_draw_target(ProgressDrawTarget::hidden())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), target)
            .with_style(Self::spinner_style())
            .with_message("Waiting for input...");
        bar.finish_and_clear();

        Self {
            bar: Arc::new(Mutex::new(bar)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let bar = Arc::clone(&self.bar);
        Box::new(move |event: Progress| match bar.lock() {
            Ok(bar) => render(&bar, event),
            Err(_) => warn!("Progress bar mutex was poisoned. Cannot update progress."),
        })
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<16} {bar:40.green/white} {pos:>5}/{len:5} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .with_key(
                "eta",
                |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                    let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
                },
            )
            .progress_chars("=> ")
    }
}

/// Applies one engine event to the bar.
fn render(bar: &ProgressBar, event: Progress) {
    match event {
        Progress::PhaseStart { name } => {
            bar.reset();
            bar.set_length(0);
            bar.set_style(CliProgressHandler::spinner_style());
            bar.set_message(name);
            bar.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
        }
        Progress::PhaseFinish => {
            bar.disable_steady_tick();
            bar.finish_with_message("✓ Done");
        }
        Progress::TaskStart { total_steps } => {
            bar.disable_steady_tick();
            bar.reset();
            bar.set_style(CliProgressHandler::bar_style());
            bar.set_length(total_steps);
        }
        Progress::TaskIncrement => bar.inc(1),
        Progress::TaskFinish => {
            let total = bar.length().unwrap_or(0);
            bar.set_position(bar.position().max(total));
            bar.finish();
        }
        Progress::StageSummary {
            stage,
            input,
            output,
        } => bar.println(format!(
            "  {stage}: kept {output} of {input} ({} dropped)",
            input.saturating_sub(output)
        )),
        Progress::Message(text) if bar.is_finished() => bar.set_message(text),
        Progress::Message(text) => bar.println(format!("  {text}")),
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}
