use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use bubble_core::Millis;
use bubble_logging::{bubble_info, bubble_warn};
use bubble_runtime::{
    BubbleController, BubbleSettings, Clock, ManualClock, ManualTickScheduler, MonotonicClock,
    TextRenderer, ThreadTickScheduler,
};
use chrono::Local;

use crate::scenario::Scenario;

/// How often the real-time loop drains ticks.
const PUMP_INTERVAL: Duration = Duration::from_millis(20);

/// Real wall-clock replay, or an instant one on simulated time.
pub enum TimeMode {
    Real,
    Simulated,
}

enum Driver {
    Real,
    Simulated {
        clock: ManualClock,
        scheduler: ManualTickScheduler,
        interval: Millis,
        next_fire: Option<Millis>,
    },
}

pub struct Replay<'a> {
    controller: BubbleController,
    clock: Arc<dyn Clock>,
    driver: Driver,
    renderer: TextRenderer,
    recoveries: Arc<AtomicUsize>,
    out: &'a mut dyn Write,
}

impl<'a> Replay<'a> {
    pub fn new(settings: BubbleSettings, mode: TimeMode, out: &'a mut dyn Write) -> Self {
        let recoveries = Arc::new(AtomicUsize::new(0));
        let counter = recoveries.clone();
        let on_recover = move || {
            counter.fetch_add(1, Ordering::SeqCst);
        };

        let (clock, driver, controller): (Arc<dyn Clock>, Driver, BubbleController) = match mode {
            TimeMode::Real => {
                let clock: Arc<dyn Clock> = Arc::new(MonotonicClock::new());
                let controller = BubbleController::new(
                    settings,
                    clock.clone(),
                    Arc::new(ThreadTickScheduler),
                    on_recover,
                );
                (clock, Driver::Real, controller)
            }
            TimeMode::Simulated => {
                let manual = ManualClock::new(0);
                let scheduler = ManualTickScheduler::new();
                let interval = u64::try_from(settings.tick_interval.as_millis()).unwrap_or(u64::MAX);
                let clock: Arc<dyn Clock> = Arc::new(manual.clone());
                let controller = BubbleController::new(
                    settings,
                    clock.clone(),
                    Arc::new(scheduler.clone()),
                    on_recover,
                );
                let driver = Driver::Simulated {
                    clock: manual,
                    scheduler,
                    interval: interval.max(1),
                    next_fire: None,
                };
                (clock, driver, controller)
            }
        };

        Self {
            controller,
            clock,
            driver,
            renderer: TextRenderer::default(),
            recoveries,
            out,
        }
    }

    pub fn run(mut self, scenario: &Scenario) -> Result<()> {
        for (index, step) in scenario.steps.iter().enumerate() {
            self.wait(step.delay())?;

            let props = step.props(index)?;
            bubble_info!(
                "step {}: status={:?} content_len={} attachments={} is_last={}",
                index,
                props.status,
                props.content.len(),
                props.message.attached.len(),
                props.is_last
            );
            if let Err(err) = self.controller.set_props(props) {
                bubble_warn!("step {}: ticker unavailable: {}", index, err);
            }
            self.sync_ticker();
            self.flush_frame()?;

            if step.click_recover {
                self.click_recover()?;
            }
        }

        self.wait(Duration::from_millis(scenario.linger_ms))?;
        self.controller.dispose();
        let stamp = self.stamp();
        writeln!(self.out, "[{stamp}] disposed").context("write frame")?;
        Ok(())
    }

    fn click_recover(&mut self) -> Result<()> {
        let before = self.recoveries.load(Ordering::SeqCst);
        self.controller
            .click_recover()
            .context("recover click")?;
        let stamp = self.stamp();
        if self.recoveries.load(Ordering::SeqCst) > before {
            writeln!(self.out, "[{stamp}] host: resume session requested").context("write frame")?;
        } else {
            writeln!(self.out, "[{stamp}] recover click ignored").context("write frame")?;
        }
        Ok(())
    }

    /// Lets `delay` pass, rendering every tick that lands inside it.
    fn wait(&mut self, delay: Duration) -> Result<()> {
        match self.driver {
            Driver::Real => self.wait_real(delay),
            Driver::Simulated { .. } => self.wait_simulated(delay),
        }
    }

    fn wait_real(&mut self, delay: Duration) -> Result<()> {
        let deadline = Instant::now() + delay;
        loop {
            self.controller.pump().context("apply ticks")?;
            self.flush_frame()?;
            let now = Instant::now();
            if now >= deadline {
                return Ok(());
            }
            thread::sleep(PUMP_INTERVAL.min(deadline - now));
        }
    }

    fn wait_simulated(&mut self, delay: Duration) -> Result<()> {
        let delay = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        let target = self.clock.now_ms().saturating_add(delay);
        while let Some(at) = self.next_simulated_tick(target) {
            if let Driver::Simulated {
                clock,
                scheduler,
                interval,
                next_fire,
            } = &mut self.driver
            {
                clock.set(at);
                scheduler.fire_all();
                *next_fire = Some(at + *interval);
            }
            self.controller.pump().context("apply ticks")?;
            self.flush_frame()?;
        }
        if let Driver::Simulated { clock, .. } = &self.driver {
            clock.set(target);
        }
        Ok(())
    }

    fn next_simulated_tick(&self, target: Millis) -> Option<Millis> {
        match &self.driver {
            Driver::Simulated {
                next_fire: Some(at),
                ..
            } if *at <= target && self.controller.live_episode().is_some() => Some(*at),
            _ => None,
        }
    }

    /// Aligns simulated tick times with the controller's live episode.
    fn sync_ticker(&mut self) {
        let live = self.controller.live_episode().is_some();
        let now = self.clock.now_ms();
        if let Driver::Simulated {
            interval, next_fire, ..
        } = &mut self.driver
        {
            match (live, *next_fire) {
                (true, None) => *next_fire = Some(now + *interval),
                (false, Some(_)) => *next_fire = None,
                _ => {}
            }
        }
    }

    fn flush_frame(&mut self) -> Result<()> {
        if !self.controller.take_dirty() {
            return Ok(());
        }
        let view = self.controller.view();
        let stamp = self.stamp();
        writeln!(self.out, "[{stamp}] mode={:?}", view.mode).context("write frame")?;
        for line in self.renderer.render(&view) {
            writeln!(self.out, "  {line}").context("write frame")?;
        }
        Ok(())
    }

    fn stamp(&self) -> String {
        match self.driver {
            Driver::Real => Local::now().format("%H:%M:%S%.3f").to_string(),
            Driver::Simulated { .. } => format!("+{}ms", self.clock.now_ms()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::time::Duration;

    use bubble_runtime::BubbleSettings;

    use super::{Replay, TimeMode};
    use crate::scenario::parse_scenario;

    fn simulate(text: &str) -> String {
        let scenario = parse_scenario(text, Path::new("test.ron")).unwrap();
        let settings = BubbleSettings {
            tick_interval: Duration::from_millis(scenario.tick_interval_ms.unwrap_or(1_000)),
        };
        let mut out = Vec::new();
        Replay::new(settings, TimeMode::Simulated, &mut out)
            .run(&scenario)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn simulated_replay_counts_seconds_then_renders_answer() {
        let output = simulate(
            r#"(steps: [
                (status: Some("RUNNING")),
                (after_ms: 2500, status: Some("FINISHED"), content: "**Hello**"),
            ])"#,
        );
        let expected = "\
[+0ms] mode=Running
  [working]
[+1000ms] mode=Running
  [working] 00:01
[+2000ms] mode=Running
  [working] 00:02
[+2500ms] mode=Done
  **Hello**
[+2500ms] disposed
";
        assert_eq!(output, expected);
    }

    #[test]
    fn simulated_replay_reports_recovery() {
        let output = simulate(
            r#"(steps: [
                (status: Some("RUNNING")),
                (after_ms: 400, status: Some("STOPPED"), click_recover: true),
            ])"#,
        );
        assert!(output.contains("[+400ms] mode=Neutral\n  [recover session]\n"));
        assert!(output.contains("[+400ms] host: resume session requested\n"));
    }

    #[test]
    fn recover_click_on_earlier_message_is_ignored() {
        let output = simulate(
            r#"(steps: [(status: Some("STOPPED"), is_last: false, click_recover: true)])"#,
        );
        assert!(output.contains("recover click ignored"));
    }
}
