//! Line-oriented console driving the dashboard

use std::io::Write;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use egui::{pos2, Pos2};
use pw_core::{Command, GestureEvent, PresentationSink, Readout, ViewAdapter, ViewId};

use crate::dashboard::Dashboard;

/// Intermediate pointer positions sent between the start and end of a brush
const BRUSH_STEPS: usize = 4;

pub const HELP: &str = "\
commands:
  views                       list views and their names
  brush <view> x0 y0 x1 y1    drag a brush in plot-area pixels
  click <view> x y            click without dragging
  cancel <view>               abort the gesture in progress
  clear                       reset the selection
  toggle                      switch the lap chart between time and position
  focus <driver>              focus the lap chart on one driver
  next | prev                 step the driver focus
  status                      print the current readout
  help                        show this text
  quit                        exit";

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Views,
    Brush { view: String, from: Pos2, to: Pos2 },
    Click { view: String, at: Pos2 },
    Cancel { view: String },
    Clear,
    Toggle,
    Focus(String),
    Next,
    Prev,
    Status,
    Help,
    Quit,
}

fn coordinate(token: Option<&str>) -> Result<f32> {
    let token = token.ok_or_else(|| anyhow!("missing coordinate"))?;
    token
        .parse::<f32>()
        .with_context(|| format!("'{token}' is not a number"))
}

fn view_name(token: Option<&str>) -> Result<String> {
    token
        .map(str::to_string)
        .ok_or_else(|| anyhow!("missing view name"))
}

impl FromStr for ConsoleCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            bail!("empty command");
        };

        let command = match keyword.to_ascii_lowercase().as_str() {
            "views" => ConsoleCommand::Views,
            "brush" => {
                let view = view_name(tokens.next())?;
                let from = pos2(coordinate(tokens.next())?, coordinate(tokens.next())?);
                let to = pos2(coordinate(tokens.next())?, coordinate(tokens.next())?);
                ConsoleCommand::Brush { view, from, to }
            }
            "click" => {
                let view = view_name(tokens.next())?;
                let at = pos2(coordinate(tokens.next())?, coordinate(tokens.next())?);
                ConsoleCommand::Click { view, at }
            }
            "cancel" => ConsoleCommand::Cancel {
                view: view_name(tokens.next())?,
            },
            "clear" => ConsoleCommand::Clear,
            "toggle" => ConsoleCommand::Toggle,
            "focus" => {
                let value = tokens.next().ok_or_else(|| anyhow!("missing focus value"))?;
                ConsoleCommand::Focus(value.to_string())
            }
            "next" => ConsoleCommand::Next,
            "prev" | "previous" => ConsoleCommand::Prev,
            "status" => ConsoleCommand::Status,
            "help" | "?" => ConsoleCommand::Help,
            "quit" | "exit" => ConsoleCommand::Quit,
            other => bail!("unknown command '{other}', try 'help'"),
        };

        if let Some(extra) = tokens.next() {
            bail!("unexpected argument '{extra}'");
        }
        Ok(command)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Console {
    dashboard: Dashboard,
}

impl Console {
    pub fn new(dashboard: Dashboard) -> Self {
        Self { dashboard }
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn execute(&mut self, command: ConsoleCommand, out: &mut impl Write) -> Result<Flow> {
        match command {
            ConsoleCommand::Views => {
                for view in self.dashboard.views() {
                    let adapter = self
                        .dashboard
                        .coordinator()
                        .view_adapter(view.id)
                        .ok_or_else(|| anyhow!("view '{}' is gone", view.name))?;
                    writeln!(out, "{:<13} {} ({})", view.name, adapter.display_name(), adapter.view_type())?;
                }
            }
            ConsoleCommand::Brush { view, from, to } => {
                let id = self.resolve(&view)?;
                let mut events = vec![GestureEvent::Start(from)];
                events.extend((1..=BRUSH_STEPS).map(|step| {
                    let t = step as f32 / BRUSH_STEPS as f32;
                    GestureEvent::Move(from + (to - from) * t)
                }));
                events.push(GestureEvent::End(to));
                self.drive(id, &events, out)?;
            }
            ConsoleCommand::Click { view, at } => {
                let id = self.resolve(&view)?;
                self.drive(id, &[GestureEvent::Start(at), GestureEvent::End(at)], out)?;
            }
            ConsoleCommand::Cancel { view } => {
                let id = self.resolve(&view)?;
                self.drive(id, &[GestureEvent::Cancel], out)?;
            }
            ConsoleCommand::Clear => self.dispatch(Command::ClearSelection)?,
            ConsoleCommand::Toggle => {
                let view = self.dashboard.lap_view();
                self.dispatch(Command::ToggleDisplayMode { view })?;
                if let Some(laps) = self.dashboard.lap_time_view() {
                    writeln!(out, "lap chart mode: {:?}", laps.mode())?;
                }
            }
            ConsoleCommand::Focus(value) => {
                let view = self.dashboard.lap_view();
                self.dispatch(Command::SetDrillFocus { view, value })?;
                self.print_focus(out)?;
            }
            ConsoleCommand::Next => self.step(true, out)?,
            ConsoleCommand::Prev => self.step(false, out)?,
            ConsoleCommand::Status => {
                write!(out, "{}", format_readout(self.dashboard.coordinator().readout()))?;
                self.print_focus(out)?;
            }
            ConsoleCommand::Help => writeln!(out, "{HELP}")?,
            ConsoleCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn resolve(&self, name: &str) -> Result<ViewId> {
        self.dashboard
            .view_id(name)
            .ok_or_else(|| anyhow!("unknown view '{name}', try 'views'"))
    }

    fn dispatch(&mut self, command: Command) -> Result<()> {
        self.dashboard.coordinator_mut().dispatch(command)?;
        Ok(())
    }

    fn step(&mut self, forward: bool, out: &mut impl Write) -> Result<()> {
        let view = self.dashboard.lap_view();
        self.dispatch(Command::StepDrillFocus { view, forward })?;
        self.print_focus(out)
    }

    fn drive(&mut self, id: ViewId, events: &[GestureEvent], out: &mut impl Write) -> Result<()> {
        let mut dispatched = false;
        for event in events {
            dispatched |= self.dashboard.coordinator_mut().handle_gesture(id, event)?;
        }
        if !dispatched {
            writeln!(out, "no selection change")?;
        }
        Ok(())
    }

    fn print_focus(&self, out: &mut impl Write) -> Result<()> {
        let Some(focus) = self.dashboard.lap_time_view().and_then(|v| v.drill_focus()) else {
            return Ok(());
        };
        let candidates = focus.candidates().join(", ");
        match focus.focus() {
            Some(driver) => writeln!(out, "focus: {driver} of [{candidates}]")?,
            None => writeln!(out, "focus: none of [{candidates}]")?,
        }
        Ok(())
    }
}

/// Render a readout as terminal text
pub fn format_readout(readout: &Readout) -> String {
    let mut text = String::new();
    let scope = if readout.everything { "all laps" } else { "brushed" };
    text.push_str(&format!("selected: {} ({scope})\n", readout.selected));

    for summary in &readout.summaries {
        text.push_str(&format!("  {:<14} {}\n", summary.field.label(), summary.aggregate));
    }

    match &readout.best {
        Some(best) => text.push_str(&format!(
            "best lap: {} lap {} ({:.3}s)\n",
            best.name, best.lap, best.value
        )),
        None => text.push_str("best lap: no data\n"),
    }

    // Suppressed slopes are left out entirely
    if let Some(degradation) = &readout.degradation {
        text.push_str(&format!(
            "degradation: {:+.1} {}\n",
            degradation.scaled_slope, degradation.unit
        ));
    }
    text
}

/// Sink that prints every readout to stdout
#[derive(Debug, Default)]
pub struct TerminalPanel;

impl PresentationSink for TerminalPanel {
    fn present(&mut self, readout: &Readout) {
        print!("{}", format_readout(readout));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::tests::dashboard;
    use pw_core::presentation::{Degradation, FieldSummary};
    use pw_core::{Aggregate, DisplayMode, FieldId, RegressionModel};

    fn console() -> (Console, pw_core::ReadoutLog) {
        let (dashboard, log) = dashboard();
        (Console::new(dashboard), log)
    }

    fn run(console: &mut Console, line: &str) -> Result<String> {
        let mut out = Vec::new();
        console.execute(line.parse()?, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            "brush laps 0 330 400 200".parse::<ConsoleCommand>().unwrap(),
            ConsoleCommand::Brush {
                view: "laps".to_string(),
                from: pos2(0.0, 330.0),
                to: pos2(400.0, 200.0),
            }
        );
        assert_eq!("PREV".parse::<ConsoleCommand>().unwrap(), ConsoleCommand::Prev);
        assert_eq!(
            "focus VER".parse::<ConsoleCommand>().unwrap(),
            ConsoleCommand::Focus("VER".to_string())
        );
        assert!("brush laps 0 1 2".parse::<ConsoleCommand>().is_err());
        assert!("click laps x 1".parse::<ConsoleCommand>().is_err());
        assert!("clear now".parse::<ConsoleCommand>().is_err());
        assert!("".parse::<ConsoleCommand>().is_err());
        assert!("launch".parse::<ConsoleCommand>().is_err());
    }

    #[test]
    fn test_brush_runs_one_cascade() {
        let (mut console, log) = console();
        run(&mut console, "brush laps 0 330 400 200").unwrap();

        let coordinator = console.dashboard().coordinator();
        assert_eq!(coordinator.cascade_count(), 1);
        // Initial readout plus one cascade; moves never reach the sinks
        assert_eq!(log.len(), 2);

        let readout = log.latest().unwrap();
        assert!(!readout.everything);
        assert_eq!(readout.selected, 3);

        let focus = console.dashboard().lap_time_view().unwrap().drill_focus().unwrap();
        assert_eq!(focus.focus(), Some("NOR"));
    }

    #[test]
    fn test_click_resets_selection() {
        let (mut console, log) = console();
        run(&mut console, "brush laps 0 330 400 200").unwrap();
        run(&mut console, "click cloud 5 5").unwrap();
        assert!(log.latest().unwrap().everything);
        assert!(log.latest().unwrap().degradation.is_none());
    }

    #[test]
    fn test_focus_stepping() {
        let (mut console, _) = console();
        run(&mut console, "brush laps 0 330 400 200").unwrap();

        let output = run(&mut console, "next").unwrap();
        assert!(output.contains("focus: VER"));
        assert!(run(&mut console, "next").is_err());
        assert!(run(&mut console, "focus LEC").is_err());
        assert!(run(&mut console, "prev").unwrap().contains("focus: NOR"));
    }

    #[test]
    fn test_toggle_and_unknown_view() {
        let (mut console, _) = console();
        let output = run(&mut console, "toggle").unwrap();
        assert!(output.contains("Rank"));
        assert_eq!(
            console.dashboard().lap_time_view().unwrap().mode(),
            DisplayMode::Rank
        );
        assert!(run(&mut console, "brush sectors 0 0 10 10").is_err());
        assert_eq!(
            run(&mut console, "quit").unwrap(),
            String::new()
        );
    }

    #[test]
    fn test_cancel_releases_brush() {
        let (mut console, log) = console();
        run(&mut console, "brush laps 0 330 400 200").unwrap();
        run(&mut console, "cancel laps").unwrap();
        assert_eq!(log.len(), 3);
        assert!(log.latest().unwrap().everything);
        assert_eq!(console.dashboard().lap_time_view().unwrap().drill_focus().unwrap().focus(), None);
    }

    #[test]
    fn test_half_finished_gesture_changes_nothing() {
        let (mut console, log) = console();
        let id = console.dashboard().view_id("strategy").unwrap();
        let dispatched = console
            .dashboard
            .coordinator_mut()
            .handle_gesture(id, &GestureEvent::Move(pos2(10.0, 10.0)))
            .unwrap();
        assert!(!dispatched);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_format_readout_shows_absence() {
        let readout = Readout {
            selected: 0,
            everything: false,
            summaries: vec![FieldSummary {
                field: FieldId::TrackTemp,
                aggregate: Aggregate::NoData,
            }],
            best: None,
            degradation: None,
        };
        let text = format_readout(&readout);
        assert!(text.contains("no data"));
        assert!(!text.contains("degradation"));

        let with_slope = Readout {
            degradation: Some(Degradation {
                model: RegressionModel {
                    slope: 0.0525,
                    intercept: 90.0,
                    count: 12,
                },
                scaled_slope: 52.5,
                unit: "ms/lap".to_string(),
            }),
            ..readout
        };
        assert!(format_readout(&with_slope).contains("degradation: +52.5 ms/lap"));
    }
}
