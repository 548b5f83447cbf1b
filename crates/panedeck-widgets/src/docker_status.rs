//! `docker_status` widget
//!
//! One gauge per configured container, fed by `docker stats --no-stream`
//! once a second.

use panedeck_core::config::{ContainerEntry, ContainerMetric};
use panedeck_core::{
    InitContext, InitFuture, InitOutcome, Widget, WidgetError, WidgetKind, WidgetView,
};
use parking_lot::Mutex;
use ratatui::prelude::*;
use ratatui::widgets::{Gauge, Paragraph};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Interval between two `docker stats` runs.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(1);

const STATS_FORMAT: &str = "{{.ID}}\t{{.Name}}\t{{.CPUPerc}}\t{{.MemPerc}}";

/// Usage of one running container
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Usage {
    pub cpu: f64,
    pub memory: f64,
}

/// Parses `docker stats` output in [`STATS_FORMAT`], keyed by both id and
/// name.
///
/// ```
/// use panedeck_widgets::docker_status::parse_stats;
///
/// let stats = parse_stats("3f2a1b\tweb\t12.50%\t3.25%\n");
/// assert_eq!(stats["web"].cpu, 12.5);
/// assert_eq!(stats["3f2a1b"].memory, 3.25);
/// ```
#[must_use]
pub fn parse_stats(output: &str) -> HashMap<String, Usage> {
    let mut stats = HashMap::new();
    for line in output.lines() {
        let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
        let [id, name, cpu, memory] = fields.as_slice() else {
            continue;
        };
        let (Some(cpu), Some(memory)) = (parse_percent(cpu), parse_percent(memory)) else {
            continue;
        };
        let usage = Usage { cpu, memory };
        stats.insert((*id).to_string(), usage);
        stats.insert((*name).to_string(), usage);
    }
    stats
}

fn parse_percent(raw: &str) -> Option<f64> {
    raw.trim_end_matches('%').trim().parse().ok()
}

/// What a gauge currently shows
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    Fetching,
    Percent(f64),
    NotRunning,
}

#[derive(Debug, Clone)]
struct GaugeModel {
    label: String,
    container: String,
    metric: ContainerMetric,
    reading: Reading,
}

impl GaugeModel {
    fn new(entry: &ContainerEntry) -> Result<Self, WidgetError> {
        let metric: ContainerMetric = entry.metrics.parse().map_err(|bad| {
            WidgetError::Invalid(format!("{bad} is not available for docker_status"))
        })?;
        let metric_name = match metric {
            ContainerMetric::Cpu => "CPU Usage",
            ContainerMetric::Memory => "Memory Usage",
        };
        Ok(GaugeModel {
            label: format!("{} ({}) - {}", entry.name, entry.container, metric_name),
            container: entry.container.clone(),
            metric,
            reading: Reading::Fetching,
        })
    }

    fn update(&mut self, stats: &HashMap<String, Usage>) {
        self.reading = match stats.get(&self.container) {
            Some(usage) => Reading::Percent(match self.metric {
                ContainerMetric::Cpu => usage.cpu,
                ContainerMetric::Memory => usage.memory,
            }),
            None => Reading::NotRunning,
        };
    }
}

async fn run_stats(program: &str) -> Result<String, WidgetError> {
    let output = Command::new(program)
        .args(["stats", "--no-stream", "--format", STATS_FORMAT])
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|err| match err.kind() {
            ErrorKind::NotFound => WidgetError::Unavailable(format!("{program} CLI")),
            _ => WidgetError::Io(err),
        })?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(WidgetError::Unavailable(format!(
            "{program} ({})",
            stderr.trim()
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

async fn poll(
    program: String,
    gauges: Arc<Mutex<Vec<GaugeModel>>>,
    ctx: InitContext,
) -> Result<(), WidgetError> {
    let first = run_stats(&program).await?;
    apply(&gauges, &first);
    ctx.signal_ready();
    loop {
        tokio::time::sleep(REFRESH_INTERVAL).await;
        match run_stats(&program).await {
            Ok(output) => apply(&gauges, &output),
            Err(err) => debug!(%err, "docker stats failed"),
        }
    }
}

fn apply(gauges: &Mutex<Vec<GaugeModel>>, output: &str) {
    let stats = parse_stats(output);
    for gauge in gauges.lock().iter_mut() {
        gauge.update(&stats);
    }
}

/// Container resource gauges
pub struct DockerStatusWidget {
    entries: Vec<ContainerEntry>,
    gauges: Arc<Mutex<Vec<GaugeModel>>>,
    program: String,
}

impl DockerStatusWidget {
    pub fn new(entries: Vec<ContainerEntry>) -> Self {
        DockerStatusWidget {
            entries,
            gauges: Arc::new(Mutex::new(Vec::new())),
            program: "docker".to_string(),
        }
    }

    /// Uses `program` instead of `docker`, for CLI-compatible tools.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Current reading of every gauge, in configuration order.
    pub fn readings(&self) -> Vec<Reading> {
        self.gauges.lock().iter().map(|g| g.reading).collect()
    }
}

impl Widget for DockerStatusWidget {
    fn kind(&self) -> WidgetKind {
        WidgetKind::DockerStatus
    }

    fn init(&mut self, ctx: InitContext) -> InitOutcome {
        let gauges = match self
            .entries
            .iter()
            .map(GaugeModel::new)
            .collect::<Result<Vec<_>, _>>()
        {
            Ok(gauges) => gauges,
            Err(err) => return InitOutcome::Failed(err),
        };
        *self.gauges.lock() = gauges;
        let task: InitFuture = Box::pin(poll(self.program.clone(), Arc::clone(&self.gauges), ctx));
        InitOutcome::Deferred(task)
    }

    fn render(&self, frame: &mut Frame, area: Rect, view: &WidgetView<'_>) {
        let theme = view.theme;
        let gauges = self.gauges.lock();
        let mut constraints = vec![Constraint::Length(2); gauges.len()];
        constraints.push(Constraint::Min(0));
        let slots = Layout::vertical(constraints).split(area);

        for (gauge, slot) in gauges.iter().zip(slots.iter()) {
            let [title, bar] =
                Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(*slot);
            frame.render_widget(Paragraph::new(gauge.label.as_str()).style(theme.text()), title);

            let color = match gauge.metric {
                ContainerMetric::Cpu => theme.colors.success,
                ContainerMetric::Memory => theme.colors.error,
            };
            let (ratio, label) = match gauge.reading {
                Reading::Fetching => (0.0, "fetching...".to_string()),
                Reading::Percent(value) => ((value / 100.0).clamp(0.0, 1.0), format!("{value:.2}%")),
                Reading::NotRunning => (0.0, format!("'{}' is not running", gauge.container)),
            };
            let widget = Gauge::default()
                .gauge_style(Style::default().fg(color).bg(theme.colors.selection))
                .ratio(ratio)
                .label(label);
            frame.render_widget(widget, bar);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panedeck_core::{MessageBus, WidgetStatus};

    fn container(name: &str, container: &str, metrics: &str) -> ContainerEntry {
        ContainerEntry {
            name: name.into(),
            container: container.into(),
            metrics: metrics.into(),
        }
    }

    #[test]
    fn test_parse_stats_skips_malformed_lines() {
        let stats = parse_stats("abc\tdb\t0.50%\t10.00%\ngarbage\nid\tweb\t--\t1%\n");
        assert_eq!(stats.len(), 2);
        assert_eq!(stats["db"], Usage { cpu: 0.5, memory: 10.0 });
        assert!(!stats.contains_key("web"));
    }

    #[test]
    fn test_gauges_follow_stats() {
        let gauges = Mutex::new(vec![
            GaugeModel::new(&container("API", "api", "cpu")).unwrap(),
            GaugeModel::new(&container("DB", "db", "memory")).unwrap(),
        ]);
        apply(&gauges, "1\tapi\t7.00%\t1.00%\n");
        let readings: Vec<Reading> = gauges.lock().iter().map(|g| g.reading).collect();
        assert_eq!(readings, vec![Reading::Percent(7.0), Reading::NotRunning]);
    }

    #[test]
    fn test_gauge_label() {
        let gauge = GaugeModel::new(&container("API", "api", "memory")).unwrap();
        assert_eq!(gauge.label, "API (api) - Memory Usage");
        assert_eq!(gauge.reading, Reading::Fetching);
    }

    #[test]
    fn test_unknown_metric_fails_init() {
        let mut widget = DockerStatusWidget::new(vec![container("x", "x", "disk")]);
        let ctx = InitContext::new(0, WidgetStatus::new(), MessageBus::default());
        assert!(matches!(
            widget.init(ctx),
            InitOutcome::Failed(WidgetError::Invalid(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_cli_disables_widget() {
        let mut widget = DockerStatusWidget::new(vec![container("x", "x", "cpu")])
            .with_program("panedeck-no-such-docker");
        let ctx = InitContext::new(0, WidgetStatus::new(), MessageBus::default());
        let InitOutcome::Deferred(task) = widget.init(ctx) else {
            panic!("docker_status initializes on the runtime");
        };
        assert!(matches!(task.await, Err(WidgetError::Unavailable(_))));
        assert_eq!(widget.readings(), vec![Reading::Fetching]);
    }
}
