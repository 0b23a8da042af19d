//! Viewer application state and rendering.

use crate::error::Result;
use crate::format::truncate;
use crate::record::SpeakerRole;
use crate::repo::RunRepository;
use crate::state::{ScenarioFilter, ViewerState};
use crate::views::{run_list, selected_detail, RunDetail, RunSummary};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io::{self, Stdout};
use std::time::Duration;

/// Input poll interval. The dataset is static, so this only keeps the UI
/// responsive to resizes.
const TICK: Duration = Duration::from_millis(250);

/// Lines jumped per page scroll in the detail pane.
const DETAIL_PAGE: u16 = 10;

const LIST_SCENARIO_WIDTH: usize = 22;

pub struct ViewerApp {
    repo: RunRepository,
    state: ViewerState,
    /// Distinct scenario names, cached for filter cycling.
    scenarios: Vec<String>,
    /// Current list projection.
    visible: Vec<RunSummary>,
    /// Current detail projection.
    detail: Option<RunDetail>,
    /// Navigation cursor within `visible`. Independent of the selection.
    cursor: usize,
    detail_scroll: u16,
    should_quit: bool,
}

impl ViewerApp {
    pub fn new(repo: RunRepository) -> Self {
        let scenarios = repo.distinct_scenarios();
        let mut app = ViewerApp {
            repo,
            state: ViewerState::new(),
            scenarios,
            visible: Vec::new(),
            detail: None,
            cursor: 0,
            detail_scroll: 0,
            should_quit: false,
        };
        app.reproject();
        app
    }

    /// Recompute both projections from the current state. Called after
    /// every state change so the panes can never drift apart.
    fn reproject(&mut self) {
        self.visible = run_list(&self.repo, &self.state);
        self.detail = selected_detail(&self.repo, &self.state);
    }

    pub fn visible(&self) -> &[RunSummary] {
        &self.visible
    }

    pub fn detail(&self) -> Option<&RunDetail> {
        self.detail.as_ref()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// The scenario filter after the current one in cycling order:
    /// all -> first scenario -> ... -> last scenario -> all.
    fn next_scenario_filter(&self) -> ScenarioFilter {
        match &self.state.filter.scenario {
            ScenarioFilter::All => match self.scenarios.first() {
                Some(first) => ScenarioFilter::Scenario(first.clone()),
                None => ScenarioFilter::All,
            },
            ScenarioFilter::Scenario(current) => {
                match self.scenarios.iter().position(|s| s == current) {
                    Some(i) if i + 1 < self.scenarios.len() => {
                        ScenarioFilter::Scenario(self.scenarios[i + 1].clone())
                    }
                    _ => ScenarioFilter::All,
                }
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Up => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.cursor + 1 < self.visible.len() {
                    self.cursor += 1;
                }
            }
            KeyCode::Enter => {
                if let Some(summary) = self.visible.get(self.cursor) {
                    self.state.select_run(&self.repo, summary.id);
                    self.detail_scroll = 0;
                    self.reproject();
                }
            }
            KeyCode::Char('s') => {
                let next = self.next_scenario_filter();
                self.state.set_scenario_filter(&self.repo, next);
                self.cursor = 0;
                self.reproject();
            }
            KeyCode::Char('r') => {
                self.state.set_result_filter(self.state.filter.result.next());
                self.cursor = 0;
                self.reproject();
            }
            KeyCode::PageDown => {
                self.detail_scroll = self.detail_scroll.saturating_add(DETAIL_PAGE);
            }
            KeyCode::PageUp => {
                self.detail_scroll = self.detail_scroll.saturating_sub(DETAIL_PAGE);
            }
            _ => {}
        }
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    pub fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(frame.area());

        self.render_header(frame, chunks[0]);

        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(chunks[1]);

        self.render_run_list(frame, panes[0]);
        self.render_detail(frame, panes[1]);
        self.render_footer(frame, chunks[2]);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let stats = self.repo.aggregate_stats();
        let line = Line::from(vec![
            Span::styled(
                format!(" {} runs ", stats.total_runs),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("│ "),
            Span::styled(
                format!("{}% pass ", stats.pass_rate),
                Style::default().fg(Color::Green),
            ),
            Span::raw("│ "),
            Span::styled(
                format!("avg {} ", stats.avg_score_label()),
                Style::default().fg(Color::Cyan),
            ),
            Span::raw("│ scenario: "),
            Span::styled(
                self.state.filter.scenario.label().to_string(),
                Style::default().fg(Color::Yellow),
            ),
            Span::raw(" │ result: "),
            Span::styled(
                self.state.filter.result.name(),
                Style::default().fg(Color::Yellow),
            ),
        ]);
        let header = Paragraph::new(line).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" evalview ")
                .border_style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(header, area);
    }

    /// Window of the visible list that keeps the cursor on screen given
    /// `height` usable rows.
    fn list_window(&self, height: usize) -> (usize, usize) {
        if height == 0 || self.visible.is_empty() {
            return (0, 0);
        }
        let start = if self.cursor >= height {
            self.cursor + 1 - height
        } else {
            0
        };
        let end = (start + height).min(self.visible.len());
        (start, end)
    }

    fn summary_line(&self, summary: &RunSummary, at_cursor: bool) -> Line<'static> {
        let marker = if at_cursor { "▶ " } else { "  " };
        let status_style = if summary.is_pass {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::Red)
        };
        let row_style = if summary.is_selected {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Line::from(vec![
            Span::raw(marker),
            Span::styled(format!("{:<4}", summary.status_label), status_style),
            Span::styled(
                format!(
                    " {:<width$}",
                    truncate(&summary.scenario_label, LIST_SCENARIO_WIDTH),
                    width = LIST_SCENARIO_WIDTH
                ),
                row_style,
            ),
            Span::styled(format!(" {:>5}", summary.display_score), row_style),
            Span::styled(format!("  #{:<3}", summary.display_run_id), row_style),
            Span::styled(
                format!("  {}", summary.formatted_timestamp),
                Style::default().fg(Color::DarkGray),
            ),
        ])
    }

    fn render_run_list(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Runs ({}) ", self.visible.len()));

        if self.visible.is_empty() {
            let empty = Paragraph::new("No runs match the current filters.")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let height = area.height.saturating_sub(2) as usize;
        let (start, end) = self.list_window(height);
        let items: Vec<ListItem> = self.visible[start..end]
            .iter()
            .enumerate()
            .map(|(offset, summary)| {
                ListItem::new(self.summary_line(summary, start + offset == self.cursor))
            })
            .collect();

        frame.render_widget(List::new(items).block(block), area);
    }

    fn detail_lines(detail: &RunDetail) -> Vec<Line<'static>> {
        let label = Style::default().fg(Color::DarkGray);
        let section = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let status_style = if detail.header.is_pass {
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        };

        let mut lines = vec![
            Line::from(vec![
                Span::styled("Scenario:  ", label),
                Span::styled(
                    detail.header.scenario_label.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("Run ID:    ", label),
                Span::raw(detail.header.run_id.clone()),
            ]),
            Line::from(vec![
                Span::styled("Timestamp: ", label),
                Span::raw(detail.header.timestamp.clone()),
            ]),
            Line::from(vec![
                Span::styled("Status:    ", label),
                Span::styled(detail.header.status_label, status_style),
            ]),
            Line::from(vec![
                Span::styled("Score:     ", label),
                Span::raw(detail.header.display_score.clone()),
            ]),
        ];

        if let Some(rows) = &detail.rubric {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled("Rubric", section)));
            for row in rows {
                lines.push(Line::from(vec![
                    Span::raw(format!("  {:<20}", row.dimension)),
                    Span::styled(
                        format!("{}", row.score),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                ]));
                lines.push(Line::from(Span::styled(
                    format!("    {}", row.reasoning),
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }

        if !detail.transcript.is_empty() {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled("Transcript", section)));
            for bubble in &detail.transcript {
                let speaker_style = match bubble.role {
                    SpeakerRole::Player => Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                    SpeakerRole::Counterpart => Style::default()
                        .fg(Color::Magenta)
                        .add_modifier(Modifier::BOLD),
                };
                lines.push(Line::default());
                lines.push(Line::from(Span::styled(
                    bubble.speaker.clone(),
                    speaker_style,
                )));
                lines.push(Line::from(Span::raw(bubble.content.clone())));
            }
        }

        lines
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title(" Detail ");

        match &self.detail {
            None => {
                let placeholder = Paragraph::new("Select a run to view details (Enter)")
                    .style(Style::default().fg(Color::DarkGray))
                    .block(block);
                frame.render_widget(placeholder, area);
            }
            Some(detail) => {
                let body = Paragraph::new(Self::detail_lines(detail))
                    .block(block)
                    .wrap(Wrap { trim: false })
                    .scroll((self.detail_scroll, 0));
                frame.render_widget(body, area);
            }
        }
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let footer = Paragraph::new(
            " ↑/↓ navigate │ Enter select │ s scenario │ r result │ PgUp/PgDn scroll │ q quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(footer, area);
    }
}

// ============================================================================
// Terminal lifecycle
// ============================================================================

pub fn init_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

pub fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}

/// Run the viewer until the user quits.
pub fn run_viewer(repo: RunRepository) -> Result<()> {
    let mut terminal = init_terminal()?;

    // Restore the terminal even if rendering panics, so the shell isn't
    // left in raw mode.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut app = ViewerApp::new(repo);
    let result = run_loop(&mut terminal, &mut app);

    restore_terminal(&mut terminal)?;
    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut ViewerApp,
) -> Result<()> {
    loop {
        terminal.draw(|frame| app.render(frame))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code);
                }
            }
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::raw_record;

    fn sample_app() -> ViewerApp {
        ViewerApp::new(RunRepository::from_raw(vec![
            raw_record("quest", "20260122_181745", "1", true, 8.0),
            raw_record("quest", "20260122_171745", "2", false, 0.0),
            raw_record("tavern", "20260122_161745", "1", true, 6.0),
        ]))
    }

    #[test]
    fn test_new_projects_everything_unselected() {
        let app = sample_app();
        assert_eq!(app.visible().len(), 3);
        assert!(app.detail().is_none());
        assert_eq!(app.cursor(), 0);
    }

    #[test]
    fn test_cursor_movement_stays_in_bounds() {
        let mut app = sample_app();
        app.handle_key(KeyCode::Up);
        assert_eq!(app.cursor(), 0);

        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Down);
        assert_eq!(app.cursor(), 2);
        app.handle_key(KeyCode::Down);
        assert_eq!(app.cursor(), 2, "cursor stops at the last row");

        app.handle_key(KeyCode::Up);
        assert_eq!(app.cursor(), 1);
    }

    #[test]
    fn test_enter_selects_run_under_cursor() {
        let mut app = sample_app();
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Enter);

        let detail = app.detail().expect("selection should project a detail");
        assert_eq!(detail.header.run_id, "2");
        assert!(app.visible()[1].is_selected);
        assert_eq!(app.visible().iter().filter(|s| s.is_selected).count(), 1);
    }

    #[test]
    fn test_enter_on_empty_list_is_noop() {
        let mut app = ViewerApp::new(RunRepository::from_raw(vec![]));
        app.handle_key(KeyCode::Enter);
        assert!(app.detail().is_none());
    }

    #[test]
    fn test_scenario_cycling_wraps_through_all() {
        let mut app = sample_app();
        // distinct scenarios sorted: quest, tavern
        app.handle_key(KeyCode::Char('s'));
        assert_eq!(app.visible().len(), 2); // quest only
        app.handle_key(KeyCode::Char('s'));
        assert_eq!(app.visible().len(), 1); // tavern only
        app.handle_key(KeyCode::Char('s'));
        assert_eq!(app.visible().len(), 3); // back to all
    }

    #[test]
    fn test_result_cycling() {
        let mut app = sample_app();
        app.handle_key(KeyCode::Char('r'));
        assert_eq!(app.visible().len(), 2); // pass only
        app.handle_key(KeyCode::Char('r'));
        assert_eq!(app.visible().len(), 1); // fail only
        app.handle_key(KeyCode::Char('r'));
        assert_eq!(app.visible().len(), 3);
    }

    #[test]
    fn test_filter_change_resets_cursor_but_keeps_selection() {
        let mut app = sample_app();
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Enter); // select the failing quest run
        app.handle_key(KeyCode::Down);
        assert_eq!(app.cursor(), 2);

        app.handle_key(KeyCode::Char('r')); // pass only: selected run hidden
        assert_eq!(app.cursor(), 0);
        assert!(app.visible().iter().all(|s| !s.is_selected));
        let detail = app.detail().expect("hidden selection still projects");
        assert_eq!(detail.header.run_id, "2");
    }

    #[test]
    fn test_detail_scroll_keys() {
        let mut app = sample_app();
        app.handle_key(KeyCode::PageUp);
        assert_eq!(app.detail_scroll, 0);
        app.handle_key(KeyCode::PageDown);
        app.handle_key(KeyCode::PageDown);
        assert_eq!(app.detail_scroll, 2 * DETAIL_PAGE);
        app.handle_key(KeyCode::PageUp);
        assert_eq!(app.detail_scroll, DETAIL_PAGE);
    }

    #[test]
    fn test_selecting_resets_detail_scroll() {
        let mut app = sample_app();
        app.handle_key(KeyCode::PageDown);
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.detail_scroll, 0);
    }

    #[test]
    fn test_quit_key() {
        let mut app = sample_app();
        assert!(!app.should_quit());
        app.handle_key(KeyCode::Char('q'));
        assert!(app.should_quit());
    }

    #[test]
    fn test_unbound_keys_are_ignored() {
        let mut app = sample_app();
        app.handle_key(KeyCode::Char('x'));
        app.handle_key(KeyCode::Tab);
        assert_eq!(app.visible().len(), 3);
        assert!(!app.should_quit());
    }

    #[test]
    fn test_list_window_keeps_cursor_visible() {
        let mut app = sample_app();
        assert_eq!(app.list_window(2), (0, 2));
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Down); // cursor = 2
        assert_eq!(app.list_window(2), (1, 3));
        assert_eq!(app.list_window(10), (0, 3));
        assert_eq!(app.list_window(0), (0, 0));
    }

    #[test]
    fn test_detail_lines_cover_all_sections() {
        use crate::test_utils::{with_rubric, with_transcript};
        let raw = with_transcript(
            with_rubric(
                raw_record("quest", "20260122_181745", "1", true, 9.0),
                &[("persuasion", 5.0)],
                &[("persuasion", "Solid.")],
            ),
            &[("Player", "hello"), ("Guard", "halt")],
        );
        let mut app = ViewerApp::new(RunRepository::from_raw(vec![raw]));
        app.handle_key(KeyCode::Enter);

        let lines = ViewerApp::detail_lines(app.detail().unwrap());
        let text: Vec<String> = lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.clone()).collect())
            .collect();
        let joined = text.join("\n");
        assert!(joined.contains("Scenario:"));
        assert!(joined.contains("Rubric"));
        assert!(joined.contains("persuasion"));
        assert!(joined.contains("Transcript"));
        assert!(joined.contains("Guard"));
    }
}
