//! Terminal front-end for the router.

use crate::site::SiteConfig;
use crate::views;
use crossterm::{
    event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use nav_nexus::{
    Bootstrapper, ClickOutcome, Document, Location, MemoryDocument, NavPhase, Navigator, NodeId,
};
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};
use std::io::{self, stdout};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Noop,
    Quit,
}

/// A navigation link as currently shown.
struct LinkView {
    node: NodeId,
    label: String,
    current: bool,
}

pub struct App {
    site: SiteConfig,
    document: Arc<MemoryDocument>,
    navigator: Arc<Navigator>,
    bootstrapper: Bootstrapper,
    selected: usize,
    prompt: Option<String>,
    status: String,
}

impl App {
    pub fn new(site: SiteConfig, fragment: Option<&str>) -> anyhow::Result<Self> {
        let document = Arc::new(site.build_document());
        let registry = Arc::new(views::registry(&site, &document)?);
        let location = Arc::new(Location::new(fragment.unwrap_or_default()));
        let navigator = Arc::new(Navigator::new(
            registry,
            document.clone(),
            location,
            site.router.clone(),
        )?);
        let bootstrapper = Bootstrapper::new(Arc::clone(&navigator));

        Ok(Self {
            site,
            document,
            navigator,
            bootstrapper,
            selected: 0,
            prompt: None,
            status: String::new(),
        })
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        self.bootstrapper.start();
        let result = self.run_app_loop(&mut terminal).await;
        self.bootstrapper.stop();

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    async fn run_app_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let mut revisions = self.document.subscribe();
        let mut phases = self.navigator.subscribe_phase();
        let mut fragments = self.navigator.location().subscribe();
        let mut input = tokio::time::interval(Duration::from_millis(50));

        loop {
            terminal.draw(|frame| self.render(frame))?;

            tokio::select! {
                Ok(()) = revisions.changed() => {}
                Ok(()) = phases.changed() => {}
                Ok(()) = fragments.changed() => {}
                _ = input.tick() => {
                    while event::poll(Duration::ZERO)? {
                        let CrosstermEvent::Key(key) = event::read()? else {
                            continue;
                        };
                        if key.kind == KeyEventKind::Press && self.handle_key(key) == Action::Quit {
                            return Ok(());
                        }
                    }
                }
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Action {
        if let Some(prompt) = self.prompt.as_mut() {
            match key.code {
                KeyCode::Esc => self.prompt = None,
                KeyCode::Backspace => {
                    prompt.pop();
                }
                KeyCode::Char(c) => prompt.push(c),
                KeyCode::Enter => {
                    let route = std::mem::take(prompt);
                    self.prompt = None;
                    self.jump(&route);
                }
                _ => {}
            }
            return Action::Noop;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
            KeyCode::Left | KeyCode::Char('h') => self.select(-1),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => self.select(1),
            KeyCode::Enter | KeyCode::Char(' ') => self.click(),
            KeyCode::Char('g') => self.prompt = Some(String::new()),
            _ => {}
        }
        Action::Noop
    }

    fn select(&mut self, step: isize) {
        let count = self.links().len();
        if count == 0 {
            return;
        }
        self.selected = (self.selected as isize + step).rem_euclid(count as isize) as usize;
    }

    fn click(&mut self) {
        let Some(link) = self.links().into_iter().nth(self.selected) else {
            return;
        };
        self.status = match self.bootstrapper.click(link.node) {
            ClickOutcome::Ignored => format!("'{}' is not a navigation link", link.label),
            ClickOutcome::ScrolledToTop => format!("already on '{}', scrolled to top", link.label),
            ClickOutcome::HashChanged(route) => format!("location set to {}", route.to_fragment()),
        };
    }

    fn jump(&mut self, route: &str) {
        let fragment = format!("#/{}", route.trim().trim_start_matches(['#', '/']));
        self.status = if self.navigator.location().set_hash(fragment.as_str()) {
            format!("location set to {fragment}")
        } else {
            format!("location is already {fragment}")
        };
    }

    fn links(&self) -> Vec<LinkView> {
        let selectors = &self.site.router.selectors;
        self.navigator
            .surface()
            .nav_links()
            .into_iter()
            .map(|link| LinkView {
                node: link.node,
                label: self
                    .document
                    .element(link.node)
                    .map(|element| element.text)
                    .filter(|text| !text.is_empty())
                    .unwrap_or_else(|| link.route.to_string()),
                current: self.document.attribute(link.node, &selectors.current_attribute).as_deref()
                    == Some(selectors.current_value.as_str()),
            })
            .collect()
    }

    /// Text of visible elements carrying `class`.
    fn visible_text(&self, class: &str) -> Vec<String> {
        let hidden = &self.site.router.selectors.hidden_class;
        self.document
            .elements_with_class(None, class)
            .into_iter()
            .filter(|node| !self.document.has_class(*node, hidden))
            .filter_map(|node| self.document.element(node))
            .map(|element| element.text)
            .collect()
    }

    fn render(&self, frame: &mut Frame) {
        let selectors = &self.site.router.selectors;
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Navigation bar
                Constraint::Min(0),    // Page
                Constraint::Length(3), // Status
            ])
            .split(area);

        // Navigation bar
        let mut spans = vec![Span::styled(
            format!(" {} ", self.site.title),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )];
        for (i, link) in self.links().iter().enumerate() {
            let mut style = Style::default().fg(Color::Gray);
            if link.current {
                style = style.fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD);
            }
            if i == self.selected {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            spans.push(Span::raw(" "));
            spans.push(Span::styled(format!(" {} ", link.label), style));
        }
        let nav = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        );
        frame.render_widget(nav, chunks[0]);

        // Page content
        let hero = self.visible_text(&selectors.hero_class);
        let strips = self.visible_text(&selectors.home_strip_class);
        let sections = self.visible_sections();

        let mut constraints = Vec::new();
        constraints.extend(hero.iter().map(|_| Constraint::Length(4)));
        constraints.extend(strips.iter().map(|_| Constraint::Length(3)));
        constraints.extend(sections.iter().map(|_| Constraint::Min(5)));
        let page = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(chunks[1]);

        let mut slots = page.iter();
        for text in &hero {
            if let Some(slot) = slots.next() {
                let widget = Paragraph::new(text.as_str())
                    .style(Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD))
                    .alignment(Alignment::Center)
                    .block(Block::default().borders(Borders::BOTTOM));
                frame.render_widget(widget, *slot);
            }
        }
        for text in &strips {
            if let Some(slot) = slots.next() {
                let widget = Paragraph::new(text.as_str()).block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::DarkGray)),
                );
                frame.render_widget(widget, *slot);
            }
        }
        for (title, text) in &sections {
            if let Some(slot) = slots.next() {
                let widget = Paragraph::new(text.as_str())
                    .wrap(Wrap { trim: true })
                    .block(
                        Block::default()
                            .title(format!(" {title} "))
                            .borders(Borders::ALL)
                            .border_type(BorderType::Rounded),
                    );
                frame.render_widget(widget, *slot);
            }
        }

        if self.navigator.surface().is_cover_active() {
            frame.render_widget(Clear, chunks[1]);
            let cover = Paragraph::new("…")
                .alignment(Alignment::Center)
                .style(Style::default().bg(Color::Black).fg(Color::DarkGray));
            frame.render_widget(cover, chunks[1]);
        }

        // Status
        let phase = match self.navigator.phase() {
            NavPhase::Idle => "idle",
            NavPhase::TransitioningOut => "transitioning out",
            NavPhase::Loading => "loading",
            NavPhase::Mounting => "mounting",
        };
        let mut fragment = self.navigator.location().hash();
        if fragment.is_empty() {
            fragment = "(no fragment)".to_string();
        }
        let current = self
            .navigator
            .current_route()
            .map(|route| route.to_string())
            .unwrap_or_else(|| "-".to_string());
        let first = match &self.prompt {
            Some(prompt) => Line::from(vec![
                Span::styled(" go to #/", Style::default().fg(Color::Yellow)),
                Span::raw(prompt.as_str()),
                Span::styled("▏", Style::default().fg(Color::Yellow)),
            ]),
            None => Line::from(vec![
                Span::styled(format!(" {fragment} "), Style::default().fg(Color::Cyan)),
                Span::styled(format!(" {phase} "), Style::default().fg(Color::Yellow)),
                Span::styled(format!(" mounted: {current} "), Style::default().fg(Color::Green)),
                Span::styled(format!(" {}", self.status), Style::default().fg(Color::DarkGray)),
            ]),
        };
        let help = Line::styled(
            " ←/→ select  ⏎ open  g go to route  q quit",
            Style::default().fg(Color::DarkGray),
        );
        frame.render_widget(Paragraph::new(vec![first, help]), chunks[2]);
    }

    /// Title and text of every visible view section.
    fn visible_sections(&self) -> Vec<(String, String)> {
        let selectors = &self.site.router.selectors;
        self.document
            .elements_with_data(None, &selectors.view_data_key)
            .into_iter()
            .filter(|node| !self.document.has_class(*node, &selectors.hidden_class))
            .filter_map(|node| {
                let route = self.document.data(node, &selectors.view_data_key)?;
                let title = self
                    .site
                    .sections
                    .iter()
                    .find(|section| section.route.eq_ignore_ascii_case(&route))
                    .map(|section| section.label().to_string())
                    .unwrap_or(route);
                let text = self.document.element(node)?.text;
                Some((title, text))
            })
            .collect()
    }
}
