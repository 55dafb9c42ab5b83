//! Session - one viewer's rendering core
//!
//! Holds every piece of per-viewer state (section, viewport, particles,
//! animation clock) and mutates it only inside [`Session::update`]. The
//! scheduler feeds messages in order and asks for a frame after each one,
//! so a frame never observes half-applied state.

use std::sync::Arc;
use std::time::Instant;

use chrono::Local;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};
use ratatui::Frame;
use tracing::debug;

use super::compositor::overlay;
use super::content::{format_hms, ContentContext, ContentProvider, SPINNER_FRAMES};
use super::events::{action_for, Action};
use super::particles::ParticleEngine;
use super::section::{Section, SectionState};
use super::theme::{StyleName, Theme};
use super::viewport::Viewport;
use crate::config::{clamp_terminal_size, SessionConfig};
use crate::runtime::Message;

const SPARKLES: [&str; 4] = ["✨", "⭐", "🌟", "💫"];
const HEADER_HEIGHT: u16 = 5;

/// What the scheduler should do after a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Tick counter gated by the effects switch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationClock {
    tick: u64,
    effects_enabled: bool,
}

impl AnimationClock {
    pub fn new(effects_enabled: bool) -> Self {
        Self {
            tick: 0,
            effects_enabled,
        }
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn effects_enabled(&self) -> bool {
        self.effects_enabled
    }

    /// Count one tick if effects are on. Returns whether the clock moved.
    pub fn advance(&mut self) -> bool {
        if self.effects_enabled {
            self.tick += 1;
        }
        self.effects_enabled
    }

    pub fn toggle_effects(&mut self) -> bool {
        self.effects_enabled = !self.effects_enabled;
        self.effects_enabled
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Layout
// ─────────────────────────────────────────────────────────────────────────────

/// Screen regions of one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameAreas {
    pub header: Rect,
    pub tabs: Rect,
    pub content: Rect,
    pub footer: Rect,
}

impl FrameAreas {
    pub fn split(area: Rect) -> Self {
        let [header, tabs, content, footer] = Layout::vertical([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(area);

        Self {
            header,
            tabs,
            content,
            footer,
        }
    }

    /// Where the viewport text lands inside the content box
    pub fn viewport(&self) -> Rect {
        content_block().inner(self.content)
    }
}

fn content_block() -> Block<'static> {
    Block::bordered()
        .border_type(BorderType::Rounded)
        .padding(Padding::horizontal(1))
}

// ─────────────────────────────────────────────────────────────────────────────
// Session
// ─────────────────────────────────────────────────────────────────────────────

pub struct Session<R = StdRng> {
    sections: SectionState,
    viewport: Viewport,
    particles: ParticleEngine,
    clock: AnimationClock,
    width: u16,
    height: u16,
    ready: bool,
    should_quit: bool,
    started: Instant,
    content: Arc<dyn ContentProvider>,
    theme: Theme,
    rng: R,
}

impl Session<StdRng> {
    /// New session with an entropy-seeded RNG
    pub fn new(content: Arc<dyn ContentProvider>, config: &SessionConfig) -> Self {
        Self::with_rng(content, config, StdRng::from_entropy())
    }
}

impl<R: Rng> Session<R> {
    /// New session drawing bursts from `rng`
    pub fn with_rng(content: Arc<dyn ContentProvider>, config: &SessionConfig, rng: R) -> Self {
        let (width, height) = config.default_size;
        let inner = FrameAreas::split(Rect::new(0, 0, width, height)).viewport();

        let mut session = Self {
            sections: SectionState::new(),
            viewport: Viewport::new(inner.width, inner.height),
            particles: ParticleEngine::new(),
            clock: AnimationClock::new(config.effects_enabled),
            width,
            height,
            ready: false,
            should_quit: false,
            started: Instant::now(),
            content,
            theme: Theme::new(),
            rng,
        };
        session.refresh_content(true);
        session
    }

    pub fn current_section(&self) -> Section {
        self.sections.current()
    }

    pub fn tick(&self) -> u64 {
        self.clock.tick()
    }

    pub fn effects_enabled(&self) -> bool {
        self.clock.effects_enabled()
    }

    pub fn particles(&self) -> &ParticleEngine {
        &self.particles
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// True once the transport has reported a terminal size
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Apply one message
    pub fn update(&mut self, msg: Message) -> Control {
        if self.should_quit {
            return Control::Quit;
        }

        match msg {
            Message::Resize { width, height } => self.on_resize(width, height),
            Message::Tick => self.on_tick(),
            Message::Key(key) => self.on_action(action_for(key)),
            Message::Closed => self.should_quit = true,
        }

        if self.should_quit {
            Control::Quit
        } else {
            Control::Continue
        }
    }

    fn on_resize(&mut self, width: u16, height: u16) {
        if width == 0 || height == 0 {
            debug!(width, height, "Ignoring empty terminal size");
            return;
        }
        let (width, height) = clamp_terminal_size(width, height);
        self.width = width;
        self.height = height;
        let inner = FrameAreas::split(Rect::new(0, 0, width, height)).viewport();
        self.viewport.resize(inner.width, inner.height);
        if !self.ready {
            debug!(width, height, "Terminal size known");
        }
        self.ready = true;
        self.refresh_content(false);
    }

    fn on_tick(&mut self) {
        // Particles freeze with the clock while effects are off
        if self.clock.advance() && !self.particles.is_empty() {
            self.particles
                .advance(self.viewport.width(), self.viewport.height());
        }
        if self.sections.current().is_live() {
            self.refresh_content(false);
        }
    }

    fn on_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::ToggleHelp => {
                self.sections.toggle_help();
                debug!(section = %self.sections.current(), "Help toggled");
                self.refresh_content(true);
            }
            Action::ToggleEffects => {
                let on = self.clock.toggle_effects();
                debug!(effects = on, "Effects toggled");
            }
            Action::Explode => self.explode(),
            Action::Navigate(nav) => {
                if self.sections.navigate(nav) {
                    debug!(section = %self.sections.current(), "Section changed");
                    self.refresh_content(true);
                }
            }
            Action::ScrollUp => self.viewport.scroll_up(1),
            Action::ScrollDown => self.viewport.scroll_down(1),
            Action::PageUp => self.viewport.page_up(),
            Action::PageDown => self.viewport.page_down(),
            Action::Top => self.viewport.goto_top(),
            Action::Bottom => self.viewport.goto_bottom(),
            Action::None => {}
        }
    }

    /// Burst at the viewport center, unless effects are off
    fn explode(&mut self) {
        if !self.clock.effects_enabled() {
            return;
        }
        let x = f64::from(self.viewport.width() / 2);
        let y = f64::from(self.viewport.height() / 2);
        let count = self.particles.spawn(x, y, &mut self.rng);
        debug!(count, live = self.particles.len(), "Explosion");
    }

    fn content_context(&self) -> ContentContext {
        ContentContext {
            tick: self.clock.tick(),
            effects_enabled: self.clock.effects_enabled(),
            particle_count: self.particles.len(),
            uptime: self.started.elapsed(),
            now: Local::now(),
        }
    }

    /// Pull the current section's text into the viewport
    fn refresh_content(&mut self, reset_scroll: bool) {
        let text = self
            .content
            .section_text(self.sections.current(), &self.content_context());
        self.viewport.set_content(text);
        if reset_scroll {
            self.viewport.goto_top();
        }
    }

    /// Viewport text with the particle layer merged in
    pub fn composed_view(&self) -> Text<'static> {
        let base = self.viewport.view();
        if !self.clock.effects_enabled() || self.particles.is_empty() {
            return base;
        }
        let canvas = self.particles.render(
            self.viewport.width(),
            self.viewport.height(),
            &self.theme,
        );
        overlay(base, &canvas)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Drawing
    // ─────────────────────────────────────────────────────────────────────

    /// Draw the whole frame
    pub fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        if !self.ready {
            self.draw_loading(frame, area);
            return;
        }

        let areas = FrameAreas::split(area);
        self.draw_header(frame, areas.header);
        self.draw_tabs(frame, areas.tabs);
        self.draw_content(frame, areas.content);
        self.draw_footer(frame, areas.footer);
    }

    fn draw_loading(&self, frame: &mut Frame, area: Rect) {
        let spinner = SPINNER_FRAMES[(self.clock.tick() % SPINNER_FRAMES.len() as u64) as usize];
        let lines = vec![
            Line::default(),
            Line::from(format!("{spinner} Loading Portfolio Terminal...")),
            Line::default(),
            Line::from("🚀 Initializing components..."),
            Line::from("📊 Loading portfolio data..."),
            Line::from("🎨 Setting up interface..."),
            Line::default(),
            Line::from("Please wait..."),
        ];
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.theme.header_border()));
        let paragraph = Paragraph::new(lines)
            .style(self.theme.style(StyleName::Header))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(paragraph, area);
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let sparkle = SPARKLES[(self.clock.tick() % SPARKLES.len() as u64) as usize];

        let mut status = vec![if self.clock.effects_enabled() {
            "🎬 Effects: ON".to_string()
        } else {
            "📺 Effects: OFF".to_string()
        }];
        if !self.particles.is_empty() {
            status.push(format!("⚡ Particles: {}", self.particles.len()));
        }
        status.push(format!("⏱ Uptime: {}", format_hms(self.started.elapsed())));

        let lines = vec![
            Line::from(format!("{sparkle} Portfolio Terminal {sparkle}")),
            Line::from(
                self.theme
                    .render(StyleName::Subtitle, "Interactive Developer Portfolio"),
            ),
            Line::from(self.theme.render(StyleName::FooterLeft, status.join(" │ "))),
        ];

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.theme.header_border()));
        let paragraph = Paragraph::new(lines)
            .style(self.theme.style(StyleName::Header))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(paragraph, area);
    }

    fn tab(&self, section: Section) -> Span<'static> {
        let name = if section == self.sections.current() {
            StyleName::ActiveTab
        } else {
            StyleName::InactiveTab
        };
        self.theme
            .render(name, format!(" {} {} ", section.icon(), section.title()))
    }

    fn draw_tabs(&self, frame: &mut Frame, area: Rect) {
        let mut spans = Vec::with_capacity(Section::CYCLE.len() * 2);
        for section in Section::CYCLE {
            spans.push(self.tab(section));
            spans.push(Span::raw(" "));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);

        let help = Paragraph::new(Line::from(self.tab(Section::Help))).alignment(Alignment::Right);
        frame.render_widget(help, area);
    }

    fn draw_content(&self, frame: &mut Frame, area: Rect) {
        let section = self.sections.current();
        let percent = (self.viewport.scroll_percent() * 100.0).round() as u32;

        let block = content_block()
            .border_style(self.theme.style(StyleName::ContentBox))
            .title(self.theme.render(
                StyleName::SectionTitle,
                format!(" {} {} ", section.icon(), section.title()),
            ))
            .title_bottom(
                Line::from(self.theme.render(StyleName::Muted, format!(" {percent:>3}% ")))
                    .right_aligned(),
            );

        frame.render_widget(Paragraph::new(self.composed_view()).block(block), area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let hints = self.theme.render(
            StyleName::FooterLeft,
            " Tab/Shift+Tab: Navigate • h: Help • e: Toggle Effects • x: Explosion • q: Quit ",
        );
        let status = self
            .theme
            .render(StyleName::FooterRight, " 💻 Portfolio on Interactive Terminal 🎮 ");

        let gap = usize::from(area.width)
            .saturating_sub(hints.width())
            .saturating_sub(status.width());
        let line = if gap > 0 {
            Line::from(vec![hints, Span::raw(" ".repeat(gap)), status])
        } else {
            Line::from(hints)
        };
        frame.render_widget(Paragraph::new(line), area);
    }
}
