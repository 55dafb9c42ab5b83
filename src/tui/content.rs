//! Section Content - portfolio data rendered as styled text
//!
//! The session asks a [`ContentProvider`] for a section's text on every
//! transition (and on every tick while Live is showing). Providers are
//! read-only and shared by all sessions. Missing data never fails; it is
//! replaced by a fallback sentence.

use std::time::Duration;

use chrono::{DateTime, Local};
use ratatui::text::{Line, Span, Text};

use super::section::Section;
use super::theme::{StyleName, Theme};
use crate::data::{DataLoader, Skill};

/// Width of a skill bar in cells
pub const SKILL_BAR_WIDTH: usize = 30;

/// Ticks a tech fact stays on screen
pub const FACT_TICKS: u64 = 50;

pub const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

const WAVE_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const WAVE_WIDTH: usize = 40;

const FALLBACK_LOGO: &str = "\
╭─────────────────────────────────────────────╮
│             PORTFOLIO TERMINAL              │
╰─────────────────────────────────────────────╯";

const FALLBACK_CONTACT_ART: &str = "\
╭─────────────────────╮
│  Let's build cool   │
│  stuff together! 🚀 │
╰─────────────────────╯
          │
          ▼
     ┌─────────┐
     │ ( ◕‿◕ ) │
     └─────────┘";

const FALLBACK_ABOUT: &str = "\
Welcome to my interactive portfolio terminal!

🎯 What I Do:
    I'm a passionate developer who loves building innovative solutions
    and exploring new technologies.

💻 Background:
    • Full-stack developer with modern web technologies
    • Experience with both frontend and backend development
    • Always learning and adapting to new challenges";

/// Session values a section may display
#[derive(Debug, Clone, PartialEq)]
pub struct ContentContext {
    pub tick: u64,
    pub effects_enabled: bool,
    pub particle_count: usize,
    pub uptime: Duration,
    pub now: DateTime<Local>,
}

impl Default for ContentContext {
    fn default() -> Self {
        Self {
            tick: 0,
            effects_enabled: true,
            particle_count: 0,
            uptime: Duration::ZERO,
            now: Local::now(),
        }
    }
}

/// Source of section text
pub trait ContentProvider: Send + Sync {
    fn section_text(&self, section: Section, ctx: &ContentContext) -> Text<'static>;
}

/// `HH:MM:SS`
pub fn format_hms(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Skill percentage after the gentle pulse animation, always within 0..=100
pub fn pulsed_percentage(percentage: i32, tick: u64, effects_enabled: bool) -> i32 {
    if !effects_enabled {
        return percentage.clamp(0, 100);
    }
    let phase = (tick as f64 + f64::from(percentage)) * 0.05;
    let pulse = (3.0 * phase.sin()) as i32;
    percentage.saturating_add(pulse).clamp(0, 100)
}

// ─────────────────────────────────────────────────────────────────────────────
// Document builder
// ─────────────────────────────────────────────────────────────────────────────

struct Doc<'t> {
    theme: &'t Theme,
    lines: Vec<Line<'static>>,
}

impl<'t> Doc<'t> {
    fn new(theme: &'t Theme) -> Self {
        Self {
            theme,
            lines: Vec::new(),
        }
    }

    fn blank(&mut self) -> &mut Self {
        self.lines.push(Line::default());
        self
    }

    fn line(&mut self, spans: Vec<Span<'static>>) -> &mut Self {
        self.lines.push(Line::from(spans));
        self
    }

    /// One line per `\n`-separated row of `text`
    fn text(&mut self, name: StyleName, text: &str) -> &mut Self {
        for row in text.lines() {
            self.lines.push(Line::from(self.theme.render(name, row)));
        }
        self
    }

    fn title(&mut self, text: &str) -> &mut Self {
        self.text(StyleName::SectionTitle, text).blank()
    }

    fn bullets(&mut self, name: StyleName, indent: &str, items: &[String]) -> &mut Self {
        for item in items {
            self.text(name, &format!("{indent}• {item}"));
        }
        self
    }

    fn finish(self) -> Text<'static> {
        Text::from(self.lines)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Portfolio Content
// ─────────────────────────────────────────────────────────────────────────────

/// Content backed by a loaded portfolio data file
#[derive(Debug, Clone, Default)]
pub struct PortfolioContent {
    data: DataLoader,
    theme: Theme,
}

impl ContentProvider for PortfolioContent {
    fn section_text(&self, section: Section, ctx: &ContentContext) -> Text<'static> {
        match section {
            Section::About => self.about(ctx),
            Section::Experience => self.experience(),
            Section::Skills => self.skills(ctx),
            Section::Projects => self.projects(),
            Section::Contact => self.contact(),
            Section::Live => self.live(ctx),
            Section::Help => self.help(),
        }
    }
}

impl PortfolioContent {
    pub fn new(data: DataLoader) -> Self {
        Self {
            data,
            theme: Theme::new(),
        }
    }

    pub fn data(&self) -> &DataLoader {
        &self.data
    }

    fn missing(&self, doc: &mut Doc<'_>, what: &str) {
        doc.text(
            StyleName::ContentText,
            &format!("No {what} data available. Please check the data file."),
        );
    }

    fn about(&self, ctx: &ContentContext) -> Text<'static> {
        let mut doc = Doc::new(&self.theme);

        let logo = self
            .data
            .ascii_art()
            .map(|a| a.logo.as_str())
            .filter(|l| !l.is_empty())
            .unwrap_or(FALLBACK_LOGO);
        doc.text(StyleName::AsciiArt, logo).blank();
        doc.title("👋 About Me");

        match self.data.personal() {
            Some(personal) => {
                let mut greeting = format!("Hi! I am {}", personal.name);
                if !personal.nickname.is_empty() {
                    greeting.push_str(&format!(" but you can call me {}.", personal.nickname));
                }
                doc.text(StyleName::ContentText, &greeting);

                let about = &personal.about;
                if !about.intro.is_empty() {
                    doc.text(StyleName::ContentText, &about.intro);
                }
                doc.blank();

                doc.text(StyleName::ProjectLabel, "🎯 What I Do:");
                if !about.what_i_do.is_empty() {
                    doc.text(StyleName::ContentText, &format!("    {}", about.what_i_do));
                }
                doc.blank();

                if !about.background.is_empty() {
                    doc.text(StyleName::ProjectLabel, "💻 Background:");
                    doc.bullets(StyleName::ContentText, "    ", &about.background);
                    doc.blank();
                }

                if !about.philosophy.is_empty() {
                    doc.text(StyleName::ProjectLabel, "🌱 Always Learning:");
                    doc.text(StyleName::ContentText, &format!("    {}", about.philosophy));
                    doc.blank();
                }
            }
            None => {
                doc.text(StyleName::ContentText, FALLBACK_ABOUT).blank();
            }
        }

        let fact = self.data.tech_fact(ctx.tick / FACT_TICKS);
        doc.text(StyleName::FactBox, &format!(" 💡 {fact} ")).blank();

        doc.line(vec![
            self.theme
                .render(StyleName::LiveValue, format!(" {} ", ctx.now.format("%H:%M:%S %Z"))),
            Span::raw("  "),
            self.theme.render(
                StyleName::LiveSubtitle,
                ctx.now.format("%A, %B %-d, %Y").to_string(),
            ),
        ]);

        doc.finish()
    }

    fn experience(&self) -> Text<'static> {
        let mut doc = Doc::new(&self.theme);
        doc.title("💼 Professional Experience");

        let experiences = self.data.experiences();
        if experiences.is_empty() {
            self.missing(&mut doc, "experience");
            return doc.finish();
        }

        for (i, exp) in experiences.iter().enumerate() {
            if i > 0 {
                doc.blank();
            }
            doc.text(
                StyleName::ExperienceTitle,
                &format!(" {} @ {} ", exp.title, exp.company),
            );

            let mut meta = format!("📅 {} • 📍 {}", exp.period, exp.location);
            if exp.current {
                meta.push_str(" • 🟢 Current");
            }
            doc.text(StyleName::ExperienceMeta, &meta).blank();

            doc.bullets(StyleName::ExperienceDetail, "  ", &exp.details);
            if !exp.technologies.is_empty() {
                doc.text(
                    StyleName::ExperienceDetail,
                    &format!("  Tech: {}", exp.technologies.join(", ")),
                );
            }
        }

        doc.finish()
    }

    fn skills(&self, ctx: &ContentContext) -> Text<'static> {
        let mut doc = Doc::new(&self.theme);
        doc.title("🛠 Technical Skills");

        let categories = self.data.skills();
        if categories.is_empty() {
            self.missing(&mut doc, "skills");
            return doc.finish();
        }

        for (category, skills) in categories {
            doc.text(StyleName::SkillCategory, category);
            for skill in skills {
                doc.line(self.skill_bar(skill, ctx));
            }
            doc.blank();
        }

        doc.finish()
    }

    fn skill_bar(&self, skill: &Skill, ctx: &ContentContext) -> Vec<Span<'static>> {
        let shown = pulsed_percentage(skill.percentage, ctx.tick, ctx.effects_enabled);
        let filled = (SKILL_BAR_WIDTH as f64 * f64::from(shown) / 100.0) as usize;
        let bar = format!(
            "{}{}",
            "█".repeat(filled),
            "░".repeat(SKILL_BAR_WIDTH - filled)
        );

        vec![
            self.theme
                .render(StyleName::ContentText, format!("  {:<15} ", skill.name)),
            self.theme.render(StyleName::SkillBar, bar),
            self.theme.render(
                StyleName::ContentText,
                format!(" {:>3}% ({})", skill.percentage, skill.experience),
            ),
        ]
    }

    fn projects(&self) -> Text<'static> {
        let mut doc = Doc::new(&self.theme);
        doc.title("🚀 Featured Projects");

        let projects = self.data.projects();
        if projects.is_empty() {
            self.missing(&mut doc, "project");
            return doc.finish();
        }

        for (i, project) in projects.iter().enumerate() {
            if i > 0 {
                doc.blank();
            }
            let mut title = vec![self
                .theme
                .render(StyleName::ProjectTitle, format!(" {} ", project.name))];
            if !project.status.is_empty() {
                title.push(Span::raw(" "));
                title.push(
                    self.theme
                        .render(StyleName::Muted, format!("[{}]", project.status)),
                );
            }
            doc.line(title);

            if !project.description.is_empty() {
                doc.text(StyleName::ProjectDescription, &project.description);
            }
            if !project.technologies.is_empty() {
                doc.line(vec![
                    self.theme.render(StyleName::ProjectLabel, "Tech: "),
                    self.theme
                        .render(StyleName::ContentText, project.technologies.join(", ")),
                ]);
            }
            if !project.link.is_empty() {
                doc.line(vec![
                    self.theme.render(StyleName::ProjectLabel, "Link: "),
                    self.theme.render(StyleName::ContentText, project.link.clone()),
                ]);
            }
        }

        doc.finish()
    }

    fn contact(&self) -> Text<'static> {
        let mut doc = Doc::new(&self.theme);
        doc.title("📞 Get In Touch");

        let Some(contact) = self.data.contact() else {
            self.missing(&mut doc, "contact");
            return doc.finish();
        };

        doc.text(
            StyleName::ContentText,
            "Ready to collaborate or discuss exciting opportunities? I'm always open to\n\
             interesting conversations about technology and new projects!",
        )
        .blank();

        doc.text(StyleName::ContentText, &format!("📧 Email:     {}", contact.email))
            .text(StyleName::ContentText, &format!("🐙 GitHub:    {}", contact.github))
            .text(StyleName::ContentText, &format!("💼 LinkedIn:  {}", contact.linkedin))
            .text(StyleName::ContentText, &format!("🌐 Portfolio: {}", contact.portfolio))
            .blank();

        if let Some(personal) = self.data.personal() {
            doc.text(StyleName::ContentText, &format!("🌍 Location:  {}", personal.location))
                .text(StyleName::ContentText, &format!("🕐 Timezone:  {}", personal.timezone))
                .blank();
        }

        doc.text(
            StyleName::ContentText,
            &format!("💬 Preferred contact method: {}", contact.preferred_contact),
        )
        .text(
            StyleName::ContentText,
            &format!("⚡ Response time: {}", contact.response_time),
        )
        .blank();

        if !contact.available_for.is_empty() {
            doc.text(StyleName::ProjectLabel, "Feel free to reach out for:");
            doc.bullets(StyleName::ContentText, "", &contact.available_for);
            doc.blank();
        }

        if !contact.specializations.is_empty() {
            doc.text(StyleName::ProjectLabel, "🚀 Specializations:");
            doc.bullets(StyleName::ContentText, "", &contact.specializations);
            doc.blank();
        }

        let art = self
            .data
            .ascii_art()
            .map(|a| a.contact.as_str())
            .filter(|a| !a.is_empty())
            .unwrap_or(FALLBACK_CONTACT_ART);
        doc.text(StyleName::AsciiArt, art);

        doc.finish()
    }

    fn live(&self, ctx: &ContentContext) -> Text<'static> {
        let mut doc = Doc::new(&self.theme);
        doc.title("🎮 Live Demo");

        let spinner = SPINNER_FRAMES[(ctx.tick % SPINNER_FRAMES.len() as u64) as usize];
        doc.line(vec![
            self.theme.render(StyleName::LiveTitle, " Real-time terminal rendering "),
            Span::raw(" "),
            self.theme.render(StyleName::LiveValue, format!(" {spinner} ")),
        ])
        .blank();

        let stat = |label: &str, value: String| {
            vec![
                self.theme.render(StyleName::ContentText, format!("  {label:<18}")),
                self.theme.render(StyleName::LiveValue, format!(" {value} ")),
            ]
        };
        doc.line(stat("🕐 Local time", ctx.now.format("%H:%M:%S").to_string()))
            .line(stat("⏱ Session uptime", format_hms(ctx.uptime)))
            .line(stat("🎞 Animation tick", ctx.tick.to_string()))
            .line(stat(
                "🎬 Effects",
                if ctx.effects_enabled { "ON" } else { "OFF" }.to_string(),
            ))
            .line(stat("⚡ Live particles", ctx.particle_count.to_string()))
            .blank();

        doc.text(StyleName::LiveSubtitle, "Signal:")
            .line(vec![self.theme.render(StyleName::SkillBar, wave_row(ctx.tick))])
            .blank();

        let fact = self.data.tech_fact(ctx.tick / FACT_TICKS);
        doc.text(StyleName::FactBox, &format!(" 💡 {fact} ")).blank();

        doc.text(
            StyleName::Muted,
            "Press 'x' for an explosion, 'e' to toggle effects.",
        );

        doc.finish()
    }

    fn help(&self) -> Text<'static> {
        let mut doc = Doc::new(&self.theme);
        doc.title("❓ Help");

        let keys: [(&str, &str); 12] = [
            ("Tab / → / l", "Next section"),
            ("Shift+Tab / ←", "Previous section"),
            ("↑ ↓ / k j", "Scroll content"),
            ("PgUp PgDn / b f", "Scroll a page"),
            ("Home End / g G", "Jump to top / bottom"),
            ("h / ?", "Toggle help (this section)"),
            ("q / Ctrl+C", "Quit"),
            ("", ""),
            ("e", "Toggle particle effects on/off"),
            ("x", "Trigger explosion at center"),
            ("", ""),
            ("", "Navigation is paused while help is open."),
        ];

        doc.text(StyleName::ProjectLabel, "🎮 Navigation & Controls:");
        for (key, what) in keys {
            if key.is_empty() && what.is_empty() {
                doc.blank();
                continue;
            }
            doc.line(vec![
                self.theme.render(StyleName::LiveValue, format!("  {key:<17}")),
                self.theme.render(StyleName::ContentText, format!(" {what}")),
            ]);
        }
        doc.blank();

        doc.text(StyleName::ProjectLabel, "📋 Sections:");
        for section in Section::CYCLE {
            doc.text(
                StyleName::ContentText,
                &format!("  {} {:<12} {}", section.icon(), section.title(), blurb(section)),
            );
        }
        doc.blank();

        doc.text(StyleName::ProjectLabel, "💡 Tips:");
        doc.bullets(
            StyleName::ContentText,
            "  ",
            &[
                "Resize your terminal to see the layout adapt".to_string(),
                "Help tab is always visible on the right".to_string(),
                "Particle explosions use the Catppuccin Mocha palette".to_string(),
                "Press 'h' again to return to About".to_string(),
            ],
        );

        doc.finish()
    }
}

fn blurb(section: Section) -> &'static str {
    match section {
        Section::About => "Personal introduction and overview",
        Section::Experience => "Professional work history",
        Section::Skills => "Technical expertise and proficiency",
        Section::Projects => "Featured development projects",
        Section::Contact => "Get in touch information",
        Section::Live => "Interactive demonstrations",
        Section::Help => "Keys and tips",
    }
}

/// A sine wave scrolling with the tick
fn wave_row(tick: u64) -> String {
    (0..WAVE_WIDTH)
        .map(|i| {
            let phase = (i as f64 + tick as f64) * 0.3;
            let level = (phase.sin() + 1.0) / 2.0 * (WAVE_LEVELS.len() - 1) as f64;
            WAVE_LEVELS[level.round() as usize]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Experience, PortfolioData, Project, SkillCategories};

    fn plain(text: &Text<'_>) -> String {
        text.lines
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn sample() -> PortfolioContent {
        let mut data = PortfolioData::default();
        data.personal.name = "Ada".into();
        data.personal.nickname = "A".into();
        data.personal.contact.email = "ada@example.com".into();
        data.experiences.push(Experience {
            title: "Engineer".into(),
            company: "Acme".into(),
            current: true,
            technologies: vec!["Rust".into(), "Go".into()],
            ..Experience::default()
        });
        data.skills = SkillCategories(vec![(
            "Languages".into(),
            vec![Skill {
                name: "Rust".into(),
                percentage: 50,
                experience: "5y".into(),
            }],
        )]);
        data.projects.push(Project {
            name: "termfolio".into(),
            status: "active".into(),
            link: "https://example.com".into(),
            ..Project::default()
        });
        data.tech_facts = vec!["fact zero".into(), "fact one".into()];
        PortfolioContent::new(DataLoader::from_data(data))
    }

    #[test]
    fn test_format_hms() {
        assert_eq!(format_hms(Duration::from_secs(3725)), "01:02:05");
        assert_eq!(format_hms(Duration::ZERO), "00:00:00");
    }

    #[test]
    fn test_pulse_is_bounded() {
        for tick in 0..200 {
            let p = pulsed_percentage(99, tick, true);
            assert!((96..=100).contains(&p));
            assert_eq!(pulsed_percentage(99, tick, false), 99);
        }
        assert_eq!(pulsed_percentage(0, 0, true), 0);
        assert_eq!(pulsed_percentage(150, 7, false), 100);
        assert_eq!(pulsed_percentage(-5, 7, false), 0);
        assert_eq!(pulsed_percentage(i32::MAX, 7, true), 100);
    }

    #[test]
    fn test_about_uses_data() {
        let text = plain(&sample().section_text(Section::About, &ContentContext::default()));
        assert!(text.contains("Hi! I am Ada but you can call me A."));
        assert!(text.contains("fact zero"));
    }

    #[test]
    fn test_fact_rotates_with_tick() {
        let ctx = ContentContext {
            tick: FACT_TICKS,
            ..ContentContext::default()
        };
        let text = plain(&sample().section_text(Section::About, &ctx));
        assert!(text.contains("fact one"));
    }

    #[test]
    fn test_experience_marks_current() {
        let text = plain(&sample().section_text(Section::Experience, &ContentContext::default()));
        assert!(text.contains("Engineer @ Acme"));
        assert!(text.contains("🟢 Current"));
        assert!(text.contains("Tech: Rust, Go"));
    }

    #[test]
    fn test_skill_bar_width() {
        let ctx = ContentContext {
            effects_enabled: false,
            ..ContentContext::default()
        };
        let text = plain(&sample().section_text(Section::Skills, &ctx));
        let row = text.lines().find(|l| l.contains("Rust")).unwrap();
        assert_eq!(row.matches('█').count(), 15);
        assert_eq!(row.matches('░').count(), 15);
        assert!(row.contains(" 50% (5y)"));
    }

    #[test]
    fn test_out_of_range_skill_fills_bar_without_panic() {
        let mut data = PortfolioData::default();
        data.skills = SkillCategories(vec![(
            "Languages".into(),
            vec![
                Skill {
                    name: "Rust".into(),
                    percentage: 150,
                    experience: "5y".into(),
                },
                Skill {
                    name: "Cobol".into(),
                    percentage: -5,
                    experience: "1y".into(),
                },
            ],
        )]);
        let content = PortfolioContent::new(DataLoader::from_data(data));

        for effects_enabled in [false, true] {
            let ctx = ContentContext {
                effects_enabled,
                ..ContentContext::default()
            };
            let text = plain(&content.section_text(Section::Skills, &ctx));
            let rust = text.lines().find(|l| l.contains("Rust")).unwrap();
            assert_eq!(rust.matches('█').count(), 30);
            let cobol = text.lines().find(|l| l.contains("Cobol")).unwrap();
            assert_eq!(cobol.matches('░').count(), 30);
        }
    }

    #[test]
    fn test_projects_section() {
        let text = plain(&sample().section_text(Section::Projects, &ContentContext::default()));
        assert!(text.contains("termfolio"));
        assert!(text.contains("[active]"));
        assert!(text.contains("Link: https://example.com"));
    }

    #[test]
    fn test_live_reflects_context() {
        let ctx = ContentContext {
            tick: 42,
            particle_count: 23,
            effects_enabled: false,
            ..ContentContext::default()
        };
        let text = plain(&sample().section_text(Section::Live, &ctx));
        assert!(text.contains(" 42 "));
        assert!(text.contains(" 23 "));
        assert!(text.contains(" OFF "));
    }

    #[test]
    fn test_live_changes_every_tick() {
        let content = sample();
        let a = content.section_text(Section::Live, &ContentContext::default());
        let b = content.section_text(
            Section::Live,
            &ContentContext {
                tick: 1,
                ..ContentContext::default()
            },
        );
        assert_ne!(a, b);
    }

    #[test]
    fn test_fallbacks_without_data() {
        let content = PortfolioContent::default();
        let ctx = ContentContext::default();
        assert!(plain(&content.section_text(Section::Experience, &ctx))
            .contains("No experience data available"));
        assert!(plain(&content.section_text(Section::Contact, &ctx))
            .contains("No contact data available"));
        assert!(plain(&content.section_text(Section::About, &ctx))
            .contains("PORTFOLIO TERMINAL"));
    }

    #[test]
    fn test_help_lists_every_section() {
        let text = plain(&sample().section_text(Section::Help, &ContentContext::default()));
        for section in Section::CYCLE {
            assert!(text.contains(section.title()));
        }
    }

    #[test]
    fn test_wave_row_width() {
        assert_eq!(wave_row(7).chars().count(), WAVE_WIDTH);
    }
}
