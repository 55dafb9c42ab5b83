//! Section State Machine
//!
//! Six ordinary sections form a cycle; Help is an overlay that sits outside
//! it. Navigation only moves within the cycle, and Help is left only through
//! [`SectionState::toggle_help`], which always lands on About.

/// Portfolio sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    About,
    Experience,
    Skills,
    Projects,
    Contact,
    Live,
    Help,
}

impl Section {
    /// The navigable cycle, in tab order. Help is not part of it.
    pub const CYCLE: [Section; 6] = [
        Section::About,
        Section::Experience,
        Section::Skills,
        Section::Projects,
        Section::Contact,
        Section::Live,
    ];

    /// Where the machine starts and where leaving Help returns to
    pub const DEFAULT: Section = Section::About;

    /// Position in the cycle, `None` for Help
    pub fn index(self) -> Option<usize> {
        Self::CYCLE.iter().position(|s| *s == self)
    }

    pub fn is_help(self) -> bool {
        self == Section::Help
    }

    /// Next section in the cycle (Help stays Help)
    pub fn next(self) -> Self {
        match self.index() {
            Some(i) => Self::CYCLE[(i + 1) % Self::CYCLE.len()],
            None => self,
        }
    }

    /// Previous section in the cycle (Help stays Help)
    pub fn prev(self) -> Self {
        let n = Self::CYCLE.len();
        match self.index() {
            Some(i) => Self::CYCLE[(i + n - 1) % n],
            None => self,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Section::About => "About",
            Section::Experience => "Experience",
            Section::Skills => "Skills",
            Section::Projects => "Projects",
            Section::Contact => "Contact",
            Section::Live => "Live Demo",
            Section::Help => "Help",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Section::About => "👋",
            Section::Experience => "💼",
            Section::Skills => "🛠",
            Section::Projects => "🚀",
            Section::Contact => "📞",
            Section::Live => "🎮",
            Section::Help => "❓",
        }
    }

    /// Sections whose text depends on the animation clock
    pub fn is_live(self) -> bool {
        self == Section::Live
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

/// Navigation requests understood by the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    Next,
    Prev,
    Tab,
    ShiftTab,
}

/// Current section plus the transition rules between sections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionState {
    current: Section,
}

impl Default for SectionState {
    fn default() -> Self {
        Self {
            current: Section::DEFAULT,
        }
    }
}

impl SectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Section {
        self.current
    }

    /// Step through the cycle. Returns whether the section changed.
    ///
    /// Ignored while Help is showing.
    pub fn navigate(&mut self, nav: Nav) -> bool {
        if self.current.is_help() {
            return false;
        }
        let target = match nav {
            Nav::Next | Nav::Tab => self.current.next(),
            Nav::Prev | Nav::ShiftTab => self.current.prev(),
        };
        let changed = target != self.current;
        self.current = target;
        changed
    }

    /// Enter Help, or leave it for the default section.
    pub fn toggle_help(&mut self) {
        self.current = if self.current.is_help() {
            Section::DEFAULT
        } else {
            Section::Help
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_on_about() {
        assert_eq!(SectionState::new().current(), Section::About);
    }

    #[test]
    fn test_cycle_excludes_help() {
        assert!(!Section::CYCLE.contains(&Section::Help));
        assert_eq!(Section::Help.index(), None);
    }

    #[test]
    fn test_next_cycle_closure() {
        for start in Section::CYCLE {
            let mut s = start;
            for _ in 0..Section::CYCLE.len() {
                s = s.next();
            }
            assert_eq!(s, start);
        }
    }

    #[test]
    fn test_prev_inverts_next() {
        for start in Section::CYCLE {
            assert_eq!(start.next().prev(), start);
            assert_eq!(start.prev().next(), start);
        }
    }

    #[test]
    fn test_prev_wraps_from_first() {
        let mut state = SectionState::new();
        assert!(state.navigate(Nav::ShiftTab));
        assert_eq!(state.current(), Section::Live);
    }

    #[test]
    fn test_five_nexts_land_on_live() {
        let mut state = SectionState::new();
        for _ in 0..5 {
            state.navigate(Nav::Next);
        }
        assert_eq!(state.current().index(), Some(5));
        state.navigate(Nav::Tab);
        assert_eq!(state.current().index(), Some(0));
    }

    #[test]
    fn test_navigation_ignored_in_help() {
        let mut state = SectionState::new();
        state.toggle_help();
        for nav in [Nav::Next, Nav::Prev, Nav::Tab, Nav::ShiftTab] {
            assert!(!state.navigate(nav));
            assert_eq!(state.current(), Section::Help);
        }
    }

    #[test]
    fn test_help_returns_to_about() {
        let mut state = SectionState::new();
        state.navigate(Nav::Next);
        state.navigate(Nav::Next);
        assert_eq!(state.current(), Section::Skills);

        state.toggle_help();
        assert_eq!(state.current(), Section::Help);
        state.toggle_help();
        assert_eq!(state.current(), Section::About);
    }
}
