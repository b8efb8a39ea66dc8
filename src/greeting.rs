//! Time-of-day greeting for the content heading.

#[cfg(test)]
#[path = "greeting_test.rs"]
mod greeting_test;

/// Greeting bucket selected from the current hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Greeting {
    Morning,
    Afternoon,
    Evening,
}

impl Greeting {
    /// Pick the greeting for `hour`: `[0,12)` morning, `[12,18)` afternoon,
    /// everything later evening.
    #[must_use]
    pub fn for_hour(hour: u32) -> Self {
        if hour < 12 {
            Self::Morning
        } else if hour < 18 {
            Self::Afternoon
        } else {
            Self::Evening
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Morning => "Good morning!",
            Self::Afternoon => "Good afternoon!",
            Self::Evening => "Good evening!",
        }
    }

    /// Full heading text: greeting followed by the welcome phrase.
    #[must_use]
    pub fn heading(self, welcome: &str) -> String {
        format!("{} {welcome}", self.as_str())
    }
}
