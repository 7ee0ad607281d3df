//! Shared slot-filling helpers: clause scoping, clock times, number words.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::tools::Arguments;

/// Separators between clauses of a multi-intent utterance.
static CLAUSE_SPLIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*(?:[,;]|\band\b|\bthen\b)\s*").expect("fail to create the clause pattern")
});

/// `10 AM`, `7:30 a.m.`, `12:00 PM`
static CLOCK_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})(?::(\d{2}))?\s*([ap])\.?m\b")
        .expect("fail to create the clock time pattern")
});

/// `14:30` without a meridiem.
static BARE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2}):(\d{2})\b").expect("fail to create the bare time pattern")
});

static INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\b\d+\b").expect("fail to create the integer pattern"));

/// Digits or a spelled-out number below one hundred.
pub const NUMBER: &str = r"\d+|(?:twenty|thirty|forty|fifty|sixty|seventy|eighty|ninety)(?:[\s-]+(?:one|two|three|four|five|six|seven|eight|nine))?|zero|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve|thirteen|fourteen|fifteen|sixteen|seventeen|eighteen|nineteen|an?";

const UNITS: [&str; 20] = [
    "zero",
    "one",
    "two",
    "three",
    "four",
    "five",
    "six",
    "seven",
    "eight",
    "nine",
    "ten",
    "eleven",
    "twelve",
    "thirteen",
    "fourteen",
    "fifteen",
    "sixteen",
    "seventeen",
    "eighteen",
    "nineteen",
];

const TENS: [(&str, i64); 8] = [
    ("twenty", 20),
    ("thirty", 30),
    ("forty", 40),
    ("fifty", 50),
    ("sixty", 60),
    ("seventy", 70),
    ("eighty", 80),
    ("ninety", 90),
];

// ── Clauses ──────────────────────────────────────────────────────────────────

/// Split an utterance into non-empty clauses.
pub fn clauses(text: &str) -> Vec<&str> {
    CLAUSE_SPLIT
        .split(text)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect()
}

/// First clause whose lowercased form matches `keyword`, else the whole text.
///
/// `keyword` is written against lowercased text, like activation patterns.
pub fn clause_for<'t>(text: &'t str, keyword: &Regex) -> &'t str {
    clauses(text)
        .into_iter()
        .find(|c| keyword.is_match(&c.to_lowercase()))
        .unwrap_or(text)
}

// ── Captures ─────────────────────────────────────────────────────────────────

/// Trimmed capture group `group` of the first match, if any.
pub fn capture<'t>(re: &Regex, text: &'t str, group: usize) -> Option<&'t str> {
    re.captures(text)
        .and_then(|c| c.get(group))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
}

/// Strip surrounding quotes and trailing sentence punctuation.
pub fn clean(s: &str) -> &str {
    s.trim()
        .trim_end_matches(['.', '!', '?', ',', ';', ':'])
        .trim_matches(['"', '\u{201c}', '\u{201d}'])
        .trim()
}

pub fn set(args: &mut Arguments, key: &str, value: impl Into<Value>) {
    args.insert(key.to_string(), value.into());
}

// ── Numbers ──────────────────────────────────────────────────────────────────

/// Parse digits or an English number word below one hundred.
///
/// `"25"`, `"twenty five"`, `"twenty-five"` and `"a"` (one) are accepted.
pub fn parse_number(token: &str) -> Option<i64> {
    let token = token.trim().to_lowercase();
    if let Ok(n) = token.parse::<i64>() {
        return Some(n);
    }
    if token == "a" || token == "an" {
        return Some(1);
    }
    let mut words = token.split(|c: char| c == '-' || c.is_whitespace()).filter(|w| !w.is_empty());
    let first = words.next()?;
    let second = words.next();
    if words.next().is_some() {
        return None;
    }
    if let Some(&(_, tens)) = TENS.iter().find(|(w, _)| *w == first) {
        return match second {
            None => Some(tens),
            Some(unit) => UNITS[1..10]
                .iter()
                .position(|w| *w == unit)
                .map(|i| tens + i as i64 + 1),
        };
    }
    if second.is_some() {
        return None;
    }
    UNITS.iter().position(|w| *w == first).map(|i| i as i64)
}

/// First standalone integer in the text.
pub fn first_integer(text: &str) -> Option<i64> {
    INTEGER
        .find(text)
        .and_then(|m| m.as_str().parse::<i64>().ok())
}

// ── Clock times ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meridiem {
    Am,
    Pm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
    pub meridiem: Option<Meridiem>,
}

impl ClockTime {
    /// Hour on a 24-hour clock.
    pub fn hour24(&self) -> u32 {
        match self.meridiem {
            Some(Meridiem::Am) if self.hour == 12 => 0,
            Some(Meridiem::Pm) if self.hour < 12 => self.hour + 12,
            _ => self.hour,
        }
    }

    /// `"3:00 PM"`, or `"14:30"` when no meridiem was spoken.
    pub fn display(&self) -> String {
        match self.meridiem {
            Some(Meridiem::Am) => format!("{}:{:02} AM", self.hour, self.minute),
            Some(Meridiem::Pm) => format!("{}:{:02} PM", self.hour, self.minute),
            None => format!("{}:{:02}", self.hour, self.minute),
        }
    }
}

/// First clock time in the text. Meridiem times win over bare `H:MM`.
pub fn find_clock_time(text: &str) -> Option<ClockTime> {
    for caps in CLOCK_TIME.captures_iter(text) {
        let hour = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok());
        let minute = match caps.get(2) {
            Some(m) => m.as_str().parse::<u32>().ok(),
            None => Some(0),
        };
        let meridiem = match caps.get(3).map(|m| m.as_str().to_ascii_lowercase()) {
            Some(m) if m == "p" => Meridiem::Pm,
            _ => Meridiem::Am,
        };
        if let (Some(hour), Some(minute)) = (hour, minute) {
            if (1..=12).contains(&hour) && minute < 60 {
                return Some(ClockTime {
                    hour,
                    minute,
                    meridiem: Some(meridiem),
                });
            }
        }
    }
    for caps in BARE_TIME.captures_iter(text) {
        let hour = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok());
        let minute = caps.get(2).and_then(|m| m.as_str().parse::<u32>().ok());
        if let (Some(hour), Some(minute)) = (hour, minute) {
            if hour < 24 && minute < 60 {
                return Some(ClockTime {
                    hour,
                    minute,
                    meridiem: None,
                });
            }
        }
    }
    None
}
