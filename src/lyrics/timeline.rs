//! LRC timeline
//!
//! Parses line-oriented timestamped lyrics:
//! [mm:ss] Lyrics line here
//! [mm:ss.fff] Another line
//!
//! Untagged lines (metadata headers, blank lines) are skipped. A timeline is
//! never mutated after parsing; a new song gets a new timeline.

use once_cell::sync::Lazy;
use regex::Regex;

static TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[([0-9]+):([0-9]+)(?:\.([0-9]+))?\](.*)").expect("static lrc tag pattern")
});

/// A single timestamped lyric line
#[derive(Debug, Clone, PartialEq)]
pub struct LyricLine {
    /// Offset from the start of the track, in seconds
    pub time: f64,
    /// Trimmed, non-empty lyric text
    pub text: String,
}

impl LyricLine {
    pub fn new(time: f64, text: impl Into<String>) -> Self {
        Self {
            time,
            text: text.into(),
        }
    }
}

/// Ordered lyric lines for one piece of media
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LyricTimeline {
    lines: Vec<LyricLine>,
}

impl LyricTimeline {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse raw LRC text. Never fails: lines that don't parse are dropped.
    pub fn parse(raw: &str) -> Self {
        let lines = raw.split('\n').filter_map(parse_line).collect();
        Self { lines }
    }

    pub fn lines(&self) -> &[LyricLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Index of the line active at `time` seconds.
    ///
    /// The active line is the one just before the first line that starts
    /// strictly after `time`; past the final cue the last line stays active.
    /// When even the first line starts later, the last line still wins if it
    /// has already started, so out-of-order input never hides a passed cue.
    /// On ascending input that is the last line with `line.time <= time`, and
    /// among equal timestamps the latest in source order wins.
    ///
    /// Returns `None` before any cue, on an empty timeline and for a NaN
    /// time. Recomputed from scratch on every call so seeks never desync.
    pub fn active_index(&self, time: f64) -> Option<usize> {
        if time.is_nan() || self.lines.is_empty() {
            return None;
        }
        let last = self.lines.len() - 1;
        match self.lines.iter().position(|l| time < l.time) {
            Some(0) if time >= self.lines[last].time => Some(last),
            Some(0) => None,
            Some(next) => Some(next - 1),
            None => Some(last),
        }
    }

    pub fn active_line(&self, time: f64) -> Option<&LyricLine> {
        self.active_index(time).and_then(|i| self.lines.get(i))
    }
}

fn parse_line(line: &str) -> Option<LyricLine> {
    let caps = TAG_RE.captures(line)?;
    let minutes: u64 = caps.get(1)?.as_str().parse().ok()?;
    let seconds: u64 = caps.get(2)?.as_str().parse().ok()?;
    let millis = caps.get(3).map_or(0, |m| fraction_millis(m.as_str()));
    let text = caps.get(4)?.as_str().trim();
    if text.is_empty() {
        return None;
    }

    let time = minutes as f64 * 60.0 + seconds as f64 + millis as f64 / 1000.0;
    Some(LyricLine::new(time, text))
}

/// Decimal fraction digits as milliseconds: pad or truncate to three digits,
/// so "5" and "50" both mean 500ms.
fn fraction_millis(digits: &str) -> u32 {
    digits
        .bytes()
        .chain(std::iter::repeat(b'0'))
        .take(3)
        .fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timeline(cues: &[(f64, &str)]) -> LyricTimeline {
        LyricTimeline {
            lines: cues.iter().map(|&(t, s)| LyricLine::new(t, s)).collect(),
        }
    }

    #[test]
    fn test_parse_lrc() {
        let parsed = LyricTimeline::parse("[01:02.500]Hello\n[01:05]World");
        assert_eq!(
            parsed.lines(),
            &[LyricLine::new(62.5, "Hello"), LyricLine::new(65.0, "World")]
        );
    }

    #[test]
    fn test_fraction_is_padded_to_millis() {
        for raw in ["[00:01.5]x", "[00:01.50]x", "[00:01.500]x"] {
            let parsed = LyricTimeline::parse(raw);
            assert_eq!(parsed.len(), 1, "{raw}");
            assert!((parsed.lines()[0].time - 1.5).abs() < 1e-9, "{raw}");
        }
        assert_eq!(fraction_millis("05"), 50);
        assert_eq!(fraction_millis("123456"), 123);
    }

    #[test]
    fn test_untagged_and_blank_lines_dropped() {
        let lrc = "[ti:Test Song]\n\
                   plain text\n\
                   [00:03.00]   \n\
                   [00:04.00]Kept\n\
                   [xx:01]broken\n";
        let parsed = LyricTimeline::parse(lrc);
        assert_eq!(parsed.lines(), &[LyricLine::new(4.0, "Kept")]);
    }

    #[test]
    fn test_crlf_input() {
        let parsed = LyricTimeline::parse("[00:01]a\r\n[00:02]b\r\n");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed.lines()[0].text, "a");
    }

    #[test]
    fn test_source_order_preserved() {
        let parsed = LyricTimeline::parse("[00:09]late\n[00:01]early");
        assert_eq!(parsed.lines()[0].text, "late");
        assert_eq!(parsed.lines()[1].text, "early");
    }

    #[test]
    fn test_unparseable_input_is_empty() {
        assert!(LyricTimeline::parse("").is_empty());
        assert!(LyricTimeline::parse("no tags here\n[ar:someone]").is_empty());
        assert!(LyricTimeline::parse("[99999999999999999999999:00]overflow").is_empty());
    }

    #[test]
    fn test_reparse_is_stable() {
        let lrc = "[00:01.2]one\n[00:02.34]two\n[00:02.34]two again";
        assert_eq!(LyricTimeline::parse(lrc), LyricTimeline::parse(lrc));
    }

    #[test]
    fn test_active_index_range() {
        let tl = timeline(&[(10.0, "a"), (20.0, "b")]);
        assert_eq!(tl.active_index(5.0), None);
        assert_eq!(tl.active_index(10.0), Some(0));
        assert_eq!(tl.active_index(15.0), Some(0));
        assert_eq!(tl.active_index(20.0), Some(1));
        assert_eq!(tl.active_index(999.0), Some(1));
    }

    #[test]
    fn test_active_index_tie_break() {
        let tl = timeline(&[(10.0, "a"), (10.0, "b")]);
        assert_eq!(tl.active_index(10.0), Some(1));
        assert_eq!(tl.active_line(10.0).map(|l| l.text.as_str()), Some("b"));

        let tl = timeline(&[(5.0, "x"), (10.0, "a"), (10.0, "b"), (12.0, "c")]);
        assert_eq!(tl.active_index(11.0), Some(2));
    }

    #[test]
    fn test_active_index_after_seek_back() {
        let tl = timeline(&[(1.0, "a"), (2.0, "b"), (3.0, "c")]);
        assert_eq!(tl.active_index(2.5), Some(1));
        assert_eq!(tl.active_index(0.5), None);
        assert_eq!(tl.active_index(3.0), Some(2));
        assert_eq!(tl.active_index(1.0), Some(0));
    }

    #[test]
    fn test_active_index_unsorted_input() {
        let tl = LyricTimeline::parse("[00:09]late\n[00:01]early");
        assert_eq!(tl.active_index(0.5), None);
        assert_eq!(tl.active_index(5.0), Some(1));
        assert_eq!(tl.active_line(5.0).map(|l| l.text.as_str()), Some("early"));
        assert_eq!(tl.active_index(10.0), Some(1));
    }

    #[test]
    fn test_active_index_invalid_time() {
        let empty = LyricTimeline::empty();
        for t in [0.0, -1.0, f64::NAN, f64::INFINITY, 1e9] {
            assert_eq!(empty.active_index(t), None);
        }

        let tl = timeline(&[(0.0, "a")]);
        assert_eq!(tl.active_index(f64::NAN), None);
        assert_eq!(tl.active_index(-0.5), None);
        assert_eq!(tl.active_index(0.0), Some(0));
    }
}
