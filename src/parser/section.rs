use super::days::{self, Weekday};
use super::document::TableElement;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Main,
    Quiz,
    Lab,
}

impl SectionKind {
    pub fn label(self) -> &'static str {
        match self {
            SectionKind::Main => "Main",
            SectionKind::Quiz => "Quiz",
            SectionKind::Lab => "Lab",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meeting {
    pub days: Vec<Weekday>,
    pub time: String,
    /// Room, instructor, status... up to the next day run. Not decoded further.
    pub trailing: String,
}

impl Meeting {
    /// Time token plus trailing text, as rendered after "Meeting Time:".
    pub fn fragment(&self) -> String {
        if self.trailing.is_empty() {
            self.time.clone()
        } else {
            format!("{} {}", self.time, self.trailing)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    /// Text before the first day run (SLN, section id, credits).
    pub leading: String,
    pub meetings: Vec<Meeting>,
    pub text: String,
}

/// Quiz wins over Lab when both markers appear.
pub fn classify(text: &str) -> SectionKind {
    if text.contains(" QZ ") {
        SectionKind::Quiz
    } else if text.contains(" LB ") {
        SectionKind::Lab
    } else {
        SectionKind::Main
    }
}

pub fn extract(table: &TableElement) -> Section {
    let (leading, meetings) = scan_meetings(&table.text);
    Section {
        kind: classify(&table.text),
        leading,
        meetings,
        text: table.text.clone(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    ExpectDayRun,
    InDayRun,
    ExpectTime,
    InTrailing,
}

/// Walk whitespace-delimited tokens looking for `<day run> <digit...>` pairs.
/// Returns the text ahead of the first run and one Meeting per run.
pub fn scan_meetings(text: &str) -> (String, Vec<Meeting>) {
    let spans = token_spans(text);
    let mut state = ScanState::ExpectDayRun;
    let mut meetings: Vec<Meeting> = Vec::new();
    let mut leading_end = text.len();
    let mut trailing_start = 0;
    let mut i = 0;

    while i < spans.len() {
        let (start, end) = spans[i];
        let token = &text[start..end];

        match state {
            ScanState::ExpectDayRun | ScanState::InTrailing => {
                if starts_meeting(text, &spans, i) {
                    if state == ScanState::InTrailing {
                        if let Some(m) = meetings.last_mut() {
                            m.trailing = text[trailing_start..start].trim().to_string();
                        }
                    } else {
                        leading_end = start;
                    }
                    state = ScanState::InDayRun;
                    continue;
                }
            }
            ScanState::InDayRun => {
                meetings.push(Meeting {
                    days: days::expand(token),
                    time: String::new(),
                    trailing: String::new(),
                });
                state = ScanState::ExpectTime;
            }
            ScanState::ExpectTime => {
                if let Some(m) = meetings.last_mut() {
                    m.time = token.to_string();
                }
                trailing_start = end;
                state = ScanState::InTrailing;
            }
        }
        i += 1;
    }

    if state == ScanState::InTrailing {
        if let Some(m) = meetings.last_mut() {
            m.trailing = text[trailing_start..].trim().to_string();
        }
    }

    (text[..leading_end].trim().to_string(), meetings)
}

fn starts_meeting(text: &str, spans: &[(usize, usize)], i: usize) -> bool {
    let (start, end) = spans[i];
    days::is_day_run(&text[start..end])
        && spans
            .get(i + 1)
            .is_some_and(|&(s, _)| text.as_bytes()[s].is_ascii_digit())
}

/// Byte ranges of the non-whitespace runs in `text`.
fn token_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = None;
    for (idx, c) in text.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(s)) => {
                spans.push((s, idx));
                start = None;
            }
            (false, None) => start = Some(idx),
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push((s, text.len()));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use Weekday::*;

    fn section(text: &str) -> Section {
        extract(&TableElement {
            index: 4,
            has_pre: true,
            strings: vec![text.trim().to_string()],
            text: text.to_string(),
        })
    }

    #[test]
    fn classify_markers() {
        assert_eq!(classify("12345 AA QZ TTh 830-920"), SectionKind::Quiz);
        assert_eq!(classify("12345 AB LB W 130-320"), SectionKind::Lab);
        assert_eq!(classify("12345 A 5 MWF 1030-1120"), SectionKind::Main);
        assert_eq!(classify("x QZ and LB y"), SectionKind::Quiz);
        assert_eq!(classify("x LB and QZ y"), SectionKind::Quiz);
        // markers must be space-delimited
        assert_eq!(classify("QUIZ LBS"), SectionKind::Main);
    }

    #[test]
    fn single_meeting() {
        let s = section("MWF  1050A103");
        assert_eq!(s.kind, SectionKind::Main);
        assert!(s.leading.is_empty());
        assert_eq!(s.meetings.len(), 1);
        assert_eq!(s.meetings[0].days, vec![Monday, Wednesday, Friday]);
        assert_eq!(s.meetings[0].fragment(), "1050A103");
    }

    #[test]
    fn leading_time_and_trailing() {
        let s = section(
            "Restr  12345 A  5       MWF    1030-1120  KNE  120      Smith,Jane   Open  120/ 150",
        );
        assert_eq!(s.leading, "Restr  12345 A  5");
        let m = &s.meetings[0];
        assert_eq!(m.time, "1030-1120");
        assert_eq!(m.trailing, "KNE  120      Smith,Jane   Open  120/ 150");
    }

    #[test]
    fn multiple_meetings_in_source_order() {
        let s = section("12346 AA QZ  TTh  830-920  MGH 241\n             F  1130-1220  SAV 130 Lee,K");
        assert_eq!(s.kind, SectionKind::Quiz);
        assert_eq!(s.meetings.len(), 2);
        assert_eq!(s.meetings[0].days, vec![Tuesday, Thursday]);
        assert_eq!(s.meetings[0].time, "830-920");
        assert_eq!(s.meetings[0].trailing, "MGH 241");
        assert_eq!(s.meetings[1].days, vec![Friday]);
        assert_eq!(s.meetings[1].trailing, "SAV 130 Lee,K");
    }

    #[test]
    fn day_run_needs_following_digit() {
        let s = section("12347 B  5  to be arranged  T BA");
        assert!(s.meetings.is_empty());
        assert_eq!(s.leading, "12347 B  5  to be arranged  T BA");
    }

    #[test]
    fn run_must_be_whole_token() {
        let (_, meetings) = scan_meetings("SMWF 1030 MWFX 1130");
        assert!(meetings.is_empty());
    }

    #[test]
    fn empty_text() {
        let (leading, meetings) = scan_meetings("");
        assert!(leading.is_empty());
        assert!(meetings.is_empty());
    }
}
