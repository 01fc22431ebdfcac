#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    pub const ALL: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
        }
    }
}

/// True when `token` is a compressed day code: only M, T, W, F, with `h`
/// allowed solely as the second half of `Th`.
pub fn is_day_run(token: &str) -> bool {
    if token.is_empty() {
        return false;
    }
    let mut prev = None;
    for c in token.chars() {
        match c {
            'M' | 'T' | 'W' | 'F' => {}
            'h' if prev == Some('T') => {}
            _ => return false,
        }
        prev = Some(c);
    }
    true
}

/// Expand a compressed day code ("MWF", "TTh") into weekdays in
/// first-occurrence order. Repeats are dropped; unknown letters are skipped.
pub fn expand(run: &str) -> Vec<Weekday> {
    let mut days = Vec::with_capacity(5);
    let mut chars = run.chars().peekable();

    while let Some(c) = chars.next() {
        let day = match c {
            'M' => Weekday::Monday,
            'W' => Weekday::Wednesday,
            'F' => Weekday::Friday,
            'T' if chars.peek() == Some(&'h') => {
                chars.next();
                Weekday::Thursday
            }
            'T' => Weekday::Tuesday,
            _ => continue,
        };
        if !days.contains(&day) {
            days.push(day);
        }
    }

    days
}

pub fn join_names(days: &[Weekday]) -> String {
    days.iter().map(|d| d.name()).collect::<Vec<_>>().join(", ")
}
