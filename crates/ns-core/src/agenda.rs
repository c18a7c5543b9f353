//! Per-day event listing
//!
//! Orders the events of a [`DayCell`] for display and describes their time
//! span in words.

use crate::event::Event;
use crate::grid::DayCell;
use crate::locale::Locale;
use crate::time::Time;

/// How an event's start and end relate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timespan {
    /// Whole days over a range of dates
    AllDayRange(Time, Time),
    /// A single whole day
    AllDay(Time),
    /// Timed, starting and ending on the same day
    SameDay(Time, Time),
    /// Timed, spanning several days
    Range(Time, Time),
}

impl Timespan {
    /// Classify an event's span
    pub fn of(event: &Event) -> Self {
        let (start, end) = (event.start, event.end);

        if event.is_all_day() {
            if start != end {
                Self::AllDayRange(start, end)
            } else {
                Self::AllDay(start)
            }
        } else if start.same_day(&end) {
            Self::SameDay(start, end)
        } else {
            Self::Range(start, end)
        }
    }

    /// Describe the span, e.g. `ganztägig am 10. Februar 2024`
    pub fn describe(&self, locale: &Locale) -> String {
        let date = |t: &Time| t.to_localized_string_default(&locale.months);

        match self {
            Self::AllDayRange(start, end) => {
                format!("ganztägig vom {} bis zum {}", date(start), date(end))
            }
            Self::AllDay(day) => format!("ganztägig am {}", date(day)),
            Self::SameDay(start, end) => format!(
                "von {} Uhr bis {} Uhr",
                start.hour_minute(),
                end.hour_minute()
            ),
            Self::Range(start, end) => format!(
                "vom {} um {} Uhr bis zum {} um {} Uhr",
                date(start),
                start.hour_minute(),
                date(end),
                end.hour_minute()
            ),
        }
    }
}

/// Events of a day in display order
///
/// Events starting on a whole day come first, then timed events; each
/// group is ordered by start and then by title.
pub fn day_agenda(cell: &DayCell) -> Vec<&Event> {
    let sorted = |all_day: bool| {
        let mut group: Vec<&Event> = cell
            .events
            .iter()
            .filter(|e| e.start.is_date() == all_day)
            .collect();
        group.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.title.cmp(&b.title)));
        group
    };

    let mut agenda = sorted(true);
    agenda.extend(sorted(false));
    agenda
}

/// Label for the number of events on a day
pub fn event_count_label(count: usize, locale: &Locale) -> String {
    match count {
        0 => locale.event_none.clone(),
        1 => locale.event_singular.clone(),
        n => locale.event_plural.replace("$num", &n.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Time {
        Time::build_date(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, mi: u32) -> Time {
        Time::date_time(y, m, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_timespan_classification() {
        let locale = Locale::default();

        let range = Event::new("Parteitag", date(2024, 2, 10), date(2024, 2, 12));
        assert_eq!(
            Timespan::of(&range).describe(&locale),
            "ganztägig vom 10. Februar 2024 bis zum 12. Februar 2024"
        );

        let single = Event::new("Infostand", date(2024, 2, 10), date(2024, 2, 10));
        assert_eq!(Timespan::of(&single), Timespan::AllDay(date(2024, 2, 10)));
        assert_eq!(Timespan::of(&single).describe(&locale), "ganztägig am 10. Februar 2024");

        let evening = Event::new("Stammtisch", at(2024, 2, 10, 19, 0), at(2024, 2, 10, 22, 30));
        assert_eq!(Timespan::of(&evening).describe(&locale), "von 19:00 Uhr bis 22:30 Uhr");

        let overnight = Event::new("Hackathon", at(2024, 2, 10, 18, 0), at(2024, 2, 11, 9, 5));
        assert_eq!(
            Timespan::of(&overnight).describe(&locale),
            "vom 10. Februar 2024 um 18:00 Uhr bis zum 11. Februar 2024 um 09:05 Uhr"
        );
    }

    #[test]
    fn test_describe_uses_locale_month_names() {
        let mut locale = Locale::default();
        locale.months[1] = "Feb.".to_string();

        let single = Event::new("Infostand", date(2024, 2, 10), date(2024, 2, 10));
        assert_eq!(Timespan::of(&single).describe(&locale), "ganztägig am 10. Feb. 2024");

        let overnight = Event::new("Hackathon", at(2024, 2, 10, 18, 0), at(2024, 2, 11, 9, 5));
        assert_eq!(
            Timespan::of(&overnight).describe(&locale),
            "vom 10. Feb. 2024 um 18:00 Uhr bis zum 11. Feb. 2024 um 09:05 Uhr"
        );
    }

    #[test]
    fn test_mixed_bounds_count_as_all_day() {
        let event = Event::new("Aktion", date(2024, 2, 10), at(2024, 2, 10, 12, 0));
        assert!(matches!(Timespan::of(&event), Timespan::AllDayRange(_, _)));
    }

    #[test]
    fn test_day_agenda_order() {
        let cell = DayCell {
            date: date(2024, 2, 10),
            events: vec![
                Event::new("Zoom-Call", at(2024, 2, 10, 18, 0), at(2024, 2, 10, 19, 0)),
                Event::new("Frühstück", at(2024, 2, 10, 9, 0), at(2024, 2, 10, 10, 0)),
                Event::new("Wahlkampf", date(2024, 2, 10), date(2024, 2, 10)),
                Event::new("Aufbau", date(2024, 2, 10), date(2024, 2, 10)),
                Event::new("Klausur", date(2024, 2, 8), date(2024, 2, 11)),
                Event::new("Abendessen", at(2024, 2, 10, 18, 0), at(2024, 2, 10, 20, 0)),
            ],
        };

        let titles: Vec<_> = day_agenda(&cell).iter().map(|e| e.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Klausur", "Aufbau", "Wahlkampf", "Frühstück", "Abendessen", "Zoom-Call"]
        );
    }

    #[test]
    fn test_event_count_label() {
        let locale = Locale::default();
        assert_eq!(event_count_label(0, &locale), "Keine Termine");
        assert_eq!(event_count_label(1, &locale), "Ein Termin");
        assert_eq!(event_count_label(3, &locale), "3 Termine");

        let custom = Locale {
            event_plural: "$num of $num".to_string(),
            ..Locale::default()
        };
        assert_eq!(event_count_label(2, &custom), "2 of 2");
    }
}
