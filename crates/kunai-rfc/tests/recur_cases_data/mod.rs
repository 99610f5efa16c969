use kunai_rfc::rfc::ical::core::{Date, DateTime, Instant, RRule, Weekday, WeekdayNum};
use kunai_rfc::rfc::ical::recur::{OccurrenceSet, ValidationError, Window, expand, expand_general};

type Expander = fn(&RRule, &Instant, &Window) -> Result<OccurrenceSet, ValidationError>;

pub struct RecurCase {
    pub name: &'static str,
    pub rule: RRule,
    pub anchor: Instant,
    pub window: Window,
    pub expected: Option<&'static [&'static str]>,
    pub expected_len: Option<usize>,
}

fn dt(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Instant {
    Instant::DateTime(DateTime::floating(year, month, day, hour, minute, second))
}

fn date(year: u16, month: u8, day: u8) -> Instant {
    Instant::Date(Date::new(year, month, day))
}

#[expect(clippy::too_many_lines)]
pub fn recur_cases() -> Vec<RecurCase> {
    vec![
        RecurCase {
            name: "daily_count",
            rule: RRule::daily().with_count(10),
            anchor: dt(1997, 9, 2, 9, 0, 0),
            window: Window::unbounded(),
            expected: Some(&[
                "19970902T090000",
                "19970903T090000",
                "19970904T090000",
                "19970905T090000",
                "19970906T090000",
                "19970907T090000",
                "19970908T090000",
                "19970909T090000",
                "19970910T090000",
                "19970911T090000",
            ]),
            expected_len: None,
        },
        RecurCase {
            name: "daily_until",
            rule: RRule::daily().with_until(dt(1997, 12, 24, 0, 0, 0)),
            anchor: dt(1997, 9, 2, 9, 0, 0),
            window: Window::unbounded(),
            expected: None,
            expected_len: Some(113),
        },
        RecurCase {
            name: "daily_every_other_day",
            rule: RRule::daily().with_interval(2).with_count(5),
            anchor: dt(1997, 9, 2, 9, 0, 0),
            window: Window::unbounded(),
            expected: Some(&[
                "19970902T090000",
                "19970904T090000",
                "19970906T090000",
                "19970908T090000",
                "19970910T090000",
            ]),
            expected_len: None,
        },
        RecurCase {
            name: "daily_date_anchor_until_date",
            rule: RRule::daily().with_until(date(1997, 10, 5)),
            anchor: date(1997, 9, 28),
            window: Window::unbounded(),
            expected: Some(&[
                "19970928", "19970929", "19970930", "19971001", "19971002", "19971003",
                "19971004", "19971005",
            ]),
            expected_len: None,
        },
        RecurCase {
            name: "weekly_count",
            rule: RRule::weekly().with_count(4),
            anchor: dt(1997, 9, 2, 9, 0, 0),
            window: Window::unbounded(),
            expected: Some(&[
                "19970902T090000",
                "19970909T090000",
                "19970916T090000",
                "19970923T090000",
            ]),
            expected_len: None,
        },
        RecurCase {
            name: "weekly_tuesday_thursday",
            rule: RRule::weekly()
                .with_count(8)
                .with_wkst(Weekday::Sunday)
                .with_by_day(vec![
                    WeekdayNum::every(Weekday::Tuesday),
                    WeekdayNum::every(Weekday::Thursday),
                ]),
            anchor: dt(1997, 9, 2, 9, 0, 0),
            window: Window::unbounded(),
            expected: Some(&[
                "19970902T090000",
                "19970904T090000",
                "19970909T090000",
                "19970911T090000",
                "19970916T090000",
                "19970918T090000",
                "19970923T090000",
                "19970925T090000",
            ]),
            expected_len: None,
        },
        RecurCase {
            name: "biweekly_monday_wednesday_friday",
            rule: RRule::weekly()
                .with_interval(2)
                .with_count(8)
                .with_wkst(Weekday::Sunday)
                .with_by_day(vec![
                    WeekdayNum::every(Weekday::Monday),
                    WeekdayNum::every(Weekday::Wednesday),
                    WeekdayNum::every(Weekday::Friday),
                ]),
            anchor: dt(1997, 9, 1, 9, 0, 0),
            window: Window::unbounded(),
            expected: Some(&[
                "19970901T090000",
                "19970903T090000",
                "19970905T090000",
                "19970915T090000",
                "19970917T090000",
                "19970919T090000",
                "19970929T090000",
                "19971001T090000",
            ]),
            expected_len: None,
        },
        RecurCase {
            name: "monthly_first_friday_until",
            rule: RRule::monthly()
                .with_until(dt(1997, 12, 24, 0, 0, 0))
                .with_by_day(vec![WeekdayNum::nth(1, Weekday::Friday)]),
            anchor: dt(1997, 9, 5, 9, 0, 0),
            window: Window::unbounded(),
            expected: Some(&[
                "19970905T090000",
                "19971003T090000",
                "19971107T090000",
                "19971205T090000",
            ]),
            expected_len: None,
        },
        RecurCase {
            name: "monthly_second_to_last_monday",
            rule: RRule::monthly()
                .with_count(6)
                .with_by_day(vec![WeekdayNum::nth(-2, Weekday::Monday)]),
            anchor: dt(1997, 9, 22, 9, 0, 0),
            window: Window::unbounded(),
            expected: Some(&[
                "19970922T090000",
                "19971020T090000",
                "19971117T090000",
                "19971222T090000",
                "19980119T090000",
                "19980216T090000",
            ]),
            expected_len: None,
        },
        RecurCase {
            name: "monthly_third_to_last_day",
            rule: RRule::monthly().with_count(6).with_by_month_day(vec![-3]),
            anchor: dt(1997, 9, 28, 9, 0, 0),
            window: Window::unbounded(),
            expected: Some(&[
                "19970928T090000",
                "19971029T090000",
                "19971128T090000",
                "19971229T090000",
                "19980129T090000",
                "19980226T090000",
            ]),
            expected_len: None,
        },
        RecurCase {
            name: "monthly_days_2_and_15",
            rule: RRule::monthly().with_count(10).with_by_month_day(vec![2, 15]),
            anchor: dt(1997, 9, 2, 9, 0, 0),
            window: Window::unbounded(),
            expected: Some(&[
                "19970902T090000",
                "19970915T090000",
                "19971002T090000",
                "19971015T090000",
                "19971102T090000",
                "19971115T090000",
                "19971202T090000",
                "19971215T090000",
                "19980102T090000",
                "19980115T090000",
            ]),
            expected_len: None,
        },
        RecurCase {
            name: "every_tuesday_every_other_month",
            rule: RRule::monthly()
                .with_interval(2)
                .with_count(10)
                .with_by_day(vec![WeekdayNum::every(Weekday::Tuesday)]),
            anchor: dt(1997, 9, 2, 9, 0, 0),
            window: Window::unbounded(),
            expected: Some(&[
                "19970902T090000",
                "19970909T090000",
                "19970916T090000",
                "19970923T090000",
                "19970930T090000",
                "19971104T090000",
                "19971111T090000",
                "19971118T090000",
                "19971125T090000",
                "19980106T090000",
            ]),
            expected_len: None,
        },
        RecurCase {
            name: "yearly_june_july",
            rule: RRule::yearly().with_count(10).with_by_month(vec![6, 7]),
            anchor: dt(1997, 6, 10, 9, 0, 0),
            window: Window::unbounded(),
            expected: Some(&[
                "19970610T090000",
                "19970710T090000",
                "19980610T090000",
                "19980710T090000",
                "19990610T090000",
                "19990710T090000",
                "20000610T090000",
                "20000710T090000",
                "20010610T090000",
                "20010710T090000",
            ]),
            expected_len: None,
        },
        RecurCase {
            name: "yearly_every_other_year_jan_feb_mar",
            rule: RRule::yearly()
                .with_interval(2)
                .with_count(10)
                .with_by_month(vec![1, 2, 3]),
            anchor: dt(1997, 3, 10, 9, 0, 0),
            window: Window::unbounded(),
            expected: Some(&[
                "19970310T090000",
                "19990110T090000",
                "19990210T090000",
                "19990310T090000",
                "20010110T090000",
                "20010210T090000",
                "20010310T090000",
                "20030110T090000",
                "20030210T090000",
                "20030310T090000",
            ]),
            expected_len: None,
        },
        RecurCase {
            name: "yearly_days_of_year",
            rule: RRule::yearly()
                .with_interval(3)
                .with_count(10)
                .with_by_year_day(vec![1, 100, 200]),
            anchor: dt(1997, 1, 1, 9, 0, 0),
            window: Window::unbounded(),
            expected: Some(&[
                "19970101T090000",
                "19970410T090000",
                "19970719T090000",
                "20000101T090000",
                "20000409T090000",
                "20000718T090000",
                "20030101T090000",
                "20030410T090000",
                "20030719T090000",
                "20060101T090000",
            ]),
            expected_len: None,
        },
        RecurCase {
            name: "yearly_20th_monday",
            rule: RRule::yearly()
                .with_count(3)
                .with_by_day(vec![WeekdayNum::nth(20, Weekday::Monday)]),
            anchor: dt(1997, 5, 19, 9, 0, 0),
            window: Window::unbounded(),
            expected: Some(&[
                "19970519T090000",
                "19980518T090000",
                "19990517T090000",
            ]),
            expected_len: None,
        },
        RecurCase {
            name: "yearly_monday_of_week_20",
            rule: RRule::yearly()
                .with_count(3)
                .with_by_week_no(vec![20])
                .with_by_day(vec![WeekdayNum::every(Weekday::Monday)]),
            anchor: dt(1997, 5, 12, 9, 0, 0),
            window: Window::unbounded(),
            expected: Some(&[
                "19970512T090000",
                "19980511T090000",
                "19990517T090000",
            ]),
            expected_len: None,
        },
        RecurCase {
            name: "friday_the_13th",
            rule: RRule::monthly()
                .with_count(5)
                .with_by_day(vec![WeekdayNum::every(Weekday::Friday)])
                .with_by_month_day(vec![13]),
            anchor: dt(1997, 9, 2, 9, 0, 0),
            window: Window::unbounded(),
            expected: Some(&[
                "19980213T090000",
                "19980313T090000",
                "19981113T090000",
                "19990813T090000",
                "20001013T090000",
            ]),
            expected_len: None,
        },
        RecurCase {
            name: "first_saturday_following_first_sunday",
            rule: RRule::monthly()
                .with_count(6)
                .with_by_day(vec![WeekdayNum::every(Weekday::Saturday)])
                .with_by_month_day(vec![7, 8, 9, 10, 11, 12, 13]),
            anchor: dt(1997, 9, 13, 9, 0, 0),
            window: Window::unbounded(),
            expected: Some(&[
                "19970913T090000",
                "19971011T090000",
                "19971108T090000",
                "19971213T090000",
                "19980110T090000",
                "19980207T090000",
            ]),
            expected_len: None,
        },
        RecurCase {
            name: "us_election_day",
            rule: RRule::yearly()
                .with_interval(4)
                .with_count(3)
                .with_by_month(vec![11])
                .with_by_day(vec![WeekdayNum::every(Weekday::Tuesday)])
                .with_by_month_day(vec![2, 3, 4, 5, 6, 7, 8]),
            anchor: dt(1996, 11, 5, 9, 0, 0),
            window: Window::unbounded(),
            expected: Some(&[
                "19961105T090000",
                "20001107T090000",
                "20041102T090000",
            ]),
            expected_len: None,
        },
        RecurCase {
            name: "third_tuesday_wednesday_or_thursday",
            rule: RRule::monthly()
                .with_count(3)
                .with_by_day(vec![
                    WeekdayNum::every(Weekday::Tuesday),
                    WeekdayNum::every(Weekday::Wednesday),
                    WeekdayNum::every(Weekday::Thursday),
                ])
                .with_by_set_pos(vec![3]),
            anchor: dt(1997, 9, 4, 9, 0, 0),
            window: Window::unbounded(),
            expected: Some(&[
                "19970904T090000",
                "19971007T090000",
                "19971106T090000",
            ]),
            expected_len: None,
        },
        RecurCase {
            name: "second_to_last_weekday_of_month",
            rule: RRule::monthly()
                .with_count(7)
                .with_by_day(vec![
                    WeekdayNum::every(Weekday::Monday),
                    WeekdayNum::every(Weekday::Tuesday),
                    WeekdayNum::every(Weekday::Wednesday),
                    WeekdayNum::every(Weekday::Thursday),
                    WeekdayNum::every(Weekday::Friday),
                ])
                .with_by_set_pos(vec![-2]),
            anchor: dt(1997, 9, 29, 9, 0, 0),
            window: Window::unbounded(),
            expected: Some(&[
                "19970929T090000",
                "19971030T090000",
                "19971127T090000",
                "19971230T090000",
                "19980129T090000",
                "19980226T090000",
                "19980330T090000",
            ]),
            expected_len: None,
        },
        RecurCase {
            name: "hourly_every_3_hours_until",
            rule: RRule::hourly()
                .with_interval(3)
                .with_until(dt(1997, 9, 2, 17, 0, 0)),
            anchor: dt(1997, 9, 2, 9, 0, 0),
            window: Window::unbounded(),
            expected: Some(&[
                "19970902T090000",
                "19970902T120000",
                "19970902T150000",
            ]),
            expected_len: None,
        },
        RecurCase {
            name: "minutely_every_15_minutes",
            rule: RRule::minutely().with_interval(15).with_count(6),
            anchor: dt(1997, 9, 2, 9, 0, 0),
            window: Window::unbounded(),
            expected: Some(&[
                "19970902T090000",
                "19970902T091500",
                "19970902T093000",
                "19970902T094500",
                "19970902T100000",
                "19970902T101500",
            ]),
            expected_len: None,
        },
        RecurCase {
            name: "minutely_every_90_minutes",
            rule: RRule::minutely().with_interval(90).with_count(4),
            anchor: dt(1997, 9, 2, 9, 0, 0),
            window: Window::unbounded(),
            expected: Some(&[
                "19970902T090000",
                "19970902T103000",
                "19970902T120000",
                "19970902T133000",
            ]),
            expected_len: None,
        },
        RecurCase {
            name: "secondly_basic",
            rule: RRule::secondly().with_count(3),
            anchor: dt(2012, 1, 1, 9, 0, 0),
            window: Window::unbounded(),
            expected: Some(&[
                "20120101T090000",
                "20120101T090001",
                "20120101T090002",
            ]),
            expected_len: None,
        },
        RecurCase {
            name: "daily_every_20_minutes_of_working_hours",
            rule: RRule::daily()
                .with_count(5)
                .with_by_hour(vec![9, 10, 11, 12, 13, 14, 15, 16])
                .with_by_minute(vec![0, 20, 40]),
            anchor: dt(1997, 9, 2, 9, 0, 0),
            window: Window::unbounded(),
            expected: Some(&[
                "19970902T090000",
                "19970902T092000",
                "19970902T094000",
                "19970902T100000",
                "19970902T102000",
            ]),
            expected_len: None,
        },
        RecurCase {
            name: "yearly_leap_day",
            rule: RRule::yearly().with_count(4),
            anchor: date(2020, 2, 29),
            window: Window::unbounded(),
            expected: Some(&["20200229", "20240229", "20280229", "20320229"]),
            expected_len: None,
        },
        RecurCase {
            name: "window_trims_range_queries",
            rule: RRule::daily().with_count(10),
            anchor: date(2019, 1, 1),
            window: Window::between(date(2019, 1, 5), date(2019, 3, 1)),
            expected: Some(&[
                "20190105", "20190106", "20190107", "20190108", "20190109", "20190110",
            ]),
            expected_len: None,
        },
    ]
}

pub fn assert_case(case: &RecurCase) {
    let engines: [(&str, Expander); 2] = [("auto", expand), ("general", expand_general)];
    for (label, run) in engines {
        let set = run(&case.rule, &case.anchor, &case.window)
            .unwrap_or_else(|err| panic!("Case {} failed to expand: {err}", case.name));
        let rendered: Vec<String> = set.occurrences().map(ToString::to_string).collect();

        if let Some(expected) = case.expected {
            assert_eq!(
                rendered, expected,
                "Case {} ({label}) did not match",
                case.name
            );
        }

        if let Some(expected_len) = case.expected_len {
            assert_eq!(
                set.len(),
                expected_len,
                "Case {} ({label}) expected {} occurrences",
                case.name,
                expected_len
            );
        }
    }
}
