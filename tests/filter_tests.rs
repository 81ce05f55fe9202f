use chrono::NaiveDate;
use taskboard::filter::{visible, FilterState};
use taskboard::models::{Category, Priority, Task};
use taskboard::view::{self, CalendarCursor, Rendered, ViewMode};

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn today() -> NaiveDate {
    d("2024-03-15")
}

fn task(id: &str, title: &str, date: Option<&str>) -> Task {
    Task {
        id: id.into(),
        title: title.into(),
        description: String::new(),
        project: String::new(),
        priority: Priority::Low,
        owner: String::new(),
        category_id: None,
        date: date.map(d),
    }
}

fn sample() -> Vec<Task> {
    let mut a = task("1", "Write report", Some("2024-03-10"));
    a.project = "Web".into();
    a.priority = Priority::High;
    a.owner = "Ana".into();
    a.category_id = Some("c1".into());

    let mut b = task("2", "Plan sprint", Some("2024-03-20"));
    b.project = "web-app".into();
    b.owner = "bob".into();
    b.description = "Report numbers".into();

    let mut c = task("3", "Undated chore", None);
    c.priority = Priority::High;
    c.owner = "ana".into();

    let mut e = task("4", "Old bug", Some("2024-02-01"));
    e.priority = Priority::Medium;
    e.category_id = Some("c2".into());

    let f = task("5", "Same day", Some("2024-03-15"));

    vec![a, b, c, e, f]
}

/// Every combination of the seven predicates, each with a fixed value.
fn all_filters() -> Vec<FilterState> {
    (0u8..128)
        .map(|mask| FilterState {
            from: (mask & 1 != 0).then(|| d("2024-03-01")),
            to: (mask & 2 != 0).then(|| d("2024-03-31")),
            priority: (mask & 4 != 0).then_some(Priority::High),
            project: (mask & 8 != 0).then(|| "web".to_string()),
            owner: (mask & 16 != 0).then(|| "ANA".to_string()),
            nodate: mask & 32 != 0,
            overdue: mask & 64 != 0,
        })
        .collect()
}

fn without(f: &FilterState, predicate: usize) -> FilterState {
    let mut f = f.clone();
    match predicate {
        0 => f.from = None,
        1 => f.to = None,
        2 => f.priority = None,
        3 => f.project = None,
        4 => f.owner = None,
        5 => f.nodate = false,
        _ => f.overdue = false,
    }
    f
}

fn ids(tasks: &[&Task]) -> Vec<String> {
    tasks.iter().map(|t| t.id.clone()).collect()
}

#[test]
fn removing_a_predicate_never_shrinks_the_result() {
    let tasks = sample();
    for filter in all_filters() {
        let full = visible(&tasks, "", None, &filter, today()).len();
        for p in 0..7 {
            let relaxed = visible(&tasks, "", None, &without(&filter, p), today()).len();
            assert!(relaxed >= full, "dropping predicate {} shrank {:?}", p, filter);
        }
        // Search and active category are conjunctive too.
        let narrowed = visible(&tasks, "report", Some("c1"), &filter, today()).len();
        assert!(narrowed <= full);
    }
}

#[test]
fn filtering_is_idempotent() {
    let tasks = sample();
    for filter in all_filters() {
        let first = ids(&visible(&tasks, "re", None, &filter, today()));
        let second = ids(&visible(&tasks, "re", None, &filter, today()));
        assert_eq!(first, second);
    }
}

#[test]
fn empty_filter_keeps_everything_in_order() {
    let tasks = sample();
    let all = visible(&tasks, "", None, &FilterState::default(), today());
    assert_eq!(ids(&all), vec!["1", "2", "3", "4", "5"]);
}

#[test]
fn search_matches_title_or_description() {
    let tasks = sample();
    let hits = visible(&tasks, "REPORT", None, &FilterState::default(), today());
    assert_eq!(ids(&hits), vec!["1", "2"]);
}

#[test]
fn undated_tasks_fail_date_bounds_even_with_nodate() {
    let tasks = sample();
    let from = FilterState { from: Some(d("2024-01-01")), nodate: true, ..Default::default() };
    assert!(visible(&tasks, "", None, &from, today()).is_empty());

    let to = FilterState { to: Some(d("2024-12-31")), nodate: true, ..Default::default() };
    assert!(visible(&tasks, "", None, &to, today()).is_empty());

    let only_nodate = FilterState { nodate: true, ..Default::default() };
    assert_eq!(ids(&visible(&tasks, "", None, &only_nodate, today())), vec!["3"]);
}

#[test]
fn date_bounds_are_inclusive() {
    let tasks = sample();
    let f = FilterState { from: Some(d("2024-03-10")), to: Some(d("2024-03-15")), ..Default::default() };
    assert_eq!(ids(&visible(&tasks, "", None, &f, today())), vec!["1", "5"]);
}

#[test]
fn overdue_is_strictly_before_today() {
    let tasks = vec![
        task("y", "yesterday", Some("2024-03-14")),
        task("t", "today", Some("2024-03-15")),
        task("n", "no date", None),
    ];
    let f = FilterState { overdue: true, ..Default::default() };
    assert_eq!(ids(&visible(&tasks, "", None, &f, today())), vec!["y"]);
}

#[test]
fn nodate_and_overdue_together_match_nothing() {
    let tasks = sample();
    let f = FilterState { nodate: true, overdue: true, ..Default::default() };
    assert!(visible(&tasks, "", None, &f, today()).is_empty());
}

#[test]
fn project_and_owner_are_case_insensitive_substrings() {
    let tasks = sample();
    let f = FilterState { project: Some("WEB".into()), owner: Some("an".into()), ..Default::default() };
    assert_eq!(ids(&visible(&tasks, "", None, &f, today())), vec!["1"]);
}

#[test]
fn wednesday_first_has_two_leading_blanks() {
    // 2024-05-01 is a Wednesday.
    let cursor = CalendarCursor::new(2024, 5).unwrap();
    let grid = view::month_grid(cursor, &[], &[]);
    assert_eq!(grid.leading_blanks, 2);
    let cells: Vec<_> = grid.cells().take(3).collect();
    assert!(cells[0].is_none() && cells[1].is_none());
    assert_eq!(cells[2].map(|c| c.day), Some(1));
}

#[test]
fn calendar_places_events_from_the_unfiltered_list() {
    let tasks = sample();
    let cats = vec![Category { id: "c1".into(), name: "Work".into(), color: "#123456".into() }];
    let f = FilterState { nodate: true, ..Default::default() };
    let filtered = visible(&tasks, "", None, &f, today());
    assert_eq!(filtered.len(), 1);

    let cursor = CalendarCursor::new(2024, 3).unwrap();
    match view::render(ViewMode::Calendar, &filtered, &tasks, &cats, cursor) {
        Rendered::Calendar(grid) => {
            let day10 = &grid.days[9];
            assert_eq!(day10.events.len(), 1);
            assert_eq!(day10.events[0].color, "#123456");
            let day20 = &grid.days[19];
            assert_eq!(day20.events[0].color, "#6bcf6b");
            let total: usize = grid.days.iter().map(|c| c.events.len()).sum();
            assert_eq!(total, 3);
        }
        other => panic!("expected calendar, got {:?}", other),
    }
}
