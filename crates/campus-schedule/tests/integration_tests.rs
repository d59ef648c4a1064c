//! Integration tests for campus-schedule
//!
//! Schedules are composed over a real relationship graph held in the
//! in-memory and SQLite stores.

use campus_domain::{
    uris, Group, HasRelationshipLinks, LinkStore, ObjectStore, Participant, Person, Registry, Resource, Section,
};
use campus_relationship::{EngineConfig, RelationshipEngine};
use campus_schedule::{
    Activity, ComposerConfig, PeriodSlot, ScheduleComposer, ScheduleError, SchooldaySlot, SchooldayTemplate, Term,
    Timetable, TimetableDay, TimetableKey, TimetableModel, TimetableRegistry, WeekdayTemplates,
};
use campus_store::{MemoryStore, SqliteStore};
use chrono::{NaiveDate, Offset, Utc};
use std::fmt::Display;
use std::sync::Arc;

const WEEK: [&str; 5] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];

fn date(d: u32) -> NaiveDate {
    // September 2024; the 2nd is a Monday
    NaiveDate::from_ymd_opt(2024, 9, d).unwrap()
}

fn slot(hour: u32) -> SchooldaySlot {
    SchooldaySlot::at(hour, 0, 45).unwrap()
}

fn registry() -> Arc<Registry> {
    Arc::new(Registry::standard().unwrap())
}

/// One week, periods "1".."3" at 9, 10 and 11 every weekday
fn timetables() -> TimetableRegistry {
    let template: SchooldayTemplate = [slot(9), slot(10), slot(11)].into_iter().collect();
    let mut timetables = TimetableRegistry::new();
    timetables
        .add_term("autumn", Term::new("Autumn", date(2), date(6)).unwrap())
        .unwrap();
    timetables
        .add_schema(
            "weekly",
            TimetableModel::weekly_default(WeekdayTemplates::uniform(template)).unwrap(),
        )
        .unwrap();
    timetables
}

fn key() -> TimetableKey {
    TimetableKey::parse("autumn.weekly").unwrap()
}

/// A timetable with one activity in `period` every day
fn daily(title: &str, period: &str) -> Timetable {
    let mut tt = Timetable::new(WEEK).unwrap();
    for day in WEEK {
        tt.set_day(day, TimetableDay::new(["1", "2", "3"]).unwrap()).unwrap();
        tt.add_activity(day, period, Activity::new(title)).unwrap();
    }
    tt
}

fn join<S>(engine: &mut RelationshipEngine, store: &mut S, member: &impl HasRelationshipLinks, group: &impl HasRelationshipLinks)
where
    S: LinkStore,
    S::Error: Display,
{
    engine
        .relate(
            store,
            &uris::MEMBERSHIP,
            Participant::new(member.object_ref(), uris::MEMBER),
            Participant::new(group.object_ref(), uris::GROUP),
            None,
        )
        .unwrap();
}

fn titles(meetings: &[campus_schedule::Meeting]) -> Vec<&str> {
    meetings.iter().map(|m| m.title.as_str()).collect()
}

#[test]
fn test_composition_degrades_on_broken_peer() {
    let registry = registry();
    let mut engine = RelationshipEngine::default_config(registry.clone());
    let mut store = MemoryStore::new();
    let mut timetables = timetables();

    let a = Person::new("Ona");
    let b = Group::new("Choir");
    let c = Group::new("Chess club");
    store.insert_object(b.object_ref()).unwrap();
    store.insert_object(c.object_ref()).unwrap();
    join(&mut engine, &mut store, &a, &b);
    join(&mut engine, &mut store, &a, &c);

    timetables.attach(a.id, key(), daily("Homeroom", "1")).unwrap();
    timetables.attach(b.id, key(), daily("Choir", "2")).unwrap();
    timetables.attach(c.id, key(), daily("Chess", "3")).unwrap();

    // C disappears without its links being torn down
    store.remove_object(c.id).unwrap();

    let composer = ScheduleComposer::default_config(registry).unwrap();
    let schedule = composer.compose(&store, &timetables, &a, date(2), date(2)).unwrap();

    assert_eq!(titles(schedule.meetings()), vec!["Homeroom", "Choir"]);
    assert!(schedule.is_partial());
    assert_eq!(schedule.skipped().len(), 1);
    assert_eq!(schedule.skipped()[0].peer, c.object_ref());
    assert_eq!(schedule.skipped()[0].via, uris::MEMBERSHIP);
}

#[test]
fn test_unresolvable_peer_timetable_is_skipped() {
    let registry = registry();
    let mut engine = RelationshipEngine::default_config(registry.clone());
    let mut store = MemoryStore::new();
    let mut timetables = timetables();
    timetables
        .add_term("spring", Term::new("Spring", date(2), date(6)).unwrap())
        .unwrap();

    let a = Person::new("Ona");
    let b = Group::new("Choir");
    let c = Group::new("Chess club");
    store.insert_object(b.object_ref()).unwrap();
    store.insert_object(c.object_ref()).unwrap();
    join(&mut engine, &mut store, &a, &b);
    join(&mut engine, &mut store, &a, &c);

    timetables.attach(b.id, key(), daily("Choir", "2")).unwrap();
    timetables
        .attach(c.id, TimetableKey::parse("spring.weekly").unwrap(), daily("Chess", "3"))
        .unwrap();
    timetables.remove_term("spring");

    let composer = ScheduleComposer::default_config(registry).unwrap();
    let schedule = composer.compose(&store, &timetables, &a, date(2), date(6)).unwrap();

    assert_eq!(schedule.len(), 5);
    assert!(schedule.meetings().iter().all(|m| m.source == b.id));
    assert_eq!(schedule.skipped().len(), 1);
    assert!(schedule.skipped()[0].reason.contains("spring"));
}

#[test]
fn test_own_timetable_failure_propagates() {
    let registry = registry();
    let store = MemoryStore::new();
    let mut timetables = timetables();
    let a = Person::new("Ona");
    timetables.attach(a.id, key(), daily("Homeroom", "1")).unwrap();
    timetables.remove_schema("weekly");

    let composer = ScheduleComposer::default_config(registry).unwrap();
    let err = composer.compose(&store, &timetables, &a, date(2), date(6)).unwrap_err();
    assert!(matches!(err, ScheduleError::Source(_)));
}

#[test]
fn test_exception_day_overrides_template() {
    let registry = registry();
    let mut engine = RelationshipEngine::default_config(registry.clone());
    let mut store = MemoryStore::new();
    let mut timetables = timetables();

    let student = Person::new("Jonas");
    let section = Section::new("Math 7A");
    store.insert_object(section.object_ref()).unwrap();
    join(&mut engine, &mut store, &student, &section);

    let mut tt = Timetable::new(WEEK).unwrap();
    for day in WEEK {
        tt.set_day(day, TimetableDay::new(["1", "2", "3"]).unwrap()).unwrap();
        tt.add_activity(day, "1", Activity::new("Math")).unwrap();
        tt.add_activity(day, "3", Activity::new("Math lab")).unwrap();
    }
    timetables.attach(section.id, key(), tt).unwrap();

    // Shortened Wednesday: only period 3, moved to 8:00
    timetables
        .update_schema("weekly", |model| {
            model.add_exception_day(date(4), vec![PeriodSlot::new("3", slot(8))])
        })
        .unwrap();

    let composer = ScheduleComposer::default_config(registry).unwrap();
    let wednesday = composer.compose(&store, &timetables, &student, date(4), date(4)).unwrap();
    assert_eq!(titles(wednesday.meetings()), vec!["Math lab"]);
    assert_eq!(wednesday.meetings()[0].start, date(4).and_hms_opt(8, 0, 0).unwrap().and_utc());

    let tuesday = composer.compose(&store, &timetables, &student, date(3), date(3)).unwrap();
    assert_eq!(titles(tuesday.meetings()), vec!["Math", "Math lab"]);
}

#[test]
fn test_duplicates_through_different_relationships_are_kept() {
    let registry = registry();
    let mut engine = RelationshipEngine::default_config(registry.clone());
    let mut store = MemoryStore::new();
    let mut timetables = timetables();

    let teacher = Person::new("Ms. Kazlauskiene");
    let section = Section::new("Physics 9B");
    store.insert_object(section.object_ref()).unwrap();
    join(&mut engine, &mut store, &teacher, &section);
    engine
        .relate(
            &mut store,
            &uris::INSTRUCTION,
            Participant::new(teacher.object_ref(), uris::INSTRUCTOR),
            Participant::new(section.object_ref(), uris::SECTION),
            None,
        )
        .unwrap();
    timetables.attach(section.id, key(), daily("Physics", "2")).unwrap();

    let composer = ScheduleComposer::default_config(registry).unwrap();
    let schedule = composer.compose(&store, &timetables, &teacher, date(2), date(2)).unwrap();

    assert_eq!(schedule.len(), 2);
    let (first, second) = (&schedule.meetings()[0], &schedule.meetings()[1]);
    assert_eq!(first.start, second.start);
    let mut via: Vec<_> = schedule.meetings().iter().filter_map(|m| m.via.clone()).collect();
    via.sort();
    let mut expected = vec![uris::MEMBERSHIP, uris::INSTRUCTION];
    expected.sort();
    assert_eq!(via, expected);
}

#[test]
fn test_composition_is_one_hop() {
    let registry = registry();
    let mut engine = RelationshipEngine::new(registry.clone(), EngineConfig::nested_groups());
    let mut store = MemoryStore::new();
    let mut timetables = timetables();

    let pupil = Person::new("Ona");
    let form = Group::new("Form 7");
    let school = Group::new("Whole school");
    store.insert_object(form.object_ref()).unwrap();
    store.insert_object(school.object_ref()).unwrap();
    join(&mut engine, &mut store, &pupil, &form);
    join(&mut engine, &mut store, &form, &school);

    timetables.attach(form.id, key(), daily("Form period", "1")).unwrap();
    timetables.attach(school.id, key(), daily("Assembly", "2")).unwrap();

    let composer = ScheduleComposer::default_config(registry).unwrap();
    let pupil_schedule = composer.compose(&store, &timetables, &pupil, date(2), date(2)).unwrap();
    assert_eq!(titles(pupil_schedule.meetings()), vec!["Form period"]);

    let form_schedule = composer.compose(&store, &timetables, &form, date(2), date(2)).unwrap();
    assert_eq!(titles(form_schedule.meetings()), vec!["Form period", "Assembly"]);
    assert!(form_schedule.meetings()[0].via.is_none());
}

#[test]
fn test_resource_sees_booking_sections() {
    let registry = registry();
    let mut engine = RelationshipEngine::default_config(registry.clone());
    let mut store = SqliteStore::with_registry(":memory:", registry.clone()).unwrap();
    let mut timetables = timetables();

    let lab = Resource::new("Chemistry lab");
    let morning = Section::new("Chemistry 10A");
    let afternoon = Section::new("Chemistry 10B");
    for section in [&morning, &afternoon] {
        store.insert_object(section.object_ref()).unwrap();
        engine
            .relate(
                &mut store,
                &uris::SECTION_BOOKING,
                Participant::new(section.object_ref(), uris::BOOKING_SECTION),
                Participant::new(lab.object_ref(), uris::BOOKED_RESOURCE),
                None,
            )
            .unwrap();
    }
    timetables.attach(afternoon.id, key(), daily("Chemistry 10B", "3")).unwrap();
    timetables.attach(morning.id, key(), daily("Chemistry 10A", "1")).unwrap();

    let composer = ScheduleComposer::default_config(registry).unwrap();
    let schedule = composer.compose(&store, &timetables, &lab, date(2), date(3)).unwrap();

    assert_eq!(
        titles(schedule.meetings()),
        vec!["Chemistry 10A", "Chemistry 10B", "Chemistry 10A", "Chemistry 10B"]
    );
    assert!(schedule.meetings().windows(2).all(|w| w[0].start <= w[1].start));
    assert_eq!(schedule.on(date(3), &Utc.fix()).count(), 2);
}

#[test]
fn test_own_only_and_composite_keys() {
    let registry = registry();
    let mut engine = RelationshipEngine::default_config(registry.clone());
    let mut store = MemoryStore::new();
    let mut timetables = timetables();
    timetables
        .add_term("spring", Term::new("Spring", date(9), date(13)).unwrap())
        .unwrap();

    let pupil = Person::new("Ona");
    let choir = Group::new("Choir");
    store.insert_object(choir.object_ref()).unwrap();
    join(&mut engine, &mut store, &pupil, &choir);
    timetables.attach(pupil.id, key(), daily("Homeroom", "1")).unwrap();
    timetables
        .attach(choir.id, TimetableKey::parse("spring.weekly").unwrap(), daily("Choir", "2"))
        .unwrap();

    let own_only = ScheduleComposer::new(registry.clone(), &ComposerConfig::own_only()).unwrap();
    let schedule = own_only.compose(&store, &timetables, &pupil, date(2), date(13)).unwrap();
    assert_eq!(schedule.len(), 5);

    let composer = ScheduleComposer::default_config(registry).unwrap();
    let keys = composer.composite_keys(&store, &timetables, &pupil).unwrap();
    let keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
    assert_eq!(keys, vec!["autumn.weekly", "spring.weekly"]);

    let schedule = composer.compose(&store, &timetables, &pupil, date(2), date(13)).unwrap();
    assert_eq!(schedule.len(), 10);
}

#[test]
fn test_composite_keys_skip_the_same_peers_as_compose() {
    let registry = registry();
    let mut engine = RelationshipEngine::default_config(registry.clone());
    let mut store = MemoryStore::new();
    let mut timetables = timetables();
    timetables
        .add_term("spring", Term::new("Spring", date(9), date(13)).unwrap())
        .unwrap();

    let pupil = Person::new("Ona");
    let (choir, chess) = (Group::new("Choir"), Group::new("Chess club"));
    for group in [&choir, &chess] {
        store.insert_object(group.object_ref()).unwrap();
        join(&mut engine, &mut store, &pupil, group);
    }
    timetables.attach(choir.id, key(), daily("Choir", "2")).unwrap();
    timetables
        .attach(chess.id, TimetableKey::parse("spring.weekly").unwrap(), daily("Chess", "3"))
        .unwrap();
    store.remove_object(chess.id).unwrap();

    let composer = ScheduleComposer::default_config(registry).unwrap();
    let keys = composer.composite_keys(&store, &timetables, &pupil).unwrap();
    assert_eq!(keys.into_iter().collect::<Vec<_>>(), vec![key()]);

    let schedule = composer.compose(&store, &timetables, &pupil, date(2), date(13)).unwrap();
    assert_eq!(schedule.skipped().len(), 1);
    assert_eq!(schedule.skipped()[0].peer, chess.object_ref());
}

#[test]
fn test_invalid_range() {
    let composer = ScheduleComposer::default_config(registry()).unwrap();
    let err = composer
        .compose(&MemoryStore::new(), &timetables(), &Person::new("Ona"), date(6), date(2))
        .unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidRange { .. }));
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn broken_peers_never_fail_composition(peers in proptest::collection::vec(any::<bool>(), 0..8)) {
            let registry = registry();
            let mut engine = RelationshipEngine::default_config(registry.clone());
            let mut store = MemoryStore::new();
            let mut timetables = timetables();
            let pupil = Person::new("Ona");

            let mut broken = 0;
            for (i, healthy) in peers.iter().enumerate() {
                let group = Group::new(format!("Club {}", i));
                store.insert_object(group.object_ref()).unwrap();
                join(&mut engine, &mut store, &pupil, &group);
                timetables.attach(group.id, key(), daily("Club", "1")).unwrap();
                if !healthy {
                    store.remove_object(group.id).unwrap();
                    broken += 1;
                }
            }

            let composer = ScheduleComposer::default_config(registry).unwrap();
            let schedule = composer.compose(&store, &timetables, &pupil, date(2), date(6)).unwrap();
            prop_assert_eq!(schedule.skipped().len(), broken);
            prop_assert_eq!(schedule.len(), (peers.len() - broken) * 5);
            prop_assert!(schedule.meetings().windows(2).all(|w| w[0].start <= w[1].start));
        }
    }
}
