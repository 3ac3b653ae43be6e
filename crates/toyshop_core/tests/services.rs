use chrono::{Local, NaiveDate};
use toyshop_core::db::open_db_in_memory;
use toyshop_core::{
    EventService, Money, ServiceError, SqliteEventRepository, SqliteToyRepository, ToyDraft,
    ToyRow, ToyService,
};

fn draft(name: &str, major: i64, age_lower: u32, age_upper: u32) -> ToyDraft {
    ToyDraft {
        name: name.to_string(),
        cost: Money::from_major(major),
        quantity: 3,
        age_lower,
        age_upper,
    }
}

#[test]
fn toy_catalog_rows_show_inclusive_age_label() {
    let conn = open_db_in_memory().unwrap();
    let service = ToyService::new(SqliteToyRepository::try_new(&conn).unwrap());

    let toy = service.add_toy(&draft("Lego", 150, 3, 9)).unwrap();

    assert_eq!(
        service.catalog().unwrap(),
        vec![ToyRow {
            id: toy.id().unwrap(),
            name: "Lego".to_string(),
            cost: "150.00".to_string(),
            quantity: 3,
            ages: "3 - 9".to_string(),
        }]
    );
}

#[test]
fn edit_keeps_the_same_age_convention_as_add() {
    let conn = open_db_in_memory().unwrap();
    let service = ToyService::new(SqliteToyRepository::try_new(&conn).unwrap());

    let toy = service.add_toy(&draft("Puzzle", 20, 2, 5)).unwrap();
    let id = toy.id().unwrap();
    let edited = service.edit_toy(id, &draft("Puzzle", 25, 2, 5)).unwrap();

    assert_eq!(edited.age, toy.age);
    assert_eq!(service.toy(id).unwrap().age, toy.age);
    assert_eq!(service.search_by_age(2, 5, "").unwrap().len(), 1);
}

#[test]
fn toy_validation_blocks_bad_input_before_storage() {
    let conn = open_db_in_memory().unwrap();
    let service = ToyService::new(SqliteToyRepository::try_new(&conn).unwrap());

    assert!(matches!(
        service.add_toy(&draft(" ", 10, 1, 4)),
        Err(ServiceError::EmptyName)
    ));
    assert!(matches!(
        service.add_toy(&draft("Kite", 10, 6, 4)),
        Err(ServiceError::InvalidAgeRange { lower: 6, upper: 4 })
    ));
    assert!(matches!(
        service.search_by_age(6, 4, "cost"),
        Err(ServiceError::InvalidAgeRange { .. })
    ));
    assert!(service.catalog().unwrap().is_empty());
}

#[test]
fn toy_service_search_budget_and_price_increase() {
    let conn = open_db_in_memory().unwrap();
    let service = ToyService::new(SqliteToyRepository::try_new(&conn).unwrap());

    service.add_toy(&draft("Car", 30, 3, 10)).unwrap();
    service.add_toy(&draft("Ball", 10, 3, 10)).unwrap();

    let rows = service.search_rows(4, 6, "cost").unwrap();
    let names: Vec<_> = rows.iter().map(|row| row.name.as_str()).collect();
    assert_eq!(names, ["Ball", "Car"]);

    let best = service
        .most_expensive(4, 6, Money::from_major(20))
        .unwrap()
        .unwrap();
    assert_eq!(best.name, "Ball");
    assert!(service
        .most_expensive(4, 6, Money::from_major(5))
        .unwrap()
        .is_none());

    assert_eq!(service.increase_cost(4, 6, 200).unwrap(), 2);
    let best = service
        .most_expensive(4, 6, Money::from_major(100))
        .unwrap()
        .unwrap();
    assert_eq!(best.cost, Money::from_major(60));
}

#[test]
fn removing_missing_toy_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = ToyService::new(SqliteToyRepository::try_new(&conn).unwrap());

    assert!(matches!(
        service.remove_toy(9),
        Err(ServiceError::NotFound { entity: "toy", id: 9 })
    ));
    assert_eq!(service.remove_by_name("Nothing").unwrap(), 0);
}

#[test]
fn event_service_validates_and_lists() {
    let conn = open_db_in_memory().unwrap();
    let service = EventService::new(SqliteEventRepository::try_new(&conn).unwrap());
    let day = NaiveDate::from_ymd_opt(2024, 12, 24).unwrap();

    assert!(matches!(
        service.add_event("\t", day),
        Err(ServiceError::EmptyDescription)
    ));

    let event = service.add_event("Christmas sale", day).unwrap();
    let edited = service
        .edit_event(event.id(), "Christmas sale, all day", day)
        .unwrap();
    assert_eq!(service.event(event.id()).unwrap(), edited);

    let rows = service.catalog().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].date, "2024-12-24");
    assert_eq!(rows[0].description, "Christmas sale, all day");

    service.remove_event(event.id()).unwrap();
    assert!(service.events_on(day).unwrap().is_empty());
    assert!(matches!(
        service.remove_event(event.id()),
        Err(ServiceError::NotFound { entity: "event", .. })
    ));
}

#[test]
fn todays_events_lists_only_today() {
    let conn = open_db_in_memory().unwrap();
    let service = EventService::new(SqliteEventRepository::try_new(&conn).unwrap());
    let today = Local::now().date_naive();

    service.add_event("Open the shop", today).unwrap();
    service
        .add_event("Yesterday's count", today.pred_opt().unwrap())
        .unwrap();

    let todays = service.todays_events().unwrap();
    assert_eq!(todays.len(), 1);
    assert_eq!(todays[0].description, "Open the shop");
}

#[test]
fn toy_rows_serialize_for_json_output() {
    let row = ToyRow {
        id: 1,
        name: "Lego".to_string(),
        cost: "150.00".to_string(),
        quantity: 2,
        ages: "3 - 9".to_string(),
    };
    let json = serde_json::to_value(&row).unwrap();
    assert_eq!(json["cost"], "150.00");
    assert_eq!(json["ages"], "3 - 9");
}
