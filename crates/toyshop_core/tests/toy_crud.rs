use toyshop_core::db::open_db_in_memory;
use toyshop_core::{
    AgeRange, ModelError, Money, RepoError, SqliteToyRepository, Toy, ToyRepository,
};

fn ages(lower: u32, upper: u32) -> AgeRange {
    AgeRange::new(lower, upper).unwrap()
}

#[test]
fn create_then_find_by_id_roundtrips() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteToyRepository::try_new(&conn).unwrap();

    let created = repo
        .create("Lego", Money::from_minor_units(14_999), 4, ages(6, 12))
        .unwrap();
    let loaded = repo.find_by_id(created.id().unwrap()).unwrap();

    assert_eq!(loaded, created);
    assert_eq!(loaded.cost.to_string(), "149.99");
}

#[test]
fn age_range_is_stored_half_open_on_create_and_update() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteToyRepository::try_new(&conn).unwrap();

    let mut toy = repo
        .create("Puzzle", Money::from_major(20), 2, ages(3, 9))
        .unwrap();
    let id = toy.id().unwrap();
    assert_eq!(stored_bounds(&conn, id), (3, 10));

    repo.update(&toy).unwrap();
    assert_eq!(stored_bounds(&conn, id), (3, 10));

    toy.age = ages(4, 8);
    repo.update(&toy).unwrap();
    assert_eq!(stored_bounds(&conn, id), (4, 9));
    assert_eq!(repo.find_by_id(id).unwrap().age, ages(4, 8));
}

#[test]
fn update_rewrites_every_field() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteToyRepository::try_new(&conn).unwrap();

    let mut toy = repo
        .create("Ball", Money::from_major(5), 10, ages(1, 5))
        .unwrap();
    toy.name = "Big ball".to_string();
    toy.cost = Money::from_minor_units(725);
    toy.quantity = 0;
    repo.update(&toy).unwrap();

    assert_eq!(repo.find_by_id(toy.id().unwrap()).unwrap(), toy);
}

#[test]
fn update_of_unsaved_or_vanished_toy_fails() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteToyRepository::try_new(&conn).unwrap();

    let unsaved = Toy::new("Yo-yo", Money::from_major(2), 1, ages(5, 10));
    assert!(matches!(repo.update(&unsaved), Err(RepoError::Unsaved("toy"))));

    let ghost = Toy::with_id(77, "Ghost", Money::ZERO, 1, ages(5, 10));
    assert!(matches!(
        repo.update(&ghost),
        Err(RepoError::NotFound { entity: "toy", id: 77 })
    ));
}

#[test]
fn find_by_id_of_missing_toy_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteToyRepository::try_new(&conn).unwrap();

    let err = repo.find_by_id(12).unwrap_err();
    assert_eq!(err.to_string(), "there is no toy with id 12");
}

#[test]
fn delete_resets_entity_and_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteToyRepository::try_new(&conn).unwrap();

    let mut toy = repo
        .create("Drum", Money::from_major(30), 1, ages(2, 6))
        .unwrap();
    let id = toy.id().unwrap();

    repo.delete(&mut toy).unwrap();
    assert!(!toy.is_saved());
    assert_eq!(toy.id(), Err(ModelError::UnsavedEntity("toy")));
    assert!(repo.find_all().unwrap().is_empty());
    assert!(matches!(repo.find_by_id(id), Err(RepoError::NotFound { .. })));

    repo.delete(&mut toy).unwrap();
}

#[test]
fn save_dispatches_between_create_and_update() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteToyRepository::try_new(&conn).unwrap();

    let mut toy = Toy::new("Kite", Money::from_major(12), 3, ages(6, 14));
    repo.save(&mut toy).unwrap();
    let id = toy.id().unwrap();

    toy.quantity = 2;
    repo.save(&mut toy).unwrap();

    assert_eq!(toy.id().unwrap(), id);
    assert_eq!(repo.find_all().unwrap(), vec![toy]);
}

#[test]
fn blank_name_is_a_constraint_violation() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteToyRepository::try_new(&conn).unwrap();

    let err = repo
        .create("", Money::from_major(1), 1, ages(1, 2))
        .unwrap_err();
    assert!(err.is_constraint_violation(), "unexpected error: {err}");
}

#[test]
fn currency_formatted_cost_text_is_parsed_on_read() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO toys (id, name, cost, quantity, age_lower, age_upper)
         VALUES (1, 'Matryoshka', '1 234,50 ₽', 2, 3, 10);",
        [],
    )
    .unwrap();
    let repo = SqliteToyRepository::try_new(&conn).unwrap();

    let toy = repo.find_by_id(1).unwrap();
    assert_eq!(toy.cost, Money::from_minor_units(123_450));
    assert_eq!(toy.age, ages(3, 9));
}

#[test]
fn unreadable_cost_is_reported_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO toys (id, name, cost, quantity, age_lower, age_upper)
         VALUES (1, 'Broken', 'free', 2, 3, 10);",
        [],
    )
    .unwrap();
    let repo = SqliteToyRepository::try_new(&conn).unwrap();

    assert!(matches!(repo.find_by_id(1), Err(RepoError::InvalidData(_))));
}

fn stored_bounds(conn: &rusqlite::Connection, id: i64) -> (i64, i64) {
    conn.query_row(
        "SELECT age_lower, age_upper FROM toys WHERE id = ?1;",
        [id],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )
    .unwrap()
}
