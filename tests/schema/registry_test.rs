#[path = "../common/fixtures.rs"]
mod fixtures;

use std::sync::Arc;
use std::thread;

use fixtures::{Company, Country, TestClass, TestClass2};
use heron::prelude::*;

#[test]
fn test_schema_resolution() {
    let schema = SchemaRegistry::get::<Company>().unwrap();
    assert_eq!(schema.table, "Company");
    assert_eq!(schema.require_key().unwrap().name, "ID");

    let country = schema.column_for_field("Country").unwrap();
    assert_eq!(country.name, "CountryID");
    assert_eq!(country.index, Some(false));
    let fk = country.foreign_key.as_ref().unwrap();
    assert_eq!(fk.target_table, "Country");
    assert_eq!(fk.target_column, "ID");
    assert_eq!(fk.on_delete, ReferentialAction::Cascade);

    let country = SchemaRegistry::get::<Country>().unwrap();
    assert!(country.column_for_field("Companies").is_none());
    assert!(country.relation("Companies").is_some());
}

#[test]
fn test_concurrent_registration_shares_one_schema() {
    let handles: Vec<_> = (0..8)
        .map(|_| thread::spawn(|| SchemaRegistry::get::<TestClass2>().unwrap()))
        .collect();
    let schemas: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for schema in &schemas[1..] {
        assert!(Arc::ptr_eq(&schemas[0], schema));
    }
    assert!(SchemaRegistry::is_registered::<TestClass2>());
}

#[test]
fn test_concurrent_rendering_is_deterministic() {
    let render = || {
        SelectArgs::select::<TestClass2>([TestClass2::NAME.expr(), TestClass::GUID.expr()])
            .inner_join(TestClass2::PARENT, TestClass::ID)
            .and_where(TestClass::ID.is_in([3, 1, 2]))
            .order_by(TestClass2::NAME)
            .to_sql()
            .unwrap()
    };
    let expected = render();
    let handles: Vec<_> = (0..8).map(|_| thread::spawn(render)).collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn test_invalid_entity_is_reported_every_time() {
    struct TwoKeys;
    impl Entity for TwoKeys {
        fn describe() -> EntityDef {
            EntityDef::new("TwoKeys")
                .field(FieldDef::scalar("A", ColumnType::Int32).key())
                .field(FieldDef::scalar("B", ColumnType::Int32).key())
        }
        fn row(&self) -> Row {
            Row::new()
        }
    }

    for _ in 0..2 {
        let err = SchemaRegistry::get::<TwoKeys>().unwrap_err();
        assert!(matches!(err, CompileError::Schema { .. }));
    }
    assert!(!SchemaRegistry::is_registered::<TwoKeys>());
}
