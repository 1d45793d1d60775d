#[path = "../common/fixtures.rs"]
mod fixtures;

use fixtures::{validate, Company, CompanyKind, Country, TestClass};
use heron::prelude::*;
use insta::assert_snapshot;

fn countries(n: i32) -> Vec<Country> {
    (1..=n)
        .map(|i| Country {
            id: i,
            name: format!("C{i}"),
            code: format!("{i:02}"),
        })
        .collect()
}

#[test]
fn test_insert_skips_auto_increment_key() {
    let sql = InsertArgs::insert(&TestClass::new(1, "first")).to_sql().unwrap();
    assert_snapshot!(
        sql,
        @"INSERT INTO TestClass (`Guid`, `Name`, `Active`) VALUES ('00000000-0000-0000-0000-000000000001', 'first', 1)"
    );
    validate(&sql, Dialect::MySql);
}

#[test]
fn test_insert_enum_modes() {
    let company = Company {
        id: 0,
        name: "Acme".into(),
        country_id: 4,
        kind: CompanyKind::Public,
    };
    let args = InsertArgs::insert(&company).dialect(Dialect::Sqlite);
    assert_snapshot!(
        args.to_sql().unwrap(),
        @r#"INSERT INTO "Company" ("Name", "CountryID", "Kind") VALUES ('Acme', 4, 1)"#
    );
    let args = args.options(CompileOptions::new(Dialect::Sqlite).with_enums_as_strings());
    assert_snapshot!(
        args.to_sql().unwrap(),
        @r#"INSERT INTO "Company" ("Name", "CountryID", "Kind") VALUES ('Acme', 4, 'Public')"#
    );
}

#[test]
fn test_insert_batches_respect_dialect_limits() {
    let rows = countries(3);

    let mysql = InsertArgs::insert_many(&rows).batches().unwrap();
    assert_eq!(mysql.len(), 1);
    validate(&mysql[0], Dialect::MySql);

    let oracle = InsertArgs::insert_many(&rows).dialect(Dialect::Oracle).batches().unwrap();
    assert_eq!(oracle.len(), 3);
    assert_snapshot!(
        oracle[0],
        @r#"INSERT INTO "Country" ("Name", "Code") VALUES ('C1', '01')"#
    );

    let capped = InsertArgs::insert_many(&rows)
        .options(CompileOptions::new(Dialect::MsSql).with_max_batch_rows(2))
        .to_sql()
        .unwrap();
    assert_snapshot!(
        capped,
        @r"
    INSERT INTO [Country] ([Name], [Code]) VALUES ('C1', '01'), ('C2', '02');
    INSERT INTO [Country] ([Name], [Code]) VALUES ('C3', '03')
    "
    );
}

#[test]
fn test_update_by_primary_key() {
    let mut row = TestClass::new(7, "renamed");
    row.name = None;
    let sql = UpdateArgs::update(&row)
        .exclude(TestClass::GUID)
        .to_sql()
        .unwrap();
    assert_snapshot!(
        sql,
        @"UPDATE TestClass SET `Name` = NULL, `Active` = 1 WHERE TestClass.`ID` = 7"
    );
    validate(&sql, Dialect::MySql);
}

#[test]
fn test_update_many_joins_statements() {
    let rows = countries(2);
    let sql = UpdateArgs::update_many(&rows)
        .exclude(Country::CODE)
        .dialect(Dialect::MsSql)
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "UPDATE [Country] SET [Name] = 'C1' WHERE [Country].[ID] = 1;\nUPDATE [Country] SET [Name] = 'C2' WHERE [Country].[ID] = 2"
    );
    for statement in sql.split(STATEMENT_SEPARATOR) {
        validate(statement, Dialect::MsSql);
    }
}

#[test]
fn test_update_with_explicit_where() {
    let rows = countries(1);
    let sql = UpdateArgs::update(&rows[0])
        .exclude(Country::CODE)
        .and_where(Country::CODE.eq("01"))
        .to_sql()
        .unwrap();
    assert_snapshot!(sql, @"UPDATE Country SET `Name` = 'C1' WHERE Country.`Code` = '01'");
}

#[test]
fn test_delete_forms() {
    let rows = countries(1);
    assert_snapshot!(
        DeleteArgs::delete(&rows[0]).to_sql().unwrap(),
        @"DELETE FROM Country WHERE Country.`ID` = 1"
    );
    assert_snapshot!(
        DeleteArgs::delete_by_ids::<Country, _>([4, 8]).to_sql().unwrap(),
        @"DELETE FROM Country WHERE Country.`ID` IN (4, 8)"
    );
    assert_snapshot!(
        DeleteArgs::delete_where::<Country>(Country::NAME.ends_with("land"))
            .dialect(Dialect::Sqlite)
            .to_sql()
            .unwrap(),
        @r#"DELETE FROM "Country" WHERE "Country"."Name" LIKE('%land')"#
    );
}

#[test]
fn test_delete_chunking_on_single_row_dialects() {
    for dialect in Dialect::ALL {
        let batches = DeleteArgs::delete_by_ids::<Country, _>([1, 2, 3])
            .dialect(dialect)
            .batches()
            .unwrap();
        let expected = if DeleteArgs::requires_chunking(dialect) { 3 } else { 1 };
        assert_eq!(batches.len(), expected, "{dialect}");
    }
}
