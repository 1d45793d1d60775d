#[path = "../common/fixtures.rs"]
mod fixtures;

use fixtures::{validate, Company, Country, TestClass, TestClass2};
use heron::prelude::*;
use insta::assert_snapshot;

#[test]
fn test_create_with_foreign_key_and_index() {
    let statements = TableArgs::create::<Company>().statements().unwrap();
    assert_eq!(statements.len(), 2);
    assert_snapshot!(
        statements[0],
        @"CREATE TABLE Company (`ID` INT NOT NULL AUTO_INCREMENT, `Name` VARCHAR(100) NOT NULL, `CountryID` INT NOT NULL, `Kind` INT NOT NULL, CONSTRAINT PK_Company PRIMARY KEY (`ID`), CONSTRAINT FK_Company_CountryID FOREIGN KEY (`CountryID`) REFERENCES Country (`ID`) ON DELETE CASCADE)"
    );
    assert_snapshot!(statements[1], @"CREATE INDEX IX_Company_CountryID ON Company (`CountryID`)");
    for sql in &statements {
        validate(sql, Dialect::MySql);
    }
}

#[test]
fn test_create_unique_index_mssql() {
    let sql = TableArgs::create::<Country>()
        .dialect(Dialect::MsSql)
        .to_sql()
        .unwrap();
    assert_snapshot!(
        sql,
        @r"
    CREATE TABLE [Country] ([ID] INT NOT NULL IDENTITY(1,1), [Name] VARCHAR(50) NOT NULL, [Code] VARCHAR(2) NOT NULL, CONSTRAINT [PK_Country] PRIMARY KEY ([ID]));
    CREATE UNIQUE INDEX [IX_Country_Code] ON [Country] ([Code])
    "
    );
}

#[test]
fn test_create_sqlite_inline_key() {
    let sql = TableArgs::create::<TestClass>()
        .dialect(Dialect::Sqlite)
        .to_sql()
        .unwrap();
    assert_snapshot!(
        sql,
        @r#"CREATE TABLE "TestClass" ("ID" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT, "Guid" CHAR(36) NOT NULL, "Name" VARCHAR(50), "Active" INTEGER NOT NULL)"#
    );
    validate(&sql, Dialect::Sqlite);
}

#[test]
fn test_oracle_create_and_drop_order() {
    let create = TableArgs::create::<TestClass2>()
        .dialect(Dialect::Oracle)
        .statements()
        .unwrap();
    assert_eq!(create.len(), 3);
    assert!(create[0].starts_with("CREATE TABLE \"TestClass2\""));
    assert!(create[0].contains(
        "CONSTRAINT \"FK_TestClass2_ParentID\" FOREIGN KEY (\"ParentID\") REFERENCES \"TestClass\" (\"ID\")"
    ));
    assert_eq!(create[1], "CREATE SEQUENCE \"TestClass2_ID\" START WITH 1 INCREMENT BY 1");
    assert!(create[2].starts_with("CREATE OR REPLACE TRIGGER \"TestClass2_ID\" BEFORE INSERT"));

    let drop = TableArgs::drop::<TestClass2>()
        .dialect(Dialect::Oracle)
        .statements()
        .unwrap();
    assert_eq!(
        drop,
        vec![
            "DROP TRIGGER \"TestClass2_ID\"",
            "DROP SEQUENCE \"TestClass2_ID\"",
            "DROP TABLE \"TestClass2\"",
        ]
    );
}

#[test]
fn test_oracle_truncates_long_identifiers() {
    struct MeasurementCalibrationRecord;
    impl Entity for MeasurementCalibrationRecord {
        fn describe() -> EntityDef {
            EntityDef::new("MeasurementCalibrationRecord")
                .field(FieldDef::scalar("Id", ColumnType::Int64).column_name("ID").auto_increment())
                .field(FieldDef::scalar("InstrumentSerial", ColumnType::String).length(40).index())
        }
        fn row(&self) -> Row {
            Row::new()
        }
    }

    let statements = TableArgs::create::<MeasurementCalibrationRecord>()
        .dialect(Dialect::Oracle)
        .statements()
        .unwrap();
    let index = &statements[1];
    assert!(index.starts_with("CREATE INDEX \""));
    let name = index
        .trim_start_matches("CREATE INDEX \"")
        .split('"')
        .next()
        .unwrap();
    assert!(name.len() <= 30, "{name}");
    assert!(name.starts_with("IX_Measurement"));

    let sequence = &statements[2];
    let name = sequence
        .trim_start_matches("CREATE SEQUENCE \"")
        .split('"')
        .next()
        .unwrap();
    assert!(name.len() <= 30, "{name}");
}

#[test]
fn test_access_drop() {
    assert_eq!(
        TableArgs::drop::<Country>().dialect(Dialect::Access).to_sql().unwrap(),
        "DROP TABLE [Country]"
    );
}
