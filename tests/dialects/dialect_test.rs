#[path = "../common/fixtures.rs"]
mod fixtures;

use fixtures::{validate, Company, TestClass, TestClass2};
use heron::expression::BinaryOp;
use heron::prelude::*;
use insta::assert_snapshot;

fn select_by_key(dialect: Dialect) -> String {
    SelectArgs::select::<TestClass>([TestClass::GUID])
        .and_where(TestClass::ID.eq(1))
        .dialect(dialect)
        .to_sql()
        .unwrap()
}

#[test]
fn test_same_statement_across_dialects() {
    assert_snapshot!(
        select_by_key(Dialect::MySql),
        @"SELECT `Guid` FROM TestClass WHERE TestClass.`ID` = 1"
    );
    assert_snapshot!(
        select_by_key(Dialect::MsSql),
        @"SELECT [Guid] FROM [TestClass] WHERE [TestClass].[ID] = 1"
    );
    assert_snapshot!(
        select_by_key(Dialect::Oracle),
        @r#"SELECT "Guid" FROM "TestClass" WHERE "TestClass"."ID" = 1"#
    );
    assert_snapshot!(
        select_by_key(Dialect::Sqlite),
        @r#"SELECT "Guid" FROM "TestClass" WHERE "TestClass"."ID" = 1"#
    );
    assert_snapshot!(
        select_by_key(Dialect::Access),
        @"SELECT [Guid] FROM [TestClass] WHERE [TestClass].[ID] = 1"
    );
}

#[test]
fn test_rendered_selects_parse() {
    for dialect in [Dialect::MySql, Dialect::MsSql, Dialect::Oracle, Dialect::Sqlite] {
        validate(&select_by_key(dialect), dialect);
    }
}

#[test]
fn test_boolean_literals() {
    let args = SelectArgs::select::<TestClass>([TestClass::NAME]).and_where(TestClass::ACTIVE.expr());
    assert_snapshot!(
        args.clone().to_sql().unwrap(),
        @"SELECT `Name` FROM TestClass WHERE TestClass.`Active` = 1"
    );
    assert_snapshot!(
        args.dialect(Dialect::Access).to_sql().unwrap(),
        @"SELECT [Name] FROM [TestClass] WHERE [TestClass].[Active] = TRUE"
    );
}

#[test]
fn test_function_names_follow_dialect() {
    let args = SelectArgs::select::<Company>([Company::NAME.to_upper()]);
    assert_snapshot!(args.clone().to_sql().unwrap(), @"SELECT UPPER(`Name`) FROM Company");
    assert_snapshot!(
        args.dialect(Dialect::Access).to_sql().unwrap(),
        @"SELECT UCASE([Name]) FROM [Company]"
    );

    let args = SelectArgs::select::<Company>([Company::NAME]).order_by(Company::NAME.len());
    assert_snapshot!(
        args.dialect(Dialect::MsSql).to_sql().unwrap(),
        @"SELECT [Name] FROM [Company] ORDER BY LEN([Company].[Name])"
    );
}

#[test]
fn test_modulo_per_dialect() {
    let odd = Expression::binary(
        Company::ID.expr() % Expression::constant(2),
        BinaryOp::Eq,
        Expression::constant(1),
    );
    let args = SelectArgs::select::<Company>([Company::NAME]).and_where(odd);
    assert_snapshot!(
        args.clone().to_sql().unwrap(),
        @"SELECT `Name` FROM Company WHERE Company.`ID` % 2 = 1"
    );
    assert_snapshot!(
        args.dialect(Dialect::Oracle).to_sql().unwrap(),
        @r#"SELECT "Name" FROM "Company" WHERE MOD("Company"."ID", 2) = 1"#
    );
}

#[test]
fn test_join_rendering_mssql() {
    let sql = SelectArgs::select::<TestClass2>([TestClass2::NAME.expr(), TestClass::GUID.expr()])
        .left_join(TestClass2::PARENT, TestClass::ID)
        .dialect(Dialect::MsSql)
        .to_sql()
        .unwrap();
    assert_snapshot!(
        sql,
        @"SELECT [TestClass2].[Name], [TestClass].[Guid] FROM [TestClass2] LEFT OUTER JOIN [TestClass] ON [TestClass2].[ParentID]=[TestClass].[ID]"
    );
    validate(&sql, Dialect::MsSql);
}

#[test]
fn test_dialect_names_round_trip() {
    for dialect in Dialect::ALL {
        assert_eq!(dialect.to_string().parse::<Dialect>().unwrap(), dialect);
    }
    assert_eq!("sqlserver".parse::<Dialect>().unwrap(), Dialect::MsSql);
    assert!("postgres".parse::<Dialect>().is_err());
}

#[test]
fn test_table_exists_queries() {
    assert_eq!(
        Dialect::Sqlite.table_exists_query("Country").unwrap(),
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'Country'"
    );
    assert!(Dialect::Oracle
        .table_exists_query("Country")
        .unwrap()
        .contains("USER_TABLES"));
}
