#[path = "../common/fixtures.rs"]
mod fixtures;

use fixtures::{validate, Company, CompanyKind, Country, TestClass, TestClass2};
use heron::expression::BinaryOp;
use heron::prelude::*;
use insta::assert_snapshot;

#[test]
fn test_select_by_key() {
    let sql = SelectArgs::select::<TestClass>([TestClass::GUID])
        .and_where(TestClass::ID.eq(1))
        .to_sql()
        .unwrap();
    assert_snapshot!(sql, @"SELECT `Guid` FROM TestClass WHERE TestClass.`ID` = 1");
    validate(&sql, Dialect::MySql);
}

#[test]
fn test_right_join() {
    let sql = SelectArgs::select::<TestClass2>([TestClass2::NAME.expr(), TestClass::GUID.expr()])
        .right_join(TestClass2::PARENT, TestClass::ID)
        .to_sql()
        .unwrap();
    assert_snapshot!(
        sql,
        @"SELECT TestClass2.`Name`, TestClass.`Guid` FROM TestClass2 RIGHT OUTER JOIN TestClass ON TestClass2.`ParentID`=TestClass.`ID`"
    );
    validate(&sql, Dialect::MySql);
}

#[test]
fn test_successive_and_matches_compound_predicate() {
    let successive = SelectArgs::select::<TestClass>([TestClass::GUID])
        .and_where(TestClass::ID.gt(1))
        .and_where(TestClass::NAME.starts_with("a"))
        .to_sql()
        .unwrap();
    let compound = SelectArgs::select::<TestClass>([TestClass::GUID])
        .and_where(TestClass::ID.gt(1).and(TestClass::NAME.starts_with("a")))
        .to_sql()
        .unwrap();
    assert_eq!(successive, compound);
    assert_snapshot!(
        successive,
        @"SELECT `Guid` FROM TestClass WHERE (TestClass.`ID` > 1) AND (TestClass.`Name` LIKE('a%'))"
    );
}

#[test]
fn test_or_where_wraps_accumulated_predicate() {
    let sql = SelectArgs::select::<TestClass>([TestClass::GUID])
        .and_where(TestClass::ID.eq(1))
        .or_where(TestClass::NAME.is_null())
        .to_sql()
        .unwrap();
    assert_snapshot!(
        sql,
        @"SELECT `Guid` FROM TestClass WHERE (TestClass.`ID` = 1) OR (TestClass.`Name` IS NULL)"
    );
}

#[test]
fn test_exists_subquery() {
    let inner = SelectArgs::select::<Company>([Company::ID])
        .and_where(Company::NAME.starts_with("A"));
    let sql = SelectArgs::select::<Country>([Country::NAME])
        .and_where(exists(Company::COUNTRY, Country::ID, inner))
        .to_sql()
        .unwrap();
    assert_snapshot!(
        sql,
        @"SELECT `Name` FROM Country WHERE EXISTS (SELECT `ID` FROM Company WHERE Company.`Name` LIKE('A%') AND Country.`ID` = Company.`CountryID`)"
    );
    validate(&sql, Dialect::MySql);
}

#[test]
fn test_not_exists_without_inner_filter() {
    let inner = SelectArgs::select::<Company>([Company::ID]);
    let sql = SelectArgs::select::<Country>([Country::NAME])
        .and_where(not_exists(Company::COUNTRY, Country::ID, inner))
        .dialect(Dialect::MsSql)
        .to_sql()
        .unwrap();
    assert_snapshot!(
        sql,
        @"SELECT [Name] FROM [Country] WHERE NOT EXISTS (SELECT [ID] FROM [Company] WHERE [Country].[ID] = [Company].[CountryID])"
    );
    validate(&sql, Dialect::MsSql);
}

#[test]
fn test_exists_body_filters_on_outer_table() {
    let inner = SelectArgs::select::<Company>([Company::ID])
        .and_where(Company::NAME.eq(Country::NAME));
    let args = SelectArgs::select::<Country>([Country::NAME])
        .and_where(exists(Company::COUNTRY, Country::ID, inner));

    let sql = args.to_sql().unwrap();
    assert_snapshot!(
        sql,
        @"SELECT `Name` FROM Country WHERE EXISTS (SELECT `ID` FROM Company WHERE Company.`Name` = Country.`Name` AND Country.`ID` = Company.`CountryID`)"
    );
    validate(&sql, Dialect::MySql);

    let sql = args.dialect(Dialect::MsSql).to_sql().unwrap();
    assert_snapshot!(
        sql,
        @"SELECT [Name] FROM [Country] WHERE EXISTS (SELECT [ID] FROM [Company] WHERE [Company].[Name] = [Country].[Name] AND [Country].[ID] = [Company].[CountryID])"
    );
    validate(&sql, Dialect::MsSql);
}

#[test]
fn test_implicit_table_after_explicit_join() {
    let args = SelectArgs::select::<TestClass2>([TestClass2::NAME.expr(), TestClass::GUID.expr()])
        .right_join(TestClass2::PARENT, TestClass::ID)
        .and_where(Company::NAME.eq("x"));

    let sql = args.to_sql().unwrap();
    assert_snapshot!(
        sql,
        @"SELECT TestClass2.`Name`, TestClass.`Guid` FROM TestClass2 RIGHT OUTER JOIN TestClass ON TestClass2.`ParentID`=TestClass.`ID`, Company WHERE Company.`Name` = 'x'"
    );
    validate(&sql, Dialect::MySql);

    let sql = args.dialect(Dialect::MsSql).to_sql().unwrap();
    assert_snapshot!(
        sql,
        @"SELECT [TestClass2].[Name], [TestClass].[Guid] FROM [TestClass2] RIGHT OUTER JOIN [TestClass] ON [TestClass2].[ParentID]=[TestClass].[ID], [Company] WHERE [Company].[Name] = 'x'"
    );
    validate(&sql, Dialect::MsSql);
}

#[test]
fn test_in_list_keeps_value_order() {
    let sql = SelectArgs::select::<Company>([Company::NAME])
        .and_where(Company::ID.is_in([5, 2, 9]))
        .to_sql()
        .unwrap();
    assert_snapshot!(sql, @"SELECT `Name` FROM Company WHERE Company.`ID` IN (5, 2, 9)");

    let reversed = SelectArgs::select::<Company>([Company::NAME])
        .and_where(ValueList::new([5, 2, 9]).contains(Company::ID))
        .to_sql()
        .unwrap();
    assert_eq!(sql, reversed);
}

#[test]
fn test_enum_rendering_modes() {
    let args = SelectArgs::select::<Company>([Company::NAME])
        .and_where(Company::KIND.eq(CompanyKind::Public));
    assert_snapshot!(
        args.to_sql().unwrap(),
        @"SELECT `Name` FROM Company WHERE Company.`Kind` = 1"
    );
    let args = args.options(CompileOptions::default().with_enums_as_strings());
    assert_snapshot!(
        args.to_sql().unwrap(),
        @"SELECT `Name` FROM Company WHERE Company.`Kind` = 'Public'"
    );
}

#[test]
fn test_aggregate_projection() {
    let sql = SelectArgs::select::<Company>([count_all()])
        .and_where(Company::COUNTRY.eq(3))
        .to_sql()
        .unwrap();
    assert_snapshot!(sql, @"SELECT COUNT(*) FROM Company WHERE Company.`CountryID` = 3");
    validate(&sql, Dialect::MySql);
}

#[test]
fn test_aggregate_in_where_is_rejected() {
    let err = SelectArgs::select::<Company>([Company::NAME])
        .and_where(Expression::binary(count_all(), BinaryOp::Eq, Expression::constant(1)))
        .to_sql()
        .unwrap_err();
    assert!(matches!(err, CompileError::UnsupportedExpression { .. }));
}

#[test]
fn test_unmapped_field_is_rejected() {
    const BOGUS: Field<Company, i32> = Field::new("Bogus");
    let err = SelectArgs::select::<Company>([BOGUS]).to_sql().unwrap_err();
    assert!(err.to_string().contains("Company.Bogus"));
}

#[test]
fn test_paging_per_dialect() {
    let args = SelectArgs::select::<Country>([Country::NAME])
        .order_by(Country::NAME)
        .index(20)
        .count(10);

    assert_snapshot!(
        args.clone().dialect(Dialect::MySql).to_sql().unwrap(),
        @"SELECT `Name` FROM Country ORDER BY Country.`Name` LIMIT 20,10"
    );
    assert_snapshot!(
        args.clone().dialect(Dialect::Sqlite).to_sql().unwrap(),
        @r#"SELECT "Name" FROM "Country" ORDER BY "Country"."Name" LIMIT 20,10"#
    );
    assert!(matches!(
        args.clone().dialect(Dialect::MsSql).to_sql(),
        Err(CompileError::NotSupportedByDialect { .. })
    ));

    let first_page = args.index(0).dialect(Dialect::MsSql).to_sql().unwrap();
    assert_snapshot!(
        first_page,
        @"SELECT TOP 10 [Name] FROM [Country] ORDER BY [Country].[Name]"
    );
    validate(&first_page, Dialect::MsSql);
}

#[test]
fn test_oracle_paging_with_repeated_column_names() {
    let sql = SelectArgs::select::<TestClass2>([TestClass2::NAME.expr(), TestClass::NAME.expr()])
        .inner_join(TestClass2::PARENT, TestClass::ID)
        .index(10)
        .count(5)
        .dialect(Dialect::Oracle)
        .to_sql()
        .unwrap();
    assert_snapshot!(
        sql,
        @r#"SELECT * FROM (SELECT q.*, ROWNUM rnum FROM (SELECT "TestClass2"."Name", "TestClass"."Name" AS "Name_2" FROM "TestClass2" INNER JOIN "TestClass" ON "TestClass2"."ParentID"="TestClass"."ID") q WHERE ROWNUM <= 15) WHERE rnum > 10"#
    );
    validate(&sql, Dialect::Oracle);
}

#[test]
fn test_render_is_pure() {
    let mut args = SelectArgs::select_all::<TestClass>();
    args.where_mut().and(TestClass::ACTIVE.expr());
    let first = args.to_sql().unwrap();
    assert_eq!(first, args.to_sql().unwrap());
    assert_snapshot!(
        first,
        @"SELECT `ID`, `Guid`, `Name`, `Active` FROM TestClass WHERE TestClass.`Active` = 1"
    );
}
