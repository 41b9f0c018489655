//! Statement builder tests

use crate::errors::QueryError;
use crate::helper::{Columns, SqlHelper};
use crate::restriction::{Restriction, SqlGenerator};
use type_mapping::SqlValue;

// ========================================
// Insert
// ========================================

#[test]
fn test_insert_keeps_column_spacing() {
    let actual = SqlHelper::insert("m_user")
        .columns("name, key_type, key_size, public_exponent, modulus, `desc`")
        .unwrap();
    assert_eq!(
        actual,
        "insert into m_user(name, key_type, key_size, public_exponent, modulus, `desc`) values (?, ?, ?, ?, ?, ?)"
    );
}

#[test]
fn test_insert_column_list() {
    let actual = SqlHelper::insert("T").column_list(&["a", "b"]).unwrap();
    assert_eq!(actual, "insert into T(a,b) values (?, ?)");

    let empty: [&str; 0] = [];
    assert!(matches!(
        SqlHelper::insert("T").column_list(&empty),
        Err(QueryError::InvalidArgument(_))
    ));
}

// ========================================
// Select
// ========================================

#[test]
fn test_select_plain_and_count() {
    assert_eq!(
        SqlHelper::select("m_user").columns("*").to_sql_string(),
        "select * from m_user "
    );
    assert_eq!(
        SqlHelper::select("m_user").count("*").to_count_string(),
        "select count(*) from m_user "
    );
    assert_eq!(
        SqlHelper::select("m_user")
            .count("*")
            .where_phrase("id = ?")
            .to_count_string(),
        "select count(*) from m_user where id = ? "
    );
}

#[test]
fn test_select_count_with_restrictions() {
    let select = SqlHelper::select("m_user")
        .count("*")
        .where_restrictions(&[Restriction::eq("id", 12i64)])
        .unwrap();
    assert_eq!(select.to_count_string(), "select count(*) from m_user where id = ?  ");
    assert_eq!(select.to_string(), "select count(*) from m_user where id = ?  ");
}

#[test]
fn test_select_join_chain() {
    let sql = SqlHelper::select("m_user a")
        .columns("*")
        .left_join("r_user_role b")
        .on("a.id = b.user_id")
        .where_phrase("a.id = ?")
        .to_sql_string();
    assert_eq!(
        sql,
        "select * from m_user a left join r_user_role b on a.id = b.user_id where a.id = ? "
    );
}

#[test]
fn test_select_or_and_in_legacy_spacing() {
    let select = SqlHelper::select("m_user")
        .columns("*")
        .where_restrictions(&[
            Restriction::eq("id", 12i64),
            Restriction::eq("name", SqlValue::Null),
            Restriction::or(Restriction::in_list("ids", [10i64, 20])),
        ])
        .unwrap();
    assert_eq!(
        select.to_count_string(),
        "select count(*) from m_user where id = ? or ids in(?,?)  "
    );
    assert_eq!(
        select.to_sql_string(),
        "select * from m_user where id = ? or ids in(?,?)  "
    );
}

#[test]
fn test_select_order_only_has_no_where() {
    let sql = SqlHelper::select("m_user")
        .where_restrictions(&[
            Restriction::eq("name", None::<String>),
            Restriction::order_by_desc("id"),
        ])
        .unwrap()
        .to_sql_string();
    assert_eq!(sql, "select * from m_user order by id desc  ");
}

#[test]
fn test_select_nothing_rendered_appends_nothing() {
    let sql = SqlHelper::select("m_user")
        .where_restrictions(&[Restriction::like("name", "")])
        .unwrap()
        .where_phrase("  ")
        .to_sql_string();
    assert_eq!(sql, "select * from m_user ");
}

#[test]
fn test_select_group_having_and_column_list() {
    let sql = SqlHelper::select("orders")
        .column_list(&["status", "count(*)"])
        .group_by("status")
        .having("count(*) > 1")
        .to_sql_string();
    assert_eq!(
        sql,
        "select status,count(*) from orders group by status having count(*) > 1  "
    );
}

// ========================================
// Delete
// ========================================

#[test]
fn test_delete_variants() {
    let where_sql = SqlGenerator::where_sql(&[
        Restriction::eq("id", 12i64),
        Restriction::eq("name", "zhangsan"),
        Restriction::or(Restriction::in_list("ids", [10i64, 20])),
    ])
    .unwrap();
    assert_eq!(
        SqlHelper::delete("m_user").where_phrase(&where_sql),
        "delete from m_user where id = ? and name = ? or ids in(?,?) "
    );
    assert_eq!(
        SqlHelper::delete("m_user").where_phrase("id = ?"),
        "delete from m_user where id = ?"
    );
    assert_eq!(SqlHelper::delete("m_user").where_phrase(""), "delete from m_user ");
    assert_eq!(
        SqlHelper::delete("T").where_columns(&["a", "b"]),
        "delete from T where a = ? and b = ?"
    );
    let none: [&str; 0] = [];
    assert_eq!(SqlHelper::delete("T").where_columns(&none), "delete from T ");
}

// ========================================
// Update
// ========================================

#[test]
fn test_update_variants() {
    assert_eq!(
        SqlHelper::update("m_user").set("name = ?, `desc` = ?").to_sql_string(),
        "update m_user set name = ?, `desc` = ? "
    );

    let where_sql = SqlGenerator::where_sql(&[Restriction::eq("id", 12i64)]).unwrap();
    assert_eq!(
        SqlHelper::update("m_user")
            .set("name = ?, `desc` = ?")
            .where_phrase(&where_sql),
        "update m_user set name = ?, `desc` = ? where id = ?  "
    );
    assert_eq!(
        SqlHelper::update("m_user")
            .set("name = ?, `desc` = ?")
            .where_phrase("id = ?"),
        "update m_user set name = ?, `desc` = ? where id = ? "
    );
}

#[test]
fn test_update_columns() {
    let sql = SqlHelper::update("T")
        .set_columns(&["a", "b"])
        .unwrap()
        .where_columns(&["a"])
        .unwrap();
    assert_eq!(sql, "update T set a = ?, b = ? where a = ?");

    let none: [&str; 0] = [];
    assert!(SqlHelper::update("T").set_columns(&none).is_err());
    assert!(SqlHelper::update("T").set("a = ?").where_columns(&none).is_err());
    assert_eq!(SqlHelper::update("T").set("a = ?").where_phrase(""), "update T set a = ?  ");
}

#[test]
fn test_columns_accumulator() {
    let columns = Columns::create("name", "bob").set("age", 30).set_if(false, "x", 1);
    assert_eq!(columns.set_phrase(), "name = ?, age = ?");
    assert_eq!(
        columns.set_values(),
        &[SqlValue::from("bob"), SqlValue::Int(30)]
    );
    let sql = SqlHelper::update("m_user").set(columns.set_phrase()).where_phrase("id = ?");
    assert_eq!(sql, "update m_user set name = ?, age = ? where id = ? ");
}

#[test]
fn test_limit_sql() {
    assert_eq!(SqlHelper::limit_sql(3, 10).unwrap(), " limit 20,10");
    assert_eq!(SqlHelper::limit_sql(1, 20).unwrap(), " limit 0,20");
    assert_eq!(SqlHelper::limit_sql(0, 20).unwrap(), " limit 0,20");
}

#[test]
fn test_limit_sql_offset_overflow() {
    assert!(matches!(
        SqlHelper::limit_sql(i64::MAX / 2, 20),
        Err(QueryError::InvalidArgument(_))
    ));
    assert_eq!(
        SqlHelper::limit_sql(i64::MAX, 1).unwrap(),
        format!(" limit {},1", i64::MAX - 1)
    );
}
