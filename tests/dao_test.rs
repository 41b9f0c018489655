//! Integration tests for the data access layer
//!
//! Drives `Dao` through an in-memory executor that records every statement,
//! so the generated SQL, bound values and row mapping can be checked without
//! a database.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use sqlhaus::prelude::*;

/// Records statements and replays canned query results in order
#[derive(Default)]
struct RecordingExecutor {
    statements: Mutex<Vec<(String, Vec<SqlValue>)>>,
    responses: Mutex<VecDeque<Vec<SqlRow>>>,
    insert_id: Option<u64>,
}

impl RecordingExecutor {
    fn with_responses(responses: Vec<Vec<SqlRow>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            ..Default::default()
        }
    }

    fn with_insert_id(mut self, id: u64) -> Self {
        self.insert_id = Some(id);
        self
    }

    fn record(&self, sql: &str, params: &[SqlValue]) {
        self.statements
            .lock()
            .unwrap()
            .push((sql.to_string(), params.to_vec()));
    }

    fn statements(&self) -> Vec<(String, Vec<SqlValue>)> {
        self.statements.lock().unwrap().clone()
    }

    fn last(&self) -> (String, Vec<SqlValue>) {
        self.statements().pop().unwrap()
    }
}

#[async_trait::async_trait]
impl SqlExecutor for RecordingExecutor {
    async fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<SqlRow>, SqlHausError> {
        self.record(sql, params);
        Ok(self.responses.lock().unwrap().pop_front().unwrap_or_default())
    }

    async fn execute(
        &self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<ExecuteResult, SqlHausError> {
        self.record(sql, params);
        Ok(ExecuteResult {
            rows_affected: 1,
            last_insert_id: self.insert_id,
        })
    }
}

#[derive(Debug, Default, Clone, PartialEq, MappedType)]
#[mapper(table = "m_user", primary_key = "id")]
struct User {
    id: Option<i64>,
    #[mapper(name = "user_name")]
    name: String,
    #[mapper(converter = BooleanConverter)]
    enabled: bool,
    email: Option<String>,
    #[mapper(ignore)]
    display: String,
}

#[derive(Debug, Default, MappedType)]
struct Note {
    body: String,
}

fn dao(executor: RecordingExecutor) -> Dao<RecordingExecutor> {
    Dao::new(executor, "t_fallback", Arc::new(MapperRegistry::new())).with_show_sql(true)
}

fn user_row(id: i64, name: &str, enabled: &str) -> SqlRow {
    SqlRow::new()
        .with("id", id)
        .with("user_name", name)
        .with("enabled", enabled)
        .with("email", SqlValue::Null)
}

fn count_row(count: i64) -> SqlRow {
    SqlRow::new().with("count(*)", count)
}

// ========================================
// Reads
// ========================================

#[tokio::test]
async fn test_get_object_by_maps_first_row() {
    let dao = dao(RecordingExecutor::with_responses(vec![vec![
        user_row(1, "alice", "Y"),
        user_row(2, "bob", "N"),
    ]]));

    let user: Option<User> = dao.get_object_by(&[Restriction::eq("id", 1i64)]).await.unwrap();
    assert_eq!(
        user,
        Some(User {
            id: Some(1),
            name: "alice".to_string(),
            enabled: true,
            email: None,
            display: String::new(),
        })
    );

    let (sql, values) = dao.executor().last();
    assert_eq!(sql, "select * from m_user where id = ?  ");
    assert_eq!(values, vec![SqlValue::BigInt(1)]);
}

#[tokio::test]
async fn test_get_object_without_rows_is_none() {
    let dao = dao(RecordingExecutor::default());
    let user: Option<User> = dao
        .get_object("select * from m_user where id = ?", &[SqlValue::BigInt(9)])
        .await
        .unwrap();
    assert!(user.is_none());
}

#[tokio::test]
async fn test_get_scalar_and_count() {
    let dao = dao(RecordingExecutor::with_responses(vec![
        vec![SqlRow::new().with("user_name", "alice")],
        vec![count_row(25)],
        vec![],
    ]));

    let name: Option<String> = dao
        .get_scalar("select user_name from m_user where id = ?", &[SqlValue::BigInt(1)])
        .await
        .unwrap();
    assert_eq!(name.as_deref(), Some("alice"));

    let count = dao.get_count(&[Restriction::gt("id", 5i64)]).await.unwrap();
    assert_eq!(count, 25);
    assert_eq!(
        dao.executor().last().0,
        "select count(*) from t_fallback where id > ?  "
    );

    assert_eq!(dao.get_count(&[]).await.unwrap(), 0);
    assert_eq!(dao.executor().last().0, "select count(*) from t_fallback ");
}

#[tokio::test]
async fn test_get_list_from_query_keys() {
    let dao = dao(RecordingExecutor::with_responses(vec![vec![
        user_row(10, "john", "1"),
        user_row(20, "johnny", "0"),
    ]]));

    let mut params = BTreeMap::new();
    params.insert("Q-L-IN-id", "10,20");
    params.insert("Q-S-LIKE-user_name", "%john%");
    params.insert("Q-OD-id", "1");
    let restrictions = QueryProperty::parse_all_default(params).unwrap();

    let users: Vec<User> = dao.get_list(&restrictions).await.unwrap();
    assert_eq!(users.len(), 2);
    assert!(users[0].enabled);
    assert!(!users[1].enabled);

    let (sql, values) = dao.executor().last();
    assert_eq!(
        sql,
        "select * from m_user where id in(?,?) and user_name like ? order by id desc  "
    );
    assert_eq!(
        values,
        vec![
            SqlValue::BigInt(10),
            SqlValue::BigInt(20),
            SqlValue::from("%john%")
        ]
    );
}

#[tokio::test]
async fn test_get_rows_and_list_page() {
    let dao = dao(RecordingExecutor::with_responses(vec![
        vec![count_row(1)],
        vec![user_row(3, "c", "Y")],
    ]));

    let rows = dao.get_rows(&[]).await.unwrap();
    assert_eq!(rows[0].get("count(*)"), Some(&SqlValue::BigInt(1)));
    assert_eq!(dao.executor().last().0, "select * from t_fallback ");

    let users: Vec<User> = dao.get_list_page(2, 10, &[]).await.unwrap();
    assert_eq!(users[0].id, Some(3));
    assert_eq!(dao.executor().last().0, "select * from m_user  limit 10,10");
}

#[tokio::test]
async fn test_list_page_rejects_huge_page_number() {
    let dao = dao(RecordingExecutor::default());
    let result: Result<Vec<User>, _> = dao.get_list_page(i64::MAX / 2, 20, &[]).await;
    assert!(matches!(
        result,
        Err(SqlHausError::Query(QueryError::InvalidArgument(_)))
    ));
    assert!(dao.executor().statements().is_empty());
}

#[tokio::test]
async fn test_mapping_error_surfaces() {
    let dao = dao(RecordingExecutor::with_responses(vec![vec![SqlRow::new()
        .with("id", "not a number")]]));
    let result: Result<Vec<User>, _> = dao.get_list(&[]).await;
    assert!(matches!(result, Err(SqlHausError::Mapping(_))));
}

// ========================================
// Pages
// ========================================

#[tokio::test]
async fn test_get_page_runs_count_then_window() {
    let dao = dao(RecordingExecutor::with_responses(vec![
        vec![count_row(25)],
        vec![user_row(21, "u21", "Y"), user_row(22, "u22", "N")],
    ]));

    let page: PageResult<User> = dao.get_page(3, 10, &[]).await.unwrap();
    assert_eq!(page.total_count(), 25);
    assert_eq!(page.page_count(), 3);
    assert_eq!(page.prev_no(), 2);
    assert_eq!(page.next_no(), 3);
    assert_eq!(page.items().len(), 2);

    let statements = dao.executor().statements();
    assert_eq!(statements[0].0, "select count(*) from m_user ");
    assert_eq!(statements[1].0, "select * from m_user  limit 20,10");
}

#[tokio::test]
async fn test_empty_page_skips_data_query() {
    let dao = dao(RecordingExecutor::with_responses(vec![vec![count_row(0)]]));
    let page: PageResult<User> = dao
        .get_page(0, 20, &[Restriction::eq("user_name", "nobody")])
        .await
        .unwrap();
    assert!(page.is_empty());
    assert_eq!(page.page_no(), 1);
    assert_eq!(dao.executor().statements().len(), 1);
}

#[tokio::test]
async fn test_page_from_params_uses_query_config() {
    let config = QueryConfig::default()
        .with_param_prefix("F")
        .with_default_page_size(5);
    let dao = dao(RecordingExecutor::with_responses(vec![
        vec![count_row(12)],
        vec![user_row(6, "f", "Y")],
    ]))
    .with_query_config(&config);
    assert_eq!(dao.param_prefix(), "F");
    assert_eq!(dao.default_page_size(), 5);

    let params = vec![
        ("F-S-EQ-user_name", "f"),
        ("Q-S-EQ-email", "skipped"),
    ];
    let page: PageResult<User> = dao.get_page_from_params(2, None, params).await.unwrap();
    assert_eq!(page.page_size(), 5);
    assert_eq!(page.page_count(), 3);

    let statements = dao.executor().statements();
    assert_eq!(
        statements[0].0,
        "select count(*) from m_user where user_name = ?  "
    );
    assert_eq!(
        statements[1],
        (
            "select * from m_user where user_name = ?   limit 5,5".to_string(),
            vec![SqlValue::from("f")]
        )
    );
}

#[tokio::test]
async fn test_invalid_page_size() {
    let dao = dao(RecordingExecutor::with_responses(vec![vec![count_row(4)]]));
    let result: Result<PageResult<User>, _> = dao.get_page(1, 0, &[]).await;
    assert!(matches!(
        result,
        Err(SqlHausError::Query(QueryError::InvalidArgument(_)))
    ));
}

// ========================================
// Writes
// ========================================

#[tokio::test]
async fn test_save_skips_null_columns() {
    let dao = dao(RecordingExecutor::default());
    let user = User {
        name: "bob".to_string(),
        enabled: true,
        display: "ignored".to_string(),
        ..Default::default()
    };

    assert_eq!(dao.save(&user).await.unwrap(), 1);
    let (sql, values) = dao.executor().last();
    assert_eq!(sql, "insert into m_user(user_name,enabled) values (?, ?)");
    assert_eq!(values, vec![SqlValue::from("bob"), SqlValue::Bool(true)]);
}

#[tokio::test]
async fn test_save_and_get_id() {
    let with_key = dao(RecordingExecutor::default().with_insert_id(42));
    let user = User {
        name: "carol".to_string(),
        ..Default::default()
    };
    assert_eq!(with_key.save_and_get_id(&user).await.unwrap(), 42);

    let without_key = dao(RecordingExecutor::default());
    assert!(matches!(
        without_key.save_and_get_id(&user).await,
        Err(SqlHausError::UnexpectedResult(_))
    ));
}

#[tokio::test]
async fn test_update_by_pk() {
    let dao = dao(RecordingExecutor::default());
    let user = User {
        id: Some(7),
        name: "dave".to_string(),
        enabled: false,
        email: None,
        display: String::new(),
    };

    dao.update_by_pk(&user, false).await.unwrap();
    let (sql, values) = dao.executor().last();
    assert_eq!(
        sql,
        "update m_user set user_name = ?, enabled = ?, email = ? where id = ?"
    );
    assert_eq!(
        values,
        vec![
            SqlValue::from("dave"),
            SqlValue::Bool(false),
            SqlValue::Null,
            SqlValue::BigInt(7)
        ]
    );

    dao.update_by_pk(&user, true).await.unwrap();
    assert_eq!(
        dao.executor().last().0,
        "update m_user set user_name = ?, enabled = ? where id = ?"
    );
}

#[tokio::test]
async fn test_primary_key_required() {
    let dao = dao(RecordingExecutor::default());
    let note = Note {
        body: "hello".to_string(),
    };
    assert!(matches!(
        dao.update_by_pk(&note, false).await,
        Err(SqlHausError::Query(QueryError::InvalidArgument(_)))
    ));
    assert!(matches!(
        dao.delete_by_pk(&note).await,
        Err(SqlHausError::Query(QueryError::InvalidArgument(_)))
    ));
    assert!(dao.executor().statements().is_empty());
}

#[tokio::test]
async fn test_deletes() {
    let dao = dao(RecordingExecutor::default());
    let user = User {
        id: Some(7),
        ..Default::default()
    };

    dao.delete_by_pk(&user).await.unwrap();
    assert_eq!(
        dao.executor().last(),
        (
            "delete from m_user where id = ?".to_string(),
            vec![SqlValue::BigInt(7)]
        )
    );

    dao.delete(&[Restriction::eq("user_name", "x")]).await.unwrap();
    assert_eq!(
        dao.executor().last().0,
        "delete from t_fallback where user_name = ? "
    );

    dao.delete_by_id(3).await.unwrap();
    assert_eq!(
        dao.executor().last(),
        (
            "delete from t_fallback where id = ?".to_string(),
            vec![SqlValue::BigInt(3)]
        )
    );
}

#[tokio::test]
async fn test_update_columns_with_restrictions() {
    let dao = dao(RecordingExecutor::default());
    let columns = Columns::create("user_name", "z").set("enabled", false);
    dao.update(&columns, &[Restriction::eq("id", 7i64)])
        .await
        .unwrap();

    let (sql, values) = dao.executor().last();
    assert_eq!(
        sql,
        "update t_fallback set user_name = ?, enabled = ? where id = ?  "
    );
    assert_eq!(
        values,
        vec![
            SqlValue::from("z"),
            SqlValue::Bool(false),
            SqlValue::BigInt(7)
        ]
    );
}

// ========================================
// Named parameters
// ========================================

fn named(pairs: &[(&str, SqlValue)]) -> HashMap<String, SqlValue> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[tokio::test]
async fn test_named_query_list_expands_lists() {
    let dao = dao(RecordingExecutor::with_responses(vec![vec![user_row(
        1, "a", "Y",
    )]]));
    let params = named(&[
        (
            "ids",
            SqlValue::List(vec![SqlValue::BigInt(1), SqlValue::BigInt(2)]),
        ),
        ("name", SqlValue::from("a")),
    ]);

    let users: Vec<User> = dao
        .named_query_list(
            "select * from m_user where id in (:ids) and user_name = :name",
            &params,
        )
        .await
        .unwrap();
    assert_eq!(users.len(), 1);

    let (sql, values) = dao.executor().last();
    assert_eq!(sql, "select * from m_user where id in (?, ?) and user_name = ?");
    assert_eq!(
        values,
        vec![
            SqlValue::BigInt(1),
            SqlValue::BigInt(2),
            SqlValue::from("a")
        ]
    );
}

#[tokio::test]
async fn test_named_query_page_and_count() {
    let dao = dao(RecordingExecutor::with_responses(vec![
        vec![count_row(3)],
        vec![user_row(3, "c", "N")],
        vec![count_row(3)],
    ]));
    let params = named(&[("name", SqlValue::from("c"))]);

    let page: PageResult<User> = dao
        .named_query_page(
            "select count(*) from m_user where user_name = :name",
            "select * from m_user where user_name = :name",
            &params,
            2,
            2,
        )
        .await
        .unwrap();
    assert_eq!(page.page_no(), 2);
    assert_eq!(page.items()[0].id, Some(3));

    let statements = dao.executor().statements();
    assert_eq!(
        statements[0].0,
        "select count(*) from m_user where user_name = ?"
    );
    assert_eq!(
        statements[1].0,
        "select * from m_user where user_name = ? limit 2,2"
    );

    let count = dao
        .named_query_i64("select count(*) from m_user where user_name = :name", &params)
        .await
        .unwrap();
    assert_eq!(count, 3);
}

#[tokio::test]
async fn test_named_update_requires_every_name() {
    let dao = dao(RecordingExecutor::default());
    let params = named(&[("id", SqlValue::BigInt(1))]);

    assert_eq!(
        dao.named_update("update m_user set enabled = 0 where id = :id", &params)
            .await
            .unwrap(),
        1
    );
    assert!(matches!(
        dao.named_update("update m_user set user_name = :name where id = :id", &params)
            .await,
        Err(SqlHausError::Query(QueryError::MissingParameter(_)))
    ));
}
