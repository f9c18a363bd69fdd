//! User repository integration tests.
//!
//! Every test opens its own in-memory database, seeds 50 users
//! (`John0..John49` / `Doe0..Doe49`) and empties the table again on
//! teardown.

use sea_orm::{ConnectionTrait, DbBackend, Statement};

use common::{AppError, DatabaseConfig};
use domain::User;
use user_repository_lib::fixtures;
use user_repository_lib::infra::Database;
use user_repository_lib::repository::{UserColumn, UserQuery, UserRepository, UserStore};

const NO_OF_USERS: usize = 50;

struct Fixture {
    db: Database,
    repo: UserStore,
    test_users: Vec<User>,
}

async fn set_up() -> Fixture {
    let db = Database::connect(&DatabaseConfig::in_memory())
        .await
        .expect("in-memory database");
    let repo = UserStore::new(db.get_connection());

    let test_users = fixtures::seed(&repo, NO_OF_USERS).await.expect("seed users");
    for user in &test_users {
        assert!(user.id.is_some());
    }

    Fixture {
        db,
        repo,
        test_users,
    }
}

impl Fixture {
    async fn tear_down(self) {
        self.repo.delete_all().await.unwrap();
        assert_eq!(self.repo.count().await.unwrap(), 0);
    }
}

#[tokio::test]
async fn test_seeded_users_are_counted() {
    let fx = set_up().await;

    assert_eq!(fx.repo.count().await.unwrap(), NO_OF_USERS as u64);

    fx.tear_down().await;
}

#[tokio::test]
async fn test_find_all_should_return_all_users() {
    let fx = set_up().await;

    let users = fx.repo.find_all().await.unwrap();

    assert_eq!(users.len(), NO_OF_USERS, "Wrong number of users found");
    assert_eq!(users.len(), fx.test_users.len(), "Wrong number of users found");
    assert_eq!(users, fx.test_users);

    fx.tear_down().await;
}

#[tokio::test]
async fn test_delete_by_id_should_remove_a_user() {
    let fx = set_up().await;
    let id = fx.test_users[0].id.unwrap();

    fx.repo.delete(id).await.unwrap();

    let users = fx.repo.find_all().await.unwrap();
    let template = User {
        id: Some(id),
        ..User::default()
    };
    assert!(
        !users.iter().any(|u| u.same_identity(&template)),
        "User should be deleted"
    );
    assert_eq!(users.len(), NO_OF_USERS - 1, "Wrong number of users found");
    assert!(!fx.repo.exists(id).await.unwrap(), "User should be deleted");
    assert!(fx.repo.find_one(id).await.unwrap().is_none(), "User should be deleted");

    fx.tear_down().await;
}

#[tokio::test]
async fn test_delete_of_missing_id_is_a_no_op() {
    let fx = set_up().await;
    let id = fx.test_users[0].id.unwrap();

    fx.repo.delete(id).await.unwrap();
    fx.repo.delete(id).await.unwrap();
    fx.repo.delete(i64::MAX).await.unwrap();

    assert_eq!(fx.repo.count().await.unwrap(), (NO_OF_USERS - 1) as u64);

    fx.tear_down().await;
}

#[tokio::test]
async fn test_delete_many_should_delete_the_specified_users() {
    let fx = set_up().await;

    let removed = fx.repo.delete_all_of(&fx.test_users).await.unwrap();

    assert_eq!(removed, NO_OF_USERS as u64);
    assert_eq!(fx.repo.count().await.unwrap(), 0);

    fx.tear_down().await;
}

#[tokio::test]
async fn test_delete_many_removes_only_the_given_users() {
    let fx = set_up().await;
    let doomed = &fx.test_users[..10];

    fx.repo.delete_all_of(doomed).await.unwrap();

    assert_eq!(fx.repo.count().await.unwrap(), (NO_OF_USERS - 10) as u64);
    for user in doomed {
        assert!(!fx.repo.exists(user.id.unwrap()).await.unwrap());
    }
    assert!(fx.repo.exists(fx.test_users[10].id.unwrap()).await.unwrap());

    fx.tear_down().await;
}

#[tokio::test]
async fn test_delete_many_skips_transient_users() {
    let fx = set_up().await;

    let removed = fx
        .repo
        .delete_all_of(&[User::new("John0", "Doe0")])
        .await
        .unwrap();

    assert_eq!(removed, 0);
    assert_eq!(fx.repo.count().await.unwrap(), NO_OF_USERS as u64);

    fx.tear_down().await;
}

#[tokio::test]
async fn test_delete_many_beyond_the_bind_limit() {
    let fx = set_up().await;
    let mut users = fx.test_users.clone();
    let first_unused = fx.test_users.iter().filter_map(|u| u.id).max().unwrap() + 1;
    users.extend((first_unused..first_unused + 40_000).map(|id| User {
        id: Some(id),
        ..User::new("Ghost", "User")
    }));

    let removed = fx.repo.delete_all_of(&users).await.unwrap();

    assert_eq!(removed, NO_OF_USERS as u64);
    assert_eq!(fx.repo.count().await.unwrap(), 0);

    fx.tear_down().await;
}

#[tokio::test]
async fn test_repository_should_check_null_constraint_for_first_name() {
    let fx = set_up().await;
    let user = User::with_names(None, Some("LastName".to_string()));

    let err = fx.repo.save(user).await.unwrap_err();

    assert!(matches!(err, AppError::ConstraintViolation { .. }));
    assert!(
        err.to_string().contains("USER column: FIRSTNAME"),
        "Could not find column name in error message: {}",
        err
    );
    assert_eq!(fx.repo.count().await.unwrap(), NO_OF_USERS as u64);

    fx.tear_down().await;
}

#[tokio::test]
async fn test_repository_should_check_null_constraint_for_last_name() {
    let fx = set_up().await;
    let user = User::with_names(Some("FirstName".to_string()), None);

    let err = fx.repo.save(user).await.unwrap_err();

    assert!(matches!(err, AppError::ConstraintViolation { .. }));
    assert!(
        err.to_string().contains("USER column: LASTNAME"),
        "Could not find column name in error message: {}",
        err
    );

    fx.tear_down().await;
}

#[tokio::test]
async fn test_schema_rejects_null_first_name() {
    let fx = set_up().await;

    let db_err = fx
        .db
        .connection()
        .execute(Statement::from_string(
            DbBackend::Sqlite,
            r#"INSERT INTO "USER" ("FIRSTNAME", "LASTNAME") VALUES (NULL, 'LastName')"#.to_string(),
        ))
        .await
        .unwrap_err();
    let err = AppError::from(db_err);

    assert_eq!(err.violated_column(), Some("FIRSTNAME"));
    assert!(err.to_string().contains("USER column: FIRSTNAME"));
    assert_eq!(fx.repo.count().await.unwrap(), NO_OF_USERS as u64);

    fx.tear_down().await;
}

#[tokio::test]
async fn test_batch_with_invalid_user_saves_nothing() {
    let fx = set_up().await;
    let batch = vec![
        User::new("Valid", "User"),
        User::with_names(Some("Missing".to_string()), None),
    ];

    let err = fx.repo.save_all(batch).await.unwrap_err();

    assert_eq!(err.violated_column(), Some("LASTNAME"));
    assert_eq!(fx.repo.count().await.unwrap(), NO_OF_USERS as u64);
    assert!(fx
        .repo
        .find_by_first_name_order_by_last_name_asc("Valid")
        .await
        .unwrap()
        .is_empty());

    fx.tear_down().await;
}

#[tokio::test]
async fn test_save_assigns_new_id() {
    let fx = set_up().await;

    let saved = fx.repo.save(User::new("Jane", "Roe")).await.unwrap();

    let id = saved.id.expect("assigned id");
    assert!(fx.test_users.iter().all(|u| u.id != Some(id)));
    assert_eq!(fx.repo.find_one(id).await.unwrap(), Some(saved));
    assert_eq!(fx.repo.count().await.unwrap(), NO_OF_USERS as u64 + 1);

    fx.tear_down().await;
}

#[tokio::test]
async fn test_save_of_stored_user_updates_in_place() {
    let fx = set_up().await;
    let mut user = fx.test_users[5].clone();
    user.last_name = Some("Smith".to_string());

    let updated = fx.repo.save(user.clone()).await.unwrap();

    assert_eq!(updated, user);
    assert_eq!(fx.repo.find_one(user.id.unwrap()).await.unwrap(), Some(user));
    assert_eq!(fx.repo.count().await.unwrap(), NO_OF_USERS as u64);

    fx.tear_down().await;
}

#[tokio::test]
async fn test_save_of_unknown_id_is_not_found() {
    let fx = set_up().await;
    let user = User {
        id: Some(i64::MAX),
        ..User::new("Ghost", "User")
    };

    let err = fx.repo.save(user).await.unwrap_err();

    assert!(matches!(err, AppError::NotFound));
    assert_eq!(fx.repo.count().await.unwrap(), NO_OF_USERS as u64);

    fx.tear_down().await;
}

#[tokio::test]
async fn test_find_by_name_should_return_matching_users() {
    let fx = set_up().await;
    let name = "John1";

    let matches = fx
        .repo
        .find_by_first_name_order_by_last_name_asc(name)
        .await
        .unwrap();

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].first_name.as_deref(), Some(name));

    fx.repo.save(User::new(name, "DoeB")).await.unwrap();
    let matches2 = fx
        .repo
        .find_by_first_name_order_by_last_name_asc(name)
        .await
        .unwrap();

    assert_eq!(matches2.len(), 2);
    assert_eq!(matches2[0].last_name.as_deref(), Some("Doe1"));
    assert_eq!(matches2[1].last_name.as_deref(), Some("DoeB"));

    fx.tear_down().await;
}

#[tokio::test]
async fn test_find_by_name_breaks_ties_by_insertion_order() {
    let fx = set_up().await;
    let first = fx.repo.save(User::new("John1", "Doe1")).await.unwrap();
    let second = fx.repo.save(User::new("John1", "Doe1")).await.unwrap();

    let matches = fx
        .repo
        .find_by_first_name_order_by_last_name_asc("John1")
        .await
        .unwrap();

    let ids: Vec<_> = matches.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![fx.test_users[1].id, first.id, second.id]);

    fx.tear_down().await;
}

#[tokio::test]
async fn test_find_by_name_without_match_is_empty() {
    let fx = set_up().await;

    let matches = fx
        .repo
        .find_by_first_name_order_by_last_name_asc("Nobody")
        .await
        .unwrap();

    assert!(matches.is_empty());

    fx.tear_down().await;
}

#[tokio::test]
async fn test_get_by_first_name_like_should_return_matching_users() {
    let fx = set_up().await;

    let matches = fx.repo.get_by_first_name_like("%ohn%").await.unwrap();

    assert_eq!(matches.len(), NO_OF_USERS);

    fx.tear_down().await;
}

#[tokio::test]
async fn test_get_by_first_name_like_is_case_sensitive() {
    let fx = set_up().await;

    assert!(fx.repo.get_by_first_name_like("%OHN%").await.unwrap().is_empty());
    assert!(fx.repo.get_by_first_name_like("john1").await.unwrap().is_empty());
    assert_eq!(fx.repo.get_by_first_name_like("John1").await.unwrap().len(), 1);

    fx.tear_down().await;
}

#[tokio::test]
async fn test_get_by_first_name_like_treats_glob_characters_literally() {
    let fx = set_up().await;
    fx.repo.save(User::new("J*hn?[x]", "Glob")).await.unwrap();

    let matches = fx.repo.get_by_first_name_like("J*hn?[x]").await.unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].last_name.as_deref(), Some("Glob"));
    assert_eq!(fx.repo.get_by_first_name_like("J*hn%").await.unwrap().len(), 1);
    assert!(fx.repo.get_by_first_name_like("J?hn%").await.unwrap().is_empty());

    fx.tear_down().await;
}

#[tokio::test]
async fn test_get_by_first_name_like_prefix() {
    let fx = set_up().await;

    // John1 and John10..John19
    let matches = fx.repo.get_by_first_name_like("John1%").await.unwrap();

    assert_eq!(matches.len(), 11);

    fx.tear_down().await;
}

#[tokio::test]
async fn test_get_by_first_name_like_treats_underscore_literally() {
    let fx = set_up().await;

    assert!(fx.repo.get_by_first_name_like("Jo_n%").await.unwrap().is_empty());

    fx.repo.save(User::new("Jo_n", "Underscore")).await.unwrap();
    let matches = fx.repo.get_by_first_name_like("Jo_n%").await.unwrap();

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].last_name.as_deref(), Some("Underscore"));

    fx.tear_down().await;
}

#[tokio::test]
async fn test_query_orders_by_requested_column() {
    let fx = set_up().await;

    let users = fx
        .repo
        .query(UserQuery::all().order_by_desc(UserColumn::Id))
        .await
        .unwrap();

    assert_eq!(users.len(), NO_OF_USERS);
    assert_eq!(users[0].id, fx.test_users[NO_OF_USERS - 1].id);
    assert_eq!(users[NO_OF_USERS - 1].id, fx.test_users[0].id);

    fx.tear_down().await;
}
