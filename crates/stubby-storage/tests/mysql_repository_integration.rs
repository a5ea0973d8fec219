use jiff::{SignedDuration, Timestamp};
use std::sync::Arc;
use stubby_core::{NewUrlMapping, ShortCode};
use stubby_storage::{MySqlRepository, ReadRepository, Repository, StorageError};
use stubby_test_infra::mysql::{MySqlServer, MysqlConfig};

struct Fixture {
    _mysql: MySqlServer,
    repo: MySqlRepository,
}

impl Fixture {
    async fn start() -> Self {
        let mysql = MySqlServer::new(MysqlConfig::builder().build())
            .await
            .expect("start mysql");
        let pool = mysql.connect(5).await.expect("connect mysql");

        let repo = MySqlRepository::new(pool);
        repo.ensure_schema().await.expect("create schema");

        Self {
            _mysql: mysql,
            repo,
        }
    }
}

fn new_mapping(code: &str, url: &str) -> NewUrlMapping {
    NewUrlMapping::now(ShortCode::new_unchecked(code), url)
}

#[tokio::test]
async fn insert_and_find_by_code_and_url() {
    let fixture = Fixture::start().await;

    let inserted = fixture
        .repo
        .insert(new_mapping("abc123", "https://example.com"))
        .await
        .unwrap();

    let by_code = fixture.repo.find_by_code("abc123").await.unwrap().unwrap();
    let by_url = fixture
        .repo
        .find_by_url("https://example.com")
        .await
        .unwrap()
        .unwrap();

    // Stored timestamps must read back exactly as insert returned them.
    assert_eq!(by_code, inserted);
    assert_eq!(by_url, inserted);
    assert_eq!(by_code.expires_at, None);
}

#[tokio::test]
async fn find_returns_none_for_unknown_keys() {
    let fixture = Fixture::start().await;

    assert!(fixture.repo.find_by_code("zzzzzz").await.unwrap().is_none());
    assert!(fixture
        .repo
        .find_by_url("https://unknown.example")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn non_ascii_code_finds_nothing() {
    let fixture = Fixture::start().await;
    fixture
        .repo
        .insert(new_mapping("e12345", "https://example.com"))
        .await
        .unwrap();

    assert!(fixture.repo.find_by_code("é12345").await.unwrap().is_none());
    assert!(fixture.repo.find_by_code("短码").await.unwrap().is_none());
}

#[tokio::test]
async fn ensure_schema_is_idempotent() {
    let fixture = Fixture::start().await;

    fixture.repo.ensure_schema().await.unwrap();
}

#[tokio::test]
async fn expiry_round_trips() {
    let fixture = Fixture::start().await;
    let expires_at = Timestamp::new(1_900_000_000, 250_000_000).unwrap();
    let mapping = NewUrlMapping {
        expires_at: Some(expires_at),
        ..new_mapping("exp123", "https://example.com/expiring")
    };

    fixture.repo.insert(mapping).await.unwrap();

    let found = fixture.repo.find_by_code("exp123").await.unwrap().unwrap();
    assert_eq!(found.expires_at, Some(expires_at));
}

#[tokio::test]
async fn duplicate_code_is_reported_as_code_conflict() {
    let fixture = Fixture::start().await;

    fixture
        .repo
        .insert(new_mapping("abc123", "https://one.example"))
        .await
        .unwrap();

    let err = fixture
        .repo
        .insert(new_mapping("abc123", "https://two.example"))
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::DuplicateShortCode(_)));
}

#[tokio::test]
async fn duplicate_url_is_reported_as_url_conflict() {
    let fixture = Fixture::start().await;

    fixture
        .repo
        .insert(new_mapping("abc123", "https://example.com"))
        .await
        .unwrap();

    let err = fixture
        .repo
        .insert(new_mapping("xyz789", "https://example.com"))
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::DuplicateOriginalUrl(_)));
}

#[tokio::test]
async fn long_urls_are_deduplicated() {
    let fixture = Fixture::start().await;
    let url = format!("https://example.com/{}", "a".repeat(1_500));

    fixture
        .repo
        .insert(new_mapping("long01", &url))
        .await
        .unwrap();

    let err = fixture
        .repo
        .insert(new_mapping("long02", &url))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::DuplicateOriginalUrl(_)));

    let found = fixture.repo.find_by_url(&url).await.unwrap().unwrap();
    assert_eq!(found.short_code.as_str(), "long01");
}

#[tokio::test]
async fn codes_are_case_sensitive() {
    let fixture = Fixture::start().await;

    fixture
        .repo
        .insert(new_mapping("abc123", "https://lower.example"))
        .await
        .unwrap();
    fixture
        .repo
        .insert(new_mapping("ABC123", "https://upper.example"))
        .await
        .unwrap();

    let upper = fixture.repo.find_by_code("ABC123").await.unwrap().unwrap();
    assert_eq!(upper.original_url, "https://upper.example");
}

#[tokio::test]
async fn concurrent_inserts_of_same_url_keep_one_winner() {
    let fixture = Fixture::start().await;
    let repo = Arc::new(fixture.repo.clone());
    let mut handles = vec![];

    for i in 0..8u32 {
        let repo = Arc::clone(&repo);
        handles.push(tokio::spawn(async move {
            repo.insert(new_mapping(&format!("race{:02}", i), "https://race.example"))
                .await
        }));
    }

    let mut winners = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => winners += 1,
            Err(err) => assert!(
                matches!(err, StorageError::DuplicateOriginalUrl(_)),
                "unexpected error: {err}"
            ),
        }
    }

    assert_eq!(winners, 1);
}

#[tokio::test]
async fn ids_are_assigned_by_the_store() {
    let fixture = Fixture::start().await;
    let before = Timestamp::now() - SignedDuration::from_secs(1);

    let first = fixture
        .repo
        .insert(new_mapping("id0001", "https://one.example"))
        .await
        .unwrap();
    let second = fixture
        .repo
        .insert(new_mapping("id0002", "https://two.example"))
        .await
        .unwrap();

    assert!(second.id > first.id);
    assert!(first.created_at > before);
}
