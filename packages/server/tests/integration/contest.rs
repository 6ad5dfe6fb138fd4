use crate::common::{TestApp, contest, routes, stats};
use leetcode::ProviderError;

mod contest_reconciliation {
    use super::*;

    #[tokio::test]
    async fn stores_attended_contests_newest_first() {
        let app = TestApp::spawn().await;
        let id = app.create_student("S1", Some("ada")).await;
        app.provider.set("ada", Ok(stats(10, 5, 2, 1500.0)));

        let res = app.post_empty(&routes::contest_history(id)).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["entries_written"], 2);

        let list = app.get(&routes::contest_history(id)).await;
        let data = list.body["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["contest_title"], "Weekly Contest 400");
        assert_eq!(data[0]["contest_date"], "2024-06-09T02:30:00Z");
        assert_eq!(data[1]["contest_title"], "Weekly Contest 399");
    }

    #[tokio::test]
    async fn replaces_previous_snapshot() {
        let app = TestApp::spawn().await;
        let id = app.create_student("S1", Some("ada")).await;
        app.provider.set("ada", Ok(stats(10, 5, 2, 1500.0)));
        app.post_empty(&routes::contest_history(id)).await;

        let mut fresh = stats(10, 5, 2, 1500.0);
        fresh.contest_history = vec![contest("Biweekly Contest 130", 1550.0, 1_717_856_000)];
        app.provider.set("ada", Ok(fresh));
        let res = app.post_empty(&routes::contest_history(id)).await;
        assert_eq!(res.body["entries_written"], 1);

        let list = app.get(&routes::contest_history(id)).await;
        let data = list.body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["contest_title"], "Biweekly Contest 130");
    }

    #[tokio::test]
    async fn failed_fetch_keeps_stored_history() {
        let app = TestApp::spawn().await;
        let id = app.create_student("S1", Some("ada")).await;
        app.provider.set("ada", Ok(stats(10, 5, 2, 1500.0)));
        app.post_empty(&routes::contest_history(id)).await;

        app.provider
            .set("ada", Err(ProviderError::Transport("connection reset".into())));
        let res = app.post_empty(&routes::contest_history(id)).await;

        assert_eq!(res.status, 503);
        assert_eq!(res.body["code"], "PROVIDER_UNAVAILABLE");
        let list = app.get(&routes::contest_history(id)).await;
        assert_eq!(list.body["data"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn malformed_data_is_bad_gateway() {
        let app = TestApp::spawn().await;
        let id = app.create_student("S1", Some("ada")).await;
        app.provider
            .set("ada", Err(ProviderError::MalformedData("missing field".into())));

        let res = app.post_empty(&routes::contest_history(id)).await;

        assert_eq!(res.status, 502);
        assert_eq!(res.body["code"], "PROVIDER_MALFORMED_DATA");
    }

    #[tokio::test]
    async fn listing_for_unknown_student_is_404() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::contest_history(5)).await;

        assert_eq!(res.status, 404);
    }
}

mod contest_store {
    use super::*;
    use chrono::{DateTime, Utc};
    use orbit_server::store::{HistoryStore, NewContestEntry, SeaOrmStore, StoreError};

    fn entry(title: &str) -> NewContestEntry {
        NewContestEntry {
            contest_title: title.to_string(),
            rating: 1500.0,
            ranking: 100,
            problems_solved: 3,
            finish_time_seconds: 3600,
            contest_date: DateTime::<Utc>::from_timestamp(1_717_900_200, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn failed_insert_rolls_back_the_delete() {
        let app = TestApp::spawn().await;
        let id = app.create_student("S1", Some("ada")).await;
        let store = SeaOrmStore::new(app.db.clone());

        let written = store
            .replace_contest_history(id, vec![entry("A"), entry("B")])
            .await
            .unwrap();
        assert_eq!(written, 2);

        // Duplicate titles violate the (student, title) key after the delete ran.
        let err = store
            .replace_contest_history(id, vec![entry("C"), entry("C")])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Insert(_)), "{err}");

        let list = app.get(&routes::contest_history(id)).await;
        let mut titles: Vec<&str> = list.body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["contest_title"].as_str().unwrap())
            .collect();
        titles.sort();
        assert_eq!(titles, ["A", "B"]);
    }
}
