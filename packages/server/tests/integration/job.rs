use crate::common::{TestApp, routes, stats};
use leetcode::ProviderError;

mod job_trigger {
    use super::*;

    #[tokio::test]
    async fn rating_pass_skips_failures_and_continues() {
        let app = TestApp::spawn().await;
        let alice = app.create_student("S1", Some("alice")).await;
        app.create_student("S2", Some("bob")).await;
        let carol = app.create_student("S3", Some("carol")).await;
        app.create_student("S4", None).await;
        app.provider.set("alice", Ok(stats(10, 5, 2, 1500.0)));
        app.provider.set(
            "bob",
            Err(ProviderError::RateLimited {
                retry_after_secs: None,
            }),
        );
        app.provider.set("carol", Ok(stats(1, 1, 1, 0.0)));

        let res = app.post_empty(&routes::job("rating")).await;
        assert_eq!(res.status, 202, "{}", res.text);
        assert_eq!(res.body["kind"], "rating");
        assert_eq!(res.body["trigger"], "manual");

        let id = res.body["id"].as_str().unwrap().to_string();
        let done = app.wait_for_job(&id).await;

        assert_eq!(done["state"], "completed");
        assert_eq!(done["processed"], 2);
        assert_eq!(done["failed"], 2);
        assert!(done["duration_ms"].as_u64().is_some());
        // Batch path makes one attempt per student.
        assert_eq!(app.provider.calls(), 3);

        let alice_ratings = app.get(&routes::ratings(alice)).await;
        assert_eq!(alice_ratings.body["data"][0]["rating"], 335);
        let carol_ratings = app.get(&routes::ratings(carol)).await;
        assert_eq!(carol_ratings.body["data"][0]["rating"], 9);
    }

    #[tokio::test]
    async fn contest_history_pass_reconciles_everyone() {
        let app = TestApp::spawn().await;
        let a = app.create_student("S1", Some("alice")).await;
        let b = app.create_student("S2", Some("bob")).await;
        app.provider.set("alice", Ok(stats(1, 0, 0, 0.0)));
        app.provider.set("bob", Ok(stats(0, 1, 0, 0.0)));

        let res = app.post_empty(&routes::job("contest-history")).await;
        assert_eq!(res.status, 202);
        assert_eq!(res.body["kind"], "contest_history");

        let done = app
            .wait_for_job(res.body["id"].as_str().unwrap())
            .await;
        assert_eq!(done["processed"], 2);
        assert_eq!(done["failed"], 0);

        for id in [a, b] {
            let list = app.get(&routes::contest_history(id)).await;
            assert_eq!(list.body["data"].as_array().unwrap().len(), 2);
        }
    }

    #[tokio::test]
    async fn weekly_stats_pass_is_idempotent_within_a_week() {
        let app = TestApp::spawn().await;
        app.create_student("S1", Some("alice")).await;
        app.provider.set("alice", Ok(stats(4, 2, 1, 0.0)));

        for _ in 0..2 {
            let res = app.post_empty(&routes::job("weekly_stats")).await;
            assert_eq!(res.status, 202, "{}", res.text);
            let done = app
                .wait_for_job(res.body["id"].as_str().unwrap())
                .await;
            assert_eq!(done["state"], "completed");
            assert_eq!(done["processed"], 1);
        }
    }

    #[tokio::test]
    async fn unknown_kind_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.post_empty(&routes::job("leaderboard")).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn unknown_run_is_404() {
        let app = TestApp::spawn().await;

        let res = app
            .get(&routes::job_run("00000000-0000-0000-0000-000000000000"))
            .await;

        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn runs_are_listed_newest_first() {
        let app = TestApp::spawn().await;

        let first = app.post_empty(&routes::job("rating")).await;
        app.wait_for_job(first.body["id"].as_str().unwrap()).await;
        let second = app.post_empty(&routes::job("contest_history")).await;
        app.wait_for_job(second.body["id"].as_str().unwrap()).await;

        let res = app.get(routes::JOBS).await;

        assert_eq!(res.status, 200);
        let data = res.body["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["id"], second.body["id"]);
        assert_eq!(data[1]["id"], first.body["id"]);
    }
}

mod weekly_stats_reads {
    use super::*;

    #[tokio::test]
    async fn recorded_week_is_listed_and_current() {
        let app = TestApp::spawn().await;
        let id = app.create_student("S1", Some("alice")).await;
        app.provider.set("alice", Ok(stats(4, 2, 1, 1500.0)));

        assert_eq!(app.get(&routes::current_week(id)).await.status, 404);
        let empty = app.get(&routes::weekly_stats(id)).await;
        assert_eq!(empty.status, 200);
        assert!(empty.body["data"].as_array().unwrap().is_empty());

        let res = app.post_empty(&routes::job("weekly_stats")).await;
        let done = app.wait_for_job(res.body["id"].as_str().unwrap()).await;
        assert_eq!(done["processed"], 1);

        let list = app.get(&routes::weekly_stats(id)).await;
        let data = list.body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["total_solved"], 7);
        assert_eq!(data[0]["hard_solved"], 1);

        let current = app.get(&routes::current_week(id)).await;
        assert_eq!(current.status, 200, "{}", current.text);
        assert_eq!(current.body["id"], data[0]["id"]);
        assert_eq!(current.body["week_start"], data[0]["week_start"]);
    }

    #[tokio::test]
    async fn unknown_student_is_404() {
        let app = TestApp::spawn().await;

        assert_eq!(app.get(&routes::weekly_stats(9)).await.status, 404);
        assert_eq!(app.get(&routes::current_week(9)).await.status, 404);
    }
}
